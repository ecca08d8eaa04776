use clap::Parser;
use eco_arena::checkpoint;
use eco_arena::export::{SnapshotSink, WatchSink, WorldSnapshot};
use eco_arena::simulation::population::{dispatch, TemplateGenerator};
use eco_arena::{Config, SimulationState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tokio::time::{interval, Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "eco-arena")]
#[command(about = "Headless predator/prey arena simulation", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.json")]
    config: String,

    #[arg(long)]
    no_checkpoint: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = if Path::new(&args.config).exists() {
        log::info!("Loading config from: {}", args.config);
        Config::load_from_file(&args.config)?
    } else {
        log::info!("Config file not found, using defaults and saving to: {}", args.config);
        let config = Config::default();
        config.save_to_file(&args.config)?;
        config
    };
    config.validate()?;

    let mut rng = match args.seed {
        Some(seed) => {
            log::info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let checkpoints_on = !args.no_checkpoint && config.checkpoint.enabled;
    let resumed = if checkpoints_on {
        checkpoint::load_checkpoint(&config.checkpoint)?
    } else {
        None
    };
    let state = match resumed {
        Some(state) => {
            log::info!("Resumed from checkpoint at tick {}", state.tick);
            state
        }
        None => {
            log::info!("Initializing simulation...");
            SimulationState::new(&config, &mut rng)
        }
    };

    let (sink, snapshots) = WatchSink::channel();
    tokio::spawn(async move {
        let mut snapshots = snapshots;
        while snapshots.changed().await.is_ok() {
            if let Some(snapshot) = snapshots.borrow_and_update().as_ref() {
                log::trace!("Snapshot for tick {} with {} creatures", snapshot.tick, snapshot.creatures.len());
            }
        }
    });

    run_simulation(state, config, sink, &mut rng, checkpoints_on, args.max_ticks).await?;

    Ok(())
}

async fn run_simulation(
    mut state: SimulationState,
    config: Config,
    mut sink: WatchSink,
    rng: &mut StdRng,
    checkpoints_on: bool,
    max_ticks: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_duration = Duration::from_micros(1_000_000 / config.simulation.ticks_per_second.max(1));
    let mut tick_interval = interval(tick_duration);

    let checkpoint_interval = checkpoints_on.then(|| Duration::from_secs(config.checkpoint.interval_seconds));
    let mut last_checkpoint = Instant::now();
    let start_tick = state.tick;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {}
            _ = &mut shutdown => {
                log::info!("Interrupted at tick {}", state.tick);
                break;
            }
        }

        let report = state.tick(&config, rng);
        if report.skipped {
            continue;
        }

        if !report.requests.is_empty() {
            let mut generator = TemplateGenerator {
                state: &mut state,
                config: &config,
                rng: &mut *rng,
            };
            dispatch(&report.requests, &mut generator);
        }

        for event in &report.score_events {
            log::debug!(
                "+{} {:?} for creature {} ({}) at tick {}",
                event.amount,
                event.kind,
                event.creature_id,
                event.type_id,
                event.tick
            );
        }

        if config.export.enabled && state.tick % config.export.interval_ticks.max(1) == 0 {
            sink.publish(WorldSnapshot::capture(&state));
        }

        if state.tick % config.simulation.log_interval_ticks.max(1) == 0 {
            let metrics = state.metrics();
            let species = metrics
                .species_counts
                .iter()
                .map(|(s, n)| format!("{}: {}", s, n))
                .collect::<Vec<_>>()
                .join(", ");
            log::info!(
                "Tick: {} | Population: {} ({}) | Avg Energy: {:.2} | Plants: {} | Births: {} | Deaths: {}",
                metrics.tick,
                metrics.population,
                species,
                metrics.avg_energy,
                metrics.active_plants,
                metrics.total_births,
                metrics.total_deaths
            );
            if let Some(leader) = &metrics.leading_lineage {
                log::info!(
                    "Leading lineage: {} with {} points across {} members",
                    leader.type_id,
                    leader.points,
                    leader.members
                );
            }
        }

        if state.creatures.is_empty() {
            log::warn!("All creatures have died! Simulation ended at tick {}.", state.tick);
            break;
        }

        if max_ticks.is_some_and(|max| state.tick - start_tick >= max) {
            log::info!("Reached tick limit at tick {}", state.tick);
            break;
        }

        if let Some(checkpoint_dur) = checkpoint_interval {
            if last_checkpoint.elapsed() >= checkpoint_dur {
                match checkpoint::save_checkpoint(&state, &config.checkpoint) {
                    Ok(path) => log::info!("Checkpoint saved: {}", path.display()),
                    Err(e) => log::error!("Failed to save checkpoint: {}", e),
                }
                last_checkpoint = Instant::now();
            }
        }
    }

    if checkpoints_on {
        match checkpoint::save_checkpoint(&state, &config.checkpoint) {
            Ok(path) => log::info!("Final checkpoint saved: {}", path.display()),
            Err(e) => log::error!("Failed to save checkpoint: {}", e),
        }
    }

    Ok(())
}
