use crate::config::PopulationConfig;
use crate::creature::species::Species;
use crate::creature::Creature;
use crate::world::geometry::Vec2;
use crate::world::World;
use rand::Rng;

/// Pick a spawn point for `species` that is clear of obstacles and that no
/// hostile catcher can currently see. After `spawn_attempts` misses, fall back
/// to the clear sampled point farthest from its nearest hostile.
pub fn safe_spawn_position<R: Rng>(
    world: &World,
    creatures: &[Creature],
    species: Species,
    config: &PopulationConfig,
    rng: &mut R,
) -> Vec2 {
    let hostiles: Vec<&Creature> = creatures
        .iter()
        .filter(|c| c.species.can_catch(species))
        .collect();

    for _ in 0..config.spawn_attempts {
        let candidate = world.random_position(config.spawn_margin, rng);
        if world.inside_obstacle(candidate) {
            continue;
        }
        if !hostiles.iter().any(|h| h.can_see(candidate, None)) {
            return candidate;
        }
    }

    let clearance = |point: Vec2| {
        hostiles
            .iter()
            .map(|h| h.position.distance(point))
            .fold(f64::INFINITY, f64::min)
    };

    let mut best: Option<(Vec2, f64)> = None;
    for _ in 0..config.spawn_fallback_samples.max(1) {
        let candidate = world.random_position(config.spawn_margin, rng);
        if world.inside_obstacle(candidate) {
            continue;
        }
        let candidate_clearance = clearance(candidate);
        if best.map_or(true, |(_, c)| candidate_clearance > c) {
            best = Some((candidate, candidate_clearance));
        }
    }

    match best {
        Some((position, best_clearance)) => {
            log::debug!(
                "No unseen spawn point for {}; using one {:.1} from the nearest hostile",
                species,
                best_clearance
            );
            position
        }
        None => {
            log::warn!("Every spawn sample for {} landed inside an obstacle", species);
            world.random_position(config.spawn_margin, rng)
        }
    }
}
