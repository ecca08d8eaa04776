use super::events::{ScoreEvent, ScoreKind};
use super::interaction::{in_contact, interact};
use super::population::PopulationRequest;
use super::SimulationState;
use crate::config::Config;
use crate::creature::perception::CreatureSnapshot;
use crate::creature::species::Species;
use crate::creature::Creature;
use crate::steering::{steering_force, Surroundings};
use rand::Rng;

/// What happened during one call to [`SimulationState::tick`].
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: u64,
    /// True when the field had no area and nothing ran.
    pub skipped: bool,
    pub births: usize,
    pub splits: usize,
    pub deaths: usize,
    pub score_events: Vec<ScoreEvent>,
    pub requests: Vec<PopulationRequest>,
}

impl SimulationState {
    /// Advance the world by one tick.
    ///
    /// Movement for every creature resolves against a single snapshot before
    /// any pairwise contact is looked at.
    pub fn tick<R: Rng>(&mut self, config: &Config, rng: &mut R) -> TickReport {
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        if !self.world.has_area() {
            log::warn!("Field has no area, skipping tick {}", self.tick);
            report.skipped = true;
            return report;
        }

        self.world.update_plants(&config.world, rng);

        let snapshot: Vec<CreatureSnapshot> = self.creatures.iter().map(CreatureSnapshot::from).collect();
        self.refresh_states(&snapshot, config);
        self.move_creatures(&snapshot, config, rng, &mut report);
        self.feed_on_plants(config, &mut report);
        self.push_out_of_obstacles(config);

        let mut newborn = self.resolve_contacts(config, rng, &mut report);

        let before = self.creatures.len();
        self.creatures.retain(|c| c.is_alive());
        report.deaths = before - self.creatures.len();
        if report.deaths > 0 {
            log::debug!("{} creatures died at tick {}", report.deaths, self.tick);
        }

        for creature in &mut self.creatures {
            if let Some(clone) = creature.split(self.next_creature_id, &config.reproduction, &self.world, rng) {
                log::debug!("Creature {} split into {}", creature.id, clone.id);
                self.next_creature_id += 1;
                report.splits += 1;
                newborn.push(clone);
            }
        }
        report.births = newborn.len();
        self.creatures.extend(newborn);

        self.total_births += report.births as u64;
        self.total_deaths += report.deaths as u64;
        report.requests = self.regulator.regulate(&self.creatures, &config.population);

        self.tick += 1;
        report
    }

    /// Retreat arrival, lapsed timers, and foragers spotting pursuers.
    fn refresh_states(&mut self, snapshot: &[CreatureSnapshot], config: &Config) {
        let combat = &config.combat;
        let world = &self.world;
        let obstacles = &world.obstacles;

        for creature in &mut self.creatures {
            creature.combat.expire(self.tick, combat.counter_memory_ticks);

            if creature.combat.retreating {
                // the body can never get closer to an obstacle than its radius
                let body = creature.body_radius(config.creature.contact_radius_factor);
                if creature.position.distance(creature.home) < combat.retreat_arrive_radius {
                    creature.combat.retreating = false;
                    log::debug!("Creature {} made it home", creature.id);
                } else if world.obstructed(creature.home, (body - combat.retreat_arrive_radius).max(0.0)) {
                    creature.combat.retreating = false;
                    log::debug!("Creature {} cannot reach its home, ending retreat", creature.id);
                }
            }

            if creature.species.tracks_attackers() {
                let sighted = snapshot
                    .iter()
                    .filter(|other| other.species == Species::Pursuer)
                    .find(|other| creature.can_see(other.position, Some(obstacles)));
                if let Some(pursuer) = sighted {
                    creature
                        .combat
                        .track(pursuer.position, self.tick + combat.sighting_tracking_ticks);
                }
            }
        }
    }

    /// Steer every creature off the shared snapshot, then integrate.
    fn move_creatures<R: Rng>(
        &mut self,
        snapshot: &[CreatureSnapshot],
        config: &Config,
        rng: &mut R,
        report: &mut TickReport,
    ) {
        let surroundings = Surroundings {
            creatures: snapshot,
            world: &self.world,
            tick: self.tick,
        };
        let forces: Vec<_> = self
            .creatures
            .iter()
            .map(|c| steering_force(c, &surroundings, &config.steering, rng))
            .collect();

        let settings = &config.creature;
        for (creature, force) in self.creatures.iter_mut().zip(forces) {
            let max_speed = creature.attributes.speed * settings.max_speed_factor;
            creature.velocity =
                (creature.velocity * settings.inertia + force * settings.force_gain).clamp_length(max_speed);
            creature.position = self.world.clamp(creature.position + creature.velocity);
            creature.update_facing(settings.facing_turn_rate, settings.facing_max_turn, settings.facing_min_speed);

            if creature.species.hungers() {
                creature.consume_energy(settings.roamer_hunger_per_tick);
            }
            creature.advance_timers();
            if creature.tick_survival(settings.survival_interval_ticks) {
                report
                    .score_events
                    .push(ScoreEvent::new(creature, ScoreKind::Survival, 1, self.tick));
            }
        }
    }

    fn feed_on_plants(&mut self, config: &Config, report: &mut TickReport) {
        let settings = &config.creature;
        for creature in self.creatures.iter_mut().filter(|c| c.species.eats_plants()) {
            let reach = creature.attributes.size * settings.plant_reach_factor;
            for plant in self.world.plants.iter_mut().filter(|p| p.is_active()) {
                if creature.position.distance(plant.position) >= reach + plant.size {
                    continue;
                }
                let bonus = 1.0 + creature.attributes.intelligence * settings.plant_intelligence_bonus;
                creature.gain_energy((plant.energy * bonus).floor());
                creature.plant_points += 1;
                plant.consume();
                report
                    .score_events
                    .push(ScoreEvent::new(creature, ScoreKind::PlantEaten, 1, self.tick));
            }
        }
    }

    /// Push creatures out of obstacles and bounce the blocked velocity axes.
    fn push_out_of_obstacles(&mut self, config: &Config) {
        let factor = config.creature.contact_radius_factor;
        for creature in &mut self.creatures {
            let radius = creature.body_radius(factor);
            for obstacle in &self.world.obstacles {
                let Some(push) = obstacle.push_out(creature.position, radius) else {
                    continue;
                };
                creature.position += push;
                if push.x != 0.0 {
                    creature.velocity.x = -creature.velocity.x * 0.5;
                }
                if push.y != 0.0 {
                    creature.velocity.y = -creature.velocity.y * 0.5;
                }
            }
        }
    }

    /// Every unordered touching pair once, in index order. A creature killed
    /// earlier in the pass takes no further part.
    fn resolve_contacts<R: Rng>(&mut self, config: &Config, rng: &mut R, report: &mut TickReport) -> Vec<Creature> {
        let mut newborn = Vec::new();
        let factor = config.creature.contact_radius_factor;

        for i in 0..self.creatures.len() {
            let (head, tail) = self.creatures.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                if !a.is_alive() {
                    break;
                }
                if !b.is_alive() || !in_contact(a, b, factor) {
                    continue;
                }
                let child = interact(
                    a,
                    b,
                    self.next_creature_id,
                    config,
                    &self.world,
                    self.tick,
                    &mut report.score_events,
                    rng,
                );
                if let Some(child) = child {
                    self.next_creature_id += 1;
                    newborn.push(child);
                }
            }
        }
        newborn
    }
}
