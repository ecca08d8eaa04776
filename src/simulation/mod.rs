pub mod events;
pub mod interaction;
pub mod population;
pub mod spawn;
pub mod tick;

use crate::config::Config;
use crate::creature::params::CreatureParams;
use crate::creature::species::Species;
use crate::creature::Creature;
use crate::stats::SimulationMetrics;
use crate::world::World;
use population::PopulationRegulator;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use tick::TickReport;

/// Everything one run owns. The orchestrator is the only mutator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub world: World,
    pub creatures: Vec<Creature>,
    pub tick: u64,
    pub next_creature_id: u64,
    pub regulator: PopulationRegulator,
    pub total_births: u64,
    pub total_deaths: u64,
}

impl SimulationState {
    /// Generate the field and seed it with template creatures.
    pub fn new<R: Rng>(config: &Config, rng: &mut R) -> Self {
        let mut state = Self::empty(World::generate(&config.world, rng));

        let population = &config.population;
        for (species, count) in [
            (Species::Pursuer, population.initial_pursuers),
            (Species::Forager, population.initial_foragers),
            (Species::Roamer, population.initial_roamers),
        ] {
            for _ in 0..count {
                let params = CreatureParams::template(species, state.next_creature_id as usize, rng);
                state.insert_generated(params, config, rng);
            }
        }

        log::info!(
            "Generated {}x{} field with {} plants, {} obstacles and {} creatures",
            config.world.width,
            config.world.height,
            state.world.plants.len(),
            state.world.obstacles.len(),
            state.creatures.len()
        );
        state
    }

    pub fn empty(world: World) -> Self {
        Self {
            world,
            creatures: Vec::new(),
            tick: 0,
            next_creature_id: 0,
            regulator: PopulationRegulator::default(),
            total_births: 0,
            total_deaths: 0,
        }
    }

    /// Insert a creature built from an externally supplied bundle at a safe
    /// spawn point. Returns the new id.
    pub fn insert_generated<R: Rng>(&mut self, params: CreatureParams, config: &Config, rng: &mut R) -> u64 {
        let position = spawn::safe_spawn_position(
            &self.world,
            &self.creatures,
            params.species,
            &config.population,
            rng,
        );
        let id = self.allocate_id();
        let creature = Creature::from_params(
            id,
            params,
            position,
            config.creature.initial_energy,
            config.creature.max_energy,
            rng,
        );
        log::debug!(
            "Inserted {} '{}' ({}) at ({:.0}, {:.0})",
            creature.species,
            creature.name,
            creature.type_id,
            position.x,
            position.y
        );
        self.creatures.push(creature);
        id
    }

    /// Remove the listed creatures; unknown ids are ignored.
    pub fn remove_creatures(&mut self, ids: &[u64]) -> usize {
        let before = self.creatures.len();
        self.creatures.retain(|c| !ids.contains(&c.id));
        before - self.creatures.len()
    }

    pub fn creature(&self, id: u64) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn count(&self, species: Species) -> usize {
        self.creatures.iter().filter(|c| c.species == species).count()
    }

    pub fn metrics(&self) -> SimulationMetrics {
        SimulationMetrics::compute(
            self.tick,
            &self.creatures,
            self.world.active_plant_count(),
            self.total_births,
            self.total_deaths,
        )
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_creature_id;
        self.next_creature_id += 1;
        id
    }
}
