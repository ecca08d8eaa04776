use super::SimulationState;
use crate::config::{Config, PopulationConfig};
use crate::creature::params::CreatureParams;
use crate::creature::species::Species;
use crate::creature::Creature;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Outbound request to whatever generates or retires creatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PopulationRequest {
    Spawn { species: Species, count: usize },
    /// Creatures chosen for removal, lowest energy first.
    Despawn { species: Species, ids: Vec<u64> },
}

/// Fire-and-forget boundary for population requests. Implementations own
/// their error reporting; nothing is returned to the simulation.
pub trait PopulationService {
    fn request_spawn(&mut self, species: Species, count: usize);
    fn request_despawn(&mut self, species: Species, ids: &[u64]);
}

pub fn dispatch<S: PopulationService + ?Sized>(requests: &[PopulationRequest], service: &mut S) {
    for request in requests {
        match request {
            PopulationRequest::Spawn { species, count } => service.request_spawn(*species, *count),
            PopulationRequest::Despawn { species, ids } => service.request_despawn(*species, ids),
        }
    }
}

/// Threshold-based balancing between pursuers and foragers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationRegulator {
    pursuer_cooldown: u64,
    forager_cooldown: u64,
}

impl PopulationRegulator {
    /// Count live creatures and decide what to ask for. Cooldowns tick down
    /// once per call.
    pub fn regulate(&mut self, creatures: &[Creature], config: &PopulationConfig) -> Vec<PopulationRequest> {
        self.pursuer_cooldown = self.pursuer_cooldown.saturating_sub(1);
        self.forager_cooldown = self.forager_cooldown.saturating_sub(1);

        let count = |species: Species| creatures.iter().filter(|c| c.species == species).count();
        let pursuers = count(Species::Pursuer);
        let foragers = count(Species::Forager);
        let mut requests = Vec::new();

        if pursuers < config.pursuer_floor && self.pursuer_cooldown == 0 {
            requests.push(PopulationRequest::Spawn {
                species: Species::Pursuer,
                count: 1,
            });
            self.pursuer_cooldown = config.pursuer_replenish_cooldown;
        }

        if foragers < config.forager_floor && self.forager_cooldown == 0 {
            requests.push(PopulationRequest::Spawn {
                species: Species::Forager,
                count: config.forager_floor - foragers,
            });
            self.forager_cooldown = config.forager_replenish_cooldown;
        }

        if foragers >= config.forager_high_water && self.pursuer_cooldown == 0 {
            requests.push(PopulationRequest::Spawn {
                species: Species::Pursuer,
                count: 1,
            });
            self.pursuer_cooldown = config.pursuer_bonus_cooldown;
        }

        if foragers <= config.forager_floor && pursuers > config.pursuer_floor {
            let mut ranked: Vec<&Creature> = creatures.iter().filter(|c| c.species == Species::Pursuer).collect();
            ranked.sort_by(|a, b| b.energy().total_cmp(&a.energy()));
            let mut ids: Vec<u64> = ranked[config.pursuer_floor..].iter().map(|c| c.id).collect();
            ids.reverse();
            requests.push(PopulationRequest::Despawn {
                species: Species::Pursuer,
                ids,
            });
        }

        requests
    }
}

/// Local generator that fulfils requests straight from the species
/// templates.
pub struct TemplateGenerator<'a, R: Rng> {
    pub state: &'a mut SimulationState,
    pub config: &'a Config,
    pub rng: &'a mut R,
}

impl<R: Rng> PopulationService for TemplateGenerator<'_, R> {
    fn request_spawn(&mut self, species: Species, count: usize) {
        for _ in 0..count {
            let index = self.state.next_creature_id as usize;
            let params = CreatureParams::template(species, index, self.rng);
            let id = self.state.insert_generated(params, self.config, self.rng);
            log::info!("Spawned {} {} at tick {}", species, id, self.state.tick);
        }
    }

    fn request_despawn(&mut self, species: Species, ids: &[u64]) {
        let removed = self.state.remove_creatures(ids);
        if removed > 0 {
            log::warn!("Despawned {} {} creatures at tick {}", removed, species, self.state.tick);
        }
    }
}
