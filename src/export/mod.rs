//! Per-tick view handed to renderers and broadcasters.

use crate::creature::params::{Appearance, Vision};
use crate::creature::species::Species;
use crate::creature::Creature;
use crate::simulation::SimulationState;
use crate::stats::SimulationMetrics;
use crate::world::geometry::Vec2;
use crate::world::obstacle::Obstacle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Coarse activity label for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorState {
    Idle,
    Chasing,
    Fleeing,
    Eating,
    Counter,
    Vulnerable,
    Retreating,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureView {
    pub id: u64,
    pub type_id: String,
    pub name: String,
    pub species: Species,
    pub position: Vec2,
    pub facing: f64,
    pub energy: f64,
    pub size: f64,
    pub vision: Vision,
    pub appearance: Appearance,
    pub behavior: BehaviorState,
    pub plant_points: u32,
    pub survival_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantView {
    pub id: u64,
    pub position: Vec2,
    pub size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub width: f64,
    pub height: f64,
    pub metrics: SimulationMetrics,
    pub creatures: Vec<CreatureView>,
    pub plants: Vec<PlantView>,
    pub obstacles: Vec<Obstacle>,
}

impl WorldSnapshot {
    pub fn capture(state: &SimulationState) -> Self {
        let creatures = state
            .creatures
            .iter()
            .map(|c| CreatureView {
                id: c.id,
                type_id: c.type_id.clone(),
                name: c.name.clone(),
                species: c.species,
                position: c.position,
                facing: c.facing,
                energy: c.energy(),
                size: c.attributes.size,
                vision: c.vision,
                appearance: c.appearance.clone(),
                behavior: behavior_of(c, state),
                plant_points: c.plant_points,
                survival_points: c.survival_points,
            })
            .collect();

        let plants = state
            .world
            .active_plants()
            .map(|p| PlantView {
                id: p.id,
                position: p.position,
                size: p.size,
            })
            .collect();

        Self {
            tick: state.tick,
            width: state.world.width(),
            height: state.world.height(),
            metrics: state.metrics(),
            creatures,
            plants,
            obstacles: state.world.obstacles.clone(),
        }
    }
}

/// Derive the display label from combat flags and what the creature can see.
pub fn behavior_of(creature: &Creature, state: &SimulationState) -> BehaviorState {
    let combat = &creature.combat;
    if combat.retreating {
        return BehaviorState::Retreating;
    }
    if combat.vulnerable {
        return BehaviorState::Vulnerable;
    }
    if combat.counter_attacking {
        return BehaviorState::Counter;
    }

    // same occlusion rule the steering applies
    let blockers = creature
        .genome
        .ignore_obstacle_blocked_targets
        .then_some(state.world.obstacles.as_slice());
    let visible = |other: &&Creature| other.id != creature.id && creature.can_see(other.position, blockers);
    let threatened = state
        .creatures
        .iter()
        .filter(visible)
        .any(|other| other.species.can_catch(creature.species));
    if threatened || combat.active_track(state.tick).is_some() {
        return BehaviorState::Fleeing;
    }

    let hunting = state
        .creatures
        .iter()
        .filter(visible)
        .any(|other| creature.species.can_catch(other.species));
    if hunting {
        return BehaviorState::Chasing;
    }

    if creature.species.eats_plants() && state.world.active_plants().any(|p| creature.can_see(p.position, blockers)) {
        return BehaviorState::Eating;
    }
    BehaviorState::Idle
}

/// Outbound boundary for per-tick snapshots. Consumers may read at any time.
pub trait SnapshotSink {
    fn publish(&mut self, snapshot: WorldSnapshot);
}

/// Keeps only the newest snapshot; readers sample it between ticks.
pub struct WatchSink {
    sender: watch::Sender<Option<Arc<WorldSnapshot>>>,
}

impl WatchSink {
    pub fn channel() -> (Self, watch::Receiver<Option<Arc<WorldSnapshot>>>) {
        let (sender, receiver) = watch::channel(None);
        (Self { sender }, receiver)
    }
}

impl SnapshotSink for WatchSink {
    fn publish(&mut self, snapshot: WorldSnapshot) {
        // no receivers is fine, the value is still stored
        self.sender.send_replace(Some(Arc::new(snapshot)));
    }
}
