use crate::creature::Creature;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreKind {
    PlantEaten,
    Survival,
    Backstab,
    CounterAttack,
}

/// A point gain, emitted for external leaderboards. The creature itself only
/// keeps running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub creature_id: u64,
    pub type_id: String,
    pub kind: ScoreKind,
    pub amount: u32,
    pub tick: u64,
}

impl ScoreEvent {
    pub fn new(creature: &Creature, kind: ScoreKind, amount: u32, tick: u64) -> Self {
        Self {
            creature_id: creature.id,
            type_id: creature.type_id.clone(),
            kind,
            amount,
            tick,
        }
    }
}
