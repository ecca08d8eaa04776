pub mod attributes;
pub mod combat;
pub mod genome;
pub mod metabolism;
pub mod params;
pub mod perception;
pub mod reproduction;
pub mod species;

use crate::world::geometry::{wrap_angle, Vec2, TAU};
use attributes::Attributes;
use combat::CombatState;
use genome::Genome;
use metabolism::Metabolism;
use params::{Appearance, CreatureParams, Lifestyle, Vision};
use rand::Rng;
use serde::{Deserialize, Serialize};
use species::Species;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub id: u64,
    /// Lineage tag shared by every descendant.
    pub type_id: String,
    pub name: String,
    pub author: String,
    pub species: Species,
    pub attributes: Attributes,
    pub genome: Genome,
    pub vision: Vision,
    pub appearance: Appearance,
    pub lifestyle: Lifestyle,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Heading in radians, smoothed toward the velocity direction.
    pub facing: f64,
    pub home: Vec2,
    pub metabolism: Metabolism,
    pub age: u64,
    pub reproduction_cooldown: i64,
    pub split_cooldown: i64,
    pub plant_points: u32,
    pub survival_points: u32,
    pub survival_ticks: u32,
    /// Number of offspring produced with each partner id.
    pub reproduction_history: HashMap<u64, u32>,
    pub combat: CombatState,
}

impl Creature {
    /// Build a creature from a generator bundle. The bundle is sanitized
    /// first, so out-of-range inputs are clamped rather than rejected.
    pub fn from_params<R: Rng>(
        id: u64,
        params: CreatureParams,
        position: Vec2,
        initial_energy: f64,
        max_energy: f64,
        rng: &mut R,
    ) -> Self {
        let (params, vision) = params.sanitized(rng);

        Self {
            id,
            type_id: params.type_id,
            name: params.name,
            author: params.author,
            species: params.species,
            attributes: params.attributes,
            genome: params.genome,
            vision,
            appearance: params.appearance,
            lifestyle: params.lifestyle,
            position,
            velocity: Vec2::ZERO,
            facing: rng.gen::<f64>() * TAU,
            home: position,
            metabolism: Metabolism::new(initial_energy, max_energy),
            age: 0,
            reproduction_cooldown: 0,
            split_cooldown: 0,
            plant_points: 0,
            survival_points: 0,
            survival_ticks: 0,
            reproduction_history: HashMap::new(),
            combat: CombatState::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.metabolism.is_alive()
    }

    pub fn energy(&self) -> f64 {
        self.metabolism.energy()
    }

    pub fn consume_energy(&mut self, amount: f64) -> bool {
        self.metabolism.consume_energy(amount)
    }

    pub fn gain_energy(&mut self, amount: f64) {
        self.metabolism.gain_energy(amount)
    }

    /// Collision radius against obstacles and other creatures.
    pub fn body_radius(&self, factor: f64) -> f64 {
        self.attributes.size * factor
    }

    pub fn pairings_with(&self, partner: u64) -> u32 {
        self.reproduction_history.get(&partner).copied().unwrap_or(0)
    }

    pub fn record_pairing(&mut self, partner: u64, cap: u32) {
        let count = self.reproduction_history.entry(partner).or_insert(0);
        *count = (*count + 1).min(cap);
    }

    /// Turn the facing toward the current velocity heading.
    pub fn update_facing(&mut self, turn_rate: f64, max_turn: f64, min_speed: f64) {
        if self.velocity.length() <= min_speed {
            return;
        }
        let delta = wrap_angle(self.velocity.angle() - self.facing).clamp(-max_turn, max_turn);
        self.facing = wrap_angle(self.facing + delta * turn_rate);
    }

    /// Count down cooldowns and grow older by one tick.
    pub fn advance_timers(&mut self) {
        self.age += 1;
        if self.reproduction_cooldown > 0 {
            self.reproduction_cooldown -= 1;
        }
        if self.split_cooldown > 0 {
            self.split_cooldown -= 1;
        }
    }

    /// Add one tick of survival; returns true when a survival point is earned.
    pub fn tick_survival(&mut self, interval: u32) -> bool {
        self.survival_ticks += 1;
        if interval > 0 && self.survival_ticks % interval == 0 {
            self.survival_points += 1;
            true
        } else {
            false
        }
    }

    pub fn total_points(&self) -> u32 {
        self.plant_points + self.survival_points
    }
}
