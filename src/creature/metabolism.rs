use crate::evolution::mutation::clamp_finite;
use serde::{Deserialize, Serialize};

/// Energy store held in `[0, max_energy]`. Zero energy means death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metabolism {
    energy: f64,
    max_energy: f64,
}

impl Metabolism {
    pub fn new(initial_energy: f64, max_energy: f64) -> Self {
        Self {
            energy: clamp_finite(initial_energy, 0.0, max_energy),
            max_energy,
        }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn max_energy(&self) -> f64 {
        self.max_energy
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    /// Spend `amount`; returns false and bottoms out at zero when short.
    pub fn consume_energy(&mut self, amount: f64) -> bool {
        if self.energy >= amount {
            self.energy -= amount;
            true
        } else {
            self.energy = 0.0;
            false
        }
    }

    pub fn gain_energy(&mut self, amount: f64) {
        self.energy = clamp_finite(self.energy + amount, 0.0, self.max_energy);
    }

    /// Apply combat damage and return the energy left.
    pub fn take_damage(&mut self, damage: f64) -> f64 {
        self.energy = clamp_finite(self.energy - damage, 0.0, self.max_energy);
        self.energy
    }

    pub fn energy_ratio(&self) -> f64 {
        if self.max_energy > 0.0 {
            self.energy / self.max_energy
        } else {
            0.0
        }
    }
}
