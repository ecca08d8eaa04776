use super::geometry::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: u64,
    pub position: Vec2,
    pub energy: f64,
    pub size: f64,
    /// Ticks spent in the consumed state.
    pub regrowth_timer: u32,
    /// Ticks left before an uneaten plant expires.
    pub lifespan_timer: u32,
    pub is_consumed: bool,
}

impl Plant {
    pub fn new(id: u64, position: Vec2, energy: f64, size: f64, lifespan: u32) -> Self {
        Self {
            id,
            position,
            energy,
            size,
            regrowth_timer: 0,
            lifespan_timer: lifespan,
            is_consumed: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_consumed
    }

    pub fn consume(&mut self) {
        self.is_consumed = true;
        self.regrowth_timer = 0;
    }

    pub fn expire(&mut self) {
        self.is_consumed = true;
        self.regrowth_timer = 0;
        self.lifespan_timer = 0;
    }

    /// Bring the plant back at a new spot with fresh timers.
    pub fn regrow(&mut self, position: Vec2, energy: f64, lifespan: u32) {
        self.is_consumed = false;
        self.regrowth_timer = 0;
        self.position = position;
        self.energy = energy;
        self.lifespan_timer = lifespan;
    }
}
