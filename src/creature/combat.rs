use crate::world::geometry::Vec2;
use serde::{Deserialize, Serialize};

/// Timed combat flags. Vulnerable and retreating may hold at the same time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    pub retreating: bool,
    pub vulnerable: bool,
    pub vulnerable_until: u64,
    pub last_attacked_by: Option<u64>,
    pub last_attacked_at: u64,
    pub counter_attacking: bool,
    /// Last known position of an attacker, remembered even out of sight.
    pub tracked_attacker_pos: Option<Vec2>,
    pub tracking_until: u64,
}

impl CombatState {
    pub fn record_attack(&mut self, attacker: u64, tick: u64) {
        self.last_attacked_by = Some(attacker);
        self.last_attacked_at = tick;
    }

    pub fn attacked_within(&self, tick: u64, window: u64) -> bool {
        self.last_attacked_by.is_some() && tick.saturating_sub(self.last_attacked_at) < window
    }

    pub fn start_retreat(&mut self, tick: u64, window: u64) {
        self.retreating = true;
        self.vulnerable = true;
        self.vulnerable_until = tick + window;
    }

    pub fn track(&mut self, position: Vec2, until: u64) {
        self.tracked_attacker_pos = Some(position);
        self.tracking_until = until;
    }

    /// Tracked attacker position while the tracking window is open.
    pub fn active_track(&self, tick: u64) -> Option<Vec2> {
        self.tracked_attacker_pos.filter(|_| tick < self.tracking_until)
    }

    /// Clear flags whose timers have lapsed.
    pub fn expire(&mut self, tick: u64, counter_memory: u64) {
        if self.vulnerable && tick >= self.vulnerable_until {
            self.vulnerable = false;
        }
        if self.counter_attacking && tick.saturating_sub(self.last_attacked_at) > counter_memory {
            self.counter_attacking = false;
        }
        if self.tracked_attacker_pos.is_some() && tick >= self.tracking_until {
            self.tracked_attacker_pos = None;
        }
    }
}
