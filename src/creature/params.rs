use super::attributes::Attributes;
use super::genome::{Genome, ObstacleStrategy};
use super::species::Species;
use crate::config::ReproductionConfig;
use crate::evolution::mutation::maybe_flip;
use crate::world::geometry::TAU;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Vision cone: full opening `angle` in radians and a reach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vision {
    pub angle: f64,
    pub range: f64,
}

impl Vision {
    pub fn default_for<R: Rng>(species: Species, rng: &mut R) -> Self {
        match species {
            Species::Pursuer => Vision {
                angle: PI * 0.5 + rng.gen::<f64>() * PI * 0.3,
                range: 150.0 + rng.gen::<f64>() * 80.0,
            },
            Species::Forager => Vision {
                angle: TAU,
                range: 50.0 + rng.gen::<f64>() * 30.0,
            },
            Species::Roamer => Vision {
                angle: PI * 1.2 + rng.gen::<f64>() * PI * 0.6,
                range: 100.0 + rng.gen::<f64>() * 50.0,
            },
        }
    }

    /// Force `angle` into (0, 2π] and `range` above zero. Values that cannot
    /// be repaired by clamping take the species default.
    pub fn sanitized<R: Rng>(self, species: Species, rng: &mut R) -> Self {
        let fallback = Vision::default_for(species, rng);
        let angle = if self.angle.is_nan() || self.angle <= 0.0 {
            fallback.angle
        } else {
            self.angle.min(TAU)
        };
        let range = if self.range.is_finite() && self.range > 0.0 {
            self.range
        } else {
            fallback.range
        };
        Vision { angle, range }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyShape {
    Circle,
    Triangle,
    Square,
    Star,
    Organic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    Solid,
    Stripes,
    Spots,
    Gradient,
}

/// Rendering hints; never read by the simulation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub body: BodyShape,
    pub primary_color: String,
    pub secondary_color: String,
    pub has_eyes: bool,
    pub has_tentacles: bool,
    pub has_wings: bool,
    pub pattern: Pattern,
}

impl Appearance {
    /// Copy of `self` with the feature flags independently flipped.
    pub fn inherited<R: Rng>(&self, config: &ReproductionConfig, rng: &mut R) -> Self {
        Self {
            has_eyes: maybe_flip(self.has_eyes, config.eyes_flip_chance, rng),
            has_tentacles: maybe_flip(self.has_tentacles, config.tentacles_flip_chance, rng),
            has_wings: maybe_flip(self.has_wings, config.wings_flip_chance, rng),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Diet {
    Herbivore,
    Carnivore,
    Omnivore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Diurnal,
    Nocturnal,
    Cathemeral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sociality {
    Solitary,
    Pack,
    Swarm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifestyle {
    pub diet: Diet,
    pub activity: Activity,
    pub sociality: Sociality,
}

/// Constructor bundle supplied by an external generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureParams {
    pub name: String,
    pub author: String,
    pub species: Species,
    pub type_id: String,
    pub attributes: Attributes,
    pub genome: Genome,
    /// `None` picks the species default.
    pub vision: Option<Vision>,
    pub appearance: Appearance,
    pub lifestyle: Lifestyle,
}

const PURSUER_NAMES: [&str; 8] = [
    "Hunter", "Stalker", "Shadow", "Predator", "Raven", "Darkness", "Redeye", "Bloodhound",
];
const FORAGER_NAMES: [&str; 8] = [
    "Leaf", "Moss", "Forest", "Sprout", "Bud", "Clover", "Mint", "Sage",
];
const ROAMER_NAMES: [&str; 6] = ["Drift", "Tide", "Gale", "Brook", "Ripple", "Mist"];

fn roll<R: Rng>(base: f64, spread: u32, rng: &mut R) -> f64 {
    base + rng.gen_range(0..spread) as f64
}

fn hex(r: u32, g: u32, b: u32) -> String {
    format!("#{:02x}{:02x}{:02x}", r.min(255), g.min(255), b.min(255))
}

impl CreatureParams {
    /// Replace out-of-domain values with clamped or default ones. Also hands
    /// back the vision the creature will use: the bundle's own, repaired, or
    /// the species default when none was given.
    pub fn sanitized<R: Rng>(mut self, rng: &mut R) -> (Self, Vision) {
        self.attributes = self.attributes.clamped();
        self.genome = self.genome.clamped();
        let vision = self
            .vision
            .unwrap_or_else(|| Vision::default_for(self.species, rng))
            .sanitized(self.species, rng);
        self.vision = Some(vision);
        (self, vision)
    }

    /// System-authored bundle used for automatic replenishment.
    pub fn template<R: Rng>(species: Species, index: usize, rng: &mut R) -> Self {
        match species {
            Species::Pursuer => Self {
                name: PURSUER_NAMES[index % PURSUER_NAMES.len()].to_string(),
                author: "system".to_string(),
                species,
                type_id: format!("pursuer-system-{}", index),
                attributes: Attributes {
                    speed: roll(7.0, 3, rng),
                    size: roll(5.0, 3, rng),
                    strength: roll(7.0, 3, rng),
                    intelligence: roll(5.0, 3, rng),
                    social: roll(2.0, 3, rng),
                },
                genome: Genome {
                    approach_ally: -0.3,
                    approach_enemy: 0.9,
                    flee_when_weak: 0.1,
                    aggressiveness: 0.9,
                    curiosity: 0.7,
                    territoriality: 0.2,
                    obstacle_awareness: 0.4,
                    stealth_attack: 0.0,
                    counter_attack: 0.0,
                    active_hunt: 0.8,
                    flocking: 0.1,
                    food_greed: 0.2,
                    panic_threshold: 0.2,
                    bravery: 0.9,
                    obstacle_strategy: ObstacleStrategy::Avoid,
                    ignore_obstacle_blocked_targets: false,
                    avoid_obstacle_interior: false,
                },
                vision: None,
                appearance: Appearance {
                    body: BodyShape::Triangle,
                    primary_color: hex(rng.gen_range(180..255), 0, 0),
                    secondary_color: hex(rng.gen_range(100..180), 0, 0),
                    has_eyes: true,
                    has_tentacles: false,
                    has_wings: false,
                    pattern: Pattern::Solid,
                },
                lifestyle: Lifestyle {
                    diet: Diet::Carnivore,
                    activity: Activity::Cathemeral,
                    sociality: Sociality::Solitary,
                },
            },
            Species::Forager => Self {
                name: FORAGER_NAMES[index % FORAGER_NAMES.len()].to_string(),
                author: "system".to_string(),
                species,
                type_id: format!("forager-system-{}", index),
                attributes: Attributes {
                    speed: roll(5.0, 3, rng),
                    size: roll(3.0, 2, rng),
                    strength: roll(2.0, 2, rng),
                    intelligence: roll(6.0, 3, rng),
                    social: roll(5.0, 4, rng),
                },
                genome: Genome {
                    approach_ally: 0.3,
                    approach_enemy: -0.9,
                    flee_when_weak: 0.9,
                    aggressiveness: 0.1,
                    curiosity: 0.5,
                    territoriality: 0.3,
                    obstacle_awareness: 0.7,
                    stealth_attack: 0.4,
                    counter_attack: 0.1,
                    active_hunt: 0.0,
                    flocking: 0.7,
                    food_greed: 0.8,
                    panic_threshold: 0.6,
                    bravery: 0.3,
                    obstacle_strategy: ObstacleStrategy::UseAsCover,
                    ignore_obstacle_blocked_targets: false,
                    avoid_obstacle_interior: true,
                },
                vision: None,
                appearance: Appearance {
                    body: BodyShape::Circle,
                    primary_color: hex(rng.gen_range(40..80), rng.gen_range(180..255), rng.gen_range(40..80)),
                    secondary_color: hex(rng.gen_range(60..100), rng.gen_range(120..180), rng.gen_range(60..100)),
                    has_eyes: true,
                    has_tentacles: false,
                    has_wings: false,
                    pattern: Pattern::Solid,
                },
                lifestyle: Lifestyle {
                    diet: Diet::Herbivore,
                    activity: Activity::Diurnal,
                    sociality: Sociality::Pack,
                },
            },
            Species::Roamer => Self {
                name: ROAMER_NAMES[index % ROAMER_NAMES.len()].to_string(),
                author: "system".to_string(),
                species,
                type_id: format!("roamer-system-{}", index),
                attributes: Attributes {
                    speed: roll(5.0, 3, rng),
                    size: roll(4.0, 3, rng),
                    strength: roll(4.0, 3, rng),
                    intelligence: roll(4.0, 3, rng),
                    social: roll(6.0, 3, rng),
                },
                genome: Genome {
                    approach_ally: 0.7,
                    approach_enemy: 0.3,
                    flee_when_weak: 0.4,
                    aggressiveness: 0.5,
                    curiosity: 0.4,
                    territoriality: 0.5,
                    obstacle_awareness: 0.5,
                    stealth_attack: 0.1,
                    counter_attack: 0.3,
                    active_hunt: 0.4,
                    flocking: 0.8,
                    food_greed: 0.4,
                    panic_threshold: 0.4,
                    bravery: 0.5,
                    obstacle_strategy: ObstacleStrategy::Avoid,
                    ignore_obstacle_blocked_targets: false,
                    avoid_obstacle_interior: false,
                },
                vision: None,
                appearance: Appearance {
                    body: BodyShape::Organic,
                    primary_color: hex(rng.gen_range(30..80), rng.gen_range(80..140), rng.gen_range(180..255)),
                    secondary_color: hex(rng.gen_range(40..90), rng.gen_range(60..120), rng.gen_range(120..180)),
                    has_eyes: true,
                    has_tentacles: false,
                    has_wings: false,
                    pattern: Pattern::Spots,
                },
                lifestyle: Lifestyle {
                    diet: Diet::Omnivore,
                    activity: Activity::Diurnal,
                    sociality: Sociality::Pack,
                },
            },
        }
    }
}
