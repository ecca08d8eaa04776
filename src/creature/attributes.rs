use crate::evolution::mutation::{clamp_finite, perturb};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const ATTRIBUTE_MIN: f64 = 0.0;
pub const ATTRIBUTE_MAX: f64 = 10.0;

/// Five physical scalars, each held in [0, 10].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub speed: f64,
    pub size: f64,
    pub strength: f64,
    pub intelligence: f64,
    pub social: f64,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            speed: 5.0,
            size: 5.0,
            strength: 5.0,
            intelligence: 5.0,
            social: 5.0,
        }
    }
}

impl Attributes {
    pub fn clamped(self) -> Self {
        let c = |v: f64| clamp_finite(v, ATTRIBUTE_MIN, ATTRIBUTE_MAX);
        Self {
            speed: c(self.speed),
            size: c(self.size),
            strength: c(self.strength),
            intelligence: c(self.intelligence),
            social: c(self.social),
        }
    }

    pub fn values(&self) -> [f64; 5] {
        [self.speed, self.size, self.strength, self.intelligence, self.social]
    }

    /// Parental average with symmetric noise of half-width `noise`.
    pub fn blend<R: Rng>(a: &Attributes, b: &Attributes, noise: f64, rng: &mut R) -> Self {
        let mut mix = |x: f64, y: f64| perturb((x + y) / 2.0, noise, ATTRIBUTE_MIN, ATTRIBUTE_MAX, rng);
        Self {
            speed: mix(a.speed, b.speed),
            size: mix(a.size, b.size),
            strength: mix(a.strength, b.strength),
            intelligence: mix(a.intelligence, b.intelligence),
            social: mix(a.social, b.social),
        }
    }

    pub fn mutated<R: Rng>(&self, noise: f64, rng: &mut R) -> Self {
        let mut vary = |x: f64| perturb(x, noise, ATTRIBUTE_MIN, ATTRIBUTE_MAX, rng);
        Self {
            speed: vary(self.speed),
            size: vary(self.size),
            strength: vary(self.strength),
            intelligence: vary(self.intelligence),
            social: vary(self.social),
        }
    }
}
