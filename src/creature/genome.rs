use crate::evolution::mutation::{clamp_finite, maybe_flip, perturb, pick};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObstacleStrategy {
    Avoid,
    UseAsCover,
    Ignore,
}

/// Behaviour weights that drive steering and combat choices.
///
/// `approach_ally` and `approach_enemy` live in [-1, 1]; every other scalar
/// lives in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub approach_ally: f64,
    pub approach_enemy: f64,
    pub flee_when_weak: f64,
    pub aggressiveness: f64,
    pub curiosity: f64,
    pub territoriality: f64,
    pub obstacle_awareness: f64,
    pub stealth_attack: f64,
    pub counter_attack: f64,
    pub active_hunt: f64,
    pub flocking: f64,
    pub food_greed: f64,
    pub panic_threshold: f64,
    pub bravery: f64,
    pub obstacle_strategy: ObstacleStrategy,
    pub ignore_obstacle_blocked_targets: bool,
    pub avoid_obstacle_interior: bool,
}

impl Default for Genome {
    fn default() -> Self {
        Self {
            approach_ally: 0.5,
            approach_enemy: -0.3,
            flee_when_weak: 0.5,
            aggressiveness: 0.3,
            curiosity: 0.5,
            territoriality: 0.3,
            obstacle_awareness: 0.5,
            stealth_attack: 0.3,
            counter_attack: 0.2,
            active_hunt: 0.5,
            flocking: 0.5,
            food_greed: 0.5,
            panic_threshold: 0.5,
            bravery: 0.5,
            obstacle_strategy: ObstacleStrategy::Avoid,
            ignore_obstacle_blocked_targets: false,
            avoid_obstacle_interior: false,
        }
    }
}

fn unit(v: f64) -> f64 {
    clamp_finite(v, 0.0, 1.0)
}

fn signed(v: f64) -> f64 {
    clamp_finite(v, -1.0, 1.0)
}

impl Genome {
    pub fn clamped(mut self) -> Self {
        self.approach_ally = signed(self.approach_ally);
        self.approach_enemy = signed(self.approach_enemy);
        for v in self.unit_scalars_mut() {
            *v = unit(*v);
        }
        self
    }

    fn unit_scalars_mut(&mut self) -> [&mut f64; 12] {
        [
            &mut self.flee_when_weak,
            &mut self.aggressiveness,
            &mut self.curiosity,
            &mut self.territoriality,
            &mut self.obstacle_awareness,
            &mut self.stealth_attack,
            &mut self.counter_attack,
            &mut self.active_hunt,
            &mut self.flocking,
            &mut self.food_greed,
            &mut self.panic_threshold,
            &mut self.bravery,
        ]
    }

    /// True when every scalar sits inside its declared interval.
    pub fn in_range(&self) -> bool {
        let signed_ok = [self.approach_ally, self.approach_enemy]
            .iter()
            .all(|v| (-1.0..=1.0).contains(v));
        let unit_ok = [
            self.flee_when_weak,
            self.aggressiveness,
            self.curiosity,
            self.territoriality,
            self.obstacle_awareness,
            self.stealth_attack,
            self.counter_attack,
            self.active_hunt,
            self.flocking,
            self.food_greed,
            self.panic_threshold,
            self.bravery,
        ]
        .iter()
        .all(|v| (0.0..=1.0).contains(v));
        signed_ok && unit_ok
    }

    /// Sexual crossover: averages with noise, the movement group getting the
    /// wider `primary_noise`. Discrete fields come from one parent.
    pub fn blend<R: Rng>(
        a: &Genome,
        b: &Genome,
        primary_noise: f64,
        noise: f64,
        flag_flip: f64,
        rng: &mut R,
    ) -> Self {
        let mut avg = |x: f64, y: f64, width: f64, lo: f64| perturb((x + y) / 2.0, width, lo, 1.0, rng);

        let approach_ally = avg(a.approach_ally, b.approach_ally, primary_noise, -1.0);
        let approach_enemy = avg(a.approach_enemy, b.approach_enemy, primary_noise, -1.0);
        let flee_when_weak = avg(a.flee_when_weak, b.flee_when_weak, primary_noise, 0.0);
        let aggressiveness = avg(a.aggressiveness, b.aggressiveness, primary_noise, 0.0);
        let curiosity = avg(a.curiosity, b.curiosity, primary_noise, 0.0);
        let territoriality = avg(a.territoriality, b.territoriality, primary_noise, 0.0);
        let obstacle_awareness = avg(a.obstacle_awareness, b.obstacle_awareness, noise, 0.0);
        let stealth_attack = avg(a.stealth_attack, b.stealth_attack, noise, 0.0);
        let counter_attack = avg(a.counter_attack, b.counter_attack, noise, 0.0);
        let active_hunt = avg(a.active_hunt, b.active_hunt, noise, 0.0);
        let flocking = avg(a.flocking, b.flocking, noise, 0.0);
        let food_greed = avg(a.food_greed, b.food_greed, noise, 0.0);
        let panic_threshold = avg(a.panic_threshold, b.panic_threshold, noise, 0.0);
        let bravery = avg(a.bravery, b.bravery, noise, 0.0);

        let donor = pick(a, b, rng);
        Self {
            approach_ally,
            approach_enemy,
            flee_when_weak,
            aggressiveness,
            curiosity,
            territoriality,
            obstacle_awareness,
            stealth_attack,
            counter_attack,
            active_hunt,
            flocking,
            food_greed,
            panic_threshold,
            bravery,
            obstacle_strategy: donor.obstacle_strategy,
            ignore_obstacle_blocked_targets: maybe_flip(
                donor.ignore_obstacle_blocked_targets,
                flag_flip,
                rng,
            ),
            avoid_obstacle_interior: maybe_flip(donor.avoid_obstacle_interior, flag_flip, rng),
        }
    }

    /// Near-copy used by splitting: every scalar shifted by up to
    /// `half_width`, discrete fields copied.
    pub fn mutated<R: Rng>(&self, half_width: f64, rng: &mut R) -> Self {
        let mut child = self.clone();
        child.approach_ally = perturb(self.approach_ally, half_width, -1.0, 1.0, rng);
        child.approach_enemy = perturb(self.approach_enemy, half_width, -1.0, 1.0, rng);
        for v in child.unit_scalars_mut() {
            *v = perturb(*v, half_width, 0.0, 1.0, rng);
        }
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_in_range() {
        assert!(Genome::default().in_range());
    }

    #[test]
    fn test_clamped() {
        let genome = Genome {
            approach_ally: -4.0,
            approach_enemy: 2.0,
            bravery: 1.5,
            panic_threshold: f64::NAN,
            ..Genome::default()
        }
        .clamped();
        assert_eq!(genome.approach_ally, -1.0);
        assert_eq!(genome.approach_enemy, 1.0);
        assert_eq!(genome.bravery, 1.0);
        assert_eq!(genome.panic_threshold, 0.0);
        assert!(genome.in_range());
    }

    #[test]
    fn test_blend_inherits_strategy_from_a_parent() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = Genome {
            obstacle_strategy: ObstacleStrategy::Ignore,
            ..Genome::default()
        };
        let b = Genome {
            obstacle_strategy: ObstacleStrategy::UseAsCover,
            ..Genome::default()
        };
        let mut seen_a = false;
        let mut seen_b = false;
        for _ in 0..50 {
            match Genome::blend(&a, &b, 0.1, 0.05, 0.1, &mut rng).obstacle_strategy {
                ObstacleStrategy::Ignore => seen_a = true,
                ObstacleStrategy::UseAsCover => seen_b = true,
                ObstacleStrategy::Avoid => panic!("strategy not taken from a parent"),
            }
        }
        assert!(seen_a && seen_b);
    }

    #[test]
    fn test_mutated_keeps_discrete_fields() {
        let mut rng = StdRng::seed_from_u64(8);
        let parent = Genome {
            obstacle_strategy: ObstacleStrategy::UseAsCover,
            avoid_obstacle_interior: true,
            ..Genome::default()
        };
        let child = parent.mutated(0.15, &mut rng);
        assert_eq!(child.obstacle_strategy, ObstacleStrategy::UseAsCover);
        assert!(child.avoid_obstacle_interior);
        assert!((child.bravery - parent.bravery).abs() <= 0.15);
    }

    fn arb_genome() -> impl Strategy<Value = Genome> {
        (
            -1.0f64..=1.0,
            -1.0f64..=1.0,
            prop::array::uniform12(0.0f64..=1.0),
        )
            .prop_map(|(ally, enemy, u)| Genome {
                approach_ally: ally,
                approach_enemy: enemy,
                flee_when_weak: u[0],
                aggressiveness: u[1],
                curiosity: u[2],
                territoriality: u[3],
                obstacle_awareness: u[4],
                stealth_attack: u[5],
                counter_attack: u[6],
                active_hunt: u[7],
                flocking: u[8],
                food_greed: u[9],
                panic_threshold: u[10],
                bravery: u[11],
                ..Genome::default()
            })
    }

    proptest! {
        #[test]
        fn repeated_crossover_stays_in_range(
            a in arb_genome(),
            b in arb_genome(),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut child = Genome::blend(&a, &b, 0.1, 0.05, 0.1, &mut rng);
            for _ in 0..20 {
                child = Genome::blend(&child, &a, 0.1, 0.05, 0.1, &mut rng);
                child = child.mutated(0.15, &mut rng);
                prop_assert!(child.in_range());
            }
        }
    }
}
