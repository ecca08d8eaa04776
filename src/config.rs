use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub creature: CreatureConfig,
    pub steering: SteeringConfig,
    pub combat: CombatConfig,
    pub reproduction: ReproductionConfig,
    pub population: PopulationConfig,
    pub simulation: SimulationConfig,
    pub checkpoint: CheckpointConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub plant_count: usize,
    pub plant_margin: f64,
    pub plant_energy_min: f64,
    pub plant_energy_max: f64,
    pub plant_size_min: f64,
    pub plant_size_max: f64,
    pub plant_lifespan_ticks: u32,
    pub plant_regrowth_ticks: u32,
    pub obstacle_count_min: usize,
    pub obstacle_count_max: usize,
    pub obstacle_margin: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureConfig {
    pub max_energy: f64,
    pub initial_energy: f64,
    pub roamer_hunger_per_tick: f64,
    pub survival_interval_ticks: u32,
    pub max_speed_factor: f64,
    pub inertia: f64,
    pub force_gain: f64,
    pub facing_turn_rate: f64,
    pub facing_max_turn: f64,
    pub facing_min_speed: f64,
    pub contact_radius_factor: f64,
    pub plant_reach_factor: f64,
    pub plant_intelligence_bonus: f64,
}

/// Force weights and radii used by the steering engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteeringConfig {
    pub retreat_arrive_radius: f64,
    pub retreat_force: f64,
    pub attack_memory_ticks: u64,
    pub reaction_base: f64,
    pub reaction_scale: f64,
    pub reaction_min_energy: f64,
    pub forage_min_hunger: f64,
    pub forage_weight: f64,
    pub cannibal_energy: f64,
    pub cannibal_weight: f64,
    pub pursuer_cohesion_weight: f64,
    pub separation_distance: f64,
    pub separation_weight: f64,
    pub roamer_cohesion_weight: f64,
    pub ally_radius: f64,
    pub ally_bonus_per_ally: f64,
    pub ally_bonus_max: f64,
    pub vulnerable_charge_weight: f64,
    pub backstab_min_stealth: f64,
    pub backstab_weight: f64,
    pub counter_min_tendency: f64,
    pub counter_min_bravery: f64,
    pub counter_min_energy: f64,
    pub counter_weight: f64,
    pub flee_base: f64,
    pub flee_scale: f64,
    pub flee_min_factor: f64,
    pub panic_energy: f64,
    pub panic_max_stealth: f64,
    pub panic_weight: f64,
    pub pursuer_chase_weight: f64,
    pub hungry_chase_energy: f64,
    pub hungry_chase_weight: f64,
    pub neutral_weight: f64,
    pub flock_distance: f64,
    pub flock_weight: f64,
    pub territory_min: f64,
    pub territory_base_radius: f64,
    pub territory_radius_span: f64,
    pub territory_weight: f64,
    pub roamer_wander_chance: f64,
    pub roamer_wander_base: f64,
    pub curiosity_min: f64,
    pub curiosity_chance: f64,
    pub curiosity_weight: f64,
    pub emergency_radius: f64,
    pub emergency_weight: f64,
    pub border_margin: f64,
    pub border_weight: f64,
    pub obstacle_base_detection: f64,
    pub obstacle_awareness_detection: f64,
    pub cover_threat_radius: f64,
    pub cover_distance_factor: f64,
    pub cover_arrive_radius: f64,
    pub cover_weight: f64,
    pub obstacle_avoid_weight: f64,
    pub stall_threshold: f64,
    pub stall_turn: f64,
    pub stall_base: f64,
    pub stall_jitter: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConfig {
    pub backstab_base_damage: f64,
    pub backstab_strength_factor: f64,
    pub backstab_stealth_factor: f64,
    pub vulnerable_bonus_damage: f64,
    pub backstab_points: u32,
    pub backstab_vulnerable_points: u32,
    pub catch_base_damage: f64,
    pub catch_strength_factor: f64,
    pub size_defense_factor: f64,
    pub catch_energy_gain: f64,
    pub counter_base_damage: f64,
    pub counter_tendency_factor: f64,
    pub counter_points: u32,
    pub counter_trigger_tendency: f64,
    pub counter_trigger_bravery: f64,
    pub counter_trigger_energy: f64,
    pub counter_memory_ticks: u64,
    pub retreat_energy_threshold: f64,
    pub retreat_arrive_radius: f64,
    pub vulnerable_ticks: u64,
    pub tracking_ticks: u64,
    pub sighting_tracking_ticks: u64,
    pub knockback: f64,
    pub repel_knockback_base: f64,
    pub repel_knockback_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReproductionConfig {
    pub min_energy: f64,
    pub energy_cost: f64,
    pub cooldown_ticks: i64,
    pub max_pairings: u32,
    pub offspring_energy: f64,
    pub offspring_spread: f64,
    pub attribute_noise: f64,
    pub primary_genome_noise: f64,
    pub genome_noise: f64,
    pub eyes_flip_chance: f64,
    pub tentacles_flip_chance: f64,
    pub wings_flip_chance: f64,
    pub flag_flip_chance: f64,
    pub split_min_requirement: u32,
    pub split_base_requirement: u32,
    pub split_social_factor: f64,
    pub split_min_energy: f64,
    pub split_energy_cost: f64,
    pub split_cooldown_ticks: i64,
    pub split_burst_chance: f64,
    pub split_attribute_spread: f64,
    pub split_burst_attribute_spread: f64,
    pub split_genome_spread: f64,
    pub split_burst_genome_spread: f64,
    pub clone_base_energy: f64,
    pub clone_size_energy: f64,
    pub clone_spread: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub initial_pursuers: usize,
    pub initial_foragers: usize,
    pub initial_roamers: usize,
    pub pursuer_floor: usize,
    pub forager_floor: usize,
    pub forager_high_water: usize,
    pub pursuer_replenish_cooldown: u64,
    pub forager_replenish_cooldown: u64,
    pub pursuer_bonus_cooldown: u64,
    pub spawn_margin: f64,
    pub spawn_attempts: usize,
    pub spawn_fallback_samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub ticks_per_second: u64,
    pub log_interval_ticks: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
    pub directory: String,
    pub keep_last_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub enabled: bool,
    pub interval_ticks: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                width: 1200.0,
                height: 800.0,
                plant_count: 30,
                plant_margin: 50.0,
                plant_energy_min: 8.0,
                plant_energy_max: 15.0,
                plant_size_min: 3.0,
                plant_size_max: 7.0,
                plant_lifespan_ticks: 3600, // ~60 seconds at 60 TPS
                plant_regrowth_ticks: 300,  // ~5 seconds at 60 TPS
                obstacle_count_min: 5,
                obstacle_count_max: 8,
                obstacle_margin: 100.0,
            },
            creature: CreatureConfig {
                max_energy: 100.0,
                initial_energy: 100.0,
                roamer_hunger_per_tick: 0.015,
                survival_interval_ticks: 600,
                max_speed_factor: 0.15,
                inertia: 0.9,
                force_gain: 0.2,
                facing_turn_rate: 0.1,
                facing_max_turn: PI * 2.0 / 3.0,
                facing_min_speed: 0.05,
                contact_radius_factor: 2.5,
                plant_reach_factor: 2.0,
                plant_intelligence_bonus: 0.05,
            },
            steering: SteeringConfig {
                retreat_arrive_radius: 10.0,
                retreat_force: 1.5,
                attack_memory_ticks: 60,
                reaction_base: 0.3,
                reaction_scale: 0.8,
                reaction_min_energy: 50.0,
                forage_min_hunger: 0.3,
                forage_weight: 0.8,
                cannibal_energy: 60.0,
                cannibal_weight: 0.3,
                pursuer_cohesion_weight: 0.5,
                separation_distance: 30.0,
                separation_weight: 0.5,
                roamer_cohesion_weight: 0.4,
                ally_radius: 100.0,
                ally_bonus_per_ally: 0.1,
                ally_bonus_max: 0.3,
                vulnerable_charge_weight: 1.2,
                backstab_min_stealth: 0.3,
                backstab_weight: 1.2,
                counter_min_tendency: 0.5,
                counter_min_bravery: 0.7,
                counter_min_energy: 70.0,
                counter_weight: 0.5,
                flee_base: 0.8,
                flee_scale: 0.5,
                flee_min_factor: 0.3,
                panic_energy: 50.0,
                panic_max_stealth: 0.5,
                panic_weight: 0.5,
                pursuer_chase_weight: 1.5,
                hungry_chase_energy: 70.0,
                hungry_chase_weight: 1.2,
                neutral_weight: 0.3,
                flock_distance: 50.0,
                flock_weight: 0.15,
                territory_min: 0.3,
                territory_base_radius: 100.0,
                territory_radius_span: 150.0,
                territory_weight: 0.4,
                roamer_wander_chance: 0.08,
                roamer_wander_base: 0.2,
                curiosity_min: 0.2,
                curiosity_chance: 0.1,
                curiosity_weight: 0.5,
                emergency_radius: 60.0,
                emergency_weight: 1.5,
                border_margin: 40.0,
                border_weight: 0.15,
                obstacle_base_detection: 50.0,
                obstacle_awareness_detection: 50.0,
                cover_threat_radius: 100.0,
                cover_distance_factor: 1.5,
                cover_arrive_radius: 10.0,
                cover_weight: 0.5,
                obstacle_avoid_weight: 0.8,
                stall_threshold: 0.3,
                stall_turn: 0.2,
                stall_base: 0.25,
                stall_jitter: 0.1,
            },
            combat: CombatConfig {
                backstab_base_damage: 15.0,
                backstab_strength_factor: 2.0,
                backstab_stealth_factor: 10.0,
                vulnerable_bonus_damage: 15.0,
                backstab_points: 30,
                backstab_vulnerable_points: 40,
                catch_base_damage: 30.0,
                catch_strength_factor: 3.0,
                size_defense_factor: 0.03, // size 10 blocks 30%
                catch_energy_gain: 40.0,
                counter_base_damage: 3.0,
                counter_tendency_factor: 5.0,
                counter_points: 5,
                counter_trigger_tendency: 0.3,
                counter_trigger_bravery: 0.5,
                counter_trigger_energy: 50.0,
                counter_memory_ticks: 60,
                retreat_energy_threshold: 50.0,
                retreat_arrive_radius: 20.0,
                vulnerable_ticks: 300,
                tracking_ticks: 300,
                sighting_tracking_ticks: 180,
                knockback: 2.0,
                repel_knockback_base: 3.0,
                repel_knockback_size: 1.2,
            },
            reproduction: ReproductionConfig {
                min_energy: 50.0,
                energy_cost: 20.0,
                cooldown_ticks: 300,
                max_pairings: 3,
                offspring_energy: 80.0,
                offspring_spread: 25.0,
                attribute_noise: 1.0,
                primary_genome_noise: 0.1,
                genome_noise: 0.05,
                eyes_flip_chance: 0.2,
                tentacles_flip_chance: 0.1,
                wings_flip_chance: 0.1,
                flag_flip_chance: 0.1,
                split_min_requirement: 6,
                split_base_requirement: 10,
                split_social_factor: 0.4,
                split_min_energy: 60.0,
                split_energy_cost: 20.0,
                split_cooldown_ticks: 300,
                split_burst_chance: 0.15,
                split_attribute_spread: 0.5,
                split_burst_attribute_spread: 2.0,
                split_genome_spread: 0.1,
                split_burst_genome_spread: 0.3,
                clone_base_energy: 40.0,
                clone_size_energy: 5.0,
                clone_spread: 20.0,
            },
            population: PopulationConfig {
                initial_pursuers: 3,
                initial_foragers: 9,
                initial_roamers: 0,
                pursuer_floor: 3,
                forager_floor: 3,
                forager_high_water: 6,
                pursuer_replenish_cooldown: 36000, // ~10 minutes at 60 TPS
                forager_replenish_cooldown: 300,
                pursuer_bonus_cooldown: 1800,
                spawn_margin: 50.0,
                spawn_attempts: 50,
                spawn_fallback_samples: 20,
            },
            simulation: SimulationConfig {
                ticks_per_second: 60,
                log_interval_ticks: 600,
            },
            checkpoint: CheckpointConfig {
                enabled: true,
                interval_seconds: 3600,
                directory: "checkpoints".to_string(),
                keep_last_n: 24,
            },
            export: ExportConfig {
                enabled: true,
                interval_ticks: 1,
            },
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let world = &self.world;
        if !(world.width > 0.0 && world.height > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "world dimensions must be positive, got {}x{}",
                world.width, world.height
            )));
        }
        if world.plant_energy_min > world.plant_energy_max {
            return Err(Error::InvalidConfig(
                "plant_energy_min exceeds plant_energy_max".to_string(),
            ));
        }
        if world.plant_size_min > world.plant_size_max {
            return Err(Error::InvalidConfig(
                "plant_size_min exceeds plant_size_max".to_string(),
            ));
        }
        if world.obstacle_count_min > world.obstacle_count_max {
            return Err(Error::InvalidConfig(
                "obstacle_count_min exceeds obstacle_count_max".to_string(),
            ));
        }
        if self.creature.max_energy <= 0.0 {
            return Err(Error::InvalidConfig("max_energy must be positive".to_string()));
        }
        if self.simulation.ticks_per_second == 0 {
            return Err(Error::InvalidConfig(
                "ticks_per_second must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.world.width, 1200.0);
        assert_eq!(config.world.height, 800.0);
        assert_eq!(config.steering.emergency_radius, 60.0);
        assert_eq!(config.steering.flock_weight, 0.15);
        assert!(config.checkpoint.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.world.width, deserialized.world.width);
        assert_eq!(
            config.reproduction.max_pairings,
            deserialized.reproduction.max_pairings
        );
    }

    #[test]
    fn test_validate_rejects_degenerate_world() {
        let mut config = Config::default();
        config.world.width = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_ranges() {
        let mut config = Config::default();
        config.world.plant_energy_min = 20.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.world.obstacle_count_min = 10;
        assert!(config.validate().is_err());
    }
}
