use super::obstacle::Obstacle;
use super::plant::Plant;
use super::World;
use crate::config::WorldConfig;
use rand::Rng;

impl World {
    pub fn initialize_plants<R: Rng>(&mut self, config: &WorldConfig, rng: &mut R) {
        self.plants = (0..config.plant_count as u64)
            .map(|id| {
                let position = self.random_position(config.plant_margin, rng);
                let energy = plant_energy(config, rng);
                let size = config.plant_size_min
                    + rng.gen::<f64>() * (config.plant_size_max - config.plant_size_min);
                Plant::new(id, position, energy, size, config.plant_lifespan_ticks)
            })
            .collect();
    }

    pub fn initialize_obstacles<R: Rng>(&mut self, config: &WorldConfig, rng: &mut R) {
        let count = rng.gen_range(config.obstacle_count_min..=config.obstacle_count_max);
        self.obstacles = (0..count as u64)
            .map(|id| {
                Obstacle::random(id, self.width(), self.height(), config.obstacle_margin, rng)
            })
            .collect();
    }

    /// Advance regrowth and lifespan timers by one tick.
    pub fn update_plants<R: Rng>(&mut self, config: &WorldConfig, rng: &mut R) {
        let mut regrown = 0;
        let mut expired = 0;

        for i in 0..self.plants.len() {
            if self.plants[i].is_consumed {
                self.plants[i].regrowth_timer += 1;
                if self.plants[i].regrowth_timer >= config.plant_regrowth_ticks {
                    let position = self.random_position(config.plant_margin, rng);
                    let energy = plant_energy(config, rng);
                    self.plants[i].regrow(position, energy, config.plant_lifespan_ticks);
                    regrown += 1;
                }
                continue;
            }

            let plant = &mut self.plants[i];
            plant.lifespan_timer = plant.lifespan_timer.saturating_sub(1);
            if plant.lifespan_timer == 0 {
                plant.expire();
                expired += 1;
            }
        }

        if regrown > 0 || expired > 0 {
            log::trace!("Plants: {} regrown, {} expired", regrown, expired);
        }
    }
}

fn plant_energy<R: Rng>(config: &WorldConfig, rng: &mut R) -> f64 {
    config.plant_energy_min + rng.gen::<f64>() * (config.plant_energy_max - config.plant_energy_min)
}
