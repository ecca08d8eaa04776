pub mod geometry;
pub mod obstacle;
pub mod plant;
pub mod resources;

use crate::config::WorldConfig;
use geometry::Vec2;
use obstacle::Obstacle;
use plant::Plant;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The bounded play field with its plants and obstacles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    width: f64,
    height: f64,
    pub plants: Vec<Plant>,
    pub obstacles: Vec<Obstacle>,
}

impl World {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            plants: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    pub fn generate<R: Rng>(config: &WorldConfig, rng: &mut R) -> Self {
        let mut world = Self::new(config.width, config.height);
        world.initialize_obstacles(config, rng);
        world.initialize_plants(config, rng);
        world
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn clamp(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            position.x.clamp(0.0, self.width.max(0.0)),
            position.y.clamp(0.0, self.height.max(0.0)),
        )
    }

    /// Uniform position at least `margin` from every edge. Collapses toward
    /// the centre when the field is narrower than two margins.
    pub fn random_position<R: Rng>(&self, margin: f64, rng: &mut R) -> Vec2 {
        let span_x = (self.width - margin * 2.0).max(0.0);
        let span_y = (self.height - margin * 2.0).max(0.0);
        let x = if span_x > 0.0 { margin + rng.gen::<f64>() * span_x } else { self.width / 2.0 };
        let y = if span_y > 0.0 { margin + rng.gen::<f64>() * span_y } else { self.height / 2.0 };
        Vec2::new(x, y)
    }

    pub fn active_plants(&self) -> impl Iterator<Item = &Plant> {
        self.plants.iter().filter(|p| p.is_active())
    }

    pub fn active_plant_count(&self) -> usize {
        self.active_plants().count()
    }

    pub fn inside_obstacle(&self, point: Vec2) -> bool {
        self.obstacles.iter().any(|o| o.bounds.contains(point))
    }

    /// Whether a circle of `radius` centred on `point` touches any obstacle.
    pub fn obstructed(&self, point: Vec2, radius: f64) -> bool {
        self.inside_obstacle(point) || self.obstacles.iter().any(|o| o.push_out(point, radius).is_some())
    }
}
