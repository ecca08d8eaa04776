use super::geometry::{Rect, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Wall,
    Rock,
    Tree,
}

impl ObstacleKind {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => ObstacleKind::Wall,
            1 => ObstacleKind::Rock,
            _ => ObstacleKind::Tree,
        }
    }

    /// Default footprint for this kind of obstacle.
    pub fn random_dimensions<R: Rng>(self, rng: &mut R) -> (f64, f64) {
        match self {
            ObstacleKind::Wall => {
                let thin = 20.0 + rng.gen::<f64>() * 30.0;
                let long = 80.0 + rng.gen::<f64>() * 120.0;
                if rng.gen_bool(0.5) {
                    (thin, long)
                } else {
                    (long, thin)
                }
            }
            ObstacleKind::Rock => {
                let size = 40.0 + rng.gen::<f64>() * 60.0;
                (size, size * (0.8 + rng.gen::<f64>() * 0.4))
            }
            ObstacleKind::Tree => (
                30.0 + rng.gen::<f64>() * 40.0,
                30.0 + rng.gen::<f64>() * 40.0,
            ),
        }
    }
}

/// Immutable axis-aligned blocker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u64,
    pub kind: ObstacleKind,
    pub bounds: Rect,
}

impl Obstacle {
    pub fn new(id: u64, kind: ObstacleKind, bounds: Rect) -> Self {
        Self { id, kind, bounds }
    }

    /// Place an obstacle of random kind inside `margin` of the field edges.
    pub fn random<R: Rng>(id: u64, width: f64, height: f64, margin: f64, rng: &mut R) -> Self {
        let kind = ObstacleKind::random(rng);
        let (w, h) = kind.random_dimensions(rng);
        let x = margin + rng.gen::<f64>() * (width - 2.0 * margin - w).max(0.0);
        let y = margin + rng.gen::<f64>() * (height - 2.0 * margin - h).max(0.0);
        Self::new(id, kind, Rect::new(x, y, w, h))
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Radius used by steering when deciding whether the obstacle is near.
    pub fn collision_radius(&self) -> f64 {
        self.bounds.width.max(self.bounds.height) / 2.0
    }

    /// Displacement that moves a circle of `radius` at `position` out of the
    /// obstacle, or `None` when they do not touch.
    pub fn push_out(&self, position: Vec2, radius: f64) -> Option<Vec2> {
        let nearest = self.bounds.nearest_point(position);
        let offset = position - nearest;
        let dist = offset.length();
        if dist >= radius {
            return None;
        }

        let overlap = radius - dist;
        match offset.normalized() {
            Some(normal) => Some(normal * overlap),
            None => Some(Vec2::new(0.0, -overlap)),
        }
    }
}

pub fn is_occluded(from: Vec2, to: Vec2, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|obstacle| obstacle.bounds.intersects_segment(from, to))
}
