use super::params::Vision;
use super::species::Species;
use super::Creature;
use crate::world::geometry::{wrap_angle, Vec2, TAU};
use crate::world::obstacle::{is_occluded, Obstacle};
use std::f64::consts::PI;

/// Half-width of the rear arc measured from the facing direction.
pub const REAR_ARC: f64 = PI * 0.75;

/// Frozen view of another creature, taken once per tick so every agent
/// perceives the same world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatureSnapshot {
    pub id: u64,
    pub species: Species,
    pub position: Vec2,
    pub facing: f64,
    pub energy: f64,
    pub vulnerable: bool,
}

impl From<&Creature> for CreatureSnapshot {
    fn from(creature: &Creature) -> Self {
        Self {
            id: creature.id,
            species: creature.species,
            position: creature.position,
            facing: creature.facing,
            energy: creature.energy(),
            vulnerable: creature.combat.vulnerable,
        }
    }
}

/// Whether an observer at `origin` looking along `facing` notices `target`.
///
/// Range is checked first, then the cone (skipped for a full circle), then
/// line of sight when `obstacles` is given.
pub fn in_field_of_view(
    origin: Vec2,
    facing: f64,
    vision: &Vision,
    target: Vec2,
    obstacles: Option<&[Obstacle]>,
) -> bool {
    let offset = target - origin;
    if offset.length() > vision.range {
        return false;
    }

    if vision.angle < TAU {
        let deviation = wrap_angle(offset.angle() - facing).abs();
        if deviation > vision.angle / 2.0 {
            return false;
        }
    }

    match obstacles {
        Some(obstacles) => !is_occluded(origin, target, obstacles),
        None => true,
    }
}

/// Whether `attacker` stands in the rear arc of a target at `target_pos`
/// facing `target_facing`.
pub fn is_behind(attacker: Vec2, target_pos: Vec2, target_facing: f64) -> bool {
    let bearing = (attacker - target_pos).angle();
    wrap_angle(bearing - target_facing).abs() >= REAR_ARC
}

impl Creature {
    pub fn can_see(&self, target: Vec2, obstacles: Option<&[Obstacle]>) -> bool {
        in_field_of_view(self.position, self.facing, &self.vision, target, obstacles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::geometry::Rect;
    use crate::world::obstacle::ObstacleKind;

    fn cone(angle: f64, range: f64) -> Vision {
        Vision { angle, range }
    }

    #[test]
    fn test_out_of_range_never_visible() {
        let vision = cone(TAU, 100.0);
        let eps = 1e-6;
        assert!(!in_field_of_view(Vec2::ZERO, 0.0, &vision, Vec2::new(100.0 + eps, 0.0), None));
        assert!(in_field_of_view(Vec2::ZERO, 0.0, &vision, Vec2::new(100.0 - eps, 0.0), None));
    }

    #[test]
    fn test_cone_membership() {
        let vision = cone(PI / 2.0, 100.0);
        assert!(in_field_of_view(Vec2::ZERO, 0.0, &vision, Vec2::new(50.0, 10.0), None));
        assert!(!in_field_of_view(Vec2::ZERO, 0.0, &vision, Vec2::new(-50.0, 0.0), None));
        assert!(!in_field_of_view(Vec2::ZERO, 0.0, &vision, Vec2::new(10.0, 50.0), None));
        // facing wraps across ±π
        assert!(in_field_of_view(Vec2::ZERO, PI, &vision, Vec2::new(-50.0, -1.0), None));
    }

    #[test]
    fn test_occluded_target_not_visible() {
        let vision = cone(TAU, 100.0);
        let wall = Obstacle::new(0, ObstacleKind::Wall, Rect::new(40.0, -20.0, 10.0, 40.0));
        let obstacles = [wall];
        let target = Vec2::new(100.0 - 1e-6, 0.0);

        assert!(!in_field_of_view(Vec2::ZERO, 0.0, &vision, target, Some(&obstacles)));
        assert!(in_field_of_view(Vec2::ZERO, 0.0, &vision, target, None));

        let narrow = cone(PI / 3.0, 100.0);
        assert!(!in_field_of_view(Vec2::ZERO, 0.0, &narrow, target, Some(&obstacles)));
    }

    #[test]
    fn test_rear_arc() {
        // target faces east; attacker directly west of it
        assert!(is_behind(Vec2::new(-10.0, 0.0), Vec2::ZERO, 0.0));
        assert!(!is_behind(Vec2::new(10.0, 0.0), Vec2::ZERO, 0.0));
        let past_edge = Vec2::from_angle(REAR_ARC + 1e-6) * 10.0;
        assert!(is_behind(past_edge, Vec2::ZERO, 0.0));
        let short_of_edge = Vec2::from_angle(REAR_ARC - 1e-6) * 10.0;
        assert!(!is_behind(short_of_edge, Vec2::ZERO, 0.0));
    }

    #[test]
    fn test_perpendicular_approach_is_behind_neither() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(0.0, 10.0);
        let facing = 0.0;
        assert!(!is_behind(a, b, facing));
        assert!(!is_behind(b, a, facing));
    }
}
