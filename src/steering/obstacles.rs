use super::Threat;
use crate::config::SteeringConfig;
use crate::creature::genome::ObstacleStrategy;
use crate::creature::Creature;
use crate::world::geometry::Vec2;
use crate::world::obstacle::Obstacle;

/// Force from nearby obstacles according to the creature's strategy.
///
/// Detection distance is measured from the obstacle centre. With a threat
/// close by, `UseAsCover` heads for the far side of the obstacle instead of
/// pushing away from it.
pub fn obstacle_force(
    creature: &Creature,
    obstacles: &[Obstacle],
    threat: Option<&Threat>,
    config: &SteeringConfig,
) -> Vec2 {
    let genome = &creature.genome;
    if genome.obstacle_strategy == ObstacleStrategy::Ignore {
        return Vec2::ZERO;
    }

    let awareness = genome.obstacle_awareness;
    let hiding_from = threat
        .filter(|_| genome.obstacle_strategy == ObstacleStrategy::UseAsCover)
        .filter(|t| t.distance < config.cover_threat_radius);

    let mut force = Vec2::ZERO;
    for obstacle in obstacles {
        let center = obstacle.center();
        let radius = obstacle.collision_radius();
        let distance = creature.position.distance(center);
        let detection = radius
            + config.obstacle_base_detection
            + awareness * config.obstacle_awareness_detection;

        if distance >= detection || distance <= 0.0 {
            continue;
        }
        let strength = (detection - distance) / detection * awareness;

        match hiding_from {
            Some(threat) => {
                let Some(shadow) = (center - threat.position).normalized() else {
                    continue;
                };
                let cover = center + shadow * radius * config.cover_distance_factor;
                let to_cover = cover - creature.position;
                if to_cover.length() > config.cover_arrive_radius {
                    if let Some(dir) = to_cover.normalized() {
                        force += dir * strength * config.cover_weight;
                    }
                }
            }
            None => {
                let nearest = obstacle.bounds.nearest_point(creature.position);
                let away = (creature.position - nearest)
                    .normalized()
                    .or_else(|| (creature.position - center).normalized());
                if let Some(dir) = away {
                    force += dir * strength * config.obstacle_avoid_weight;
                }
            }
        }
    }
    force
}
