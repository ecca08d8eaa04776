//! Per-creature force accumulation.
//!
//! Every term is additive and evaluated in a fixed order; only the retreat
//! override short-circuits. The returned force is not clamped, the caller
//! blends it into the velocity and limits the result by the speed attribute.

pub mod obstacles;

use crate::config::SteeringConfig;
use crate::creature::perception::{is_behind, CreatureSnapshot};
use crate::creature::species::Species;
use crate::creature::Creature;
use crate::world::geometry::{Vec2, TAU};
use crate::world::obstacle::Obstacle;
use crate::world::World;
use rand::Rng;

/// What a creature is steering among this tick.
pub struct Surroundings<'a> {
    pub creatures: &'a [CreatureSnapshot],
    pub world: &'a World,
    pub tick: u64,
}

/// Nearest creature this agent is fleeing from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threat {
    pub distance: f64,
    pub position: Vec2,
}

#[derive(Default)]
struct Scan {
    force: Vec2,
    ally_sum: Vec2,
    ally_count: usize,
    threat: Option<Threat>,
    saw_target: bool,
}

impl Scan {
    fn note_threat(&mut self, distance: f64, position: Vec2) {
        if self.threat.map_or(true, |t| distance < t.distance) {
            self.threat = Some(Threat { distance, position });
        }
    }
}

pub fn steering_force<R: Rng>(
    creature: &Creature,
    surroundings: &Surroundings,
    config: &SteeringConfig,
    rng: &mut R,
) -> Vec2 {
    if creature.combat.retreating {
        return retreat_force(creature, config);
    }

    let mut force = attack_reaction(creature, surroundings, config);

    let mut scan = Scan::default();
    if creature.species.eats_plants() {
        if let Some(pull) = forage_force(creature, surroundings.world, config) {
            force += pull;
            scan.saw_target = true;
        }
    }

    if creature.species.is_pack() && rng.gen::<f64>() < config.roamer_wander_chance {
        let strength = config.roamer_wander_base + creature.genome.curiosity * config.roamer_wander_base;
        force += random_direction(rng) * strength;
    }

    scan_creatures(creature, surroundings, config, &mut scan);
    force += scan.force;

    if scan.threat.is_none() && creature.species.tracks_attackers() {
        if let Some(remembered) = creature.combat.active_track(surroundings.tick) {
            force += flee_remembered(creature, remembered, config, &mut scan);
        }
    }

    if creature.species.is_pack() {
        force += flock_force(creature, &scan, config);
        force += territory_force(creature, config);
    }

    let genome = &creature.genome;
    if genome.curiosity > config.curiosity_min
        && !scan.saw_target
        && scan.threat.is_none()
        && rng.gen::<f64>() < genome.curiosity * config.curiosity_chance
    {
        force += random_direction(rng) * genome.curiosity * config.curiosity_weight;
    }

    if let Some(threat) = scan.threat.filter(|t| t.distance < config.emergency_radius) {
        if let Some(dir) = (threat.position - creature.position).normalized() {
            let urgency = (config.emergency_radius - threat.distance) / config.emergency_radius;
            force -= dir * urgency * config.emergency_weight;
        }
    }

    force += border_force(creature.position, surroundings.world, config);
    force += obstacles::obstacle_force(
        creature,
        &surroundings.world.obstacles,
        scan.threat.as_ref(),
        config,
    );

    if force.length() < config.stall_threshold {
        let heading = creature.facing + (rng.gen::<f64>() - 0.5) * config.stall_turn;
        let strength = config.stall_base + rng.gen::<f64>() * config.stall_jitter;
        force += Vec2::from_angle(heading) * strength;
    }

    force
}

fn random_direction<R: Rng>(rng: &mut R) -> Vec2 {
    Vec2::from_angle(rng.gen::<f64>() * TAU)
}

/// Head home until close, then hold still.
fn retreat_force(creature: &Creature, config: &SteeringConfig) -> Vec2 {
    let to_home = creature.home - creature.position;
    if to_home.length() <= config.retreat_arrive_radius {
        return Vec2::ZERO;
    }
    to_home
        .normalized()
        .map_or(Vec2::ZERO, |dir| dir * config.retreat_force)
}

fn attack_reaction(creature: &Creature, surroundings: &Surroundings, config: &SteeringConfig) -> Vec2 {
    let combat = &creature.combat;
    if !combat.attacked_within(surroundings.tick, config.attack_memory_ticks) {
        return Vec2::ZERO;
    }
    let Some(attacker) = combat
        .last_attacked_by
        .and_then(|id| surroundings.creatures.iter().find(|c| c.id == id))
    else {
        return Vec2::ZERO;
    };
    let Some(dir) = (attacker.position - creature.position).normalized() else {
        return Vec2::ZERO;
    };

    let genome = &creature.genome;
    let courage = genome.bravery + genome.counter_attack;
    let strength = config.reaction_base + (courage - genome.panic_threshold).abs() * config.reaction_scale;
    if courage > genome.panic_threshold && creature.energy() > config.reaction_min_energy {
        dir * strength
    } else {
        -dir * strength
    }
}

/// Pull toward the nearest visible plant, stronger when hungry.
fn forage_force(creature: &Creature, world: &World, config: &SteeringConfig) -> Option<Vec2> {
    let genome = &creature.genome;
    let blockers = sight_blockers(creature, &world.obstacles);

    let nearest = world
        .active_plants()
        .filter(|p| !(genome.avoid_obstacle_interior && world.inside_obstacle(p.position)))
        .filter(|p| creature.can_see(p.position, blockers))
        .map(|p| (creature.position.distance(p.position), p.position))
        .min_by(|a, b| a.0.total_cmp(&b.0))?;

    let dir = (nearest.1 - creature.position).normalized()?;
    let hunger = (1.0 - creature.metabolism.energy_ratio()).max(config.forage_min_hunger);
    Some(dir * hunger * config.forage_weight)
}

fn sight_blockers<'a>(creature: &Creature, obstacles: &'a [Obstacle]) -> Option<&'a [Obstacle]> {
    if creature.genome.ignore_obstacle_blocked_targets {
        Some(obstacles)
    } else {
        None
    }
}

fn scan_creatures(creature: &Creature, surroundings: &Surroundings, config: &SteeringConfig, scan: &mut Scan) {
    let genome = &creature.genome;
    let energy = creature.energy();
    let blockers = sight_blockers(creature, &surroundings.world.obstacles);

    let nearby_allies = surroundings
        .creatures
        .iter()
        .filter(|o| o.id != creature.id && o.species == creature.species)
        .filter(|o| creature.position.distance(o.position) < config.ally_radius)
        .count();
    let bravery_bonus = (nearby_allies as f64 * config.ally_bonus_per_ally).min(config.ally_bonus_max);

    for other in surroundings.creatures {
        if other.id == creature.id || !creature.can_see(other.position, blockers) {
            continue;
        }
        let offset = other.position - creature.position;
        let distance = offset.length();
        let Some(dir) = offset.normalized() else {
            continue;
        };
        let closeness = (1.0 - distance / creature.vision.range).max(0.0).sqrt();

        if other.species == creature.species {
            match creature.species {
                Species::Pursuer => {
                    if energy < config.cannibal_energy {
                        let hunger = (config.cannibal_energy - energy) / config.cannibal_energy;
                        scan.force += dir * hunger * closeness * config.cannibal_weight;
                    } else {
                        scan.force += dir * genome.approach_ally * closeness * config.pursuer_cohesion_weight;
                    }
                }
                Species::Forager => {}
                Species::Roamer => {
                    if distance < config.separation_distance {
                        let push = (config.separation_distance - distance) / config.separation_distance;
                        scan.force -= dir * push * config.separation_weight;
                    } else {
                        scan.force += dir * genome.approach_ally * closeness * config.roamer_cohesion_weight;
                    }
                }
            }
            scan.ally_sum += other.position;
            scan.ally_count += 1;
        } else if creature.species.flees_from(other.species) {
            let may_stab = creature.species.can_backstab(other.species);

            if other.vulnerable && may_stab {
                scan.force += dir * (config.vulnerable_charge_weight + bravery_bonus);
            } else if may_stab
                && genome.stealth_attack > config.backstab_min_stealth
                && is_behind(creature.position, other.position, other.facing)
            {
                scan.force += dir * genome.stealth_attack * closeness * config.backstab_weight;
            } else if (genome.counter_attack + bravery_bonus > config.counter_min_tendency
                || genome.bravery + bravery_bonus > config.counter_min_bravery)
                && energy > config.counter_min_energy
            {
                let flank = (genome.counter_attack + bravery_bonus) * closeness * config.counter_weight;
                scan.force += dir.perpendicular() * flank;
            } else {
                let resolve = (1.0 - bravery_bonus).max(config.flee_min_factor);
                let flee = closeness * (config.flee_base + genome.flee_when_weak * config.flee_scale) * resolve;
                scan.force -= dir * flee;
            }

            scan.note_threat(distance, other.position);

            if energy < config.panic_energy && genome.stealth_attack < config.panic_max_stealth {
                let panic = (config.panic_energy - energy) / config.panic_energy;
                scan.force -= dir * panic * closeness * config.panic_weight;
            }
        } else if creature.species.can_catch(other.species) {
            if creature.species == Species::Pursuer {
                scan.force += dir * genome.aggressiveness * closeness * config.pursuer_chase_weight;
                scan.saw_target = true;
            } else if energy < config.hungry_chase_energy {
                let hunger = (1.0 - creature.metabolism.energy_ratio()).max(0.5);
                scan.force += dir * hunger * genome.aggressiveness * closeness * config.hungry_chase_weight;
                scan.saw_target = true;
            }
        } else {
            scan.force += dir * genome.approach_enemy * closeness * config.neutral_weight;
        }
    }
}

/// Keep fleeing from where an attacker was last seen.
fn flee_remembered(creature: &Creature, remembered: Vec2, config: &SteeringConfig, scan: &mut Scan) -> Vec2 {
    let offset = remembered - creature.position;
    let distance = offset.length();
    let Some(dir) = offset.normalized() else {
        return Vec2::ZERO;
    };
    scan.note_threat(distance, remembered);

    let closeness = (1.0 - distance / creature.vision.range)
        .max(0.0)
        .sqrt()
        .max(config.flee_min_factor);
    -dir * closeness * (config.flee_base + creature.genome.flee_when_weak * config.flee_scale)
}

fn flock_force(creature: &Creature, scan: &Scan, config: &SteeringConfig) -> Vec2 {
    if scan.ally_count == 0 || creature.genome.approach_ally <= 0.0 {
        return Vec2::ZERO;
    }
    let centroid = scan.ally_sum * (1.0 / scan.ally_count as f64);
    let to_center = centroid - creature.position;
    if to_center.length() <= config.flock_distance {
        return Vec2::ZERO;
    }
    to_center
        .normalized()
        .map_or(Vec2::ZERO, |dir| dir * creature.genome.approach_ally * config.flock_weight)
}

fn territory_force(creature: &Creature, config: &SteeringConfig) -> Vec2 {
    let territoriality = creature.genome.territoriality;
    if territoriality <= config.territory_min {
        return Vec2::ZERO;
    }
    let radius = config.territory_base_radius + (1.0 - territoriality) * config.territory_radius_span;
    let to_home = creature.home - creature.position;
    let distance = to_home.length();
    if distance <= radius {
        return Vec2::ZERO;
    }
    let overflow = (distance - radius) / radius;
    to_home
        .normalized()
        .map_or(Vec2::ZERO, |dir| dir * territoriality * overflow * config.territory_weight)
}

/// Soft push back toward the field once inside the edge margin.
fn border_force(position: Vec2, world: &World, config: &SteeringConfig) -> Vec2 {
    let margin = config.border_margin;
    let mut force = Vec2::ZERO;
    if position.x < margin {
        force.x += (margin - position.x) * config.border_weight;
    }
    if position.x > world.width() - margin {
        force.x -= (position.x - (world.width() - margin)) * config.border_weight;
    }
    if position.y < margin {
        force.y += (margin - position.y) * config.border_weight;
    }
    if position.y > world.height() - margin {
        force.y -= (position.y - (world.height() - margin)) * config.border_weight;
    }
    force
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::creature::genome::ObstacleStrategy;
    use crate::creature::params::Vision;
    use crate::creature::tests::creature;
    use crate::world::geometry::Rect;
    use crate::world::obstacle::ObstacleKind;
    use std::f64::consts::PI;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open_world() -> World {
        World::new(1000.0, 1000.0)
    }

    fn snapshot(creatures: &[Creature]) -> Vec<CreatureSnapshot> {
        creatures.iter().map(CreatureSnapshot::from).collect()
    }

    /// Strip the random terms so forces are deterministic.
    fn calm(mut c: Creature) -> Creature {
        c.genome.curiosity = 0.0;
        c.genome.obstacle_strategy = ObstacleStrategy::Ignore;
        c
    }

    fn all_round(mut c: Creature, range: f64) -> Creature {
        c.vision = Vision { angle: TAU, range };
        c
    }

    /// Forager with no fighting spirit unless a test gives it some.
    fn timid_forager(energy: f64) -> Creature {
        let mut prey = calm(all_round(creature(1, Species::Forager, Vec2::new(500.0, 500.0), energy), 200.0));
        prey.genome.counter_attack = 0.0;
        prey.genome.bravery = 0.0;
        prey.genome.stealth_attack = 0.0;
        prey.genome.flee_when_weak = 0.0;
        prey
    }

    fn scan_of(creature: &Creature, others: &[Creature], world: &World) -> Scan {
        let config = Config::default().steering;
        let snap = snapshot(others);
        let surroundings = Surroundings { creatures: &snap, world, tick: 0 };
        let mut scan = Scan::default();
        scan_creatures(creature, &surroundings, &config, &mut scan);
        scan
    }

    #[test]
    fn test_retreat_short_circuits() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(1);
        let world = open_world();
        let mut c = creature(1, Species::Pursuer, Vec2::new(500.0, 500.0), 40.0);
        c.home = Vec2::new(500.0, 400.0);
        c.combat.retreating = true;

        let surroundings = Surroundings { creatures: &[], world: &world, tick: 0 };
        let force = steering_force(&c, &surroundings, &config, &mut rng);
        assert!((force.y + 1.5).abs() < 1e-9);
        assert!(force.x.abs() < 1e-9);

        c.position = Vec2::new(505.0, 400.0);
        let force = steering_force(&c, &surroundings, &config, &mut rng);
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_pursuer_chases_forager() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(2);
        let world = open_world();
        let mut hunter = calm(creature(1, Species::Pursuer, Vec2::new(500.0, 500.0), 100.0));
        hunter.facing = 0.0;
        hunter.genome.aggressiveness = 1.0;
        let prey = creature(2, Species::Forager, Vec2::new(560.0, 500.0), 100.0);

        let all = vec![hunter.clone(), prey];
        let snap = snapshot(&all);
        let surroundings = Surroundings { creatures: &snap, world: &world, tick: 0 };
        let force = steering_force(&hunter, &surroundings, &config, &mut rng);
        assert!(force.x > 0.5);
    }

    #[test]
    fn test_forager_flees_pursuer() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(3);
        let world = open_world();
        let mut prey = calm(creature(1, Species::Forager, Vec2::new(500.0, 500.0), 60.0));
        prey.genome.counter_attack = 0.0;
        prey.genome.bravery = 0.0;
        prey.genome.stealth_attack = 0.0;
        let mut hunter = creature(2, Species::Pursuer, Vec2::new(540.0, 500.0), 100.0);
        // hunter faces the forager, so no rear-arc chance
        hunter.facing = std::f64::consts::PI;

        let all = vec![prey.clone(), hunter];
        let snap = snapshot(&all);
        let surroundings = Surroundings { creatures: &snap, world: &world, tick: 0 };
        let force = steering_force(&prey, &surroundings, &config, &mut rng);
        assert!(force.x < -0.8, "flee plus emergency term: {:?}", force);
    }

    #[test]
    fn test_forager_charges_vulnerable_pursuer() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(4);
        let world = open_world();
        let prey = calm(creature(1, Species::Forager, Vec2::new(500.0, 500.0), 100.0));
        let mut hunter = creature(2, Species::Pursuer, Vec2::new(450.0, 500.0), 40.0);
        hunter.combat.vulnerable = true;
        hunter.facing = 0.0;

        let all = vec![prey.clone(), hunter];
        let snap = snapshot(&all);
        let surroundings = Surroundings { creatures: &snap, world: &world, tick: 0 };
        let force = steering_force(&prey, &surroundings, &config, &mut rng);
        // charge of 1.2 toward the west outweighs the 0.25 emergency push
        assert!(force.x < 0.0);
    }

    #[test]
    fn test_forager_seeks_plant() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(5);
        let mut world = open_world();
        world.plants.push(crate::world::plant::Plant::new(
            0,
            Vec2::new(500.0, 540.0),
            10.0,
            4.0,
            100,
        ));
        let prey = calm(creature(1, Species::Forager, Vec2::new(500.0, 500.0), 20.0));

        let surroundings = Surroundings { creatures: &[], world: &world, tick: 0 };
        let force = steering_force(&prey, &surroundings, &config, &mut rng);
        assert!((force.y - 0.8 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_border_force() {
        let config = Config::default().steering;
        let world = open_world();
        let push = border_force(Vec2::new(10.0, 995.0), &world, &config);
        assert!((push.x - 30.0 * 0.15).abs() < 1e-9);
        assert!((push.y + 35.0 * 0.15).abs() < 1e-9);
        assert_eq!(border_force(Vec2::new(500.0, 500.0), &world, &config), Vec2::ZERO);
    }

    #[test]
    fn test_territory_pull() {
        let config = Config::default().steering;
        let mut roamer = creature(1, Species::Roamer, Vec2::new(500.0, 500.0), 100.0);
        roamer.genome.territoriality = 1.0;
        roamer.home = Vec2::new(300.0, 500.0);
        // radius 100, overflow ratio 1.0
        let force = territory_force(&roamer, &config);
        assert!((force.x + 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_stall_never_freezes() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(6);
        let world = open_world();
        let c = calm(creature(1, Species::Forager, Vec2::new(500.0, 500.0), 100.0));
        let surroundings = Surroundings { creatures: &[], world: &world, tick: 0 };
        for _ in 0..20 {
            let force = steering_force(&c, &surroundings, &config, &mut rng);
            assert!(force.length() >= 0.25);
        }
    }

    #[test]
    fn test_remembered_attacker_keeps_forager_fleeing() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(7);
        let world = open_world();
        let mut prey = calm(creature(1, Species::Forager, Vec2::new(500.0, 500.0), 100.0));
        prey.combat.track(Vec2::new(600.0, 500.0), 100);

        let surroundings = Surroundings { creatures: &[], world: &world, tick: 10 };
        let force = steering_force(&prey, &surroundings, &config, &mut rng);
        assert!(force.x < 0.0);

        let later = Surroundings { creatures: &[], world: &world, tick: 100 };
        let force = steering_force(&prey, &later, &config, &mut rng);
        assert!(force.length() < 0.4);
    }

    #[test]
    fn test_brave_creature_turns_on_its_attacker() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(8);
        let world = open_world();
        let mut hunter = calm(creature(1, Species::Pursuer, Vec2::new(500.0, 500.0), 100.0));
        // the attacker is out of sight, only the memory of the hit acts
        hunter.vision = Vision { angle: TAU, range: 50.0 };
        hunter.genome.bravery = 0.5;
        hunter.genome.counter_attack = 0.5;
        hunter.genome.panic_threshold = 0.2;
        hunter.combat.record_attack(2, 5);
        let attacker = creature(2, Species::Forager, Vec2::new(600.0, 500.0), 100.0);

        let all = vec![hunter.clone(), attacker];
        let snap = snapshot(&all);
        let surroundings = Surroundings { creatures: &snap, world: &world, tick: 10 };
        let force = steering_force(&hunter, &surroundings, &config, &mut rng);
        // 0.3 + |1.0 - 0.2| * 0.8
        assert!((force.x - 0.94).abs() < 1e-9, "{:?}", force);
        assert!(force.y.abs() < 1e-9);
    }

    #[test]
    fn test_timid_or_weak_creature_panics_away_from_attacker() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(9);
        let world = open_world();
        let mut hunter = calm(creature(1, Species::Pursuer, Vec2::new(500.0, 500.0), 100.0));
        hunter.vision = Vision { angle: TAU, range: 50.0 };
        hunter.genome.bravery = 0.0;
        hunter.genome.counter_attack = 0.0;
        hunter.genome.panic_threshold = 0.8;
        hunter.combat.record_attack(2, 5);
        let attacker = creature(2, Species::Forager, Vec2::new(600.0, 500.0), 100.0);

        let all = vec![hunter.clone(), attacker];
        let snap = snapshot(&all);
        let surroundings = Surroundings { creatures: &snap, world: &world, tick: 10 };
        let force = steering_force(&hunter, &surroundings, &config, &mut rng);
        assert!((force.x + 0.94).abs() < 1e-9, "{:?}", force);

        // courage is not enough without the energy to back it
        hunter.genome.bravery = 1.0;
        hunter.metabolism.take_damage(60.0);
        let force = steering_force(&hunter, &surroundings, &config, &mut rng);
        // 0.3 + |1.0 - 0.8| * 0.8, away from the attacker
        assert!((force.x + 0.46).abs() < 1e-9, "{:?}", force);

        // the memory fades
        let later = Surroundings { creatures: &snap, world: &world, tick: 100 };
        let force = attack_reaction(&hunter, &later, &config);
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_stealthy_forager_closes_on_pursuer_rear() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(10);
        let world = open_world();
        let mut prey = timid_forager(100.0);
        prey.genome.stealth_attack = 0.8;
        let mut hunter = creature(2, Species::Pursuer, Vec2::new(600.0, 500.0), 100.0);
        // looking away, so the forager sits in its rear arc
        hunter.facing = 0.0;

        let all = vec![prey.clone(), hunter.clone()];
        let snap = snapshot(&all);
        let surroundings = Surroundings { creatures: &snap, world: &world, tick: 0 };
        let force = steering_force(&prey, &surroundings, &config, &mut rng);
        // 0.8 * sqrt(0.5) * 1.2
        assert!(force.x > 0.6, "{:?}", force);
        assert!(force.y.abs() < 1e-9);

        // facing the forager there is no opening and it runs instead
        hunter.facing = PI;
        let all = vec![prey.clone(), hunter];
        let snap = snapshot(&all);
        let surroundings = Surroundings { creatures: &snap, world: &world, tick: 0 };
        let force = steering_force(&prey, &surroundings, &config, &mut rng);
        assert!(force.x < -0.5, "{:?}", force);
    }

    #[test]
    fn test_counter_minded_forager_flanks() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(11);
        let world = open_world();
        let mut prey = timid_forager(100.0);
        prey.genome.counter_attack = 1.0;
        let mut hunter = creature(2, Species::Pursuer, Vec2::new(570.0, 500.0), 100.0);
        hunter.facing = PI;

        let all = vec![prey.clone(), hunter];
        let snap = snapshot(&all);
        let surroundings = Surroundings { creatures: &snap, world: &world, tick: 0 };
        let force = steering_force(&prey, &surroundings, &config, &mut rng);
        // sideways only: 1.0 * sqrt(0.65) * 0.5
        assert!(force.x.abs() < 1e-9, "{:?}", force);
        assert!(force.y > 0.35, "{:?}", force);
    }

    #[test]
    fn test_low_energy_adds_panic_to_flight() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(12);
        let world = open_world();
        let mut hunter = creature(2, Species::Pursuer, Vec2::new(600.0, 500.0), 100.0);
        hunter.facing = PI;

        let flee_x = |prey: Creature, rng: &mut StdRng| {
            let all = vec![prey.clone(), hunter.clone()];
            let snap = snapshot(&all);
            let surroundings = Surroundings { creatures: &snap, world: &world, tick: 0 };
            steering_force(&prey, &surroundings, &config, rng).x
        };

        let steady = flee_x(timid_forager(60.0), &mut rng);
        let panicked = flee_x(timid_forager(30.0), &mut rng);
        // flee sqrt(0.5) * 0.8, panic adds 0.4 * sqrt(0.5) * 0.5
        assert!((steady + 0.8 * 0.5f64.sqrt()).abs() < 1e-9, "{}", steady);
        assert!((panicked - steady + 0.2 * 0.5f64.sqrt()).abs() < 1e-9, "{}", panicked);
    }

    #[test]
    fn test_nearby_allies_embolden_forager() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(13);
        let world = open_world();
        let mut prey = all_round(timid_forager(100.0), 300.0);
        prey.genome.counter_attack = 0.45;
        prey.facing = PI / 2.0;
        let mut hunter = creature(2, Species::Pursuer, Vec2::new(565.0, 500.0), 100.0);
        hunter.facing = PI;

        let alone = vec![prey.clone(), hunter.clone()];
        let snap = snapshot(&alone);
        let surroundings = Surroundings { creatures: &snap, world: &world, tick: 0 };
        let force = steering_force(&prey, &surroundings, &config, &mut rng);
        assert!(force.x < -0.5, "alone it flees: {:?}", force);

        let mut herd = alone;
        for (id, x, y) in [(3, 450.0, 520.0), (4, 450.0, 480.0), (5, 480.0, 540.0)] {
            herd.push(creature(id, Species::Forager, Vec2::new(x, y), 100.0));
        }
        let snap = snapshot(&herd);
        let surroundings = Surroundings { creatures: &snap, world: &world, tick: 0 };
        let force = steering_force(&prey, &surroundings, &config, &mut rng);
        // bonus 0.3 lifts counter tendency over 0.5, so it flanks
        assert!(force.x.abs() < 0.05, "with allies it holds: {:?}", force);
        assert!(force.y > 0.3, "{:?}", force);
    }

    #[test]
    fn test_hungry_pursuer_hunts_its_own_kind() {
        let world = open_world();
        let mut hunter = calm(all_round(creature(1, Species::Pursuer, Vec2::new(500.0, 500.0), 30.0), 200.0));
        hunter.genome.approach_ally = -0.3;
        let other = creature(2, Species::Pursuer, Vec2::new(600.0, 500.0), 100.0);
        let all = vec![hunter.clone(), other];

        let scan = scan_of(&hunter, &all, &world);
        // hunger 0.5 * sqrt(0.5) * 0.3
        assert!((scan.force.x - 0.15 * 0.5f64.sqrt()).abs() < 1e-9, "{:?}", scan.force);
        assert_eq!(scan.ally_count, 1);

        hunter.gain_energy(70.0);
        let scan = scan_of(&hunter, &all, &world);
        assert!(scan.force.x < 0.0, "fed pursuers keep their distance: {:?}", scan.force);
    }

    #[test]
    fn test_roamer_separation_and_cohesion() {
        let world = open_world();
        let mut roamer = calm(all_round(creature(1, Species::Roamer, Vec2::new(500.0, 500.0), 100.0), 200.0));
        roamer.genome.approach_ally = 0.5;

        let crowded = vec![roamer.clone(), creature(2, Species::Roamer, Vec2::new(520.0, 500.0), 100.0)];
        let scan = scan_of(&roamer, &crowded, &world);
        assert!((scan.force.x + 10.0 / 30.0 * 0.5).abs() < 1e-9, "{:?}", scan.force);

        let spread = vec![roamer.clone(), creature(2, Species::Roamer, Vec2::new(600.0, 500.0), 100.0)];
        let scan = scan_of(&roamer, &spread, &world);
        assert!(scan.force.x > 0.1, "{:?}", scan.force);
    }

    #[test]
    fn test_roamer_chases_foragers_only_when_hungry() {
        let world = open_world();
        let mut roamer = calm(all_round(creature(1, Species::Roamer, Vec2::new(500.0, 500.0), 40.0), 200.0));
        roamer.genome.aggressiveness = 1.0;
        let all = vec![roamer.clone(), creature(2, Species::Forager, Vec2::new(600.0, 500.0), 100.0)];

        let scan = scan_of(&roamer, &all, &world);
        // hunger 0.6 * sqrt(0.5) * 1.2
        assert!((scan.force.x - 0.72 * 0.5f64.sqrt()).abs() < 1e-9, "{:?}", scan.force);
        assert!(scan.saw_target);

        roamer.gain_energy(60.0);
        let scan = scan_of(&roamer, &all, &world);
        assert_eq!(scan.force, Vec2::ZERO);
        assert!(!scan.saw_target);
    }

    #[test]
    fn test_flock_pulls_toward_distant_centroid() {
        let config = Config::default().steering;
        let mut roamer = creature(1, Species::Roamer, Vec2::new(500.0, 500.0), 100.0);
        roamer.genome.approach_ally = 0.8;

        let far = Scan {
            ally_sum: Vec2::new(1200.0, 1000.0),
            ally_count: 2,
            ..Scan::default()
        };
        let force = flock_force(&roamer, &far, &config);
        assert!((force.x - 0.8 * 0.15).abs() < 1e-9, "{:?}", force);

        let near = Scan {
            ally_sum: Vec2::new(1040.0, 1000.0),
            ally_count: 2,
            ..Scan::default()
        };
        assert_eq!(flock_force(&roamer, &near, &config), Vec2::ZERO);

        roamer.genome.approach_ally = -0.5;
        assert_eq!(flock_force(&roamer, &far, &config), Vec2::ZERO);
    }

    #[test]
    fn test_emergency_flee_inside_radius() {
        let config = Config::default().steering;
        let mut rng = StdRng::seed_from_u64(14);
        let world = open_world();
        let mut prey = timid_forager(100.0);
        // flanking has no x component, so any x push is the emergency term
        prey.genome.counter_attack = 1.0;

        let force_with_hunter_at = |x: f64, rng: &mut StdRng| {
            let mut hunter = creature(2, Species::Pursuer, Vec2::new(x, 500.0), 100.0);
            hunter.facing = PI;
            let all = vec![prey.clone(), hunter];
            let snap = snapshot(&all);
            let surroundings = Surroundings { creatures: &snap, world: &world, tick: 0 };
            steering_force(&prey, &surroundings, &config, rng)
        };

        let close = force_with_hunter_at(540.0, &mut rng);
        // (60 - 40) / 60 * 1.5
        assert!((close.x + 0.5).abs() < 1e-9, "{:?}", close);

        let outside = force_with_hunter_at(570.0, &mut rng);
        assert!(outside.x.abs() < 1e-9, "{:?}", outside);
    }

    #[test]
    fn test_occlusion_gate_hides_targets_behind_obstacles() {
        let mut world = open_world();
        world
            .obstacles
            .push(Obstacle::new(0, ObstacleKind::Rock, Rect::new(580.0, 450.0, 40.0, 100.0)));
        let mut hunter = calm(all_round(creature(1, Species::Pursuer, Vec2::new(500.0, 500.0), 100.0), 300.0));
        let all = vec![hunter.clone(), creature(2, Species::Forager, Vec2::new(700.0, 500.0), 100.0)];

        hunter.genome.ignore_obstacle_blocked_targets = true;
        let scan = scan_of(&hunter, &all, &world);
        assert_eq!(scan.force, Vec2::ZERO);
        assert!(!scan.saw_target);

        hunter.genome.ignore_obstacle_blocked_targets = false;
        let scan = scan_of(&hunter, &all, &world);
        assert!(scan.force.x > 0.0);
        assert!(scan.saw_target);
    }
}
