//! Pairwise contact resolution: mating first, then combat by species role.

use super::events::{ScoreEvent, ScoreKind};
use crate::config::{CombatConfig, Config};
use crate::creature::perception::is_behind;
use crate::creature::reproduction::mate;
use crate::creature::Creature;
use crate::world::geometry::Vec2;
use crate::world::World;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attack {
    Backstab,
    Catch,
}

pub fn in_contact(a: &Creature, b: &Creature, factor: f64) -> bool {
    a.position.distance(b.position) < (a.attributes.size + b.attributes.size) * factor
}

/// Resolve one touching pair. Returns an offspring when the pair mated; in
/// that case no combat happens between them this tick.
#[allow(clippy::too_many_arguments)]
pub fn interact<R: Rng>(
    a: &mut Creature,
    b: &mut Creature,
    child_id: u64,
    config: &Config,
    world: &World,
    tick: u64,
    events: &mut Vec<ScoreEvent>,
    rng: &mut R,
) -> Option<Creature> {
    if a.can_mate(b, &config.reproduction) {
        let child = mate(a, b, child_id, &config.reproduction, world, rng);
        if child.is_some() {
            log::debug!("Creatures {} and {} produced offspring {}", a.id, b.id, child_id);
        }
        return child;
    }

    arm_counter(a, b, &config.combat);
    arm_counter(b, a, &config.combat);

    match choose_attack(a, b) {
        Some((true, Attack::Backstab)) => backstab(a, b, &config.combat, tick, events),
        Some((false, Attack::Backstab)) => backstab(b, a, &config.combat, tick, events),
        Some((true, Attack::Catch)) => catch(a, b, &config.combat, tick, events),
        Some((false, Attack::Catch)) => catch(b, a, &config.combat, tick, events),
        None => {}
    }
    None
}

/// Prey standing its ground against a catcher is counter-attacking.
fn arm_counter(prey: &mut Creature, other: &Creature, config: &CombatConfig) {
    if !other.species.can_catch(prey.species) {
        return;
    }
    let genome = &prey.genome;
    prey.combat.counter_attacking = (genome.counter_attack > config.counter_trigger_tendency
        || genome.bravery > config.counter_trigger_bravery)
        && prey.energy() > config.counter_trigger_energy;
}

/// First applicable attack; the bool is true when `a` is the attacker.
fn choose_attack(a: &Creature, b: &Creature) -> Option<(bool, Attack)> {
    let stabs = |attacker: &Creature, target: &Creature| {
        attacker.species.can_backstab(target.species)
            && is_behind(attacker.position, target.position, target.facing)
    };

    if stabs(a, b) {
        Some((true, Attack::Backstab))
    } else if stabs(b, a) {
        Some((false, Attack::Backstab))
    } else if a.species.can_catch(b.species) {
        Some((true, Attack::Catch))
    } else if b.species.can_catch(a.species) {
        Some((false, Attack::Catch))
    } else {
        None
    }
}

fn backstab(attacker: &mut Creature, target: &mut Creature, config: &CombatConfig, tick: u64, events: &mut Vec<ScoreEvent>) {
    let vulnerable = target.combat.vulnerable;
    let mut damage = config.backstab_base_damage
        + attacker.attributes.strength * config.backstab_strength_factor
        + attacker.genome.stealth_attack * config.backstab_stealth_factor;
    let points = if vulnerable {
        damage += config.vulnerable_bonus_damage;
        config.backstab_vulnerable_points
    } else {
        config.backstab_points
    };

    target.metabolism.take_damage(damage);
    attacker.survival_points += points;
    events.push(ScoreEvent::new(attacker, ScoreKind::Backstab, points, tick));
    log::debug!(
        "Creature {} stabbed {} from behind for {:.1}{}",
        attacker.id,
        target.id,
        damage,
        if vulnerable { " while vulnerable" } else { "" }
    );

    on_damaged(target, attacker, config, tick);
    knock_back(target, attacker.position, config.knockback);
}

/// Damage dealt by a catch: strength-scaled, reduced by the prey's size.
pub fn catch_damage(catcher: &Creature, prey: &Creature, config: &CombatConfig) -> f64 {
    let base = config.catch_base_damage + catcher.attributes.strength * config.catch_strength_factor;
    (base * (1.0 - prey.attributes.size * config.size_defense_factor)).floor()
}

fn catch(catcher: &mut Creature, prey: &mut Creature, config: &CombatConfig, tick: u64, events: &mut Vec<ScoreEvent>) {
    let damage = catch_damage(catcher, prey, config);
    prey.metabolism.take_damage(damage);

    let counter = if prey.combat.counter_attacking {
        let counter = config.counter_base_damage
            + prey.attributes.strength
            + prey.genome.counter_attack * config.counter_tendency_factor;
        prey.survival_points += config.counter_points;
        events.push(ScoreEvent::new(prey, ScoreKind::CounterAttack, config.counter_points, tick));
        counter
    } else {
        0.0
    };

    let net = config.catch_energy_gain - counter;
    if net >= 0.0 {
        catcher.gain_energy(net);
    } else {
        catcher.metabolism.take_damage(-net);
    }

    on_damaged(prey, catcher, config, tick);
    let toward_prey = prey.position;
    knock_back(prey, catcher.position, config.knockback);

    if counter > 0.0 {
        on_damaged(catcher, prey, config, tick);
        knock_back(catcher, toward_prey, config.knockback);
    }

    // a sturdy prey bounces the catcher away
    let repel = config.repel_knockback_base + prey.attributes.size * config.repel_knockback_size;
    knock_back(catcher, toward_prey, repel);
}

/// Bookkeeping for the creature that just took damage from `attacker`.
fn on_damaged(target: &mut Creature, attacker: &Creature, config: &CombatConfig, tick: u64) {
    target.combat.record_attack(attacker.id, tick);

    if target.species.retreats_when_wounded() && target.energy() <= config.retreat_energy_threshold {
        target.combat.start_retreat(tick, config.vulnerable_ticks);
        log::debug!("Creature {} is wounded and retreating home", target.id);
    }

    if target.species.tracks_attackers() {
        target.combat.track(attacker.position, tick + config.tracking_ticks);
    }
}

/// Push `target` directly away from `from`.
fn knock_back(target: &mut Creature, from: Vec2, strength: f64) {
    if let Some(dir) = (target.position - from).normalized() {
        target.velocity += dir * strength;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::species::Species;
    use crate::creature::tests::creature;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> World {
        World::new(800.0, 600.0)
    }

    #[test]
    fn test_contact_radius() {
        let mut a = creature(1, Species::Pursuer, Vec2::new(100.0, 100.0), 100.0);
        let mut b = creature(2, Species::Forager, Vec2::new(130.0 - 1e-6, 100.0), 100.0);
        a.attributes.size = 6.0;
        b.attributes.size = 6.0;
        assert!(in_contact(&a, &b, 2.5));
        b.position.x = 130.0;
        assert!(!in_contact(&a, &b, 2.5));
    }

    #[test]
    fn test_catch_damage_with_size_defense() {
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut events = Vec::new();
        let mut hunter = creature(1, Species::Pursuer, Vec2::new(100.0, 100.0), 45.0);
        hunter.attributes.strength = 8.0;
        // facing the prey, so the prey is not in its rear arc
        hunter.facing = 0.0;
        let mut prey = creature(2, Species::Forager, Vec2::new(110.0, 100.0), 100.0);
        prey.attributes.size = 8.0;
        prey.genome.counter_attack = 0.0;
        prey.genome.bravery = 0.0;

        let expected = ((30.0 + 8.0 * 3.0) * (1.0 - 8.0 * 0.03f64)).floor();
        assert_eq!(expected, 41.0);

        let child = interact(&mut hunter, &mut prey, 9, &config, &world(), 10, &mut events, &mut rng);
        assert!(child.is_none());
        assert_eq!(prey.energy(), 100.0 - 41.0);
        assert_eq!(hunter.energy(), 85.0);
        assert_eq!(prey.combat.last_attacked_by, Some(1));
        assert_eq!(prey.combat.tracked_attacker_pos, Some(hunter.position));
        assert_eq!(prey.combat.tracking_until, 310);
        assert!(events.is_empty());
    }

    #[test]
    fn test_counter_attack_punishes_catcher() {
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut events = Vec::new();
        let mut hunter = creature(1, Species::Pursuer, Vec2::new(100.0, 100.0), 20.0);
        hunter.facing = 0.0;
        let mut prey = creature(2, Species::Forager, Vec2::new(110.0, 100.0), 90.0);
        prey.attributes.strength = 2.0;
        prey.genome.counter_attack = 0.6;

        interact(&mut hunter, &mut prey, 9, &config, &world(), 5, &mut events, &mut rng);
        assert!(prey.combat.counter_attacking);
        // 20 + 40 gained - (3 + 2 + 3) counter
        assert!((hunter.energy() - 52.0).abs() < 1e-9);
        assert_eq!(prey.survival_points, 5);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ScoreKind::CounterAttack);
        assert_eq!(hunter.combat.last_attacked_by, Some(2));
        assert!(!hunter.combat.retreating);
    }

    #[test]
    fn test_backstab_sends_pursuer_home() {
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut events = Vec::new();
        // hunter faces east, forager sits behind it to the west
        let mut hunter = creature(1, Species::Pursuer, Vec2::new(100.0, 100.0), 80.0);
        hunter.facing = 0.0;
        let mut prey = creature(2, Species::Forager, Vec2::new(92.0, 100.0), 90.0);
        prey.attributes.strength = 2.5;
        prey.genome.stealth_attack = 0.5;

        interact(&mut prey, &mut hunter, 9, &config, &world(), 40, &mut events, &mut rng);
        // 15 + 5 + 5 damage
        assert!((hunter.energy() - 55.0).abs() < 1e-9);
        assert!(!hunter.combat.retreating);
        assert_eq!(prey.survival_points, 30);
        assert!(hunter.velocity.x > 0.0);

        // second stab drops it to 30, at or below half
        interact(&mut prey, &mut hunter, 9, &config, &world(), 41, &mut events, &mut rng);
        assert!(hunter.combat.retreating);
        assert!(hunter.combat.vulnerable);
        assert_eq!(hunter.combat.vulnerable_until, 41 + 300);

        // stabbing a vulnerable pursuer pays extra
        interact(&mut prey, &mut hunter, 9, &config, &world(), 42, &mut events, &mut rng);
        assert_eq!(prey.survival_points, 30 + 30 + 40);
        assert!(!hunter.is_alive());
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_retreat_at_exactly_half() {
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut events = Vec::new();
        let mut hunter = creature(1, Species::Pursuer, Vec2::new(100.0, 100.0), 75.0);
        hunter.facing = 0.0;
        let mut prey = creature(2, Species::Forager, Vec2::new(92.0, 100.0), 90.0);
        prey.attributes.strength = 2.5;
        prey.genome.stealth_attack = 0.5;

        interact(&mut prey, &mut hunter, 9, &config, &world(), 7, &mut events, &mut rng);
        assert_eq!(hunter.energy(), 50.0);
        assert!(hunter.combat.retreating && hunter.combat.vulnerable);
        assert_eq!(hunter.combat.vulnerable_until, 307);
    }

    #[test]
    fn test_roamers_mate_instead_of_fighting() {
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut events = Vec::new();
        let mut a = creature(1, Species::Roamer, Vec2::new(100.0, 100.0), 90.0);
        let mut b = creature(2, Species::Roamer, Vec2::new(105.0, 100.0), 90.0);

        let child = interact(&mut a, &mut b, 3, &config, &world(), 0, &mut events, &mut rng);
        assert_eq!(child.map(|c| c.id), Some(3));
        assert_eq!(a.energy(), 70.0);
    }

    #[test]
    fn test_same_role_no_effect() {
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut events = Vec::new();
        let mut a = creature(1, Species::Pursuer, Vec2::new(100.0, 100.0), 90.0);
        let mut b = creature(2, Species::Pursuer, Vec2::new(105.0, 100.0), 90.0);

        assert!(interact(&mut a, &mut b, 3, &config, &world(), 0, &mut events, &mut rng).is_none());
        assert_eq!(a.energy(), 90.0);
        assert_eq!(b.energy(), 90.0);
    }
}
