use super::attributes::Attributes;
use super::genome::Genome;
use super::params::CreatureParams;
use super::Creature;
use crate::config::ReproductionConfig;
use crate::evolution::mutation::pick;
use crate::world::geometry::Vec2;
use crate::world::World;
use rand::Rng;

fn jitter<R: Rng>(origin: Vec2, spread: f64, rng: &mut R) -> Vec2 {
    origin
        + Vec2::new(
            (rng.gen::<f64>() - 0.5) * spread * 2.0,
            (rng.gen::<f64>() - 0.5) * spread * 2.0,
        )
}

impl Creature {
    pub fn can_mate(&self, partner: &Creature, config: &ReproductionConfig) -> bool {
        self.species == partner.species
            && self.species.can_breed()
            && self.id != partner.id
            && self.reproduction_cooldown <= 0
            && partner.reproduction_cooldown <= 0
            && self.energy() > config.min_energy
            && partner.energy() > config.min_energy
            && self.pairings_with(partner.id) < config.max_pairings
            && partner.pairings_with(self.id) < config.max_pairings
    }

    /// Plant points needed to split; more social creatures split cheaper.
    pub fn split_requirement(&self, config: &ReproductionConfig) -> u32 {
        let discount = (self.attributes.social * config.split_social_factor).floor() as u32;
        config
            .split_base_requirement
            .saturating_sub(discount)
            .max(config.split_min_requirement)
    }

    pub fn can_split(&self, config: &ReproductionConfig) -> bool {
        self.species.can_split()
            && self.split_cooldown <= 0
            && self.plant_points >= self.split_requirement(config)
            && self.energy() > config.split_min_energy
    }

    /// Asexual split. The parent pays points and energy; the clone keeps the
    /// lineage tag and starts with no points.
    pub fn split<R: Rng>(
        &mut self,
        clone_id: u64,
        config: &ReproductionConfig,
        world: &World,
        rng: &mut R,
    ) -> Option<Creature> {
        if !self.can_split(config) {
            return None;
        }

        let burst = rng.gen::<f64>() < config.split_burst_chance;
        let (attr_spread, genome_spread) = if burst {
            (config.split_burst_attribute_spread, config.split_burst_genome_spread)
        } else {
            (config.split_attribute_spread, config.split_genome_spread)
        };

        let attributes = self.attributes.mutated(attr_spread / 2.0, rng);
        let genome = self.genome.mutated(genome_spread / 2.0, rng);
        let position = world.clamp(jitter(self.position, config.clone_spread, rng));
        let energy = config.clone_base_energy + attributes.size * config.clone_size_energy;

        let params = CreatureParams {
            name: format!("{} sprout", self.name),
            author: self.author.clone(),
            species: self.species,
            type_id: self.type_id.clone(),
            attributes,
            genome,
            vision: None,
            appearance: self.appearance.clone(),
            lifestyle: self.lifestyle,
        };
        let mut clone = Creature::from_params(
            clone_id,
            params,
            position,
            energy,
            self.metabolism.max_energy(),
            rng,
        );
        clone.split_cooldown = config.split_cooldown_ticks;

        let requirement = self.split_requirement(config);
        self.plant_points -= requirement;
        self.consume_energy(config.split_energy_cost);
        self.split_cooldown = config.split_cooldown_ticks;

        if burst {
            log::debug!("Creature {} split with a mutation burst", self.id);
        }

        Some(clone)
    }
}

/// Sexual reproduction between two creatures. Both parents pay energy and a
/// cooldown, and their pairing counters increase.
pub fn mate<R: Rng>(
    a: &mut Creature,
    b: &mut Creature,
    child_id: u64,
    config: &ReproductionConfig,
    world: &World,
    rng: &mut R,
) -> Option<Creature> {
    if !a.can_mate(b, config) {
        return None;
    }

    let attributes = Attributes::blend(&a.attributes, &b.attributes, config.attribute_noise, rng);
    let genome = Genome::blend(
        &a.genome,
        &b.genome,
        config.primary_genome_noise,
        config.genome_noise,
        config.flag_flip_chance,
        rng,
    );
    let appearance = pick(&a.appearance, &b.appearance, rng).inherited(config, rng);
    let lifestyle = *pick(&a.lifestyle, &b.lifestyle, rng);
    let position = world.clamp(jitter(a.position, config.offspring_spread, rng));

    let params = CreatureParams {
        name: format!("{} Jr", a.name),
        author: a.author.clone(),
        species: a.species,
        type_id: a.type_id.clone(),
        attributes,
        genome,
        vision: None,
        appearance,
        lifestyle,
    };
    let mut child = Creature::from_params(
        child_id,
        params,
        position,
        config.offspring_energy,
        a.metabolism.max_energy(),
        rng,
    );
    child.reproduction_cooldown = config.cooldown_ticks;

    let (a_id, b_id) = (a.id, b.id);
    for (parent, partner) in [(a, b_id), (b, a_id)] {
        parent.consume_energy(config.energy_cost);
        parent.reproduction_cooldown = config.cooldown_ticks;
        parent.record_pairing(partner, config.max_pairings);
    }

    Some(child)
}
