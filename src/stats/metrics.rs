use crate::creature::species::{Species, ALL_SPECIES};
use crate::creature::Creature;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Combined points of every living member of one lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageScore {
    pub type_id: String,
    pub members: usize,
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub tick: u64,
    pub population: usize,
    pub species_counts: Vec<(Species, usize)>,
    pub total_energy: f64,
    pub avg_energy: f64,
    pub active_plants: usize,
    pub total_births: u64,
    pub total_deaths: u64,
    pub avg_age: f64,
    pub leading_lineage: Option<LineageScore>,
}

impl SimulationMetrics {
    pub fn compute(tick: u64, creatures: &[Creature], active_plants: usize, total_births: u64, total_deaths: u64) -> Self {
        let population = creatures.len();
        let species_counts = ALL_SPECIES
            .iter()
            .map(|&s| (s, creatures.iter().filter(|c| c.species == s).count()))
            .collect();

        let total_energy: f64 = creatures.iter().map(|c| c.energy()).sum();
        let total_age: u64 = creatures.iter().map(|c| c.age).sum();
        let (avg_energy, avg_age) = if population == 0 {
            (0.0, 0.0)
        } else {
            (total_energy / population as f64, total_age as f64 / population as f64)
        };

        Self {
            tick,
            population,
            species_counts,
            total_energy,
            avg_energy,
            active_plants,
            total_births,
            total_deaths,
            avg_age,
            leading_lineage: leading_lineage(creatures),
        }
    }

    pub fn count(&self, species: Species) -> usize {
        self.species_counts
            .iter()
            .find(|(s, _)| *s == species)
            .map_or(0, |(_, n)| *n)
    }
}

/// Lineage with the most combined points; ties go to the smaller type id so
/// the result is stable.
fn leading_lineage(creatures: &[Creature]) -> Option<LineageScore> {
    let mut lineages: HashMap<&str, (usize, u32)> = HashMap::new();
    for creature in creatures {
        let entry = lineages.entry(creature.type_id.as_str()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += creature.total_points();
    }

    lineages
        .into_iter()
        .max_by(|a, b| a.1 .1.cmp(&b.1 .1).then_with(|| b.0.cmp(a.0)))
        .map(|(type_id, (members, points))| LineageScore {
            type_id: type_id.to_string(),
            members,
            points,
        })
}
