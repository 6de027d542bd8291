//! Assignment chromosome.

use super::types::Individual;

/// One (item, recipient, vehicle, kg) decision, by snapshot index.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gene {
    pub item: usize,
    pub recipient: usize,
    pub vehicle: usize,
    pub quantity_kg: f64,
}

/// A variable-length list of assignment genes.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentChromosome {
    pub genes: Vec<Gene>,
    fitness: f64,
}

impl AssignmentChromosome {
    pub fn new(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            fitness: f64::INFINITY,
        }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Returns `true` if a gene other than `skip` uses `item`.
    pub fn uses_item(&self, item: usize, skip: Option<usize>) -> bool {
        self.genes
            .iter()
            .enumerate()
            .any(|(i, g)| Some(i) != skip && g.item == item)
    }

    /// Returns `true` if a gene other than `skip` uses `vehicle`.
    pub fn uses_vehicle(&self, vehicle: usize, skip: Option<usize>) -> bool {
        self.genes
            .iter()
            .enumerate()
            .any(|(i, g)| Some(i) != skip && g.vehicle == vehicle)
    }
}

impl Individual for AssignmentChromosome {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}
