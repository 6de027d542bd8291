//! Vehicle assignment as a GA problem.
//!
//! A chromosome lists (item, recipient, vehicle, kg) genes. Sampling keeps
//! items and vehicles unique within an individual; crossover may break
//! that, and the fitness function penalises what it breaks.

use rand::Rng;

use super::chromosome::{AssignmentChromosome, Gene};
use super::types::GaProblem;
use crate::cost::DistanceMetric;
use crate::random::roulette;
use crate::snapshot::Snapshot;

/// Upper bound on genes per chromosome.
const MAX_GENES: usize = 20;

/// Attempts per slot before a sampled gene is given up.
const SAMPLE_RETRIES: usize = 10;

/// Below this total demand, recipients are sampled uniformly.
const LOW_DEMAND_KG: f64 = 30.0;

/// Fitness of a chromosome referencing an index outside the snapshot.
pub const INVALID_INDEX_FITNESS: f64 = 10_000.0;

const DUPLICATE_ITEM_PENALTY: f64 = 1000.0;
const OVERLOAD_PENALTY: f64 = 1000.0;
const UNDERLOAD_PENALTY: f64 = 200.0;
const OVERSUPPLY_PENALTY: f64 = 1000.0;
const UNASSIGNED_PENALTY: f64 = 500.0;
const PERISHABILITY_WEIGHT: f64 = 10.0;
const QUANTITY_REWARD: f64 = 5.0;

/// GA problem over one snapshot.
pub struct AssignmentProblem<'s> {
    snapshot: &'s Snapshot,
    /// Vehicle-to-donor distance, `[vehicle * items + item]`.
    pickup: Vec<f64>,
    /// Donor-to-recipient distance, `[item * recipients + recipient]`.
    delivery: Vec<f64>,
    recipient_weights: Vec<f64>,
    vehicle_weights: Vec<f64>,
    max_genes: usize,
}

impl<'s> AssignmentProblem<'s> {
    pub fn new<M: DistanceMetric + ?Sized>(snapshot: &'s Snapshot, metric: &M) -> Self {
        let items = &snapshot.candidates;
        let recipients = &snapshot.recipients;
        let vehicles = &snapshot.vehicles;

        let pickup = vehicles
            .iter()
            .flat_map(|v| items.iter().map(move |c| metric.distance(v.location, c.donor.location)))
            .collect();
        let delivery = items
            .iter()
            .flat_map(|c| {
                recipients
                    .iter()
                    .map(move |r| metric.distance(c.donor.location, r.location))
            })
            .collect();

        let recipient_weights = if snapshot.total_demand() < LOW_DEMAND_KG {
            recipients
                .iter()
                .map(|r| if r.current_demand > 0.0 { 1.0 } else { 0.0 })
                .collect()
        } else {
            recipients.iter().map(|r| r.current_demand).collect()
        };

        Self {
            snapshot,
            pickup,
            delivery,
            recipient_weights,
            vehicle_weights: vehicles.iter().map(|v| v.capacity_kg).collect(),
            max_genes: items
                .len()
                .min(recipients.len() * vehicles.len())
                .min(MAX_GENES),
        }
    }

    /// Genes per freshly sampled chromosome.
    pub fn max_genes(&self) -> usize {
        self.max_genes
    }

    /// Draws one gene: uniform item, demand-weighted recipient,
    /// capacity-weighted vehicle, and the largest quantity all three allow.
    fn sample_gene<R: Rng>(&self, rng: &mut R) -> Option<Gene> {
        let s = self.snapshot;
        if s.candidates.is_empty() {
            return None;
        }
        let item = rng.random_range(0..s.candidates.len());
        let recipient = roulette(&self.recipient_weights, rng)?;
        let vehicle = roulette(&self.vehicle_weights, rng)?;
        let quantity_kg = s.candidates[item]
            .item
            .quantity_kg
            .min(s.recipients[recipient].current_demand)
            .min(s.vehicles[vehicle].capacity_kg);
        Some(Gene {
            item,
            recipient,
            vehicle,
            quantity_kg,
        })
    }

    /// Samples a gene that fits `chromosome`, ignoring the gene at `skip`
    /// when checking uniqueness.
    fn sample_fitting<R: Rng>(
        &self,
        chromosome: &AssignmentChromosome,
        skip: Option<usize>,
        rng: &mut R,
    ) -> Option<Gene> {
        for _ in 0..SAMPLE_RETRIES {
            let gene = self.sample_gene(rng)?;
            if !chromosome.uses_item(gene.item, skip)
                && !chromosome.uses_vehicle(gene.vehicle, skip)
                && gene.quantity_kg <= self.snapshot.recipients[gene.recipient].current_demand
                && gene.quantity_kg <= self.snapshot.vehicles[gene.vehicle].capacity_kg
            {
                return Some(gene);
            }
        }
        None
    }
}

impl GaProblem for AssignmentProblem<'_> {
    type Individual = AssignmentChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> AssignmentChromosome {
        let mut chromosome = AssignmentChromosome::new(Vec::with_capacity(self.max_genes));
        for _ in 0..self.max_genes {
            if let Some(gene) = self.sample_fitting(&chromosome, None, rng) {
                chromosome.genes.push(gene);
            }
        }
        chromosome
    }

    fn evaluate(&self, chromosome: &AssignmentChromosome) -> f64 {
        let s = self.snapshot;
        let (n_items, n_recipients, n_vehicles) =
            (s.candidates.len(), s.recipients.len(), s.vehicles.len());

        let mut cost = 0.0;
        let mut item_uses = vec![0usize; n_items];
        let mut vehicle_load = vec![0.0; n_vehicles];
        let mut recipient_load = vec![0.0; n_recipients];

        for g in &chromosome.genes {
            if g.item >= n_items || g.recipient >= n_recipients || g.vehicle >= n_vehicles {
                return INVALID_INDEX_FITNESS;
            }
            item_uses[g.item] += 1;
            vehicle_load[g.vehicle] += g.quantity_kg;
            recipient_load[g.recipient] += g.quantity_kg;

            let perishability = s.candidates[g.item].item.perishability_hours.max(1e-6);
            cost += self.pickup[g.vehicle * n_items + g.item]
                + self.delivery[g.item * n_recipients + g.recipient]
                + PERISHABILITY_WEIGHT / perishability
                - QUANTITY_REWARD * g.quantity_kg;
        }

        let mut penalty = 0.0;
        for &uses in &item_uses {
            if uses > 1 {
                penalty += DUPLICATE_ITEM_PENALTY * (uses - 1) as f64;
            }
        }
        for (load, vehicle) in vehicle_load.iter().zip(&s.vehicles) {
            let capacity = vehicle.capacity_kg;
            if *load > capacity {
                penalty += OVERLOAD_PENALTY * (load - capacity);
            }
            if *load < 0.5 * capacity {
                penalty += UNDERLOAD_PENALTY * (capacity - load);
            }
        }
        for (load, recipient) in recipient_load.iter().zip(&s.recipients) {
            let demand = recipient.current_demand;
            if *load > demand {
                penalty += OVERSUPPLY_PENALTY * (load - demand) / (demand + 1e-6);
            }
        }
        let unassigned = item_uses.iter().filter(|&&u| u == 0).count();
        penalty += UNASSIGNED_PENALTY * unassigned as f64;

        cost + penalty
    }

    /// Two-point crossover over the shorter parent's length. Parents with
    /// fewer than two genes are left unchanged.
    fn crossover<R: Rng>(
        &self,
        first: &mut AssignmentChromosome,
        second: &mut AssignmentChromosome,
        rng: &mut R,
    ) {
        let size = first.len().min(second.len());
        if size < 2 {
            return;
        }
        let mut lo = rng.random_range(1..=size);
        let mut hi = rng.random_range(1..size);
        if hi >= lo {
            hi += 1;
        } else {
            std::mem::swap(&mut lo, &mut hi);
        }
        first.genes[lo..hi].swap_with_slice(&mut second.genes[lo..hi]);
    }

    /// Half the time appends a fitting gene; otherwise picks one gene and
    /// either drops it or replaces it with a fitting one.
    fn mutate<R: Rng>(&self, chromosome: &mut AssignmentChromosome, rng: &mut R) {
        if chromosome.is_empty() {
            return;
        }
        if rng.random_bool(0.5) {
            if let Some(gene) = self.sample_fitting(chromosome, None, rng) {
                chromosome.genes.push(gene);
            }
        } else {
            let idx = rng.random_range(0..chromosome.len());
            if rng.random_bool(0.5) {
                chromosome.genes.remove(idx);
            } else if let Some(gene) = self.sample_fitting(chromosome, Some(idx), rng) {
                chromosome.genes[idx] = gene;
            }
        }
    }
}
