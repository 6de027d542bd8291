//! GA-backed vehicle assignment.

use rand::Rng;

use super::chromosome::AssignmentChromosome;
use super::config::GaConfig;
use super::problem::AssignmentProblem;
use super::runner::{GaResult, GaRunner};
use crate::cost::{DistanceMetric, Euclidean};
use crate::error::OptimizeError;
use crate::plan::{Ledger, Plan, EXHAUSTED_KG};
use crate::random::create_rng;
use crate::snapshot::Snapshot;
use crate::strategy::Optimizer;

/// Evolves assignment chromosomes and decodes the hall-of-fame individual
/// into a vehicle-keyed [`Plan`].
#[derive(Debug, Clone)]
pub struct GeneticOptimizer<M = Euclidean> {
    config: GaConfig,
    metric: M,
}

impl GeneticOptimizer {
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            metric: Euclidean,
        }
    }
}

impl Default for GeneticOptimizer {
    fn default() -> Self {
        Self::new(GaConfig::default())
    }
}

impl<M: DistanceMetric> GeneticOptimizer<M> {
    /// Replaces the distance function.
    pub fn with_metric<N: DistanceMetric>(self, metric: N) -> GeneticOptimizer<N> {
        GeneticOptimizer {
            config: self.config,
            metric,
        }
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the GA and returns the raw result alongside the decoded plan.
    ///
    /// `None` stands for a degenerate snapshot, which yields an empty plan
    /// without running the GA.
    pub fn evolve<R: Rng>(
        &self,
        snapshot: &Snapshot,
        rng: &mut R,
    ) -> Result<(Plan, Option<GaResult<AssignmentChromosome>>), OptimizeError> {
        let config = self.config.sized_for(snapshot.candidates.len());
        config.validate()?;
        if snapshot.is_degenerate() {
            return Ok((Plan::empty_by_vehicle(snapshot), None));
        }

        let problem = AssignmentProblem::new(snapshot, &self.metric);
        let result = match config.seed {
            Some(seed) => GaRunner::run_with_rng(&problem, &config, &mut create_rng(seed))?,
            None => GaRunner::run_with_rng(&problem, &config, rng)?,
        };
        let plan = decode(snapshot, &result.best);

        tracing::info!(
            step = snapshot.step,
            population = config.population_size,
            generations = result.generations,
            best_fitness = result.best_fitness,
            assignments = plan.len(),
            assigned_kg = plan.total_kg,
            "genetic optimization finished"
        );
        Ok((plan, Some(result)))
    }
}

impl<M: DistanceMetric> Optimizer for GeneticOptimizer<M> {
    fn name(&self) -> &str {
        "genetic"
    }

    fn optimize<R: Rng>(&self, snapshot: &Snapshot, rng: &mut R) -> Result<Plan, OptimizeError> {
        self.evolve(snapshot, rng).map(|(plan, _)| plan)
    }
}

/// Turns a chromosome into a plan.
///
/// Genes with out-of-range indices, or repeating an item or vehicle already
/// decoded, are skipped. Quantities are clamped to what is left of the
/// item, the recipient's demand and the vehicle's capacity; a gene left
/// with `EXHAUSTED_KG` or less is skipped.
pub fn decode(snapshot: &Snapshot, chromosome: &AssignmentChromosome) -> Plan {
    let mut ledger = Ledger::by_vehicle(snapshot);
    let mut item_used = vec![false; snapshot.candidates.len()];
    let mut vehicle_used = vec![false; snapshot.vehicles.len()];
    let mut emitted = 0usize;

    for gene in &chromosome.genes {
        if gene.item >= item_used.len()
            || gene.recipient >= snapshot.recipients.len()
            || gene.vehicle >= vehicle_used.len()
        {
            tracing::debug!(?gene, "skipping gene with out-of-range index");
            continue;
        }
        if item_used[gene.item] || vehicle_used[gene.vehicle] {
            tracing::debug!(?gene, "skipping gene reusing an item or vehicle");
            continue;
        }

        let fits = gene
            .quantity_kg
            .min(ledger.item_left(gene.item))
            .min(ledger.demand_left(gene.recipient))
            .min(ledger.capacity_left(gene.vehicle));
        if fits.is_nan() || fits <= EXHAUSTED_KG || ledger.is_reserved(gene.item) {
            tracing::debug!(?gene, fits, "skipping gene with nothing left to carry");
            continue;
        }

        let derived_id = format!(
            "{}_ga_{}_{}",
            snapshot.candidates[gene.item].item.id, snapshot.step, emitted
        );
        if ledger.commit(gene.item, gene.recipient, Some(gene.vehicle), fits, derived_id) > 0.0 {
            item_used[gene.item] = true;
            vehicle_used[gene.vehicle] = true;
            emitted += 1;
        }
    }

    ledger.finish()
}
