//! ACO-backed vehicle routing.

use rand::Rng;

use super::config::AcoConfig;
use super::graph::{ColonyGraph, NodeKind};
use super::runner::{run_colony, AntSolution, ColonyResult};
use crate::cost::{DistanceMetric, Euclidean};
use crate::error::OptimizeError;
use crate::plan::{Ledger, Plan};
use crate::random::create_rng;
use crate::snapshot::Snapshot;
use crate::strategy::Optimizer;

/// Routes vehicles with an ant colony and decodes the best colony into a
/// vehicle-keyed [`Plan`].
#[derive(Debug, Clone)]
pub struct AntColonyOptimizer<M = Euclidean> {
    config: AcoConfig,
    metric: M,
}

impl AntColonyOptimizer {
    pub fn new(config: AcoConfig) -> Self {
        Self {
            config,
            metric: Euclidean,
        }
    }
}

impl Default for AntColonyOptimizer {
    fn default() -> Self {
        Self::new(AcoConfig::default())
    }
}

impl<M: DistanceMetric> AntColonyOptimizer<M> {
    /// Replaces the distance function.
    pub fn with_metric<N: DistanceMetric>(self, metric: N) -> AntColonyOptimizer<N> {
        AntColonyOptimizer {
            config: self.config,
            metric,
        }
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    /// Runs the colony, returning the plan and the raw colony result
    /// (`None` when nothing was eligible to route).
    pub fn search<R: Rng>(
        &self,
        snapshot: &Snapshot,
        rng: &mut R,
    ) -> Result<(Plan, Option<ColonyResult>), OptimizeError> {
        self.config.validate()?;
        if snapshot.is_degenerate() {
            return Ok((Plan::empty_by_vehicle(snapshot), None));
        }

        let mut graph = ColonyGraph::build(snapshot, &self.config, &self.metric);
        if graph.pick_count() == 0 {
            tracing::info!(step = snapshot.step, "no items far enough from expiry to route");
            return Ok((Plan::empty_by_vehicle(snapshot), None));
        }

        let result = match self.config.seed {
            Some(seed) => run_colony(&mut graph, snapshot, &self.config, &mut create_rng(seed)),
            None => run_colony(&mut graph, snapshot, &self.config, rng),
        };
        let Some(result) = result else {
            return Ok((Plan::empty_by_vehicle(snapshot), None));
        };

        let plan = decode(snapshot, &graph, &result.best);
        tracing::info!(
            step = snapshot.step,
            nodes = graph.len(),
            iterations = result.iterations,
            stopped_early = result.stopped_early,
            best_score = result.best.score,
            assignments = plan.len(),
            assigned_kg = plan.total_kg,
            "ant colony optimization finished"
        );
        Ok((plan, Some(result)))
    }
}

impl<M: DistanceMetric> Optimizer for AntColonyOptimizer<M> {
    fn name(&self) -> &str {
        "ant-colony"
    }

    fn optimize<R: Rng>(&self, snapshot: &Snapshot, rng: &mut R) -> Result<Plan, OptimizeError> {
        self.search(snapshot, rng).map(|(plan, _)| plan)
    }
}

/// Turns an ant's routes into a plan.
///
/// Each accepted pick is paired with the next drop on the same route. A
/// pick whose full quantity would overload the vehicle is skipped, as is a
/// drop with no pending pick. Quantities are clamped to the recipient's
/// remaining demand.
pub fn decode(snapshot: &Snapshot, graph: &ColonyGraph, solution: &AntSolution) -> Plan {
    let mut ledger = Ledger::by_vehicle(snapshot);
    let mut emitted = 0usize;

    for (k, route) in solution.routes.iter().enumerate().take(snapshot.vehicles.len()) {
        let vehicle = &snapshot.vehicles[k];
        let mut load = 0.0;
        let mut pending: Option<usize> = None;

        for &node in route {
            match graph.node(node) {
                NodeKind::Pick(i) => {
                    let kg = snapshot.candidates[i].item.quantity_kg;
                    if load + kg > vehicle.capacity_kg {
                        tracing::debug!(
                            vehicle = %vehicle.id,
                            item = %snapshot.candidates[i].item.id,
                            load,
                            kg,
                            "skipping pick over capacity"
                        );
                        pending = None;
                        continue;
                    }
                    load += kg;
                    pending = Some(i);
                }
                NodeKind::Drop(j) => {
                    let Some(i) = pending.take() else {
                        continue;
                    };
                    let derived_id = format!(
                        "{}_aco_{}_{}",
                        snapshot.candidates[i].item.id, snapshot.step, emitted
                    );
                    if ledger.commit(i, j, Some(k), ledger.item_left(i), derived_id) > 0.0 {
                        emitted += 1;
                    }
                }
            }
        }
    }

    ledger.finish()
}
