//! Colony loop.
//!
//! Every ant builds one route per vehicle, in vehicle order, drawing from a
//! node pool shared by all of that ant's vehicles. Routes alternate
//! strictly between pick and drop nodes after the first choice.

use rand::Rng;

use super::config::AcoConfig;
use super::graph::{ColonyGraph, NodeKind};
use crate::cost::fuel_consumption;
use crate::random::roulette;
use crate::snapshot::Snapshot;

/// One ant's routes (node indices, one route per vehicle) and their cost.
#[derive(Debug, Clone, PartialEq)]
pub struct AntSolution {
    pub routes: Vec<Vec<usize>>,
    pub score: f64,
}

/// Outcome of a colony run.
#[derive(Debug, Clone)]
pub struct ColonyResult {
    pub best: AntSolution,
    /// Iterations actually executed.
    pub iterations: usize,
    /// Stopped by the patience counter.
    pub stopped_early: bool,
    /// Global best score after every iteration.
    pub score_history: Vec<f64>,
}

/// Runs the colony over `graph`, which is updated in place.
///
/// Returns `None` when the graph has no nodes.
pub fn run_colony<R: Rng>(
    graph: &mut ColonyGraph,
    snapshot: &Snapshot,
    config: &AcoConfig,
    rng: &mut R,
) -> Option<ColonyResult> {
    if graph.is_empty() {
        return None;
    }

    let mut best: Option<AntSolution> = None;
    let mut stale = 0usize;
    let mut iterations = 0;
    let mut stopped_early = false;
    let mut score_history = Vec::with_capacity(config.n_iterations);

    for iteration in 0..config.n_iterations {
        let ants: Vec<AntSolution> = (0..config.n_ants)
            .map(|_| construct(graph, snapshot, config, rng))
            .collect();

        let mut leader = 0;
        for (i, ant) in ants.iter().enumerate().skip(1) {
            if ant.score < ants[leader].score {
                leader = i;
            }
        }
        let leader = &ants[leader];
        iterations = iteration + 1;

        if best.as_ref().map_or(true, |b| leader.score < b.score) {
            best = Some(leader.clone());
            stale = 0;
            tracing::debug!(iteration = iterations, score = leader.score, "new best colony");
        } else {
            stale += 1;
        }
        score_history.push(best.as_ref().map_or(f64::INFINITY, |b| b.score));

        if config.patience > 0 && stale >= config.patience {
            stopped_early = true;
            break;
        }

        graph.evaporate(config.rho);
        let amount = config.q / (leader.score + 1e-6);
        for route in &leader.routes {
            graph.deposit(route, amount);
        }
    }

    best.map(|best| ColonyResult {
        best,
        iterations,
        stopped_early,
        score_history,
    })
}

/// Builds one ant's routes.
fn construct<R: Rng>(
    graph: &ColonyGraph,
    snapshot: &Snapshot,
    config: &AcoConfig,
    rng: &mut R,
) -> AntSolution {
    let mut remaining: Vec<usize> = (0..graph.len()).collect();
    let mut routes = Vec::with_capacity(snapshot.vehicles.len());
    let mut score = 0.0;

    for (k, vehicle) in snapshot.vehicles.iter().enumerate() {
        let mut route: Vec<usize> = Vec::new();
        let mut load = 0.0;

        loop {
            let last = route.last().copied();
            let valid: Vec<usize> = remaining
                .iter()
                .copied()
                .filter(|&j| {
                    last.map_or(true, |l| graph.node(l).is_pick() != graph.node(j).is_pick())
                })
                .collect();
            if valid.is_empty() {
                break;
            }

            let legs: Vec<f64> = valid
                .iter()
                .map(|&j| match last {
                    Some(l) => graph.distance(l, j),
                    None => graph.departure(k, j),
                })
                .collect();
            let weights: Vec<f64> = valid
                .iter()
                .zip(&legs)
                .map(|(&j, &d)| {
                    let tau = last.map_or(1.0, |l| graph.pheromone(l, j));
                    tau.powf(config.alpha)
                        * (1.0 / (d + 1e-6)).powf(config.beta)
                        * graph.urgency(j).powf(config.gamma)
                })
                .collect();

            let Some(choice) = roulette(&weights, rng) else {
                break;
            };
            let j = valid[choice];
            let d = legs[choice];

            score += fuel_consumption(d, load, vehicle) + config.distance_surcharge * d;
            if let NodeKind::Pick(i) = graph.node(j) {
                score += config.urgency_surcharge * graph.urgency(j);
                load += snapshot.candidates[i].item.quantity_kg;
            }
            route.push(j);
            remaining.retain(|&n| n != j);

            if load >= vehicle.capacity_kg {
                break;
            }
        }
        routes.push(route);
    }

    AntSolution { routes, score }
}
