//! Pick/drop node graph with pheromone and urgency.

use crate::cost::{DistanceMatrix, DistanceMetric};
use crate::snapshot::Snapshot;

use super::config::AcoConfig;

/// What visiting a node means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Collect the candidate at this index.
    Pick(usize),
    /// Hand over to the recipient at this index.
    Drop(usize),
}

impl NodeKind {
    pub fn is_pick(self) -> bool {
        matches!(self, NodeKind::Pick(_))
    }
}

/// Colony search space for one snapshot.
///
/// Pick nodes come first (one per eligible candidate, in snapshot order),
/// then one drop node per recipient with demand.
#[derive(Debug, Clone)]
pub struct ColonyGraph {
    nodes: Vec<NodeKind>,
    distances: DistanceMatrix,
    /// Vehicle-to-node distance, `[vehicle * nodes + node]`.
    departures: Vec<f64>,
    pheromone: Vec<f64>,
    urgency: Vec<f64>,
}

impl ColonyGraph {
    pub fn build<M: DistanceMetric + ?Sized>(
        snapshot: &Snapshot,
        config: &AcoConfig,
        metric: &M,
    ) -> Self {
        let now = snapshot.now;
        let mut nodes = Vec::new();
        let mut locations = Vec::new();
        let mut urgency = Vec::new();

        for (i, c) in snapshot.candidates.iter().enumerate() {
            let hours = c.item.hours_to_expiry(now);
            if c.item.reserved || hours <= config.min_hours_to_expiry {
                continue;
            }
            nodes.push(NodeKind::Pick(i));
            locations.push(c.donor.location);
            urgency.push(1.0 / (hours.max(0.0) + 1e-6));
        }
        for (j, r) in snapshot.recipients.iter().enumerate() {
            if r.current_demand > 0.0 {
                nodes.push(NodeKind::Drop(j));
                locations.push(r.location);
                urgency.push(0.0);
            }
        }

        let n = nodes.len();
        let departures = snapshot
            .vehicles
            .iter()
            .flat_map(|v| locations.iter().map(move |&loc| metric.distance(v.location, loc)))
            .collect();

        Self {
            distances: DistanceMatrix::build(&locations, metric),
            nodes,
            departures,
            pheromone: vec![1.0; n * n],
            urgency,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, i: usize) -> NodeKind {
        self.nodes[i]
    }

    pub fn pick_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_pick()).count()
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances.get(i, j)
    }

    /// Distance from vehicle `k`'s position to node `j`.
    pub fn departure(&self, k: usize, j: usize) -> f64 {
        self.departures[k * self.nodes.len() + j]
    }

    pub fn pheromone(&self, i: usize, j: usize) -> f64 {
        self.pheromone[i * self.nodes.len() + j]
    }

    /// `1 / hours left` for pick nodes, 0 for drop nodes.
    pub fn urgency(&self, j: usize) -> f64 {
        self.urgency[j]
    }

    /// Multiplies every trail by `1 − rho`.
    pub fn evaporate(&mut self, rho: f64) {
        for tau in &mut self.pheromone {
            *tau *= 1.0 - rho;
        }
    }

    /// Adds `amount` to every consecutive edge of `route`.
    pub fn deposit(&mut self, route: &[usize], amount: f64) {
        let n = self.nodes.len();
        for edge in route.windows(2) {
            self.pheromone[edge[0] * n + edge[1]] += amount;
        }
    }
}
