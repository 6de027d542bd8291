//! Common optimizer contract and configuration-driven dispatch.
//!
//! The host picks one strategy per simulation configuration and calls it
//! once per step:
//!
//! ```
//! use chrono::NaiveDate;
//! use u_foodnet::random::create_rng;
//! use u_foodnet::snapshot::Snapshot;
//! use u_foodnet::strategy::{Optimizer, Strategy, StrategyConfig};
//!
//! let now = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let strategy = Strategy::from_config(StrategyConfig::AntColony(Default::default()));
//! let plan = strategy.optimize(&Snapshot::new(now), &mut create_rng(1)).unwrap();
//! assert!(plan.is_empty());
//! assert_eq!(strategy.name(), "ant-colony");
//! ```

use rand::Rng;

use crate::aco::{AcoConfig, AntColonyOptimizer};
use crate::error::OptimizeError;
use crate::ga::{GaConfig, GeneticOptimizer};
use crate::greedy::{GreedyAllocator, GreedyConfig};
use crate::lp::{LinearOptimizer, LpConfig};
use crate::plan::Plan;
use crate::snapshot::Snapshot;

/// One allocation pass over a snapshot.
///
/// Implementations never mutate the snapshot; every state change is in the
/// returned plan's deltas. Errors are reserved for invalid configuration:
/// degenerate inputs produce an empty, fully keyed plan.
pub trait Optimizer {
    /// Short strategy name for logs.
    fn name(&self) -> &str;

    fn optimize<R: Rng>(&self, snapshot: &Snapshot, rng: &mut R) -> Result<Plan, OptimizeError>;
}

impl Optimizer for GreedyAllocator {
    fn name(&self) -> &str {
        "greedy"
    }

    /// Deterministic; the generator is unused.
    fn optimize<R: Rng>(&self, snapshot: &Snapshot, _rng: &mut R) -> Result<Plan, OptimizeError> {
        self.allocate(snapshot)
    }
}

/// Which strategy to run, with its parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrategyConfig {
    Greedy(GreedyConfig),
    Genetic(GaConfig),
    AntColony(AcoConfig),
    Linear(LpConfig),
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::Greedy(GreedyConfig::default())
    }
}

impl StrategyConfig {
    /// GA sized for `item_count` candidates (see [`GaConfig::for_item_count`]).
    pub fn genetic_for(item_count: usize) -> Self {
        StrategyConfig::Genetic(GaConfig::for_item_count(item_count))
    }
}

/// The four interchangeable strategies.
#[derive(Debug, Clone)]
pub enum Strategy {
    Greedy(GreedyAllocator),
    Genetic(GeneticOptimizer),
    AntColony(AntColonyOptimizer),
    Linear(LinearOptimizer),
}

impl Strategy {
    pub fn from_config(config: StrategyConfig) -> Self {
        match config {
            StrategyConfig::Greedy(c) => Strategy::Greedy(GreedyAllocator::new(c)),
            StrategyConfig::Genetic(c) => Strategy::Genetic(GeneticOptimizer::new(c)),
            StrategyConfig::AntColony(c) => Strategy::AntColony(AntColonyOptimizer::new(c)),
            StrategyConfig::Linear(c) => Strategy::Linear(LinearOptimizer::new(c)),
        }
    }

    /// Returns `true` for strategies whose plans are keyed by vehicle.
    pub fn uses_vehicles(&self) -> bool {
        !matches!(self, Strategy::Greedy(_))
    }
}

impl From<StrategyConfig> for Strategy {
    fn from(config: StrategyConfig) -> Self {
        Self::from_config(config)
    }
}

impl Optimizer for Strategy {
    fn name(&self) -> &str {
        match self {
            Strategy::Greedy(o) => o.name(),
            Strategy::Genetic(o) => o.name(),
            Strategy::AntColony(o) => o.name(),
            Strategy::Linear(o) => o.name(),
        }
    }

    fn optimize<R: Rng>(&self, snapshot: &Snapshot, rng: &mut R) -> Result<Plan, OptimizeError> {
        match self {
            Strategy::Greedy(o) => o.optimize(snapshot, rng),
            Strategy::Genetic(o) => o.optimize(snapshot, rng),
            Strategy::AntColony(o) => o.optimize(snapshot, rng),
            Strategy::Linear(o) => o.optimize(snapshot, rng),
        }
    }
}
