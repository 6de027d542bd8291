//! Ant-colony vehicle routing.
//!
//! Pick nodes (one per item with enough shelf life left) and drop nodes
//! (one per recipient with demand) form a complete graph. Ants build
//! alternating pick/drop routes per vehicle, weighted by pheromone,
//! inverse distance and expiry urgency; the best ant of each iteration
//! reinforces its edges after evaporation.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents", IEEE Trans. SMC-B 26(1)
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*

mod config;
mod graph;
mod optimizer;
mod runner;

pub use config::AcoConfig;
pub use graph::{ColonyGraph, NodeKind};
pub use optimizer::{decode, AntColonyOptimizer};
pub use runner::{run_colony, AntSolution, ColonyResult};
