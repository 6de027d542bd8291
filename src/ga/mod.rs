//! Genetic-algorithm vehicle assignment.
//!
//! A small generational engine ([`GaProblem`], [`Individual`],
//! [`GaRunner`]) and the problem it is used for here:
//! [`AssignmentProblem`] evolves lists of (item, recipient, vehicle, kg)
//! genes, and [`GeneticOptimizer`] decodes the best one into a
//! vehicle-keyed plan.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Fortin et al. (2012), "DEAP: Evolutionary Algorithms Made Easy", JMLR 13

mod chromosome;
mod config;
mod optimizer;
mod problem;
mod runner;
mod selection;
mod types;

pub use chromosome::{AssignmentChromosome, Gene};
pub use config::GaConfig;
pub use optimizer::{decode, GeneticOptimizer};
pub use problem::{AssignmentProblem, INVALID_INDEX_FITNESS};
pub use runner::{GaResult, GaRunner};
pub use selection::{select_parents, tournament};
pub use types::{GaProblem, Individual};
