//! Linear-programming assignment.
//!
//! The continuous relaxation of the vehicle assignment problem, solved with
//! `good_lp` on the pure-Rust `microlp` simplex backend. Used to validate
//! and compare the heuristic strategies.

mod config;
mod model;
mod optimizer;

pub use config::LpConfig;
pub use model::AssignmentModel;
pub use optimizer::{extract, LinearOptimizer};
