//! Sequential priority-rule ranking.
//!
//! Items are ordered by a chain of scoring rules: the first rule decides,
//! later rules only break ties the earlier ones leave (scores in the same
//! 1e-9 bucket tie), and items tied on every rule keep their input order.
//! The greedy allocator expresses its perishability → nutrition → quantity
//! ordering this way.
//!
//! # References
//!
//! Dispatching rule composition: Pinedo (2016), "Scheduling: Theory,
//! Algorithms, and Systems"

mod engine;
mod types;

pub use engine::RuleEngine;
pub use types::PriorityRule;
