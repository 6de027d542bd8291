//! Greedy priority allocation.
//!
//! A deterministic single-pass allocator that assigns food to recipients
//! without routing. Recipients are scored by organisation kind and priority
//! tier, boosted by their share of outstanding demand; items are visited
//! soonest-to-spoil first.
//!
//! Two passes:
//!
//! 1. **Priority floor**: every High-priority recipient is topped up to a
//!    guaranteed fraction of its demand.
//! 2. **Best fit**: each remaining item goes to the recipient with the
//!    highest composite score (preference match, urgency boost).
//!
//! # Key Types
//!
//! - [`GreedyConfig`]: scoring constants and thresholds
//! - [`GreedyAllocator`]: runs the two passes
//! - [`AllocationMetrics`]: fulfilment and fairness figures for logging

mod allocator;
mod config;
mod metrics;
mod ordering;

pub use allocator::GreedyAllocator;
pub use config::{GreedyConfig, PriorityTable};
pub use metrics::AllocationMetrics;
pub use ordering::{item_order, LargestQuantity, RichestNutrition, ShortestWindow};
