//! Item ordering rules for greedy allocation.

use crate::ranking::{PriorityRule, RuleEngine};
use crate::snapshot::Candidate;

/// Shortest perishability window first.
pub struct ShortestWindow;

impl PriorityRule<Candidate, ()> for ShortestWindow {
    fn name(&self) -> &str {
        "ShortestWindow"
    }

    fn score(&self, c: &Candidate, _ctx: &()) -> f64 {
        c.item.perishability_hours
    }
}

/// Highest nutritional grade first.
pub struct RichestNutrition;

impl PriorityRule<Candidate, ()> for RichestNutrition {
    fn name(&self) -> &str {
        "RichestNutrition"
    }

    fn score(&self, c: &Candidate, _ctx: &()) -> f64 {
        -f64::from(c.item.nutrition.rank())
    }
}

/// Largest quantity first.
pub struct LargestQuantity;

impl PriorityRule<Candidate, ()> for LargestQuantity {
    fn name(&self) -> &str {
        "LargestQuantity"
    }

    fn score(&self, c: &Candidate, _ctx: &()) -> f64 {
        -c.item.quantity_kg
    }
}

/// Indices of `candidates` in allocation order: ascending perishability
/// window, then descending nutrition, then descending quantity. Full ties
/// keep input order.
pub fn item_order(candidates: &[Candidate]) -> Vec<usize> {
    RuleEngine::new()
        .with_rule(ShortestWindow)
        .with_rule(RichestNutrition)
        .with_rule(LargestQuantity)
        .sort_indices(candidates, &())
}
