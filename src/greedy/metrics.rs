//! Allocation quality figures.

/// Observability figures for one greedy pass.
///
/// Not part of the allocation contract; the allocator logs them and
/// [`GreedyAllocator::allocate_with_metrics`](super::GreedyAllocator::allocate_with_metrics)
/// returns them.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationMetrics {
    /// Total kilograms allocated.
    pub total_allocated_kg: f64,

    /// Eligible items with less than the waste-risk window left.
    pub waste_risk_items: usize,

    /// High-priority recipients left below their floor.
    pub priority_violations: usize,

    /// Per-recipient `allocated / max(1, demand)`, in recipient order.
    pub fulfillment_ratios: Vec<f64>,
}

impl AllocationMetrics {
    /// Mean fulfilment ratio (0 without recipients).
    pub fn mean_fulfillment(&self) -> f64 {
        if self.fulfillment_ratios.is_empty() {
            return 0.0;
        }
        self.fulfillment_ratios.iter().sum::<f64>() / self.fulfillment_ratios.len() as f64
    }

    /// `1 − σ` of the fulfilment ratios (population standard deviation).
    ///
    /// 1.0 means every recipient got the same share of its demand.
    pub fn fairness(&self) -> f64 {
        let n = self.fulfillment_ratios.len();
        if n == 0 {
            return 1.0;
        }
        let mean = self.mean_fulfillment();
        let variance = self
            .fulfillment_ratios
            .iter()
            .map(|r| (r - mean) * (r - mean))
            .sum::<f64>()
            / n as f64;
        1.0 - variance.sqrt()
    }
}
