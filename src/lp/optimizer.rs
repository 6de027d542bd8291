//! LP-backed vehicle assignment.

use rand::Rng;

use super::config::LpConfig;
use super::model::AssignmentModel;
use crate::cost::{DistanceMetric, Euclidean};
use crate::error::OptimizeError;
use crate::plan::{Ledger, Plan};
use crate::snapshot::Snapshot;
use crate::strategy::Optimizer;

/// Solves the continuous relaxation of the assignment problem exactly.
///
/// Deterministic; the generator passed through [`Optimizer`] is unused.
#[derive(Debug, Clone)]
pub struct LinearOptimizer<M = Euclidean> {
    config: LpConfig,
    metric: M,
}

impl LinearOptimizer {
    pub fn new(config: LpConfig) -> Self {
        Self {
            config,
            metric: Euclidean,
        }
    }
}

impl Default for LinearOptimizer {
    fn default() -> Self {
        Self::new(LpConfig::default())
    }
}

impl<M: DistanceMetric> LinearOptimizer<M> {
    /// Replaces the distance function.
    pub fn with_metric<N: DistanceMetric>(self, metric: N) -> LinearOptimizer<N> {
        LinearOptimizer {
            config: self.config,
            metric,
        }
    }

    pub fn config(&self) -> &LpConfig {
        &self.config
    }

    /// Builds and solves the model, then extracts a vehicle-keyed plan.
    ///
    /// Degenerate snapshots and non-optimal resolutions yield an empty plan.
    pub fn solve(&self, snapshot: &Snapshot) -> Result<Plan, OptimizeError> {
        self.config.validate()?;
        if snapshot.is_degenerate() {
            return Ok(Plan::empty_by_vehicle(snapshot));
        }

        let model = AssignmentModel::build(snapshot, &self.config, &self.metric);
        let variables = model.len();
        let values = match model.solve() {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(step = snapshot.step, error = %err, "lp not solved to optimality");
                return Ok(Plan::empty_by_vehicle(snapshot));
            }
        };

        let plan = extract(snapshot, &values, self.config.min_assignment_kg);
        tracing::info!(
            step = snapshot.step,
            variables,
            assignments = plan.len(),
            assigned_kg = plan.total_kg,
            "lp optimization finished"
        );
        Ok(plan)
    }
}

impl<M: DistanceMetric> Optimizer for LinearOptimizer<M> {
    fn name(&self) -> &str {
        "linear"
    }

    fn optimize<R: Rng>(&self, snapshot: &Snapshot, _rng: &mut R) -> Result<Plan, OptimizeError> {
        self.solve(snapshot)
    }
}

/// Materialises solver values given in `(i, j, k)` lexicographic order.
///
/// Values at or below `threshold` are dropped. The rest are clamped to the
/// remaining supply, demand and capacity, so solver noise never pushes a
/// source item below zero.
pub fn extract(snapshot: &Snapshot, values: &[f64], threshold: f64) -> Plan {
    let (n_items, n_recipients, n_vehicles) = (
        snapshot.candidates.len(),
        snapshot.recipients.len(),
        snapshot.vehicles.len(),
    );
    let mut ledger = Ledger::by_vehicle(snapshot);

    for i in 0..n_items {
        for j in 0..n_recipients {
            for k in 0..n_vehicles {
                let Some(&kg) = values.get((i * n_recipients + j) * n_vehicles + k) else {
                    continue;
                };
                if kg.is_nan() || kg <= threshold {
                    continue;
                }
                let derived_id = format!(
                    "{}_split_{}_{}_{}_{}",
                    snapshot.candidates[i].item.id, snapshot.step, i, j, k
                );
                ledger.commit(i, j, Some(k), kg, derived_id);
            }
        }
    }

    ledger.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 30)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn item(id: &str, kg: f64) -> FoodItem {
        FoodItem::new(
            id,
            FoodCategory::Canned,
            kg,
            now() + Duration::hours(200),
            100.0,
            NutritionGrade::Low,
        )
    }

    fn recipient(id: &str, demand: f64) -> Recipient {
        Recipient::new(
            id,
            RecipientKind::FoodBank,
            Location::new(0.5, 0.0),
            FoodCategory::Canned,
            PriorityTier::Medium,
            demand,
        )
    }

    fn van(id: &str, capacity: f64) -> Vehicle {
        Vehicle::new(id, VehicleKind::Van, capacity, Location::new(0.0, 0.5), 40.0, 0.2)
    }

    fn donor() -> Donor {
        Donor::new("D1", Location::new(0.0, 0.0))
    }

    #[test]
    fn test_lp_bounded_by_tightest_constraint() {
        // Unit cost 0.5 + 0.5 + 1 − 5 < 0: the solver ships as much as it can.
        let s = Snapshot::new(now())
            .with_step(4)
            .with_candidate(item("F1", 10.0), donor())
            .with_recipient(recipient("R1", 6.0))
            .with_vehicle(van("V1", 8.0));
        let plan = LinearOptimizer::default().solve(&s).unwrap();
        assert!((plan.total_kg - 6.0).abs() < 1e-6, "total {}", plan.total_kg);
        let a = &plan.group("V1")[0];
        assert_eq!(a.item.id, "F1_split_4_0_0_0");
        assert_eq!(a.item.nutrition, NutritionGrade::Low);
        assert!(a.item.reserved);
        assert!(!plan.reserves("F1"));
    }

    #[test]
    fn test_lp_capacity_binds_across_items() {
        let s = Snapshot::new(now())
            .with_candidate(item("F1", 5.0), donor())
            .with_candidate(item("F2", 5.0), donor())
            .with_recipient(recipient("R1", 100.0))
            .with_vehicle(van("V1", 7.0));
        let plan = LinearOptimizer::default().solve(&s).unwrap();
        assert!((plan.total_kg - 7.0).abs() < 1e-6);
        assert!(plan.load_of("V1") <= 7.0 + 1e-6);
    }

    #[test]
    fn test_lp_nothing_worth_shipping() {
        let s = Snapshot::new(now())
            .with_candidate(item("F1", 5.0), donor())
            .with_recipient(recipient("R1", 5.0))
            .with_vehicle(van("V1", 10.0));
        let optimizer = LinearOptimizer::new(LpConfig::default().with_quantity_reward(0.0));
        let plan = optimizer.solve(&s).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.total_kg, 0.0);
    }

    #[test]
    fn test_lp_degenerate() {
        let s = Snapshot::new(now())
            .with_candidate(item("F1", 5.0), donor())
            .with_vehicle(van("V1", 10.0));
        let plan = LinearOptimizer::default().solve(&s).unwrap();
        assert_eq!(plan.groups.len(), 1);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_extract_clamps_noise_and_drops_slivers() {
        let s = Snapshot::new(now())
            .with_step(1)
            .with_candidate(item("F1", 4.0), donor())
            .with_recipient(recipient("R1", 10.0))
            .with_recipient(recipient("R2", 10.0))
            .with_vehicle(van("V1", 20.0));
        // R1 asks 3 kg, R2 1.0000001 kg of a 4 kg item; one sliver.
        let plan = extract(&s, &[3.0, 1.000_000_1], 0.01);
        assert!((plan.allocated_from("F1") - 4.0).abs() < 1e-12);
        assert!(plan.reserves("F1"));
        assert_eq!(plan.group("V1")[1].item.id, "F1_split_1_0_1_0");

        let plan = extract(&s, &[0.005, 2.0], 0.01);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.group("V1")[0].recipient_id, "R2");
    }
}
