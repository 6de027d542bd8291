//! Two-pass greedy allocation.

use super::config::GreedyConfig;
use super::metrics::AllocationMetrics;
use super::ordering::item_order;
use crate::error::OptimizeError;
use crate::models::PriorityTier;
use crate::plan::{Ledger, Plan};
use crate::snapshot::Snapshot;

/// Remaining need below which a floor counts as met.
const FLOOR_TOLERANCE: f64 = 1e-9;

/// Per-recipient scoring inputs, fixed for the pass.
struct Profile {
    base: f64,
    demand_factor: f64,
    floor: f64,
}

/// Priority- and perishability-aware allocator.
///
/// Produces a [`Plan`] keyed by recipient id. Assignments carry no vehicle.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use u_foodnet::greedy::GreedyAllocator;
/// use u_foodnet::models::*;
/// use u_foodnet::snapshot::Snapshot;
///
/// let now = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let expiry = now + Duration::hours(2);
/// let item = FoodItem::new("F1", FoodCategory::Canned, 5.0, expiry, 2.0, NutritionGrade::High);
/// let snapshot = Snapshot::new(now)
///     .with_candidate(item, Donor::new("D1", Location::new(0.0, 0.0)))
///     .with_recipient(Recipient::new("R1", RecipientKind::FoodBank, Location::new(1.0, 1.0),
///         FoodCategory::Canned, PriorityTier::High, 100.0));
///
/// let plan = GreedyAllocator::default().allocate(&snapshot).unwrap();
/// assert_eq!(plan.group("R1").len(), 1);
/// assert!((plan.allocated_to("R1") - 5.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyAllocator {
    config: GreedyConfig,
}

impl GreedyAllocator {
    pub fn new(config: GreedyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GreedyConfig {
        &self.config
    }

    /// Allocates the snapshot's candidates to its recipients.
    pub fn allocate(&self, snapshot: &Snapshot) -> Result<Plan, OptimizeError> {
        self.allocate_with_metrics(snapshot).map(|(plan, _)| plan)
    }

    /// Like [`allocate`](Self::allocate), also returning pass metrics.
    pub fn allocate_with_metrics(
        &self,
        snapshot: &Snapshot,
    ) -> Result<(Plan, AllocationMetrics), OptimizeError> {
        self.config.validate()?;
        let config = &self.config;
        let mut ledger = Ledger::by_recipient(snapshot);

        let total_demand = snapshot.total_demand();
        let profiles: Vec<Profile> = snapshot
            .recipients
            .iter()
            .map(|r| Profile {
                base: config.priorities.score(r.kind, r.priority),
                demand_factor: 1.0
                    + config
                        .fairness_cap
                        .min(r.current_demand / total_demand.max(1.0)),
                floor: if r.priority == PriorityTier::High {
                    config.floor_fraction * r.current_demand
                } else {
                    0.0
                },
            })
            .collect();

        let now = snapshot.now;
        let order: Vec<usize> = item_order(&snapshot.candidates)
            .into_iter()
            .filter(|&i| {
                let item = &snapshot.candidates[i].item;
                !item.reserved && !item.is_expired(now)
            })
            .collect();

        let waste_risk_items = order
            .iter()
            .filter(|&&i| {
                snapshot.candidates[i].item.hours_to_expiry(now) < config.waste_risk_hours
            })
            .count();

        let mut allocated = vec![0.0; snapshot.recipients.len()];
        let mut seq = 0usize;

        // Pass 1: priority floor
        for (j, profile) in profiles.iter().enumerate() {
            let mut needed = profile.floor - allocated[j];
            if needed <= FLOOR_TOLERANCE {
                continue;
            }
            for &i in &order {
                if ledger.is_reserved(i) || ledger.item_left(i) <= 0.0 {
                    continue;
                }
                let id = format!("{}_pri_{}", snapshot.candidates[i].item.id, seq);
                let kg = ledger.commit(i, j, None, needed, id);
                if kg > 0.0 {
                    seq += 1;
                    allocated[j] += kg;
                    needed -= kg;
                }
                if needed <= FLOOR_TOLERANCE || ledger.demand_left(j) <= 0.0 {
                    break;
                }
            }
        }

        // Pass 2: best fit
        for &i in &order {
            if ledger.is_reserved(i) || ledger.item_left(i) <= 0.0 {
                continue;
            }
            let item = &snapshot.candidates[i].item;
            let urgency = if item.hours_to_expiry(now) < config.urgency_window_hours {
                config.urgency_boost
            } else {
                1.0
            };

            let mut best: Option<(usize, f64)> = None;
            for (j, recipient) in snapshot.recipients.iter().enumerate() {
                if ledger.demand_left(j) <= 0.0 {
                    continue;
                }
                let preference = if item.category == recipient.preference {
                    config.preference_bonus
                } else {
                    1.0
                };
                let score = profiles[j].base * profiles[j].demand_factor * preference * urgency;
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((j, score));
                }
            }

            if let Some((j, _)) = best {
                let id = format!("{}_alloc_{}", item.id, seq);
                let kg = ledger.commit(i, j, None, ledger.item_left(i), id);
                if kg > 0.0 {
                    seq += 1;
                    allocated[j] += kg;
                }
            }
        }

        let metrics = AllocationMetrics {
            total_allocated_kg: allocated.iter().sum(),
            waste_risk_items,
            priority_violations: profiles
                .iter()
                .zip(&allocated)
                .filter(|(p, &a)| p.floor > 0.0 && a + FLOOR_TOLERANCE < p.floor)
                .count(),
            fulfillment_ratios: snapshot
                .recipients
                .iter()
                .zip(&allocated)
                .map(|(r, &a)| a / r.current_demand.max(1.0))
                .collect(),
        };

        tracing::info!(
            step = snapshot.step,
            supply_kg = snapshot.total_supply(),
            allocated_kg = metrics.total_allocated_kg,
            waste_risk_items = metrics.waste_risk_items,
            priority_violations = metrics.priority_violations,
            mean_fulfillment = metrics.mean_fulfillment(),
            fairness = metrics.fairness(),
            "greedy allocation finished"
        );

        Ok((ledger.finish(), metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 30)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap()
    }

    fn item(
        id: &str,
        category: FoodCategory,
        kg: f64,
        hours_left: i64,
        perishability: f64,
        grade: NutritionGrade,
    ) -> FoodItem {
        FoodItem::new(
            id,
            category,
            kg,
            now() + Duration::hours(hours_left),
            perishability,
            grade,
        )
    }

    fn recipient(
        id: &str,
        kind: RecipientKind,
        priority: PriorityTier,
        demand: f64,
        preference: FoodCategory,
    ) -> Recipient {
        Recipient::new(id, kind, Location::default(), preference, priority, demand)
    }

    fn donor() -> Donor {
        Donor::new("D1", Location::new(1.0, 1.0))
    }

    #[test]
    fn test_high_demand_low_supply() {
        let snapshot = Snapshot::new(now())
            .with_candidate(
                item("F1", FoodCategory::Canned, 5.0, 2, 2.0, NutritionGrade::High),
                donor(),
            )
            .with_recipient(recipient(
                "R1",
                RecipientKind::FoodBank,
                PriorityTier::High,
                100.0,
                FoodCategory::Canned,
            ));

        let plan = GreedyAllocator::default().allocate(&snapshot).unwrap();
        let allocations = plan.group("R1");
        assert_eq!(allocations.len(), 1);
        assert!((plan.allocated_to("R1") - 5.0).abs() < 1e-9);
        assert!(plan.reserves("F1"));
        assert!(allocations[0].item.id.starts_with("F1_pri_"));
    }

    #[test]
    fn test_priority_guarantee() {
        let snapshot = Snapshot::new(now())
            .with_candidate(
                item(
                    "F1",
                    FoodCategory::Vegetables,
                    8.0,
                    24,
                    24.0,
                    NutritionGrade::Medium,
                ),
                donor(),
            )
            .with_recipient(recipient(
                "R1",
                RecipientKind::FoodBank,
                PriorityTier::High,
                10.0,
                FoodCategory::Vegetables,
            ))
            .with_recipient(recipient(
                "R2",
                RecipientKind::CommunityCenter,
                PriorityTier::Low,
                100.0,
                FoodCategory::Dairy,
            ));

        let plan = GreedyAllocator::default().allocate(&snapshot).unwrap();
        let r1 = plan.allocated_to("R1");
        assert!(r1 >= 3.0 - 1e-9, "floor not met: {r1}");
        assert!(r1 <= 8.0 + 1e-9);
        assert!((r1 - 8.0).abs() < 1e-9);
        assert!(plan.group("R2").is_empty());
    }

    #[test]
    fn test_floor_goes_to_low_preference_match_too() {
        // The High recipient prefers Dairy, but the floor is category-blind.
        let snapshot = Snapshot::new(now())
            .with_candidate(
                item("F1", FoodCategory::Canned, 20.0, 100, 168.0, NutritionGrade::Low),
                donor(),
            )
            .with_recipient(recipient(
                "R1",
                RecipientKind::CommunityCenter,
                PriorityTier::High,
                10.0,
                FoodCategory::Dairy,
            ))
            .with_recipient(recipient(
                "R2",
                RecipientKind::FoodBank,
                PriorityTier::Medium,
                40.0,
                FoodCategory::Canned,
            ));

        let (plan, metrics) = GreedyAllocator::default()
            .allocate_with_metrics(&snapshot)
            .unwrap();
        assert!((plan.allocated_to("R1") - 3.0).abs() < 1e-9);
        assert!((plan.allocated_to("R2") - 17.0).abs() < 1e-9);
        assert_eq!(metrics.priority_violations, 0);
        assert!((metrics.total_allocated_kg - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_perishable_first() {
        let snapshot = Snapshot::new(now())
            .with_candidate(
                item("F2", FoodCategory::Canned, 10.0, 168, 168.0, NutritionGrade::Medium),
                donor(),
            )
            .with_candidate(
                item("F1", FoodCategory::Dairy, 5.0, 1, 6.0, NutritionGrade::High),
                donor(),
            )
            .with_recipient(recipient(
                "R1",
                RecipientKind::Shelter,
                PriorityTier::Medium,
                20.0,
                FoodCategory::Dairy,
            ));

        let plan = GreedyAllocator::default().allocate(&snapshot).unwrap();
        let categories: Vec<FoodCategory> =
            plan.group("R1").iter().map(|a| a.item.category).collect();
        assert_eq!(categories, vec![FoodCategory::Dairy, FoodCategory::Canned]);
    }

    #[test]
    fn test_reserved_and_expired_items_skipped() {
        let mut reserved = item("F1", FoodCategory::Bread, 5.0, 10, 24.0, NutritionGrade::High);
        reserved.reserve();
        let expired = item("F2", FoodCategory::Bread, 5.0, -1, 24.0, NutritionGrade::High);
        let empty = item("F3", FoodCategory::Bread, 0.0, 10, 24.0, NutritionGrade::High);
        let snapshot = Snapshot::new(now())
            .with_candidate(reserved, donor())
            .with_candidate(expired, donor())
            .with_candidate(empty, donor())
            .with_recipient(recipient(
                "R1",
                RecipientKind::Shelter,
                PriorityTier::High,
                20.0,
                FoodCategory::Bread,
            ));

        let (plan, metrics) = GreedyAllocator::default()
            .allocate_with_metrics(&snapshot)
            .unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.total_kg, 0.0);
        assert_eq!(metrics.priority_violations, 1);
    }

    #[test]
    fn test_empty_inputs_keyed_by_recipient() {
        let snapshot = Snapshot::new(now()).with_recipient(recipient(
            "R1",
            RecipientKind::Shelter,
            PriorityTier::Low,
            5.0,
            FoodCategory::Bread,
        ));
        let plan = GreedyAllocator::default().allocate(&snapshot).unwrap();
        assert!(plan.groups.contains_key("R1"));
        assert!(plan.is_empty());

        let snapshot = Snapshot::new(now()).with_candidate(
            item("F1", FoodCategory::Bread, 5.0, 10, 24.0, NutritionGrade::High),
            donor(),
        );
        let plan = GreedyAllocator::default().allocate(&snapshot).unwrap();
        assert!(plan.groups.is_empty());
        assert!(plan.deltas.is_empty());
    }

    #[test]
    fn test_preference_and_urgency_decide_best_fit() {
        // Equal base scores; R2's preference match wins the item.
        let snapshot = Snapshot::new(now())
            .with_candidate(
                item("F1", FoodCategory::Bread, 4.0, 5, 24.0, NutritionGrade::High),
                donor(),
            )
            .with_recipient(recipient(
                "R1",
                RecipientKind::Shelter,
                PriorityTier::Medium,
                50.0,
                FoodCategory::Dairy,
            ))
            .with_recipient(recipient(
                "R2",
                RecipientKind::Shelter,
                PriorityTier::Medium,
                50.0,
                FoodCategory::Bread,
            ));

        let (plan, metrics) = GreedyAllocator::default()
            .allocate_with_metrics(&snapshot)
            .unwrap();
        assert!((plan.allocated_to("R2") - 4.0).abs() < 1e-9);
        assert_eq!(metrics.waste_risk_items, 1);
        assert!(metrics.fairness() < 1.0);
    }

    #[test]
    fn test_ties_go_to_first_recipient() {
        let snapshot = Snapshot::new(now())
            .with_candidate(
                item("F1", FoodCategory::Bread, 4.0, 50, 24.0, NutritionGrade::High),
                donor(),
            )
            .with_recipient(recipient(
                "R1",
                RecipientKind::Shelter,
                PriorityTier::Medium,
                50.0,
                FoodCategory::Dairy,
            ))
            .with_recipient(recipient(
                "R2",
                RecipientKind::Shelter,
                PriorityTier::Medium,
                50.0,
                FoodCategory::Dairy,
            ));

        let plan = GreedyAllocator::default().allocate(&snapshot).unwrap();
        assert!((plan.allocated_to("R1") - 4.0).abs() < 1e-9);
        assert!(plan.group("R2").is_empty());
    }

    #[test]
    fn test_partial_remainder_stays_unreserved() {
        let snapshot = Snapshot::new(now())
            .with_candidate(
                item("F1", FoodCategory::Bread, 10.0, 50, 24.0, NutritionGrade::High),
                donor(),
            )
            .with_recipient(recipient(
                "R1",
                RecipientKind::Shelter,
                PriorityTier::Medium,
                4.0,
                FoodCategory::Bread,
            ));

        let plan = GreedyAllocator::default().allocate(&snapshot).unwrap();
        assert!((plan.allocated_from("F1") - 4.0).abs() < 1e-9);
        assert!(!plan.reserves("F1"));
    }

    #[test]
    fn test_invalid_config() {
        let allocator = GreedyAllocator::new(GreedyConfig::default().with_floor_fraction(-0.1));
        let snapshot = Snapshot::new(now());
        assert!(allocator.allocate(&snapshot).is_err());
    }
}
