//! Optimizer output: assignments plus the state changes they imply.
//!
//! Optimizers never mutate the snapshot they read. Every side effect of an
//! assignment (shrinking a source item, reserving it, lowering recipient
//! demand, dispatching a vehicle) is emitted as a [`StateDelta`], and the
//! caller applies the whole list at once (see
//! [`Network::apply`](crate::network::Network::apply)).

use std::collections::BTreeMap;

use crate::models::FoodItem;
use crate::snapshot::Snapshot;

/// Remaining quantity below which a source item counts as exhausted and is
/// reserved.
pub const EXHAUSTED_KG: f64 = 0.01;

/// Smallest quantity worth recording as an assignment.
const MIN_COMMIT_KG: f64 = 1e-9;

/// One allocated fraction of a food item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    /// Carrying vehicle; `None` for vehicle-free allocation.
    pub vehicle_id: Option<String>,
    pub donor_id: String,
    pub recipient_id: String,
    /// Id of the item the fraction was taken from.
    pub source_item_id: String,
    /// The derived item; its `quantity_kg` is the allocated fraction.
    pub item: FoodItem,
}

impl Assignment {
    pub fn quantity_kg(&self) -> f64 {
        self.item.quantity_kg
    }
}

/// A state change implied by a plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateDelta {
    /// Take `kg` from a source item.
    ReduceItem { item_id: String, kg: f64 },
    /// Claim a source item exclusively.
    ReserveItem { item_id: String },
    /// Lower a recipient's outstanding demand.
    ReduceDemand { recipient_id: String, kg: f64 },
    /// Mark a vehicle busy.
    DispatchVehicle { vehicle_id: String },
}

/// How the groups of a [`Plan`] are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanKey {
    ByVehicle,
    ByRecipient,
}

/// Result of one optimizer pass.
///
/// `groups` is pre-keyed with every vehicle id (vehicle strategies) or
/// every recipient id (greedy allocation), so an empty pass still yields a
/// keyed mapping. Assignments keep their emission order within a group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    pub key: PlanKey,
    pub groups: BTreeMap<String, Vec<Assignment>>,
    pub total_kg: f64,
    pub deltas: Vec<StateDelta>,
}

impl Plan {
    /// Empty plan keyed by every vehicle in the snapshot.
    pub fn empty_by_vehicle(snapshot: &Snapshot) -> Self {
        Self::keyed(PlanKey::ByVehicle, snapshot.vehicle_ids())
    }

    /// Empty plan keyed by every recipient in the snapshot.
    pub fn empty_by_recipient(snapshot: &Snapshot) -> Self {
        Self::keyed(PlanKey::ByRecipient, snapshot.recipient_ids())
    }

    fn keyed<'a>(key: PlanKey, ids: impl Iterator<Item = &'a str>) -> Self {
        Self {
            key,
            groups: ids.map(|id| (id.to_string(), Vec::new())).collect(),
            total_kg: 0.0,
            deltas: Vec::new(),
        }
    }

    /// Returns `true` when nothing was assigned.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Assignments of one group (vehicle or recipient id).
    pub fn group(&self, id: &str) -> &[Assignment] {
        self.groups.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All assignments, group by group.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.groups.values().flatten()
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Kilograms allocated to a recipient.
    pub fn allocated_to(&self, recipient_id: &str) -> f64 {
        self.assignments()
            .filter(|a| a.recipient_id == recipient_id)
            .map(Assignment::quantity_kg)
            .sum()
    }

    /// Kilograms taken from a source item.
    pub fn allocated_from(&self, source_item_id: &str) -> f64 {
        self.assignments()
            .filter(|a| a.source_item_id == source_item_id)
            .map(Assignment::quantity_kg)
            .sum()
    }

    /// Kilograms loaded on a vehicle.
    pub fn load_of(&self, vehicle_id: &str) -> f64 {
        self.assignments()
            .filter(|a| a.vehicle_id.as_deref() == Some(vehicle_id))
            .map(Assignment::quantity_kg)
            .sum()
    }

    /// Returns `true` if the plan reserves the given source item.
    pub fn reserves(&self, item_id: &str) -> bool {
        self.deltas
            .iter()
            .any(|d| matches!(d, StateDelta::ReserveItem { item_id: id } if id == item_id))
    }
}

/// Working balances for one optimizer pass.
///
/// Tracks what is left of every candidate, recipient demand and vehicle
/// capacity, clamps each commit to those balances, and records the
/// resulting assignment and deltas. All four strategies materialise their
/// solutions through it, which keeps conservation and capacity invariants
/// in one place.
pub(crate) struct Ledger<'s> {
    snapshot: &'s Snapshot,
    item_left: Vec<f64>,
    demand_left: Vec<f64>,
    capacity_left: Vec<f64>,
    reserved: Vec<bool>,
    plan: Plan,
}

impl<'s> Ledger<'s> {
    pub(crate) fn by_vehicle(snapshot: &'s Snapshot) -> Self {
        Self::new(snapshot, Plan::empty_by_vehicle(snapshot))
    }

    pub(crate) fn by_recipient(snapshot: &'s Snapshot) -> Self {
        Self::new(snapshot, Plan::empty_by_recipient(snapshot))
    }

    fn new(snapshot: &'s Snapshot, plan: Plan) -> Self {
        Self {
            snapshot,
            item_left: snapshot
                .candidates
                .iter()
                .map(|c| c.item.quantity_kg.max(0.0))
                .collect(),
            demand_left: snapshot
                .recipients
                .iter()
                .map(|r| r.current_demand.max(0.0))
                .collect(),
            capacity_left: snapshot
                .vehicles
                .iter()
                .map(|v| v.capacity_kg.max(0.0))
                .collect(),
            reserved: snapshot.candidates.iter().map(|c| c.item.reserved).collect(),
            plan,
        }
    }

    pub(crate) fn item_left(&self, item: usize) -> f64 {
        self.item_left[item]
    }

    pub(crate) fn demand_left(&self, recipient: usize) -> f64 {
        self.demand_left[recipient]
    }

    pub(crate) fn capacity_left(&self, vehicle: usize) -> f64 {
        self.capacity_left[vehicle]
    }

    pub(crate) fn is_reserved(&self, item: usize) -> bool {
        self.reserved[item]
    }

    /// Records up to `kg` of candidate `item` for `recipient`, optionally on
    /// `vehicle`. The amount is clamped to the item's remaining quantity,
    /// the recipient's remaining demand and the vehicle's remaining
    /// capacity. Returns the committed kilograms (0 when nothing fits).
    pub(crate) fn commit(
        &mut self,
        item: usize,
        recipient: usize,
        vehicle: Option<usize>,
        kg: f64,
        derived_id: String,
    ) -> f64 {
        let mut amount = kg.min(self.item_left[item]).min(self.demand_left[recipient]);
        if let Some(k) = vehicle {
            amount = amount.min(self.capacity_left[k]);
        }
        if amount.is_nan() || amount <= MIN_COMMIT_KG || self.reserved[item] {
            return 0.0;
        }

        let candidate = &self.snapshot.candidates[item];
        let target = &self.snapshot.recipients[recipient];

        self.item_left[item] -= amount;
        self.demand_left[recipient] -= amount;
        if let Some(k) = vehicle {
            self.capacity_left[k] -= amount;
        }

        self.plan.deltas.push(StateDelta::ReduceItem {
            item_id: candidate.item.id.clone(),
            kg: amount,
        });
        self.plan.deltas.push(StateDelta::ReduceDemand {
            recipient_id: target.id.clone(),
            kg: amount,
        });
        if self.item_left[item] < EXHAUSTED_KG {
            self.reserved[item] = true;
            self.plan.deltas.push(StateDelta::ReserveItem {
                item_id: candidate.item.id.clone(),
            });
        }

        let vehicle_id = vehicle.map(|k| self.snapshot.vehicles[k].id.clone());
        let group = match self.plan.key {
            PlanKey::ByVehicle => vehicle_id.clone().unwrap_or_default(),
            PlanKey::ByRecipient => target.id.clone(),
        };

        self.plan.groups.entry(group).or_default().push(Assignment {
            vehicle_id,
            donor_id: candidate.donor.id.clone(),
            recipient_id: target.id.clone(),
            source_item_id: candidate.item.id.clone(),
            item: candidate.item.split(derived_id, amount),
        });
        self.plan.total_kg += amount;

        amount
    }

    /// Closes the pass: every vehicle carrying at least one assignment gets
    /// a dispatch delta.
    pub(crate) fn finish(mut self) -> Plan {
        if self.plan.key == PlanKey::ByVehicle {
            for vehicle in &self.snapshot.vehicles {
                if !self.plan.group(&vehicle.id).is_empty() {
                    self.plan.deltas.push(StateDelta::DispatchVehicle {
                        vehicle_id: vehicle.id.clone(),
                    });
                }
            }
        }
        self.plan
    }
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

    fn snapshot() -> Snapshot {
        let item = FoodItem::new(
            "F1",
            FoodCategory::Canned,
            10.0,
            now() + Duration::hours(48),
            168.0,
            NutritionGrade::Medium,
        );
        Snapshot::new(now())
            .with_candidate(item, Donor::new("D1", Location::new(0.0, 0.0)))
            .with_recipient(Recipient::new(
                "R1",
                RecipientKind::FoodBank,
                Location::new(1.0, 0.0),
                FoodCategory::Canned,
                PriorityTier::High,
                6.0,
            ))
            .with_vehicle(Vehicle::new(
                "V1",
                VehicleKind::Van,
                4.0,
                Location::new(0.0, 1.0),
                40.0,
                0.2,
            ))
            .with_vehicle(Vehicle::new(
                "V2",
                VehicleKind::Truck,
                50.0,
                Location::new(0.0, 1.0),
                40.0,
                0.3,
            ))
    }

    #[test]
    fn test_empty_plans_are_keyed() {
        let s = snapshot();
        let p = Plan::empty_by_vehicle(&s);
        assert_eq!(p.groups.len(), 2);
        assert!(p.is_empty());
        assert_eq!(p.total_kg, 0.0);

        let p = Plan::empty_by_recipient(&s);
        assert_eq!(p.groups.keys().collect::<Vec<_>>(), vec!["R1"]);
    }

    #[test]
    fn test_commit_clamps_to_capacity_and_demand() {
        let s = snapshot();
        let mut ledger = Ledger::by_vehicle(&s);
        let kg = ledger.commit(0, 0, Some(0), 10.0, "F1_a".into());
        assert!((kg - 4.0).abs() < 1e-12);
        let kg = ledger.commit(0, 0, Some(1), 10.0, "F1_b".into());
        assert!((kg - 2.0).abs() < 1e-12);
        // demand exhausted
        assert_eq!(ledger.commit(0, 0, Some(1), 10.0, "F1_c".into()), 0.0);

        let plan = ledger.finish();
        assert_eq!(plan.len(), 2);
        assert!((plan.total_kg - 6.0).abs() < 1e-12);
        assert!((plan.allocated_from("F1") - 6.0).abs() < 1e-12);
        assert!(!plan.reserves("F1"));
        assert_eq!(
            plan.deltas
                .iter()
                .filter(|d| matches!(d, StateDelta::DispatchVehicle { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_exhausted_item_is_reserved_once() {
        let mut s = snapshot();
        s.recipients[0].current_demand = 100.0;
        let mut ledger = Ledger::by_recipient(&s);
        assert!((ledger.commit(0, 0, None, 10.0, "F1_a".into()) - 10.0).abs() < 1e-12);
        assert!(ledger.is_reserved(0));
        assert_eq!(ledger.commit(0, 0, None, 1.0, "F1_b".into()), 0.0);

        let plan = ledger.finish();
        assert!(plan.reserves("F1"));
        assert_eq!(plan.group("R1").len(), 1);
        assert_eq!(plan.group("R1")[0].vehicle_id, None);
        assert!(plan.group("R1")[0].item.reserved);
    }
}
