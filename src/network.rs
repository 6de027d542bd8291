//! Host-side network state.
//!
//! A thin container for donors' item pools, recipients and vehicles. It
//! gathers [`Snapshot`]s for the optimizers, applies their plans
//! atomically, sweeps expired stock, and records deliveries. Clocks, item
//! generation and demand forecasting stay with the caller.

use chrono::{Duration, NaiveDateTime};

use crate::cost::{delivery_fuel_litres, distance, travel_hours};
use crate::error::ApplyError;
use crate::models::{Donor, FoodCategory, FoodItem, Recipient, Vehicle};
use crate::plan::{Assignment, Plan, StateDelta};
use crate::snapshot::Snapshot;

/// Slack allowed when a plan reduces an item by slightly more than it
/// holds.
pub const APPLY_TOLERANCE_KG: f64 = 1e-6;

/// A donor and the items it currently holds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DonorPool {
    pub donor: Donor,
    pub items: Vec<FoodItem>,
}

impl DonorPool {
    pub fn new(donor: Donor) -> Self {
        Self {
            donor,
            items: Vec::new(),
        }
    }
}

/// Why food was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WasteReason {
    /// Expired in a donor's pool before being allocated.
    Expired,
    /// Expired after allocation, before it reached the recipient.
    ExpiredDuringDelivery,
}

/// Food that expired without reaching anyone.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WasteRecord {
    pub item_id: String,
    pub donor_id: String,
    pub category: FoodCategory,
    pub quantity_kg: f64,
    pub at: NaiveDateTime,
    pub reason: WasteReason,
}

/// A completed hand-over.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryRecord {
    pub vehicle_id: Option<String>,
    pub donor_id: String,
    pub recipient_id: String,
    pub item_id: String,
    pub quantity_kg: f64,
    /// Vehicle to donor to recipient (donor to recipient without a vehicle).
    pub distance_km: f64,
    pub fuel_litres: f64,
    pub travel_hours: f64,
    pub dispatched_at: NaiveDateTime,
    pub arrival: NaiveDateTime,
    /// The item was still fresh on arrival.
    pub timely: bool,
}

/// Result of executing one assignment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeliveryOutcome {
    Delivered(DeliveryRecord),
    Wasted(WasteRecord),
}

/// Donors, recipients and vehicles of one redistribution network.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use u_foodnet::greedy::GreedyAllocator;
/// use u_foodnet::models::*;
/// use u_foodnet::network::Network;
///
/// let now = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let mut network = Network::new()
///     .with_donor(Donor::new("D1", Location::new(0.0, 0.0)))
///     .with_recipient(Recipient::new("R1", RecipientKind::Shelter, Location::new(2.0, 0.0),
///         FoodCategory::Bread, PriorityTier::Medium, 3.0));
/// let expiry = now + Duration::hours(8);
/// let bread = FoodItem::new("F1", FoodCategory::Bread, 5.0, expiry, 24.0, NutritionGrade::Low);
/// network.donate("D1", bread).unwrap();
///
/// let plan = GreedyAllocator::default().allocate(&network.snapshot(now, 0)).unwrap();
/// network.apply(&plan).unwrap();
/// assert_eq!(network.recipients[0].current_demand, 0.0);
/// assert!((network.item("F1").unwrap().quantity_kg - 2.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Network {
    pub donors: Vec<DonorPool>,
    pub recipients: Vec<Recipient>,
    pub vehicles: Vec<Vehicle>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_donor(mut self, donor: Donor) -> Self {
        self.donors.push(DonorPool::new(donor));
        self
    }

    pub fn with_recipient(mut self, recipient: Recipient) -> Self {
        self.recipients.push(recipient);
        self
    }

    pub fn with_vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicles.push(vehicle);
        self
    }

    /// Adds an item to a donor's pool.
    pub fn donate(&mut self, donor_id: &str, item: FoodItem) -> Result<(), ApplyError> {
        let pool = self
            .donors
            .iter_mut()
            .find(|p| p.donor.id == donor_id)
            .ok_or_else(|| ApplyError::UnknownDonor(donor_id.to_string()))?;
        pool.items.push(item);
        Ok(())
    }

    /// Raises a recipient's outstanding demand.
    pub fn add_demand(&mut self, recipient_id: &str, kg: f64) -> Result<(), ApplyError> {
        let recipient = self.recipient_mut(recipient_id)?;
        recipient.current_demand = (recipient.current_demand + kg).max(0.0);
        Ok(())
    }

    /// Looks up an item in any donor's pool.
    pub fn item(&self, item_id: &str) -> Option<&FoodItem> {
        self.donors
            .iter()
            .flat_map(|p| p.items.iter())
            .find(|i| i.id == item_id)
    }

    /// Gathers the optimizer input: unreserved, unexpired items with stock
    /// left, recipients with demand, idle vehicles.
    pub fn snapshot(&self, now: NaiveDateTime, step: u64) -> Snapshot {
        let mut snapshot = Snapshot::new(now).with_step(step);
        for pool in &self.donors {
            for item in &pool.items {
                if !item.reserved && !item.is_expired(now) && item.quantity_kg > 0.0 {
                    snapshot = snapshot.with_candidate(item.clone(), pool.donor.clone());
                }
            }
        }
        snapshot.recipients = self
            .recipients
            .iter()
            .filter(|r| r.has_demand())
            .cloned()
            .collect();
        snapshot.vehicles = self.vehicles.iter().filter(|v| !v.busy).cloned().collect();
        snapshot
    }

    /// Applies every delta of `plan`, or none of them.
    ///
    /// Fails on unknown ids, on reducing an item by more than it holds
    /// (beyond [`APPLY_TOLERANCE_KG`]), and on dispatching a busy vehicle.
    pub fn apply(&mut self, plan: &Plan) -> Result<(), ApplyError> {
        let mut next = self.clone();
        for delta in &plan.deltas {
            next.apply_delta(delta)?;
        }
        *self = next;
        tracing::debug!(
            deltas = plan.deltas.len(),
            assigned_kg = plan.total_kg,
            "plan applied"
        );
        Ok(())
    }

    fn apply_delta(&mut self, delta: &StateDelta) -> Result<(), ApplyError> {
        match delta {
            StateDelta::ReduceItem { item_id, kg } => {
                let item = self.item_mut(item_id)?;
                if *kg > item.quantity_kg + APPLY_TOLERANCE_KG {
                    return Err(ApplyError::Overdraw {
                        item_id: item_id.clone(),
                        available: item.quantity_kg,
                        requested: *kg,
                    });
                }
                item.quantity_kg = (item.quantity_kg - kg).max(0.0);
            }
            StateDelta::ReserveItem { item_id } => self.item_mut(item_id)?.reserve(),
            StateDelta::ReduceDemand { recipient_id, kg } => {
                self.recipient_mut(recipient_id)?.reduce_demand(*kg)
            }
            StateDelta::DispatchVehicle { vehicle_id } => {
                let vehicle = self.vehicle_mut(vehicle_id)?;
                if vehicle.busy {
                    return Err(ApplyError::VehicleBusy(vehicle_id.clone()));
                }
                vehicle.busy = true;
            }
        }
        Ok(())
    }

    /// Removes expired unreserved items and fully consumed ones.
    ///
    /// Only the expired items are reported as waste.
    pub fn sweep_expired(&mut self, now: NaiveDateTime) -> Vec<WasteRecord> {
        let mut waste = Vec::new();
        for pool in &mut self.donors {
            let donor_id = &pool.donor.id;
            pool.items.retain(|item| {
                if item.quantity_kg <= 0.0 {
                    return false;
                }
                if item.is_expired(now) && !item.reserved {
                    waste.push(WasteRecord {
                        item_id: item.id.clone(),
                        donor_id: donor_id.clone(),
                        category: item.category,
                        quantity_kg: item.quantity_kg,
                        at: now,
                        reason: WasteReason::Expired,
                    });
                    return false;
                }
                true
            });
        }
        if !waste.is_empty() {
            tracing::info!(
                items = waste.len(),
                kg = waste.iter().map(|w| w.quantity_kg).sum::<f64>(),
                "expired items swept"
            );
        }
        waste
    }

    /// Executes one applied assignment at `now`.
    ///
    /// An item that has already expired is reported as waste. Otherwise the
    /// recipient's fulfilled total grows and a delivery record is returned;
    /// the record is timely when the item is still fresh on arrival.
    /// Demand was already lowered when the plan was applied.
    pub fn deliver(
        &mut self,
        assignment: &Assignment,
        now: NaiveDateTime,
    ) -> Result<DeliveryOutcome, ApplyError> {
        let donor_location = self
            .donors
            .iter()
            .find(|p| p.donor.id == assignment.donor_id)
            .map(|p| p.donor.location)
            .ok_or_else(|| ApplyError::UnknownDonor(assignment.donor_id.clone()))?;
        let recipient_location = self.recipient_mut(&assignment.recipient_id)?.location;
        let vehicle = match &assignment.vehicle_id {
            Some(id) => Some(self.vehicle_mut(id)?.clone()),
            None => None,
        };

        let item = &assignment.item;
        if item.is_expired(now) {
            tracing::debug!(item = %item.id, "item expired before delivery");
            return Ok(DeliveryOutcome::Wasted(WasteRecord {
                item_id: item.id.clone(),
                donor_id: assignment.donor_id.clone(),
                category: item.category,
                quantity_kg: item.quantity_kg,
                at: now,
                reason: WasteReason::ExpiredDuringDelivery,
            }));
        }

        let leg = distance(donor_location, recipient_location);
        let (distance_km, fuel_litres, hours) = match &vehicle {
            Some(v) => {
                let total = distance(v.location, donor_location) + leg;
                (total, delivery_fuel_litres(total, v), travel_hours(total, v))
            }
            None => (leg, 0.0, 0.0),
        };
        let arrival = now + Duration::milliseconds((hours * 3_600_000.0) as i64);

        self.recipient_mut(&assignment.recipient_id)?.fulfilled_kg += item.quantity_kg;
        self.remove_if_consumed(&assignment.source_item_id);

        Ok(DeliveryOutcome::Delivered(DeliveryRecord {
            vehicle_id: assignment.vehicle_id.clone(),
            donor_id: assignment.donor_id.clone(),
            recipient_id: assignment.recipient_id.clone(),
            item_id: item.id.clone(),
            quantity_kg: item.quantity_kg,
            distance_km,
            fuel_litres,
            travel_hours: hours,
            dispatched_at: now,
            arrival,
            timely: arrival < item.expiry,
        }))
    }

    /// Marks a vehicle idle again.
    pub fn release_vehicle(&mut self, vehicle_id: &str) -> Result<(), ApplyError> {
        self.vehicle_mut(vehicle_id)?.busy = false;
        Ok(())
    }

    /// Returns an item to the pool after an aborted delivery.
    pub fn unreserve(&mut self, item_id: &str) -> Result<(), ApplyError> {
        self.item_mut(item_id)?.unreserve();
        Ok(())
    }

    fn remove_if_consumed(&mut self, item_id: &str) {
        for pool in &mut self.donors {
            pool.items.retain(|i| i.id != item_id || i.quantity_kg > 0.0);
        }
    }

    fn item_mut(&mut self, item_id: &str) -> Result<&mut FoodItem, ApplyError> {
        self.donors
            .iter_mut()
            .flat_map(|p| p.items.iter_mut())
            .find(|i| i.id == item_id)
            .ok_or_else(|| ApplyError::UnknownItem(item_id.to_string()))
    }

    fn recipient_mut(&mut self, recipient_id: &str) -> Result<&mut Recipient, ApplyError> {
        self.recipients
            .iter_mut()
            .find(|r| r.id == recipient_id)
            .ok_or_else(|| ApplyError::UnknownRecipient(recipient_id.to_string()))
    }

    fn vehicle_mut(&mut self, vehicle_id: &str) -> Result<&mut Vehicle, ApplyError> {
        self.vehicles
            .iter_mut()
            .find(|v| v.id == vehicle_id)
            .ok_or_else(|| ApplyError::UnknownVehicle(vehicle_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greedy::GreedyAllocator;
    use crate::models::*;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 4, 30)
            .and_then(|d| d.and_hms_opt(6, 0, 0))
            .unwrap()
    }

    fn item(id: &str, kg: f64, hours_left: i64) -> FoodItem {
        FoodItem::new(
            id,
            FoodCategory::Vegetables,
            kg,
            now() + Duration::hours(hours_left),
            48.0,
            NutritionGrade::Medium,
        )
    }

    fn network() -> Network {
        let mut n = Network::new()
            .with_donor(Donor::new("D1", Location::new(0.0, 0.0)))
            .with_recipient(Recipient::new(
                "R1",
                RecipientKind::FoodBank,
                Location::new(30.0, 40.0),
                FoodCategory::Vegetables,
                PriorityTier::High,
                10.0,
            ))
            .with_recipient(Recipient::new(
                "R2",
                RecipientKind::Shelter,
                Location::new(0.0, 10.0),
                FoodCategory::Dairy,
                PriorityTier::Low,
                0.0,
            ))
            .with_vehicle(Vehicle::new(
                "V1",
                VehicleKind::Truck,
                50.0,
                Location::new(0.0, 0.0),
                50.0,
                10.0,
            ));
        n.donate("D1", item("F1", 6.0, 10)).unwrap();
        n.donate("D1", item("F2", 8.0, -1)).unwrap();
        n
    }

    #[test]
    fn test_snapshot_filters() {
        let mut n = network();
        n.donate("D1", item("F3", 0.0, 10)).unwrap();
        let mut reserved = item("F4", 2.0, 10);
        reserved.reserve();
        n.donate("D1", reserved).unwrap();
        n.vehicles.push(Vehicle::new(
            "V2",
            VehicleKind::Van,
            5.0,
            Location::default(),
            40.0,
            8.0,
        ));
        n.vehicles[1].busy = true;

        let s = n.snapshot(now(), 2);
        assert_eq!(s.step, 2);
        let ids: Vec<&str> = s.candidates.iter().map(|c| c.item.id.as_str()).collect();
        assert_eq!(ids, ["F1"]);
        assert_eq!(s.recipient_ids().collect::<Vec<_>>(), ["R1"]);
        assert_eq!(s.vehicle_ids().collect::<Vec<_>>(), ["V1"]);
    }

    #[test]
    fn test_apply_greedy_plan() {
        let mut n = network();
        let plan = GreedyAllocator::default()
            .allocate(&n.snapshot(now(), 0))
            .unwrap();
        n.apply(&plan).unwrap();
        assert_eq!(n.item("F1").unwrap().quantity_kg, 0.0);
        assert!(n.item("F1").unwrap().reserved);
        assert!((n.recipients[0].current_demand - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_is_atomic() {
        let mut n = network();
        let before = n.clone();
        let plan = Plan {
            deltas: vec![
                StateDelta::ReduceItem {
                    item_id: "F1".into(),
                    kg: 2.0,
                },
                StateDelta::ReduceDemand {
                    recipient_id: "R1".into(),
                    kg: 2.0,
                },
                StateDelta::ReserveItem {
                    item_id: "nope".into(),
                },
            ],
            ..Plan::empty_by_vehicle(&n.snapshot(now(), 0))
        };
        assert_eq!(n.apply(&plan), Err(ApplyError::UnknownItem("nope".into())));
        assert_eq!(n, before);
    }

    #[test]
    fn test_overdraw_and_tolerance() {
        let mut n = network();
        let mut plan = Plan::empty_by_vehicle(&n.snapshot(now(), 0));
        plan.deltas.push(StateDelta::ReduceItem {
            item_id: "F1".into(),
            kg: 6.0 + 1e-9,
        });
        n.apply(&plan).unwrap();
        assert_eq!(n.item("F1").unwrap().quantity_kg, 0.0);

        plan.deltas[0] = StateDelta::ReduceItem {
            item_id: "F2".into(),
            kg: 9.0,
        };
        assert!(matches!(n.apply(&plan), Err(ApplyError::Overdraw { .. })));
    }

    #[test]
    fn test_dispatch_busy_vehicle_rejected() {
        let mut n = network();
        let mut plan = Plan::empty_by_vehicle(&n.snapshot(now(), 0));
        plan.deltas.push(StateDelta::DispatchVehicle {
            vehicle_id: "V1".into(),
        });
        n.apply(&plan).unwrap();
        assert!(n.vehicles[0].busy);
        assert_eq!(n.apply(&plan), Err(ApplyError::VehicleBusy("V1".into())));
        n.release_vehicle("V1").unwrap();
        assert!(!n.vehicles[0].busy);
    }

    #[test]
    fn test_sweep_expired() {
        let mut n = network();
        let mut reserved = item("F3", 1.0, -2);
        reserved.reserve();
        n.donate("D1", reserved).unwrap();
        n.donate("D1", item("F4", 0.0, 5)).unwrap();

        let waste = n.sweep_expired(now());
        assert_eq!(waste.len(), 1);
        assert_eq!(waste[0].item_id, "F2");
        assert_eq!(waste[0].reason, WasteReason::Expired);
        assert!((waste[0].quantity_kg - 8.0).abs() < 1e-12);
        assert!(n.item("F2").is_none());
        assert!(n.item("F4").is_none());
        assert!(n.item("F3").is_some());
        assert!(n.item("F1").is_some());
    }

    #[test]
    fn test_deliver_by_vehicle() {
        let mut n = network();
        let source = n.item("F1").unwrap().clone();
        let assignment = Assignment {
            vehicle_id: Some("V1".into()),
            donor_id: "D1".into(),
            recipient_id: "R1".into(),
            source_item_id: "F1".into(),
            item: source.split("F1_ga_0_0", 2.0),
        };

        let DeliveryOutcome::Delivered(record) = n.deliver(&assignment, now()).unwrap() else {
            panic!("expected a delivery");
        };
        // V1 sits at the donor; donor to R1 is 50 km.
        assert!((record.distance_km - 50.0).abs() < 1e-9);
        assert!((record.fuel_litres - 5.0).abs() < 1e-9);
        assert!((record.travel_hours - 1.0).abs() < 1e-9);
        assert_eq!(record.arrival, now() + Duration::hours(1));
        assert!(record.timely);
        assert!((n.recipients[0].fulfilled_kg - 2.0).abs() < 1e-12);
        assert!(n.item("F1").is_some());

        let late = now() + Duration::hours(9) + Duration::minutes(30);
        let DeliveryOutcome::Delivered(record) = n.deliver(&assignment, late).unwrap() else {
            panic!("expected a delivery");
        };
        assert!(!record.timely);
    }

    #[test]
    fn test_deliver_expired_is_waste() {
        let mut n = network();
        let plan = GreedyAllocator::default()
            .allocate(&n.snapshot(now(), 0))
            .unwrap();
        n.apply(&plan).unwrap();
        let assignment = plan.group("R1")[0].clone();
        let later = now() + Duration::hours(11);
        match n.deliver(&assignment, later).unwrap() {
            DeliveryOutcome::Wasted(w) => {
                assert_eq!(w.reason, WasteReason::ExpiredDuringDelivery);
                assert_eq!(w.at, later);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(n.recipients[0].fulfilled_kg, 0.0);
    }

    #[test]
    fn test_unknown_ids() {
        let mut n = network();
        assert_eq!(
            n.donate("D9", item("X", 1.0, 1)),
            Err(ApplyError::UnknownDonor("D9".into()))
        );
        assert!(n.unreserve("X").is_err());
        assert!(n.release_vehicle("V9").is_err());
        assert!(n.add_demand("R9", 1.0).is_err());
        n.add_demand("R2", 3.0).unwrap();
        assert!(n.recipients[1].has_demand());
    }
}
