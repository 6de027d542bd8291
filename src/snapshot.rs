//! Optimizer inputs for one pass.

use chrono::NaiveDateTime;

use crate::models::{Donor, FoodItem, Recipient, Vehicle};

/// A food item paired with the donor holding it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub item: FoodItem,
    pub donor: Donor,
}

impl Candidate {
    pub fn new(item: FoodItem, donor: Donor) -> Self {
        Self { item, donor }
    }
}

/// Everything an optimizer sees during one pass.
///
/// The host filters its state before building a snapshot: candidates are
/// unreserved and unexpired, recipients have positive demand, vehicles are
/// idle. Optimizers borrow the snapshot immutably and report every state
/// change as a [`StateDelta`](crate::plan::StateDelta).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use u_foodnet::snapshot::Snapshot;
///
/// let now = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let snapshot = Snapshot::new(now);
/// assert!(snapshot.is_degenerate());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub candidates: Vec<Candidate>,
    pub recipients: Vec<Recipient>,
    pub vehicles: Vec<Vehicle>,
    pub now: NaiveDateTime,
    /// Simulation step, used to tag derived item ids.
    pub step: u64,
}

impl Snapshot {
    /// Creates an empty snapshot at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            candidates: Vec::new(),
            recipients: Vec::new(),
            vehicles: Vec::new(),
            now,
            step: 0,
        }
    }

    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }

    pub fn with_candidate(mut self, item: FoodItem, donor: Donor) -> Self {
        self.candidates.push(Candidate::new(item, donor));
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

    /// Sum of outstanding demand over all recipients.
    pub fn total_demand(&self) -> f64 {
        self.recipients.iter().map(|r| r.current_demand).sum()
    }

    /// Sum of candidate quantities.
    pub fn total_supply(&self) -> f64 {
        self.candidates.iter().map(|c| c.item.quantity_kg).sum()
    }

    /// Returns `true` when a vehicle-routing pass cannot assign anything
    /// (no candidates, no recipients, or no vehicles).
    pub fn is_degenerate(&self) -> bool {
        self.candidates.is_empty() || self.recipients.is_empty() || self.vehicles.is_empty()
    }

    /// Vehicle ids in input order.
    pub fn vehicle_ids(&self) -> impl Iterator<Item = &str> {
        self.vehicles.iter().map(|v| v.id.as_str())
    }

    /// Recipient ids in input order.
    pub fn recipient_ids(&self) -> impl Iterator<Item = &str> {
        self.recipients.iter().map(|r| r.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn test_totals() {
        let now = NaiveDate::from_ymd_opt(2025, 4, 30)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let expiry = now + Duration::hours(5);
        let item = |id: &str, kg: f64| {
            FoodItem::new(id, FoodCategory::Dairy, kg, expiry, 12.0, NutritionGrade::Low)
        };
        let donor = Donor::new("D1", Location::default());
        let s = Snapshot::new(now)
            .with_candidate(item("F1", 2.5), donor.clone())
            .with_candidate(item("F2", 4.0), donor)
            .with_recipient(Recipient::new(
                "R1",
                RecipientKind::Shelter,
                Location::default(),
                FoodCategory::Dairy,
                PriorityTier::Low,
                7.0,
            ));
        assert!((s.total_supply() - 6.5).abs() < 1e-12);
        assert!((s.total_demand() - 7.0).abs() < 1e-12);
        assert!(s.is_degenerate());
        assert_eq!(s.recipient_ids().collect::<Vec<_>>(), ["R1"]);
    }
}
