//! Recipients and their demand state.

use super::{FoodCategory, Location};

/// Kind of receiving organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecipientKind {
    FoodBank,
    Shelter,
    CommunityCenter,
}

/// Priority tier of a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

/// An entity with replenishing demand for food.
///
/// Optimizers only ever decrease `current_demand` (through
/// [`StateDelta::ReduceDemand`](crate::plan::StateDelta::ReduceDemand));
/// host-side demand updates increase it. It is never negative.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recipient {
    pub id: String,
    pub kind: RecipientKind,
    pub location: Location,
    pub preference: FoodCategory,
    pub priority: PriorityTier,
    pub current_demand: f64,
    /// Kilograms delivered so far.
    pub fulfilled_kg: f64,
}

impl Recipient {
    pub fn new(
        id: impl Into<String>,
        kind: RecipientKind,
        location: Location,
        preference: FoodCategory,
        priority: PriorityTier,
        current_demand: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            location,
            preference,
            priority,
            current_demand: current_demand.max(0.0),
            fulfilled_kg: 0.0,
        }
    }

    /// Lowers demand by `kg`, clamping at zero.
    pub fn reduce_demand(&mut self, kg: f64) {
        self.current_demand = (self.current_demand - kg).max(0.0);
    }

    /// Returns `true` while there is outstanding demand.
    pub fn has_demand(&self) -> bool {
        self.current_demand > 0.0
    }
}
