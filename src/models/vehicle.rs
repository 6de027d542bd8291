//! Vehicles.

use super::Location;

/// Vehicle category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleKind {
    Van,
    Truck,
}

/// A capacity-constrained transport.
///
/// A busy vehicle receives no new assignment until it is released.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    pub id: String,
    pub kind: VehicleKind,
    pub capacity_kg: f64,
    pub location: Location,
    pub speed_kmh: f64,
    /// Kilometres per litre for delivery records; litres per kilometre
    /// in the routing fuel model.
    pub fuel_efficiency: f64,
    pub busy: bool,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        kind: VehicleKind,
        capacity_kg: f64,
        location: Location,
        speed_kmh: f64,
        fuel_efficiency: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            capacity_kg,
            location,
            speed_kmh,
            fuel_efficiency,
            busy: false,
        }
    }
}
