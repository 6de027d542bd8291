//! Donors.

use super::Location;

/// An entity that produces food items.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Donor {
    pub id: String,
    pub location: Location,
}

impl Donor {
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            location,
        }
    }
}
