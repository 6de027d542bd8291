//! Domain models for the redistribution network.
//!
//! - [`Location`]: planar coordinates
//! - [`FoodItem`]: a perishable donation with reservation state
//! - [`Donor`]: the owner of food items
//! - [`Recipient`]: demand, priority tier and category preference
//! - [`Vehicle`]: capacity-constrained transport

mod donor;
mod food;
mod location;
mod recipient;
mod vehicle;

pub use donor::Donor;
pub use food::{FoodCategory, FoodItem, NutritionGrade};
pub use location::Location;
pub use recipient::{PriorityTier, Recipient, RecipientKind};
pub use vehicle::{Vehicle, VehicleKind};
