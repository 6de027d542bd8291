//! Error types.
//!
//! Degenerate inputs (empty pools, infeasible LPs, zero sampling weights)
//! are not errors: optimizers degrade to empty plans. Errors are reserved
//! for invalid configuration and for state deltas that do not match the
//! state they are applied to.

use thiserror::Error;

/// An invalid optimizer parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A count parameter (population, generations, ants, ...) is too small.
    #[error("{name} must be at least {min}, got {value}")]
    TooSmall {
        name: &'static str,
        min: usize,
        value: usize,
    },

    /// A probability or fraction lies outside its allowed range.
    #[error("{name} must lie in [{lo}, {hi}], got {value}")]
    OutOfRange {
        name: &'static str,
        lo: f64,
        hi: f64,
        value: f64,
    },

    /// A weight or constant must be non-negative and finite.
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// Elites would fill the whole population.
    #[error("elite_ratio too high: {elites} elites fill a population of {population}")]
    EliteOverflow { elites: usize, population: usize },

    /// A time limit of zero milliseconds.
    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,
}

/// A state delta that cannot be applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplyError {
    #[error("unknown food item `{0}`")]
    UnknownItem(String),

    #[error("unknown donor `{0}`")]
    UnknownDonor(String),

    #[error("unknown recipient `{0}`")]
    UnknownRecipient(String),

    #[error("unknown vehicle `{0}`")]
    UnknownVehicle(String),

    /// Reducing an item by more than it holds.
    #[error("item `{item_id}` holds {available:.3} kg, cannot reduce by {requested:.3} kg")]
    Overdraw {
        item_id: String,
        available: f64,
        requested: f64,
    },

    /// Dispatching a vehicle that is already on the road.
    #[error("vehicle `{0}` is already busy")]
    VehicleBusy(String),
}

/// Error returned by an optimizer pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
