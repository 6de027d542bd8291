//! Distance and fuel primitives.
//!
//! All optimizers measure travel through a [`DistanceMetric`]. The default
//! [`Euclidean`] metric is planar; any `Fn(Location, Location) -> f64`
//! closure can stand in for it.

use crate::models::{Location, Vehicle};

/// A distance function between two locations.
pub trait DistanceMetric: Send + Sync {
    fn distance(&self, a: Location, b: Location) -> f64;
}

/// Planar Euclidean distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    fn distance(&self, a: Location, b: Location) -> f64 {
        distance(a, b)
    }
}

impl<F> DistanceMetric for F
where
    F: Fn(Location, Location) -> f64 + Send + Sync,
{
    fn distance(&self, a: Location, b: Location) -> f64 {
        self(a, b)
    }
}

/// Planar Euclidean distance between two locations.
pub fn distance(a: Location, b: Location) -> f64 {
    a.distance_to(b)
}

/// Fuel consumed over `distance` while carrying `load_kg`.
///
/// The consumption rate rises linearly with the load fraction, up to a 10%
/// surcharge at full capacity:
///
/// `distance × fuel_efficiency × (1 + 0.1 × min(load / capacity, 1))`
///
/// # Examples
///
/// ```
/// use u_foodnet::cost::fuel_consumption;
/// use u_foodnet::models::{Location, Vehicle, VehicleKind};
///
/// let van = Vehicle::new("V1", VehicleKind::Van, 100.0, Location::default(), 40.0, 0.2);
/// assert!((fuel_consumption(10.0, 0.0, &van) - 2.0).abs() < 1e-12);
/// assert!((fuel_consumption(10.0, 100.0, &van) - 2.2).abs() < 1e-12);
/// assert!((fuel_consumption(10.0, 500.0, &van) - 2.2).abs() < 1e-12);
/// ```
pub fn fuel_consumption(distance: f64, load_kg: f64, vehicle: &Vehicle) -> f64 {
    let load_factor = if vehicle.capacity_kg > 0.0 {
        (load_kg / vehicle.capacity_kg).clamp(0.0, 1.0)
    } else {
        1.0
    };
    distance * vehicle.fuel_efficiency * (1.0 + 0.1 * load_factor)
}

/// Litres burned on a delivery leg, treating `fuel_efficiency` as km/l.
pub fn delivery_fuel_litres(distance: f64, vehicle: &Vehicle) -> f64 {
    if vehicle.fuel_efficiency > 0.0 {
        distance / vehicle.fuel_efficiency
    } else {
        0.0
    }
}

/// Hours needed to drive `distance` at the vehicle's speed.
pub fn travel_hours(distance: f64, vehicle: &Vehicle) -> f64 {
    if vehicle.speed_kmh > 0.0 {
        distance / vehicle.speed_kmh
    } else {
        0.0
    }
}

/// Dense all-pairs distance matrix over a fixed list of locations.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds the matrix with `metric`. The diagonal is `f64::INFINITY`.
    pub fn build<M: DistanceMetric + ?Sized>(locations: &[Location], metric: &M) -> Self {
        let n = locations.len();
        let mut data = vec![f64::INFINITY; n * n];
        for (i, &a) in locations.iter().enumerate() {
            for (j, &b) in locations.iter().enumerate() {
                if i != j {
                    data[i * n + j] = metric.distance(a, b);
                }
            }
        }
        Self { n, data }
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance from `i` to `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }
}
