//! Planar locations.

/// A point on the simulation plane.
///
/// # Examples
///
/// ```
/// use u_foodnet::models::Location;
///
/// let a = Location::new(0.0, 0.0);
/// let b = Location::new(3.0, 4.0);
/// assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    /// Creates a location from coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another location.
    pub fn distance_to(self, other: Location) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Location {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}
