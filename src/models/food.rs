//! Food items and their metadata.

use chrono::NaiveDateTime;

/// Category of a donated food item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FoodCategory {
    Vegetables,
    Dairy,
    Canned,
    Bread,
}

impl FoodCategory {
    /// All categories in declaration order.
    pub const ALL: [FoodCategory; 4] = [
        FoodCategory::Vegetables,
        FoodCategory::Dairy,
        FoodCategory::Canned,
        FoodCategory::Bread,
    ];
}

/// Nutritional grade of a food item.
///
/// A categorical label. Splitting an item copies the grade unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NutritionGrade {
    High,
    Medium,
    Low,
}

impl NutritionGrade {
    /// Ordinal rank used for sorting: High = 3, Medium = 2, Low = 1.
    pub fn rank(self) -> u8 {
        match self {
            NutritionGrade::High => 3,
            NutritionGrade::Medium => 2,
            NutritionGrade::Low => 1,
        }
    }
}

/// A perishable donation.
///
/// `quantity_kg` shrinks as fractions are allocated; every allocated
/// fraction becomes a derived item (see [`FoodItem::split`]) carrying the
/// same metadata. A reserved item must not be allocated again until it is
/// explicitly unreserved.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use u_foodnet::models::{FoodCategory, FoodItem, NutritionGrade};
///
/// let now = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap().and_hms_opt(8, 0, 0).unwrap();
/// let expiry = now + chrono::Duration::hours(6);
/// let item = FoodItem::new("F1", FoodCategory::Dairy, 5.0, expiry, 24.0, NutritionGrade::High);
/// assert!((item.hours_to_expiry(now) - 6.0).abs() < 1e-9);
/// assert!(!item.is_expired(now));
///
/// let part = item.split("F1_alloc_0", 2.0);
/// assert_eq!(part.quantity_kg, 2.0);
/// assert_eq!(part.nutrition, NutritionGrade::High);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoodItem {
    pub id: String,
    pub category: FoodCategory,
    pub quantity_kg: f64,
    pub expiry: NaiveDateTime,
    /// Hours from donation to forced expiry.
    pub perishability_hours: f64,
    pub nutrition: NutritionGrade,
    pub reserved: bool,
}

impl FoodItem {
    /// Creates an unreserved item.
    pub fn new(
        id: impl Into<String>,
        category: FoodCategory,
        quantity_kg: f64,
        expiry: NaiveDateTime,
        perishability_hours: f64,
        nutrition: NutritionGrade,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            quantity_kg: quantity_kg.max(0.0),
            expiry,
            perishability_hours,
            nutrition,
            reserved: false,
        }
    }

    /// Returns `true` once `now` has reached the expiry timestamp.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now >= self.expiry
    }

    /// Signed hours between `now` and expiry (negative once expired).
    pub fn hours_to_expiry(&self, now: NaiveDateTime) -> f64 {
        (self.expiry - now).num_milliseconds() as f64 / 3_600_000.0
    }

    pub fn reserve(&mut self) {
        self.reserved = true;
    }

    pub fn unreserve(&mut self) {
        self.reserved = false;
    }

    /// Creates a derived item for an allocated fraction.
    ///
    /// The derived item is marked reserved: it is already claimed by the
    /// assignment that carries it.
    pub fn split(&self, id: impl Into<String>, quantity_kg: f64) -> FoodItem {
        FoodItem {
            id: id.into(),
            quantity_kg: quantity_kg.max(0.0),
            reserved: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 30)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_expiry_boundary() {
        let item = FoodItem::new(
            "F1",
            FoodCategory::Bread,
            3.0,
            now() + Duration::hours(2),
            24.0,
            NutritionGrade::Low,
        );
        assert!(!item.is_expired(now()));
        assert!(item.is_expired(now() + Duration::hours(2)));
        assert!((item.hours_to_expiry(now() + Duration::hours(3)) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_quantity_clamped() {
        let item = FoodItem::new(
            "F1",
            FoodCategory::Bread,
            -1.0,
            now(),
            24.0,
            NutritionGrade::Low,
        );
        assert_eq!(item.quantity_kg, 0.0);
    }

    #[test]
    fn test_split_keeps_metadata() {
        let item = FoodItem::new(
            "F1",
            FoodCategory::Vegetables,
            10.0,
            now() + Duration::hours(20),
            24.0,
            NutritionGrade::Medium,
        );
        let part = item.split("F1_x", 4.0);
        assert_eq!(part.id, "F1_x");
        assert_eq!(part.category, FoodCategory::Vegetables);
        assert_eq!(part.expiry, item.expiry);
        assert_eq!(part.nutrition, NutritionGrade::Medium);
        assert!(part.reserved);
        assert!(!item.reserved);
    }

    #[test]
    fn test_nutrition_rank_order() {
        assert!(NutritionGrade::High.rank() > NutritionGrade::Medium.rank());
        assert!(NutritionGrade::Medium.rank() > NutritionGrade::Low.rank());
    }
}
