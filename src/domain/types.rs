use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

// ============================================================================
// Time series
// ============================================================================

/// One forecast or efficiency sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl TimePoint {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Granularity toggle shared by both forecast charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Seven daily samples
    #[default]
    Week,
    /// Twenty-four hourly samples
    Day,
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Week => write!(f, "week"),
            Self::Day => write!(f, "day"),
        }
    }
}

/// Round to a fixed number of decimals (half away from zero).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ============================================================================
// Metering categories
// ============================================================================

/// One of the three metered sub-loads.
///
/// Iteration order is the fixed display order: AC, Kitchen, Laundry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, AsRefStr,
)]
pub enum Category {
    #[serde(rename = "AC")]
    #[strum(serialize = "AC")]
    Ac,
    Kitchen,
    Laundry,
}

impl Category {
    pub fn all() -> impl Iterator<Item = Category> {
        Category::iter()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Per-category energy values (kWh) for a day or an hour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    #[serde(rename = "AC")]
    pub ac: f64,
    #[serde(rename = "Kitchen")]
    pub kitchen: f64,
    #[serde(rename = "Laundry")]
    pub laundry: f64,
}

impl CategoryTotals {
    pub const ZERO: CategoryTotals = CategoryTotals {
        ac: 0.0,
        kitchen: 0.0,
        laundry: 0.0,
    };

    pub fn new(ac: f64, kitchen: f64, laundry: f64) -> Self {
        Self { ac, kitchen, laundry }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Ac => self.ac,
            Category::Kitchen => self.kitchen,
            Category::Laundry => self.laundry,
        }
    }

    pub fn set(&mut self, category: Category, value: f64) {
        match category {
            Category::Ac => self.ac = value,
            Category::Kitchen => self.kitchen = value,
            Category::Laundry => self.laundry = value,
        }
    }

    /// Build from a per-category function, in display order.
    pub fn from_fn(mut f: impl FnMut(Category) -> f64) -> Self {
        let mut out = Self::ZERO;
        for category in Category::all() {
            out.set(category, f(category));
        }
        out
    }

    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self::from_fn(|c| f(self.get(c)))
    }

    /// `(category, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::all().map(move |c| (c, self.get(c)))
    }

    pub fn sum(&self) -> f64 {
        self.ac + self.kitchen + self.laundry
    }

    pub fn rounded(&self, decimals: u32) -> Self {
        self.map(|v| round_to(v, decimals))
    }
}

impl Add for CategoryTotals {
    type Output = CategoryTotals;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_fn(|c| self.get(c) + rhs.get(c))
    }
}

impl Div<f64> for CategoryTotals {
    type Output = CategoryTotals;

    fn div(self, rhs: f64) -> Self::Output {
        self.map(|v| v / rhs)
    }
}

impl std::iter::Sum for CategoryTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, t| acc + t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_and_names() {
        let names: Vec<String> = Category::all().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["AC", "Kitchen", "Laundry"]);
    }

    #[test]
    fn test_category_totals_serialize_with_display_names() {
        let totals = CategoryTotals::new(15.0, 10.0, 6.0);
        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["AC"], 15.0);
        assert_eq!(json["Kitchen"], 10.0);
        assert_eq!(json["Laundry"], 6.0);
    }

    #[test]
    fn test_category_totals_arithmetic() {
        let a = CategoryTotals::new(1.0, 2.0, 3.0);
        let b = CategoryTotals::new(0.5, 0.5, 0.5);
        assert_eq!(a + b, CategoryTotals::new(1.5, 2.5, 3.5));
        assert_eq!((a / 2.0).sum(), 3.0);
        let total: CategoryTotals = vec![a, b].into_iter().sum();
        assert_eq!(total.sum(), 7.5);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.987654, 4), 0.9877);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[test]
    fn test_time_range_display() {
        assert_eq!(TimeRange::Week.to_string(), "week");
        assert_eq!(TimeRange::Day.to_string(), "day");
        assert_eq!(TimeRange::default(), TimeRange::Week);
    }
}
