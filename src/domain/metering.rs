use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::CategoryTotals;

/// Historical per-category totals for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyMetering {
    pub date: NaiveDate,
    pub totals: CategoryTotals,
}

impl DailyMetering {
    pub fn new(date: NaiveDate, totals: CategoryTotals) -> Self {
        Self { date, totals }
    }

    /// Map raw sub-meter readings onto categories.
    ///
    /// Sub-meter 3 is the AC circuit, 1 the kitchen and 2 the laundry room.
    pub fn from_sub_meters(date: NaiveDate, sub_1: f64, sub_2: f64, sub_3: f64) -> Self {
        Self {
            date,
            totals: CategoryTotals::new(sub_3, sub_1, sub_2),
        }
    }
}

/// Find the record for a calendar day.
pub fn find_day(records: &[DailyMetering], date: NaiveDate) -> Option<&DailyMetering> {
    records.iter().find(|r| r.date == date)
}

/// "Last month average" reference used for thresholds and deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub total: f64,
    pub per_category: CategoryTotals,
}

impl Baseline {
    pub const HOURS_PER_DAY: f64 = 24.0;

    pub fn new(total: f64, per_category: CategoryTotals) -> Self {
        Self { total, per_category }
    }

    /// Hourly-equivalent of a daily baseline.
    pub fn hourly(&self) -> Baseline {
        Baseline {
            total: self.total / Self::HOURS_PER_DAY,
            per_category: self.per_category / Self::HOURS_PER_DAY,
        }
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            total: 17.0,
            per_category: CategoryTotals::new(11.0, 4.0, 6.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_meter_mapping() {
        let date = NaiveDate::from_ymd_opt(2007, 12, 5).unwrap();
        let day = DailyMetering::from_sub_meters(date, 10.0, 6.0, 15.0);
        assert_eq!(day.totals, CategoryTotals::new(15.0, 10.0, 6.0));
    }

    #[test]
    fn test_hourly_baseline() {
        let hourly = Baseline::default().hourly();
        assert_eq!(hourly.total, 17.0 / 24.0);
        assert_eq!(hourly.per_category.ac, 11.0 / 24.0);
        assert_eq!(hourly.per_category.kitchen, 4.0 / 24.0);
        assert_eq!(hourly.per_category.laundry, 6.0 / 24.0);
    }

    #[test]
    fn test_find_day() {
        let d1 = NaiveDate::from_ymd_opt(2007, 11, 29).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2007, 11, 30).unwrap();
        let records = vec![DailyMetering::new(d1, CategoryTotals::ZERO)];
        assert!(find_day(&records, d1).is_some());
        assert!(find_day(&records, d2).is_none());
    }
}
