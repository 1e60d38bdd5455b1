use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Month-average consumption as reported by `get_month_average`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthAverage {
    pub average_kwh_per_day: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_kwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_kwh_per_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_meter_avg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

impl MonthAverage {
    pub fn per_day(average_kwh_per_day: f64) -> Self {
        Self {
            average_kwh_per_day,
            month: None,
            total_kwh: None,
            average_kwh_per_hour: None,
            sub_meter_avg: None,
            days: None,
        }
    }
}

/// Aggregates for one week, as computed by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekAggregate {
    pub total_active_power_kwh: f64,
    pub avg_active_power_kw: f64,
    pub sub_metering_1: f64,
    pub sub_metering_2: f64,
    pub sub_metering_3: f64,
    pub sub_metering_avg: f64,
    pub efficiency: f64,
}

/// Week-over-week comparison returned by `compare_weeks`.
///
/// Neither view consumes this yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekComparison {
    pub this_week: WeekAggregate,
    pub last_week: WeekAggregate,
    /// `<field>_diff` -> this week minus last week
    pub difference: BTreeMap<String, f64>,
}

/// Fixed figures behind a summary card (bill or efficiency score).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardFigures {
    pub projected: f64,
    pub last_month: f64,
    pub month_to_date: f64,
}

impl CardFigures {
    pub fn new(projected: f64, last_month: f64, month_to_date: f64) -> Self {
        Self {
            projected,
            last_month,
            month_to_date,
        }
    }
}
