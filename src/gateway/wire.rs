//! Response shapes as the prediction service emits them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::{GatewayError, GatewayResult};
use crate::domain::{DailyMetering, MonthAverage, TimePoint};

/// Accepts RFC 3339, naive ISO date-times and bare dates.
pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

fn timestamp_from_value(endpoint: &'static str, value: &Value) -> GatewayResult<NaiveDateTime> {
    match value {
        Value::String(s) => parse_timestamp(s)
            .ok_or_else(|| GatewayError::decode(endpoint, format!("unparsable timestamp {s:?}"))),
        // pandas serialises timestamps as epoch milliseconds in some paths
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| GatewayError::decode(endpoint, format!("bad epoch timestamp {n}"))),
        other => Err(GatewayError::decode(
            endpoint,
            format!("expected timestamp, got {other}"),
        )),
    }
}

fn timestamp_from_str(endpoint: &'static str, raw: &str) -> GatewayResult<NaiveDateTime> {
    parse_timestamp(raw)
        .ok_or_else(|| GatewayError::decode(endpoint, format!("unparsable timestamp {raw:?}")))
}

// ----------------------------------------------------------------------------
// predict_next_7_days
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct DailyForecastResponse {
    pub forecast: DailyForecastColumns,
}

/// Column-oriented frame: each column maps a stringified row index to a cell.
#[derive(Debug, Deserialize)]
pub(crate) struct DailyForecastColumns {
    #[serde(rename = "Date")]
    pub date: HashMap<String, Value>,
    #[serde(rename = "Predicted_Daily_Energy_kWh")]
    pub predicted: HashMap<String, f64>,
}

impl DailyForecastResponse {
    pub fn into_points(self, endpoint: &'static str) -> GatewayResult<Vec<TimePoint>> {
        let DailyForecastColumns { date, predicted } = self.forecast;

        // Integer-like keys come first in ascending order, the rest lexically.
        let mut keys: Vec<&String> = predicted.keys().collect();
        keys.sort_by_cached_key(|k| (k.parse::<u64>().map_err(|_| ()), k.to_string()));

        keys.into_iter()
            .map(|key| {
                let raw = date.get(key).ok_or_else(|| {
                    GatewayError::decode(endpoint, format!("row {key} has no Date"))
                })?;
                let timestamp = timestamp_from_value(endpoint, raw)?;
                Ok(TimePoint::new(timestamp, predicted[key]))
            })
            .collect()
    }
}

// ----------------------------------------------------------------------------
// predict_next_24_hours
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct HourlyForecastResponse {
    pub forecast: Vec<HourlyForecastRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HourlyForecastRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Predicted_Hourly_Energy_kWh")]
    pub predicted: f64,
}

impl HourlyForecastResponse {
    pub fn into_points(self, endpoint: &'static str) -> GatewayResult<Vec<TimePoint>> {
        self.forecast
            .into_iter()
            .map(|row| Ok(TimePoint::new(timestamp_from_str(endpoint, &row.date)?, row.predicted)))
            .collect()
    }
}

// ----------------------------------------------------------------------------
// efficiency_7_days / efficiency_24_hours
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct DailyEfficiencyRow {
    pub date: String,
    #[serde(rename = "Predicted_Efficiency")]
    pub predicted: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HourlyEfficiencyRow {
    pub datetime: String,
    #[serde(rename = "Power_factor_pred")]
    pub predicted: f64,
}

pub(crate) fn daily_efficiency_points(
    endpoint: &'static str,
    rows: Vec<DailyEfficiencyRow>,
) -> GatewayResult<Vec<TimePoint>> {
    rows.into_iter()
        .map(|row| Ok(TimePoint::new(timestamp_from_str(endpoint, &row.date)?, row.predicted)))
        .collect()
}

pub(crate) fn hourly_efficiency_points(
    endpoint: &'static str,
    rows: Vec<HourlyEfficiencyRow>,
) -> GatewayResult<Vec<TimePoint>> {
    rows.into_iter()
        .map(|row| {
            Ok(TimePoint::new(
                timestamp_from_str(endpoint, &row.datetime)?,
                row.predicted,
            ))
        })
        .collect()
}

// ----------------------------------------------------------------------------
// get_month_average
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MonthAverageResponse {
    Failure { error: String },
    Success(MonthAverage),
}

impl MonthAverageResponse {
    pub fn into_result(self, endpoint: &'static str) -> GatewayResult<MonthAverage> {
        match self {
            MonthAverageResponse::Success(avg) => Ok(avg),
            MonthAverageResponse::Failure { error } => Err(GatewayError::Service {
                endpoint,
                message: error,
            }),
        }
    }
}

// ----------------------------------------------------------------------------
// get_energy_performance
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct EnergyPerformanceRow {
    pub date: String,
    #[serde(rename = "Sub_metering_1")]
    pub sub_metering_1: f64,
    #[serde(rename = "Sub_metering_2")]
    pub sub_metering_2: f64,
    #[serde(rename = "Sub_metering_3")]
    pub sub_metering_3: f64,
}

pub(crate) fn daily_metering(
    endpoint: &'static str,
    rows: Vec<EnergyPerformanceRow>,
) -> GatewayResult<Vec<DailyMetering>> {
    rows.into_iter()
        .map(|row| {
            let date = timestamp_from_str(endpoint, &row.date)?.date();
            Ok(DailyMetering::from_sub_meters(
                date,
                row.sub_metering_1,
                row.sub_metering_2,
                row.sub_metering_3,
            ))
        })
        .collect()
}
