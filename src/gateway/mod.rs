//! Remote data gateway
//!
//! Thin async wrapper over the prediction service's HTTP endpoints. Every
//! method maps one endpoint onto domain types; nothing here retries, caches
//! or merges partial results.

pub mod error;
pub mod http;
mod wire;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DailyMetering, MonthAverage, TimePoint, WeekComparison};

pub use error::GatewayError;
pub use http::HttpGateway;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Endpoint names, used for URLs and log fields.
pub mod endpoints {
    pub const NEXT_7_DAYS: &str = "predict_next_7_days";
    pub const NEXT_24_HOURS: &str = "predict_next_24_hours";
    pub const EFFICIENCY_7_DAYS: &str = "efficiency_7_days";
    pub const EFFICIENCY_24_HOURS: &str = "efficiency_24_hours";
    pub const MONTH_AVERAGE: &str = "get_month_average";
    pub const ENERGY_PERFORMANCE: &str = "get_energy_performance";
    pub const COMPARE_WEEKS: &str = "compare_weeks";
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Daily usage forecast for the next seven days (kWh per day).
    async fn predict_next_7_days(&self) -> GatewayResult<Vec<TimePoint>>;

    /// Hourly usage forecast for the next 24 hours (kWh per hour).
    async fn predict_next_24_hours(&self) -> GatewayResult<Vec<TimePoint>>;

    /// Daily efficiency forecast for the next seven days.
    async fn efficiency_7_days(&self) -> GatewayResult<Vec<TimePoint>>;

    /// Hourly power-factor forecast for the next 24 hours.
    async fn efficiency_24_hours(&self) -> GatewayResult<Vec<TimePoint>>;

    /// Average daily consumption of the month containing `start_date`.
    async fn month_average(&self, start_date: NaiveDate) -> GatewayResult<MonthAverage>;

    /// Up to seven days of sub-metering totals starting at `start_date`.
    async fn energy_performance(&self, start_date: NaiveDate) -> GatewayResult<Vec<DailyMetering>>;

    /// Week-over-week aggregates. Not consumed by any view yet.
    async fn compare_weeks(&self, start: NaiveDate, end: NaiveDate) -> GatewayResult<WeekComparison>;
}
