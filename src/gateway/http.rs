use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::wire::{
    daily_efficiency_points, daily_metering, hourly_efficiency_points, DailyEfficiencyRow,
    DailyForecastResponse, EnergyPerformanceRow, HourlyEfficiencyRow, HourlyForecastResponse,
    MonthAverageResponse,
};
use super::{endpoints, DataGateway, GatewayError, GatewayResult};
use crate::config::GatewayConfig;
use crate::domain::{DailyMetering, MonthAverage, TimePoint, WeekComparison};

/// `DataGateway` backed by the prediction service's JSON API.
#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn from_config(cfg: &GatewayConfig) -> anyhow::Result<Self> {
        Self::new(
            cfg.base_url.clone(),
            cfg.http_timeout_seconds.map(Duration::from_secs),
            &cfg.user_agent,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> GatewayResult<T> {
        let url = self.url_for(endpoint);
        debug!(%url, ?query, "gateway GET");

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| GatewayError::Transport { endpoint, source })?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|source| GatewayError::Transport { endpoint, source })?;
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "gateway returned error status");
            return Err(GatewayError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::decode(endpoint, e.to_string()))
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl DataGateway for HttpGateway {
    async fn predict_next_7_days(&self) -> GatewayResult<Vec<TimePoint>> {
        let endpoint = endpoints::NEXT_7_DAYS;
        self.get_json::<DailyForecastResponse>(endpoint, &[])
            .await?
            .into_points(endpoint)
    }

    async fn predict_next_24_hours(&self) -> GatewayResult<Vec<TimePoint>> {
        let endpoint = endpoints::NEXT_24_HOURS;
        self.get_json::<HourlyForecastResponse>(endpoint, &[])
            .await?
            .into_points(endpoint)
    }

    async fn efficiency_7_days(&self) -> GatewayResult<Vec<TimePoint>> {
        let endpoint = endpoints::EFFICIENCY_7_DAYS;
        let rows: Vec<DailyEfficiencyRow> = self.get_json(endpoint, &[]).await?;
        daily_efficiency_points(endpoint, rows)
    }

    async fn efficiency_24_hours(&self) -> GatewayResult<Vec<TimePoint>> {
        let endpoint = endpoints::EFFICIENCY_24_HOURS;
        let rows: Vec<HourlyEfficiencyRow> = self.get_json(endpoint, &[]).await?;
        hourly_efficiency_points(endpoint, rows)
    }

    async fn month_average(&self, start_date: NaiveDate) -> GatewayResult<MonthAverage> {
        let endpoint = endpoints::MONTH_AVERAGE;
        self.get_json::<MonthAverageResponse>(endpoint, &[("start_date", iso(start_date))])
            .await?
            .into_result(endpoint)
    }

    async fn energy_performance(&self, start_date: NaiveDate) -> GatewayResult<Vec<DailyMetering>> {
        let endpoint = endpoints::ENERGY_PERFORMANCE;
        let rows: Vec<EnergyPerformanceRow> = self
            .get_json(endpoint, &[("start_date", iso(start_date))])
            .await?;
        daily_metering(endpoint, rows)
    }

    async fn compare_weeks(&self, start: NaiveDate, end: NaiveDate) -> GatewayResult<WeekComparison> {
        self.get_json(
            endpoints::COMPARE_WEEKS,
            &[("start", iso(start)), ("end", iso(end))],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_trims_trailing_slash() {
        let gw = HttpGateway::new("http://127.0.0.1:8000/", None, "test").unwrap();
        assert_eq!(
            gw.url_for(endpoints::NEXT_7_DAYS),
            "http://127.0.0.1:8000/predict_next_7_days"
        );
    }

    #[test]
    fn test_from_default_config_without_timeout() {
        let gw = HttpGateway::from_config(&GatewayConfig::default()).unwrap();
        assert_eq!(gw.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(iso(NaiveDate::from_ymd_opt(2007, 12, 1).unwrap()), "2007-12-01");
    }
}
