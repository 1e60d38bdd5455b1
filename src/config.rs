use anyhow::{Context, Result};
use chrono::NaiveDate;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::domain::{Baseline, CardFigures, CategoryTotals};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "DASHBOARD__";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub gateway: GatewayConfig,
    #[validate(nested)]
    pub baseline: BaselineConfig,
    pub reference: ReferenceConfig,
    #[validate(nested)]
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GatewayConfig {
    #[validate(url)]
    pub base_url: String,
    /// Whole-request timeout; unset means requests wait indefinitely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub http_timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            http_timeout_seconds: None,
            user_agent: "energy-dashboard/0.1".to_string(),
        }
    }
}

/// Last-month daily averages, in kWh.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BaselineConfig {
    #[validate(range(min = 0.0))]
    pub total: f64,
    #[validate(range(min = 0.0))]
    pub ac: f64,
    #[validate(range(min = 0.0))]
    pub kitchen: f64,
    #[validate(range(min = 0.0))]
    pub laundry: f64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        let b = Baseline::default();
        Self {
            total: b.total,
            ac: b.per_category.ac,
            kitchen: b.per_category.kitchen,
            laundry: b.per_category.laundry,
        }
    }
}

impl BaselineConfig {
    pub fn baseline(&self) -> Baseline {
        Baseline::new(
            self.total,
            CategoryTotals::new(self.ac, self.kitchen, self.laundry),
        )
    }
}

/// Fixed dates standing in for "now" in a historical dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// First label of the weekly forecast charts
    pub forecast_start_date: NaiveDate,
    /// Start of week 0 in the breakdown view
    pub week_reference_date: NaiveDate,
    /// Day auto-selected when a week loads, if present
    pub preferred_date: NaiveDate,
    /// `start_date` sent to `get_month_average`
    pub month_average_start: NaiveDate,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        Self {
            forecast_start_date: ymd(2023, 12, 6),
            week_reference_date: ymd(2007, 11, 29),
            preferred_date: ymd(2007, 12, 5),
            month_average_start: ymd(2007, 12, 1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForecastConfig {
    /// Last-month efficiency score the efficiency points are coloured against
    pub efficiency_threshold: f64,
    #[validate(nested)]
    pub bill: CardConfig,
    #[validate(nested)]
    pub efficiency: CardConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            efficiency_threshold: 82.0,
            bill: CardConfig {
                projected: 345.50,
                last_month: 310.20,
                month_to_date: 285.75,
            },
            efficiency: CardConfig {
                projected: 99.5,
                last_month: 82.0,
                month_to_date: 86.2,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CardConfig {
    pub projected: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub last_month: f64,
    pub month_to_date: f64,
}

impl CardConfig {
    pub fn figures(&self) -> CardFigures {
        CardFigures::new(self.projected, self.last_month, self.month_to_date)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        let cfg: Config = figment.extract().context("invalid configuration")?;
        cfg.validate().context("configuration failed validation")?;
        Ok(cfg)
    }
}
