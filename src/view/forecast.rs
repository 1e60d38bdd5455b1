//! Forecast view controller
//!
//! Fetches the four forecast series and the month average once, then derives
//! threshold-coloured chart data for the usage bars and efficiency points
//! under the current week/day toggles and selections.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::compare::{percent_change, signed_percent, Comparison, Trend};
use super::labels::{consecutive_days, month_day, padded_hour};
use super::resource::{FetchStatus, Resource};
use super::selection::SelectionState;
use crate::chart::{palette, primary_index, ChartClick, ChartData, Dataset, DatasetKind, Rgba};
use crate::config::Config;
use crate::domain::{round_to, CardFigures, MonthAverage, TimePoint, TimeRange};
use crate::gateway::{endpoints, DataGateway};

pub const USAGE_CHART_ID: &str = "usageChart";
pub const EFFICIENCY_CHART_ID: &str = "efficiencyChart";
pub const USAGE_LABEL: &str = "Projected Usage (kWh)";
pub const EFFICIENCY_LABEL: &str = "Projected Efficiency";

const USAGE_DECIMALS: u32 = 2;
const EFFICIENCY_DECIMALS: u32 = 4;
const DIMMED_BAR_ALPHA: f64 = 0.5;
const DIMMED_POINT_ALPHA: f64 = 0.3;
const SELECTED_POINT_RADIUS: u8 = 6;
const POINT_RADIUS: u8 = 3;

/// Injected constants the forecast view cannot get from the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSettings {
    pub forecast_start_date: NaiveDate,
    pub month_average_start: NaiveDate,
    pub efficiency_threshold: f64,
    pub bill: CardFigures,
    pub efficiency_score: CardFigures,
}

impl ForecastSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            forecast_start_date: cfg.reference.forecast_start_date,
            month_average_start: cfg.reference.month_average_start,
            efficiency_threshold: cfg.forecast.efficiency_threshold,
            bill: cfg.forecast.bill.figures(),
            efficiency_score: cfg.forecast.efficiency.figures(),
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastData {
    pub usage_week: Resource<Vec<TimePoint>>,
    pub usage_day: Resource<Vec<TimePoint>>,
    pub efficiency_week: Resource<Vec<TimePoint>>,
    pub efficiency_day: Resource<Vec<TimePoint>>,
    pub month_average: Resource<Option<MonthAverage>>,
}

// ----------------------------------------------------------------------------
// Pure derivations
// ----------------------------------------------------------------------------

pub fn rounded_values(points: &[TimePoint], decimals: u32) -> Vec<f64> {
    points.iter().map(|p| round_to(p.value, decimals)).collect()
}

/// Week: one calendar day per point from `start`. Day: each point's hour.
pub fn series_labels(points: &[TimePoint], range: TimeRange, start: NaiveDate) -> Vec<String> {
    match range {
        TimeRange::Week => consecutive_days(start, points.len())
            .into_iter()
            .map(month_day)
            .collect(),
        TimeRange::Day => points.iter().map(|p| padded_hour(p.timestamp)).collect(),
    }
}

/// Usage bars: red above the threshold, green at or below it.
pub fn bar_color(value: f64, threshold: f64, highlighted: bool) -> Rgba {
    let base = if value > threshold {
        palette::ABOVE
    } else {
        palette::BELOW
    };
    base.with_alpha(if highlighted { 1.0 } else { DIMMED_BAR_ALPHA })
}

/// Efficiency points: green at or above the threshold, red below it.
pub fn point_color(value: f64, threshold: f64, highlighted: bool) -> Rgba {
    let base = if value >= threshold {
        palette::GOOD
    } else {
        palette::BAD
    };
    base.with_alpha(if highlighted { 1.0 } else { DIMMED_POINT_ALPHA })
}

fn tooltip_lines(label: &str, value: f64, threshold: f64) -> Vec<String> {
    let mut lines = vec![
        format!("{label}: {value}"),
        format!("Last Month Avg: {threshold:.2}"),
    ];
    if let Some(diff) = percent_change(value, threshold) {
        lines.push(format!("Difference: {}", signed_percent(diff)));
    }
    lines
}

/// Headline card driven by fixed figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub title: &'static str,
    pub projected: f64,
    pub last_month: f64,
    pub month_to_date: f64,
    pub change: Option<Comparison>,
    /// Whether the change is good news (lower bill, higher efficiency)
    pub favorable: bool,
}

impl SummaryCard {
    fn build(title: &'static str, figures: CardFigures, higher_is_better: bool) -> Self {
        let change = Comparison::new(figures.projected, figures.last_month);
        let increased = figures.projected > figures.last_month;
        Self {
            title,
            projected: figures.projected,
            last_month: figures.last_month,
            month_to_date: figures.month_to_date,
            change,
            favorable: increased == higher_is_better,
        }
    }

    pub fn trend(&self) -> Trend {
        self.change.as_ref().map_or(Trend::Flat, |c| c.trend)
    }
}

// ----------------------------------------------------------------------------
// Controller
// ----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ForecastView {
    settings: ForecastSettings,
    data: ForecastData,
    usage: SelectionState,
    efficiency: SelectionState,
}

impl ForecastView {
    pub fn new(settings: ForecastSettings) -> Self {
        Self {
            settings,
            data: ForecastData::default(),
            usage: SelectionState::default(),
            efficiency: SelectionState::default(),
        }
    }

    pub fn with_data(settings: ForecastSettings, data: ForecastData) -> Self {
        Self {
            data,
            ..Self::new(settings)
        }
    }

    /// One-shot fetch on mount; all five requests run concurrently.
    pub async fn load(&mut self, gateway: &dyn DataGateway) {
        let (usage_week, usage_day, efficiency_week, efficiency_day, month_average) = tokio::join!(
            gateway.predict_next_7_days(),
            gateway.predict_next_24_hours(),
            gateway.efficiency_7_days(),
            gateway.efficiency_24_hours(),
            gateway.month_average(self.settings.month_average_start),
        );

        self.data.usage_week.apply_list(endpoints::NEXT_7_DAYS, usage_week);
        self.data.usage_day.apply_list(endpoints::NEXT_24_HOURS, usage_day);
        self.data
            .efficiency_week
            .apply_list(endpoints::EFFICIENCY_7_DAYS, efficiency_week);
        self.data
            .efficiency_day
            .apply_list(endpoints::EFFICIENCY_24_HOURS, efficiency_day);
        self.data
            .month_average
            .apply(endpoints::MONTH_AVERAGE, month_average.map(Some), Option::is_none);

        info!(
            usage_week = self.data.usage_week.value.len(),
            usage_day = self.data.usage_day.value.len(),
            efficiency_week = self.data.efficiency_week.value.len(),
            efficiency_day = self.data.efficiency_day.value.len(),
            "forecast view loaded"
        );
    }

    pub fn data(&self) -> &ForecastData {
        &self.data
    }

    pub fn usage_state(&self) -> SelectionState {
        self.usage
    }

    pub fn efficiency_state(&self) -> SelectionState {
        self.efficiency
    }

    // -- transitions ---------------------------------------------------------

    pub fn set_usage_range(&mut self, range: TimeRange) {
        self.usage = self.usage.switch_range(range);
    }

    pub fn set_efficiency_range(&mut self, range: TimeRange) {
        self.efficiency = self.efficiency.switch_range(range);
    }

    pub fn click_usage(&mut self, clicks: &[ChartClick]) {
        if let Some(index) = primary_index(clicks) {
            self.usage = self.usage.select(index);
        }
    }

    pub fn click_efficiency(&mut self, clicks: &[ChartClick]) {
        if let Some(index) = primary_index(clicks) {
            self.efficiency = self.efficiency.select(index);
        }
    }

    // -- derivations ---------------------------------------------------------

    fn usage_points(&self, range: TimeRange) -> &Resource<Vec<TimePoint>> {
        match range {
            TimeRange::Week => &self.data.usage_week,
            TimeRange::Day => &self.data.usage_day,
        }
    }

    fn efficiency_points(&self, range: TimeRange) -> &Resource<Vec<TimePoint>> {
        match range {
            TimeRange::Week => &self.data.efficiency_week,
            TimeRange::Day => &self.data.efficiency_day,
        }
    }

    pub fn usage_series(&self, range: TimeRange) -> Vec<f64> {
        rounded_values(&self.usage_points(range).value, USAGE_DECIMALS)
    }

    pub fn usage_labels(&self, range: TimeRange) -> Vec<String> {
        series_labels(
            &self.usage_points(range).value,
            range,
            self.settings.forecast_start_date,
        )
    }

    pub fn efficiency_series(&self, range: TimeRange) -> Vec<f64> {
        rounded_values(&self.efficiency_points(range).value, EFFICIENCY_DECIMALS)
    }

    pub fn efficiency_labels(&self, range: TimeRange) -> Vec<String> {
        series_labels(
            &self.efficiency_points(range).value,
            range,
            self.settings.forecast_start_date,
        )
    }

    /// Daily average for the week view, its hourly share for the day view.
    pub fn usage_threshold(&self, range: TimeRange) -> f64 {
        let daily = self
            .data
            .month_average
            .value
            .as_ref()
            .map_or(0.0, |m| m.average_kwh_per_day);
        match range {
            TimeRange::Week => daily,
            TimeRange::Day => daily / 24.0,
        }
    }

    pub fn efficiency_threshold(&self) -> f64 {
        self.settings.efficiency_threshold
    }

    pub fn usage_bar_colors(&self) -> Vec<Rgba> {
        let threshold = self.usage_threshold(self.usage.time_range);
        self.usage_series(self.usage.time_range)
            .into_iter()
            .enumerate()
            .map(|(i, v)| bar_color(v, threshold, self.usage.is_highlighted(i)))
            .collect()
    }

    pub fn efficiency_point_colors(&self) -> Vec<Rgba> {
        let threshold = self.efficiency_threshold();
        self.efficiency_series(self.efficiency.time_range)
            .into_iter()
            .enumerate()
            .map(|(i, v)| point_color(v, threshold, self.efficiency.is_highlighted(i)))
            .collect()
    }

    pub fn efficiency_point_radius(&self) -> Vec<u8> {
        (0..self.efficiency_series(self.efficiency.time_range).len())
            .map(|i| {
                if self.efficiency.is_selected(i) {
                    SELECTED_POINT_RADIUS
                } else {
                    POINT_RADIUS
                }
            })
            .collect()
    }

    pub fn usage_chart(&self) -> ChartData {
        let range = self.usage.time_range;
        let data = self.usage_series(range);
        let len = data.len();
        ChartData::new(USAGE_CHART_ID, self.usage_labels(range))
            .dataset(
                Dataset::new(DatasetKind::Bar, USAGE_LABEL, data).with_colors(self.usage_bar_colors()),
            )
            .dataset(Dataset::reference_line(self.usage_threshold(range), len))
    }

    pub fn efficiency_chart(&self) -> ChartData {
        let range = self.efficiency.time_range;
        let data = self.efficiency_series(range);
        let len = data.len();
        ChartData::new(EFFICIENCY_CHART_ID, self.efficiency_labels(range))
            .dataset(
                Dataset::new(DatasetKind::Line, EFFICIENCY_LABEL, data)
                    .with_border(palette::EFFICIENCY_LINE)
                    .with_colors(self.efficiency_point_colors())
                    .with_points(self.efficiency_point_radius(), Vec::new())
                    .filled(),
            )
            .dataset(Dataset::reference_line(self.efficiency_threshold(), len))
    }

    pub fn usage_tooltip(&self, index: usize) -> Option<Vec<String>> {
        let range = self.usage.time_range;
        let value = *self.usage_series(range).get(index)?;
        Some(tooltip_lines(USAGE_LABEL, value, self.usage_threshold(range)))
    }

    pub fn efficiency_tooltip(&self, index: usize) -> Option<Vec<String>> {
        let value = *self.efficiency_series(self.efficiency.time_range).get(index)?;
        Some(tooltip_lines(EFFICIENCY_LABEL, value, self.efficiency_threshold()))
    }

    pub fn bill_card(&self) -> SummaryCard {
        SummaryCard::build("Projected Bill", self.settings.bill, false)
    }

    pub fn efficiency_card(&self) -> SummaryCard {
        SummaryCard::build("Projected Efficiency", self.settings.efficiency_score, true)
    }

    pub fn charts(&self) -> Vec<ChartData> {
        vec![self.usage_chart(), self.efficiency_chart()]
    }

    pub fn snapshot(&self) -> ForecastSnapshot {
        ForecastSnapshot {
            cards: vec![self.bill_card(), self.efficiency_card()],
            usage: ChartSection {
                selection: self.usage,
                status: self.usage_points(self.usage.time_range).status.clone(),
                threshold: self.usage_threshold(self.usage.time_range),
                chart: self.usage_chart(),
            },
            efficiency: ChartSection {
                selection: self.efficiency,
                status: self.efficiency_points(self.efficiency.time_range).status.clone(),
                threshold: self.efficiency_threshold(),
                chart: self.efficiency_chart(),
            },
            month_average: self.data.month_average.status.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSection {
    pub selection: SelectionState,
    pub status: FetchStatus,
    pub threshold: f64,
    pub chart: ChartData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSnapshot {
    pub cards: Vec<SummaryCard>,
    pub usage: ChartSection,
    pub efficiency: ChartSection,
    pub month_average: FetchStatus,
}
