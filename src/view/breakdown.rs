//! Usage breakdown view controller
//!
//! One week of per-category metering drives three linked panes: a stacked
//! weekly bar chart, a synthesized hourly line chart for the focused day and
//! a category breakdown panel. Week navigation issues one request per offset;
//! each request carries a generation so a late response for an abandoned
//! week never overwrites the current one.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use super::compare::{percent_change, signed_percent};
use super::labels::{consecutive_days, day_month, week_caption};
use super::panel::BreakdownPanel;
use super::resource::{FetchStatus, Resource};
use super::selection::{is_highlighted, toggle};
use crate::chart::{
    any_index, category_color, palette, ChartClick, ChartData, Dataset, DatasetKind,
    HorizontalLine,
};
use crate::config::Config;
use crate::domain::{find_day, round_to, Baseline, Category, CategoryTotals, DailyMetering};
use crate::gateway::{endpoints, DataGateway, GatewayError};
use crate::synthesis::{hour_label, synthesize, HourlyDistribution, HOURS};

pub const WEEKLY_CHART_ID: &str = "weeklyChart";
pub const HOURLY_CHART_ID: &str = "hourlyChart";
pub const DAYS_PER_WEEK: usize = 7;

const WEEK_STACK: &str = "Stack 0";
const DIMMED_BAR_ALPHA: f64 = 0.3;
const DIMMED_POINT_ALPHA: f64 = 0.15;
const DIMMED_LINE_ALPHA: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownSettings {
    /// Start of week 0
    pub week_reference_date: NaiveDate,
    /// Auto-selected when present in a freshly loaded week
    pub preferred_date: NaiveDate,
    pub baseline: Baseline,
}

impl BreakdownSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            week_reference_date: cfg.reference.week_reference_date,
            preferred_date: cfg.reference.preferred_date,
            baseline: cfg.baseline.baseline(),
        }
    }
}

impl Default for BreakdownSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// First day of the week `week_offset` weeks before the reference week.
///
/// `None` once that day is earlier than chrono can represent.
pub fn week_start(reference: NaiveDate, week_offset: u32) -> Option<NaiveDate> {
    reference.checked_sub_signed(Duration::days(
        i64::from(week_offset) * DAYS_PER_WEEK as i64,
    ))
}

// ----------------------------------------------------------------------------
// Selection state
// ----------------------------------------------------------------------------

/// Drill-down state of the breakdown view.
///
/// `focus_date` is the day shown in the hourly chart and the panel title.
/// `selected_bar` only tracks the highlighted weekly bar; `selected_hour`
/// narrows the focused day to a single hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownState {
    pub selected_bar: Option<NaiveDate>,
    pub focus_date: NaiveDate,
    pub selected_hour: Option<usize>,
    pub panel: CategoryTotals,
    pub comparison: Option<Baseline>,
}

impl BreakdownState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected_bar: None,
            focus_date: today,
            selected_hour: None,
            panel: CategoryTotals::ZERO,
            comparison: None,
        }
    }

    /// Focus the preferred day (or the latest one) of a freshly loaded week.
    pub fn week_loaded(self, records: &[DailyMetering], preferred: NaiveDate, baseline: Baseline) -> Self {
        let latest = || records.iter().max_by_key(|r| r.date);
        let Some(target) = find_day(records, preferred).or_else(latest) else {
            return self;
        };
        Self {
            selected_bar: None,
            focus_date: target.date,
            selected_hour: None,
            panel: target.totals,
            comparison: Some(baseline),
        }
    }

    /// Toggle a weekly bar. Deselecting falls back to `today` without a baseline.
    pub fn day_clicked(
        self,
        date: NaiveDate,
        day: Option<&DailyMetering>,
        today: NaiveDate,
        baseline: Baseline,
    ) -> Self {
        match toggle(self.selected_bar, date) {
            None => Self {
                selected_bar: None,
                focus_date: today,
                selected_hour: None,
                comparison: None,
                ..self
            },
            Some(date) => {
                let (panel, comparison) = match day {
                    Some(d) => (d.totals, Some(baseline)),
                    None => (self.panel, self.comparison),
                };
                Self {
                    selected_bar: Some(date),
                    focus_date: date,
                    selected_hour: None,
                    panel,
                    comparison,
                }
            }
        }
    }

    /// Toggle an hour of the focused day.
    pub fn hour_clicked(self, hour: usize, hours: &HourlyDistribution, baseline: Baseline) -> Self {
        match toggle(self.selected_hour, hour) {
            None => Self {
                selected_hour: None,
                panel: hours.day_totals(),
                comparison: Some(baseline),
                ..self
            },
            Some(hour) => Self {
                selected_hour: Some(hour),
                panel: hours.hour(hour).copied().unwrap_or(self.panel),
                comparison: Some(baseline.hourly()),
                ..self
            },
        }
    }

    /// Jump the hourly view to an explicit calendar date.
    pub fn date_picked(self, date: NaiveDate) -> Self {
        Self {
            selected_bar: None,
            focus_date: date,
            selected_hour: None,
            comparison: None,
            ..self
        }
    }

    pub fn title(&self) -> String {
        match self.selected_hour {
            Some(hour) => format!("{} @ {}", day_month(self.focus_date), hour_label(hour)),
            None => day_month(self.focus_date),
        }
    }
}

// ----------------------------------------------------------------------------
// Controller
// ----------------------------------------------------------------------------

/// Ticket for one in-flight week request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRequest {
    pub generation: u64,
    pub week_offset: u32,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct BreakdownView {
    settings: BreakdownSettings,
    today: NaiveDate,
    week_offset: u32,
    generation: u64,
    records: Resource<Vec<DailyMetering>>,
    state: BreakdownState,
}

impl BreakdownView {
    pub fn new(settings: BreakdownSettings, today: NaiveDate) -> Self {
        Self {
            settings,
            today,
            week_offset: 0,
            generation: 0,
            records: Resource::default(),
            state: BreakdownState::new(today),
        }
    }

    pub fn week_offset(&self) -> u32 {
        self.week_offset
    }

    pub fn state(&self) -> &BreakdownState {
        &self.state
    }

    pub fn records(&self) -> &Resource<Vec<DailyMetering>> {
        &self.records
    }

    pub fn can_go_next(&self) -> bool {
        self.week_offset > 0
    }

    /// Older week, down to the earliest representable one. Returns whether
    /// the offset moved.
    pub fn previous_week(&mut self) -> bool {
        let Some(older) = self.week_offset.checked_add(1) else {
            return false;
        };
        if week_start(self.settings.week_reference_date, older).is_none() {
            return false;
        }
        self.week_offset = older;
        true
    }

    /// Newer week, never past week 0. Returns whether the offset moved.
    pub fn next_week(&mut self) -> bool {
        if self.week_offset == 0 {
            return false;
        }
        self.week_offset -= 1;
        true
    }

    pub fn week_start(&self) -> NaiveDate {
        // offsets only grow through previous_week, which keeps this in range
        week_start(self.settings.week_reference_date, self.week_offset)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn week_days(&self) -> Vec<NaiveDate> {
        consecutive_days(self.week_start(), DAYS_PER_WEEK)
    }

    pub fn week_labels(&self) -> Vec<String> {
        self.week_days().into_iter().map(day_month).collect()
    }

    /// Start a request for the current offset, superseding earlier ones.
    pub fn begin_week_request(&mut self) -> WeekRequest {
        self.generation += 1;
        self.records.status = FetchStatus::Pending;
        WeekRequest {
            generation: self.generation,
            week_offset: self.week_offset,
            start_date: self.week_start(),
        }
    }

    /// Apply a week response. Stale responses are dropped; returns whether it applied.
    pub fn apply_week(
        &mut self,
        request: WeekRequest,
        result: Result<Vec<DailyMetering>, GatewayError>,
    ) -> bool {
        if request.generation != self.generation || request.week_offset != self.week_offset {
            debug!(
                generation = request.generation,
                current = self.generation,
                week_offset = request.week_offset,
                "dropping stale week response"
            );
            return false;
        }

        // a failed week must not keep showing the previous week's bars
        self.records.value.clear();
        self.records.apply_list(endpoints::ENERGY_PERFORMANCE, result);
        self.state = self.state.clone().week_loaded(
            &self.records.value,
            self.settings.preferred_date,
            self.settings.baseline,
        );
        info!(
            week_offset = self.week_offset,
            days = self.records.value.len(),
            focus = %self.state.focus_date,
            "week loaded"
        );
        true
    }

    pub async fn load_week(&mut self, gateway: &dyn DataGateway) -> bool {
        let request = self.begin_week_request();
        let result = gateway.energy_performance(request.start_date).await;
        self.apply_week(request, result)
    }

    /// Totals recorded for the focused day, zero if it is outside the week.
    pub fn focus_totals(&self) -> CategoryTotals {
        find_day(&self.records.value, self.state.focus_date)
            .map_or(CategoryTotals::ZERO, |d| d.totals)
    }

    pub fn hourly_distribution(&self) -> HourlyDistribution {
        synthesize(self.state.focus_date, &self.focus_totals())
    }

    // -- interactions --------------------------------------------------------

    pub fn click_day(&mut self, clicks: &[ChartClick]) {
        let Some(date) = any_index(clicks).and_then(|i| self.week_days().get(i).copied()) else {
            return;
        };
        let day = find_day(&self.records.value, date).copied();
        self.state = self.state.clone().day_clicked(
            date,
            day.as_ref(),
            self.today,
            self.settings.baseline,
        );
    }

    pub fn click_hour(&mut self, clicks: &[ChartClick]) {
        let Some(hour) = any_index(clicks).filter(|h| *h < HOURS) else {
            return;
        };
        let hours = self.hourly_distribution();
        self.state = self
            .state
            .clone()
            .hour_clicked(hour, &hours, self.settings.baseline);
    }

    pub fn pick_date(&mut self, date: NaiveDate) {
        self.state = self.state.clone().date_picked(date);
    }

    // -- derivations ---------------------------------------------------------

    pub fn weekly_chart(&self) -> ChartData {
        let days = self.week_days();
        let selected = self.state.selected_bar;

        let mut chart = ChartData::new(WEEKLY_CHART_ID, self.week_labels());
        for category in Category::all() {
            let data = days
                .iter()
                .map(|d| find_day(&self.records.value, *d).map_or(0.0, |r| r.totals.get(category)))
                .collect();
            let color = category_color(category);
            let colors = days
                .iter()
                .map(|d| {
                    if is_highlighted(selected.as_ref(), d) {
                        color
                    } else {
                        color.with_alpha(DIMMED_BAR_ALPHA)
                    }
                })
                .collect();
            chart = chart.dataset(
                Dataset::new(DatasetKind::Bar, category.to_string(), data)
                    .with_colors(colors)
                    .stacked(WEEK_STACK),
            );
        }

        chart.annotation(HorizontalLine {
            label: "Last Month Average".to_string(),
            value: self.settings.baseline.total,
            color: palette::BASELINE,
            dashed: true,
        })
    }

    /// Stacked total of a weekly bar against the baseline total.
    pub fn weekly_tooltip(&self, index: usize) -> Option<Vec<String>> {
        let date = *self.week_days().get(index)?;
        let total = find_day(&self.records.value, date).map_or(0.0, |d| d.totals.sum());
        let avg = self.settings.baseline.total;
        let mut lines = vec![format!("Last Month Avg: {avg} kWh")];
        if let Some(diff) = percent_change(total, avg) {
            lines.push(format!("Difference: {}", signed_percent(diff)));
        }
        Some(lines)
    }

    pub fn hourly_chart(&self) -> ChartData {
        let hours = self.hourly_distribution();
        let selected = self.state.selected_hour;
        let line = palette::AC;

        let labels = (0..HOURS).map(hour_label).collect();
        let point_colors = (0..HOURS)
            .map(|h| {
                if is_highlighted(selected.as_ref(), &h) {
                    line
                } else {
                    line.with_alpha(DIMMED_POINT_ALPHA)
                }
            })
            .collect();
        let radius = (0..HOURS)
            .map(|h| if selected == Some(h) { 6 } else { 3 })
            .collect();
        let border = (0..HOURS)
            .map(|h| if selected == Some(h) { 2 } else { 1 })
            .collect();
        let border_color = if selected.is_none() {
            line
        } else {
            line.with_alpha(DIMMED_LINE_ALPHA)
        };

        ChartData::new(HOURLY_CHART_ID, labels)
            .dataset(
                Dataset::new(DatasetKind::Line, "Hourly Usage (kWh)", hours.hourly_sums())
                    .with_border(border_color)
                    .with_colors(point_colors)
                    .with_points(radius, border)
                    .filled(),
            )
            .dataset(Dataset::reference_line(
                round_to(self.settings.baseline.hourly().total, 2),
                HOURS,
            ))
    }

    pub fn panel(&self) -> BreakdownPanel {
        BreakdownPanel::build(
            self.state.title(),
            &self.state.panel,
            self.state.comparison.as_ref().map(|b| &b.per_category),
        )
    }

    pub fn charts(&self) -> Vec<ChartData> {
        vec![self.weekly_chart(), self.hourly_chart()]
    }

    pub fn snapshot(&self) -> BreakdownSnapshot {
        BreakdownSnapshot {
            week_offset: self.week_offset,
            caption: week_caption(self.week_offset),
            can_go_next: self.can_go_next(),
            week_start: self.week_start(),
            status: self.records.status.clone(),
            state: self.state.clone(),
            weekly: self.weekly_chart(),
            panel: self.panel(),
            hourly: self.hourly_chart(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownSnapshot {
    pub week_offset: u32,
    pub caption: String,
    pub can_go_next: bool,
    pub week_start: NaiveDate,
    pub status: FetchStatus,
    pub state: BreakdownState,
    pub weekly: ChartData,
    pub panel: BreakdownPanel,
    pub hourly: ChartData,
}
