use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::chart::ChartClick;
use crate::domain::TimeRange;
use crate::view::{BreakdownView, ForecastView};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file layered over the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// What to write to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Snapshot, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Usage and efficiency forecast with summary cards
    Forecast(ForecastArgs),
    /// Weekly per-category breakdown with hourly drill-down
    Breakdown(BreakdownArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Whole view state as pretty JSON
    Snapshot,
    /// One JSON line per chart
    Charts,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RangeArg {
    Week,
    Day,
}

impl From<RangeArg> for TimeRange {
    fn from(r: RangeArg) -> Self {
        match r {
            RangeArg::Week => TimeRange::Week,
            RangeArg::Day => TimeRange::Day,
        }
    }
}

#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct ForecastArgs {
    #[arg(long, value_enum)]
    pub usage_range: Option<RangeArg>,

    #[arg(long, value_enum)]
    pub efficiency_range: Option<RangeArg>,

    /// Click a usage bar; repeat to toggle
    #[arg(long)]
    pub select_usage: Vec<usize>,

    /// Click an efficiency point; repeat to toggle
    #[arg(long)]
    pub select_efficiency: Vec<usize>,
}

impl ForecastArgs {
    /// Replay the requested interactions on a loaded view.
    pub fn replay(&self, view: &mut ForecastView) {
        if let Some(range) = self.usage_range {
            view.set_usage_range(range.into());
        }
        if let Some(range) = self.efficiency_range {
            view.set_efficiency_range(range.into());
        }
        for index in &self.select_usage {
            view.click_usage(&[ChartClick::primary(*index)]);
        }
        for index in &self.select_efficiency {
            view.click_efficiency(&[ChartClick::primary(*index)]);
        }
    }
}

#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct BreakdownArgs {
    /// Weeks to step back from the reference week before loading
    #[arg(long, default_value_t = 0)]
    pub weeks_back: u32,

    /// Click a weekly bar (0 = first day); repeat to toggle
    #[arg(long)]
    pub day: Vec<usize>,

    /// Click an hour of the focused day; repeat to toggle
    #[arg(long)]
    pub hour: Vec<usize>,

    /// Focus an explicit date (YYYY-MM-DD) instead of a weekly bar
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl BreakdownArgs {
    /// Step the view back to the requested week.
    pub fn navigate(&self, view: &mut BreakdownView) {
        for _ in 0..self.weeks_back {
            if !view.previous_week() {
                break;
            }
        }
    }

    /// Replay clicks on a view whose week is loaded.
    pub fn replay(&self, view: &mut BreakdownView) {
        if let Some(date) = self.date {
            view.pick_date(date);
        }
        for index in &self.day {
            view.click_day(&[ChartClick::primary(*index)]);
        }
        for hour in &self.hour {
            view.click_hour(&[ChartClick::primary(*hour)]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{BreakdownSettings, ForecastSettings};

    #[test]
    fn test_parse_forecast() {
        let cli = Cli::try_parse_from([
            "energy-dashboard",
            "forecast",
            "--usage-range",
            "day",
            "--select-usage",
            "3",
            "--select-usage",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Snapshot);
        let Commands::Forecast(args) = cli.command else {
            panic!("expected forecast");
        };
        assert_eq!(args.usage_range, Some(RangeArg::Day));
        assert_eq!(args.select_usage, vec![3, 3]);
    }

    #[test]
    fn test_parse_breakdown() {
        let cli = Cli::try_parse_from([
            "energy-dashboard",
            "--format",
            "charts",
            "breakdown",
            "--weeks-back",
            "2",
            "--date",
            "2007-12-03",
            "--hour",
            "7",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Charts);
        let Commands::Breakdown(args) = cli.command else {
            panic!("expected breakdown");
        };
        assert_eq!(args.weeks_back, 2);
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2007, 12, 3));
        assert_eq!(args.hour, vec![7]);
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["energy-dashboard", "breakdown", "--date", "5 Dec"]).is_err());
    }

    #[test]
    fn test_forecast_replay() {
        let mut view = ForecastView::new(ForecastSettings::default());
        let args = ForecastArgs {
            usage_range: Some(RangeArg::Day),
            select_efficiency: vec![2],
            ..Default::default()
        };
        args.replay(&mut view);
        assert_eq!(view.usage_state().time_range, TimeRange::Day);
        assert_eq!(view.efficiency_state().selected_index, Some(2));
    }

    #[test]
    fn test_breakdown_navigate_and_replay() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut view = BreakdownView::new(BreakdownSettings::default(), today);
        let date = NaiveDate::from_ymd_opt(2007, 11, 15).unwrap();
        let args = BreakdownArgs {
            weeks_back: 3,
            date: Some(date),
            hour: vec![5],
            ..Default::default()
        };
        args.navigate(&mut view);
        assert_eq!(view.week_offset(), 3);
        args.replay(&mut view);
        assert_eq!(view.state().focus_date, date);
        assert_eq!(view.state().selected_hour, Some(5));
    }

    #[test]
    fn test_navigate_far_back_stops_at_earliest_week() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut view = BreakdownView::new(BreakdownSettings::default(), today);
        let args = BreakdownArgs {
            weeks_back: 14_000_000,
            ..Default::default()
        };
        args.navigate(&mut view);
        assert!(view.week_offset() < 14_000_000);
        assert!(!view.previous_week());
        assert_eq!(view.week_labels().len(), 7);
    }
}
