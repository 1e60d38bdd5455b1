//! View controllers
//!
//! Each controller owns its fetched data and selection state and derives
//! chart-ready values on demand. Nothing here draws.

pub mod breakdown;
pub mod compare;
pub mod forecast;
pub mod labels;
pub mod panel;
pub mod resource;
pub mod selection;

pub use breakdown::{BreakdownSettings, BreakdownSnapshot, BreakdownState, BreakdownView};
pub use compare::{Comparison, Trend};
pub use forecast::{ForecastSettings, ForecastSnapshot, ForecastView, SummaryCard};
pub use panel::{BreakdownPanel, BreakdownRow};
pub use resource::{FetchStatus, Resource};
pub use selection::SelectionState;
