//! Comparisons against the last-month reference.

use serde::Serialize;

use crate::domain::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Flat,
    Down,
}

impl Trend {
    pub fn of(delta: f64) -> Self {
        if delta > 0.0 {
            Trend::Up
        } else if delta < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }
}

/// `(value - reference) / reference * 100`, rounded to one decimal.
///
/// `None` when the reference is zero.
pub fn percent_change(value: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 {
        return None;
    }
    Some(normalize_zero(round_to(
        (value - reference) / reference * 100.0,
        1,
    )))
}

/// `value / total * 100`, rounded to one decimal; 0 when the total is 0.
pub fn share_of(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    round_to(value / total * 100.0, 1)
}

/// `"+12.5%"`, `"-3.0%"`, `"0.0%"`
pub fn signed_percent(delta: f64) -> String {
    let delta = normalize_zero(delta);
    if delta > 0.0 {
        format!("+{delta:.1}%")
    } else {
        format!("{delta:.1}%")
    }
}

fn normalize_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// A value measured against its reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub reference: f64,
    pub delta_percent: f64,
    pub delta_label: String,
    pub trend: Trend,
}

impl Comparison {
    pub fn new(value: f64, reference: f64) -> Option<Self> {
        let delta = percent_change(value, reference)?;
        Some(Self {
            reference,
            delta_percent: delta,
            delta_label: signed_percent(delta),
            trend: Trend::of(delta),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(25.0, 20.0, Some(25.0))]
    #[case(15.0, 20.0, Some(-25.0))]
    #[case(20.0, 20.0, Some(0.0))]
    #[case(5.0, 0.0, None)]
    fn test_percent_change(#[case] value: f64, #[case] reference: f64, #[case] expected: Option<f64>) {
        assert_eq!(percent_change(value, reference), expected);
    }

    #[test]
    fn test_tiny_negative_change_rounds_to_flat() {
        let delta = percent_change(99.99, 100.0).unwrap();
        assert_eq!(Trend::of(delta), Trend::Flat);
        assert_eq!(signed_percent(delta), "0.0%");
    }

    #[rstest]
    #[case(12.5, "+12.5%")]
    #[case(-3.0, "-3.0%")]
    #[case(0.0, "0.0%")]
    #[case(-0.0, "0.0%")]
    fn test_signed_percent(#[case] delta: f64, #[case] expected: &str) {
        assert_eq!(signed_percent(delta), expected);
    }

    #[test]
    fn test_share_of_zero_total() {
        assert_eq!(share_of(0.0, 0.0), 0.0);
        assert_eq!(share_of(1.0, 4.0), 25.0);
    }

    #[test]
    fn test_comparison() {
        let c = Comparison::new(15.0, 11.0).unwrap();
        assert_eq!(c.trend, Trend::Up);
        assert_eq!(c.delta_label, "+36.4%");
        assert!(Comparison::new(1.0, 0.0).is_none());
    }
}
