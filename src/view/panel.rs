//! Category breakdown panel.

use serde::Serialize;

use super::compare::{share_of, Comparison};
use crate::domain::{Category, CategoryTotals};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub category: Category,
    pub value: f64,
    /// Share of the panel total, in percent
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownPanel {
    pub title: String,
    pub total: f64,
    pub rows: Vec<BreakdownRow>,
}

impl BreakdownPanel {
    pub fn build(
        title: impl Into<String>,
        totals: &CategoryTotals,
        reference: Option<&CategoryTotals>,
    ) -> Self {
        let total = totals.sum();
        let rows = totals
            .iter()
            .map(|(category, value)| BreakdownRow {
                category,
                value,
                percentage: share_of(value, total),
                comparison: reference.and_then(|r| Comparison::new(value, r.get(category))),
            })
            .collect();
        Self {
            title: title.into(),
            total,
            rows,
        }
    }

    pub fn row(&self, category: Category) -> Option<&BreakdownRow> {
        self.rows.iter().find(|r| r.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::compare::Trend;
    use proptest::prelude::*;

    #[test]
    fn test_percentages_and_comparison() {
        let panel = BreakdownPanel::build(
            "5 Dec",
            &CategoryTotals::new(15.0, 10.0, 6.0),
            Some(&CategoryTotals::new(11.0, 4.0, 6.0)),
        );
        assert_eq!(panel.total, 31.0);
        let ac = panel.row(Category::Ac).unwrap();
        assert_eq!(ac.percentage, 48.4);
        assert_eq!(ac.comparison.as_ref().unwrap().trend, Trend::Up);
        let laundry = panel.row(Category::Laundry).unwrap();
        assert_eq!(laundry.comparison.as_ref().unwrap().trend, Trend::Flat);
        assert_eq!(laundry.comparison.as_ref().unwrap().delta_label, "0.0%");
    }

    #[test]
    fn test_zero_total_is_zero_percent() {
        let panel = BreakdownPanel::build("today", &CategoryTotals::ZERO, None);
        assert!(panel.rows.iter().all(|r| r.percentage == 0.0));
        assert!(panel.rows.iter().all(|r| r.comparison.is_none()));
    }

    #[test]
    fn test_rows_in_display_order() {
        let panel = BreakdownPanel::build("x", &CategoryTotals::new(1.0, 2.0, 3.0), None);
        let order: Vec<Category> = panel.rows.iter().map(|r| r.category).collect();
        assert_eq!(order, vec![Category::Ac, Category::Kitchen, Category::Laundry]);
    }

    proptest! {
        #[test]
        fn prop_percentages_sum_to_hundred(
            ac in 0.0f64..500.0,
            kitchen in 0.0f64..500.0,
            laundry in 0.0f64..500.0,
        ) {
            let totals = CategoryTotals::new(ac, kitchen, laundry);
            let panel = BreakdownPanel::build("x", &totals, None);
            let sum: f64 = panel.rows.iter().map(|r| r.percentage).sum();
            if totals.sum() > 0.0 {
                prop_assert!((sum - 100.0).abs() <= 0.1 + 1e-9, "sum = {}", sum);
            } else {
                prop_assert_eq!(sum, 0.0);
            }
        }
    }
}
