//! Declarative chart specifications built from breakdowns.
//!
//! Nothing here draws anything. Each projection produces a serializable description that an
//! external renderer turns into a picture, or `None` when there is nothing to chart.

use crate::aggregate::{Breakdown, Group, TripGroup};
use crate::model::{Amount, YearMonth};
use rust_decimal::Decimal;
use serde::Serialize;

const BLUE: &str = "#1f77b4";
const ORANGE: &str = "#ff7f0e";
const GREEN: &str = "#2ca02c";

const AMOUNT_AXIS: &str = "Amount ($)";

/// A pie chart with one slice per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: Amount,
    /// Share of the whole pie, 0 to 100.
    pub percent: Decimal,
    /// Shown next to the value on hover.
    pub transactions: usize,
}

/// A line chart with several series sharing one ordered x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    /// Month labels, oldest first.
    pub x: Vec<String>,
    pub series: Vec<Series>,
}

/// A bar chart whose series are stacked on top of each other for each x value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedBarChart {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub x: Vec<String>,
    pub series: Vec<Series>,
}

/// One named series; `values[i]` belongs to the chart's `x[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub line_width: Option<u8>,
    pub values: Vec<Amount>,
}

impl Series {
    fn new(name: &str, color: &str, values: Vec<Amount>) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            line_width: None,
            values,
        }
    }

    fn with_line_width(mut self, width: u8) -> Self {
        self.line_width = Some(width);
        self
    }
}

/// Projects a category breakdown onto a pie chart of total value.
pub fn category_pie(breakdown: &Breakdown<Group<String>>) -> Option<PieChart> {
    if breakdown.is_empty() {
        return None;
    }

    let whole: Amount = breakdown.rows().iter().map(|g| g.total_value).sum();
    let slices = breakdown
        .rows()
        .iter()
        .map(|g| PieSlice {
            label: g.key.clone(),
            value: g.total_value,
            percent: percent_of(g.total_value, whole),
            transactions: g.totals.transactions,
        })
        .collect();

    Some(PieChart {
        title: "Spending by Category".to_string(),
        slices,
    })
}

/// Projects a month breakdown onto three aligned trend lines: cash, point value and their sum.
pub fn monthly_trend(breakdown: &Breakdown<Group<YearMonth>>) -> Option<TrendChart> {
    if breakdown.is_empty() {
        return None;
    }

    // The x axis must be chronological.
    let mut rows: Vec<&Group<YearMonth>> = breakdown.rows().iter().collect();
    rows.sort_by_key(|g| g.key);

    let x = rows.iter().map(|g| g.key.to_string()).collect();
    let cash = rows.iter().map(|g| g.totals.cost).collect();
    let points = rows.iter().map(|g| g.totals.point_cash_value).collect();
    let total = rows.iter().map(|g| g.total_value).collect();

    Some(TrendChart {
        title: "Monthly Spending Trends".to_string(),
        x_axis_title: "Month".to_string(),
        y_axis_title: AMOUNT_AXIS.to_string(),
        x,
        series: vec![
            Series::new("Cash Spending", BLUE, cash),
            Series::new("Point Value", ORANGE, points),
            Series::new("Total Value", GREEN, total).with_line_width(3),
        ],
    })
}

/// Projects a trip breakdown onto stacked cash and point-value bars, keeping the breakdown's
/// order.
pub fn trip_comparison(breakdown: &Breakdown<TripGroup>) -> Option<StackedBarChart> {
    if breakdown.is_empty() {
        return None;
    }

    let rows = breakdown.rows();
    Some(StackedBarChart {
        title: "Spending Comparison by Trip".to_string(),
        x_axis_title: "Trip".to_string(),
        y_axis_title: AMOUNT_AXIS.to_string(),
        x: rows.iter().map(|t| t.group.key.clone()).collect(),
        series: vec![
            Series::new(
                "Cash Spent",
                BLUE,
                rows.iter().map(|t| t.group.totals.cost).collect(),
            ),
            Series::new(
                "Point Value",
                ORANGE,
                rows.iter().map(|t| t.group.totals.point_cash_value).collect(),
            ),
        ],
    })
}

fn percent_of(part: Amount, whole: Amount) -> Decimal {
    let (part, whole) = (part.value(), whole.value());
    // Scaling a value near the Decimal limit by 100 overflows; divide first in that case.
    let share = match part.checked_mul(Decimal::ONE_HUNDRED) {
        Some(scaled) => scaled.checked_div(whole),
        None => part
            .checked_div(whole)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED)),
    };
    share.unwrap_or_default().round_dp(2)
}
