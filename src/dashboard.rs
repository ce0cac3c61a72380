//! Assembles everything the presentation layer shows for one table snapshot.

use crate::aggregate::{
    breakdown_by_category, breakdown_by_merchant, breakdown_by_month, breakdown_by_trip,
    summary_metrics, Breakdown, Group, SummaryMetrics, TripGroup,
};
use crate::chart::{category_pie, monthly_trend, trip_comparison, PieChart, StackedBarChart, TrendChart};
use crate::model::{Table, YearMonth};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Metrics, breakdowns and charts computed together from a single (usually filtered) table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub metrics: Option<SummaryMetrics>,
    pub by_category: Breakdown<Group<String>>,
    pub by_trip: Breakdown<TripGroup>,
    pub by_month: Breakdown<Group<YearMonth>>,
    pub top_merchants: Breakdown<Group<String>>,
    pub charts: Charts,
}

/// The three charts; each is `None` when its breakdown is empty and should be omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub category_pie: Option<PieChart>,
    pub monthly_trend: Option<TrendChart>,
    pub trip_comparison: Option<StackedBarChart>,
}

impl Dashboard {
    pub fn build(table: &Table, top_merchants: usize) -> Self {
        let by_category = breakdown_by_category(table);
        let by_trip = breakdown_by_trip(table);
        let by_month = breakdown_by_month(table);
        let charts = Charts {
            category_pie: category_pie(&by_category),
            monthly_trend: monthly_trend(&by_month),
            trip_comparison: trip_comparison(&by_trip),
        };
        Self {
            metrics: summary_metrics(table),
            top_merchants: breakdown_by_merchant(table, top_merchants),
            by_category,
            by_trip,
            by_month,
            charts,
        }
    }
}

/// The choices a user can filter by, taken from the unfiltered table.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Earliest and latest dates in the table, if any row is dated.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Distinct categories in first-seen order.
    pub categories: Vec<String>,
    /// Distinct trip names in first-seen order.
    pub trips: Vec<String>,
}

impl FilterOptions {
    pub fn discover(table: &Table) -> Self {
        let mut dates = table.rows().iter().filter_map(|t| t.date());
        let date_range = dates.next().map(|first| {
            dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)))
        });

        Self {
            date_range,
            categories: distinct_in_order(table.rows().iter().filter_map(|t| t.category())),
            trips: distinct_in_order(table.rows().iter().filter_map(|t| t.trip_name())),
        }
    }
}

fn distinct_in_order<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .filter(|l| seen.insert(*l))
        .map(str::to_string)
        .collect()
}
