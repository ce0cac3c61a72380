//! Summary metrics and grouped breakdowns computed from a `Table`.
//!
//! Every function here is pure and accepts any table, including an empty one or one whose source
//! lacked the grouping column; those cases produce an empty result rather than an error.
//!
//! Ordering: the category, trip and merchant breakdowns are sorted by descending total value,
//! ties broken by ascending key. The month breakdown is instead in ascending chronological order,
//! because it feeds the x axis of the trend chart.
//!
//! Rows whose grouping label is absent are left out of the category, trip and merchant
//! breakdowns, the same way undated rows are left out of the month breakdown. They still count
//! toward the summary metrics.

use crate::model::{Amount, Table, Transaction, TransactionColumn, YearMonth};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// The number of merchants kept by [`breakdown_by_merchant`] unless configured otherwise.
pub const DEFAULT_TOP_MERCHANTS: usize = 10;

/// Headline numbers for one table snapshot.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_cost: Amount,
    pub total_point_spend: Decimal,
    pub total_point_value: Amount,
    pub total_transactions: usize,
    pub unique_trips: usize,
    pub unique_categories: usize,
    /// `total_cost / total_transactions`.
    pub avg_transaction: Amount,
    /// `total_cost + total_point_value`.
    pub total_value: Amount,
}

/// Returns `None` for an empty table, which a caller should treat as "nothing to display".
pub fn summary_metrics(table: &Table) -> Option<SummaryMetrics> {
    if table.is_empty() {
        return None;
    }

    let totals = Totals::from_rows(table.rows().iter());
    let unique_trips = count_distinct(table, TransactionColumn::TripName, Transaction::trip_name);
    let unique_categories =
        count_distinct(table, TransactionColumn::Category, Transaction::category);

    let count = Decimal::from(totals.transactions as u64);
    let avg_transaction = Amount::new(totals.cost.value() / count);

    Some(SummaryMetrics {
        total_cost: totals.cost,
        total_point_spend: totals.point_spend,
        total_point_value: totals.point_cash_value,
        total_transactions: totals.transactions,
        unique_trips,
        unique_categories,
        avg_transaction,
        total_value: totals.total_value(),
    })
}

fn count_distinct<F>(table: &Table, column: TransactionColumn, label: F) -> usize
where
    F: Fn(&Transaction) -> Option<&str>,
{
    if !table.has_column(column) {
        return 0;
    }
    table
        .rows()
        .iter()
        .filter_map(label)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Sums accumulated over a group of transactions.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Totals {
    pub cost: Amount,
    pub point_spend: Decimal,
    pub point_cash_value: Amount,
    pub transactions: usize,
}

impl Totals {
    fn from_rows<'a>(rows: impl Iterator<Item = &'a Transaction>) -> Self {
        let mut totals = Totals::default();
        for row in rows {
            totals.add(row);
        }
        totals
    }

    fn add(&mut self, row: &Transaction) {
        // Amount addition saturates; point totals do the same.
        self.cost += row.cost();
        self.point_spend = self.point_spend.saturating_add(row.point_spend());
        self.point_cash_value += row.point_cash_value();
        self.transactions += 1;
    }

    /// Cash cost plus the cash value of points.
    pub fn total_value(&self) -> Amount {
        self.cost + self.point_cash_value
    }
}

/// One row of a breakdown: a group key and its totals.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Group<K> {
    pub key: K,
    #[serde(flatten)]
    pub totals: Totals,
    pub total_value: Amount,
}

impl<K> Group<K> {
    fn new(key: K, totals: Totals) -> Self {
        Self {
            key,
            total_value: totals.total_value(),
            totals,
        }
    }
}

/// A trip's totals plus the span of dates it covers. The dates are absent when none of the
/// trip's rows are dated.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TripGroup {
    #[serde(flatten)]
    pub group: Group<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `end_date - start_date + 1`, so a single-day trip lasts one day.
    pub duration_days: Option<i64>,
}

/// An ordered list of breakdown rows.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Breakdown<R> {
    rows: Vec<R>,
}

impl<R> Breakdown<R> {
    fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R> Default for Breakdown<R> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Groups rows by category, sorted by descending total value.
pub fn breakdown_by_category(table: &Table) -> Breakdown<Group<String>> {
    breakdown_by_label(table, TransactionColumn::Category, Transaction::category)
}

/// Groups rows by trip, sorted by descending total value, with each trip's date span.
pub fn breakdown_by_trip(table: &Table) -> Breakdown<TripGroup> {
    if !table.has_column(TransactionColumn::TripName) {
        return Breakdown::empty();
    }

    let mut spans: BTreeMap<&str, (Totals, Option<(NaiveDate, NaiveDate)>)> = BTreeMap::new();
    for row in table.rows() {
        let Some(trip) = row.trip_name() else {
            continue;
        };
        let (totals, span) = spans.entry(trip).or_default();
        totals.add(row);
        if let Some(date) = row.date() {
            *span = Some(match *span {
                None => (date, date),
                Some((start, end)) => (start.min(date), end.max(date)),
            });
        }
    }

    let mut rows: Vec<TripGroup> = spans
        .into_iter()
        .map(|(trip, (totals, span))| TripGroup {
            group: Group::new(trip.to_string(), totals),
            start_date: span.map(|(start, _)| start),
            end_date: span.map(|(_, end)| end),
            duration_days: span.map(|(start, end)| (end - start).num_days() + 1),
        })
        .collect();
    rows.sort_by(|a, b| b.group.total_value.cmp(&a.group.total_value));
    Breakdown::new(rows)
}

/// Buckets dated rows by calendar month in ascending chronological order. Undated rows are
/// excluded.
pub fn breakdown_by_month(table: &Table) -> Breakdown<Group<YearMonth>> {
    if !table.has_column(TransactionColumn::Date) {
        return Breakdown::empty();
    }

    let mut months: BTreeMap<YearMonth, Totals> = BTreeMap::new();
    for row in table.rows() {
        if let Some(month) = row.month() {
            months.entry(month).or_default().add(row);
        }
    }

    // BTreeMap iteration is already chronological.
    Breakdown::new(
        months
            .into_iter()
            .map(|(month, totals)| Group::new(month, totals))
            .collect(),
    )
}

/// Groups rows by merchant, keeping the `top_n` with the highest total value.
pub fn breakdown_by_merchant(table: &Table, top_n: usize) -> Breakdown<Group<String>> {
    let mut breakdown = breakdown_by_label(table, TransactionColumn::Merchant, Transaction::merchant);
    breakdown.rows.truncate(top_n);
    breakdown
}

fn breakdown_by_label<F>(table: &Table, column: TransactionColumn, label: F) -> Breakdown<Group<String>>
where
    F: Fn(&Transaction) -> Option<&str>,
{
    if !table.has_column(column) {
        return Breakdown::empty();
    }

    let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
    for row in table.rows() {
        if let Some(key) = label(row) {
            groups.entry(key).or_default().add(row);
        }
    }

    let mut rows: Vec<Group<String>> = groups
        .into_iter()
        .map(|(key, totals)| Group::new(key.to_string(), totals))
        .collect();
    // Stable sort keeps ties in ascending key order.
    rows.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    Breakdown::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{ingest, ingest_rows};
    use crate::model::{RawRecord, RawValue};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(fields: &[(&str, RawValue)]) -> RawRecord {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// The three-record scenario of a Paris food trip and a points-paid Tokyo flight.
    fn paris_tokyo() -> Table {
        ingest(&vec![
            record(&[
                ("Date", "2024-01-05".into()),
                ("Cost", "$100.00".into()),
                ("Category", "Food".into()),
                ("Trip Name", "Paris".into()),
            ]),
            record(&[
                ("Date", "2024-01-10".into()),
                ("Cost", "50".into()),
                ("Category", "Food".into()),
                ("Trip Name", "Paris".into()),
            ]),
            record(&[
                ("Date", "2024-02-01".into()),
                ("Cost", "$0".into()),
                ("Point Spend", 1000i64.into()),
                ("Point Cash Value", "20.00".into()),
                ("Category", "Flight".into()),
                ("Trip Name", "Tokyo".into()),
            ]),
        ])
    }

    #[test]
    fn test_summary_metrics_scenario() {
        let m = summary_metrics(&paris_tokyo()).unwrap();
        assert_eq!(m.total_cost.value(), dec("150.00"));
        assert_eq!(m.total_point_spend, dec("1000"));
        assert_eq!(m.total_point_value.value(), dec("20.00"));
        assert_eq!(m.total_transactions, 3);
        assert_eq!(m.unique_trips, 2);
        assert_eq!(m.unique_categories, 2);
        assert_eq!(m.avg_transaction.value(), dec("50.00"));
        assert_eq!(m.total_value.value(), dec("170.00"));
    }

    #[test]
    fn test_summary_metrics_identities() {
        let m = summary_metrics(&paris_tokyo()).unwrap();
        assert_eq!(
            m.avg_transaction.value(),
            m.total_cost.value() / Decimal::from(m.total_transactions as u64)
        );
        assert_eq!(m.total_value, m.total_cost + m.total_point_value);
    }

    #[test]
    fn test_summary_metrics_empty_table() {
        assert_eq!(summary_metrics(&Table::default()), None);
    }

    #[test]
    fn test_unique_counts_zero_without_column() {
        let table = ingest_rows(vec![vec!["Cost"], vec!["5"], vec!["6"]]);
        let m = summary_metrics(&table).unwrap();
        assert_eq!(m.unique_trips, 0);
        assert_eq!(m.unique_categories, 0);
        assert_eq!(m.total_transactions, 2);
    }

    #[test]
    fn test_category_breakdown_scenario() {
        let b = breakdown_by_category(&paris_tokyo());
        assert_eq!(b.len(), 2);
        let food = &b.rows()[0];
        assert_eq!(food.key, "Food");
        assert_eq!(food.total_value.value(), dec("150.00"));
        assert_eq!(food.totals.transactions, 2);
        let flight = &b.rows()[1];
        assert_eq!(flight.key, "Flight");
        assert_eq!(flight.total_value.value(), dec("20.00"));
        assert_eq!(flight.totals.transactions, 1);
        assert_eq!(flight.totals.point_spend, dec("1000"));
    }

    #[test]
    fn test_absent_labels_are_not_grouped() {
        let table = ingest_rows(vec![
            vec!["Cost", "Category"],
            vec!["10", "Food"],
            vec!["99", ""],
        ]);
        let b = breakdown_by_category(&table);
        assert_eq!(b.len(), 1);
        assert_eq!(b.rows()[0].key, "Food");
    }

    #[test]
    fn test_ties_sorted_by_key() {
        let table = ingest_rows(vec![
            vec!["Cost", "Category"],
            vec!["10", "Zoo"],
            vec!["10", "Art"],
            vec!["20", "Mid"],
        ]);
        let b = breakdown_by_category(&table);
        let keys: Vec<&str> = b.rows().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Mid", "Art", "Zoo"]);
    }

    #[test]
    fn test_trip_breakdown_dates_and_duration() {
        let b = breakdown_by_trip(&paris_tokyo());
        assert_eq!(b.len(), 2);
        let paris = &b.rows()[0];
        assert_eq!(paris.group.key, "Paris");
        assert_eq!(paris.start_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(paris.end_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(paris.duration_days, Some(6));
        let tokyo = &b.rows()[1];
        assert_eq!(tokyo.duration_days, Some(1));
    }

    #[test]
    fn test_trip_without_dates() {
        let table = ingest_rows(vec![
            vec!["Date", "Cost", "Trip Name"],
            vec!["", "10", "Somewhere"],
        ]);
        let b = breakdown_by_trip(&table);
        assert_eq!(b.rows()[0].start_date, None);
        assert_eq!(b.rows()[0].duration_days, None);
    }

    #[test]
    fn test_month_breakdown_is_chronological() {
        let table = ingest_rows(vec![
            vec!["Date", "Cost"],
            vec!["2024-03-01", "1"],
            vec!["2023-12-31", "500"],
            vec!["2024-03-20", "2"],
            vec!["", "1000"],
            vec!["2024-01-15", "50"],
        ]);
        let b = breakdown_by_month(&table);
        let months: Vec<String> = b.rows().iter().map(|g| g.key.to_string()).collect();
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-03"]);
        assert_eq!(b.rows()[2].total_value.value(), dec("3"));
        assert_eq!(b.rows()[2].totals.transactions, 2);
    }

    #[test]
    fn test_merchant_breakdown_truncates() {
        let mut rows = vec![vec!["Cost".to_string(), "Merchant".to_string()]];
        for i in 0..15 {
            rows.push(vec![format!("{i}"), format!("Shop {i:02}")]);
        }
        let table = ingest_rows(rows);
        let b = breakdown_by_merchant(&table, DEFAULT_TOP_MERCHANTS);
        assert_eq!(b.len(), 10);
        assert_eq!(b.rows()[0].key, "Shop 14");
        assert!(b
            .rows()
            .windows(2)
            .all(|w| w[0].total_value >= w[1].total_value));
    }

    #[test]
    fn test_breakdowns_empty_without_column_or_rows() {
        let no_labels = ingest_rows(vec![vec!["Cost"], vec!["5"]]);
        assert!(breakdown_by_category(&no_labels).is_empty());
        assert!(breakdown_by_trip(&no_labels).is_empty());
        assert!(breakdown_by_month(&no_labels).is_empty());
        assert!(breakdown_by_merchant(&no_labels, 10).is_empty());

        let empty = Table::default();
        assert!(breakdown_by_category(&empty).is_empty());
        assert!(breakdown_by_trip(&empty).is_empty());
        assert!(breakdown_by_month(&empty).is_empty());
        assert!(breakdown_by_merchant(&empty, 10).is_empty());
    }

    #[test]
    fn test_group_serializes_flat() {
        let b = breakdown_by_category(&paris_tokyo());
        let json = serde_json::to_value(&b).unwrap();
        let first = &json[0];
        assert_eq!(first["key"], "Food");
        assert_eq!(first["transactions"], 2);
        assert!(first.get("totals").is_none());
    }

    #[test]
    fn test_huge_values_saturate() {
        let table = ingest_rows(vec![
            vec!["Date", "Cost", "Point Spend", "Category", "Trip Name", "Merchant"],
            vec!["2024-01-05", "50000000000000000000000000000", "50000000000000000000000000000", "Food", "Paris", "Bistro"],
            vec!["2024-01-06", "50000000000000000000000000000", "50000000000000000000000000000", "Food", "Paris", "Bistro"],
        ]);
        let m = summary_metrics(&table).unwrap();
        assert_eq!(m.total_cost.value(), Decimal::MAX);
        assert_eq!(m.total_point_spend, Decimal::MAX);
        assert_eq!(m.total_value.value(), Decimal::MAX);

        let b = breakdown_by_category(&table);
        assert_eq!(b.rows()[0].totals.cost.value(), Decimal::MAX);
        assert_eq!(breakdown_by_trip(&table).len(), 1);
        assert_eq!(breakdown_by_month(&table).len(), 1);
        assert_eq!(breakdown_by_merchant(&table, 10).len(), 1);
    }
}
