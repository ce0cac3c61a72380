//! Optional date-range, category and trip predicates over a `Table`.

use crate::model::{Table, Transaction};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// A set of independent, optional filter criteria. Criteria that are `None` pass every row; the
/// criteria that are set are combined with a logical AND.
///
/// # Examples
///
/// ```
/// # use travel_spend::Filter;
/// # use chrono::NaiveDate;
/// let filter = Filter::default()
///     .start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
///     .categories(["Food", "Lodging"]);
/// assert!(!filter.is_empty());
/// ```
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
pub struct Filter {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    categories: Option<BTreeSet<String>>,
    trips: Option<BTreeSet<String>>,
}

impl Filter {
    /// Sets the inclusive first date.
    pub fn start(mut self, date: NaiveDate) -> Self {
        self.start = Some(date);
        self
    }

    /// Sets the inclusive last date.
    pub fn end(mut self, date: NaiveDate) -> Self {
        self.end = Some(date);
        self
    }

    /// Keeps only rows whose category is in `categories`. An empty set means "no selection" and
    /// leaves the category dimension unfiltered.
    pub fn categories<S: Into<String>>(mut self, categories: impl IntoIterator<Item = S>) -> Self {
        self.categories = non_empty_set(categories);
        self
    }

    /// Keeps only rows whose trip name is in `trips`. An empty set leaves trips unfiltered.
    pub fn trips<S: Into<String>>(mut self, trips: impl IntoIterator<Item = S>) -> Self {
        self.trips = non_empty_set(trips);
        self
    }

    /// Returns true when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
            && self.end.is_none()
            && self.categories.is_none()
            && self.trips.is_none()
    }

    /// Returns a new table holding the rows of `table` that satisfy every criterion.
    pub fn apply(&self, table: &Table) -> Table {
        if self.is_empty() {
            return table.clone();
        }
        table.retain(|t| self.matches(t))
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.matches_date(transaction)
            && matches_label(self.categories.as_ref(), transaction.category())
            && matches_label(self.trips.as_ref(), transaction.trip_name())
    }

    fn matches_date(&self, transaction: &Transaction) -> bool {
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        // An undated row cannot satisfy a bounded range.
        let Some(date) = transaction.date() else {
            return false;
        };
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

fn matches_label(wanted: Option<&BTreeSet<String>>, label: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(set) => label.is_some_and(|l| set.contains(l)),
    }
}

fn non_empty_set<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = items.into_iter().map(Into::into).collect();
    (!set.is_empty()).then_some(set)
}
