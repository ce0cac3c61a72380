use crate::model::{Transaction, TransactionColumn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The cleaned, typed form of the travel log.
///
/// A `Table` remembers which schema columns its source actually carried so that a breakdown over
/// a column the source never had can be told apart from one whose values are all absent. Tables
/// are never modified in place; filtering produces a new `Table`.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Table {
    columns: BTreeSet<TransactionColumn>,
    rows: Vec<Transaction>,
}

impl Table {
    pub fn new(
        columns: impl IntoIterator<Item = TransactionColumn>,
        rows: impl IntoIterator<Item = Transaction>,
    ) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            rows: rows.into_iter().collect(),
        }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: TransactionColumn) -> bool {
        self.columns.contains(&column)
    }

    /// Returns a new table with the same schema holding only the rows for which `keep` is true.
    pub fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Transaction) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|t| keep(t)).cloned().collect(),
        }
    }
}
