//! The loosely-typed shape in which records arrive from a data source.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single cell as handed over by a data source: a string, a number, or nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Returns the text of this value, or `None` when the value is absent. Text that is empty
    /// once trimmed is treated as absent.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Integer(i) => Some(i.to_string()),
            RawValue::Float(f) if f.is_finite() => Some(f.to_string()),
            RawValue::Float(_) => None,
            RawValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

/// One source row: field display name -> raw value. Field names are not guaranteed to be known
/// columns and values are not guaranteed to have consistent types across rows.
pub type RawRecord = BTreeMap<String, RawValue>;

/// The full result of a successful fetch.
pub type RawRecords = Vec<RawRecord>;

/// Builds raw records from worksheet rows where the first row holds the headers. Short rows are
/// padded with absent values and cells beyond the last header are ignored, which is what a
/// spreadsheet "get all records" call hands back.
pub fn records_from_rows<S, R>(rows: impl IntoIterator<Item = R>) -> RawRecords
where
    S: Into<String>,
    R: IntoIterator<Item = S>,
{
    let mut rows = rows.into_iter();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.into_iter().map(|s| s.into()).collect(),
        None => return Vec::new(),
    };

    rows.map(|row| {
        let mut values = row.into_iter().map(|s| RawValue::Text(s.into()));
        headers
            .iter()
            .map(|h| (h.clone(), values.next().unwrap_or_default()))
            .collect()
    })
    .collect()
}
