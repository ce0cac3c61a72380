//! Sources backed by a file exported from the travel log spreadsheet.

use crate::api::Source;
use crate::model::{records_from_rows, RawRecords};
use crate::{utils, Result};
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Reads a worksheet that was exported as CSV: a header row followed by one row per expense.
pub(crate) struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl Source for CsvSource {
    async fn records(&mut self) -> Result<RawRecords> {
        trace!("Reading CSV records from {}", self.path.display());
        let content = utils::read(&self.path).await?;
        let rows = parse_csv(&content)
            .with_context(|| format!("Failed to parse CSV file at {}", self.path.display()))?;
        Ok(records_from_rows(rows))
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }
}

/// Reads a JSON export. The file is either an array of objects, each mapping column display
/// names to strings or numbers, or a whole workbook: an object mapping worksheet names to such
/// arrays, in which case the configured worksheet is read.
pub(crate) struct JsonSource {
    path: PathBuf,
    worksheet: String,
}

/// The two shapes a JSON export can take.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonExport {
    Records(RawRecords),
    Workbook(BTreeMap<String, RawRecords>),
}

impl JsonSource {
    pub(crate) fn new(path: impl Into<PathBuf>, worksheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            worksheet: worksheet.into(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Source for JsonSource {
    async fn records(&mut self) -> Result<RawRecords> {
        trace!("Reading JSON records from {}", self.path.display());
        let export: JsonExport = utils::deserialize(self.path()).await?;
        match export {
            JsonExport::Records(records) => Ok(records),
            JsonExport::Workbook(mut sheets) => sheets.remove(&self.worksheet).with_context(|| {
                format!(
                    "Worksheet '{}' not found in {}",
                    self.worksheet,
                    self.path.display()
                )
            }),
        }
    }

    fn describe(&self) -> String {
        format!(
            "JSON file {} (worksheet '{}')",
            self.path.display(),
            self.worksheet
        )
    }
}

/// Loads rows from a CSV-formatted string without treating the first row specially.
pub(crate) fn parse_csv(csv_data: &str) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawValue;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_csv_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw.csv");
        utils::write(
            &path,
            "Date,Cost,Merchant\n2024-01-05,\"$1,000.00\",Hotel\n2024-01-06,5\n",
        )
        .await
        .unwrap();

        let records = CsvSource::new(&path).records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Cost"], RawValue::from("$1,000.00"));
        assert_eq!(records[1]["Merchant"], RawValue::Null);
    }

    #[tokio::test]
    async fn test_csv_source_empty_file_is_empty_success() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw.csv");
        utils::write(&path, "").await.unwrap();
        let records = CsvSource::new(&path).records().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut source = CsvSource::new(dir.path().join("nope.csv"));
        assert!(source.records().await.is_err());
    }

    #[tokio::test]
    async fn test_json_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw.json");
        utils::write(
            &path,
            r#"[{"Date": "2024-02-01", "Point Spend": 1000, "Point Cash Value": "20.00"}]"#,
        )
        .await
        .unwrap();
        let records = JsonSource::new(&path, "Raw Data").records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Point Spend"], RawValue::Integer(1000));
    }

    #[tokio::test]
    async fn test_json_workbook_reads_configured_worksheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workbook.json");
        utils::write(
            &path,
            r#"{
                "Summary": [{"Total": "$10"}],
                "Trips": [{"Cost": "$5"}, {"Cost": "$7"}]
            }"#,
        )
        .await
        .unwrap();

        let records = JsonSource::new(&path, "Trips").records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["Cost"], RawValue::from("$7"));

        let err = JsonSource::new(&path, "Raw Data")
            .records()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Raw Data"));
    }

    #[test]
    fn test_parse_csv_flexible_rows() {
        let rows = parse_csv("a,b,c\n1\n1,2,3,4\n").unwrap();
        assert_eq!(rows[1], vec!["1"]);
        assert_eq!(rows[2].len(), 4);
    }
}
