//! CSV export of a `Table`.

use crate::model::{Table, Transaction, TransactionColumn};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDateTime;

/// Renders `table` as UTF-8 CSV: a header row of column display names followed by one row per
/// transaction. Absent values are written as empty cells and numbers are written without
/// currency formatting.
pub fn to_csv(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(TransactionColumn::ALL.iter().map(|c| c.as_header_str()))
        .context("Unable to write the CSV header")?;
    for row in table.rows() {
        writer
            .write_record(TransactionColumn::ALL.iter().map(|c| cell(row, *c)))
            .context("Unable to write a CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to flush CSV output: {e}"))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

fn cell(row: &Transaction, column: TransactionColumn) -> String {
    match column {
        TransactionColumn::Date => row
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        TransactionColumn::Cost => row.cost().value().to_string(),
        TransactionColumn::PointSpend => row.point_spend().to_string(),
        TransactionColumn::PointCashValue => row.point_cash_value().value().to_string(),
        TransactionColumn::Category => row.category().unwrap_or_default().to_string(),
        TransactionColumn::TripName => row.trip_name().unwrap_or_default().to_string(),
        TransactionColumn::Merchant => row.merchant().unwrap_or_default().to_string(),
    }
}

/// The file name offered for an export made at `now`, e.g.
/// `travel_log_filtered_20240105_134500.csv`.
pub fn default_file_name(now: NaiveDateTime) -> String {
    format!("travel_log_filtered_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ingest_rows;
    use chrono::NaiveDate;

    #[test]
    fn test_to_csv() {
        let table = ingest_rows(vec![
            vec!["Date", "Cost", "Point Spend", "Category", "Trip Name", "Merchant"],
            vec!["1/5/2024", "$1,100.50", "1000", "Food", "Paris", "Cafe, Bar & Grill"],
            vec!["", "7", "", "", "Tokyo", ""],
        ]);
        let csv = to_csv(&table).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Date,Cost,Point Spend,Point Cash Value,Category,Trip Name,Merchant"
        );
        assert_eq!(lines[1], "2024-01-05,1100.50,1000,0,Food,Paris,\"Cafe, Bar & Grill\"");
        assert_eq!(lines[2], ",7,0,0,,Tokyo,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_to_csv_empty_table_has_header() {
        let csv = to_csv(&Table::default()).unwrap();
        assert_eq!(
            csv,
            "Date,Cost,Point Spend,Point Cash Value,Category,Trip Name,Merchant\n"
        );
    }

    #[test]
    fn test_default_file_name() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        assert_eq!(default_file_name(now), "travel_log_filtered_20240105_134500.csv");
    }
}
