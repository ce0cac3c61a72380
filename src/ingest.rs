//! Turns raw records from a data source into a typed `Table`.
//!
//! Ingestion never fails. Malformed cells are repaired: unparseable dates become absent,
//! unparseable numbers become zero and empty text becomes absent. Rows whose schema fields are
//! all absent are dropped.

use crate::model::{
    parse_date, parse_number, records_from_rows, Amount, RawRecord, RawValue, Table,
    Transaction, TransactionColumn,
};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Cleans `records` into a `Table`.
pub fn ingest<'a>(records: impl IntoIterator<Item = &'a RawRecord>) -> Table {
    let mut columns = BTreeSet::new();
    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in records {
        match clean_record(record, &mut columns) {
            Some(transaction) => rows.push(transaction),
            None => dropped += 1,
        }
    }

    debug!(
        "Ingested {} rows, dropped {dropped} empty rows, columns: {:?}",
        rows.len(),
        columns
    );
    Table::new(columns, rows)
}

/// Cleans worksheet rows, where the first row holds the headers, into a `Table`.
pub fn ingest_rows<S, R>(rows: impl IntoIterator<Item = R>) -> Table
where
    S: Into<String>,
    R: IntoIterator<Item = S>,
{
    let records = records_from_rows(rows);
    ingest(&records)
}

/// Returns `None` when every schema field of `record` is absent. Known column names seen in the
/// record are added to `columns`.
fn clean_record(
    record: &RawRecord,
    columns: &mut BTreeSet<TransactionColumn>,
) -> Option<Transaction> {
    let mut transaction = Transaction::default();
    let mut any_present = false;

    for (header, value) in record {
        let column = match TransactionColumn::from_header(header) {
            Ok(column) => column,
            Err(_) => {
                trace!("Ignoring unknown column '{header}'");
                continue;
            }
        };
        columns.insert(column);

        let text = match value.as_text() {
            Some(text) => text,
            None => continue,
        };
        any_present = true;

        match column {
            TransactionColumn::Date => transaction.date = parse_date(&text),
            TransactionColumn::Cost => transaction.cost = coerce_amount(value, &text),
            TransactionColumn::PointSpend => {
                transaction.point_spend = coerce_decimal(value, &text)
            }
            TransactionColumn::PointCashValue => {
                transaction.point_cash_value = coerce_amount(value, &text)
            }
            TransactionColumn::Category => transaction.category = Some(text),
            TransactionColumn::TripName => transaction.trip_name = Some(text),
            TransactionColumn::Merchant => transaction.merchant = Some(text),
        }
    }

    any_present.then_some(transaction)
}

fn coerce_decimal(value: &RawValue, text: &str) -> Decimal {
    match value {
        RawValue::Integer(i) => Decimal::from(*i),
        RawValue::Float(f) => Decimal::try_from(*f).unwrap_or_default(),
        _ => parse_number(text).unwrap_or_default(),
    }
}

fn coerce_amount(value: &RawValue, text: &str) -> Amount {
    Amount::new(coerce_decimal(value, text))
}
