//! Types that represent the core data model, such as `Transaction` and `Table`.
mod amount;
mod column;
mod month;
mod raw;
mod table;
mod transaction;

pub use amount::{parse_number, Amount, AmountError};
pub use column::TransactionColumn;
pub use month::YearMonth;
pub use raw::{records_from_rows, RawRecord, RawRecords, RawValue};
pub use table::Table;
pub use transaction::{parse_date, Transaction};
