//! Data sources that produce raw travel log records.
//!
//! A `Source` is the only place where records are read from outside the process. The rest of
//! the crate consumes the `RawRecords` it returns.

mod files;
mod test_source;

use crate::model::RawRecords;
use crate::{Config, Result};
use tracing::debug;

pub(crate) use files::{CsvSource, JsonSource};
pub(crate) use test_source::TestSource;

/// The worksheet of the travel log that holds one row per expense.
pub const RAW_DATA: &str = "Raw Data";

/// Environment variable that, when non-empty, switches every command to the seeded in-memory
/// source.
pub const TEST_MODE_ENV: &str = "TRAVEL_SPEND_IN_TEST_MODE";

/// Something that can fetch the travel log.
///
/// An `Err` means the fetch failed. An `Ok` with no records is a successful fetch of an empty
/// worksheet and must not be confused with a failure.
#[async_trait::async_trait]
pub trait Source {
    async fn records(&mut self) -> Result<RawRecords>;

    /// A short description used in log messages.
    fn describe(&self) -> String;
}

/// Whether to read the configured source or the seeded in-memory source.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    File,
    Test,
}

impl Mode {
    /// Returns `Mode::Test` when `TRAVEL_SPEND_IN_TEST_MODE` is set and non-empty.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::File,
        }
    }
}

/// Creates the source that `config` and `mode` call for. A source path ending in `.json` is read
/// as a JSON export (records, or a workbook from which the configured worksheet is taken),
/// anything else as a CSV export of a single worksheet.
pub(crate) fn source(config: &Config, mode: Mode) -> Box<dyn Source + Send> {
    let source: Box<dyn Source + Send> = match mode {
        Mode::Test => Box::new(TestSource::default().worksheet(config.worksheet())),
        Mode::File => {
            let path = config.source_path();
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json {
                Box::new(JsonSource::new(path, config.worksheet()))
            } else {
                Box::new(CsvSource::new(path))
            }
        }
    };
    debug!("Using source {}", source.describe());
    source
}
