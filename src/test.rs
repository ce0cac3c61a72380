//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::Config;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A small travel log with round numbers so that expected totals are easy to work out:
/// cost 475, point spend 1000, point value 20, five rows after the blank one is dropped.
pub const SOURCE_CSV: &str = r#"Date,Trip Name,Category,Merchant,Cost,Point Spend,Point Cash Value
2024-01-05,Paris,Food,Bistro,$100.00,,
2024-01-06,Paris,Food,Cafe,$50.00,,
2024-01-04,Paris,Flight,Air France,$0,1000,$20.00
2024-02-10,Tokyo,Lodging,Hotel,$300.00,,
2024-02-11,Tokyo,Food,Bistro,$25.00,,
,,,,,,
"#;

/// Test environment with a travel-spend home directory and a source CSV next to it.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    temp_dir: TempDir,
    source: PathBuf,
    config: Config,
}

impl TestEnv {
    /// Creates a home directory whose config points at a copy of `SOURCE_CSV`.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("travel_log.csv");
        std::fs::write(&source, SOURCE_CSV).unwrap();
        let config = Config::create(temp_dir.path().join("home"), &source, None)
            .await
            .unwrap();
        Self {
            temp_dir,
            source,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// The temporary directory holding the home directory and the source.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Deletes the source file so that the next fetch fails.
    pub fn remove_source(&self) {
        std::fs::remove_file(&self.source).unwrap();
    }
}
