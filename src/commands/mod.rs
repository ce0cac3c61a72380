//! Command handlers for the travel-spend CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod export;
mod init;
mod refresh;
mod report;

use crate::api::Mode;
use crate::args::LoadArgs;
use crate::session::{Freshness, Loaded, Session};
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{info, warn};

pub use export::export;
pub use init::init;
pub use refresh::{refresh, RefreshSummary};
pub use report::{breakdown, charts, dashboard, options, summary, BreakdownOut};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Log the message with `info!` and print the structured data (if it exists) as pretty JSON
    /// to stdout.
    pub fn print(&self) -> Result<()> {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            let json = serde_json::to_string_pretty(structure)?;
            println!("{json}");
        }
        Ok(())
    }
}

/// Loads the travel log through the session cache and warns when the data being shown is an
/// older copy.
async fn load(config: &Config, mode: Mode, args: &LoadArgs) -> Result<Loaded> {
    let loaded = Session::new(config, mode).load(args.refresh()).await?;
    if let Freshness::Stale { fetched_at, .. } = &loaded.freshness {
        warn!("Showing data fetched at {fetched_at} because the latest fetch failed");
    }
    Ok(loaded)
}
