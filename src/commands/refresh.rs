use crate::api::Mode;
use crate::args::LoadArgs;
use crate::commands::{load, Out};
use crate::session::Freshness;
use crate::{Config, Result};
use serde::Serialize;

/// What a refresh brought back.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshSummary {
    /// Rows left after cleaning.
    pub transactions: usize,
    pub freshness: Freshness,
}

/// Fetches the travel log again, bypassing the cache, and stores the result for later commands.
///
/// When the fetch fails but an earlier copy exists, that copy is reported as stale instead of
/// failing.
pub async fn refresh(config: Config, mode: Mode) -> Result<Out<RefreshSummary>> {
    let loaded = load(&config, mode, &LoadArgs::new(true)).await?;
    let message = match &loaded.freshness {
        Freshness::Stale { .. } => "Refresh failed, kept the earlier copy of the travel log",
        _ => "Refreshed the travel log",
    };
    Ok(Out::new(
        message,
        RefreshSummary {
            transactions: loaded.table.len(),
            freshness: loaded.freshness,
        },
    ))
}
