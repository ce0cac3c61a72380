//! Holds on to the last good copy of the travel log between interactions.
//!
//! Fetching goes through a small on-disk cache: a fetched record set is reused until it is older
//! than the configured TTL, a refresh bypasses it, and when a fetch fails the last cached copy is
//! served instead and flagged as stale. The pipeline itself stays stateless; only this module
//! remembers anything.

use crate::api::{self, Mode, Source};
use crate::ingest::ingest;
use crate::model::{RawRecords, Table};
use crate::{utils, Config, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const RECORDS_JSON: &str = "records.json";

/// What ended up in the cache file after the last successful fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedRecords {
    fetched_at: DateTime<Utc>,
    source: String,
    records: RawRecords,
}

/// Where a loaded table came from.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Freshness {
    /// Fetched from the source just now.
    Fetched,
    /// Served from a cached fetch that is still within its TTL.
    Cached { fetched_at: DateTime<Utc> },
    /// The fetch failed and the last good copy was served instead.
    Stale {
        fetched_at: DateTime<Utc>,
        error: String,
    },
}

/// A cleaned table plus how fresh it is.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: Table,
    pub freshness: Freshness,
}

pub struct Session {
    source: Box<dyn Source + Send>,
    cache_path: PathBuf,
    ttl: Duration,
}

impl Session {
    /// Creates a session reading the source `config` names, or the seeded source in test mode.
    pub fn new(config: &Config, mode: Mode) -> Self {
        Self::with_source(
            api::source(config, mode),
            config.cache_dir().join(RECORDS_JSON),
            config.cache_ttl(),
        )
    }

    pub(crate) fn with_source(
        source: Box<dyn Source + Send>,
        cache_path: impl Into<PathBuf>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            cache_path: cache_path.into(),
            ttl,
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Returns the current table. A fresh cached copy is used unless `force_refresh` is set.
    ///
    /// # Errors
    /// Returns the fetch error when the source fails and there is no cached copy to fall back on.
    pub async fn load(&mut self, force_refresh: bool) -> Result<Loaded> {
        let cached = self.read_cache().await.filter(|c| self.is_same_source(c));

        if !force_refresh {
            if let Some(cached) = cached.as_ref().filter(|c| self.is_fresh(c)) {
                debug!(
                    "Using cached records fetched at {} from {}",
                    cached.fetched_at, cached.source
                );
                return Ok(Loaded {
                    table: ingest(&cached.records),
                    freshness: Freshness::Cached {
                        fetched_at: cached.fetched_at,
                    },
                });
            }
        }

        match self.source.records().await {
            Ok(records) => {
                info!(
                    "Loaded {} records from {}",
                    records.len(),
                    self.source.describe()
                );
                let table = ingest(&records);
                if let Err(e) = self.write_cache(records).await {
                    warn!("Unable to cache the fetched records: {e:#}");
                }
                Ok(Loaded {
                    table,
                    freshness: Freshness::Fetched,
                })
            }
            Err(e) => match cached {
                Some(cached) => {
                    warn!(
                        "Failed to load data, showing the copy fetched at {}: {e:#}",
                        cached.fetched_at
                    );
                    Ok(Loaded {
                        table: ingest(&cached.records),
                        freshness: Freshness::Stale {
                            fetched_at: cached.fetched_at,
                            error: format!("{e:#}"),
                        },
                    })
                }
                None => Err(e.context("Failed to load data and no earlier copy is available")),
            },
        }
    }

    /// Forgets the cached copy so the next load fetches from the source.
    pub async fn clear(&self) -> Result<()> {
        utils::remove_file(&self.cache_path).await
    }

    /// A cache written while reading some other source (another file, or test mode) is ignored.
    fn is_same_source(&self, cached: &CachedRecords) -> bool {
        let current = self.source.describe();
        if cached.source != current {
            debug!(
                "Ignoring cached records from {} while reading {current}",
                cached.source
            );
            return false;
        }
        true
    }

    fn is_fresh(&self, cached: &CachedRecords) -> bool {
        let age = Utc::now().signed_duration_since(cached.fetched_at);
        match age.to_std() {
            Ok(age) => age < self.ttl,
            // A timestamp in the future means the clock moved; do not trust it.
            Err(_) => false,
        }
    }

    async fn read_cache(&self) -> Option<CachedRecords> {
        if !self.cache_path.is_file() {
            return None;
        }
        match utils::deserialize(&self.cache_path).await {
            Ok(cached) => Some(cached),
            Err(e) => {
                warn!("Ignoring unreadable cache: {e:#}");
                None
            }
        }
    }

    async fn write_cache(&self, records: RawRecords) -> Result<()> {
        let cached = CachedRecords {
            fetched_at: Utc::now(),
            source: self.source.describe(),
            records,
        };
        utils::serialize(&self.cache_path, &cached).await
    }
}
