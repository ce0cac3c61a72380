//! Configuration file handling for travel-spend.
//!
//! The configuration file is stored at `$TRAVEL_SPEND_HOME/config.json` and names the travel log
//! export to read along with cache and report settings.

use crate::aggregate::DEFAULT_TOP_MERCHANTS;
use crate::api::RAW_DATA;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "travel-spend";
const CONFIG_VERSION: u8 = 1;
const CACHE_TTL_SECS: u64 = 300;
const CACHE: &str = ".cache";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$TRAVEL_SPEND_HOME` and from there it loads `$TRAVEL_SPEND_HOME/config.json`. It
/// provides paths to other items that are expected in a certain location within the home
/// directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    cache: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its cache subdirectory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the home directory, e.g.
    ///   `$HOME/travel-spend`
    /// - `source_path` - The CSV or JSON export of the travel log. A relative path is resolved
    ///   against the current directory before it is stored.
    /// - `worksheet` - The worksheet holding the expense rows, `Raw Data` when `None`. Only JSON
    ///   workbook exports and test mode have more than one worksheet to choose from.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        source_path: &Path,
        worksheet: Option<&str>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the travel-spend home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let cache = root.join(CACHE);
        utils::make_dir(&cache).await?;

        let source_path = if source_path.is_absolute() {
            source_path.to_path_buf()
        } else {
            std::env::current_dir()
                .context("Unable to determine the current directory")?
                .join(source_path)
        };

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            source_path,
            worksheet: worksheet.unwrap_or(RAW_DATA).to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            cache,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load the config file
    /// - validate that the cache directory exists
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The travel-spend home directory is missing, run 'travel-spend init'")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            root: root.clone(),
            cache: root.join(CACHE),
            config_path,
            config_file,
        };
        if !config.cache.is_dir() {
            bail!(
                "The cache directory is missing '{}'",
                config.cache.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache
    }

    /// Returns the stored source path if it is absolute, otherwise resolves it against the home
    /// directory.
    pub fn source_path(&self) -> PathBuf {
        let p = &self.config_file.source_path;
        if p.is_absolute() {
            return p.clone();
        }
        self.root.join(p)
    }

    pub fn worksheet(&self) -> &str {
        &self.config_file.worksheet
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.config_file.cache_ttl_secs)
    }

    pub fn top_merchants(&self) -> usize {
        self.config_file.top_merchants
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "travel-spend",
///   "config_version": 1,
///   "source_path": "/home/me/Downloads/Travel Log - Raw Data.csv",
///   "worksheet": "Raw Data",
///   "cache_ttl_secs": 300,
///   "top_merchants": 10
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "travel-spend"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The CSV or JSON export of the travel log (relative to the home directory or absolute)
    source_path: PathBuf,

    /// The worksheet that holds one row per expense. It selects a sheet from a JSON workbook
    /// export and from the test-mode data; a CSV export is already a single worksheet.
    #[serde(default = "default_worksheet")]
    worksheet: String,

    /// How long a fetched copy of the travel log is reused before it is fetched again
    #[serde(default = "default_cache_ttl_secs")]
    cache_ttl_secs: u64,

    /// How many merchants the top merchants breakdown keeps
    #[serde(default = "default_top_merchants")]
    top_merchants: usize,
}

fn default_worksheet() -> String {
    RAW_DATA.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    CACHE_TTL_SECS
}

fn default_top_merchants() -> usize {
    DEFAULT_TOP_MERCHANTS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            source_path: PathBuf::new(),
            worksheet: default_worksheet(),
            cache_ttl_secs: CACHE_TTL_SECS,
            top_merchants: DEFAULT_TOP_MERCHANTS,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names a different app
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
