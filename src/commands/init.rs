use crate::commands::Out;
use crate::session::Session;
use crate::{Config, Mode, Result};
use anyhow::Context;
use std::path::Path;
use tracing::warn;

/// Creates the home directory, its cache subdirectory and an initial `config.json` pointing at
/// `source`. Running it again over an existing home rewrites the config and forgets any cached
/// copy of the previous source.
///
/// # Arguments
/// - `home` - The directory that will be the root of the home directory, e.g.
///   `$HOME/travel-spend`
/// - `source` - The CSV export of the travel log worksheet, or a JSON export of records or of the
///   workbook.
/// - `worksheet` - The worksheet holding the expense rows, `Raw Data` when `None`.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(home: &Path, source: &Path, worksheet: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(home, source, worksheet)
        .await
        .context("Unable to create the home directory and config")?;
    Session::new(&config, Mode::File).clear().await?;
    if !config.source_path().is_file() {
        warn!(
            "The source {} does not exist yet, reports will fail until it does",
            config.source_path().display()
        );
    }
    Ok(format!(
        "Successfully created the travel-spend directory at {}",
        config.root().display()
    )
    .into())
}
