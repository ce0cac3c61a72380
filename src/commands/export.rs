use crate::api::Mode;
use crate::args::ExportArgs;
use crate::commands::report::filtered;
use crate::commands::Out;
use crate::export::{default_file_name, to_csv};
use crate::{utils, Config, Result};
use chrono::Local;
use std::path::PathBuf;

/// Writes the filtered travel log as CSV to `--output`, or to a timestamped file in the current
/// directory. The structure is the path that was written.
pub async fn export(config: Config, mode: Mode, args: ExportArgs) -> Result<Out<PathBuf>> {
    let table = filtered(&config, mode, args.report()).await?;
    let csv = to_csv(&table)?;
    let path = match args.output() {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(default_file_name(Local::now().naive_local())),
    };
    utils::write(&path, csv).await?;
    Ok(Out::new(
        format!("Exported {} transactions to {}", table.len(), path.display()),
        path,
    ))
}
