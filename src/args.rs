//! These structs provide the CLI interface for the travel-spend CLI.

use crate::Filter;
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// travel-spend: Summaries and charts for travel expenses and loyalty points.
///
/// The purpose of this program is to read a travel log kept in a spreadsheet (exported as CSV, or
/// as JSON records or a JSON workbook), clean it up, and report what your trips cost in cash and in
/// points: headline metrics, breakdowns by category, trip, month and merchant, chart
/// specifications for a renderer, and filtered CSV exports.
///
/// Structured output is printed to stdout as JSON. Messages are logged to stderr.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and its configuration file.
    ///
    /// This is the first command you should run. Export the worksheet that holds your travel
    /// expenses (columns Date, Cost, Point Spend, Point Cash Value, Category, Trip Name and
    /// Merchant) as CSV and pass it as --source.
    Init(InitArgs),
    /// Fetch the travel log again, ignoring the cached copy.
    Refresh,
    /// Print the headline metrics.
    Summary(ReportArgs),
    /// Print one breakdown table.
    Breakdown(BreakdownArgs),
    /// Print the chart specifications.
    Charts(ReportArgs),
    /// Print metrics, all breakdowns and all charts together.
    Dashboard(ReportArgs),
    /// Print the categories, trips and date range available for filtering.
    Options(LoadArgs),
    /// Write the (filtered) travel log to a CSV file.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where configuration and the cache are held. Defaults to ~/travel-spend
    #[arg(long, env = "TRAVEL_SPEND_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `travel-spend init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The CSV export of the travel log worksheet, or a JSON export of records or of the workbook.
    #[arg(long)]
    source: PathBuf,

    /// The name of the worksheet that holds one row per expense, when the source is a JSON
    /// workbook export holding several worksheets. Ignored for CSV exports.
    #[arg(long)]
    worksheet: Option<String>,
}

impl InitArgs {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn worksheet(&self) -> Option<&str> {
        self.worksheet.as_deref()
    }
}

/// Controls whether the cached copy of the travel log may be used.
#[derive(Debug, Default, ClapArgs, Clone)]
pub struct LoadArgs {
    /// Fetch the travel log again even if the cached copy is still fresh.
    #[arg(long)]
    refresh: bool,
}

impl LoadArgs {
    pub fn new(refresh: bool) -> Self {
        Self { refresh }
    }

    pub fn refresh(&self) -> bool {
        self.refresh
    }
}

/// Filter criteria shared by the reporting commands.
#[derive(Debug, Default, ClapArgs, Clone)]
pub struct FilterArgs {
    /// Only include expenses on or after this date (YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Only include expenses on or before this date (YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Only include these categories. May be repeated.
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Only include these trips. May be repeated.
    #[arg(long = "trip")]
    trips: Vec<String>,
}

impl FilterArgs {
    pub fn new(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        categories: Vec<String>,
        trips: Vec<String>,
    ) -> Self {
        Self {
            start,
            end,
            categories,
            trips,
        }
    }

    /// Builds the `Filter` these arguments describe.
    pub fn filter(&self) -> Filter {
        let mut filter = Filter::default()
            .categories(self.categories.iter().cloned())
            .trips(self.trips.iter().cloned());
        if let Some(start) = self.start {
            filter = filter.start(start);
        }
        if let Some(end) = self.end {
            filter = filter.end(end);
        }
        filter
    }
}

/// Args for the reporting commands.
#[derive(Debug, Default, ClapArgs, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    load: LoadArgs,

    #[command(flatten)]
    filter: FilterArgs,
}

impl ReportArgs {
    pub fn new(load: LoadArgs, filter: FilterArgs) -> Self {
        Self { load, filter }
    }

    pub fn load(&self) -> &LoadArgs {
        &self.load
    }

    pub fn filter(&self) -> Filter {
        self.filter.filter()
    }
}

/// The dimension a breakdown groups by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BreakdownKind {
    Category,
    Trip,
    Month,
    Merchant,
}

serde_plain::derive_display_from_serialize!(BreakdownKind);
serde_plain::derive_fromstr_from_deserialize!(BreakdownKind);

/// Args for the `travel-spend breakdown` command.
#[derive(Debug, Parser, Clone)]
pub struct BreakdownArgs {
    /// What to group by.
    by: BreakdownKind,

    /// How many merchants to keep for the merchant breakdown. Defaults to the configured value.
    #[arg(long)]
    top: Option<usize>,

    #[command(flatten)]
    report: ReportArgs,
}

impl BreakdownArgs {
    pub fn new(by: BreakdownKind, top: Option<usize>, report: ReportArgs) -> Self {
        Self { by, top, report }
    }

    pub fn by(&self) -> BreakdownKind {
        self.by
    }

    pub fn top(&self) -> Option<usize> {
        self.top
    }

    pub fn report(&self) -> &ReportArgs {
        &self.report
    }
}

/// Args for the `travel-spend export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Where to write the CSV. Defaults to travel_log_filtered_<timestamp>.csv in the current
    /// directory.
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    report: ReportArgs,
}

impl ExportArgs {
    pub fn new(output: Option<PathBuf>, report: ReportArgs) -> Self {
        Self { output, report }
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn report(&self) -> &ReportArgs {
        &self.report
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("travel-spend"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or TRAVEL_SPEND_HOME instead of relying on the default \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("travel-spend")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
