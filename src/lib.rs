//! travel-spend turns a travel expense log kept in a spreadsheet into summaries, breakdowns and
//! chart specifications.
//!
//! The pipeline is `ingest` (raw records to a typed [`model::Table`]), [`Filter::apply`], and then
//! the aggregation and chart functions, all of which are pure. Fetching and caching live in
//! [`api`] and [`session`].
//!
//! ```
//! use travel_spend::{breakdown_by_category, ingest_rows, summary_metrics, Filter};
//!
//! let table = ingest_rows(vec![
//!     vec!["Date", "Cost", "Category"],
//!     vec!["2024-01-05", "$100.00", "Food"],
//!     vec!["2024-01-06", "20", "Flight"],
//! ]);
//! let food = Filter::default().categories(["Food"]).apply(&table);
//! assert_eq!(summary_metrics(&food).unwrap().total_transactions, 1);
//! assert_eq!(breakdown_by_category(&table).rows()[0].key, "Food");
//! ```

mod aggregate;
pub mod api;
pub mod args;
mod chart;
pub mod commands;
mod config;
mod dashboard;
mod error;
mod export;
mod filter;
mod ingest;
pub mod model;
pub mod session;
mod utils;

#[cfg(test)]
mod test;

pub use aggregate::{
    breakdown_by_category, breakdown_by_merchant, breakdown_by_month, breakdown_by_trip,
    summary_metrics, Breakdown, Group, SummaryMetrics, Totals, TripGroup, DEFAULT_TOP_MERCHANTS,
};
pub use api::Mode;
pub use chart::{
    category_pie, monthly_trend, trip_comparison, PieChart, PieSlice, Series, StackedBarChart,
    TrendChart,
};
pub use config::Config;
pub use dashboard::{Charts, Dashboard, FilterOptions};
pub use error::Error;
pub use error::Result;
pub use export::{default_file_name, to_csv};
pub use filter::Filter;
pub use ingest::{ingest, ingest_rows};
