//! The read-only reporting commands. Each loads the travel log, applies the filter from its
//! arguments and prints one view of the result.

use crate::aggregate::{
    breakdown_by_category, breakdown_by_merchant, breakdown_by_month, breakdown_by_trip,
    summary_metrics, Breakdown, Group, SummaryMetrics, TripGroup,
};
use crate::api::Mode;
use crate::args::{BreakdownArgs, BreakdownKind, LoadArgs, ReportArgs};
use crate::commands::{load, Out};
use crate::dashboard::{Charts, Dashboard, FilterOptions};
use crate::model::{Table, YearMonth};
use crate::{Config, Result};
use serde::Serialize;
use tracing::debug;

/// The rows of whichever breakdown was asked for.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BreakdownOut {
    Labels(Breakdown<Group<String>>),
    Trips(Breakdown<TripGroup>),
    Months(Breakdown<Group<YearMonth>>),
}

impl BreakdownOut {
    pub fn len(&self) -> usize {
        match self {
            BreakdownOut::Labels(b) => b.len(),
            BreakdownOut::Trips(b) => b.len(),
            BreakdownOut::Months(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Prints the headline metrics. The structure is `None` when nothing matches the filter.
pub async fn summary(
    config: Config,
    mode: Mode,
    args: ReportArgs,
) -> Result<Out<Option<SummaryMetrics>>> {
    let table = filtered(&config, mode, &args).await?;
    let metrics = summary_metrics(&table);
    let message = match &metrics {
        Some(m) => format!(
            "{} transactions, {} in cash and {} in points",
            m.total_transactions, m.total_cost, m.total_point_value
        ),
        None => no_data_message(),
    };
    Ok(Out::new(message, metrics))
}

/// Prints one breakdown. `--top` overrides the configured merchant count.
pub async fn breakdown(
    config: Config,
    mode: Mode,
    args: BreakdownArgs,
) -> Result<Out<BreakdownOut>> {
    let table = filtered(&config, mode, args.report()).await?;
    let out = match args.by() {
        BreakdownKind::Category => BreakdownOut::Labels(breakdown_by_category(&table)),
        BreakdownKind::Trip => BreakdownOut::Trips(breakdown_by_trip(&table)),
        BreakdownKind::Month => BreakdownOut::Months(breakdown_by_month(&table)),
        BreakdownKind::Merchant => {
            let top = args.top().unwrap_or(config.top_merchants());
            BreakdownOut::Labels(breakdown_by_merchant(&table, top))
        }
    };
    let message = if out.is_empty() {
        no_data_message()
    } else {
        format!("Breakdown by {} has {} rows", args.by(), out.len())
    };
    Ok(Out::new(message, out))
}

/// Prints the chart specifications. Charts with nothing to show are `null`.
pub async fn charts(config: Config, mode: Mode, args: ReportArgs) -> Result<Out<Charts>> {
    let table = filtered(&config, mode, &args).await?;
    let charts = Dashboard::build(&table, config.top_merchants()).charts;
    let message = if table.is_empty() {
        no_data_message()
    } else {
        "Built chart specifications".to_string()
    };
    Ok(Out::new(message, charts))
}

/// Prints metrics, breakdowns and charts computed from the same filtered table.
pub async fn dashboard(config: Config, mode: Mode, args: ReportArgs) -> Result<Out<Dashboard>> {
    let table = filtered(&config, mode, &args).await?;
    let dashboard = Dashboard::build(&table, config.top_merchants());
    let message = if table.is_empty() {
        no_data_message()
    } else {
        format!("Dashboard built from {} transactions", table.len())
    };
    Ok(Out::new(message, dashboard))
}

/// Prints the filter choices available in the unfiltered travel log.
pub async fn options(config: Config, mode: Mode, args: LoadArgs) -> Result<Out<FilterOptions>> {
    let loaded = load(&config, mode, &args).await?;
    let options = FilterOptions::discover(&loaded.table);
    Ok(Out::new(
        format!(
            "{} categories and {} trips available",
            options.categories.len(),
            options.trips.len()
        ),
        options,
    ))
}

pub(super) async fn filtered(config: &Config, mode: Mode, args: &ReportArgs) -> Result<Table> {
    let loaded = load(config, mode, args.load()).await?;
    let filter = args.filter();
    let table = filter.apply(&loaded.table);
    debug!(
        "Filter kept {} of {} transactions",
        table.len(),
        loaded.table.len()
    );
    Ok(table)
}

fn no_data_message() -> String {
    "No data available for the selected filters".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::FilterArgs;
    use crate::model::Amount;
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn dollars(n: i64) -> Amount {
        Amount::new(Decimal::from(n))
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[tokio::test]
    async fn test_summary() {
        let env = TestEnv::new().await;
        let out = summary(env.config(), Mode::File, ReportArgs::default())
            .await
            .unwrap();
        let m = out.structure().unwrap().as_ref().unwrap();
        assert_eq!(m.total_cost, dollars(475));
        assert_eq!(m.total_point_spend, Decimal::from(1000));
        assert_eq!(m.total_point_value, dollars(20));
        assert_eq!(m.total_transactions, 5);
        assert_eq!(m.unique_trips, 2);
        assert_eq!(m.unique_categories, 3);
        assert_eq!(m.avg_transaction, dollars(95));
        assert_eq!(m.total_value, dollars(495));
    }

    #[tokio::test]
    async fn test_summary_nothing_matches() {
        let env = TestEnv::new().await;
        let filter = FilterArgs::new(None, None, vec!["Spa".to_string()], Vec::new());
        let out = summary(
            env.config(),
            Mode::File,
            ReportArgs::new(LoadArgs::default(), filter),
        )
        .await
        .unwrap();
        assert!(out.structure().unwrap().is_none());
        assert_eq!(out.message(), no_data_message());
    }

    #[tokio::test]
    async fn test_breakdown_by_category() {
        let env = TestEnv::new().await;
        let args = BreakdownArgs::new(BreakdownKind::Category, None, ReportArgs::default());
        let out = breakdown(env.config(), Mode::File, args).await.unwrap();
        let BreakdownOut::Labels(b) = out.structure().unwrap() else {
            panic!("expected labels");
        };
        let keys: Vec<_> = b.rows().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Lodging", "Food", "Flight"]);
        assert_eq!(b.rows()[1].totals.transactions, 3);
    }

    #[tokio::test]
    async fn test_breakdown_by_merchant_with_top() {
        let env = TestEnv::new().await;
        let args = BreakdownArgs::new(BreakdownKind::Merchant, Some(2), ReportArgs::default());
        let out = breakdown(env.config(), Mode::File, args).await.unwrap();
        let BreakdownOut::Labels(b) = out.structure().unwrap() else {
            panic!("expected labels");
        };
        let keys: Vec<_> = b.rows().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Hotel", "Bistro"]);
    }

    #[tokio::test]
    async fn test_breakdown_by_month_filtered_by_date() {
        let env = TestEnv::new().await;
        let filter = FilterArgs::new(date(2024, 1, 5), date(2024, 2, 10), Vec::new(), Vec::new());
        let args = BreakdownArgs::new(
            BreakdownKind::Month,
            None,
            ReportArgs::new(LoadArgs::default(), filter),
        );
        let out = breakdown(env.config(), Mode::File, args).await.unwrap();
        let BreakdownOut::Months(b) = out.structure().unwrap() else {
            panic!("expected months");
        };
        let keys: Vec<_> = b.rows().iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02"]);
        assert_eq!(b.rows()[0].total_value, dollars(150));
        assert_eq!(b.rows()[1].total_value, dollars(300));
    }

    #[tokio::test]
    async fn test_breakdown_by_trip() {
        let env = TestEnv::new().await;
        let args = BreakdownArgs::new(BreakdownKind::Trip, None, ReportArgs::default());
        let out = breakdown(env.config(), Mode::File, args).await.unwrap();
        let BreakdownOut::Trips(b) = out.structure().unwrap() else {
            panic!("expected trips");
        };
        let paris = &b.rows()[1];
        assert_eq!(paris.group.key, "Paris");
        assert_eq!(paris.start_date, date(2024, 1, 4));
        assert_eq!(paris.end_date, date(2024, 1, 6));
        assert_eq!(paris.duration_days, Some(3));
    }

    #[tokio::test]
    async fn test_charts_and_dashboard() {
        let env = TestEnv::new().await;
        let out = charts(env.config(), Mode::File, ReportArgs::default())
            .await
            .unwrap();
        let charts = out.structure().unwrap();
        assert_eq!(charts.category_pie.as_ref().unwrap().slices.len(), 3);
        assert_eq!(charts.monthly_trend.as_ref().unwrap().x.len(), 2);

        let filter = FilterArgs::new(None, None, Vec::new(), vec!["Tokyo".to_string()]);
        let out = dashboard(
            env.config(),
            Mode::File,
            ReportArgs::new(LoadArgs::default(), filter),
        )
        .await
        .unwrap();
        let d = out.structure().unwrap();
        assert_eq!(d.metrics.as_ref().unwrap().total_transactions, 2);
        assert_eq!(d.by_trip.len(), 1);
    }

    #[tokio::test]
    async fn test_options_ignore_filters() {
        let env = TestEnv::new().await;
        let out = options(env.config(), Mode::File, LoadArgs::default())
            .await
            .unwrap();
        let o = out.structure().unwrap();
        assert_eq!(o.categories, vec!["Food", "Flight", "Lodging"]);
        assert_eq!(o.trips, vec!["Paris", "Tokyo"]);
        assert_eq!(
            o.date_range,
            Some((date(2024, 1, 4).unwrap(), date(2024, 2, 11).unwrap()))
        );
    }

    #[tokio::test]
    async fn test_test_mode_uses_seed() {
        let env = TestEnv::new().await;
        let out = summary(env.config(), Mode::Test, ReportArgs::default())
            .await
            .unwrap();
        assert_eq!(
            out.structure().unwrap().as_ref().unwrap().total_transactions,
            14
        );
    }
}
