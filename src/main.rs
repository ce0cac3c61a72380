use clap::Parser;
use std::process::ExitCode;
use travel_spend::args::{Args, Command};
use travel_spend::{commands, Config, Mode, Result};
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for running the program without a real travel log. When
    // TRAVEL_SPEND_IN_TEST_MODE is set and non-empty, then the mode will be Mode::Test,
    // otherwise it will be Mode::File.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.source(), init_args.worksheet())
                .await?
                .print()
        }

        Command::Refresh => commands::refresh(Config::load(home).await?, mode)
            .await?
            .print(),

        Command::Summary(report_args) => {
            commands::summary(Config::load(home).await?, mode, report_args.clone())
                .await?
                .print()
        }

        Command::Breakdown(breakdown_args) => {
            commands::breakdown(Config::load(home).await?, mode, breakdown_args.clone())
                .await?
                .print()
        }

        Command::Charts(report_args) => {
            commands::charts(Config::load(home).await?, mode, report_args.clone())
                .await?
                .print()
        }

        Command::Dashboard(report_args) => {
            commands::dashboard(Config::load(home).await?, mode, report_args.clone())
                .await?
                .print()
        }

        Command::Options(load_args) => {
            commands::options(Config::load(home).await?, mode, load_args.clone())
                .await?
                .print()
        }

        Command::Export(export_args) => {
            commands::export(Config::load(home).await?, mode, export_args.clone())
                .await?
                .print()
        }
    }
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only. The library
            // and the binary share the same crate name.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
