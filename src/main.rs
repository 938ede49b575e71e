use std::process::ExitCode;

use dotenv_flow::dotenv_flow;
use ed25519_2020_suite::{config::SuiteConfig, exit_status, EXIT_HARNESS_ERROR};
use eyre::{Result, WrapErr};
use interop_report::{write_report, Summary};
use tracing::{error, info, Level};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Load dotenv-flow variables
    dotenv_flow().ok();

    let config = match SuiteConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(EXIT_HARNESS_ERROR);
        }
    };

    // Enable logging
    config_tracing(config.log_level);

    let result = conformance(&config).await;
    if let Err(e) = &result {
        error!("{e:?}");
    }

    ExitCode::from(exit_status(&result, config.fail_on_nonconformance))
}

/// Runs the suites and writes the report.
async fn conformance(config: &SuiteConfig) -> Result<Summary> {
    let report = ed25519_2020_suite::run(config).await?;

    write_report(&config.report_dir, &report)
        .wrap_err_with(|| format!("failed to write report to {}", config.report_dir.display()))?;

    let summary = report.summary();
    info!(
        "{} passed, {} failed, {} skipped",
        summary.passed, summary.failed, summary.skipped
    );
    Ok(summary)
}

fn config_tracing(level: Level) {
    let tracing_layer = tracing_subscriber::fmt::layer();
    let filter = filter::Targets::new()
        .with_target("hyper", Level::INFO)
        .with_target("reqwest", Level::INFO)
        .with_default(level);

    tracing_subscriber::registry()
        .with(tracing_layer)
        .with(filter)
        .init();
}
