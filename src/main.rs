use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use nfip_fetch::{cli::Cli, info_time, Fetcher, HttpIssuer, JsonFileSink, RegionCode, Result};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let start_time = Local::now();
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let all_ok = run(&cli).await?;
    info_time!(start_time, "Full program time:");

    if all_ok {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Downloads every region in turn. Returns `false` if any of them failed or
/// came back incomplete.
async fn run(cli: &Cli) -> Result<bool> {
    let dataset = cli.dataset_kind()?;
    let regions = cli.region_values()?;
    let config = cli.fetch_config();
    let issuer = HttpIssuer::new(&config.user_agent, config.timeout)?;
    let sink = JsonFileSink::new(&cli.output_dir);
    let fetcher = Fetcher::new(issuer, sink, config);

    let mut all_ok = true;
    for value in &regions {
        let region = match RegionCode::try_from(value) {
            Ok(region) => region,
            Err(e) => {
                error!("{e}");
                all_ok = false;
                continue;
            }
        };
        match fetcher.download(dataset, &region).await {
            Ok(report) if report.is_complete() => {}
            Ok(report) => {
                warn!(
                    "{} may be missing rows: stopped with {:?}",
                    report.path.display(),
                    report.stop
                );
                all_ok = false;
            }
            Err(e) => {
                error!("County {region}: {e}");
                all_ok = false;
            }
        }
    }

    Ok(all_ok)
}
