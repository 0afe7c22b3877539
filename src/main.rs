//! Main entry point for the ziproute CLI app

use std::process::ExitCode;

use tokio::runtime::Builder;
use tracing_subscriber::EnvFilter;

use ziproute::runner::RunSummary;
use ziproute::{cli, runner};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run_app() {
        Ok(summary) if summary.ok() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            if e.downcast_ref::<clap::Error>().is_none() {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run_app() -> Result<RunSummary, Box<dyn std::error::Error>> {
    let command = cli::run()?;
    let jobs = cli::jobs(&command)?;

    let rt = Builder::new_multi_thread().enable_all().build()?;
    Ok(rt.block_on(runner::run(jobs)))
}
