mod cli;
mod commands;
mod error;
mod mcp;
mod output;
#[cfg(test)]
mod test_support;

use std::process::ExitCode;

use clap::Parser;
use log::{debug, LevelFilter};
use stockfetch_core::{ProviderConfig, YahooAdapter};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logger();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = ProviderConfig::from_env()?;
    debug!("config | timeout_ms: {}", config.timeout_ms);

    let provider = YahooAdapter::from_config(&config)?;
    match &cli.command {
        Command::Fetch(query) => {
            let document = commands::run(query, &provider).await?;

            // Render fully before writing so a failure never leaves partial output.
            let rendered = output::render(&document)?;
            output::write_stdout(&rendered)
        }
        Command::Serve => mcp::serve_stdio(&provider).await,
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();
}
