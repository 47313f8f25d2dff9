//! `sprout` -- command-line client for the microgreen tracking API.
//!
//! Configuration comes from the environment (see
//! [`ClientConfig::from_env`]); `.env` is loaded first. Logs go to
//! stderr, command output to stdout.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use sprout_client::{ClientConfig, ClientContext};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sprout_client=warn,sprout_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = ClientConfig::for_api_url(url).api_url;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    tracing::debug!(api_url = %config.api_url, data_dir = %config.data_dir.display(), "Starting");

    let ctx = ClientContext::open(config).await?;
    commands::dispatch(&ctx, cli.command).await
}
