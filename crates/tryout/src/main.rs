//! Tryout: terminal client for timed audio auditions.

mod app;
mod app_command;
mod audition;
mod backend;
mod cli;
mod config;
mod dashboard;
mod error;
mod input_reader;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    backend::BackendClient,
    error::{AppError, Result as AppResult},
    input_reader::InputReader,
};

use crate::{
    cli::{Cli, Command},
    config::Config,
};

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Application entry point.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tryout=info,tryout_core=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let client = BackendClient::new(&config.backend);

    let result = match cli.command {
        Command::Opportunities => dashboard::list_opportunities(&client).await,
        Command::Submissions => dashboard::list_submissions(&client, &config).await,
        Command::Demo => audition::run_demo(&client, &config).await,
        Command::Audition { opportunity_id } => {
            audition::run_audition(&client, &config, &opportunity_id).await
        }
    };

    if let Err(e) = result {
        error!(error = ?e, "Command failed");
        std::process::exit(1);
    }
}
