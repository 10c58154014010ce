mod cli;
mod commands;
mod error;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use hive_api::ApiClient;

use crate::cli::{Cli, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Logs go to stderr; stdout carries only the JSON envelope.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = build_client(&cli.global)?;

    tracing::debug!(command = ?cli.command, "dispatching command");
    commands::dispatch(cli.command, &client).await
}

/// Build the client from the config file, environment, and CLI overrides.
fn build_client(global: &GlobalOpts) -> Result<ApiClient, CliError> {
    let mut cfg = hive_config::load_config()?;

    if let Some(ref home_id) = global.home_id {
        cfg.home_id = Some(home_id.clone());
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.insecure {
        cfg.insecure = true;
    }

    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .or_else(|| hive_config::resolve_token(&cfg));
    if token.is_none() {
        tracing::debug!("no token configured; authenticated calls will be rejected");
    }

    let client_config = hive_config::to_client_config(&cfg, token)?;
    Ok(ApiClient::new(client_config)?)
}
