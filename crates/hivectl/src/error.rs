//! CLI error types with miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use hive_config::ConfigError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("{operation} failed")]
    #[diagnostic(
        code(hive::request_failed),
        help("Re-run with -vv to see the request and the reason it failed.")
    )]
    RequestFailed { operation: &'static str },

    #[error("Could not build the HTTP client")]
    #[diagnostic(
        code(hive::client),
        help("Check ca_cert in your config, or use --insecure (-k).")
    )]
    Client(#[from] hive_api::Error),

    #[error("{source}")]
    #[diagnostic(
        code(hive::config),
        help("Config is read from {path} and HIVE_* environment variables.")
    )]
    Config {
        #[source]
        source: ConfigError,
        path: String,
    },

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(hive::json), help("The action payload must be a JSON document."))]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for CliError {
    fn from(source: ConfigError) -> Self {
        Self::Config {
            source,
            path: hive_config::config_path().display().to_string(),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RequestFailed { .. } | Self::Client(_) => exit_code::GENERAL,
            Self::Json(_) => exit_code::USAGE,
            Self::Config { .. } => exit_code::CONFIG,
        }
    }
}
