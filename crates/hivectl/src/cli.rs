//! Clap derive structures for the `hivectl` CLI.

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hivectl -- talk to the Hive smart-home cloud API
#[derive(Debug, Parser)]
#[command(
    name = "hivectl",
    version,
    about = "Query and control Hive smart-home devices from the command line",
    long_about = "Calls the Hive cloud API and prints each reply as a JSON envelope\n\
        ({\"original\": ..., \"parsed\": ...}). Failed calls exit with status 1.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Home to scope queries to (overrides config)
    #[arg(long, global = true)]
    pub home_id: Option<String>,

    /// Raw API token (overrides env, keyring and config)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape the SSO page for Cognito login parameters
    LoginInfo,

    /// Every node (homes, devices, products, actions) in one call
    All,

    /// Homes visible to this account
    Homes,

    /// Devices in the current home
    #[command(alias = "dev")]
    Devices,

    /// Products in the current home
    Products,

    /// Actions in the current home
    Actions,

    /// Security-lite alarm state
    Alarm {
        /// Home to query when neither config nor session supplies one
        home_id: Option<String>,
    },

    /// Latest event image for a camera
    CameraImage {
        /// Camera hardware identifier
        hardware_id: String,
    },

    /// Recording URL for one camera event
    CameraRecording {
        /// Camera hardware identifier
        hardware_id: String,
        /// Event id
        event_id: String,
    },

    /// Weather for a postcode or town
    Weather {
        /// Location appended to the weather URL, e.g. "?postcode=SW1A 1AA"
        suffix: String,
    },

    /// Motion events for a sensor
    Motion {
        /// Product type, e.g. "motionsensor"
        #[arg(value_name = "TYPE")]
        node_type: String,
        /// Product id
        id: String,
        /// Window start (epoch milliseconds)
        #[arg(long)]
        from: i64,
        /// Window end (epoch milliseconds)
        #[arg(long)]
        to: i64,
    },

    /// Change node state, e.g. `set-state heating <id> target=21 mode=MANUAL`
    SetState {
        /// Node type
        #[arg(value_name = "TYPE")]
        node_type: String,
        /// Node id
        id: String,
        /// Fields to set
        #[arg(value_name = "KEY=VALUE", required = true, value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Trigger or update an action with a raw JSON payload
    SetAction {
        /// Action id
        id: String,
        /// JSON payload, sent as-is
        payload: String,
    },

    /// Exchange a refresh token for new tokens
    Refresh {
        /// Refresh token to send alongside the access token
        #[arg(long)]
        refresh_token: Option<String>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
