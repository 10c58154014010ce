// hive-api: Async Rust client for the Hive smart-home cloud API

pub mod auth;
pub mod camera;
pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
mod home;
pub mod login_page;
mod nodes;
mod session;
pub mod transport;

pub use auth::{CallKind, Credentials, HiveSession, TokenSet};
pub use client::{ApiClient, ClientConfig, NodeQuery, Query, Verb};
pub use endpoints::{Platform, UrlTemplates};
pub use envelope::{ApiResponse, ERROR_MARKER};
pub use error::Error;
pub use login_page::{LoginInfo, LoginPageParser, ScriptGlobalsParser};
pub use transport::{TlsMode, TransportConfig};
