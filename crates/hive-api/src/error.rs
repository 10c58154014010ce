use thiserror::Error;

/// Top-level error type for the `hive-api` crate.
///
/// Operations never hand these to callers directly: every public call
/// collapses them into [`ApiResponse::Failed`](crate::ApiResponse::Failed)
/// after logging. They exist so the internal plumbing can use `?` and so
/// the log line says what actually went wrong.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A rendered endpoint template did not parse as a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Authentication ──────────────────────────────────────────────
    /// A token could not be turned into a header value (control characters etc.)
    #[error("Invalid value for header {name}: {message}")]
    InvalidHeader { name: &'static str, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Body decoding failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// An expected field was absent from a caller argument or a reply.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// The SSO metadata page no longer has the shape the scraper expects.
    #[error("Login page scrape failed: {0}")]
    LoginPage(String),

    /// Camera playlist reply was shorter than the segment line.
    #[error("Playlist has no segment line ({lines} lines)")]
    Playlist { lines: usize },

    /// Request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
