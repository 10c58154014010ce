use std::fmt;
use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Header carrying the raw JWT on camera-service calls.
pub const JWT_HEADER: &str = "x-jwt-token";

/// Which header shape a request needs.
///
/// Marker enum (no data) -- the actual token lives in [`Credentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Beekeeper platform calls: plain `authorization: <token>`.
    Standard,
    /// Event-history (camera) service: `Authorization: Bearer <token>`
    /// plus `x-jwt-token: <token>`.
    Camera,
}

/// Token material as the refresh endpoint and the session exchange it.
///
/// Field names are the wire names; absent fields are left out of the body.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("TokenSet")
            .field("token", &redact(&self.token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("access_token", &redact(&self.access_token))
            .finish()
    }
}

/// An externally-owned login session.
///
/// The owner handles login and token lifetime; the client only reads the
/// current token and home, and pushes refreshed tokens back.
pub trait HiveSession: Send + Sync {
    /// Current token material.
    fn tokens(&self) -> TokenSet;

    /// Home configured on the session, if any.
    fn home_id(&self) -> Option<String>;

    /// Accept the decoded body of a successful refresh reply.
    fn update_tokens(&self, reply: &serde_json::Value);
}

/// Where auth headers come from.
///
/// Each variant produces its own current token; the header shape is then
/// chosen by [`CallKind`].
#[derive(Clone)]
pub enum Credentials {
    /// Token read from the attached session on every call.
    Session(Arc<dyn HiveSession>),

    /// A raw token with no session behind it.
    Token(SecretString),

    /// No credentials. Requests go out without authorization headers and
    /// the platform rejects them; only the SSO metadata page works.
    Anonymous,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(_) => f.write_str("Credentials::Session(..)"),
            Self::Token(_) => f.write_str("Credentials::Token([REDACTED])"),
            Self::Anonymous => f.write_str("Credentials::Anonymous"),
        }
    }
}

impl Credentials {
    /// The attached session, if this is session-backed.
    pub fn session(&self) -> Option<&Arc<dyn HiveSession>> {
        match self {
            Self::Session(session) => Some(session),
            Self::Token(_) | Self::Anonymous => None,
        }
    }

    /// The token to present right now.
    fn current_token(&self) -> Option<String> {
        match self {
            Self::Session(session) => session.tokens().token,
            Self::Token(token) => Some(token.expose_secret().to_owned()),
            Self::Anonymous => None,
        }
    }

    /// Build the header set for one request.
    ///
    /// Every request carries `content-type: application/json` and
    /// `Accept: */*`. Standard calls add `authorization: <token>`; camera
    /// calls add `Authorization: Bearer <token>` and `x-jwt-token: <token>`.
    pub fn headers(&self, kind: CallKind) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let Some(token) = self.current_token() else {
            return Ok(headers);
        };

        match kind {
            CallKind::Standard => {
                headers.insert(AUTHORIZATION, sensitive("authorization", &token)?);
            }
            CallKind::Camera => {
                headers.insert(
                    AUTHORIZATION,
                    sensitive("Authorization", &format!("Bearer {token}"))?,
                );
                headers.insert(
                    HeaderName::from_static(JWT_HEADER),
                    sensitive(JWT_HEADER, &token)?,
                );
            }
        }
        Ok(headers)
    }
}

fn sensitive(name: &'static str, value: &str) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader {
        name,
        message: e.to_string(),
    })?;
    value.set_sensitive(true);
    Ok(value)
}
