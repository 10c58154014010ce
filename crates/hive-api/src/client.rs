// Hive API HTTP client
//
// Wraps `reqwest::Client` with Hive-specific URL templating, per-call auth
// header selection, and the uniform `ApiResponse` result. Endpoint groups
// (nodes, camera, home, session) are inherent methods in separate files to
// keep this module focused on transport mechanics.

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::{CallKind, Credentials};
use crate::endpoints::{Platform, UrlTemplates};
use crate::envelope::ApiResponse;
use crate::error::Error;
use crate::login_page::{LoginPageParser, ScriptGlobalsParser};
use crate::transport::TransportConfig;

/// Query pairs appended to a request URL.
pub type Query = Vec<(&'static str, String)>;

/// The two HTTP methods the platform is driven with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// Inclusion flags for the node listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeQuery {
    pub products: bool,
    pub devices: bool,
    pub actions: bool,
    #[serde(rename = "homeId", skip_serializing_if = "Option::is_none")]
    pub home_id: Option<String>,
}

impl NodeQuery {
    /// Render as query pairs; `homeId` only when a home is set.
    pub fn to_pairs(&self) -> Query {
        let mut pairs = vec![
            ("products", self.products.to_string()),
            ("devices", self.devices.to_string()),
            ("actions", self.actions.to_string()),
        ];
        if let Some(ref home) = self.home_id {
            pairs.push(("homeId", home.clone()));
        }
        pairs
    }
}

/// Everything needed to build an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub transport: TransportConfig,
    pub urls: UrlTemplates,
    pub platform: Platform,
    /// Home to scope queries to. Falls back to the session's home.
    pub home_id: Option<String>,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            transport: TransportConfig::default(),
            urls: UrlTemplates::default(),
            platform: Platform::default(),
            home_id: None,
        }
    }
}

#[derive(Debug)]
struct State {
    platform: Platform,
    home_id: Option<String>,
}

/// Client for the Hive cloud API.
///
/// Every operation performs one request and returns a fresh
/// [`ApiResponse`]; failures never escape as errors. The platform location
/// and home id are the only mutable state and sit behind a lock, so a
/// shared `&ApiClient` is safe to use from several tasks.
pub struct ApiClient {
    http: reqwest::Client,
    timeout: Duration,
    credentials: Credentials,
    urls: UrlTemplates,
    state: RwLock<State>,
    login_parser: Box<dyn LoginPageParser>,
}

impl ApiClient {
    /// Build a client and its HTTP transport from `config`.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        Ok(Self::with_client(http, config))
    }

    /// Build a client around an existing `reqwest::Client`.
    ///
    /// The configured timeout is still applied per request.
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        let home_id = config.home_id.or_else(|| {
            config
                .credentials
                .session()
                .and_then(|session| session.home_id())
        });
        Self {
            http,
            timeout: config.transport.timeout,
            credentials: config.credentials,
            urls: config.urls,
            state: RwLock::new(State {
                platform: config.platform,
                home_id,
            }),
            login_parser: Box::new(ScriptGlobalsParser),
        }
    }

    /// Replace the SSO page scraper.
    pub fn with_login_parser(mut self, parser: impl LoginPageParser + 'static) -> Self {
        self.login_parser = Box::new(parser);
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn urls(&self) -> &UrlTemplates {
        &self.urls
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn login_parser(&self) -> &dyn LoginPageParser {
        self.login_parser.as_ref()
    }

    // ── State ────────────────────────────────────────────────────────

    fn state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current platform location (moves after a token refresh).
    pub fn platform(&self) -> Platform {
        self.state().platform.clone()
    }

    pub(crate) fn set_platform(&self, base_url: String, camera_base_url: String) {
        debug!(%base_url, %camera_base_url, "platform endpoints updated");
        self.state_mut().platform = Platform {
            base_url,
            camera_base_url,
        };
    }

    /// The home queries are scoped to, if any.
    pub fn home_id(&self) -> Option<String> {
        self.state().home_id.clone()
    }

    /// Scope subsequent queries to `home_id`.
    pub fn set_home(&self, home_id: impl Into<String>) {
        let home_id = home_id.into();
        debug!(%home_id, "home set");
        self.state_mut().home_id = Some(home_id);
    }

    // ── URL & parameter builders ─────────────────────────────────────

    /// Render a template against the current platform.
    pub fn url(&self, template: &str, args: &[(&str, &str)]) -> String {
        self.state().platform.resolve(template, args)
    }

    /// Inclusion flags plus `homeId` iff a home is set.
    pub fn params(&self, products: bool, devices: bool, actions: bool) -> NodeQuery {
        NodeQuery {
            products,
            devices,
            actions,
            home_id: self.home_id(),
        }
    }

    /// `homeId` alone, or nothing.
    pub fn home_id_param(&self) -> Query {
        self.home_id()
            .map(|home| vec![("homeId", home)])
            .unwrap_or_default()
    }

    // ── Request primitive ────────────────────────────────────────────

    /// Send one request with the header shape for `kind`.
    ///
    /// The response is returned as-is; status handling is up to the caller.
    pub async fn request(
        &self,
        verb: Verb,
        url: &str,
        body: Option<String>,
        kind: CallKind,
        params: &[(&'static str, String)],
    ) -> Result<reqwest::Response, Error> {
        let url = Url::parse(url)?;
        let headers = self.credentials.headers(kind)?;
        debug!("{verb} {url}");
        trace!(?params, has_body = body.is_some(), ?kind, "request details");

        let mut builder = match verb {
            Verb::Get => self.http.get(url),
            Verb::Post => self.http.post(url),
        }
        .headers(headers)
        .timeout(self.timeout);

        if !params.is_empty() {
            builder = builder.query(params);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        Ok(builder.send().await?)
    }

    /// Send and decode the body as JSON.
    pub(crate) async fn fetch_json(
        &self,
        verb: Verb,
        url: &str,
        body: Option<String>,
        kind: CallKind,
        params: &[(&'static str, String)],
    ) -> Result<(u16, Value), Error> {
        let resp = self.request(verb, url, body, kind, params).await?;
        decode_json(resp).await
    }

    // ── Result funnel ────────────────────────────────────────────────

    /// The single failure value every operation collapses into.
    #[allow(clippy::unused_self)]
    pub fn error(&self) -> ApiResponse {
        ApiResponse::Failed
    }

    pub(crate) fn settle(&self, op: &'static str, result: Result<(u16, Value), Error>) -> ApiResponse {
        match result {
            Ok((status, parsed)) => {
                debug!(op, status, "Hive API call complete");
                ApiResponse::Ok { status, parsed }
            }
            Err(err) => {
                warn!(op, transient = err.is_transient(), "Hive API call failed: {err}");
                self.error()
            }
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Decode a response body as JSON, keeping the status.
pub(crate) async fn decode_json(resp: reqwest::Response) -> Result<(u16, Value), Error> {
    let status = resp.status().as_u16();
    let body = resp.text().await?;
    let parsed = serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })?;
    Ok((status, parsed))
}

/// Pull `key` out of a decoded object.
pub(crate) fn take_field(mut value: Value, key: &str) -> Result<Value, Error> {
    value
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| Error::MissingField(key.into()))
}
