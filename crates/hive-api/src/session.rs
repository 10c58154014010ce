// Login metadata and the legacy token refresh.
//
// Token lifetime is owned by the session; these calls only fetch what a
// login needs and, for older deployments, push a beekeeper refresh reply
// back into the session.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::{CallKind, TokenSet};
use crate::client::{ApiClient, Verb, decode_json};
use crate::envelope::ApiResponse;
use crate::error::Error;
use crate::login_page::LoginInfo;

impl ApiClient {
    /// Cognito pool parameters scraped from the SSO landing page.
    ///
    /// Unauthenticated. Returns `None` when the page can't be fetched or no
    /// longer has the expected shape; the cause is logged.
    pub async fn get_login_info(&self) -> Option<LoginInfo> {
        let result: Result<LoginInfo, Error> = async {
            let url = url::Url::parse(&self.url(&self.urls().properties, &[]))?;
            debug!("GET {url}");
            let resp = self
                .http()
                .get(url)
                .timeout(self.timeout())
                .send()
                .await?;
            let html = resp.text().await?;
            self.login_parser().parse(&html)
        }
        .await;

        match result {
            Ok(info) => {
                debug!(pool_id = %info.pool_id, region = %info.region, "login info fetched");
                Some(info)
            }
            Err(err) => {
                warn!(op = "get_login_info", "Hive API call failed: {err}");
                None
            }
        }
    }

    /// Exchange the current tokens at the beekeeper refresh endpoint.
    ///
    /// Session-backed clients send the session's tokens; otherwise `tokens`
    /// (or an empty object) is sent. When the reply carries a `token` and a
    /// session is attached, the session is updated once and the platform
    /// moves to the reply's `platform.endpoint` / `platform.cameraPlatform`.
    #[deprecated(note = "token lifetime is managed by the Cognito session")]
    pub async fn refresh_tokens(&self, tokens: Option<&TokenSet>) -> ApiResponse {
        let result: Result<(u16, Value), Error> = async {
            let tokens = match self.credentials().session() {
                Some(session) => session.tokens(),
                None => tokens.cloned().unwrap_or_default(),
            };
            let body = serde_json::to_string(&tokens)?;
            let url = self.url(&self.urls().refresh, &[]);
            let resp = self
                .request(Verb::Post, &url, Some(body), CallKind::Standard, &[])
                .await?;
            let (status, reply) = decode_json(resp).await?;

            if reply.get("token").is_some() {
                if let Some(session) = self.credentials().session() {
                    session.update_tokens(&reply);
                    info!("session tokens refreshed");
                    self.move_platform(&reply);
                }
            }
            Ok((status, reply))
        }
        .await;
        self.settle("refresh_tokens", result)
    }

    fn move_platform(&self, reply: &Value) {
        let field = |pointer: &str| reply.pointer(pointer).and_then(Value::as_str);
        match (field("/platform/endpoint"), field("/platform/cameraPlatform")) {
            (Some(base_url), Some(camera_base_url)) => {
                self.set_platform(base_url.to_owned(), camera_base_url.to_owned());
            }
            _ => debug!("refresh reply has no platform block, keeping endpoints"),
        }
    }
}
