// Home-scoped endpoints: security alarm and local weather.

use tracing::debug;

use crate::auth::CallKind;
use crate::client::{ApiClient, Query, Verb};
use crate::envelope::ApiResponse;

impl ApiClient {
    /// Alarm state for a home.
    ///
    /// `GET {baseUrl}/security-lite?homeId=..`
    ///
    /// The home comes from the client (set explicitly or seeded from the
    /// session), then the session, then `home_id`. With none of those the
    /// call goes out unscoped. The query key is `homeId` whichever source
    /// supplies the home, never `homeID`.
    pub async fn get_alarm(&self, home_id: Option<&str>) -> ApiResponse {
        let url = self.url(&self.urls().alarm, &[]);
        let params: Query = self
            .home_id()
            .or_else(|| {
                self.credentials()
                    .session()
                    .and_then(|session| session.home_id())
            })
            .or_else(|| home_id.map(str::to_owned))
            .map(|home| vec![("homeId", home)])
            .unwrap_or_default();
        debug!(?params, "fetching alarm");
        let result = self
            .fetch_json(Verb::Get, &url, None, CallKind::Standard, &params)
            .await;
        self.settle("get_alarm", result)
    }

    /// Local weather. `suffix` is appended to the weather endpoint as-is
    /// (typically `?postcode=..&country=..`), with spaces escaped.
    pub async fn get_weather(&self, suffix: &str) -> ApiResponse {
        let url = weather_url(&self.url(&self.urls().weather, &[]), suffix);
        debug!(%url, "fetching weather");
        let result = self
            .fetch_json(Verb::Get, &url, None, CallKind::Standard, &[])
            .await;
        self.settle("get_weather", result)
    }
}

fn weather_url(base: &str, suffix: &str) -> String {
    format!("{base}{suffix}").replace(' ', "%20")
}
