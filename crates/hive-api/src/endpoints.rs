// Endpoint URL templates.
//
// Templates use named `{placeholder}` slots. `{baseUrl}` and
// `{cameraBaseUrl}` come from the client's current platform; the rest are
// supplied per call. Templates starting with `/` are relative to `baseUrl`.

use serde::{Deserialize, Serialize};

/// Beekeeper platform root used until a refresh reply moves it.
pub const DEFAULT_BASE_URL: &str = "https://beekeeper.hivehome.com/1.0";

/// Camera platform host suffix used until a refresh reply moves it.
pub const DEFAULT_CAMERA_BASE_URL: &str = "prod.hcam.bgchtest.info";

/// Logical endpoint name to URL template.
///
/// The defaults are the live Hive endpoints; configuration may override
/// individual entries (test rigs, regional mirrors).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlTemplates {
    pub properties: String,
    pub login: String,
    pub refresh: String,
    pub long_lived: String,
    pub weather: String,
    pub holiday_mode: String,
    pub all: String,
    pub alarm: String,
    #[serde(rename = "cameraImages")]
    pub camera_images: String,
    #[serde(rename = "cameraRecordings")]
    pub camera_recordings: String,
    pub devices: String,
    pub products: String,
    pub actions: String,
    pub nodes: String,
}

impl Default for UrlTemplates {
    fn default() -> Self {
        Self {
            properties: "https://sso.hivehome.com/".into(),
            login: "https://beekeeper.hivehome.com/1.0/cognito/login".into(),
            refresh: "https://beekeeper.hivehome.com/1.0/cognito/refresh-token".into(),
            long_lived: "https://api.prod.bgchprod.info/omnia/accessTokens".into(),
            weather: "https://weather.prod.bgchprod.info/weather".into(),
            holiday_mode: "/holiday-mode".into(),
            all: "{baseUrl}/nodes/all".into(),
            alarm: "{baseUrl}/security-lite".into(),
            camera_images: "https://event-history-service.{cameraBaseUrl}/v1/events/cameras?latest=true&cameraId={deviceId}".into(),
            camera_recordings: "https://event-history-service.{cameraBaseUrl}/v1/playlist/cameras/{deviceId}/events/{eventId}.m3u8".into(),
            devices: "{baseUrl}/devices".into(),
            products: "{baseUrl}/products".into(),
            actions: "{baseUrl}/actions".into(),
            nodes: "/nodes/{type}/{id}".into(),
        }
    }
}

/// The mutable half of URL resolution: where the platform currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub base_url: String,
    pub camera_base_url: String,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            camera_base_url: DEFAULT_CAMERA_BASE_URL.into(),
        }
    }
}

impl Platform {
    /// Fill a template: platform slots first, then the per-call `args`.
    /// Relative templates are prefixed with `base_url`.
    pub fn resolve(&self, template: &str, args: &[(&str, &str)]) -> String {
        let mut url = render(
            template,
            &[
                ("baseUrl", self.base_url.as_str()),
                ("cameraBaseUrl", self.camera_base_url.as_str()),
            ],
        );
        url = render(&url, args);
        if url.starts_with('/') {
            url = format!("{}{url}", self.base_url.trim_end_matches('/'));
        }
        url
    }
}

/// Replace each `{name}` in `template` with its value. Unknown slots are
/// left in place.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_owned(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}
