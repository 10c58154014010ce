// SSO metadata scraping.
//
// The SSO landing page publishes the Cognito pool settings as global
// assignments in its first inline script:
//
//     window.HiveSSOEnv="production",window.HiveSSOPoolId="eu-west-1_abc",...
//
// There is no JSON endpoint for these, so the page text is the contract.
// The parser sits behind `LoginPageParser` so a page redesign only needs a
// new implementation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

static FIRST_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>").expect("static regex")
});

static WINDOW_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"window\.([A-Za-z_$][\w$]*)\s*=\s*("(?:[^"\\]|\\.)*"|'[^']*'|[^,;\r\n]+)"#)
        .expect("static regex")
});

const POOL_ID_KEY: &str = "HiveSSOPoolId";
const CLIENT_ID_KEY: &str = "HiveSSOPublicCognitoClientId";

/// Cognito parameters needed to start a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInfo {
    /// User pool id, e.g. `eu-west-1_SamNfoWtf`.
    #[serde(rename = "UPID")]
    pub pool_id: String,
    /// Public app client id.
    #[serde(rename = "CLIID")]
    pub client_id: String,
    /// AWS region the pool lives in: the pool-id prefix before `_`
    /// (`eu-west-1`), not the whole pool id.
    #[serde(rename = "REGION")]
    pub region: String,
}

/// Raw SSO page HTML in, login parameters out.
pub trait LoginPageParser: Send + Sync {
    fn parse(&self, html: &str) -> Result<LoginInfo, Error>;
}

/// Reads `window.*` globals from the first `<script>` element.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptGlobalsParser;

impl ScriptGlobalsParser {
    /// Coerce the script's `window.Name = literal` assignments into a JSON
    /// object. String literals keep their value; bare literals are read as
    /// JSON where possible and kept as text otherwise.
    pub fn globals(script: &str) -> Map<String, Value> {
        WINDOW_ASSIGNMENT
            .captures_iter(script)
            .map(|caps| (caps[1].to_owned(), literal(caps[2].trim())))
            .collect()
    }
}

impl LoginPageParser for ScriptGlobalsParser {
    fn parse(&self, html: &str) -> Result<LoginInfo, Error> {
        let script = FIRST_SCRIPT
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| Error::LoginPage("no <script> element".into()))?;

        let globals = Self::globals(script);
        if globals.is_empty() {
            return Err(Error::LoginPage(
                "first script has no window.* assignments".into(),
            ));
        }

        let pool_id = string_global(&globals, POOL_ID_KEY)?;
        let client_id = string_global(&globals, CLIENT_ID_KEY)?;
        let region = pool_region(&pool_id).to_owned();

        Ok(LoginInfo {
            pool_id,
            client_id,
            region,
        })
    }
}

fn literal(raw: &str) -> Value {
    if let Some(inner) = raw
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return Value::String(inner.to_owned());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn string_global(globals: &Map<String, Value>, key: &str) -> Result<String, Error> {
    match globals.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(Error::MissingField(key.into())),
    }
}

/// Cognito pool ids are `<region>_<id>`.
fn pool_region(pool_id: &str) -> &str {
    pool_id.split_once('_').map_or(pool_id, |(region, _)| region)
}
