// Node, device, product and action endpoints
//
// Listing goes through the shared `nodes/all` endpoint (with inclusion
// flags) or the dedicated devices/products endpoints. Mutations POST to a
// node or action URL under the current platform base.

use serde_json::{Map, Value};
use tracing::debug;

use crate::auth::CallKind;
use crate::client::{ApiClient, Verb, take_field};
use crate::envelope::ApiResponse;
use crate::error::Error;

impl ApiClient {
    /// Everything for the home: products, devices and actions.
    ///
    /// `GET {baseUrl}/nodes/all?products=true&devices=true&actions=true`
    pub async fn get_all(&self) -> ApiResponse {
        let url = self.url(&self.urls().all, &[]);
        let params = self.params(true, true, true).to_pairs();
        debug!("fetching all nodes");
        let result = self
            .fetch_json(Verb::Get, &url, None, CallKind::Standard, &params)
            .await;
        self.settle("get_all", result)
    }

    /// The account's homes (`homes` of the all-nodes reply).
    pub async fn get_homes(&self) -> ApiResponse {
        let url = self.url(&self.urls().all, &[]);
        let params = self.params(false, false, false).to_pairs();
        debug!("fetching homes");
        let result = self
            .fetch_json(Verb::Get, &url, None, CallKind::Standard, &params)
            .await
            .and_then(|(status, body)| Ok((status, take_field(body, "homes")?)));
        self.settle("get_homes", result)
    }

    /// `GET {baseUrl}/devices?devices=true`
    pub async fn get_devices(&self) -> ApiResponse {
        let url = self.url(&self.urls().devices, &[]);
        let params = self.params(false, true, false).to_pairs();
        debug!("fetching devices");
        let result = self
            .fetch_json(Verb::Get, &url, None, CallKind::Standard, &params)
            .await;
        self.settle("get_devices", result)
    }

    /// `GET {baseUrl}/products?products=true`
    pub async fn get_products(&self) -> ApiResponse {
        let url = self.url(&self.urls().products, &[]);
        let params = self.params(true, false, false).to_pairs();
        debug!("fetching products");
        let result = self
            .fetch_json(Verb::Get, &url, None, CallKind::Standard, &params)
            .await;
        self.settle("get_products", result)
    }

    /// Quick actions (`actions` of the all-nodes reply).
    pub async fn get_actions(&self) -> ApiResponse {
        let url = self.url(&self.urls().all, &[]);
        let params = self.home_id_param();
        debug!("fetching actions");
        let result = self
            .fetch_json(Verb::Get, &url, None, CallKind::Standard, &params)
            .await
            .and_then(|(status, body)| Ok((status, take_field(body, "actions")?)));
        self.settle("get_actions", result)
    }

    /// Motion events for a sensor between two epoch timestamps.
    ///
    /// `GET {baseUrl}/products/{type}/{id}/events?from=..&to=..`
    /// `sensor` is a product object; its `type` and `id` pick the node.
    pub async fn motion_sensor(&self, sensor: &Value, from: i64, to: i64) -> ApiResponse {
        let result: Result<(u16, Value), Error> = async {
            let n_type = str_at(sensor, "/type")?;
            let n_id = str_at(sensor, "/id")?;
            let url = format!("{}/{n_type}/{n_id}/events", self.url(&self.urls().products, &[]));
            let params = vec![("from", from.to_string()), ("to", to.to_string())];
            debug!(n_type, n_id, from, to, "fetching motion events");
            self.fetch_json(Verb::Get, &url, None, CallKind::Standard, &params)
                .await
        }
        .await;
        self.settle("motion_sensor", result)
    }

    /// Change node state.
    ///
    /// `POST {baseUrl}/nodes/{type}/{id}` with the fields as a flat JSON
    /// object of strings, e.g. `[("target", "21")]` -> `{"target":"21"}`.
    pub async fn set_state(&self, n_type: &str, n_id: &str, fields: &[(&str, &str)]) -> ApiResponse {
        let result: Result<(u16, Value), Error> = async {
            let body: Map<String, Value> = fields
                .iter()
                .map(|(key, value)| ((*key).to_owned(), Value::from(*value)))
                .collect();
            let body = serde_json::to_string(&body)?;
            let url = self.url(&self.urls().nodes, &[("type", n_type), ("id", n_id)]);
            debug!(n_type, n_id, "setting node state");
            self.fetch_json(Verb::Post, &url, Some(body), CallKind::Standard, &[])
                .await
        }
        .await;
        self.settle("set_state", result)
    }

    /// Trigger or update an action. `payload` is sent verbatim.
    ///
    /// `POST {baseUrl}/actions/{id}`
    pub async fn set_action(&self, n_id: &str, payload: impl Into<String>) -> ApiResponse {
        let url = format!("{}/{n_id}", self.url(&self.urls().actions, &[]));
        debug!(n_id, "setting action");
        let result = self
            .fetch_json(Verb::Post, &url, Some(payload.into()), CallKind::Standard, &[])
            .await;
        self.settle("set_action", result)
    }
}

/// String at a JSON pointer inside a caller-supplied object.
pub(crate) fn str_at<'a>(value: &'a Value, pointer: &str) -> Result<&'a str, Error> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MissingField(pointer.trim_start_matches('/').replace('/', ".")))
}
