// Camera event-history endpoints
//
// These live on a separate service host and take the bearer + JWT header
// shape instead of the plain authorization header.

use serde_json::Value;
use tracing::debug;

use crate::auth::CallKind;
use crate::client::{ApiClient, Verb};
use crate::envelope::ApiResponse;
use crate::error::Error;
use crate::nodes::str_at;

/// Playlist line holding the recording URL.
const SEGMENT_LINE: usize = 3;

impl ApiClient {
    /// Latest event image for a camera.
    ///
    /// `device` is the camera's product object; the camera id is its
    /// `props.hardwareIdentifier`.
    pub async fn get_camera_image(&self, device: &Value) -> ApiResponse {
        let result: Result<(u16, Value), Error> = async {
            let camera_id = str_at(device, "/props/hardwareIdentifier")?;
            let url = self.url(&self.urls().camera_images, &[("deviceId", camera_id)]);
            debug!(camera_id, "fetching latest camera image");
            self.fetch_json(Verb::Get, &url, None, CallKind::Camera, &[])
                .await
        }
        .await;
        self.settle("get_camera_image", result)
    }

    /// Recording URL for one camera event.
    ///
    /// The service answers with an HLS playlist; `parsed` is the segment
    /// line rather than a decoded body.
    pub async fn get_camera_recording(&self, device: &Value, event_id: &str) -> ApiResponse {
        let result: Result<(u16, Value), Error> = async {
            let camera_id = str_at(device, "/props/hardwareIdentifier")?;
            let url = self.url(
                &self.urls().camera_recordings,
                &[("deviceId", camera_id), ("eventId", event_id)],
            );
            debug!(camera_id, event_id, "fetching camera recording");
            let resp = self
                .request(Verb::Get, &url, None, CallKind::Camera, &[])
                .await?;
            let status = resp.status().as_u16();
            let text = resp.text().await?;
            let segment = playlist_segment(&text)?;
            Ok((status, Value::from(segment)))
        }
        .await;
        self.settle("get_camera_recording", result)
    }
}

/// The segment line of a camera playlist body.
pub fn playlist_segment(body: &str) -> Result<&str, Error> {
    body.split('\n')
        .nth(SEGMENT_LINE)
        .ok_or_else(|| Error::Playlist {
            lines: body.split('\n').count(),
        })
}
