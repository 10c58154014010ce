//! Command dispatch: bridges CLI args -> client calls -> JSON envelopes.

use secrecy::ExposeSecret;
use serde_json::{Value, json};

use hive_api::{ApiClient, ApiResponse, Credentials, TokenSet};

use crate::cli::Command;
use crate::error::CliError;

/// Run one command and print its envelope on stdout.
pub async fn dispatch(cmd: Command, client: &ApiClient) -> Result<(), CliError> {
    let (operation, response) = match cmd {
        Command::LoginInfo => return login_info(client).await,
        Command::All => ("all", client.get_all().await),
        Command::Homes => ("homes", client.get_homes().await),
        Command::Devices => ("devices", client.get_devices().await),
        Command::Products => ("products", client.get_products().await),
        Command::Actions => ("actions", client.get_actions().await),
        Command::Alarm { home_id } => ("alarm", client.get_alarm(home_id.as_deref()).await),
        Command::CameraImage { hardware_id } => (
            "camera-image",
            client.get_camera_image(&camera(&hardware_id)).await,
        ),
        Command::CameraRecording {
            hardware_id,
            event_id,
        } => (
            "camera-recording",
            client
                .get_camera_recording(&camera(&hardware_id), &event_id)
                .await,
        ),
        Command::Weather { suffix } => ("weather", client.get_weather(&suffix).await),
        Command::Motion {
            node_type,
            id,
            from,
            to,
        } => {
            let sensor = json!({ "type": node_type, "id": id });
            ("motion", client.motion_sensor(&sensor, from, to).await)
        }
        Command::SetState {
            node_type,
            id,
            fields,
        } => {
            let fields: Vec<(&str, &str)> = fields
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            ("set-state", client.set_state(&node_type, &id, &fields).await)
        }
        Command::SetAction { id, payload } => {
            serde_json::from_str::<Value>(&payload)?;
            ("set-action", client.set_action(&id, payload).await)
        }
        Command::Refresh { refresh_token } => ("refresh", refresh(client, refresh_token).await),
    };

    print_envelope(operation, &response)
}

async fn login_info(client: &ApiClient) -> Result<(), CliError> {
    let info = client
        .get_login_info()
        .await
        .ok_or(CliError::RequestFailed {
            operation: "login-info",
        })?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

#[allow(deprecated)]
async fn refresh(client: &ApiClient, refresh_token: Option<String>) -> ApiResponse {
    let token = match client.credentials() {
        Credentials::Token(secret) => Some(secret.expose_secret().to_owned()),
        Credentials::Session(_) | Credentials::Anonymous => None,
    };
    let tokens = TokenSet {
        token,
        refresh_token,
        access_token: None,
    };
    client.refresh_tokens(Some(&tokens)).await
}

/// Minimal product object carrying a camera's hardware id.
fn camera(hardware_id: &str) -> Value {
    json!({ "props": { "hardwareIdentifier": hardware_id } })
}

fn print_envelope(operation: &'static str, response: &ApiResponse) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(response)?);
    if response.is_ok() {
        Ok(())
    } else {
        Err(CliError::RequestFailed { operation })
    }
}
