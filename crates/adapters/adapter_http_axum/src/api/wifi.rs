//! JSON REST handlers for WiFi provisioning.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use sensorhub_app::ports::{SensorRepository, WifiRelay};
use sensorhub_domain::error::ValidationError;
use sensorhub_domain::wifi::{Timestamp, WifiCredential};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for setting the WiFi credential.
///
/// Both fields are optional here so a missing field is reported with the
/// same message as an empty one.
#[derive(Deserialize)]
pub struct SetWifiRequest {
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `POST /wifi` and `PATCH /wifi`.
#[derive(Serialize)]
pub struct WifiSetEnvelope {
    pub message: String,
    pub wifi: WifiCredential,
    pub sensors_updated: usize,
    pub relayed: bool,
}

/// Body of `GET /wifi`.
#[derive(Serialize)]
pub struct WifiEnvelope {
    pub wifi: Option<WifiCredential>,
    pub provisioned_at: Option<Timestamp>,
}

/// Body of `DELETE /wifi`.
#[derive(Serialize)]
pub struct WifiClearedEnvelope {
    pub message: String,
}

/// Possible responses from the WiFi endpoints.
pub enum WifiResponse {
    Set(Json<WifiSetEnvelope>),
    Current(Json<WifiEnvelope>),
    Cleared(Json<WifiClearedEnvelope>),
}

impl IntoResponse for WifiResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Set(json) => json.into_response(),
            Self::Current(json) => json.into_response(),
            Self::Cleared(json) => json.into_response(),
        }
    }
}

/// `POST /wifi` and `PATCH /wifi`
pub async fn set<R, T>(
    State(state): State<AppState<R, T>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<WifiResponse, ApiError>
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    let req: SetWifiRequest = serde_json::from_value(super::json_body(body)?)
        .map_err(|err| ValidationError::MalformedBody(err.to_string()))?;
    let credential = WifiCredential {
        ssid: req.ssid.unwrap_or_default(),
        password: req.password.unwrap_or_default(),
    };

    let provisioned = state.provisioning_service.set_credential(credential).await?;
    let message = if provisioned.relayed {
        "WiFi credentials updated and sent to the device."
    } else {
        "WiFi credentials updated."
    };
    Ok(WifiResponse::Set(Json(WifiSetEnvelope {
        message: message.to_string(),
        wifi: provisioned.pending.credential,
        sensors_updated: provisioned.sensors_updated,
        relayed: provisioned.relayed,
    })))
}

/// `GET /wifi`
pub async fn get<R, T>(State(state): State<AppState<R, T>>) -> WifiResponse
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    let current = state.provisioning_service.get_credential().await;
    let (wifi, provisioned_at) = match current {
        Some(pending) => (Some(pending.credential), Some(pending.provisioned_at)),
        None => (None, None),
    };
    WifiResponse::Current(Json(WifiEnvelope {
        wifi,
        provisioned_at,
    }))
}

/// `DELETE /wifi`
pub async fn clear<R, T>(State(state): State<AppState<R, T>>) -> WifiResponse
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    let message = if state.provisioning_service.clear_credential().await {
        "Pending WiFi credentials cleared."
    } else {
        "No pending WiFi credentials."
    };
    WifiResponse::Cleared(Json(WifiClearedEnvelope {
        message: message.to_string(),
    }))
}
