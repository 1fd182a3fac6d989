//! JSON REST handlers for sensors.

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use sensorhub_app::ports::{SensorRepository, WifiRelay};
use sensorhub_domain::error::ValidationError;
use sensorhub_domain::id::SensorId;
use sensorhub_domain::sensor::{Sensor, SensorPatch};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `GET /sensors`.
#[derive(Serialize)]
pub struct SensorList {
    pub sensors: Vec<Sensor>,
}

/// Body of `GET /sensor/{id}`.
#[derive(Serialize)]
pub struct SensorEnvelope {
    pub sensor: Sensor,
}

/// Body of `POST /sensor`.
#[derive(Serialize)]
pub struct CreatedEnvelope {
    pub message: String,
    pub data: Sensor,
}

/// Body of `PATCH /sensor/{id}`.
#[derive(Serialize)]
pub struct PatchedEnvelope {
    pub message: String,
    pub sensor: Sensor,
}

/// Body of the delete endpoints.
#[derive(Serialize)]
pub struct DeletedEnvelope {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<usize>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<SensorList>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<SensorEnvelope>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<CreatedEnvelope>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the patch endpoint.
pub enum PatchResponse {
    Ok(Json<PatchedEnvelope>),
}

impl IntoResponse for PatchResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoints.
pub enum DeleteResponse {
    Ok(Json<DeletedEnvelope>),
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<SensorId, ApiError> {
    SensorId::from_str(raw).map_err(|_| ValidationError::InvalidId(raw.to_string()).into())
}

/// `GET /sensors`
pub async fn list<R, T>(State(state): State<AppState<R, T>>) -> Result<ListResponse, ApiError>
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    let sensors = state.sensor_service.list_sensors().await?;
    Ok(ListResponse::Ok(Json(SensorList { sensors })))
}

/// `GET /sensor/{id}`
pub async fn get<R, T>(
    State(state): State<AppState<R, T>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    let sensor = state.sensor_service.get_sensor(parse_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(SensorEnvelope { sensor })))
}

/// `POST /sensor`
pub async fn create<R, T>(
    State(state): State<AppState<R, T>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    let sensor = Sensor::from_json(super::json_body(body)?)?;
    let created = state.sensor_service.create_sensor(sensor).await?;
    Ok(CreateResponse::Created(Json(CreatedEnvelope {
        message: format!("Sensor ID {} added successfully.", created.id),
        data: created,
    })))
}

/// `PATCH /sensor/{id}`
pub async fn patch<R, T>(
    State(state): State<AppState<R, T>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<PatchResponse, ApiError>
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let patch = SensorPatch::from_json(super::json_body(body)?)?;
    let sensor = state.sensor_service.patch_sensor(id, patch).await?;
    Ok(PatchResponse::Ok(Json(PatchedEnvelope {
        message: format!("Sensor with ID {id} patched successfully."),
        sensor,
    })))
}

/// `DELETE /sensor/{id}`
pub async fn delete<R, T>(
    State(state): State<AppState<R, T>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    state.sensor_service.delete_sensor(id).await?;
    Ok(DeleteResponse::Ok(Json(DeletedEnvelope {
        message: format!("Sensor with ID {id} deleted successfully."),
        deleted: None,
    })))
}

/// `DELETE /sensors`
pub async fn delete_all<R, T>(
    State(state): State<AppState<R, T>>,
) -> Result<DeleteResponse, ApiError>
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    let deleted = state.sensor_service.delete_all_sensors().await?;
    Ok(DeleteResponse::Ok(Json(DeletedEnvelope {
        message: "All sensors deleted.".to_string(),
        deleted: Some(deleted),
    })))
}
