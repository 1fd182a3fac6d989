//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod sensors;
#[allow(clippy::missing_errors_doc)]
pub mod wifi;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use serde_json::Value;

use sensorhub_app::ports::{SensorRepository, WifiRelay};
use sensorhub_domain::error::ValidationError;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the sensor and WiFi routes.
pub fn routes<R, T>() -> Router<AppState<R, T>>
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    Router::new()
        // Sensors
        .route(
            "/sensors",
            get(sensors::list::<R, T>).delete(sensors::delete_all::<R, T>),
        )
        .route("/sensor", post(sensors::create::<R, T>))
        .route(
            "/sensor/{id}",
            get(sensors::get::<R, T>)
                .patch(sensors::patch::<R, T>)
                .delete(sensors::delete::<R, T>),
        )
        // WiFi provisioning
        .route(
            "/wifi",
            get(wifi::get::<R, T>)
                .post(wifi::set::<R, T>)
                .patch(wifi::set::<R, T>)
                .delete(wifi::clear::<R, T>),
        )
}

/// Unwrap a JSON body, turning extractor rejections into the error envelope.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()).into())
}
