//! Axum router assembly.

use std::path::PathBuf;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::{Value, json};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use sensorhub_app::ports::{SensorRepository, WifiRelay};

use crate::state::AppState;

/// Transport-level options for the router.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
    /// Directory served for paths no API route matches.
    ///
    /// When set, `/` is served from this directory instead of the JSON
    /// welcome message.
    pub public_dir: Option<PathBuf>,
}

/// Build the top-level axum [`Router`].
///
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<R, T>(state: AppState<R, T>, options: &RouterOptions) -> Router
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/favicon.ico", get(favicon))
        .merge(crate::api::routes::<R, T>());
    if options.public_dir.is_none() {
        router = router.route("/", get(welcome));
    }

    let mut router = router.with_state(state);
    if let Some(dir) = &options.public_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(crate::cors::layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn welcome() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Sensor API. Use /sensors for all data.",
        "available_routes": [
            "/sensors (GET, DELETE)",
            "/sensor (POST)",
            "/sensor/{id} (GET, PATCH, DELETE)",
            "/wifi (GET, POST, PATCH, DELETE)",
        ],
    }))
}
