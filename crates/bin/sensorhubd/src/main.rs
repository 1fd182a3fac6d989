//! # sensorhubd — sensorhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize structured logging
//! - Construct the in-memory registry and the serial relay (adapters)
//! - Construct application services, injecting adapters via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use sensorhub_adapter_http_axum::router;
use sensorhub_adapter_http_axum::state::AppState;
use sensorhub_adapter_serial::{SerialMode, SerialRelay};
use sensorhub_adapter_storage_memory::InMemorySensorRepository;
use sensorhub_app::pending::PendingCredential;
use sensorhub_app::services::provisioning_service::ProvisioningService;
use sensorhub_app::services::sensor_service::SensorService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Registry
    let repo = Arc::new(InMemorySensorRepository::new());
    let pending = Arc::new(PendingCredential::new());

    // Serial relay
    let relay = SerialRelay::new(config.serial.clone())?;
    match config.serial.mode {
        SerialMode::Required => {
            relay.connect().await?;
        }
        SerialMode::Auto => tracing::info!("serial relay will connect on first use"),
        SerialMode::Disabled => tracing::info!("serial relay disabled"),
    }

    // Services
    let sensor_service = SensorService::new(Arc::clone(&repo), Arc::clone(&pending));
    let seeded = sensor_service.seed(&config.seed_ids()).await?;
    if seeded > 0 {
        tracing::info!(seeded, "registry seeded");
    }
    let provisioning_service = ProvisioningService::new(
        repo,
        relay,
        pending,
        config.provisioning.relay_policy.into(),
    )
    .with_relay_timeout(config.relay_timeout());

    // HTTP
    let state = AppState::new(sensor_service, provisioning_service);
    let app = router::build(state, &config.router_options());

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "sensorhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("sensorhubd stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM for Unix targets.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
