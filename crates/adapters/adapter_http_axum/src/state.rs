//! Shared application state for axum handlers.

use std::sync::Arc;

use sensorhub_app::ports::{SensorRepository, WifiRelay};
use sensorhub_app::services::provisioning_service::ProvisioningService;
use sensorhub_app::services::sensor_service::SensorService;

/// Application state shared across all axum handlers.
///
/// Generic over the sensor repository and the WiFi relay to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<R, T> {
    /// Sensor registry.
    pub sensor_service: Arc<SensorService<R>>,
    /// Pending WiFi credential.
    pub provisioning_service: Arc<ProvisioningService<R, T>>,
}

impl<R, T> Clone for AppState<R, T> {
    fn clone(&self) -> Self {
        Self {
            sensor_service: Arc::clone(&self.sensor_service),
            provisioning_service: Arc::clone(&self.provisioning_service),
        }
    }
}

impl<R, T> AppState<R, T>
where
    R: SensorRepository + Send + Sync + 'static,
    T: WifiRelay + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        sensor_service: SensorService<R>,
        provisioning_service: ProvisioningService<R, T>,
    ) -> Self {
        Self {
            sensor_service: Arc::new(sensor_service),
            provisioning_service: Arc::new(provisioning_service),
        }
    }
}
