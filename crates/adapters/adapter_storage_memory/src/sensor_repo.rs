//! In-memory implementation of [`SensorRepository`].

use tokio::sync::RwLock;

use sensorhub_app::ports::SensorRepository;
use sensorhub_domain::error::{ConflictError, NotFoundError, SensorHubError};
use sensorhub_domain::id::SensorId;
use sensorhub_domain::sensor::Sensor;
use sensorhub_domain::wifi::WifiCredential;

/// Ordered in-memory sensor store.
#[derive(Debug, Default)]
pub struct InMemorySensorRepository {
    sensors: RwLock<Vec<Sensor>>,
}

impl InMemorySensorRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SensorRepository for InMemorySensorRepository {
    async fn create(&self, sensor: Sensor) -> Result<Sensor, SensorHubError> {
        let mut sensors = self.sensors.write().await;
        if sensors.iter().any(|existing| existing.id == sensor.id) {
            return Err(ConflictError { id: sensor.id }.into());
        }
        sensors.push(sensor.clone());
        tracing::debug!(sensor_id = %sensor.id, total = sensors.len(), "sensor stored");
        Ok(sensor)
    }

    async fn get_by_id(&self, id: SensorId) -> Result<Option<Sensor>, SensorHubError> {
        let sensors = self.sensors.read().await;
        Ok(sensors.iter().find(|sensor| sensor.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Sensor>, SensorHubError> {
        Ok(self.sensors.read().await.clone())
    }

    async fn update(&self, sensor: Sensor) -> Result<Sensor, SensorHubError> {
        let mut sensors = self.sensors.write().await;
        let slot = sensors
            .iter_mut()
            .find(|existing| existing.id == sensor.id)
            .ok_or_else(|| NotFoundError::sensor(sensor.id))?;
        *slot = sensor.clone();
        Ok(sensor)
    }

    async fn delete(&self, id: SensorId) -> Result<(), SensorHubError> {
        let mut sensors = self.sensors.write().await;
        let index = sensors
            .iter()
            .position(|sensor| sensor.id == id)
            .ok_or_else(|| NotFoundError::sensor(id))?;
        sensors.remove(index);
        Ok(())
    }

    async fn delete_all(&self) -> Result<usize, SensorHubError> {
        let mut sensors = self.sensors.write().await;
        let removed = sensors.len();
        sensors.clear();
        Ok(removed)
    }

    async fn assign_wifi(&self, credential: WifiCredential) -> Result<usize, SensorHubError> {
        let mut sensors = self.sensors.write().await;
        for sensor in sensors.iter_mut() {
            sensor.wifi = Some(credential.clone());
        }
        Ok(sensors.len())
    }
}
