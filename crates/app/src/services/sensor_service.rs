//! Sensor service — the sensor registry use-cases.

use std::sync::Arc;

use sensorhub_domain::error::{NotFoundError, SensorHubError};
use sensorhub_domain::id::SensorId;
use sensorhub_domain::sensor::{Sensor, SensorPatch};
use sensorhub_domain::wifi::ProvisionedCredential;

use crate::pending::PendingCredential;
use crate::ports::SensorRepository;

/// Application service for sensor CRUD operations.
///
/// Shares the [`PendingCredential`] with the provisioning service: new
/// sensors inherit it, patches carrying `wifi` replace it, and
/// [`delete_all_sensors`](Self::delete_all_sensors) clears it.
pub struct SensorService<R> {
    repo: R,
    pending: Arc<PendingCredential>,
}

impl<R: SensorRepository> SensorService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R, pending: Arc<PendingCredential>) -> Self {
        Self { repo, pending }
    }

    /// List all sensors in registration order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_sensors(&self) -> Result<Vec<Sensor>, SensorHubError> {
        self.repo.get_all().await
    }

    /// Look up a sensor by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::NotFound`] when no sensor with `id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn get_sensor(&self, id: SensorId) -> Result<Sensor, SensorHubError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| NotFoundError::sensor(id).into())
    }

    /// Register a new sensor.
    ///
    /// The pending WiFi credential, when set, is stamped onto the sensor
    /// before it is stored.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] if invariants fail and
    /// [`SensorHubError::Conflict`] if the id is already registered.
    #[tracing::instrument(skip(self, sensor), fields(sensor_id = %sensor.id))]
    pub async fn create_sensor(&self, mut sensor: Sensor) -> Result<Sensor, SensorHubError> {
        sensor.validate()?;
        let pending = self.pending.lock().await;
        if let Some(provisioned) = pending.as_ref() {
            sensor.wifi = Some(provisioned.credential.clone());
        }
        let created = self.repo.create(sensor).await?;
        tracing::info!(has_wifi = created.wifi.is_some(), "sensor registered");
        Ok(created)
    }

    /// Merge a partial update into an existing sensor.
    ///
    /// A patch carrying `wifi` also replaces the pending credential, so
    /// sensors registered afterwards inherit it.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] for an empty or invalid patch
    /// and [`SensorHubError::NotFound`] when no sensor with `id` exists.
    #[tracing::instrument(skip(self, patch))]
    pub async fn patch_sensor(
        &self,
        id: SensorId,
        patch: SensorPatch,
    ) -> Result<Sensor, SensorHubError> {
        patch.validate()?;
        let mut pending = self.pending.lock().await;
        let mut sensor = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| SensorHubError::from(NotFoundError::sensor(id)))?;

        let wifi = patch.wifi.clone();
        sensor.merge(patch);
        let updated = self.repo.update(sensor).await?;

        if let Some(credential) = wifi {
            tracing::info!(ssid = %credential.ssid, "pending WiFi credential replaced by sensor patch");
            *pending = Some(ProvisionedCredential::now(credential));
        }
        Ok(updated)
    }

    /// Delete a sensor by id.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::NotFound`] when no sensor with `id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn delete_sensor(&self, id: SensorId) -> Result<(), SensorHubError> {
        let _pending = self.pending.lock().await;
        self.repo.delete(id).await
    }

    /// Remove every sensor and clear the pending WiFi credential.
    ///
    /// Returns the number of sensors removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_all_sensors(&self) -> Result<usize, SensorHubError> {
        let mut pending = self.pending.lock().await;
        let removed = self.repo.delete_all().await?;
        *pending = None;
        tracing::info!(removed, "registry reset");
        Ok(removed)
    }

    /// Register bare sensors at startup, skipping ids that already exist.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn seed(&self, ids: &[SensorId]) -> Result<usize, SensorHubError> {
        let mut seeded = 0;
        for &id in ids {
            match self.create_sensor(Sensor::new(id)).await {
                Ok(_) => seeded += 1,
                Err(SensorHubError::Conflict(_)) => {
                    tracing::debug!(sensor_id = %id, "seed sensor already present");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(seeded)
    }
}
