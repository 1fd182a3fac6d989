//! Storage port — repository trait for sensor records.

use std::future::Future;

use sensorhub_domain::error::SensorHubError;
use sensorhub_domain::id::SensorId;
use sensorhub_domain::sensor::Sensor;
use sensorhub_domain::wifi::WifiCredential;

/// Ordered storage for [`Sensor`] records.
///
/// Implementations keep records in insertion order and enforce the
/// unique-id invariant.
pub trait SensorRepository {
    /// Append a new sensor.
    ///
    /// Fails with [`SensorHubError::Conflict`] when the id is already taken,
    /// leaving the store untouched.
    fn create(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SensorHubError>> + Send;

    /// Look up a sensor by id.
    fn get_by_id(
        &self,
        id: SensorId,
    ) -> impl Future<Output = Result<Option<Sensor>, SensorHubError>> + Send;

    /// All sensors, in insertion order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Sensor>, SensorHubError>> + Send;

    /// Replace the stored sensor with the same id.
    ///
    /// Fails with [`SensorHubError::NotFound`] when no such sensor exists.
    fn update(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SensorHubError>> + Send;

    /// Remove a sensor by id.
    ///
    /// Fails with [`SensorHubError::NotFound`] when no such sensor exists.
    fn delete(&self, id: SensorId) -> impl Future<Output = Result<(), SensorHubError>> + Send;

    /// Remove every sensor, returning how many were removed.
    fn delete_all(&self) -> impl Future<Output = Result<usize, SensorHubError>> + Send;

    /// Overwrite the `wifi` field of every stored sensor, returning how many
    /// were updated.
    fn assign_wifi(
        &self,
        credential: WifiCredential,
    ) -> impl Future<Output = Result<usize, SensorHubError>> + Send;
}

impl<T: SensorRepository + Send + Sync> SensorRepository for std::sync::Arc<T> {
    fn create(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SensorHubError>> + Send {
        (**self).create(sensor)
    }

    fn get_by_id(
        &self,
        id: SensorId,
    ) -> impl Future<Output = Result<Option<Sensor>, SensorHubError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Sensor>, SensorHubError>> + Send {
        (**self).get_all()
    }

    fn update(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SensorHubError>> + Send {
        (**self).update(sensor)
    }

    fn delete(&self, id: SensorId) -> impl Future<Output = Result<(), SensorHubError>> + Send {
        (**self).delete(id)
    }

    fn delete_all(&self) -> impl Future<Output = Result<usize, SensorHubError>> + Send {
        (**self).delete_all()
    }

    fn assign_wifi(
        &self,
        credential: WifiCredential,
    ) -> impl Future<Output = Result<usize, SensorHubError>> + Send {
        (**self).assign_wifi(credential)
    }
}
