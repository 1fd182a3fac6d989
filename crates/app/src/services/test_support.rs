//! In-memory port implementations shared by the service tests.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use sensorhub_domain::error::{ConflictError, NotFoundError, SensorHubError};
use sensorhub_domain::id::SensorId;
use sensorhub_domain::sensor::Sensor;
use sensorhub_domain::wifi::WifiCredential;

use crate::ports::{SensorRepository, WifiRelay};

#[derive(Default)]
pub struct InMemorySensorRepo {
    store: Mutex<Vec<Sensor>>,
}

impl SensorRepository for InMemorySensorRepo {
    fn create(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SensorHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = if store.iter().any(|s| s.id == sensor.id) {
            Err(ConflictError { id: sensor.id }.into())
        } else {
            store.push(sensor.clone());
            Ok(sensor)
        };
        async { result }
    }

    fn get_by_id(
        &self,
        id: SensorId,
    ) -> impl Future<Output = Result<Option<Sensor>, SensorHubError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.iter().find(|s| s.id == id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Sensor>, SensorHubError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.clone();
        async { Ok(result) }
    }

    fn update(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SensorHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = match store.iter_mut().find(|s| s.id == sensor.id) {
            Some(slot) => {
                *slot = sensor.clone();
                Ok(sensor)
            }
            None => Err(NotFoundError::sensor(sensor.id).into()),
        };
        async { result }
    }

    fn delete(&self, id: SensorId) -> impl Future<Output = Result<(), SensorHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|s| s.id != id);
        let result = if store.len() == before {
            Err(NotFoundError::sensor(id).into())
        } else {
            Ok(())
        };
        async { result }
    }

    fn delete_all(&self) -> impl Future<Output = Result<usize, SensorHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let removed = store.len();
        store.clear();
        async move { Ok(removed) }
    }

    fn assign_wifi(
        &self,
        credential: WifiCredential,
    ) -> impl Future<Output = Result<usize, SensorHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        for sensor in store.iter_mut() {
            sensor.wifi = Some(credential.clone());
        }
        let updated = store.len();
        async move { Ok(updated) }
    }
}

/// Relay that records every credential it receives.
#[derive(Default)]
pub struct RecordingRelay {
    pub sent: Mutex<Vec<WifiCredential>>,
}

impl WifiRelay for RecordingRelay {
    fn relay(
        &self,
        credential: &WifiCredential,
    ) -> impl Future<Output = Result<(), SensorHubError>> + Send {
        self.sent.lock().unwrap().push(credential.clone());
        async { Ok(()) }
    }
}

/// Relay with no device behind it.
#[derive(Default)]
pub struct FailingRelay {
    pub attempts: AtomicUsize,
}

impl WifiRelay for FailingRelay {
    fn relay(
        &self,
        _credential: &WifiCredential,
    ) -> impl Future<Output = Result<(), SensorHubError>> + Send {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        async { Err(SensorHubError::Transport("no device attached".into())) }
    }
}

/// Relay whose write never completes, like a wedged serial port.
#[derive(Default)]
pub struct HangingRelay;

impl WifiRelay for HangingRelay {
    fn relay(
        &self,
        _credential: &WifiCredential,
    ) -> impl Future<Output = Result<(), SensorHubError>> + Send {
        std::future::pending()
    }
}

/// Relay that takes longer for [`SlowRelay::SLOW_SSID`] and records each
/// ssid once its write has completed.
#[derive(Default)]
pub struct SlowRelay {
    pub delivered: Mutex<Vec<String>>,
}

impl SlowRelay {
    pub const SLOW_SSID: &'static str = "slow";
}

impl WifiRelay for SlowRelay {
    fn relay(
        &self,
        credential: &WifiCredential,
    ) -> impl Future<Output = Result<(), SensorHubError>> + Send {
        let ssid = credential.ssid.clone();
        async move {
            if ssid == Self::SLOW_SSID {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            self.delivered.lock().unwrap().push(ssid);
            Ok(())
        }
    }
}
