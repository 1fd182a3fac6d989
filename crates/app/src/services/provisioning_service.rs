//! Provisioning service — the pending WiFi credential use-cases.
//!
//! Setting a credential applies it to every registered sensor and primes it
//! for sensors registered later (see [`SensorService`](super::sensor_service::SensorService)).
//! It is also forwarded to attached hardware through the [`WifiRelay`] port.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use sensorhub_domain::error::SensorHubError;
use sensorhub_domain::wifi::{ProvisionedCredential, WifiCredential};

use crate::pending::PendingCredential;
use crate::ports::{SensorRepository, WifiRelay};

/// Whether a failed hardware relay fails the provisioning request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelayPolicy {
    /// The state update is authoritative; relay failures are only logged.
    #[default]
    BestEffort,
    /// The relay must succeed before any state changes.
    Required,
}

/// Result of a successful [`ProvisioningService::set_credential`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    /// The credential now pending.
    pub pending: ProvisionedCredential,
    /// Number of existing sensors that received the credential.
    pub sensors_updated: usize,
    /// Whether the credential reached the attached device.
    pub relayed: bool,
}

/// Default bound on a single hardware relay.
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(5);

/// Application service owning the pending WiFi credential.
///
/// Provisioning requests are handled one at a time through `relay_order`, so
/// the device receives credentials in the same order the pending state was
/// written. The pending-credential lock is never held across a relay.
pub struct ProvisioningService<R, T> {
    repo: R,
    relay: T,
    pending: Arc<PendingCredential>,
    policy: RelayPolicy,
    relay_timeout: Duration,
    relay_order: Mutex<()>,
}

impl<R, T> ProvisioningService<R, T>
where
    R: SensorRepository,
    T: WifiRelay,
{
    /// Create a new service sharing `pending` with the sensor registry.
    pub fn new(repo: R, relay: T, pending: Arc<PendingCredential>, policy: RelayPolicy) -> Self {
        Self {
            repo,
            relay,
            pending,
            policy,
            relay_timeout: DEFAULT_RELAY_TIMEOUT,
            relay_order: Mutex::new(()),
        }
    }

    /// Bound every relay attempt by `timeout`.
    #[must_use]
    pub fn with_relay_timeout(mut self, timeout: Duration) -> Self {
        self.relay_timeout = timeout;
        self
    }

    /// Store a new pending credential and apply it to every sensor.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when the credential is
    /// incomplete, or [`SensorHubError::Transport`] under
    /// [`RelayPolicy::Required`] when the device cannot be reached (in which
    /// case nothing is changed). A relay that does not finish within the
    /// configured timeout counts as failed.
    #[tracing::instrument(skip(self, credential), fields(ssid = %credential.ssid))]
    pub async fn set_credential(
        &self,
        credential: WifiCredential,
    ) -> Result<Provisioned, SensorHubError> {
        credential.validate()?;
        let _order = self.relay_order.lock().await;

        if self.policy == RelayPolicy::Required {
            self.relay_bounded(&credential).await?;
        }

        let (pending, sensors_updated) = {
            let mut guard = self.pending.lock().await;
            let sensors_updated = self.repo.assign_wifi(credential.clone()).await?;
            let pending = ProvisionedCredential::now(credential);
            *guard = Some(pending.clone());
            (pending, sensors_updated)
        };
        tracing::info!(sensors_updated, "pending WiFi credential set");

        let relayed = match self.policy {
            RelayPolicy::Required => true,
            RelayPolicy::BestEffort => match self.relay_bounded(&pending.credential).await {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(error = ?err, "WiFi credential not relayed to device");
                    false
                }
            },
        };

        Ok(Provisioned {
            pending,
            sensors_updated,
            relayed,
        })
    }

    async fn relay_bounded(&self, credential: &WifiCredential) -> Result<(), SensorHubError> {
        tokio::time::timeout(self.relay_timeout, self.relay.relay(credential))
            .await
            .map_err(|elapsed| SensorHubError::Transport(Box::new(elapsed)))?
    }

    /// The current pending credential, or `None` when nothing is set.
    pub async fn get_credential(&self) -> Option<ProvisionedCredential> {
        self.pending.current().await
    }

    /// Forget the pending credential without touching sensors.
    ///
    /// Returns `true` if a credential was pending.
    #[tracing::instrument(skip(self))]
    pub async fn clear_credential(&self) -> bool {
        let cleared = self.pending.lock().await.take().is_some();
        if cleared {
            tracing::info!("pending WiFi credential cleared");
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::services::sensor_service::SensorService;
    use crate::services::test_support::{
        FailingRelay, HangingRelay, InMemorySensorRepo, RecordingRelay, SlowRelay,
    };
    use sensorhub_domain::error::ValidationError;
    use sensorhub_domain::id::SensorId;
    use sensorhub_domain::sensor::Sensor;

    struct Harness<T> {
        sensors: SensorService<Arc<InMemorySensorRepo>>,
        provisioning: ProvisioningService<Arc<InMemorySensorRepo>, Arc<T>>,
        relay: Arc<T>,
    }

    fn harness<T: WifiRelay + Default + Send + Sync>(policy: RelayPolicy) -> Harness<T> {
        harness_with_timeout(policy, DEFAULT_RELAY_TIMEOUT)
    }

    fn harness_with_timeout<T: WifiRelay + Default + Send + Sync>(
        policy: RelayPolicy,
        relay_timeout: Duration,
    ) -> Harness<T> {
        let repo = Arc::new(InMemorySensorRepo::default());
        let pending = Arc::new(PendingCredential::new());
        let relay = Arc::new(T::default());
        Harness {
            sensors: SensorService::new(Arc::clone(&repo), Arc::clone(&pending)),
            provisioning: ProvisioningService::new(repo, Arc::clone(&relay), pending, policy)
                .with_relay_timeout(relay_timeout),
            relay,
        }
    }

    fn credential() -> WifiCredential {
        WifiCredential::new("net", "pw").unwrap()
    }

    #[tokio::test]
    async fn should_store_credential_when_no_sensors_exist() {
        let h = harness::<RecordingRelay>(RelayPolicy::BestEffort);

        let provisioned = h.provisioning.set_credential(credential()).await.unwrap();

        assert_eq!(provisioned.sensors_updated, 0);
        assert!(provisioned.relayed);
        let current = h.provisioning.get_credential().await.unwrap();
        assert_eq!(current.credential, credential());
    }

    #[tokio::test]
    async fn should_apply_credential_to_every_existing_sensor() {
        let h = harness::<RecordingRelay>(RelayPolicy::BestEffort);
        for id in 1..=3 {
            h.sensors
                .create_sensor(Sensor::new(SensorId::new(id)))
                .await
                .unwrap();
        }

        let provisioned = h.provisioning.set_credential(credential()).await.unwrap();

        assert_eq!(provisioned.sensors_updated, 3);
        for sensor in h.sensors.list_sensors().await.unwrap() {
            assert_eq!(sensor.wifi, Some(credential()));
        }
    }

    #[tokio::test]
    async fn should_apply_credential_to_sensors_created_later() {
        let h = harness::<RecordingRelay>(RelayPolicy::BestEffort);
        h.provisioning.set_credential(credential()).await.unwrap();

        let created = h
            .sensors
            .create_sensor(Sensor::new(SensorId::new(2)))
            .await
            .unwrap();

        assert_eq!(created.wifi, Some(credential()));
    }

    #[tokio::test]
    async fn should_overwrite_previous_credential() {
        let h = harness::<RecordingRelay>(RelayPolicy::BestEffort);
        h.provisioning.set_credential(credential()).await.unwrap();
        let second = WifiCredential::new("other", "pw2").unwrap();

        h.provisioning.set_credential(second.clone()).await.unwrap();

        let current = h.provisioning.get_credential().await.unwrap();
        assert_eq!(current.credential, second);
    }

    #[tokio::test]
    async fn should_reject_incomplete_credential() {
        let h = harness::<RecordingRelay>(RelayPolicy::BestEffort);
        let incomplete = WifiCredential {
            ssid: "net".to_string(),
            password: String::new(),
        };

        let result = h.provisioning.set_credential(incomplete).await;

        assert!(matches!(
            result,
            Err(SensorHubError::Validation(ValidationError::EmptyWifiField))
        ));
        assert!(h.provisioning.get_credential().await.is_none());
        assert!(h.relay.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_forward_credential_to_relay() {
        let h = harness::<RecordingRelay>(RelayPolicy::BestEffort);
        h.provisioning.set_credential(credential()).await.unwrap();
        assert_eq!(*h.relay.sent.lock().unwrap(), vec![credential()]);
    }

    #[tokio::test]
    async fn should_update_state_when_best_effort_relay_fails() {
        let h = harness::<FailingRelay>(RelayPolicy::BestEffort);
        h.sensors
            .create_sensor(Sensor::new(SensorId::new(1)))
            .await
            .unwrap();

        let provisioned = h.provisioning.set_credential(credential()).await.unwrap();

        assert!(!provisioned.relayed);
        assert_eq!(h.relay.attempts.load(Ordering::SeqCst), 1);
        assert!(h.provisioning.get_credential().await.is_some());
        let sensor = h.sensors.get_sensor(SensorId::new(1)).await.unwrap();
        assert_eq!(sensor.wifi, Some(credential()));
    }

    #[tokio::test]
    async fn should_leave_state_untouched_when_required_relay_fails() {
        let h = harness::<FailingRelay>(RelayPolicy::Required);
        h.sensors
            .create_sensor(Sensor::new(SensorId::new(1)))
            .await
            .unwrap();

        let result = h.provisioning.set_credential(credential()).await;

        assert!(matches!(result, Err(SensorHubError::Transport(_))));
        assert!(h.provisioning.get_credential().await.is_none());
        let sensor = h.sensors.get_sensor(SensorId::new(1)).await.unwrap();
        assert!(sensor.wifi.is_none());
    }

    #[tokio::test]
    async fn should_relay_once_under_required_policy() {
        let h = harness::<RecordingRelay>(RelayPolicy::Required);
        let provisioned = h.provisioning.set_credential(credential()).await.unwrap();
        assert!(provisioned.relayed);
        assert_eq!(h.relay.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_clear_credential_without_touching_sensors() {
        let h = harness::<RecordingRelay>(RelayPolicy::BestEffort);
        h.sensors
            .create_sensor(Sensor::new(SensorId::new(1)))
            .await
            .unwrap();
        h.provisioning.set_credential(credential()).await.unwrap();

        assert!(h.provisioning.clear_credential().await);
        assert!(!h.provisioning.clear_credential().await);

        assert!(h.provisioning.get_credential().await.is_none());
        let sensor = h.sensors.get_sensor(SensorId::new(1)).await.unwrap();
        assert_eq!(sensor.wifi, Some(credential()));
        let later = h
            .sensors
            .create_sensor(Sensor::new(SensorId::new(2)))
            .await
            .unwrap();
        assert!(later.wifi.is_none());
    }

    #[tokio::test]
    async fn should_report_none_after_delete_all() {
        let h = harness::<RecordingRelay>(RelayPolicy::BestEffort);
        h.provisioning.set_credential(credential()).await.unwrap();

        h.sensors.delete_all_sensors().await.unwrap();

        assert!(h.provisioning.get_credential().await.is_none());
    }

    #[tokio::test]
    async fn should_keep_registry_writable_while_required_relay_hangs() {
        let h = harness_with_timeout::<HangingRelay>(
            RelayPolicy::Required,
            Duration::from_millis(200),
        );

        let (provisioned, created) = tokio::join!(
            h.provisioning.set_credential(credential()),
            tokio::time::timeout(
                Duration::from_millis(100),
                h.sensors.create_sensor(Sensor::new(SensorId::new(1))),
            ),
        );

        let created = created.expect("registry blocked by relay").unwrap();
        assert!(created.wifi.is_none());
        assert!(matches!(provisioned, Err(SensorHubError::Transport(_))));
        assert!(h.provisioning.get_credential().await.is_none());
    }

    #[tokio::test]
    async fn should_report_unrelayed_when_best_effort_relay_hangs() {
        let h = harness_with_timeout::<HangingRelay>(
            RelayPolicy::BestEffort,
            Duration::from_millis(200),
        );

        let (provisioned, created) = tokio::join!(
            h.provisioning.set_credential(credential()),
            tokio::time::timeout(
                Duration::from_millis(100),
                h.sensors.create_sensor(Sensor::new(SensorId::new(1))),
            ),
        );

        let created = created.expect("registry blocked by relay").unwrap();
        assert_eq!(created.wifi, Some(credential()));
        assert!(!provisioned.unwrap().relayed);
        assert!(h.provisioning.get_credential().await.is_some());
    }

    #[tokio::test]
    async fn should_deliver_credentials_in_the_order_they_were_set() {
        for policy in [RelayPolicy::BestEffort, RelayPolicy::Required] {
            let h = harness::<SlowRelay>(policy);
            let first = WifiCredential::new(SlowRelay::SLOW_SSID, "pw").unwrap();
            let second = WifiCredential::new("fast", "pw").unwrap();

            let (a, b) = tokio::join!(h.provisioning.set_credential(first), async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                h.provisioning.set_credential(second.clone()).await
            });

            assert!(a.unwrap().relayed);
            assert!(b.unwrap().relayed);
            assert_eq!(
                *h.relay.delivered.lock().unwrap(),
                vec![SlowRelay::SLOW_SSID.to_string(), "fast".to_string()],
                "{policy:?}"
            );
            let current = h.provisioning.get_credential().await.unwrap();
            assert_eq!(current.credential, second, "{policy:?}");
        }
    }
}
