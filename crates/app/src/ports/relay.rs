//! Relay port — forwards WiFi credentials to attached hardware.

use std::future::Future;

use sensorhub_domain::error::SensorHubError;
use sensorhub_domain::wifi::WifiCredential;

/// Delivers a WiFi credential to a physically attached device.
///
/// Delivery is single-attempt with no acknowledgement. An implementation
/// with no device available returns [`SensorHubError::Transport`].
pub trait WifiRelay {
    /// Send the credential to the device.
    fn relay(
        &self,
        credential: &WifiCredential,
    ) -> impl Future<Output = Result<(), SensorHubError>> + Send;
}

impl<T: WifiRelay + Send + Sync> WifiRelay for std::sync::Arc<T> {
    fn relay(
        &self,
        credential: &WifiCredential,
    ) -> impl Future<Output = Result<(), SensorHubError>> + Send {
        (**self).relay(credential)
    }
}
