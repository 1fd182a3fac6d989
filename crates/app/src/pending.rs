//! The process-wide pending WiFi credential.

use tokio::sync::{Mutex, MutexGuard};

use sensorhub_domain::wifi::ProvisionedCredential;

/// Holds the most recently provisioned WiFi credential, if any.
///
/// The lock doubles as the write gate for the registry: every mutation that
/// reads or writes the pending credential while touching sensor records holds
/// it for the whole operation, so those mutations never interleave.
#[derive(Debug, Default)]
pub struct PendingCredential {
    inner: Mutex<Option<ProvisionedCredential>>,
}

impl PendingCredential {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire exclusive access to the pending value.
    pub async fn lock(&self) -> MutexGuard<'_, Option<ProvisionedCredential>> {
        self.inner.lock().await
    }

    /// Snapshot of the pending value.
    pub async fn current(&self) -> Option<ProvisionedCredential> {
        self.inner.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensorhub_domain::wifi::WifiCredential;

    #[tokio::test]
    async fn should_start_empty() {
        let pending = PendingCredential::new();
        assert!(pending.current().await.is_none());
    }

    #[tokio::test]
    async fn should_return_value_written_through_lock() {
        let pending = PendingCredential::new();
        let credential = WifiCredential::new("net", "pw").unwrap();
        *pending.lock().await = Some(ProvisionedCredential::now(credential.clone()));

        let current = pending.current().await.unwrap();
        assert_eq!(current.credential, credential);
    }
}
