//! WiFi credential — the SSID/password pair distributed to sensors.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SensorHubError, ValidationError};

/// UTC instant at which a credential was provisioned.
pub type Timestamp = DateTime<Utc>;

/// A WiFi network credential.
///
/// `Debug` never prints the password so credentials can be traced safely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredential {
    pub ssid: String,
    pub password: String,
}

impl WifiCredential {
    /// Build a credential and check its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyWifiField`] when either field is empty.
    pub fn new(
        ssid: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, SensorHubError> {
        let credential = Self {
            ssid: ssid.into(),
            password: password.into(),
        };
        credential.validate()?;
        Ok(credential)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when `ssid` or `password` is empty.
    pub fn validate(&self) -> Result<(), SensorHubError> {
        if self.ssid.is_empty() || self.password.is_empty() {
            return Err(ValidationError::EmptyWifiField.into());
        }
        Ok(())
    }
}

impl fmt::Debug for WifiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredential")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The pending credential together with the time it was provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedCredential {
    pub credential: WifiCredential,
    pub provisioned_at: Timestamp,
}

impl ProvisionedCredential {
    /// Stamp a credential with the current time.
    #[must_use]
    pub fn now(credential: WifiCredential) -> Self {
        Self {
            credential,
            provisioned_at: Utc::now(),
        }
    }
}
