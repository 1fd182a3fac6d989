//! Sensor — a client-registered IoT device record.
//!
//! A sensor is a semi-structured record: `id`, `data`, `wifi` and
//! `userConfig` are typed, every other field the client sends is kept as an
//! opaque JSON value and serialized back next to the typed ones.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{SensorHubError, ValidationError};
use crate::id::SensorId;
use crate::wifi::WifiCredential;

/// A registered sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    /// Opaque readings, in the order the client supplied them.
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi: Option<WifiCredential>,
    #[serde(
        default,
        rename = "userConfig",
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_config: Option<Value>,
    /// Any other client-supplied fields.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Sensor {
    /// A bare sensor with no readings.
    #[must_use]
    pub fn new(id: SensorId) -> Self {
        Self {
            id,
            data: Vec::new(),
            wifi: None,
            user_config: None,
            attributes: Map::new(),
        }
    }

    /// Parse a sensor from a raw JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingId`] when the body is not an object
    /// or carries no `id`, and [`ValidationError::MalformedBody`] when a typed
    /// field has the wrong shape.
    pub fn from_json(body: Value) -> Result<Self, SensorHubError> {
        let has_id = body
            .as_object()
            .and_then(|object| object.get("id"))
            .is_some_and(|id| !id.is_null());
        if !has_id {
            return Err(ValidationError::MissingId.into());
        }
        let sensor: Self = serde_json::from_value(body)
            .map_err(|err| ValidationError::MalformedBody(err.to_string()))?;
        sensor.validate()?;
        Ok(sensor)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when an embedded WiFi credential
    /// is incomplete.
    pub fn validate(&self) -> Result<(), SensorHubError> {
        if let Some(wifi) = &self.wifi {
            wifi.validate()?;
        }
        Ok(())
    }

    /// Merge a partial update into this record.
    ///
    /// Only fields present in the patch are written; `id` is never changed.
    pub fn merge(&mut self, patch: SensorPatch) {
        if let Some(data) = patch.data {
            self.data = data;
        }
        if let Some(wifi) = patch.wifi {
            self.wifi = Some(wifi);
        }
        if let Some(user_config) = patch.user_config {
            self.user_config = Some(user_config);
        }
        for (key, value) in patch.attributes {
            if key == "id" {
                continue;
            }
            self.attributes.insert(key, value);
        }
    }
}

/// A partial update for a [`Sensor`].
///
/// Absent fields are left untouched by [`Sensor::merge`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SensorPatch {
    #[serde(default, deserialize_with = "non_null")]
    pub data: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "non_null")]
    pub wifi: Option<WifiCredential>,
    #[serde(default, rename = "userConfig", deserialize_with = "present_value")]
    pub user_config: Option<Value>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl SensorPatch {
    /// Parse a patch from a raw JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyPatch`] when the body carries no
    /// fields and [`ValidationError::MalformedBody`] when a typed field has
    /// the wrong shape.
    pub fn from_json(body: Value) -> Result<Self, SensorHubError> {
        let is_empty_object = body.as_object().is_none_or(Map::is_empty);
        if is_empty_object {
            return Err(ValidationError::EmptyPatch.into());
        }
        let patch: Self = serde_json::from_value(body)
            .map_err(|err| ValidationError::MalformedBody(err.to_string()))?;
        patch.validate()?;
        Ok(patch)
    }

    /// Returns `true` when the patch would not write anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
            && self.wifi.is_none()
            && self.user_config.is_none()
            && self.attributes.is_empty()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SensorHubError::Validation`] when the patch is empty or its
    /// WiFi credential is incomplete.
    pub fn validate(&self) -> Result<(), SensorHubError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch.into());
        }
        if let Some(wifi) = &self.wifi {
            wifi.validate()?;
        }
        Ok(())
    }
}

/// Reject an explicit JSON `null` for a typed field instead of reading it as
/// absence.
fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Treat an explicit JSON `null` as a present value rather than as absence.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
