//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SensorHubError`] via `#[from]` / `From` impls. The `Display` output of the
//! leaf errors is what API clients see, so keep it human readable.

use crate::id::SensorId;

/// Top-level error returned by application services.
#[derive(Debug, thiserror::Error)]
pub enum SensorHubError {
    /// Input rejected before touching any state.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The operation would break the unique-id invariant.
    #[error("conflict")]
    Conflict(#[from] ConflictError),

    /// The addressed record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The hardware relay could not deliver a message.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons an input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A sensor was submitted without an `id`.
    #[error("A sensor object with an ID is required in the body.")]
    MissingId,

    /// A patch carried no fields at all.
    #[error("Request body must contain fields to update.")]
    EmptyPatch,

    /// A WiFi credential had an empty `ssid` or `password`.
    #[error("Both ssid and password are required.")]
    EmptyWifiField,

    /// The body was not valid JSON for the endpoint.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// A path segment could not be parsed as a sensor id.
    #[error("Invalid sensor ID '{0}'.")]
    InvalidId(String),
}

/// A record with the same id is already registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Sensor ID {id} already exists.")]
pub struct ConflictError {
    pub id: SensorId,
}

/// No record exists for the given id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error: {entity} with ID {id} not found.")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

impl NotFoundError {
    /// Not-found error for a sensor id.
    #[must_use]
    pub fn sensor(id: SensorId) -> Self {
        Self {
            entity: "Sensor",
            id: id.to_string(),
        }
    }
}
