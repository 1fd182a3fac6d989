//! Serial adapter error types.

use sensorhub_domain::error::SensorHubError;

/// Errors specific to the serial adapter.
#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    /// The relay is configured off.
    #[error("serial relay disabled")]
    Disabled,

    /// No attached port matched the device filter.
    #[error("no matching serial device found")]
    DeviceNotFound,

    /// The connection could not be established earlier and is not retried.
    #[error("serial transport unavailable: {0}")]
    Unavailable(String),

    /// The configured vendor id is not a hex `u16`.
    #[error("invalid USB vendor id '{0}'")]
    InvalidVendorId(String),

    /// Listing serial ports failed.
    #[error("failed to enumerate serial ports")]
    Enumerate(#[source] tokio_serial::Error),

    /// The enumeration task panicked or was cancelled.
    #[error("serial enumeration task failed")]
    Join(#[from] tokio::task::JoinError),

    /// Opening the matched port failed.
    #[error("failed to open serial port {path}")]
    Open {
        path: String,
        #[source]
        source: tokio_serial::Error,
    },

    /// Writing to the port failed.
    #[error("serial write failed")]
    Io(#[from] std::io::Error),

    /// The outbound message could not be encoded.
    #[error("failed to encode serial message")]
    Encode(#[from] serde_json::Error),
}

impl From<SerialError> for SensorHubError {
    fn from(err: SerialError) -> Self {
        Self::Transport(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_device_not_found_error() {
        let err = SerialError::DeviceNotFound;
        assert_eq!(err.to_string(), "no matching serial device found");
    }

    #[test]
    fn should_display_unavailable_reason() {
        let err = SerialError::Unavailable("no matching serial device found".to_string());
        assert_eq!(
            err.to_string(),
            "serial transport unavailable: no matching serial device found"
        );
    }

    #[test]
    fn should_convert_to_transport_error() {
        let err: SensorHubError = SerialError::Disabled.into();
        assert!(matches!(err, SensorHubError::Transport(_)));
    }

    #[test]
    fn should_convert_io_error() {
        let err: SerialError = std::io::Error::other("broken pipe").into();
        assert!(matches!(err, SerialError::Io(_)));
        assert_eq!(err.to_string(), "serial write failed");
    }
}
