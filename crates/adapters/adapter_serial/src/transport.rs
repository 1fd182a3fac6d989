//! Lazily connected serial transport implementing the [`WifiRelay`] port.

use std::fmt;

use tokio::sync::{Mutex, OnceCell};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use sensorhub_app::ports::WifiRelay;
use sensorhub_domain::error::SensorHubError;
use sensorhub_domain::wifi::WifiCredential;

use crate::codec;
use crate::config::{SerialConfig, SerialMode};
use crate::discovery::{self, DeviceMatcher};
use crate::error::SerialError;

/// Outcome of the one-time connection attempt.
pub enum Transport {
    /// An open port; writes are serialized through the mutex.
    Available {
        path: String,
        port: Mutex<SerialStream>,
    },
    /// No usable device; the reason is kept for diagnostics.
    Unavailable(String),
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { path, .. } => f.debug_struct("Available").field("path", path).finish(),
            Self::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

/// Serial relay with a single connection established on first use.
///
/// The connection attempt happens at most once per process; its outcome,
/// success or failure, is cached and never retried.
#[derive(Debug)]
pub struct SerialRelay {
    config: SerialConfig,
    matcher: DeviceMatcher,
    transport: OnceCell<Transport>,
}

impl SerialRelay {
    /// Create a relay. No port is touched until first use.
    ///
    /// # Errors
    ///
    /// Returns [`SerialError::InvalidVendorId`] for a malformed vendor id.
    pub fn new(config: SerialConfig) -> Result<Self, SerialError> {
        let matcher = DeviceMatcher::from_config(&config)?;
        Ok(Self {
            config,
            matcher,
            transport: OnceCell::new(),
        })
    }

    /// Establish the connection now instead of on first relay.
    ///
    /// # Errors
    ///
    /// Returns [`SerialError::Unavailable`] when no device could be opened.
    pub async fn connect(&self) -> Result<&Transport, SerialError> {
        let transport = self.transport().await;
        if let Transport::Unavailable(reason) = transport {
            return Err(SerialError::Unavailable(reason.clone()));
        }
        Ok(transport)
    }

    /// The cached transport, connecting on first call.
    pub async fn transport(&self) -> &Transport {
        self.transport.get_or_init(|| self.open()).await
    }

    async fn open(&self) -> Transport {
        if self.config.mode == SerialMode::Disabled {
            return Transport::Unavailable(SerialError::Disabled.to_string());
        }
        match self.try_open().await {
            Ok((path, port)) => {
                tracing::info!(%path, baud_rate = self.config.baud_rate, "serial device connected");
                Transport::Available {
                    path,
                    port: Mutex::new(port),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "serial device unavailable, continuing without relay");
                Transport::Unavailable(err.to_string())
            }
        }
    }

    async fn try_open(&self) -> Result<(String, SerialStream), SerialError> {
        let candidate = discovery::discover(&self.matcher).await?;
        let port = tokio_serial::new(&candidate.path, self.config.baud_rate)
            .open_native_async()
            .map_err(|source| SerialError::Open {
                path: candidate.path.clone(),
                source,
            })?;
        Ok((candidate.path, port))
    }

    async fn send(&self, credential: &WifiCredential) -> Result<(), SerialError> {
        let line = codec::encode_wifi(credential)?;
        match self.transport().await {
            Transport::Available { path, port } => {
                let mut port = port.lock().await;
                codec::write_line(&mut *port, &line).await?;
                tracing::debug!(%path, bytes = line.len(), "WiFi credential written to serial");
                Ok(())
            }
            Transport::Unavailable(reason) => Err(SerialError::Unavailable(reason.clone())),
        }
    }
}

impl WifiRelay for SerialRelay {
    async fn relay(&self, credential: &WifiCredential) -> Result<(), SensorHubError> {
        self.send(credential).await.map_err(SensorHubError::from)
    }
}
