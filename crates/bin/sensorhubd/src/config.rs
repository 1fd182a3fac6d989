//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `sensorhub.toml` in the working directory (or the path in
//! `SENSORHUB_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use sensorhub_adapter_http_axum::router::RouterOptions;
use sensorhub_adapter_serial::{DeviceMatcher, SerialConfig, SerialMode};
use sensorhub_app::services::provisioning_service::{DEFAULT_RELAY_TIMEOUT, RelayPolicy};
use sensorhub_domain::id::SensorId;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Cross-origin policy.
    pub cors: CorsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Sensors registered at startup.
    pub registry: RegistryConfig,
    /// WiFi provisioning behaviour.
    pub provisioning: ProvisioningConfig,
    /// Serial relay settings.
    pub serial: SerialConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Optional directory of static files.
    pub public_dir: Option<PathBuf>,
}

/// CORS configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API. `["*"]` allows any origin.
    pub allowed_origins: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Registry seeding.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Ids of bare sensors registered at startup.
    pub seed: Vec<i64>,
}

/// Provisioning configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Whether a failed hardware relay fails `POST /wifi`.
    pub relay_policy: RelayPolicyConfig,
    /// Upper bound on a single hardware relay, in milliseconds.
    pub relay_timeout_ms: u64,
}

/// Serialized form of [`RelayPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayPolicyConfig {
    #[default]
    BestEffort,
    Required,
}

impl From<RelayPolicyConfig> for RelayPolicy {
    fn from(value: RelayPolicyConfig) -> Self {
        match value {
            RelayPolicyConfig::BestEffort => Self::BestEffort,
            RelayPolicyConfig::Required => Self::Required,
        }
    }
}

impl Config {
    /// Load configuration from `sensorhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("SENSORHUB_CONFIG").unwrap_or_else(|_| "sensorhub.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("SENSORHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("SENSORHUB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("SENSORHUB_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("SENSORHUB_PUBLIC_DIR") {
            self.server.public_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("SENSORHUB_SERIAL_MODE") {
            self.serial.mode = val.parse().map_err(ConfigError::Validation)?;
        }
        if let Ok(val) = std::env::var("SENSORHUB_SERIAL_BAUD") {
            if let Ok(baud) = val.parse() {
                self.serial.baud_rate = baud;
            }
        }
        if let Ok(val) = std::env::var("SENSORHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.provisioning.relay_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "provisioning relay_timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.serial.mode != SerialMode::Disabled && self.serial.baud_rate == 0 {
            return Err(ConfigError::Validation(
                "serial baud_rate must be non-zero".to_string(),
            ));
        }
        DeviceMatcher::from_config(&self.serial)
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        if let Some(origin) = self
            .cors
            .allowed_origins
            .iter()
            .find(|origin| origin.parse::<axum::http::HeaderValue>().is_err())
        {
            return Err(ConfigError::Validation(format!(
                "invalid CORS origin '{origin}'"
            )));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Sensor ids to register at startup.
    #[must_use]
    pub fn seed_ids(&self) -> Vec<SensorId> {
        self.registry.seed.iter().copied().map(SensorId::from).collect()
    }

    /// Upper bound on a single hardware relay.
    #[must_use]
    pub fn relay_timeout(&self) -> Duration {
        Duration::from_millis(self.provisioning.relay_timeout_ms)
    }

    /// Options handed to the HTTP router.
    ///
    /// A configured `public_dir` that does not exist is ignored.
    #[must_use]
    pub fn router_options(&self) -> RouterOptions {
        let public_dir = self.server.public_dir.clone().filter(|dir| {
            let exists = dir.is_dir();
            if !exists {
                tracing::warn!(path = %dir.display(), "public_dir not found, static files disabled");
            }
            exists
        });
        RouterOptions {
            allowed_origins: self.cors.allowed_origins.clone(),
            public_dir,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            public_dir: None,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://cdpn.io".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            relay_policy: RelayPolicyConfig::default(),
            relay_timeout_ms: u64::try_from(DEFAULT_RELAY_TIMEOUT.as_millis()).unwrap_or(5_000),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "sensorhubd=info,sensorhub=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
