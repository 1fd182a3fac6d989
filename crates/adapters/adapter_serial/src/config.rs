//! Serial transport configuration.

use serde::Deserialize;

/// How the serial relay behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialMode {
    /// Never open a serial port.
    Disabled,
    /// Discover the device on first use; degrade gracefully without one.
    #[default]
    Auto,
    /// A device must be present at startup.
    Required,
}

impl std::str::FromStr for SerialMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" | "off" => Ok(Self::Disabled),
            "auto" => Ok(Self::Auto),
            "required" => Ok(Self::Required),
            other => Err(format!("unknown serial mode '{other}'")),
        }
    }
}

/// Configuration for the serial relay.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Relay mode.
    pub mode: SerialMode,
    /// USB vendor id to match, as hex (e.g. `"303A"` for Espressif).
    pub vendor_id: Option<String>,
    /// Case-insensitive substring matched against the USB manufacturer name.
    pub manufacturer_keyword: String,
    /// Line speed used when opening the port.
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            mode: SerialMode::Auto,
            vendor_id: Some("303A".to_string()),
            manufacturer_keyword: "Microsoft".to_string(),
            baud_rate: 9600,
        }
    }
}
