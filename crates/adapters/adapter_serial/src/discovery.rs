//! Device discovery — enumerate serial ports and pick the microcontroller.

use tokio_serial::{SerialPortInfo, SerialPortType};

use crate::config::SerialConfig;
use crate::error::SerialError;

/// A serial port as seen during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    pub path: String,
    pub manufacturer: Option<String>,
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
}

impl From<SerialPortInfo> for PortCandidate {
    fn from(info: SerialPortInfo) -> Self {
        match info.port_type {
            SerialPortType::UsbPort(usb) => Self {
                path: info.port_name,
                manufacturer: usb.manufacturer,
                vendor_id: Some(usb.vid),
                product_id: Some(usb.pid),
            },
            _ => Self {
                path: info.port_name,
                manufacturer: None,
                vendor_id: None,
                product_id: None,
            },
        }
    }
}

/// Rule deciding whether a port is the device we talk to.
///
/// A port matches when its manufacturer contains the keyword
/// (case-insensitive) **or** its vendor id equals the configured one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMatcher {
    vendor_id: Option<u16>,
    keyword: Option<String>,
}

impl DeviceMatcher {
    /// Build a matcher from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SerialError::InvalidVendorId`] when the vendor id is not hex.
    pub fn from_config(config: &SerialConfig) -> Result<Self, SerialError> {
        let vendor_id = config
            .vendor_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                let digits = raw
                    .strip_prefix("0x")
                    .or_else(|| raw.strip_prefix("0X"))
                    .unwrap_or(raw);
                u16::from_str_radix(digits, 16)
                    .map_err(|_| SerialError::InvalidVendorId(raw.to_string()))
            })
            .transpose()?;
        let keyword = Some(config.manufacturer_keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty());
        Ok(Self { vendor_id, keyword })
    }

    /// Returns `true` if the port belongs to the target device.
    #[must_use]
    pub fn matches(&self, port: &PortCandidate) -> bool {
        let by_manufacturer = match (&self.keyword, &port.manufacturer) {
            (Some(keyword), Some(manufacturer)) => {
                manufacturer.to_lowercase().contains(keyword.as_str())
            }
            _ => false,
        };
        let by_vendor = self.vendor_id.is_some() && self.vendor_id == port.vendor_id;
        by_manufacturer || by_vendor
    }

    /// First matching port, in enumeration order.
    #[must_use]
    pub fn select<'a>(&self, ports: &'a [PortCandidate]) -> Option<&'a PortCandidate> {
        ports.iter().find(|port| self.matches(port))
    }
}

/// Enumerate attached ports and return the first match.
///
/// Every port found is logged so operators can adjust the filter.
pub(crate) async fn discover(matcher: &DeviceMatcher) -> Result<PortCandidate, SerialError> {
    let ports = tokio::task::spawn_blocking(tokio_serial::available_ports)
        .await?
        .map_err(SerialError::Enumerate)?;
    let ports: Vec<PortCandidate> = ports.into_iter().map(PortCandidate::from).collect();

    if ports.is_empty() {
        tracing::info!("no serial ports found");
    }
    for port in &ports {
        tracing::info!(
            path = %port.path,
            manufacturer = port.manufacturer.as_deref().unwrap_or("unknown"),
            vendor_id = ?port.vendor_id.map(|vid| format!("{vid:04X}")),
            product_id = ?port.product_id.map(|pid| format!("{pid:04X}")),
            "serial port found"
        );
    }

    matcher
        .select(&ports)
        .cloned()
        .ok_or(SerialError::DeviceNotFound)
}
