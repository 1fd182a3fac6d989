//! # sensorhub-adapter-serial
//!
//! Serial transport adapter — relays WiFi credentials to a microcontroller
//! attached over USB serial.
//!
//! ## How it works
//!
//! 1. **Discover**: enumerate serial ports and pick the first one whose USB
//!    manufacturer contains the configured keyword or whose vendor id matches.
//! 2. **Connect**: open that port once, lazily on first use, and cache the
//!    outcome for the lifetime of the process. A missing device is cached as
//!    [`Transport::Unavailable`] and never retried.
//! 3. **Send**: write each credential as a single JSON object followed by `\n`.
//!
//! ## Modes
//!
//! | Mode | Behaviour |
//! |------|-----------|
//! | `disabled` | Never touches serial ports; every relay reports unavailable |
//! | `auto` | Discovers lazily; no device means state-only provisioning |
//! | `required` | The composition root connects at startup and aborts without a device |
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `sensorhub-app` and `sensorhub-domain`.

mod codec;
mod config;
mod discovery;
mod error;
mod transport;

pub use config::{SerialConfig, SerialMode};
pub use discovery::{DeviceMatcher, PortCandidate};
pub use error::SerialError;
pub use transport::{SerialRelay, Transport};
