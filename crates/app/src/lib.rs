//! # sensorhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SensorRepository` — ordered storage of sensor records
//!   - `WifiRelay` — forwards WiFi credentials to attached hardware
//! - Define **driving/inbound ports** as use-case structs:
//!   - `SensorService` — the sensor registry (list, get, create, patch, delete)
//!   - `ProvisioningService` — set, read and clear the pending WiFi credential
//! - Own the **pending credential** shared by both services
//!
//! ## Dependency rule
//! Depends on `sensorhub-domain` only (plus `tokio::sync` for locking).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod pending;
pub mod ports;
pub mod services;
