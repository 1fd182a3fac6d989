//! # sensorhub-domain
//!
//! Pure domain model for the sensorhub service.
//!
//! ## Responsibilities
//! - Foundational types: sensor identifiers, error conventions, timestamps
//! - Define **Sensors** (client-registered IoT device records)
//! - Define **WiFi credentials** (the SSID/password pair distributed to sensors)
//! - Contain all invariant enforcement and merge rules
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod sensor;
pub mod wifi;
