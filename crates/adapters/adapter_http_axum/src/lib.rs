//! # sensorhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **REST JSON API** for the sensor registry (`/sensors`,
//!   `/sensor/{id}`) and WiFi provisioning (`/wifi`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results into `{message, ...}` envelopes and errors into
//!   `{error}` bodies with the matching status code
//! - Enforce the cross-origin allow-list and optionally serve a static
//!   directory
//!
//! ## Dependency rule
//! Depends on `sensorhub-app` (for port traits and services) and
//! `sensorhub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod cors;
pub mod error;
pub mod router;
pub mod state;
