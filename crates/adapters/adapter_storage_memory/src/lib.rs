//! # sensorhub-adapter-storage-memory
//!
//! In-memory persistence adapter.
//!
//! ## Responsibilities
//! - Implement the `SensorRepository` port defined in `sensorhub-app::ports::storage`
//! - Keep sensors in registration order for the lifetime of the process
//! - Enforce the unique-id invariant at insertion time
//!
//! State is lost on restart.
//!
//! ## Dependency rule
//! Depends on `sensorhub-app` (for port traits) and `sensorhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod sensor_repo;

pub use sensor_repo::InMemorySensorRepository;
