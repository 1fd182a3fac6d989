//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod provisioning_service;
pub mod sensor_service;

#[cfg(test)]
pub(crate) mod test_support;
