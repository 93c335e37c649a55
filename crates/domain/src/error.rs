//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`DeviceHubError`] via `#[from]`.

use crate::device::DeviceType;

/// Top-level error returned by services and ports.
#[derive(Debug, thiserror::Error)]
pub enum DeviceHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Opaque failure raised by a storage adapter.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A request could not be bound to domain types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid device id: {0:?}")]
    InvalidId(String),

    /// Updates may not change the concrete kind of a device.
    #[error("cannot change device type from {expected} to {actual}")]
    KindMismatch {
        expected: DeviceType,
        actual: DeviceType,
    },
}

/// No record exists for the requested identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
