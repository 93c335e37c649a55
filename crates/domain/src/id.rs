//! Typed identifier for devices.
//!
//! Identifiers are assigned by the persistence layer when a device is
//! first stored, so they wrap the database's integer key rather than a
//! client-generated value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a [`Device`](crate::device::Device).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(i64);

impl DeviceId {
    /// Wrap a raw key handed out by storage.
    #[must_use]
    pub fn from_raw(value: i64) -> Self {
        Self(value)
    }

    /// Access the inner key.
    #[must_use]
    pub fn as_raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DeviceId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
