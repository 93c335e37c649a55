//! Device: a managed sensor or actuator.
//!
//! A [`DeviceDraft`] is what a client submits: every mutable field but no
//! identity. Storage turns a draft into a [`Device`] by assigning an id.

mod kind;

pub use kind::{
    DeviceKind, DeviceType, HUMIDITY_SENSOR_TYPE, HUMIDITY_UNIT, LIGHT_SENSOR_TYPE, LIGHT_UNIT,
    LightType, UnknownVariant,
};

use crate::error::{DeviceHubError, ValidationError};
use crate::id::DeviceId;
use crate::time::Timestamp;

/// A persisted device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub active: bool,
    pub kind: DeviceKind,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Device {
    /// Materialize a draft that storage has just assigned `id` to.
    #[must_use]
    pub fn from_draft(id: DeviceId, draft: DeviceDraft, created_at: Timestamp) -> Self {
        Self {
            id,
            name: draft.name,
            location: draft.location,
            description: draft.description,
            active: draft.active,
            kind: draft.kind,
            created_at,
            updated_at: created_at,
        }
    }

    #[must_use]
    pub fn device_type(&self) -> DeviceType {
        self.kind.device_type()
    }

    /// Overwrite every mutable field with the draft's values.
    ///
    /// `id` and `created_at` are preserved and `updated_at` is set to `at`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::KindMismatch`] when the draft describes a
    /// different kind of device.
    pub fn apply(self, draft: DeviceDraft, at: Timestamp) -> Result<Self, DeviceHubError> {
        let expected = self.device_type();
        let actual = draft.kind.device_type();
        if expected != actual {
            return Err(ValidationError::KindMismatch { expected, actual }.into());
        }
        Ok(Self {
            id: self.id,
            name: draft.name,
            location: draft.location,
            description: draft.description,
            active: draft.active,
            kind: draft.kind,
            created_at: self.created_at,
            updated_at: at,
        })
    }
}

/// Device representation without identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDraft {
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub active: bool,
    pub kind: DeviceKind,
}

impl DeviceDraft {
    /// Create a builder for a draft of the given kind.
    #[must_use]
    pub fn builder(kind: DeviceKind) -> DeviceDraftBuilder {
        DeviceDraftBuilder {
            name: None,
            location: None,
            description: None,
            active: None,
            kind,
        }
    }

    #[must_use]
    pub fn device_type(&self) -> DeviceType {
        self.kind.device_type()
    }
}

/// Step-by-step builder for [`DeviceDraft`].
#[derive(Debug)]
pub struct DeviceDraftBuilder {
    name: Option<String>,
    location: Option<String>,
    description: Option<String>,
    active: Option<bool>,
    kind: DeviceKind,
}

impl DeviceDraftBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Consume the builder. Devices are active unless told otherwise.
    #[must_use]
    pub fn build(self) -> DeviceDraft {
        DeviceDraft {
            name: self.name.unwrap_or_default(),
            location: self.location,
            description: self.description,
            active: self.active.unwrap_or(true),
            kind: self.kind,
        }
    }
}
