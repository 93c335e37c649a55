//! Device service: use-cases for managing devices.

use devicehub_domain::device::{Device, DeviceDraft};
use devicehub_domain::error::{DeviceHubError, NotFoundError};
use devicehub_domain::id::DeviceId;
use devicehub_domain::time::now;

use crate::ports::DeviceRepository;

/// Application service for device CRUD operations.
pub struct DeviceService<R> {
    repo: R,
}

fn not_found(id: DeviceId) -> DeviceHubError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// List all devices in persistence order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_devices(&self) -> Result<Vec<Device>, DeviceHubError> {
        self.repo.get_all().await
    }

    /// Look up a device by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn find_device(&self, id: DeviceId) -> Result<Option<Device>, DeviceHubError> {
        self.repo.get_by_id(id).await
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceHubError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: DeviceId) -> Result<Device, DeviceHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// Persist a new device; storage assigns the id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, draft), fields(device_name = %draft.name, device_type = %draft.device_type()))]
    pub async fn create_device(&self, draft: DeviceDraft) -> Result<Device, DeviceHubError> {
        let device = self.repo.create(draft, now()).await?;
        tracing::debug!(device_id = %device.id, "device created");
        Ok(device)
    }

    /// Overwrite the mutable fields of an existing device.
    ///
    /// The device keeps its id, creation time and concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceHubError::NotFound`] when no device with `id` exists,
    /// [`DeviceHubError::Validation`] when `draft` is of another device type,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self, draft))]
    pub async fn update_device(
        &self,
        id: DeviceId,
        draft: DeviceDraft,
    ) -> Result<Device, DeviceHubError> {
        let existing = self.get_device(id).await?;
        let updated = existing.apply(draft, now())?;
        self.repo.update(updated).await
    }

    /// Delete a device by id. Missing ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_device(&self, id: DeviceId) -> Result<(), DeviceHubError> {
        self.repo.delete(id).await
    }
}
