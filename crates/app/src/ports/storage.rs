//! Storage port: repository traits for persistence.

use std::future::Future;

use devicehub_domain::device::{Device, DeviceDraft};
use devicehub_domain::error::DeviceHubError;
use devicehub_domain::id::DeviceId;
use devicehub_domain::time::Timestamp;

/// Repository for persisting and querying [`Device`]s.
pub trait DeviceRepository {
    /// Store a new device, assigning its identifier.
    ///
    /// `created_at` becomes both the creation and last-update time.
    fn create(
        &self,
        draft: DeviceDraft,
        created_at: Timestamp,
    ) -> impl Future<Output = Result<Device, DeviceHubError>> + Send;

    /// Get a device by its unique identifier.
    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, DeviceHubError>> + Send;

    /// Get all devices, in the order they were stored.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, DeviceHubError>> + Send;

    /// Overwrite an existing device.
    fn update(&self, device: Device) -> impl Future<Output = Result<Device, DeviceHubError>> + Send;

    /// Delete a device by its unique identifier. Deleting a missing id is not an error.
    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), DeviceHubError>> + Send;
}
