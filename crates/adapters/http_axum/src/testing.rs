//! In-memory repository shared by the handler tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use devicehub_app::ports::DeviceRepository;
use devicehub_app::services::device_service::DeviceService;
use devicehub_domain::device::{Device, DeviceDraft};
use devicehub_domain::error::{DeviceHubError, NotFoundError};
use devicehub_domain::id::DeviceId;
use devicehub_domain::time::Timestamp;

use crate::state::AppState;

#[derive(Default)]
pub struct InMemoryDeviceRepo {
    inner: Mutex<(i64, BTreeMap<DeviceId, Device>)>,
}

impl DeviceRepository for InMemoryDeviceRepo {
    async fn create(
        &self,
        draft: DeviceDraft,
        created_at: Timestamp,
    ) -> Result<Device, DeviceHubError> {
        let mut guard = self.inner.lock().unwrap();
        guard.0 += 1;
        let device = Device::from_draft(DeviceId::from_raw(guard.0), draft, created_at);
        guard.1.insert(device.id, device.clone());
        Ok(device)
    }

    async fn get_by_id(&self, id: DeviceId) -> Result<Option<Device>, DeviceHubError> {
        Ok(self.inner.lock().unwrap().1.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Device>, DeviceHubError> {
        Ok(self.inner.lock().unwrap().1.values().cloned().collect())
    }

    async fn update(&self, device: Device) -> Result<Device, DeviceHubError> {
        let mut guard = self.inner.lock().unwrap();
        match guard.1.get_mut(&device.id) {
            Some(slot) => {
                *slot = device.clone();
                Ok(device)
            }
            None => Err(NotFoundError {
                entity: "Device",
                id: device.id.to_string(),
            }
            .into()),
        }
    }

    async fn delete(&self, id: DeviceId) -> Result<(), DeviceHubError> {
        self.inner.lock().unwrap().1.remove(&id);
        Ok(())
    }
}

pub fn test_state() -> AppState<InMemoryDeviceRepo> {
    AppState::new(DeviceService::new(InMemoryDeviceRepo::default()))
}
