//! `SQLite` implementation of [`DeviceRepository`].
//!
//! Devices are stored one table per level of the taxonomy: `devices` holds the
//! common fields and a `device_type` discriminator, `sensors`/`actuators` hold
//! the kind fields and `light_sensors`/`humidity_sensors` the leaf rows. All
//! of them share the device id.

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use devicehub_app::ports::DeviceRepository;
use devicehub_domain::device::{Device, DeviceDraft, DeviceKind, DeviceType, LightType};
use devicehub_domain::error::{DeviceHubError, NotFoundError};
use devicehub_domain::id::DeviceId;
use devicehub_domain::time::Timestamp;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }
}

fn decode<T, E>(value: Result<T, E>) -> Result<T, sqlx::Error>
where
    E: std::error::Error + Send + Sync + 'static,
{
    value.map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    decode(chrono::DateTime::parse_from_rfc3339(value)).map(|ts| ts.to_utc())
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let device_type: String = row.try_get("device_type")?;
        let name: String = row.try_get("name")?;
        let location: Option<String> = row.try_get("location")?;
        let description: Option<String> = row.try_get("description")?;
        let active: bool = row.try_get("active")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let kind = match decode(DeviceType::from_str(&device_type))? {
            DeviceType::Sensor => DeviceKind::Sensor {
                sensor_type: row.try_get("sensor_type")?,
                measurement_unit: row.try_get("measurement_unit")?,
            },
            DeviceType::HumiditySensor => DeviceKind::HumiditySensor,
            DeviceType::LightSensor => {
                let light_type: Option<String> = row.try_get("light_type")?;
                DeviceKind::LightSensor {
                    light_type: decode(light_type.as_deref().map(LightType::from_str).transpose())?,
                }
            }
            DeviceType::Actuator => {
                let state: Option<bool> = row.try_get("state")?;
                DeviceKind::Actuator {
                    actuator_type: row.try_get("actuator_type")?,
                    state: state.unwrap_or(false),
                    operation_mode: row.try_get("operation_mode")?,
                }
            }
        };

        Ok(Self(Device {
            id: DeviceId::from_raw(id),
            name,
            location,
            description,
            active,
            kind,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO devices (device_type, name, location, description, active, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const INSERT_SENSOR: &str =
    "INSERT INTO sensors (device_id, sensor_type, measurement_unit) VALUES (?, ?, ?)";
const INSERT_HUMIDITY_SENSOR: &str = "INSERT INTO humidity_sensors (device_id) VALUES (?)";
const INSERT_LIGHT_SENSOR: &str = "INSERT INTO light_sensors (device_id, light_type) VALUES (?, ?)";
const INSERT_ACTUATOR: &str = r"
    INSERT INTO actuators (device_id, actuator_type, state, operation_mode)
    VALUES (?, ?, ?, ?)
";
const SELECT: &str = r"
    SELECT d.*, s.sensor_type, s.measurement_unit, l.light_type,
           a.actuator_type, a.state, a.operation_mode
    FROM devices d
    LEFT JOIN sensors s ON s.device_id = d.id
    LEFT JOIN light_sensors l ON l.device_id = d.id
    LEFT JOIN actuators a ON a.device_id = d.id
";
const UPDATE: &str = r"
    UPDATE devices
    SET device_type = ?, name = ?, location = ?, description = ?, active = ?, updated_at = ?
    WHERE id = ?
";
const DELETE_SENSOR: &str = "DELETE FROM sensors WHERE device_id = ?";
const DELETE_ACTUATOR: &str = "DELETE FROM actuators WHERE device_id = ?";
const DELETE_BY_ID: &str = "DELETE FROM devices WHERE id = ?";

/// Insert the kind-specific rows for device `id`.
async fn insert_kind(
    conn: &mut SqliteConnection,
    id: i64,
    kind: &DeviceKind,
) -> Result<(), sqlx::Error> {
    if kind.is_sensor() {
        sqlx::query(INSERT_SENSOR)
            .bind(id)
            .bind(kind.sensor_type())
            .bind(kind.measurement_unit())
            .execute(&mut *conn)
            .await?;
    }

    match kind {
        DeviceKind::Sensor { .. } => {}
        DeviceKind::HumiditySensor => {
            sqlx::query(INSERT_HUMIDITY_SENSOR)
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }
        DeviceKind::LightSensor { light_type } => {
            sqlx::query(INSERT_LIGHT_SENSOR)
                .bind(id)
                .bind(light_type.map(LightType::as_str))
                .execute(&mut *conn)
                .await?;
        }
        DeviceKind::Actuator {
            actuator_type,
            state,
            operation_mode,
        } => {
            sqlx::query(INSERT_ACTUATOR)
                .bind(id)
                .bind(actuator_type.as_deref())
                .bind(*state)
                .bind(operation_mode.as_deref())
                .execute(&mut *conn)
                .await?;
        }
    }

    Ok(())
}

/// `SQLite`-backed device repository.
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    fn create(
        &self,
        draft: DeviceDraft,
        created_at: Timestamp,
    ) -> impl Future<Output = Result<Device, DeviceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            let id = sqlx::query(INSERT)
                .bind(draft.device_type().as_str())
                .bind(&draft.name)
                .bind(&draft.location)
                .bind(&draft.description)
                .bind(draft.active)
                .bind(created_at.to_rfc3339())
                .bind(created_at.to_rfc3339())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?
                .last_insert_rowid();

            insert_kind(&mut tx, id, &draft.kind)
                .await
                .map_err(StorageError::from)?;

            tx.commit().await.map_err(StorageError::from)?;

            Ok(Device::from_draft(DeviceId::from_raw(id), draft, created_at))
        }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, DeviceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(&format!("{SELECT} WHERE d.id = ?"))
                .bind(id.as_raw())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, DeviceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(&format!("{SELECT} ORDER BY d.id"))
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        device: Device,
    ) -> impl Future<Output = Result<Device, DeviceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let id = device.id.as_raw();
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            let result = sqlx::query(UPDATE)
                .bind(device.device_type().as_str())
                .bind(&device.name)
                .bind(&device.location)
                .bind(&device.description)
                .bind(device.active)
                .bind(device.updated_at.to_rfc3339())
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError {
                    entity: "Device",
                    id: device.id.to_string(),
                }
                .into());
            }

            // Kind rows are replaced wholesale; the leaf tables cascade from `sensors`.
            for statement in [DELETE_SENSOR, DELETE_ACTUATOR] {
                sqlx::query(statement)
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
            }
            insert_kind(&mut tx, id, &device.kind)
                .await
                .map_err(StorageError::from)?;

            tx.commit().await.map_err(StorageError::from)?;

            Ok(device)
        }
    }

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), DeviceHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id.as_raw())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
