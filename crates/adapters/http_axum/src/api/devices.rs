//! Device CRUD handlers.
//!
//! Every device travels as a flat JSON object whose `type` field names its
//! concrete kind (`SENSOR`, `HUMIDITY_SENSOR`, `LIGHT_SENSOR` or `ACTUATOR`).
//! Kind-specific fields that do not apply to that kind are left out.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use devicehub_app::ports::DeviceRepository;
use devicehub_domain::device::{Device, DeviceDraft, DeviceKind, DeviceType, LightType};
use devicehub_domain::error::{DeviceHubError, ValidationError};
use devicehub_domain::id::DeviceId;
use devicehub_domain::time::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or replacing a device.
///
/// Only `type` is required; every other field may be missing or `null`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
    #[serde(flatten)]
    pub kind: KindRequest,
}

/// Kind-specific part of a [`DeviceRequest`], selected by the `type` field.
///
/// The sensor leaves accept no fields: their tag and unit are fixed.
#[derive(Debug, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum KindRequest {
    Sensor {
        sensor_type: Option<String>,
        measurement_unit: Option<String>,
    },
    HumiditySensor {},
    LightSensor {
        light_type: Option<LightType>,
    },
    Actuator {
        actuator_type: Option<String>,
        state: Option<bool>,
        operation_mode: Option<String>,
    },
}

impl From<KindRequest> for DeviceKind {
    fn from(kind: KindRequest) -> Self {
        match kind {
            KindRequest::Sensor {
                sensor_type,
                measurement_unit,
            } => DeviceKind::sensor(sensor_type, measurement_unit),
            KindRequest::HumiditySensor {} => DeviceKind::humidity_sensor(),
            KindRequest::LightSensor { light_type } => DeviceKind::light_sensor(light_type),
            KindRequest::Actuator {
                actuator_type,
                state,
                operation_mode,
            } => DeviceKind::Actuator {
                actuator_type,
                state: state.unwrap_or(false),
                operation_mode,
            },
        }
    }
}

impl From<DeviceRequest> for DeviceDraft {
    fn from(req: DeviceRequest) -> Self {
        let mut builder = DeviceDraft::builder(req.kind.into());
        if let Some(name) = req.name {
            builder = builder.name(name);
        }
        if let Some(location) = req.location {
            builder = builder.location(location);
        }
        if let Some(description) = req.description {
            builder = builder.description(description);
        }
        if let Some(active) = req.active {
            builder = builder.active(active);
        }
        builder.build()
    }
}

/// Wire representation of a stored device.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: DeviceId,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub active: bool,
    #[serde(flatten)]
    pub kind: KindResponse,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Kind-specific fields of a [`DeviceResponse`].
#[derive(Debug, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum KindResponse {
    Light {
        sensor_type: Option<String>,
        measurement_unit: Option<String>,
        light_type: Option<LightType>,
    },
    Sensor {
        sensor_type: Option<String>,
        measurement_unit: Option<String>,
    },
    Actuator {
        actuator_type: Option<String>,
        state: bool,
        operation_mode: Option<String>,
    },
}

impl From<DeviceKind> for KindResponse {
    fn from(kind: DeviceKind) -> Self {
        let sensor_type = kind.sensor_type().map(str::to_string);
        let measurement_unit = kind.measurement_unit().map(str::to_string);
        match kind {
            DeviceKind::Sensor { .. } | DeviceKind::HumiditySensor => Self::Sensor {
                sensor_type,
                measurement_unit,
            },
            DeviceKind::LightSensor { light_type } => Self::Light {
                sensor_type,
                measurement_unit,
                light_type,
            },
            DeviceKind::Actuator {
                actuator_type,
                state,
                operation_mode,
            } => Self::Actuator {
                actuator_type,
                state,
                operation_mode,
            },
        }
    }
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        Self {
            id: device.id,
            device_type: device.device_type(),
            name: device.name,
            location: device.location,
            description: device.description,
            active: device.active,
            kind: device.kind.into(),
            created_at: device.created_at,
            updated_at: device.updated_at,
        }
    }
}

fn parse_id(raw: &str) -> Result<DeviceId, ApiError> {
    DeviceId::from_str(raw)
        .map_err(|_| DeviceHubError::from(ValidationError::InvalidId(raw.to_string())).into())
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<DeviceResponse>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => (StatusCode::OK, json).into_response(),
        }
    }
}

/// `GET /api/dispositivos`
pub async fn list<DR>(State(state): State<AppState<DR>>) -> Result<ListResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let devices = state.device_service.list_devices().await?;
    Ok(ListResponse::Ok(Json(
        devices.into_iter().map(DeviceResponse::from).collect(),
    )))
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<DeviceResponse>),
    NotFound,
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => (StatusCode::OK, json).into_response(),
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// `GET /api/dispositivos/{id}`
pub async fn get<DR>(
    State(state): State<AppState<DR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    Ok(match state.device_service.find_device(id).await? {
        Some(device) => GetResponse::Ok(Json(device.into())),
        None => GetResponse::NotFound,
    })
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Ok(Json<DeviceResponse>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => (StatusCode::OK, json).into_response(),
        }
    }
}

/// `POST /api/dispositivos`
pub async fn create<DR>(
    State(state): State<AppState<DR>>,
    Json(req): Json<DeviceRequest>,
) -> Result<CreateResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let device = state.device_service.create_device(req.into()).await?;
    Ok(CreateResponse::Ok(Json(device.into())))
}

/// Possible responses from the update endpoint.
pub enum UpdateResponse {
    Ok(Json<DeviceResponse>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => (StatusCode::OK, json).into_response(),
        }
    }
}

/// `PUT /api/dispositivos/{id}`
pub async fn update<DR>(
    State(state): State<AppState<DR>>,
    Path(id): Path<String>,
    Json(req): Json<DeviceRequest>,
) -> Result<UpdateResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let device = state.device_service.update_device(id, req.into()).await?;
    Ok(UpdateResponse::Ok(Json(device.into())))
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    Ok,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok => StatusCode::OK.into_response(),
        }
    }
}

/// `DELETE /api/dispositivos/{id}`
///
/// Succeeds whether or not the device existed.
pub async fn delete<DR>(
    State(state): State<AppState<DR>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    state.device_service.delete_device(id).await?;
    Ok(DeleteResponse::Ok)
}
