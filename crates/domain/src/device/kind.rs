//! Device kinds: the closed set of concrete device types.
//!
//! ```text
//! Device
//! ├── Sensor
//! │   ├── HumiditySensor   (HUMIDITY, %)
//! │   └── LightSensor      (LIGHT, lux, + light type)
//! └── Actuator             (state starts off)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sensor type tag reported by every [`DeviceKind::HumiditySensor`].
pub const HUMIDITY_SENSOR_TYPE: &str = "HUMIDITY";
/// Measurement unit reported by every [`DeviceKind::HumiditySensor`].
pub const HUMIDITY_UNIT: &str = "%";
/// Sensor type tag reported by every [`DeviceKind::LightSensor`].
pub const LIGHT_SENSOR_TYPE: &str = "LIGHT";
/// Measurement unit reported by every [`DeviceKind::LightSensor`].
pub const LIGHT_UNIT: &str = "lux";

/// Discriminator naming the concrete kind of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Sensor,
    HumiditySensor,
    LightSensor,
    Actuator,
}

impl DeviceType {
    /// Stable string form, shared by the wire format and storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sensor => "SENSOR",
            Self::HumiditySensor => "HUMIDITY_SENSOR",
            Self::LightSensor => "LIGHT_SENSOR",
            Self::Actuator => "ACTUATOR",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known [`DeviceType`] or [`LightType`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {what}: {value:?}")]
pub struct UnknownVariant {
    pub what: &'static str,
    pub value: String,
}

impl FromStr for DeviceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SENSOR" => Ok(Self::Sensor),
            "HUMIDITY_SENSOR" => Ok(Self::HumiditySensor),
            "LIGHT_SENSOR" => Ok(Self::LightSensor),
            "ACTUATOR" => Ok(Self::Actuator),
            other => Err(UnknownVariant {
                what: "device type",
                value: other.to_string(),
            }),
        }
    }
}

/// Spectrum measured by a light sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightType {
    Visible,
    Uv,
    Ir,
}

impl LightType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "VISIBLE",
            Self::Uv => "UV",
            Self::Ir => "IR",
        }
    }
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LightType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VISIBLE" => Ok(Self::Visible),
            "UV" => Ok(Self::Uv),
            "IR" => Ok(Self::Ir),
            other => Err(UnknownVariant {
                what: "light type",
                value: other.to_string(),
            }),
        }
    }
}

/// Kind-specific payload of a device.
///
/// The sensor leaves do not store their type tag or unit: both are derived
/// from the variant, so they always match the fixed defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceKind {
    /// A generic sensor with caller-provided tag and unit.
    Sensor {
        sensor_type: Option<String>,
        measurement_unit: Option<String>,
    },
    HumiditySensor,
    LightSensor { light_type: Option<LightType> },
    Actuator {
        actuator_type: Option<String>,
        state: bool,
        operation_mode: Option<String>,
    },
}

impl DeviceKind {
    /// A generic sensor.
    #[must_use]
    pub fn sensor(sensor_type: Option<String>, measurement_unit: Option<String>) -> Self {
        Self::Sensor {
            sensor_type,
            measurement_unit,
        }
    }

    /// A humidity sensor (`HUMIDITY`, `%`).
    #[must_use]
    pub fn humidity_sensor() -> Self {
        Self::HumiditySensor
    }

    /// A light sensor (`LIGHT`, `lux`) measuring the given spectrum.
    #[must_use]
    pub fn light_sensor(light_type: Option<LightType>) -> Self {
        Self::LightSensor { light_type }
    }

    /// An actuator, initially switched off.
    #[must_use]
    pub fn actuator(actuator_type: Option<String>, operation_mode: Option<String>) -> Self {
        Self::Actuator {
            actuator_type,
            state: false,
            operation_mode,
        }
    }

    #[must_use]
    pub fn device_type(&self) -> DeviceType {
        match self {
            Self::Sensor { .. } => DeviceType::Sensor,
            Self::HumiditySensor => DeviceType::HumiditySensor,
            Self::LightSensor { .. } => DeviceType::LightSensor,
            Self::Actuator { .. } => DeviceType::Actuator,
        }
    }

    /// Whether this kind is a sensor (generic or leaf).
    #[must_use]
    pub fn is_sensor(&self) -> bool {
        !matches!(self, Self::Actuator { .. })
    }

    /// Sensor type tag, `None` for actuators.
    #[must_use]
    pub fn sensor_type(&self) -> Option<&str> {
        match self {
            Self::Sensor { sensor_type, .. } => sensor_type.as_deref(),
            Self::HumiditySensor => Some(HUMIDITY_SENSOR_TYPE),
            Self::LightSensor { .. } => Some(LIGHT_SENSOR_TYPE),
            Self::Actuator { .. } => None,
        }
    }

    /// Measurement unit, `None` for actuators.
    #[must_use]
    pub fn measurement_unit(&self) -> Option<&str> {
        match self {
            Self::Sensor {
                measurement_unit, ..
            } => measurement_unit.as_deref(),
            Self::HumiditySensor => Some(HUMIDITY_UNIT),
            Self::LightSensor { .. } => Some(LIGHT_UNIT),
            Self::Actuator { .. } => None,
        }
    }
}
