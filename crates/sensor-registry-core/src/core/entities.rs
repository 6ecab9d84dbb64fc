// crates/sensor-registry-core/src/core/entities.rs
// ============================================================================
// Module: Sensor Registry Entities
// Description: Validated sensor-type, sensor, and reading value records.
// Purpose: Provide immutable strongly typed entities with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Entities are produced only by successful validation and are immutable
//! value records; a record with the same key wholesale-replaces its
//! predecessor, never a partial field edit. Wire forms use camelCase field
//! names. [`SensorType::to_flat`] and friends project entities back onto the
//! flat `string -> string` presentation boundary; that projection must
//! re-validate successfully.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::core::requests::FlatReq;

// ============================================================================
// SECTION: Interval
// ============================================================================

/// An inclusive numeric range.
///
/// # Invariants
/// - `min < max`; enforced at validation boundaries, never re-checked here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl Interval {
    /// Creates an interval without validating the bound order.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true when `value` lies within the inclusive bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Returns true when `inner` is fully contained in this interval.
    #[must_use]
    pub fn encloses(&self, inner: &Self) -> bool {
        self.min <= inner.min && inner.max <= self.max
    }
}

// ============================================================================
// SECTION: Quantity
// ============================================================================

/// Enumerated unit category measured by a sensor type.
///
/// # Invariants
/// - Wire form is the lowercase category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    /// Temperature measurements.
    Temperature,
    /// Pressure measurements.
    Pressure,
    /// Flow-rate measurements.
    Flow,
    /// Relative-humidity measurements.
    Humidity,
}

impl Quantity {
    /// Returns the lowercase wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
            Self::Flow => "flow",
            Self::Humidity => "humidity",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown quantity name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownQuantity(
    /// The rejected input.
    pub String,
);

impl fmt::Display for UnknownQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown quantity \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownQuantity {}

impl FromStr for Quantity {
    type Err = UnknownQuantity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(Self::Temperature),
            "pressure" => Ok(Self::Pressure),
            "flow" => Ok(Self::Flow),
            "humidity" => Ok(Self::Humidity),
            other => Err(UnknownQuantity(other.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Sensor Type
// ============================================================================

/// A class of sensor hardware with physical measurement limits.
///
/// # Invariants
/// - `id` is the unique key within the sensor-type collection.
/// - `limits.min < limits.max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorType {
    /// Unique sensor-type identifier.
    pub id: String,
    /// Hardware manufacturer name.
    pub manufacturer: String,
    /// Manufacturer model number.
    pub model_number: String,
    /// Measured unit category.
    pub quantity: Quantity,
    /// Measurement unit label.
    pub unit: String,
    /// Physical measurement limits.
    pub limits: Interval,
}

impl SensorType {
    /// Projects the entity onto the flat presentation boundary.
    #[must_use]
    pub fn to_flat(&self) -> FlatReq {
        let mut flat = FlatReq::new();
        flat.insert("id".to_string(), self.id.clone());
        flat.insert("manufacturer".to_string(), self.manufacturer.clone());
        flat.insert("modelNumber".to_string(), self.model_number.clone());
        flat.insert("quantity".to_string(), self.quantity.as_str().to_string());
        flat.insert("unit".to_string(), self.unit.clone());
        flat.insert("min".to_string(), format_number(self.limits.min));
        flat.insert("max".to_string(), format_number(self.limits.max));
        flat
    }
}

// ============================================================================
// SECTION: Sensor
// ============================================================================

/// A deployed instance of a sensor type with a narrower expected range.
///
/// # Invariants
/// - `id` is the unique key within the sensor collection.
/// - `sensor_type_id` references an existing [`SensorType`].
/// - `expected` is well formed and contained in the referenced type's limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    /// Unique sensor identifier.
    pub id: String,
    /// Identifier of the owning sensor type.
    pub sensor_type_id: String,
    /// Expected operating range.
    pub expected: Interval,
}

impl Sensor {
    /// Projects the entity onto the flat presentation boundary.
    #[must_use]
    pub fn to_flat(&self) -> FlatReq {
        let mut flat = FlatReq::new();
        flat.insert("id".to_string(), self.id.clone());
        flat.insert("sensorTypeId".to_string(), self.sensor_type_id.clone());
        flat.insert("min".to_string(), format_number(self.expected.min));
        flat.insert("max".to_string(), format_number(self.expected.max));
        flat
    }
}

// ============================================================================
// SECTION: Sensor Reading
// ============================================================================

/// A timestamped numeric observation from a sensor.
///
/// # Invariants
/// - `(sensor_id, timestamp)` is the unique key within the reading
///   collection.
/// - `sensor_id` references an existing [`Sensor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    /// Identifier of the observed sensor.
    pub sensor_id: String,
    /// Logical clock or epoch timestamp.
    pub timestamp: i64,
    /// Observed value.
    pub value: f64,
}

impl SensorReading {
    /// Projects the entity onto the flat presentation boundary.
    #[must_use]
    pub fn to_flat(&self) -> FlatReq {
        let mut flat = FlatReq::new();
        flat.insert("sensorId".to_string(), self.sensor_id.clone());
        flat.insert("timestamp".to_string(), self.timestamp.to_string());
        flat.insert("value".to_string(), format_number(self.value));
        flat
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Formats a numeric field for the flat boundary.
///
/// `Display` for `f64` emits the shortest form that parses back to the
/// identical value, which is exactly the round-trip the boundary needs.
fn format_number(value: f64) -> String {
    format!("{value}")
}
