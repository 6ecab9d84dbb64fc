// crates/sensor-registry-core/src/core/requests.rs
// ============================================================================
// Module: Sensor Registry Requests
// Description: Typed add/find request records parsed from flat string maps.
// Purpose: Replace dynamic string-keyed payloads with explicit per-entity
//          request structs ahead of validation.
// Dependencies: serde, crate::core::validate
// ============================================================================

//! ## Overview
//! The presentation boundary speaks flat `string -> string` maps
//! ([`FlatReq`]). Each add/find operation owns an explicit request struct
//! with optional raw fields; `from_flat` performs the boundary conversion.
//! Add requests ignore unrecognized keys, find requests reject them. Empty
//! string values are treated as absent in both directions, matching the
//! form-submission boundary this registry serves.
//!
//! Coercion and semantic checks live in [`crate::core::validate`]; the
//! structs here deliberately keep every field as an unparsed string.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::errors::ErrorKind;
use crate::core::errors::RegistryError;
use crate::core::errors::RegistryErrors;
use crate::core::errors::RegistryResult;
use crate::core::validate::FieldRule;
use crate::core::validate::READING_FIND_RULES;
use crate::core::validate::SENSOR_FIND_RULES;
use crate::core::validate::SENSOR_TYPE_FIND_RULES;

// ============================================================================
// SECTION: Flat Boundary
// ============================================================================

/// Flat field-name to string-value mapping used at the boundary.
pub type FlatReq = BTreeMap<String, String>;

/// Returns the trimmed-to-absent view of a flat value.
///
/// Empty strings come from unfilled form widgets and count as missing.
fn non_empty(flat: &FlatReq, key: &str) -> Option<String> {
    flat.get(key).filter(|value| !value.is_empty()).cloned()
}

/// Collects unknown-key failures for a find request against its rule table.
fn reject_unknown_keys(flat: &FlatReq, rules: &[FieldRule]) -> Vec<RegistryError> {
    flat.iter()
        .filter(|(_, value)| !value.is_empty())
        .filter(|(key, _)| !rules.iter().any(|rule| rule.name == key.as_str()))
        .map(|(key, _)| {
            RegistryError::for_field(
                ErrorKind::BadVal,
                key.clone(),
                format!("unknown filter field \"{key}\""),
            )
        })
        .collect()
}

// ============================================================================
// SECTION: Add Requests
// ============================================================================

/// Raw request to add or replace a sensor type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorTypeAdd {
    /// Unique sensor-type identifier.
    pub id: Option<String>,
    /// Hardware manufacturer name.
    pub manufacturer: Option<String>,
    /// Manufacturer model number.
    pub model_number: Option<String>,
    /// Measured unit category.
    pub quantity: Option<String>,
    /// Measurement unit label.
    pub unit: Option<String>,
    /// Lower physical limit.
    pub min: Option<String>,
    /// Upper physical limit.
    pub max: Option<String>,
}

impl SensorTypeAdd {
    /// Parses a flat request, ignoring unrecognized keys.
    #[must_use]
    pub fn from_flat(flat: &FlatReq) -> Self {
        Self {
            id: non_empty(flat, "id"),
            manufacturer: non_empty(flat, "manufacturer"),
            model_number: non_empty(flat, "modelNumber"),
            quantity: non_empty(flat, "quantity"),
            unit: non_empty(flat, "unit"),
            min: non_empty(flat, "min"),
            max: non_empty(flat, "max"),
        }
    }

    /// Returns the raw value for a rule-table field name.
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "manufacturer" => self.manufacturer.as_deref(),
            "modelNumber" => self.model_number.as_deref(),
            "quantity" => self.quantity.as_deref(),
            "unit" => self.unit.as_deref(),
            "min" => self.min.as_deref(),
            "max" => self.max.as_deref(),
            _ => None,
        }
    }
}

/// Raw request to add or replace a sensor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorAdd {
    /// Unique sensor identifier.
    pub id: Option<String>,
    /// Identifier of the owning sensor type.
    pub sensor_type_id: Option<String>,
    /// Lower expected bound.
    pub min: Option<String>,
    /// Upper expected bound.
    pub max: Option<String>,
}

impl SensorAdd {
    /// Parses a flat request, ignoring unrecognized keys.
    #[must_use]
    pub fn from_flat(flat: &FlatReq) -> Self {
        Self {
            id: non_empty(flat, "id"),
            sensor_type_id: non_empty(flat, "sensorTypeId"),
            min: non_empty(flat, "min"),
            max: non_empty(flat, "max"),
        }
    }

    /// Returns the raw value for a rule-table field name.
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "sensorTypeId" => self.sensor_type_id.as_deref(),
            "min" => self.min.as_deref(),
            "max" => self.max.as_deref(),
            _ => None,
        }
    }
}

/// Raw request to add or replace a sensor reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadingAdd {
    /// Identifier of the observed sensor.
    pub sensor_id: Option<String>,
    /// Reading timestamp.
    pub timestamp: Option<String>,
    /// Reading value.
    pub value: Option<String>,
}

impl SensorReadingAdd {
    /// Parses a flat request, ignoring unrecognized keys.
    #[must_use]
    pub fn from_flat(flat: &FlatReq) -> Self {
        Self {
            sensor_id: non_empty(flat, "sensorId"),
            timestamp: non_empty(flat, "timestamp"),
            value: non_empty(flat, "value"),
        }
    }

    /// Returns the raw value for a rule-table field name.
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        match name {
            "sensorId" => self.sensor_id.as_deref(),
            "timestamp" => self.timestamp.as_deref(),
            "value" => self.value.as_deref(),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Find Requests
// ============================================================================

/// Raw filter request over sensor types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorTypeFind {
    /// Exact-match sensor-type identifier.
    pub id: Option<String>,
    /// Exact-match manufacturer filter.
    pub manufacturer: Option<String>,
    /// Exact-match model-number filter.
    pub model_number: Option<String>,
    /// Exact-match quantity filter.
    pub quantity: Option<String>,
    /// Exact-match unit filter.
    pub unit: Option<String>,
}

impl SensorTypeFind {
    /// Parses a flat filter request, rejecting unrecognized keys.
    ///
    /// # Errors
    ///
    /// Returns `BAD_VAL` errors, one per unrecognized key.
    pub fn from_flat(flat: &FlatReq) -> RegistryResult<Self> {
        let unknown = reject_unknown_keys(flat, SENSOR_TYPE_FIND_RULES);
        if !unknown.is_empty() {
            return Err(RegistryErrors { errors: unknown });
        }
        Ok(Self {
            id: non_empty(flat, "id"),
            manufacturer: non_empty(flat, "manufacturer"),
            model_number: non_empty(flat, "modelNumber"),
            quantity: non_empty(flat, "quantity"),
            unit: non_empty(flat, "unit"),
        })
    }

    /// Returns the raw value for a rule-table field name.
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "manufacturer" => self.manufacturer.as_deref(),
            "modelNumber" => self.model_number.as_deref(),
            "quantity" => self.quantity.as_deref(),
            "unit" => self.unit.as_deref(),
            _ => None,
        }
    }
}

/// Raw filter request over sensors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorFind {
    /// Exact-match sensor identifier.
    pub id: Option<String>,
    /// Exact-match owning sensor-type filter.
    pub sensor_type_id: Option<String>,
}

impl SensorFind {
    /// Parses a flat filter request, rejecting unrecognized keys.
    ///
    /// # Errors
    ///
    /// Returns `BAD_VAL` errors, one per unrecognized key.
    pub fn from_flat(flat: &FlatReq) -> RegistryResult<Self> {
        let unknown = reject_unknown_keys(flat, SENSOR_FIND_RULES);
        if !unknown.is_empty() {
            return Err(RegistryErrors { errors: unknown });
        }
        Ok(Self {
            id: non_empty(flat, "id"),
            sensor_type_id: non_empty(flat, "sensorTypeId"),
        })
    }

    /// Returns the raw value for a rule-table field name.
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "sensorTypeId" => self.sensor_type_id.as_deref(),
            _ => None,
        }
    }
}

/// Raw filter request over sensor readings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadingFind {
    /// Identifier of the sensor whose readings are requested.
    pub sensor_id: Option<String>,
    /// Inclusive lower bound on `value`.
    pub min_value: Option<String>,
    /// Inclusive upper bound on `value`.
    pub max_value: Option<String>,
    /// Inclusive lower bound on `timestamp`.
    pub min_timestamp: Option<String>,
    /// Inclusive upper bound on `timestamp`.
    pub max_timestamp: Option<String>,
}

impl SensorReadingFind {
    /// Parses a flat filter request, rejecting unrecognized keys.
    ///
    /// # Errors
    ///
    /// Returns `BAD_VAL` errors, one per unrecognized key.
    pub fn from_flat(flat: &FlatReq) -> RegistryResult<Self> {
        let unknown = reject_unknown_keys(flat, READING_FIND_RULES);
        if !unknown.is_empty() {
            return Err(RegistryErrors { errors: unknown });
        }
        Ok(Self {
            sensor_id: non_empty(flat, "sensorId"),
            min_value: non_empty(flat, "minValue"),
            max_value: non_empty(flat, "maxValue"),
            min_timestamp: non_empty(flat, "minTimestamp"),
            max_timestamp: non_empty(flat, "maxTimestamp"),
        })
    }

    /// Returns the raw value for a rule-table field name.
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        match name {
            "sensorId" => self.sensor_id.as_deref(),
            "minValue" => self.min_value.as_deref(),
            "maxValue" => self.max_value.as_deref(),
            "minTimestamp" => self.min_timestamp.as_deref(),
            "maxTimestamp" => self.max_timestamp.as_deref(),
            _ => None,
        }
    }
}
