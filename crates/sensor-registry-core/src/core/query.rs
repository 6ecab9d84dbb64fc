// crates/sensor-registry-core/src/core/query.rs
// ============================================================================
// Module: Sensor Registry Query Engine
// Description: Typed queries and pure filter/sort evaluation.
// Purpose: Evaluate validated filters identically over any snapshot source.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The query engine is stateless: it evaluates a validated, typed query
//! against entity snapshots and never mutates anything. Both the in-memory
//! registry and durable stores must produce the same observable results;
//! stores that compile queries to a native form (SQL) follow the predicate
//! semantics defined here. Supplied filters are conjunctive, bounds are
//! inclusive, and every bound filters independently of its partner.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::core::entities::Quantity;
use crate::core::entities::Sensor;
use crate::core::entities::SensorReading;
use crate::core::entities::SensorType;

// ============================================================================
// SECTION: Typed Queries
// ============================================================================

/// Validated filter over sensor types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorTypeQuery {
    /// Exact-match identifier.
    pub id: Option<String>,
    /// Exact-match manufacturer.
    pub manufacturer: Option<String>,
    /// Exact-match model number.
    pub model_number: Option<String>,
    /// Exact-match unit category.
    pub quantity: Option<Quantity>,
    /// Exact-match unit label.
    pub unit: Option<String>,
}

/// Validated filter over sensors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorQuery {
    /// Exact-match identifier.
    pub id: Option<String>,
    /// Exact-match owning sensor type.
    pub sensor_type_id: Option<String>,
}

/// Validated filter over sensor readings.
///
/// # Invariants
/// - `sensor_id` is always present; readings are only queryable per sensor.
/// - When both ends of a bound pair are present, `min < max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReadingQuery {
    /// Identifier of the sensor whose readings are requested.
    pub sensor_id: String,
    /// Inclusive lower bound on `value`.
    pub min_value: Option<f64>,
    /// Inclusive upper bound on `value`.
    pub max_value: Option<f64>,
    /// Inclusive lower bound on `timestamp`.
    pub min_timestamp: Option<i64>,
    /// Inclusive upper bound on `timestamp`.
    pub max_timestamp: Option<i64>,
}

// ============================================================================
// SECTION: Predicates
// ============================================================================

/// Returns true when the sensor type satisfies every supplied filter.
#[must_use]
pub fn sensor_type_matches(query: &SensorTypeQuery, sensor_type: &SensorType) -> bool {
    query.id.as_ref().is_none_or(|id| *id == sensor_type.id)
        && query
            .manufacturer
            .as_ref()
            .is_none_or(|manufacturer| *manufacturer == sensor_type.manufacturer)
        && query
            .model_number
            .as_ref()
            .is_none_or(|model_number| *model_number == sensor_type.model_number)
        && query.quantity.is_none_or(|quantity| quantity == sensor_type.quantity)
        && query.unit.as_ref().is_none_or(|unit| *unit == sensor_type.unit)
}

/// Returns true when the sensor satisfies every supplied filter.
#[must_use]
pub fn sensor_matches(query: &SensorQuery, sensor: &Sensor) -> bool {
    query.id.as_ref().is_none_or(|id| *id == sensor.id)
        && query
            .sensor_type_id
            .as_ref()
            .is_none_or(|sensor_type_id| *sensor_type_id == sensor.sensor_type_id)
}

/// Returns true when the reading satisfies every supplied bound.
///
/// Bounds are inclusive and conjunctive; each end applies independently.
#[must_use]
pub fn reading_matches(query: &SensorReadingQuery, reading: &SensorReading) -> bool {
    query.sensor_id == reading.sensor_id
        && query.min_value.is_none_or(|lo| reading.value >= lo)
        && query.max_value.is_none_or(|hi| reading.value <= hi)
        && query.min_timestamp.is_none_or(|lo| reading.timestamp >= lo)
        && query.max_timestamp.is_none_or(|hi| reading.timestamp <= hi)
}

// ============================================================================
// SECTION: Result Ordering
// ============================================================================

/// Sorts sensor types ascending by lexicographic identifier.
pub fn sort_sensor_types(sensor_types: &mut [SensorType]) {
    sensor_types.sort_by(|a, b| a.id.cmp(&b.id));
}

/// Sorts sensors ascending by lexicographic identifier.
pub fn sort_sensors(sensors: &mut [Sensor]) {
    sensors.sort_by(|a, b| a.id.cmp(&b.id));
}

/// Sorts readings ascending by timestamp.
///
/// Ties cannot occur within one sensor's readings: `(sensor_id,
/// timestamp)` is the unique key, and queries are per sensor.
pub fn sort_readings(readings: &mut [SensorReading]) {
    readings.sort_by(|a, b| match a.timestamp.cmp(&b.timestamp) {
        Ordering::Equal => a.sensor_id.cmp(&b.sensor_id),
        ordering => ordering,
    });
}
