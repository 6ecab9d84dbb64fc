// crates/sensor-registry-core/src/core/registry.rs
// ============================================================================
// Module: In-Memory Sensor Registry
// Description: Owning collections with uniqueness and referential checks.
// Purpose: Apply cross-entity invariants and serve validated queries.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! [`SensorRegistry`] exclusively owns the three entity collections. It is
//! single-threaded and synchronous: every operation completes before
//! returning and the caller serializes concurrent access. Add operations
//! validate fully before any mutation; a failed add never leaves a partial
//! write behind. Replacement is wholesale under the same key (upsert), and
//! the only destruction path is [`SensorRegistry::clear`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::entities::Sensor;
use crate::core::entities::SensorReading;
use crate::core::entities::SensorType;
use crate::core::errors::ErrorKind;
use crate::core::errors::RegistryError;
use crate::core::errors::RegistryErrors;
use crate::core::errors::RegistryResult;
use crate::core::query;
use crate::core::requests::FlatReq;
use crate::core::requests::SensorAdd;
use crate::core::requests::SensorFind;
use crate::core::requests::SensorReadingAdd;
use crate::core::requests::SensorReadingFind;
use crate::core::requests::SensorTypeAdd;
use crate::core::requests::SensorTypeFind;
use crate::core::validate;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Owner of the sensor-type, sensor, and reading collections.
///
/// # Invariants
/// - Every stored sensor references a stored sensor type and its expected
///   range lies within that type's limits at insertion time.
/// - Every stored reading references a stored sensor.
/// - Readings for one sensor are unique by timestamp.
#[derive(Debug, Clone, Default)]
pub struct SensorRegistry {
    /// Sensor types keyed by identifier; key order is the result order.
    sensor_types: BTreeMap<String, SensorType>,
    /// Sensors keyed by identifier; key order is the result order.
    sensors: BTreeMap<String, Sensor>,
    /// Readings grouped per sensor in arrival order.
    readings: BTreeMap<String, Vec<SensorReading>>,
}

impl SensorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-loaded from flat requests.
    ///
    /// Loads sensor types, then sensors, then readings, so later kinds can
    /// reference earlier ones; stops at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates the first add failure encountered.
    pub fn with_data(
        sensor_types: &[FlatReq],
        sensors: &[FlatReq],
        readings: &[FlatReq],
    ) -> RegistryResult<Self> {
        let mut registry = Self::new();
        for flat in sensor_types {
            registry.add_sensor_type(&SensorTypeAdd::from_flat(flat))?;
        }
        for flat in sensors {
            registry.add_sensor(&SensorAdd::from_flat(flat))?;
        }
        for flat in readings {
            registry.add_sensor_reading(&SensorReadingAdd::from_flat(flat))?;
        }
        Ok(registry)
    }

    /// Empties all three collections.
    pub fn clear(&mut self) {
        self.sensor_types.clear();
        self.sensors.clear();
        self.readings.clear();
    }

    // ------------------------------------------------------------------
    // Add operations
    // ------------------------------------------------------------------

    /// Adds or replaces a sensor type, keyed by `id`.
    ///
    /// # Errors
    ///
    /// Returns `REQUIRED`, `BAD_VAL`, or `BAD_RANGE` validation failures.
    pub fn add_sensor_type(&mut self, req: &SensorTypeAdd) -> RegistryResult<SensorType> {
        let sensor_type = validate::validate_sensor_type(req)?;
        self.sensor_types.insert(sensor_type.id.clone(), sensor_type.clone());
        Ok(sensor_type)
    }

    /// Adds or replaces a sensor, keyed by `id`.
    ///
    /// All checks run before any mutation: a `BAD_ID` or `BAD_RANGE`
    /// failure leaves the sensor collection untouched.
    ///
    /// # Errors
    ///
    /// Returns validation failures, `BAD_ID` for an unknown
    /// `sensorTypeId`, or `BAD_RANGE` when the expected range escapes the
    /// referenced type's limits.
    pub fn add_sensor(&mut self, req: &SensorAdd) -> RegistryResult<Sensor> {
        let sensor = validate::validate_sensor(req)?;
        let Some(sensor_type) = self.sensor_types.get(&sensor.sensor_type_id) else {
            return Err(RegistryErrors::single(RegistryError::for_field(
                ErrorKind::BadId,
                "sensorTypeId",
                format!("unknown sensorTypeId \"{}\"", sensor.sensor_type_id),
            )));
        };
        if !sensor_type.limits.encloses(&sensor.expected) {
            return Err(RegistryErrors::single(RegistryError::for_field(
                ErrorKind::BadRange,
                "expected",
                format!(
                    "expected range [{}, {}] escapes sensor-type limits [{}, {}]",
                    sensor.expected.min,
                    sensor.expected.max,
                    sensor_type.limits.min,
                    sensor_type.limits.max
                ),
            )));
        }
        self.sensors.insert(sensor.id.clone(), sensor.clone());
        Ok(sensor)
    }

    /// Adds or replaces a reading, keyed by `(sensorId, timestamp)`.
    ///
    /// A same-key reading is replaced in place, preserving the relative
    /// order of that sensor's other readings; otherwise the reading is
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns validation failures or `BAD_ID` for an unknown `sensorId`.
    pub fn add_sensor_reading(&mut self, req: &SensorReadingAdd) -> RegistryResult<SensorReading> {
        let reading = validate::validate_sensor_reading(req)?;
        if !self.sensors.contains_key(&reading.sensor_id) {
            return Err(RegistryErrors::single(RegistryError::for_field(
                ErrorKind::BadId,
                "sensorId",
                format!("unknown sensorId \"{}\"", reading.sensor_id),
            )));
        }
        let slot = self.readings.entry(reading.sensor_id.clone()).or_default();
        match slot.iter().position(|stored| stored.timestamp == reading.timestamp) {
            Some(index) => slot[index] = reading.clone(),
            None => slot.push(reading.clone()),
        }
        Ok(reading)
    }

    // ------------------------------------------------------------------
    // Find operations
    // ------------------------------------------------------------------

    /// Finds sensor types matching the filter, ascending by identifier.
    ///
    /// An unknown `id` filter yields an empty result, not an error.
    ///
    /// # Errors
    ///
    /// Returns find-time validation failures.
    pub fn find_sensor_types(&self, req: &SensorTypeFind) -> RegistryResult<Vec<SensorType>> {
        let query = validate::validate_sensor_type_find(req)?;
        if let Some(id) = &query.id
            && !self.sensor_types.contains_key(id)
        {
            return Ok(Vec::new());
        }
        let mut sensor_types: Vec<SensorType> = self
            .sensor_types
            .values()
            .filter(|sensor_type| query::sensor_type_matches(&query, sensor_type))
            .cloned()
            .collect();
        query::sort_sensor_types(&mut sensor_types);
        Ok(sensor_types)
    }

    /// Finds sensors matching the filter, ascending by identifier.
    ///
    /// An unknown `id` filter yields an empty result, not an error.
    ///
    /// # Errors
    ///
    /// Returns find-time validation failures.
    pub fn find_sensors(&self, req: &SensorFind) -> RegistryResult<Vec<Sensor>> {
        let query = validate::validate_sensor_find(req)?;
        if let Some(id) = &query.id
            && !self.sensors.contains_key(id)
        {
            return Ok(Vec::new());
        }
        let mut sensors: Vec<Sensor> = self
            .sensors
            .values()
            .filter(|sensor| query::sensor_matches(&query, sensor))
            .cloned()
            .collect();
        query::sort_sensors(&mut sensors);
        Ok(sensors)
    }

    /// Finds readings for one sensor, ascending by timestamp.
    ///
    /// A `sensorId` with no recorded readings yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns find-time validation failures, including `REQUIRED` when
    /// `sensorId` is missing.
    pub fn find_sensor_readings(
        &self,
        req: &SensorReadingFind,
    ) -> RegistryResult<Vec<SensorReading>> {
        let query = validate::validate_sensor_reading_find(req)?;
        let Some(slot) = self.readings.get(&query.sensor_id) else {
            return Ok(Vec::new());
        };
        let mut readings: Vec<SensorReading> = slot
            .iter()
            .filter(|reading| query::reading_matches(&query, reading))
            .cloned()
            .collect();
        query::sort_readings(&mut readings);
        Ok(readings)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Looks up a sensor type by identifier.
    #[must_use]
    pub fn sensor_type(&self, id: &str) -> Option<&SensorType> {
        self.sensor_types.get(id)
    }

    /// Looks up a sensor by identifier.
    #[must_use]
    pub fn sensor(&self, id: &str) -> Option<&Sensor> {
        self.sensors.get(id)
    }

    /// Looks up a reading by its composite key.
    #[must_use]
    pub fn sensor_reading(&self, sensor_id: &str, timestamp: i64) -> Option<&SensorReading> {
        self.readings
            .get(sensor_id)?
            .iter()
            .find(|reading| reading.timestamp == timestamp)
    }

    /// Number of stored sensor types.
    #[must_use]
    pub fn sensor_type_count(&self) -> usize {
        self.sensor_types.len()
    }

    /// Number of stored sensors.
    #[must_use]
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// Total number of stored readings across all sensors.
    #[must_use]
    pub fn reading_count(&self) -> usize {
        self.readings.values().map(Vec::len).sum()
    }
}
