// crates/sensor-registry-core/src/interfaces/memory.rs
// ============================================================================
// Module: In-Memory Sensor Store
// Description: Reference SensorStore adapting the in-memory registry.
// Purpose: Provide contract-faithful storage for tests and embedding.
// Dependencies: async-trait, crate::core
// ============================================================================

//! ## Overview
//! [`InMemorySensorStore`] wraps a [`SensorRegistry`] behind a mutex and
//! implements the full [`SensorStore`] contract, including the
//! insert-only `EXISTS` semantics of the add paths. The mutex makes
//! check-plus-insert atomic here; durable stores get the same atomicity
//! from their backend's uniqueness constraints. This is the reference
//! implementation that durable adapters are tested against.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;

use crate::core::entities::Sensor;
use crate::core::entities::SensorReading;
use crate::core::entities::SensorType;
use crate::core::errors::ErrorKind;
use crate::core::errors::RegistryError;
use crate::core::errors::RegistryErrors;
use crate::core::errors::RegistryResult;
use crate::core::registry::SensorRegistry;
use crate::core::requests::SensorAdd;
use crate::core::requests::SensorFind;
use crate::core::requests::SensorReadingAdd;
use crate::core::requests::SensorReadingFind;
use crate::core::requests::SensorTypeAdd;
use crate::core::requests::SensorTypeFind;
use crate::core::validate;
use crate::interfaces::SensorStore;
use crate::interfaces::paging;
use crate::interfaces::paging::Page;
use crate::interfaces::paging::PageRequest;

// ============================================================================
// SECTION: Store
// ============================================================================

/// Volatile [`SensorStore`] backed by a mutex-guarded registry.
///
/// # Invariants
/// - All mutations happen under one lock, making duplicate detection
///   atomic with the insert.
#[derive(Debug, Clone, Default)]
pub struct InMemorySensorStore {
    /// The shared registry instance.
    inner: Arc<Mutex<SensorRegistry>>,
}

impl InMemorySensorStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the registry lock.
    fn lock(&self) -> RegistryResult<MutexGuard<'_, SensorRegistry>> {
        self.inner.lock().map_err(|_| {
            RegistryErrors::of(ErrorKind::Db, "sensor registry mutex poisoned".to_string())
        })
    }
}

#[async_trait]
impl SensorStore for InMemorySensorStore {
    async fn clear(&self) -> RegistryResult<()> {
        self.lock()?.clear();
        Ok(())
    }

    async fn close(&self) -> RegistryResult<()> {
        // Nothing to release; the registry drops with the last handle.
        Ok(())
    }

    async fn add_sensor_type(&self, req: &SensorTypeAdd) -> RegistryResult<SensorType> {
        let sensor_type = validate::validate_sensor_type(req)?;
        let mut registry = self.lock()?;
        if registry.sensor_type(&sensor_type.id).is_some() {
            return Err(RegistryErrors::single(RegistryError::for_field(
                ErrorKind::Exists,
                "id",
                format!("sensor type \"{}\" already exists", sensor_type.id),
            )));
        }
        registry.add_sensor_type(req)
    }

    async fn add_sensor(&self, req: &SensorAdd) -> RegistryResult<Sensor> {
        let sensor = validate::validate_sensor(req)?;
        let mut registry = self.lock()?;
        // Referential and sub-range checks come before duplicate
        // detection, matching the order durable stores observe when the
        // checks run inside the insert transaction.
        let Some(sensor_type) = registry.sensor_type(&sensor.sensor_type_id) else {
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
        if registry.sensor(&sensor.id).is_some() {
            return Err(RegistryErrors::single(RegistryError::for_field(
                ErrorKind::Exists,
                "id",
                format!("sensor \"{}\" already exists", sensor.id),
            )));
        }
        registry.add_sensor(req)
    }

    async fn add_sensor_reading(&self, req: &SensorReadingAdd) -> RegistryResult<SensorReading> {
        let reading = validate::validate_sensor_reading(req)?;
        let mut registry = self.lock()?;
        if registry.sensor(&reading.sensor_id).is_none() {
            return Err(RegistryErrors::single(RegistryError::for_field(
                ErrorKind::BadId,
                "sensorId",
                format!("unknown sensorId \"{}\"", reading.sensor_id),
            )));
        }
        if registry.sensor_reading(&reading.sensor_id, reading.timestamp).is_some() {
            return Err(RegistryErrors::single(RegistryError::for_field(
                ErrorKind::Exists,
                "timestamp",
                format!(
                    "reading for sensor \"{}\" at timestamp {} already exists",
                    reading.sensor_id, reading.timestamp
                ),
            )));
        }
        registry.add_sensor_reading(req)
    }

    async fn find_sensor_types(&self, req: &SensorTypeFind) -> RegistryResult<Vec<SensorType>> {
        self.lock()?.find_sensor_types(req)
    }

    async fn find_sensors(&self, req: &SensorFind) -> RegistryResult<Vec<Sensor>> {
        self.lock()?.find_sensors(req)
    }

    async fn find_sensor_readings(
        &self,
        req: &SensorReadingFind,
    ) -> RegistryResult<Vec<SensorReading>> {
        self.lock()?.find_sensor_readings(req)
    }

    async fn find_sensor_types_page(
        &self,
        req: &SensorTypeFind,
        page: &PageRequest,
    ) -> RegistryResult<Page<SensorType>> {
        let items = self.lock()?.find_sensor_types(req)?;
        paging::paginate(items, req, page, paging::SENSOR_TYPES_PATH)
    }

    async fn find_sensors_page(
        &self,
        req: &SensorFind,
        page: &PageRequest,
    ) -> RegistryResult<Page<Sensor>> {
        let items = self.lock()?.find_sensors(req)?;
        paging::paginate(items, req, page, paging::SENSORS_PATH)
    }

    async fn find_sensor_readings_page(
        &self,
        req: &SensorReadingFind,
        page: &PageRequest,
    ) -> RegistryResult<Page<SensorReading>> {
        let items = self.lock()?.find_sensor_readings(req)?;
        paging::paginate(items, req, page, paging::SENSOR_READINGS_PATH)
    }
}
