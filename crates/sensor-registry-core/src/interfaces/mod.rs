// crates/sensor-registry-core/src/interfaces/mod.rs
// ============================================================================
// Module: Sensor Store Interfaces
// Description: Backend-agnostic storage contract for sensor records.
// Purpose: Define the durable-store surface mirroring the registry.
// Dependencies: async-trait, crate::core
// ============================================================================

//! ## Overview
//! [`SensorStore`] is the storage contract: the registry's operations,
//! asynchronous, plus paged query variants and lifecycle management.
//! Implementations must reproduce the registry's validation, uniqueness,
//! and query semantics exactly; the in-memory adapter in [`memory`] is the
//! reference. Unlike the registry's upsert adds, store add paths are
//! insert-only: a duplicate key fails with `EXISTS`, and that detection
//! must come from an atomic storage-level constraint, never a separate
//! existence read. Backend failures surface as `DB` errors wrapping the
//! underlying cause.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;

use crate::core::entities::Sensor;
use crate::core::entities::SensorReading;
use crate::core::entities::SensorType;
use crate::core::errors::RegistryResult;
use crate::core::requests::SensorAdd;
use crate::core::requests::SensorFind;
use crate::core::requests::SensorReadingAdd;
use crate::core::requests::SensorReadingFind;
use crate::core::requests::SensorTypeAdd;
use crate::core::requests::SensorTypeFind;
use crate::interfaces::paging::Page;
use crate::interfaces::paging::PageRequest;

pub mod memory;
pub mod paging;

// ============================================================================
// SECTION: Sensor Store Contract
// ============================================================================

/// Asynchronous storage contract mirroring the in-memory registry.
///
/// # Invariants
/// - Validation failures are detected before any write is attempted.
/// - Referential and sub-range checks precede duplicate detection, so a
///   request failing both reports `BAD_ID`/`BAD_RANGE`, not `EXISTS`.
/// - Duplicate-key detection on add paths is atomic (`EXISTS`).
/// - Two operations on the same store only observe a consistent snapshot
///   when the caller serializes them.
#[async_trait]
pub trait SensorStore: Send + Sync {
    /// Empties all three collections.
    ///
    /// # Errors
    ///
    /// Returns `DB` when the backend fails.
    async fn clear(&self) -> RegistryResult<()>;

    /// Releases backend resources; the store is unusable afterwards.
    ///
    /// # Errors
    ///
    /// Returns `DB` when the backend fails to shut down.
    async fn close(&self) -> RegistryResult<()>;

    /// Inserts a sensor type.
    ///
    /// # Errors
    ///
    /// Returns validation failures, `EXISTS` for a duplicate id, or `DB`.
    async fn add_sensor_type(&self, req: &SensorTypeAdd) -> RegistryResult<SensorType>;

    /// Inserts a sensor after referential and sub-range checks.
    ///
    /// # Errors
    ///
    /// Returns validation failures, `BAD_ID` for an unknown
    /// `sensorTypeId`, `BAD_RANGE` for an escaping expected range,
    /// `EXISTS` for a duplicate id, or `DB`.
    async fn add_sensor(&self, req: &SensorAdd) -> RegistryResult<Sensor>;

    /// Inserts a reading after the sensor reference check.
    ///
    /// # Errors
    ///
    /// Returns validation failures, `BAD_ID` for an unknown `sensorId`,
    /// `EXISTS` for a duplicate `(sensorId, timestamp)`, or `DB`.
    async fn add_sensor_reading(&self, req: &SensorReadingAdd) -> RegistryResult<SensorReading>;

    /// Finds sensor types matching the filter, ascending by identifier.
    ///
    /// # Errors
    ///
    /// Returns find-time validation failures or `DB`.
    async fn find_sensor_types(&self, req: &SensorTypeFind) -> RegistryResult<Vec<SensorType>>;

    /// Finds sensors matching the filter, ascending by identifier.
    ///
    /// # Errors
    ///
    /// Returns find-time validation failures or `DB`.
    async fn find_sensors(&self, req: &SensorFind) -> RegistryResult<Vec<Sensor>>;

    /// Finds readings for one sensor, ascending by timestamp.
    ///
    /// # Errors
    ///
    /// Returns find-time validation failures or `DB`.
    async fn find_sensor_readings(
        &self,
        req: &SensorReadingFind,
    ) -> RegistryResult<Vec<SensorReading>>;

    /// Pages sensor types matching the filter.
    ///
    /// # Errors
    ///
    /// Returns find-time validation failures, `BAD_VAL` for a bad page
    /// window, or `DB`.
    async fn find_sensor_types_page(
        &self,
        req: &SensorTypeFind,
        page: &PageRequest,
    ) -> RegistryResult<Page<SensorType>>;

    /// Pages sensors matching the filter.
    ///
    /// # Errors
    ///
    /// Returns find-time validation failures, `BAD_VAL` for a bad page
    /// window, or `DB`.
    async fn find_sensors_page(
        &self,
        req: &SensorFind,
        page: &PageRequest,
    ) -> RegistryResult<Page<Sensor>>;

    /// Pages readings for one sensor.
    ///
    /// # Errors
    ///
    /// Returns find-time validation failures, `BAD_VAL` for a bad page
    /// window, or `DB`.
    async fn find_sensor_readings_page(
        &self,
        req: &SensorReadingFind,
        page: &PageRequest,
    ) -> RegistryResult<Page<SensorReading>>;
}
