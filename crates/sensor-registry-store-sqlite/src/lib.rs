// crates/sensor-registry-store-sqlite/src/lib.rs
// ============================================================================
// Module: Sensor Registry SQLite Store Crate
// Description: Durable SensorStore adapter backed by SQLite.
// Purpose: Public API surface for the SQLite-backed store.
// Dependencies: sensor-registry-core, rusqlite, tokio
// ============================================================================

//! ## Overview
//! Durable [`sensor_registry_core::SensorStore`] implementation over
//! `SQLite`. Domain keys are primary keys, so duplicate inserts fail
//! atomically with `EXISTS`; referential and sub-range checks run inside
//! the same transaction as the insert. Query results match the in-memory
//! registry's filtering, ordering, and pagination observably.

pub mod store;

pub use crate::store::SqliteJournalMode;
pub use crate::store::SqliteSensorStore;
pub use crate::store::SqliteStoreConfig;
pub use crate::store::SqliteStoreError;
pub use crate::store::SqliteSyncMode;
