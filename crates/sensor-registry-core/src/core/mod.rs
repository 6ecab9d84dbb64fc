// crates/sensor-registry-core/src/core/mod.rs
// ============================================================================
// Module: Sensor Registry Core
// Description: Entities, validation, registry, and query evaluation.
// Purpose: House the synchronous, dependency-light heart of the system.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The core module owns everything that does not touch I/O: the entity
//! records, the table-driven validator, the in-memory registry, and the
//! stateless query engine. Control flow runs caller -> validator ->
//! registry -> query engine; durable stores in [`crate::interfaces`]
//! reproduce the same semantics asynchronously.

pub mod entities;
pub mod errors;
pub mod query;
pub mod registry;
pub mod requests;
pub mod validate;

pub use self::entities::Interval;
pub use self::entities::Quantity;
pub use self::entities::Sensor;
pub use self::entities::SensorReading;
pub use self::entities::SensorType;
pub use self::errors::ErrorKind;
pub use self::errors::RegistryError;
pub use self::errors::RegistryErrors;
pub use self::errors::RegistryResult;
pub use self::query::SensorQuery;
pub use self::query::SensorReadingQuery;
pub use self::query::SensorTypeQuery;
pub use self::registry::SensorRegistry;
pub use self::requests::FlatReq;
pub use self::requests::SensorAdd;
pub use self::requests::SensorFind;
pub use self::requests::SensorReadingAdd;
pub use self::requests::SensorReadingFind;
pub use self::requests::SensorTypeAdd;
pub use self::requests::SensorTypeFind;
