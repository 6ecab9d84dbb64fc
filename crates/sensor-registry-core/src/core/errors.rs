// crates/sensor-registry-core/src/core/errors.rs
// ============================================================================
// Module: Sensor Registry Errors
// Description: Error taxonomy shared by the validator, registry, and stores.
// Purpose: Provide tagged, inspectable failure results with stable codes.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every fallible operation in this workspace returns a tagged result built
//! from the types in this module. Error kinds carry stable wire codes so
//! callers can branch programmatically; messages are for humans. Independent
//! validation failures (several missing fields, several malformed values) are
//! aggregated into a single [`RegistryErrors`] value and reported together.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Machine-readable failure categories.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Wire codes never change once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A mandatory field is missing or empty.
    Required,
    /// A field value is malformed (for example a non-numeric number).
    BadVal,
    /// A `{min, max}` pair is inverted or escapes its parent range.
    BadRange,
    /// A foreign-key reference does not resolve.
    BadId,
    /// A duplicate key conflicted on an insert-only path.
    Exists,
    /// The underlying durable store reported a failure.
    Db,
}

impl ErrorKind {
    /// Returns the stable wire code for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::BadVal => "BAD_VAL",
            Self::BadRange => "BAD_RANGE",
            Self::BadId => "BAD_ID",
            Self::Exists => "EXISTS",
            Self::Db => "DB",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// SECTION: Single Error
// ============================================================================

/// A single tagged failure.
///
/// # Invariants
/// - `field`, when present, names the request field that caused the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct RegistryError {
    /// Machine-readable failure category.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Offending request field, when attributable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl RegistryError {
    /// Creates an error without field attribution.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
        }
    }

    /// Creates an error attributed to a request field.
    #[must_use]
    pub fn for_field(kind: ErrorKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

// ============================================================================
// SECTION: Aggregated Errors
// ============================================================================

/// One or more independent failures reported together.
///
/// # Invariants
/// - `errors` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryErrors {
    /// The individual failures, in detection order.
    pub errors: Vec<RegistryError>,
}

impl RegistryErrors {
    /// Wraps a single error.
    #[must_use]
    pub fn single(error: RegistryError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Shorthand for a single error without field attribution.
    #[must_use]
    pub fn of(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::single(RegistryError::new(kind, message))
    }

    /// Returns true when any contained error has the given kind.
    #[must_use]
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|error| error.kind == kind)
    }

    /// Returns the kind of the first contained error.
    #[must_use]
    pub fn first_kind(&self) -> Option<ErrorKind> {
        self.errors.first().map(|error| error.kind)
    }
}

impl fmt::Display for RegistryErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RegistryErrors {}

impl From<RegistryError> for RegistryErrors {
    fn from(error: RegistryError) -> Self {
        Self::single(error)
    }
}

/// Result alias used by registry, validator, and store operations.
pub type RegistryResult<T> = Result<T, RegistryErrors>;
