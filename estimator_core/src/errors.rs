//! # Error Types
//!
//! Structured error types for estimator_core. Every variant is an input
//! problem the caller can act on (fix a dimension, a mix expression or a
//! rate), so none of them are retried automatically. The rate-file variants
//! only come from [`crate::rates::store`].
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_ft: f64) -> CalcResult<()> {
//!     if length_ft <= 0.0 {
//!         return Err(CalcError::invalid_geometry(
//!             "length_ft",
//!             length_ft.to_string(),
//!             "Length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(validate_length(-1.0).unwrap_err().error_code(), "INVALID_GEOMETRY");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for estimator_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for estimation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A dimension is missing, zero, negative or not a finite number
    #[error("Invalid geometry for '{field}': {value} - {reason}")]
    InvalidGeometry {
        field: String,
        value: String,
        reason: String,
    },

    /// A mix ratio expression could not be parsed or has the wrong arity
    #[error("Invalid mix ratio '{expression}': {reason}")]
    InvalidRatio { expression: String, reason: String },

    /// No rate with this identifier exists in the catalog
    #[error("Rate not found: {id}")]
    RateNotFound { id: String },

    /// A rate update carried a negative or non-finite price
    #[error("Invalid price for rate '{id}': {price} - {reason}")]
    InvalidRate {
        id: String,
        price: String,
        reason: String,
    },

    /// A budget request carried no floors
    #[error("Budget request must contain at least one floor")]
    EmptyFloorList,

    /// An estimator setting (wastage, floor heuristic) is out of range
    #[error("Invalid setting '{field}': {value} - {reason}")]
    InvalidSettings {
        field: String,
        value: String,
        reason: String,
    },

    /// Rate file I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Rate file is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Rate file schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidGeometry error
    pub fn invalid_geometry(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidGeometry {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidRatio error
    pub fn invalid_ratio(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidRatio {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Create a RateNotFound error
    pub fn rate_not_found(id: impl Into<String>) -> Self {
        CalcError::RateNotFound { id: id.into() }
    }

    /// Create an InvalidRate error
    pub fn invalid_rate(id: impl Into<String>, price: f64, reason: impl Into<String>) -> Self {
        CalcError::InvalidRate {
            id: id.into(),
            price: price.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidSettings error
    pub fn invalid_settings(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidSettings {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CalcError::InvalidRatio { .. } => "INVALID_RATIO",
            CalcError::RateNotFound { .. } => "RATE_NOT_FOUND",
            CalcError::InvalidRate { .. } => "INVALID_RATE",
            CalcError::EmptyFloorList => "EMPTY_FLOOR_LIST",
            CalcError::InvalidSettings { .. } => "INVALID_SETTINGS",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

/// Reject zero, negative and non-finite dimensions.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_geometry(field, value.to_string(), "Must be a finite number"));
    }
    if value <= 0.0 {
        return Err(CalcError::invalid_geometry(field, value.to_string(), "Must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_geometry("length_ft", "-5", "Must be greater than zero");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidGeometry\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_unit_variant_serialization() {
        let json = serde_json::to_string(&CalcError::EmptyFloorList).unwrap();
        assert_eq!(json, r#"{"type":"EmptyFloorList"}"#);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::rate_not_found("CEMENT").error_code(), "RATE_NOT_FOUND");
        assert_eq!(CalcError::invalid_rate("SAND", -1.0, "negative").error_code(), "INVALID_RATE");
        assert_eq!(CalcError::invalid_ratio("1", "too few parts").error_code(), "INVALID_RATIO");
        assert_eq!(CalcError::EmptyFloorList.error_code(), "EMPTY_FLOOR_LIST");
    }

    #[test]
    fn test_only_lock_errors_are_recoverable() {
        assert!(CalcError::file_locked("rates.json", "someone", "now").is_recoverable());
        assert!(!CalcError::EmptyFloorList.is_recoverable());
        assert!(!CalcError::rate_not_found("ROD").is_recoverable());
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("area_sqft", 12.5).is_ok());
        assert!(require_positive("area_sqft", 0.0).is_err());
        assert!(require_positive("area_sqft", -3.0).is_err());
        assert!(require_positive("area_sqft", f64::NAN).is_err());
        assert!(require_positive("area_sqft", f64::INFINITY).is_err());
    }
}
