//! # Error Types
//!
//! Structured error types for bbs_core. Every error is a deterministic
//! function of its input, so the same bad input always produces the same
//! error and nothing here is ever retried.
//!
//! Two classes of "bad" input are deliberately *not* errors:
//!
//! - degenerate geometry (beam narrower than twice the cover, slab thinner
//!   than twice the cover) is clamped to zero length by the resolver
//! - unrecognised bar-type labels fall back to a single-segment measurement
//!   and are flagged `low_confidence` on the result
//!
//! ## Example
//!
//! ```rust
//! use bbs_core::errors::{BbsError, BbsResult};
//!
//! fn validate_spacing(spacing_mm: f64) -> BbsResult<()> {
//!     if spacing_mm < 0.0 {
//!         return Err(BbsError::invalid_spacing(spacing_mm, "Spacing cannot be negative"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_spacing(-150.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bbs_core operations
pub type BbsResult<T> = Result<T, BbsError>;

/// Structured error type for schedule calculations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BbsError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A canonical shape was given without one of its required dimensions
    #[error("Shape {shape} requires dimension {dimension}")]
    MissingDimension { shape: String, dimension: String },

    /// Code profile id not present in the registry
    #[error("Unknown code profile: {profile_id}")]
    UnknownProfile { profile_id: String },

    /// Profile parameters failed validation
    #[error("Profile '{profile_id}' rejected: {}", .errors.join("; "))]
    ProfileRejected {
        profile_id: String,
        errors: Vec<String>,
    },

    /// Spacing is zero (with no discrete count) or negative
    #[error("Invalid spacing {spacing_mm} mm: {reason}")]
    InvalidSpacing { spacing_mm: f64, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl BbsError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        BbsError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        BbsError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MissingDimension error
    pub fn missing_dimension(shape: impl Into<String>, dimension: impl Into<String>) -> Self {
        BbsError::MissingDimension {
            shape: shape.into(),
            dimension: dimension.into(),
        }
    }

    /// Create an UnknownProfile error
    pub fn unknown_profile(profile_id: impl Into<String>) -> Self {
        BbsError::UnknownProfile {
            profile_id: profile_id.into(),
        }
    }

    /// Create an InvalidSpacing error
    pub fn invalid_spacing(spacing_mm: f64, reason: impl Into<String>) -> Self {
        BbsError::InvalidSpacing {
            spacing_mm,
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        BbsError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by engine configuration rather than bar data
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            BbsError::MissingDimension { .. }
                | BbsError::UnknownProfile { .. }
                | BbsError::ProfileRejected { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BbsError::InvalidInput { .. } => "INVALID_INPUT",
            BbsError::MissingField { .. } => "MISSING_FIELD",
            BbsError::MissingDimension { .. } => "MISSING_DIMENSION",
            BbsError::UnknownProfile { .. } => "UNKNOWN_PROFILE",
            BbsError::ProfileRejected { .. } => "PROFILE_REJECTED",
            BbsError::InvalidSpacing { .. } => "INVALID_SPACING",
            BbsError::FileError { .. } => "FILE_ERROR",
            BbsError::SerializationError { .. } => "SERIALIZATION_ERROR",
            BbsError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = BbsError::missing_dimension("U-Shape", "B");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("MissingDimension"));
        let roundtrip: BbsError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(BbsError::missing_field("label").error_code(), "MISSING_FIELD");
        assert_eq!(BbsError::unknown_profile("nope").error_code(), "UNKNOWN_PROFILE");
        assert_eq!(BbsError::invalid_spacing(0.0, "zero").error_code(), "INVALID_SPACING");
    }

    #[test]
    fn test_configuration_classification() {
        assert!(BbsError::unknown_profile("x").is_configuration_error());
        assert!(BbsError::missing_dimension("Stirrup", "A").is_configuration_error());
        assert!(!BbsError::invalid_spacing(-1.0, "negative").is_configuration_error());
    }

    #[test]
    fn test_profile_rejected_message_lists_errors() {
        let error = BbsError::ProfileRejected {
            profile_id: "custom".to_string(),
            errors: vec!["cover too small".to_string(), "hook too long".to_string()],
        };
        let message = error.to_string();
        assert!(message.contains("cover too small; hook too long"));
    }
}
