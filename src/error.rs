//! Error types for the file cabinet
//!
//! Provides a unified error type for all store operations.

use thiserror::Error;

/// Result type alias using CabinetError
pub type Result<T> = std::result::Result<T, CabinetError>;

/// Unified error type for file cabinet operations
#[derive(Debug, Error)]
pub enum CabinetError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Record #{0} not found")]
    NotFound(u32),

    #[error("Record #{0} already exists")]
    DuplicateId(u32),

    #[error("No records match the given conditions")]
    NoMatch,

    // -------------------------------------------------------------------------
    // Query Errors
    // -------------------------------------------------------------------------
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field '{0}' cannot be changed")]
    ImmutableField(String),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CabinetError {
    /// Shorthand for a validation failure on `field`
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        CabinetError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for a value that failed to parse for a typed field
    pub fn invalid_value(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CabinetError::InvalidValue {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
