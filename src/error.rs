//! Error taxonomy
//!
//! Command errors are caller-correctable validation failures.
//! Schema errors guard the document-model boundary.

use thiserror::Error;

/// A command could not be applied to the scene.
///
/// Every variant leaves the scene it was applied to untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity id must not be empty")]
    EmptyId,

    #[error("Bounds violation for {id}: {reason}")]
    BoundsViolation { id: String, reason: String },

    #[error("Invalid zone {id}: {reason}")]
    InvalidZone { id: String, reason: String },
}

/// Externally supplied input failed schema validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Non-finite number in {field}")]
    NonFinite { field: String },

    #[error("Invalid scene dimensions {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Entity id must not be empty")]
    EmptyId,

    #[error("Duplicate id in document: {0}")]
    DuplicateId(String),
}

/// Top-level error for hosts embedding the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
