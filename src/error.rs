//! Error types for the ad project document manager.

use thiserror::Error;

use crate::project::model::Resolution;

/// Result type alias for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Errors that can occur during project operations.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// Automerge error during document operations.
    #[error("Automerge error: {0}")]
    Automerge(#[from] automerge::AutomergeError),

    /// Autosurgeon hydration error.
    #[error("Hydration error: {0}")]
    Hydrate(#[from] autosurgeon::HydrateError),

    /// Autosurgeon reconcile error.
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] autosurgeon::ReconcileError),

    /// Field not found in the document.
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// Schema violation - document structure is invalid.
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// A duration value outside the supported set.
    #[error("unsupported shot duration: {0}s (expected 4, 6, or 8)")]
    UnsupportedDuration(i64),

    /// Resolution tier and shot duration are incompatible.
    #[error("{resolution} video only supports {required}s shots (got {requested}s)")]
    ResolutionDurationMismatch {
        resolution: Resolution,
        required: u32,
        requested: u32,
    },

    /// A shot already holds the maximum number of reference images.
    #[error("a shot may hold at most {max} reference images")]
    ReferenceImageLimit { max: usize },

    /// A generation job needs at least one shot.
    #[error("a generation job requires at least one shot")]
    EmptyShotList,

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ProjectError {
    /// Creates a FieldNotFound error.
    pub fn field_not_found(field: impl Into<String>) -> Self {
        Self::FieldNotFound(field.into())
    }

    /// Creates a SchemaViolation error.
    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    /// Creates a Serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}
