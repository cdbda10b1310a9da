//! Error types for artifact loading and inference.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a fitted transform or regressor at request time.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("shape mismatch: expected {expected} features, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("tree {tree}: invalid node reference {node}")]
    InvalidNode { tree: usize, node: usize },

    #[error("non-finite output: {0}")]
    NonFinite(f64),
}

/// Errors that keep the service from becoming ready.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An in-memory artifact disagrees with the feature schema.
    #[error("invalid {what} artifact: {reason}")]
    Inconsistent { what: &'static str, reason: String },

    #[error("invalid {what} artifact at {}: {reason}", path.display())]
    Invalid {
        what: &'static str,
        path: PathBuf,
        reason: String,
    },
}
