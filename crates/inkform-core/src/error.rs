//! Error types for host-facing operations.

use crate::element::ElementId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by drawing and configuration operations.
///
/// Editing a selection never produces one of these for the user to see;
/// bindings log them and fall back to a refresh.
#[derive(Debug, Error)]
pub enum InkformError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),
    #[error("Element {id} has no {what}")]
    MissingProperty { id: ElementId, what: &'static str },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for inkform operations.
pub type Result<T> = std::result::Result<T, InkformError>;
