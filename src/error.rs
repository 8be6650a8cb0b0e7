//! Error types for the editor shell.
//!
//! The interaction core (picking, gizmo, viewport) never fails; these cover
//! scene files and editor configuration on disk.

use thiserror::Error;

/// Main error type for the editor.
#[derive(Error, Debug)]
pub enum EditorError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse errors (with line/column)
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization errors
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// Brotli compression or decompression failed
    #[error("Compression error: {0}")]
    Compression(String),

    /// File parsed but its content is out of bounds
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias using the editor's Error type.
pub type Result<T> = std::result::Result<T, EditorError>;
