//! Shared error type for the ShaderCombo workspace.
//!
//! Configuration processing is the only fallible surface of the combo core:
//! expression parsing degrades to constant-false instead of failing, and
//! enumeration reports out-of-range through `Option`/`bool` returns. Every
//! variant here is therefore a configuration-load failure.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration processing.
#[derive(Error, Debug)]
pub enum ComboError {
    /// Configuration file could not be read.
    #[error("cannot read configuration '{path}'")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration document is not valid JSON.
    #[error("malformed configuration '{path}': {source}")]
    ConfigJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration document is not valid JSON (in-memory source).
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A shader entry violates a shape constraint.
    #[error("shader '{shader}': {detail}")]
    Config { shader: String, detail: String },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ComboError>;
