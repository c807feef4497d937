// In: src/error.rs

//! This module defines the single, unified error type for the entire framejson library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every variant belongs to one of three kinds (see [`ErrorKind`]): value errors
//! caused by the input, overflow errors caused by numbers or nesting that exceed
//! what the encoder can represent, and fatal errors that indicate a broken
//! collaborator or a bug.

use thiserror::Error;

/// Coarse classification of a [`FrameJsonError`], mirroring how callers are
/// expected to react to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input (or the options) cannot be encoded as given.
    Value,
    /// An integer or the nesting depth exceeded the encoder's range.
    Overflow,
    /// The encoder or one of its collaborators failed.
    Fatal,
}

#[derive(Error, Debug)]
pub enum FrameJsonError {
    // =========================================================================
    // === High-Level, Semantic Errors
    // =========================================================================
    #[error("Unsupported value for JSON serialization: {0}")]
    UnsupportedValue(String),

    #[error("Label array sizes do not match corresponding data shape ({axis}: {labels} labels for extent {extent})")]
    LabelMismatch {
        axis: &'static str,
        labels: usize,
        extent: usize,
    },

    #[error("Invalid encoder configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not convert temporal value: {0}")]
    Temporal(String),

    #[error("Integer value is out of range: {0}")]
    Overflow(String),

    #[error("Maximum recursion level reached ({0})")]
    RecursionLimit(usize),

    #[error("Failed to execute default handler: {0}")]
    DefaultHandler(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error from assembling or reshaping ndarray storage.
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// An error originating from the underlying I/O subsystem (e.g., the log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a configuration.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl FrameJsonError {
    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedValue(_)
            | Self::LabelMismatch { .. }
            | Self::InvalidConfig(_)
            | Self::Temporal(_)
            | Self::Shape(_)
            | Self::SerdeJson(_) => ErrorKind::Value,
            Self::Overflow(_) | Self::RecursionLimit(_) => ErrorKind::Overflow,
            Self::DefaultHandler(_) | Self::InternalError(_) | Self::Arrow(_) | Self::Io(_) => {
                ErrorKind::Fatal
            }
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, FrameJsonError>;
