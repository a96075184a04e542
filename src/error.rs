//! Error types for mathcanvas operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mathcanvas operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for a surface or framebuffer.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// A drawing or configuration argument failed validation.
    ///
    /// Only raised in [`Mode::Normal`](crate::canvas::Mode::Normal).
    #[error("\"{name}\" parameter {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A plane with non-finite or inverted bounds.
    #[error("Invalid plane: {0}")]
    InvalidPlane(String),

    /// A plane built from a slice that does not hold exactly four values.
    #[error("\"plane\" parameter must be an array of length 4, got length {len}")]
    PlaneShape {
        /// Length of the rejected slice.
        len: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Color parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Configuration could not be parsed.
    #[error("Config parse error at line {line}: {message}")]
    ConfigParse {
        /// 1-based line of the failure, 0 when unknown.
        line: usize,
        /// Parser message.
        message: String,
    },

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    pub(crate) fn invalid_arg(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}
