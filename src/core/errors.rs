//! Error types for the rectification pipeline.
//!
//! Only decode failures propagate to callers: geometric degeneracy inside the
//! pipeline is absorbed by fallback tiers so that an image is always produced
//! for the downstream recognizer. The [`RectifyError::InvalidInput`] variant
//! is raised by the low-level transform math and handled internally by the
//! scanner.

use thiserror::Error;

/// Errors that can occur while rectifying a receipt image.
#[derive(Error, Debug)]
pub enum RectifyError {
    /// The input bytes are not a decodable raster image.
    #[error("image decode")]
    ImageDecode(#[source] image::ImageError),

    /// A geometric operation received structurally invalid input, such as a
    /// wrong point count or a singular transformation matrix.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// IO error while reading the input file.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl RectifyError {
    /// Creates a [`RectifyError::InvalidInput`] from any message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Convenient result alias for rectification operations.
pub type RectifyResult<T> = Result<T, RectifyError>;
