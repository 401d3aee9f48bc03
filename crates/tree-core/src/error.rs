//! Error types for field generation and photo sampling.
//!
//! Every failure is returned to the caller; nothing here is retried because
//! there is no transient failure mode (no I/O, no network).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    /// Generation was asked for a shape that cannot exist.
    #[error("invalid field config: {0}")]
    InvalidConfig(String),
    /// The supplied photo could not be turned into pixels.
    #[error("image decode failed: {0}")]
    ImageDecode(#[from] ImageDecodeError),
    /// A color buffer does not line up with the field it should color.
    #[error("color buffer has {actual} entries but the field has {expected} particles")]
    BufferLength { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum ImageDecodeError {
    #[error(transparent)]
    Codec(#[from] image::ImageError),
    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    Length {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

impl From<image::ImageError> for TreeError {
    fn from(e: image::ImageError) -> Self {
        TreeError::ImageDecode(ImageDecodeError::Codec(e))
    }
}
