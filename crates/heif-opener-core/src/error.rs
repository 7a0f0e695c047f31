//! Error types for opening and materializing HEIF images.

use image::error::{
    DecodingError, ImageError, ImageFormatHint, UnsupportedError, UnsupportedErrorKind,
};
use thiserror::Error;

use crate::frame::CropRect;

/// Error reported by the external HEIF codec.
///
/// Mirrors the codec's own error triple: a numeric code, a more specific
/// subcode, and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code}, subcode {subcode})")]
pub struct CodecError {
    /// Top-level error code.
    pub code: i32,
    /// Codec-specific subcode.
    pub subcode: i32,
    /// Description provided by the codec.
    pub message: String,
}

impl CodecError {
    /// Create a new codec error.
    pub fn new(code: i32, subcode: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            subcode,
            message: message.into(),
        }
    }
}

/// Errors surfaced while opening a HEIF file or producing its pixels.
#[derive(Debug, Error)]
pub enum HeifError {
    /// The codec rejected the file while reading the container or headers.
    #[error("Not a recognized or valid HEIF image: {0}")]
    CodecOpen(#[source] CodecError),

    /// The codec rejected the file while decompressing pixel data.
    #[error("Failed to decode HEIF pixel data: {0}")]
    CodecDecode(#[source] CodecError),

    /// The pixel mode has no known byte layout.
    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// The crop rectangle does not fit inside the frame.
    #[error("Crop rectangle {rect} exceeds {width}x{height} frame")]
    InvalidCropRect {
        rect: CropRect,
        width: u32,
        height: u32,
    },

    /// The scanline stride cannot hold a full row of pixels.
    #[error("Stride of {stride} bytes is smaller than a {row_bytes}-byte row")]
    InvalidStride { stride: usize, row_bytes: usize },

    /// The pixel buffer is shorter than the declared layout.
    #[error("Pixel buffer too small: need {required} bytes, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },
}

impl From<HeifError> for ImageError {
    fn from(err: HeifError) -> Self {
        let hint = ImageFormatHint::Name("HEIF".to_string());
        match err {
            HeifError::UnsupportedPixelFormat(mode) => {
                ImageError::Unsupported(UnsupportedError::from_format_and_kind(
                    hint,
                    UnsupportedErrorKind::GenericFeature(format!("pixel mode {mode}")),
                ))
            }
            other => ImageError::Decoding(DecodingError::new(hint, other)),
        }
    }
}
