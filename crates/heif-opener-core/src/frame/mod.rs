//! The decoded frame handed between pipeline stages.
//!
//! A [`DecodedFrame`] pairs a window into the codec's pixel allocation with the
//! layout needed to read it (size, mode, stride), the crop still pending on it,
//! and the metadata that travels with the image.
//!
//! # Ownership
//!
//! The pixel allocation is shared: cropping yields a new frame whose
//! [`PixelBuffer`] points into the same memory. Metadata is held behind `Arc`
//! so that replacing it on one frame never touches another.

mod buffer;
mod types;

use std::sync::Arc;

pub use buffer::PixelBuffer;
pub use types::{ColorProfile, CropRect, Orientation, PixelMode, ProfileKind};

use crate::error::HeifError;

/// Metadata that travels with a frame, independent of its pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameMetadata {
    /// Container orientation still to be applied: 0 for none, 1-8 per EXIF.
    pub orientation_tag: u32,
    /// Raw EXIF block, if the container had one.
    pub exif: Option<Arc<[u8]>>,
    /// ICC profile, if the container had one.
    pub color_profile: Option<ColorProfile>,
}

impl FrameMetadata {
    /// Metadata with no orientation, EXIF or profile.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orientation_tag(mut self, tag: u32) -> Self {
        self.orientation_tag = tag;
        self
    }

    pub fn with_exif(mut self, exif: impl Into<Arc<[u8]>>) -> Self {
        self.exif = Some(exif.into());
        self
    }

    pub fn with_color_profile(mut self, profile: ColorProfile) -> Self {
        self.color_profile = Some(profile);
        self
    }

    /// The EXIF bytes, treating an empty block as absent.
    pub fn exif_bytes(&self) -> Option<&[u8]> {
        self.exif.as_deref().filter(|exif| !exif.is_empty())
    }
}

/// A decoded image: pixel window, layout and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Width of the current view in pixels.
    pub width: u32,
    /// Height of the current view in pixels.
    pub height: u32,
    /// Pixel layout.
    pub mode: PixelMode,
    /// Bytes from the start of one scanline to the next.
    pub stride: usize,
    /// Scanline data; row `y` starts at `y * stride`.
    pub buffer: PixelBuffer,
    /// Region of this frame still to be cropped, in this frame's coordinates.
    pub crop_rect: CropRect,
    pub metadata: FrameMetadata,
}

impl DecodedFrame {
    /// Create an uncropped frame, validating the scanline layout.
    ///
    /// # Errors
    ///
    /// - `InvalidStride` if `stride` cannot hold one row of pixels
    /// - `BufferTooSmall` if `buffer` ends before the last row does
    ///
    /// Frames in a mode without a known byte layout are accepted unchecked;
    /// operations that need the layout report `UnsupportedPixelFormat`.
    pub fn new(
        width: u32,
        height: u32,
        mode: PixelMode,
        stride: usize,
        buffer: impl Into<PixelBuffer>,
    ) -> Result<Self, HeifError> {
        let buffer = buffer.into();
        if let Some(bpp) = mode.bytes_per_pixel() {
            check_layout(width, height, bpp, stride, buffer.len())?;
        }
        Ok(Self {
            width,
            height,
            mode,
            stride,
            buffer,
            crop_rect: CropRect::full(width, height),
            metadata: FrameMetadata::default(),
        })
    }

    /// Set the crop to apply when the frame is materialized.
    pub fn with_crop(mut self, crop_rect: CropRect) -> Self {
        self.crop_rect = crop_rect;
        self
    }

    pub fn with_metadata(mut self, metadata: FrameMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// True if no crop is pending.
    #[inline]
    pub fn is_uncropped(&self) -> bool {
        self.crop_rect.is_full(self.width, self.height)
    }

    /// Bytes of pixel data in one row (excluding stride padding).
    pub fn row_bytes(&self) -> Option<usize> {
        self.mode
            .bytes_per_pixel()
            .map(|bpp| self.width as usize * bpp)
    }

    /// Scanline `y` including any trailing stride padding that the buffer
    /// still holds. The last scanline may be shorter than `stride`.
    pub fn scanline(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let bytes = self.buffer.as_bytes();
        let start = y as usize * self.stride;
        let end = (start + self.stride).min(bytes.len());
        bytes.get(start..end)
    }

    /// Only the pixel bytes of scanline `y`.
    pub fn pixel_row(&self, y: u32) -> Option<&[u8]> {
        let row_bytes = self.row_bytes()?;
        self.scanline(y)?.get(..row_bytes)
    }

    /// Copy the visible pixels into a tightly packed buffer
    /// (`height` rows of `width * bytes_per_pixel` bytes).
    pub fn to_packed(&self) -> Result<Vec<u8>, HeifError> {
        let row_bytes = self
            .row_bytes()
            .ok_or_else(|| HeifError::UnsupportedPixelFormat(self.mode.to_string()))?;
        let mut out = vec![0u8; row_bytes * self.height as usize];
        self.copy_packed_into(&mut out)?;
        Ok(out)
    }

    /// Copy the visible pixels into `out`, which must hold exactly
    /// `height * width * bytes_per_pixel` bytes.
    pub fn copy_packed_into(&self, out: &mut [u8]) -> Result<(), HeifError> {
        let bpp = self
            .mode
            .bytes_per_pixel()
            .ok_or_else(|| HeifError::UnsupportedPixelFormat(self.mode.to_string()))?;
        check_layout(self.width, self.height, bpp, self.stride, self.buffer.len())?;

        let row_bytes = self.width as usize * bpp;
        let required = row_bytes * self.height as usize;
        if out.len() != required {
            return Err(HeifError::BufferTooSmall {
                required,
                actual: out.len(),
            });
        }
        if row_bytes == 0 {
            return Ok(());
        }

        let src = self.buffer.as_bytes();
        for (y, dst_row) in out.chunks_exact_mut(row_bytes).enumerate() {
            let start = y * self.stride;
            dst_row.copy_from_slice(&src[start..start + row_bytes]);
        }
        Ok(())
    }
}

/// Bytes a buffer needs for `height` rows of `row_bytes`, `stride` apart.
fn required_len(height: u32, row_bytes: usize, stride: usize) -> Option<usize> {
    match height {
        0 => Some(0),
        h => stride.checked_mul(h as usize - 1)?.checked_add(row_bytes),
    }
}

fn check_layout(
    width: u32,
    height: u32,
    bpp: usize,
    stride: usize,
    available: usize,
) -> Result<(), HeifError> {
    let row_bytes = width as usize * bpp;
    if stride < row_bytes {
        return Err(HeifError::InvalidStride { stride, row_bytes });
    }
    let required = required_len(height, row_bytes, stride).unwrap_or(usize::MAX);
    if available < required {
        return Err(HeifError::BufferTooSmall {
            required,
            actual: available,
        });
    }
    Ok(())
}
