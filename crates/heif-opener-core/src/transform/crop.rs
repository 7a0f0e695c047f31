//! Zero-copy cropping of decoded frames.
//!
//! A crop never touches pixel data. The cropped frame's buffer is a window into
//! the original allocation that starts at the first cropped pixel and keeps
//! the original stride, so each cropped row is read from its usual place in
//! the decoder's output.
//!
//! # Coordinate System
//!
//! - Crop rectangles are in pixels, relative to the frame they are set on
//! - Origin is top-left corner
//! - Once applied, the crop is consumed: the result's `crop_rect` covers the
//!   whole result, so cropping it again without a new rectangle is a no-op
//!
//! Setting a new rectangle on an already-cropped frame crops within the
//! cropped view; offsets compose because every window is relative to its
//! parent.

use log::debug;

use crate::error::HeifError;
use crate::frame::{CropRect, DecodedFrame, PixelBuffer};

/// Apply the frame's pending crop.
///
/// # Returns
///
/// The input frame unchanged if its `crop_rect` covers the whole frame,
/// otherwise a frame of the cropped size whose buffer shares the input's
/// allocation. Metadata is carried over untouched.
///
/// # Errors
///
/// - `UnsupportedPixelFormat` if the pixel mode has no known byte layout
/// - `InvalidCropRect` if the rectangle extends past the frame
/// - `BufferTooSmall` if the buffer ends before the cropped rows do
pub fn apply_crop(frame: DecodedFrame) -> Result<DecodedFrame, HeifError> {
    // Fast path: nothing to crop
    if frame.is_uncropped() {
        return Ok(frame);
    }

    let bpp = frame
        .mode
        .bytes_per_pixel()
        .ok_or_else(|| HeifError::UnsupportedPixelFormat(frame.mode.to_string()))?;

    let rect = frame.crop_rect;
    if !rect.fits_within(frame.width, frame.height) {
        return Err(HeifError::InvalidCropRect {
            rect,
            width: frame.width,
            height: frame.height,
        });
    }

    let buffer = if rect.width == 0 || rect.height == 0 {
        frame.buffer.empty_view()
    } else {
        crop_window(&frame, rect, bpp)?
    };

    debug!(
        "Cropping {}x{} frame to {} (view offset {}, {} bytes)",
        frame.width,
        frame.height,
        rect,
        buffer.offset(),
        buffer.len()
    );

    Ok(DecodedFrame {
        width: rect.width,
        height: rect.height,
        mode: frame.mode,
        stride: frame.stride,
        buffer,
        crop_rect: CropRect::full(rect.width, rect.height),
        metadata: frame.metadata,
    })
}

/// Compute the window for a non-empty crop.
///
/// The window spans `stride * height` bytes from the first cropped pixel. When
/// the crop touches the bottom edge at `x > 0`, a tightly sized buffer ends
/// `x * bpp` bytes short of that; the window is clamped to what exists, which
/// still covers every visible pixel of the last row. A layout whose offsets do
/// not fit in `usize` is reported as `BufferTooSmall`.
fn crop_window(
    frame: &DecodedFrame,
    rect: CropRect,
    bpp: usize,
) -> Result<PixelBuffer, HeifError> {
    let available = frame.buffer.len();
    let too_small = |required: usize| HeifError::BufferTooSmall {
        required,
        actual: available,
    };

    let row_bytes = bpp
        .checked_mul(rect.width as usize)
        .ok_or(too_small(usize::MAX))?;
    let offset = frame
        .stride
        .checked_mul(rect.y as usize)
        .and_then(|top| top.checked_add(bpp.checked_mul(rect.x as usize)?))
        .ok_or(too_small(usize::MAX))?;
    let visible_end = frame
        .stride
        .checked_mul(rect.height as usize - 1)
        .and_then(|span| span.checked_add(offset)?.checked_add(row_bytes))
        .ok_or(too_small(usize::MAX))?;

    if visible_end > available {
        return Err(too_small(visible_end));
    }

    let len = frame
        .stride
        .saturating_mul(rect.height as usize)
        .min(available - offset);
    frame
        .buffer
        .view(offset, len)
        .ok_or(too_small(offset + len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameMetadata, PixelMode};

    /// Create a frame where each byte holds its own offset modulo 251.
    fn test_frame(width: u32, height: u32, mode: PixelMode, stride: usize) -> DecodedFrame {
        let pixels: Vec<u8> = (0..stride * height as usize)
            .map(|i| (i % 251) as u8)
            .collect();
        DecodedFrame::new(width, height, mode, stride, pixels).unwrap()
    }

    #[test]
    fn test_full_crop_is_identity() {
        let frame = test_frame(10, 20, PixelMode::Rgb24, 30);
        let result = apply_crop(frame.clone()).unwrap();

        assert_eq!(result, frame);
        assert!(result.buffer.shares_allocation(&frame.buffer));
        assert_eq!(result.buffer.offset(), 0);
    }

    #[test]
    fn test_full_crop_skips_mode_check() {
        let frame = DecodedFrame::new(4, 4, PixelMode::Other("I;16".into()), 8, vec![0u8; 32])
            .unwrap();
        assert!(apply_crop(frame).is_ok());
    }

    #[test]
    fn test_crop_top_left_keeps_full_stride() {
        let frame = test_frame(10, 20, PixelMode::Rgb24, 30);
        let original = frame.buffer.as_bytes().to_vec();

        let result = apply_crop(frame.with_crop(CropRect::new(0, 0, 5, 10))).unwrap();

        assert_eq!((result.width, result.height), (5, 10));
        assert_eq!(result.stride, 30);
        assert_eq!(result.buffer.len(), 300);
        for i in 0..10 {
            assert_eq!(
                result.scanline(i).unwrap(),
                &original[i as usize * 30..i as usize * 30 + 30]
            );
        }
    }

    #[test]
    fn test_crop_with_offset() {
        let frame = test_frame(10, 20, PixelMode::Rgb24, 30);
        let original = frame.buffer.as_bytes().to_vec();

        let result = apply_crop(frame.with_crop(CropRect::new(2, 3, 5, 10))).unwrap();

        assert_eq!((result.width, result.height), (5, 10));
        for i in 0..10usize {
            let start = 30 * (3 + i) + 3 * 2;
            assert_eq!(result.scanline(i as u32).unwrap(), &original[start..start + 30]);
        }
    }

    #[test]
    fn test_crop_resets_crop_rect() {
        let frame = test_frame(10, 20, PixelMode::Rgb24, 30);
        let result = apply_crop(frame.with_crop(CropRect::new(2, 3, 5, 10))).unwrap();

        assert_eq!(result.crop_rect, CropRect::full(5, 10));
        assert!(result.is_uncropped());

        // Applying again is a no-op
        let again = apply_crop(result.clone()).unwrap();
        assert_eq!(again, result);
    }

    #[test]
    fn test_crop_is_zero_copy() {
        let frame = test_frame(10, 20, PixelMode::Rgba32, 40);
        let base = frame.buffer.clone();

        let result = apply_crop(frame.with_crop(CropRect::new(1, 1, 2, 2))).unwrap();

        assert!(result.buffer.shares_allocation(&base));
        assert_eq!(result.buffer.offset(), 40 + 4);
        assert_eq!(
            result.buffer.as_bytes().as_ptr(),
            base.as_bytes()[44..].as_ptr()
        );
    }

    #[test]
    fn test_crop_outlives_original_frame() {
        let cropped = {
            let frame = test_frame(4, 4, PixelMode::Gray8, 4);
            apply_crop(frame.with_crop(CropRect::new(1, 1, 2, 2))).unwrap()
        };
        assert_eq!(cropped.to_packed().unwrap(), vec![5, 6, 9, 10]);
    }

    #[test]
    fn test_crop_bottom_right_tight_buffer() {
        // Buffer is exactly stride * height; the view must not run past it
        let frame = test_frame(4, 4, PixelMode::Gray8, 4);
        let result = apply_crop(frame.with_crop(CropRect::new(2, 2, 2, 2))).unwrap();

        assert_eq!(result.buffer.len(), 6);
        assert_eq!(result.to_packed().unwrap(), vec![10, 11, 14, 15]);
    }

    #[test]
    fn test_crop_preserves_metadata() {
        let metadata = FrameMetadata::new()
            .with_orientation_tag(6)
            .with_exif(vec![1u8, 2, 3]);
        let frame = test_frame(10, 10, PixelMode::Rgb24, 30)
            .with_metadata(metadata.clone())
            .with_crop(CropRect::new(1, 1, 5, 5));

        let result = apply_crop(frame).unwrap();
        assert_eq!(result.metadata, metadata);
    }

    #[test]
    fn test_crop_unsupported_mode() {
        let frame = DecodedFrame::new(4, 4, PixelMode::Other("CMYK".into()), 16, vec![0u8; 64])
            .unwrap()
            .with_crop(CropRect::new(0, 0, 2, 2));

        match apply_crop(frame) {
            Err(HeifError::UnsupportedPixelFormat(mode)) => assert_eq!(mode, "CMYK"),
            other => panic!("Expected UnsupportedPixelFormat, got: {:?}", other),
        }
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let frame = test_frame(10, 20, PixelMode::Rgb24, 30);

        for rect in [
            CropRect::new(6, 0, 5, 10),
            CropRect::new(0, 11, 5, 10),
            CropRect::new(0, 0, 11, 20),
            CropRect::new(u32::MAX, 0, 1, 1),
        ] {
            let result = apply_crop(frame.clone().with_crop(rect));
            assert!(
                matches!(result, Err(HeifError::InvalidCropRect { rect: r, width: 10, height: 20 }) if r == rect),
                "Expected InvalidCropRect for {}",
                rect
            );
        }
    }

    #[test]
    fn test_crop_empty_rect() {
        let frame = test_frame(10, 20, PixelMode::Rgb24, 30);
        let result = apply_crop(frame.with_crop(CropRect::new(10, 20, 0, 0))).unwrap();

        assert_eq!((result.width, result.height), (0, 0));
        assert!(result.buffer.is_empty());
        assert!(result.to_packed().unwrap().is_empty());
    }

    #[test]
    fn test_crop_overflowing_layout() {
        // Hand-built frame whose stride makes row offsets overflow usize
        let frame = DecodedFrame {
            width: 10,
            height: 10,
            mode: PixelMode::Gray8,
            stride: usize::MAX / 2,
            buffer: PixelBuffer::new(vec![0u8; 64]),
            crop_rect: CropRect::new(0, 4, 2, 2),
            metadata: FrameMetadata::new(),
        };

        match apply_crop(frame) {
            Err(HeifError::BufferTooSmall { required, actual }) => {
                assert_eq!(required, usize::MAX);
                assert_eq!(actual, 64);
            }
            other => panic!("Expected BufferTooSmall, got: {:?}", other),
        }
    }

    #[test]
    fn test_crop_past_short_buffer() {
        // Layout fits in usize but the buffer ends before the cropped rows
        let frame = DecodedFrame {
            width: 4,
            height: 4,
            mode: PixelMode::Gray8,
            stride: 4,
            buffer: PixelBuffer::new(vec![0u8; 8]),
            crop_rect: CropRect::new(1, 2, 2, 2),
            metadata: FrameMetadata::new(),
        };

        assert!(matches!(
            apply_crop(frame),
            Err(HeifError::BufferTooSmall {
                required: 15,
                actual: 8
            })
        ));
    }

    #[test]
    fn test_crop_of_crop_composes() {
        let frame = test_frame(20, 20, PixelMode::Rgb24, 64);

        let first = apply_crop(frame.clone().with_crop(CropRect::new(4, 3, 12, 10))).unwrap();
        let nested = apply_crop(first.with_crop(CropRect::new(2, 1, 5, 6))).unwrap();
        let direct = apply_crop(frame.with_crop(CropRect::new(6, 4, 5, 6))).unwrap();

        assert_eq!(nested.to_packed().unwrap(), direct.to_packed().unwrap());
        assert_eq!(nested.buffer.offset(), direct.buffer.offset());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
