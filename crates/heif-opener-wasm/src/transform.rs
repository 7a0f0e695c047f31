//! WASM bindings for the crop and orientation transforms.
//!
//! Crops are zero-copy: the returned frame shares pixel memory with its
//! source. Orientation reconciliation works on raw EXIF bytes so that callers
//! using their own HEIF parser can fold the container orientation in.

use crate::types::{to_js_error, JsDecodedFrame};
use heif_opener_core::metadata::read_orientation;
use heif_opener_core::{
    apply_crop as core_crop, reconcile_metadata, CropRect, FrameMetadata, HeifError,
};
use wasm_bindgen::prelude::*;

/// Crop a frame to the given pixel rectangle.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const frame = new JsDecodedFrame(1280, 720, "RGB", 3840, pixels);
/// const cropped = apply_crop(frame, 99, 33, 512, 256);
/// ```
#[wasm_bindgen]
pub fn apply_crop(
    frame: &JsDecodedFrame,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<JsDecodedFrame, JsValue> {
    crop_frame(frame, CropRect::new(x, y, width, height)).map_err(to_js_error)
}

fn crop_frame(frame: &JsDecodedFrame, rect: CropRect) -> Result<JsDecodedFrame, HeifError> {
    let src = frame.frame().clone().with_crop(rect);
    core_crop(src).map(JsDecodedFrame::from_frame)
}

/// Write a container orientation (1-8) into an EXIF block.
///
/// Returns the amended block, a fresh minimal block if `exif` is missing or
/// malformed, or `exif` unchanged when `orientation_tag` is 0.
#[wasm_bindgen]
pub fn reconcile_exif_orientation(exif: Option<Vec<u8>>, orientation_tag: u32) -> Option<Vec<u8>> {
    let mut metadata = FrameMetadata::new().with_orientation_tag(orientation_tag);
    if let Some(exif) = exif {
        metadata = metadata.with_exif(exif);
    }
    let reconciled = reconcile_metadata(metadata);
    reconciled.exif_bytes().map(<[u8]>::to_vec)
}

/// Read the Orientation tag of an EXIF block, if present.
#[wasm_bindgen]
pub fn exif_orientation(exif: &[u8]) -> Option<u32> {
    read_orientation(exif)
}
