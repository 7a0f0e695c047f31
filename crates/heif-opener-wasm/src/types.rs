//! WASM-compatible wrapper types for decoded frames.
//!
//! This module provides a JavaScript-friendly handle around the core
//! `DecodedFrame`, so that pixels stay in WASM memory while crops are taken.

use heif_opener_core::{DecodedFrame, HeifError, PixelMode};
use wasm_bindgen::prelude::*;

/// A decoded frame wrapper for JavaScript.
///
/// # Memory Management
///
/// Pixel data lives in WASM memory and is shared between a frame and every
/// crop taken from it. `packed_pixels()` copies the visible pixels out to a
/// `Uint8Array`.
#[wasm_bindgen]
pub struct JsDecodedFrame {
    inner: DecodedFrame,
}

#[wasm_bindgen]
impl JsDecodedFrame {
    /// Wrap codec output.
    ///
    /// # Arguments
    /// * `width` - Frame width in pixels
    /// * `height` - Frame height in pixels
    /// * `mode` - Codec pixel mode (`L`, `RGB` or `RGBA`)
    /// * `stride` - Bytes per scanline, including padding
    /// * `pixels` - Scanlines, `stride` bytes apart
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        mode: &str,
        stride: usize,
        pixels: Vec<u8>,
    ) -> Result<JsDecodedFrame, JsValue> {
        Self::try_new(width, height, mode, stride, pixels).map_err(to_js_error)
    }

    /// Get the frame width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the frame height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel mode name
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.inner.mode.to_string()
    }

    /// Get the distance in bytes between scanlines
    #[wasm_bindgen(getter)]
    pub fn stride(&self) -> usize {
        self.inner.stride
    }

    /// Get the number of bytes in the frame's view of the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.buffer.len()
    }

    /// Returns the visible pixels as tightly packed rows.
    pub fn packed_pixels(&self) -> Result<Vec<u8>, JsValue> {
        self.inner.to_packed().map_err(to_js_error)
    }
}

impl JsDecodedFrame {
    pub(crate) fn try_new(
        width: u32,
        height: u32,
        mode: &str,
        stride: usize,
        pixels: Vec<u8>,
    ) -> Result<Self, HeifError> {
        let mode = PixelMode::from_codec_mode(mode);
        DecodedFrame::new(width, height, mode, stride, pixels).map(Self::from_frame)
    }

    pub(crate) fn from_frame(inner: DecodedFrame) -> Self {
        Self { inner }
    }

    pub(crate) fn frame(&self) -> &DecodedFrame {
        &self.inner
    }
}

pub(crate) fn to_js_error(err: HeifError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
