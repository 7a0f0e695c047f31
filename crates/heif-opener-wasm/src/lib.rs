//! HEIF Opener WASM - WebAssembly bindings for heif-opener-core
//!
//! This crate exposes format sniffing, zero-copy cropping and EXIF orientation
//! reconciliation to JavaScript/TypeScript applications that decode HEIF
//! pixels with a codec of their own.
//!
//! # Module Structure
//!
//! - `detect` - Magic-byte format detection
//! - `types` - WASM-compatible wrapper type for decoded frames
//! - `transform` - Crop and orientation bindings
//!
//! # Usage
//!
//! ```typescript
//! import init, { check_heif_magic, JsDecodedFrame, apply_crop } from '@heif-opener/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const frame = new JsDecodedFrame(width, height, "RGB", stride, pixels);
//! const cropped = apply_crop(frame, x, y, w, h);
//! const rgb = cropped.packed_pixels();
//! ```

use wasm_bindgen::prelude::*;

mod detect;
mod transform;
mod types;

// Re-export public types
pub use detect::{check_heif_magic, detect_format};
pub use transform::{apply_crop, exif_orientation, reconcile_exif_orientation};
pub use types::JsDecodedFrame;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
