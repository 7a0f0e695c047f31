//! Format detection WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { check_heif_magic, detect_format } from '@heif-opener/wasm';
//!
//! const head = new Uint8Array(await file.slice(0, 16).arrayBuffer());
//! if (check_heif_magic(head)) {
//!   const { format, mime_type } = detect_format(head);
//!   console.log(`${format} (${mime_type})`);
//! }
//! ```

use heif_opener_core::{
    check_heif_magic as core_check, detect_format as core_detect, ContainerFormat,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Format description handed to JavaScript.
#[derive(Debug, Serialize)]
pub(crate) struct FormatInfo {
    format: ContainerFormat,
    mime_type: &'static str,
    extensions: &'static [&'static str],
}

impl From<ContainerFormat> for FormatInfo {
    fn from(format: ContainerFormat) -> Self {
        Self {
            format,
            mime_type: format.mime_type(),
            extensions: format.extensions(),
        }
    }
}

/// Check whether bytes start a HEIF, HEIC or AVIF file.
///
/// Only the first 12 bytes are inspected.
#[wasm_bindgen]
pub fn check_heif_magic(bytes: &[u8]) -> bool {
    core_check(bytes)
}

/// Detect the container format.
///
/// Returns `{ format, mime_type, extensions }`, or `null` if the bytes are not
/// a HEIF-family file.
#[wasm_bindgen]
pub fn detect_format(bytes: &[u8]) -> Result<JsValue, JsValue> {
    match format_info(bytes) {
        Some(info) => {
            serde_wasm_bindgen::to_value(&info).map_err(|e| JsValue::from_str(&e.to_string()))
        }
        None => Ok(JsValue::NULL),
    }
}

pub(crate) fn format_info(bytes: &[u8]) -> Option<FormatInfo> {
    core_detect(bytes).map(FormatInfo::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_heif_magic() {
        assert!(check_heif_magic(b"\x00\x00\x00\x18ftypheic"));
        assert!(check_heif_magic(b"\x00\x00\x00\x18ftypavif"));
        assert!(!check_heif_magic(b"\xff\xd8\xff\xe0\x00\x10JFIF"));
    }

    #[test]
    fn test_format_info() {
        let info = format_info(b"\x00\x00\x00\x1cftypmif1").unwrap();
        assert_eq!(info.format, ContainerFormat::Heif);
        assert_eq!(info.mime_type, "image/heif");
        assert_eq!(info.extensions, &["heic", "heif"]);

        let info = format_info(b"\x00\x00\x00\x1cftypavis").unwrap();
        assert_eq!(info.format, ContainerFormat::Avif);

        assert!(format_info(b"\x00\x00\x00\x1cftypisom").is_none());
    }
}

/// WASM-specific tests that require JsValue.
///
/// `detect_format` returns a `JsValue` and can only run on wasm32 targets.
/// Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Deserialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Deserialize)]
    struct DetectedFormat {
        format: String,
        mime_type: String,
        extensions: Vec<String>,
    }

    #[wasm_bindgen_test]
    fn test_detect_heic() {
        let value = detect_format(b"\x00\x00\x00\x18ftypheic").unwrap();
        let detected: DetectedFormat = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(detected.format, "heif");
        assert_eq!(detected.mime_type, "image/heif");
        assert_eq!(detected.extensions, vec!["heic", "heif"]);
    }

    #[wasm_bindgen_test]
    fn test_detect_avif() {
        let value = detect_format(b"\x00\x00\x00\x18ftypavif").unwrap();
        let detected: DetectedFormat = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(detected.format, "avif");
        assert_eq!(detected.mime_type, "image/avif");
    }

    #[wasm_bindgen_test]
    fn test_detect_unknown_is_null() {
        let value = detect_format(b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0d").unwrap();
        assert!(value.is_null());
    }
}
