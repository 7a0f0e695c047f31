//! Settings for opening HEIF images.

use serde::{Deserialize, Serialize};

/// Options controlling how a HEIF file is opened and materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenOptions {
    /// Ask the codec for best-effort pixels when the bitstream is truncated,
    /// instead of failing the load.
    pub load_truncated: bool,
    /// Apply the container's crop rectangle.
    pub apply_crop: bool,
    /// Fold the container's orientation into the EXIF block.
    pub apply_orientation: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            load_truncated: false,
            apply_crop: true,
            apply_orientation: true,
        }
    }
}

impl OpenOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_load_truncated(mut self, load_truncated: bool) -> Self {
        self.load_truncated = load_truncated;
        self
    }

    pub fn with_apply_crop(mut self, apply_crop: bool) -> Self {
        self.apply_crop = apply_crop;
        self
    }

    pub fn with_apply_orientation(mut self, apply_orientation: bool) -> Self {
        self.apply_orientation = apply_orientation;
        self
    }
}
