//! Value types describing a decoded frame's layout and metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pixel layout reported by the codec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelMode {
    /// 8-bit grayscale ("L").
    Gray8,
    /// 8-bit RGB ("RGB").
    Rgb24,
    /// 8-bit RGB with alpha ("RGBA").
    Rgba32,
    /// Any other codec mode, kept by name.
    Other(String),
}

impl PixelMode {
    /// Map a codec mode string to a pixel mode.
    pub fn from_codec_mode(mode: &str) -> Self {
        match mode {
            "L" => PixelMode::Gray8,
            "RGB" => PixelMode::Rgb24,
            "RGBA" => PixelMode::Rgba32,
            other => PixelMode::Other(other.to_string()),
        }
    }

    /// Bytes per pixel, or `None` for modes without a known layout.
    #[inline]
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelMode::Gray8 => Some(1),
            PixelMode::Rgb24 => Some(3),
            PixelMode::Rgba32 => Some(4),
            PixelMode::Other(_) => None,
        }
    }

    /// The matching `image` crate color type.
    pub fn color_type(&self) -> Option<image::ColorType> {
        match self {
            PixelMode::Gray8 => Some(image::ColorType::L8),
            PixelMode::Rgb24 => Some(image::ColorType::Rgb8),
            PixelMode::Rgba32 => Some(image::ColorType::Rgba8),
            PixelMode::Other(_) => None,
        }
    }

    /// The codec's name for this mode.
    pub fn name(&self) -> &str {
        match self {
            PixelMode::Gray8 => "L",
            PixelMode::Rgb24 => "RGB",
            PixelMode::Rgba32 => "RGBA",
            PixelMode::Other(name) => name,
        }
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pixel rectangle in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering a whole `width` x `height` frame.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// True if this rectangle covers exactly the whole frame.
    #[inline]
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        *self == Self::full(width, height)
    }

    /// True if the rectangle lies inside a `width` x `height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

impl From<(u32, u32, u32, u32)> for CropRect {
    fn from((x, y, width, height): (u32, u32, u32, u32)) -> Self {
        Self::new(x, y, width, height)
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.width, self.height)
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Parse an EXIF orientation value. Anything outside 1-8 is `None`.
    pub fn from_tag(value: u32) -> Option<Self> {
        match value {
            1 => Some(Orientation::Normal),
            2 => Some(Orientation::FlipHorizontal),
            3 => Some(Orientation::Rotate180),
            4 => Some(Orientation::FlipVertical),
            5 => Some(Orientation::Transpose),
            6 => Some(Orientation::Rotate90CW),
            7 => Some(Orientation::Transverse),
            8 => Some(Orientation::Rotate270CW),
            _ => None,
        }
    }

    /// The EXIF value of this orientation.
    #[inline]
    pub fn tag(self) -> u16 {
        self as u16
    }
}

/// Which flavor of ICC profile the container carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileKind {
    /// Restricted ICC (`rICC`): monochrome or three-component matrix profiles.
    Restricted,
    /// Unrestricted ICC (`prof`).
    Full,
}

impl ProfileKind {
    /// Map the codec's profile type. Non-ICC types (such as `nclx`) yield `None`.
    pub fn from_codec_type(kind: &str) -> Option<Self> {
        match kind {
            "rICC" => Some(ProfileKind::Restricted),
            "prof" => Some(ProfileKind::Full),
            _ => None,
        }
    }
}

/// An embedded ICC color profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorProfile {
    pub kind: ProfileKind,
    pub data: Vec<u8>,
}
