//! The external HEIF codec, seen from this crate.
//!
//! Bitstream decoding and container parsing live in a native codec. This
//! module defines what the opener needs from it: a way to open a file, a
//! description of the primary image, and a deferred pixel load. The codec
//! may succeed at [`HeifCodec::open`] and still fail later in
//! [`CodecHandle::load`], e.g. for truncated files.

use std::io::Read;

use crate::error::CodecError;
use crate::frame::{ColorProfile, CropRect, FrameMetadata, PixelBuffer, PixelMode, ProfileKind};

/// A codec able to open HEIF-family files.
pub trait HeifCodec {
    /// The opened file.
    type Handle: CodecHandle;

    /// Read container and header data. Pixels are not decoded yet.
    fn open<R: Read>(&self, reader: R) -> Result<Self::Handle, CodecError>;
}

/// An opened file whose pixels can be decoded on demand.
pub trait CodecHandle {
    /// Description of the primary image.
    fn image(&self) -> &CodecImage;

    /// Decode pixel data, laid out as `image().stride`-byte scanlines.
    ///
    /// With `allow_truncated`, a codec should return whatever pixels it could
    /// reconstruct instead of failing on incomplete data.
    fn load(&mut self, allow_truncated: bool) -> Result<PixelBuffer, CodecError>;
}

/// A metadata item attached to the image, tagged with its type (e.g. `Exif`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecMetadata {
    pub kind: String,
    pub data: Vec<u8>,
}

/// The color profile as reported by the codec (`rICC`, `prof`, `nclx`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecColorProfile {
    pub kind: String,
    pub data: Vec<u8>,
}

/// Transformations declared by the container but not applied by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transformations {
    /// Region to keep, in decoded-image coordinates.
    pub crop: CropRect,
    /// EXIF-style orientation: 0 for none, 1-8 otherwise.
    pub orientation_tag: u32,
}

/// Read-only description of the primary image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecImage {
    /// Decoded size (before any crop).
    pub size: (u32, u32),
    /// Codec pixel mode name (`L`, `RGB`, `RGBA`, ...).
    pub mode: String,
    /// Bytes per scanline of the decoded pixels.
    pub stride: usize,
    pub metadata: Vec<CodecMetadata>,
    pub color_profile: Option<CodecColorProfile>,
    /// Absent for codecs that apply transformations themselves.
    pub transformations: Option<Transformations>,
    /// Convenience EXIF field; takes precedence over `metadata`.
    pub exif: Option<Vec<u8>>,
}

impl CodecImage {
    /// A plain image with no metadata and no pending transformations.
    pub fn new(width: u32, height: u32, mode: impl Into<String>, stride: usize) -> Self {
        Self {
            size: (width, height),
            mode: mode.into(),
            stride,
            metadata: Vec::new(),
            color_profile: None,
            transformations: None,
            exif: None,
        }
    }

    pub fn pixel_mode(&self) -> PixelMode {
        PixelMode::from_codec_mode(&self.mode)
    }

    /// Pending transformations, or the identity if the codec reported none.
    pub fn transformations(&self) -> Transformations {
        self.transformations.unwrap_or(Transformations {
            crop: CropRect::full(self.size.0, self.size.1),
            orientation_tag: 0,
        })
    }

    /// The EXIF block: the `exif` field if set, else the first `Exif` item.
    pub fn exif_block(&self) -> Option<&[u8]> {
        self.exif.as_deref().or_else(|| {
            self.metadata
                .iter()
                .find(|item| item.kind == "Exif")
                .map(|item| item.data.as_slice())
        })
    }

    /// The ICC profile, if the codec reported an ICC-based one.
    pub fn icc_profile(&self) -> Option<ColorProfile> {
        let profile = self.color_profile.as_ref()?;
        let kind = ProfileKind::from_codec_type(&profile.kind)?;
        Some(ColorProfile {
            kind,
            data: profile.data.clone(),
        })
    }

    /// Typed frame metadata, before orientation reconciliation.
    pub fn frame_metadata(&self) -> FrameMetadata {
        FrameMetadata {
            orientation_tag: self.transformations().orientation_tag,
            exif: self.exif_block().map(Into::into),
            color_profile: self.icc_profile(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: &str, data: &[u8]) -> CodecMetadata {
        CodecMetadata {
            kind: kind.to_string(),
            data: data.to_vec(),
        }
    }

    #[test]
    fn test_transformations_default_to_identity() {
        let image = CodecImage::new(1280, 720, "RGB", 3840);
        let t = image.transformations();
        assert_eq!(t.crop, CropRect::full(1280, 720));
        assert_eq!(t.orientation_tag, 0);
    }

    #[test]
    fn test_exif_block_from_metadata_list() {
        let mut image = CodecImage::new(10, 20, "RGB", 30);
        image.metadata = vec![
            item("foo", b"bar"),
            item("Exif", b"first"),
            item("Exif", b"second"),
        ];
        assert_eq!(image.exif_block(), Some(&b"first"[..]));
    }

    #[test]
    fn test_exif_field_wins_over_metadata() {
        let mut image = CodecImage::new(10, 20, "RGB", 30);
        image.metadata = vec![item("Exif", b"from list")];
        image.exif = Some(b"top level".to_vec());
        assert_eq!(image.exif_block(), Some(&b"top level"[..]));
    }

    #[test]
    fn test_unrelated_metadata_ignored() {
        let mut image = CodecImage::new(10, 20, "RGB", 30);
        image.metadata = vec![item("foo", b"bar"), item("bar", b"foo")];
        assert_eq!(image.exif_block(), None);
        assert_eq!(image.frame_metadata().exif, None);
    }

    #[test]
    fn test_icc_profile_kinds() {
        let mut image = CodecImage::new(1, 1, "RGB", 3);
        for (kind, expected) in [
            ("rICC", Some(ProfileKind::Restricted)),
            ("prof", Some(ProfileKind::Full)),
            ("nclx", None),
        ] {
            image.color_profile = Some(CodecColorProfile {
                kind: kind.to_string(),
                data: vec![0xAB; 4],
            });
            assert_eq!(image.icc_profile().map(|p| p.kind), expected);
        }
    }

    #[test]
    fn test_frame_metadata() {
        let mut image = CodecImage::new(10, 20, "RGBA", 40);
        image.transformations = Some(Transformations {
            crop: CropRect::new(1, 2, 3, 4),
            orientation_tag: 6,
        });
        image.exif = Some(vec![1, 2, 3]);

        let meta = image.frame_metadata();
        assert_eq!(meta.orientation_tag, 6);
        assert_eq!(meta.exif_bytes(), Some(&[1u8, 2, 3][..]));
        assert!(meta.color_profile.is_none());
        assert_eq!(image.pixel_mode(), PixelMode::Rgba32);
    }
}
