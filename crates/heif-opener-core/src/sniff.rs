//! Magic-byte detection of HEIF-family containers.
//!
//! ISO-BMFF files start with an `ftyp` box: a 4-byte size, the ASCII type
//! `ftyp`, then the 4-byte major brand. The brand identifies the flavor.
//!
//! Brands:
//! - `heic`: the usual HEIF images
//! - `heix`: 10-bit images, or anything using HEVC range extensions
//! - `hevc`, `hevx`: image sequences
//! - `heim`, `heis`: multiview and scalable images
//! - `hevm`, `hevs`: multiview and scalable sequences
//! - `mif1`, `msf1`: generic image / sequence brands (iPhone uses `mif1`)
//! - `avif`, `avis`: AV1 images and sequences

use serde::{Deserialize, Serialize};

/// Offset of the box type in the leading `ftyp` box.
const BOX_TYPE_RANGE: std::ops::Range<usize> = 4..8;
/// Offset of the major brand in the leading `ftyp` box.
const BRAND_RANGE: std::ops::Range<usize> = 8..12;

const HEIF_BRANDS: [&[u8; 4]; 10] = [
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"hevm", b"hevs", b"mif1", b"msf1",
];

const AVIF_BRANDS: [&[u8; 4]; 2] = [b"avif", b"avis"];

/// Container flavors this opener handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    /// HEIF/HEIC (HEVC-coded, or a generic `mif1`/`msf1` file).
    Heif,
    /// AVIF (AV1-coded).
    Avif,
}

impl ContainerFormat {
    /// Get the MIME type for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            ContainerFormat::Heif => "image/heif",
            ContainerFormat::Avif => "image/avif",
        }
    }

    /// File extensions conventionally used for this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ContainerFormat::Heif => &["heic", "heif"],
            ContainerFormat::Avif => &["avif"],
        }
    }

    /// Guess a format from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        [ContainerFormat::Heif, ContainerFormat::Avif]
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }
}

/// Detect the container format from the first bytes of a file.
///
/// Requires the `ftyp` box type at offset 4 and a recognized major brand at
/// offset 8. Input shorter than 12 bytes yields `None`.
pub fn detect_format(data: &[u8]) -> Option<ContainerFormat> {
    if data.get(BOX_TYPE_RANGE)? != b"ftyp" {
        return None;
    }
    let brand = data.get(BRAND_RANGE)?;
    if HEIF_BRANDS.iter().any(|b| b.as_slice() == brand) {
        Some(ContainerFormat::Heif)
    } else if AVIF_BRANDS.iter().any(|b| b.as_slice() == brand) {
        Some(ContainerFormat::Avif)
    } else {
        None
    }
}

/// Returns true if the data plausibly starts a HEIF, HEIC or AVIF file.
pub fn check_heif_magic(data: &[u8]) -> bool {
    detect_format(data).is_some()
}
