//! Low-level TIFF framing for EXIF blocks.
//!
//! HEIF files wrap the EXIF TIFF structure in one of a few envelopes. This
//! module finds the TIFF payload inside them.

// TIFF constants
const TIFF_MAGIC_LE: [u8; 4] = [0x49, 0x49, 0x2A, 0x00]; // II + 42
const TIFF_MAGIC_BE: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A]; // MM + 42

// JPEG APP1-style marker some encoders keep in front of the TIFF header
const EXIF_MARKER: &[u8; 6] = b"Exif\0\0";

/// Check if a byte slice starts with a TIFF header of either byte order.
#[inline]
pub(crate) fn has_tiff_header(data: &[u8]) -> bool {
    data.len() >= 4 && (data[..4] == TIFF_MAGIC_LE || data[..4] == TIFF_MAGIC_BE)
}

/// Locate the TIFF structure inside an EXIF block.
///
/// Accepts a bare TIFF structure, one preceded by `Exif\0\0`, or the HEIF
/// item layout: a big-endian u32 giving the distance from the end of that
/// field to the TIFF header.
pub(crate) fn tiff_payload(block: &[u8]) -> Option<&[u8]> {
    if has_tiff_header(block) {
        return Some(block);
    }

    if let Some(rest) = block.strip_prefix(EXIF_MARKER) {
        return has_tiff_header(rest).then_some(rest);
    }

    let header: [u8; 4] = block.get(..4)?.try_into().ok()?;
    let start = usize::try_from(u32::from_be_bytes(header))
        .ok()?
        .checked_add(4)?;
    let rest = block.get(start..)?;
    has_tiff_header(rest).then_some(rest)
}
