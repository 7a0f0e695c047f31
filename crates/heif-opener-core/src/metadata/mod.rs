//! EXIF block parsing and orientation rewriting.
//!
//! Parsing is fallible and returns a `Result`; callers that treat malformed
//! metadata as absent do so explicitly with their own fallback.

mod tiff;

use std::io::Cursor;

use exif::experimental::Writer;
use exif::{Exif, Field, In, Reader, Tag, Value};
use log::debug;
use thiserror::Error;

use crate::frame::Orientation;

/// Why an embedded EXIF block could not be used.
#[derive(Debug, Error)]
pub enum ExifError {
    /// The block has no bytes.
    #[error("EXIF block is empty")]
    Empty,

    /// No TIFF header was found in the block.
    #[error("No TIFF header found in EXIF block")]
    MissingTiffHeader,

    /// The TIFF structure is truncated or corrupt.
    #[error("Failed to parse EXIF: {0}")]
    Parse(#[source] exif::Error),

    /// The amended fields could not be serialized.
    #[error("Failed to write EXIF: {0}")]
    Write(#[source] exif::Error),
}

/// The TIFF structure inside an EXIF block, without any `Exif\0\0` marker or
/// HEIF offset header in front of it.
pub fn tiff_payload(block: &[u8]) -> Option<&[u8]> {
    tiff::tiff_payload(block)
}

/// Parse an embedded EXIF block.
///
/// # Errors
///
/// - `ExifError::Empty` for a zero-length block
/// - `ExifError::MissingTiffHeader` if no TIFF structure can be located
/// - `ExifError::Parse` if the TIFF structure is corrupt
pub fn parse_exif(block: &[u8]) -> Result<Exif, ExifError> {
    if block.is_empty() {
        return Err(ExifError::Empty);
    }
    let payload = tiff::tiff_payload(block).ok_or(ExifError::MissingTiffHeader)?;
    Reader::new()
        .read_raw(payload.to_vec())
        .map_err(ExifError::Parse)
}

/// Read the primary image's Orientation value from an EXIF block.
///
/// Returns `None` if the block does not parse or has no Orientation field.
pub fn read_orientation(block: &[u8]) -> Option<u32> {
    let exif = parse_exif(block).ok()?;
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
}

/// Re-serialize parsed EXIF with the primary Orientation set to `orientation`.
///
/// Every other field is kept, as is an embedded JPEG thumbnail. Byte order
/// follows the source block. IFD pointers and thumbnail offsets are
/// regenerated by the writer. Fields whose type the writer cannot encode
/// (`Value::Unknown`) are dropped one by one.
pub fn with_orientation(exif: &Exif, orientation: Orientation) -> Result<Vec<u8>, ExifError> {
    let replacement = orientation_field(orientation);

    let mut writer = Writer::new();
    for field in exif.fields() {
        if field.tag == Tag::Orientation && field.ifd_num == In::PRIMARY {
            continue;
        }
        if let Value::Unknown(typ, count, _) = field.value {
            debug!(
                "Dropping EXIF field {} with unknown type {} ({} values)",
                field.tag, typ, count
            );
            continue;
        }
        writer.push_field(field);
    }
    writer.push_field(&replacement);
    if let Some(jpeg) = thumbnail_jpeg(exif) {
        writer.set_jpeg(jpeg, In::THUMBNAIL);
    }

    write_tiff(&mut writer, exif.little_endian())
}

/// A fresh little-endian EXIF block whose only field is Orientation.
pub fn minimal_exif(orientation: Orientation) -> Result<Vec<u8>, ExifError> {
    let field = orientation_field(orientation);
    let mut writer = Writer::new();
    writer.push_field(&field);
    write_tiff(&mut writer, true)
}

fn write_tiff(writer: &mut Writer<'_>, little_endian: bool) -> Result<Vec<u8>, ExifError> {
    let mut out = Cursor::new(Vec::new());
    writer
        .write(&mut out, little_endian)
        .map_err(ExifError::Write)?;
    Ok(out.into_inner())
}

/// The JPEG thumbnail referenced by IFD1, if it lies within the block.
fn thumbnail_jpeg(exif: &Exif) -> Option<&[u8]> {
    let offset = exif
        .get_field(Tag::JPEGInterchangeFormat, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;
    let len = exif
        .get_field(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;
    exif.buf().get(offset..offset.checked_add(len)?)
}

fn orientation_field(orientation: Orientation) -> Field {
    Field {
        tag: Tag::Orientation,
        ifd_num: In::PRIMARY,
        value: Value::Short(vec![orientation.tag()]),
    }
}
