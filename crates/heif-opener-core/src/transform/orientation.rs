//! Reconciliation of container orientation with embedded EXIF.
//!
//! HEIF stores rotation and mirroring as container properties (`irot`/`imir`)
//! that override any Orientation tag the camera left in the EXIF block. Pixels
//! are not rotated here; instead the container's orientation is written into
//! the EXIF block so consumers that only read EXIF see the right value, and
//! the frame's pending orientation is cleared.
//!
//! # Precedence
//!
//! | orientation_tag | EXIF                    | result                          |
//! |-----------------|-------------------------|---------------------------------|
//! | 0               | any                     | unchanged                       |
//! | 1-8             | none, empty, malformed  | fresh EXIF with Orientation     |
//! | 1-8             | valid                   | same EXIF, Orientation replaced |

use std::sync::Arc;

use log::{debug, warn};

use crate::frame::{DecodedFrame, FrameMetadata, Orientation};
use crate::metadata;

/// Fold the frame's container orientation into its EXIF block.
///
/// Only metadata changes; the pixel buffer is moved through untouched. Never
/// fails: an EXIF block that cannot be parsed is replaced by a minimal one.
pub fn reconcile_orientation(mut frame: DecodedFrame) -> DecodedFrame {
    frame.metadata = reconcile_metadata(frame.metadata);
    frame
}

/// Metadata-only form of [`reconcile_orientation`], for use before pixels
/// have been decoded.
///
/// The existing EXIF bytes are never modified in place; a new block replaces
/// them, so other holders of the old block are unaffected.
pub fn reconcile_metadata(metadata: FrameMetadata) -> FrameMetadata {
    let Some(orientation) = Orientation::from_tag(metadata.orientation_tag) else {
        return metadata;
    };

    let exif = match amend_exif(metadata.exif_bytes(), orientation) {
        Ok(exif) => exif,
        Err(err) => {
            warn!("Could not write orientation {}: {}", orientation.tag(), err);
            return metadata;
        }
    };
    debug!(
        "Reconciled container orientation {} into {}-byte EXIF block",
        orientation.tag(),
        exif.len()
    );

    FrameMetadata {
        orientation_tag: 0,
        exif: Some(Arc::from(exif)),
        ..metadata
    }
}

/// Produce an EXIF block carrying `orientation`, amending `existing` when it
/// parses and falling back to a minimal block when it is absent or malformed.
fn amend_exif(
    existing: Option<&[u8]>,
    orientation: Orientation,
) -> Result<Vec<u8>, metadata::ExifError> {
    let Some(block) = existing else {
        return metadata::minimal_exif(orientation);
    };

    let amended = metadata::parse_exif(block)
        .and_then(|exif| metadata::with_orientation(&exif, orientation));
    match amended {
        Ok(exif) => Ok(exif),
        Err(err) => {
            // Malformed metadata is treated as absent
            warn!("Discarding embedded EXIF block: {}", err);
            metadata::minimal_exif(orientation)
        }
    }
}
