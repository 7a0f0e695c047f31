//! HEIF Opener Core - HEIF/HEIC/AVIF support for the `image` crate
//!
//! This crate adapts an external HEIF codec to the `image` crate's decoder
//! interface. The codec decodes bitstreams; this crate sniffs files, applies
//! the container's crop without copying, and folds the container's
//! orientation into the EXIF block so that EXIF-only consumers see it.

pub mod codec;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod metadata;
pub mod options;
pub mod sniff;
pub mod transform;

pub use codec::{CodecHandle, CodecImage, HeifCodec};
pub use decoder::{open_image, HeifDecoder, OpenedImage};
pub use error::{CodecError, HeifError};
pub use frame::{CropRect, DecodedFrame, FrameMetadata, Orientation, PixelBuffer, PixelMode};
pub use options::OpenOptions;
pub use sniff::{check_heif_magic, detect_format, ContainerFormat};
pub use transform::{apply_crop, reconcile_metadata, reconcile_orientation};

/// Extensions registered for HEIF-family files.
pub const EXTENSIONS: &[&str] = &["heic", "heif", "avif"];

/// MIME types registered for HEIF-family files.
pub const MIME_TYPES: &[&str] = &["image/heif", "image/avif"];
