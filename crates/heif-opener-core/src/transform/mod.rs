//! Post-decode transformations: cropping and orientation.
//!
//! Both run after the codec has described the image, and neither rotates or
//! copies pixels.
//!
//! # Transform Order
//!
//! When a HEIF image is opened, transforms are applied in this order:
//! 1. Orientation reconciliation (metadata only, at open time)
//! 2. Crop (buffer view, once pixels are decoded)
//!
//! # Coordinate System
//!
//! - Crop coordinates are in pixels of the frame being cropped
//! - Origin is top-left corner
//! - Orientation values follow EXIF (1-8); 0 means none pending

mod crop;
mod orientation;

pub use crop::apply_crop;
pub use orientation::{reconcile_metadata, reconcile_orientation};
