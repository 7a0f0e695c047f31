//! `image` crate integration: opening HEIF files as `ImageDecoder`s.
//!
//! [`HeifDecoder`] is the glue between the external codec and the `image`
//! crate. Opening reads headers and reconciles orientation metadata right
//! away; pixels are decoded only when the image is read, at which point the
//! container crop is applied as a view and the visible rows are copied out
//! honoring the codec's stride.
//!
//! # Examples
//!
//! ```ignore
//! use heif_opener_core::{open_image, OpenOptions};
//!
//! let file = std::fs::File::open("photo.heic")?;
//! let opened = open_image(&codec, file, OpenOptions::default())?;
//! println!("{}x{}", opened.image.width(), opened.image.height());
//! ```

use std::io::Read;

use image::{ColorType, DynamicImage, ImageDecoder, ImageResult};
use log::debug;

use crate::codec::{CodecHandle, HeifCodec};
use crate::error::HeifError;
use crate::frame::{CropRect, DecodedFrame, FrameMetadata, PixelMode};
use crate::metadata::tiff_payload;
use crate::options::OpenOptions;
use crate::transform::{apply_crop, reconcile_metadata};

/// An opened HEIF file, ready to be read by the `image` crate.
pub struct HeifDecoder<H: CodecHandle> {
    handle: H,
    mode: PixelMode,
    color_type: ColorType,
    decoded_size: (u32, u32),
    stride: usize,
    crop: CropRect,
    metadata: FrameMetadata,
    options: OpenOptions,
}

impl<H: CodecHandle> HeifDecoder<H> {
    /// Open a file with `codec`.
    ///
    /// # Errors
    ///
    /// - `CodecOpen` if the codec rejects the file
    /// - `UnsupportedPixelFormat` if the codec's pixel mode cannot be represented
    /// - `InvalidCropRect` if the container crop does not fit the image
    pub fn open<C, R>(codec: &C, reader: R, options: OpenOptions) -> Result<Self, HeifError>
    where
        C: HeifCodec<Handle = H>,
        R: Read,
    {
        let handle = codec.open(reader).map_err(HeifError::CodecOpen)?;
        Self::from_handle(handle, options)
    }

    /// Wrap an already opened codec handle.
    pub fn from_handle(handle: H, options: OpenOptions) -> Result<Self, HeifError> {
        let image = handle.image();
        let (width, height) = image.size;

        let mode = image.pixel_mode();
        let color_type = mode
            .color_type()
            .ok_or_else(|| HeifError::UnsupportedPixelFormat(mode.to_string()))?;

        let transformations = image.transformations();
        let crop = if options.apply_crop {
            transformations.crop
        } else {
            CropRect::full(width, height)
        };
        if !crop.fits_within(width, height) {
            return Err(HeifError::InvalidCropRect {
                rect: crop,
                width,
                height,
            });
        }

        let mut metadata = image.frame_metadata();
        if options.apply_orientation {
            metadata = reconcile_metadata(metadata);
        }

        debug!(
            "Opened {}x{} {} image (crop {}, orientation {})",
            width, height, mode, crop, transformations.orientation_tag
        );

        let stride = image.stride;
        Ok(Self {
            handle,
            mode,
            color_type,
            decoded_size: (width, height),
            stride,
            crop,
            metadata,
            options,
        })
    }

    /// Metadata as it will be reported to the host.
    pub fn metadata(&self) -> &FrameMetadata {
        &self.metadata
    }

    /// Size of the codec's output before cropping.
    pub fn decoded_size(&self) -> (u32, u32) {
        self.decoded_size
    }

    /// The crop applied when pixels are read.
    pub fn crop_rect(&self) -> CropRect {
        self.crop
    }

    /// Decode pixels and return the cropped frame.
    ///
    /// # Errors
    ///
    /// - `CodecDecode` if the codec fails to produce pixels
    /// - `InvalidStride` / `BufferTooSmall` if the pixels do not match the
    ///   layout the codec declared
    pub fn into_frame(mut self) -> Result<DecodedFrame, HeifError> {
        let buffer = self
            .handle
            .load(self.options.load_truncated)
            .map_err(HeifError::CodecDecode)?;

        let (width, height) = self.decoded_size;
        let frame = DecodedFrame::new(width, height, self.mode, self.stride, buffer)?
            .with_crop(self.crop)
            .with_metadata(self.metadata);
        apply_crop(frame)
    }
}

impl<H: CodecHandle> ImageDecoder for HeifDecoder<H> {
    fn dimensions(&self) -> (u32, u32) {
        (self.crop.width, self.crop.height)
    }

    fn color_type(&self) -> ColorType {
        self.color_type
    }

    fn icc_profile(&mut self) -> ImageResult<Option<Vec<u8>>> {
        Ok(self
            .metadata
            .color_profile
            .as_ref()
            .map(|profile| profile.data.clone()))
    }

    fn exif_metadata(&mut self) -> ImageResult<Option<Vec<u8>>> {
        Ok(self
            .metadata
            .exif_bytes()
            .map(|exif| tiff_payload(exif).unwrap_or(exif).to_vec()))
    }

    fn read_image(self, buf: &mut [u8]) -> ImageResult<()> {
        let frame = self.into_frame()?;
        frame.copy_packed_into(buf)?;
        Ok(())
    }

    fn read_image_boxed(self: Box<Self>, buf: &mut [u8]) -> ImageResult<()> {
        (*self).read_image(buf)
    }
}

/// A fully loaded image with the metadata the host keeps alongside it.
#[derive(Debug, Clone)]
pub struct OpenedImage {
    pub image: DynamicImage,
    /// Reconciled EXIF block (bare TIFF structure).
    pub exif: Option<Vec<u8>>,
    /// ICC profile bytes.
    pub icc_profile: Option<Vec<u8>>,
}

/// Open and fully decode a HEIF file in one call.
pub fn open_image<C, R>(codec: &C, reader: R, options: OpenOptions) -> ImageResult<OpenedImage>
where
    C: HeifCodec,
    R: Read,
{
    let mut decoder = HeifDecoder::open(codec, reader, options)?;
    let exif = decoder.exif_metadata()?;
    let icc_profile = decoder.icc_profile()?;
    let image = DynamicImage::from_decoder(decoder)?;
    Ok(OpenedImage {
        image,
        exif,
        icc_profile,
    })
}
