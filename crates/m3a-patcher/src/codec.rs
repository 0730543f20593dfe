//! Fallback image upscaling
//!
//! When no pre-made replacement exists for an image payload, the payload is
//! decoded, resized by the upscale factor and re-encoded. The codec is a
//! trait so the relocation pipeline can be exercised without real images.

use crate::error::ImageCodecError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageFormat, RgbImage};

/// Largest resized image, in RGB bytes, the JPEG codec will allocate
pub const MAX_RESIZED_BYTES: u64 = 1 << 30;

/// Decoded RGB pixels, three bytes per pixel, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixels {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Packed RGB samples
    pub rgb: Vec<u8>,
}

/// Decode/resize/encode capability used for fallback upscaling
pub trait ImageCodec {
    /// Decode an encoded image
    fn decode(&self, bytes: &[u8]) -> Result<Pixels, ImageCodecError>;

    /// Scale both dimensions by `factor`
    fn resize(&self, pixels: &Pixels, factor: u32) -> Result<Pixels, ImageCodecError>;

    /// Encode pixels back to the payload format
    fn encode(&self, pixels: &Pixels) -> Result<Vec<u8>, ImageCodecError>;

    /// Decode, resize and re-encode in one go
    fn upscale(&self, bytes: &[u8], factor: u32) -> Result<Vec<u8>, ImageCodecError> {
        let decoded = self.decode(bytes)?;
        let resized = self.resize(&decoded, factor)?;
        self.encode(&resized)
    }
}

/// JPEG codec backed by the `image` crate
#[derive(Debug, Clone, Copy)]
pub struct JpegCodec {
    quality: u8,
    filter: FilterType,
}

impl JpegCodec {
    /// Codec encoding at the given JPEG quality (1-100)
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            filter: FilterType::Triangle,
        }
    }
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self::with_quality(100)
    }
}

impl ImageCodec for JpegCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Pixels, ImageCodecError> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
            .map_err(|e| ImageCodecError::Decode(e.to_string()))?
            .to_rgb8();

        Ok(Pixels {
            width: image.width(),
            height: image.height(),
            rgb: image.into_raw(),
        })
    }

    fn resize(&self, pixels: &Pixels, factor: u32) -> Result<Pixels, ImageCodecError> {
        let (Some(width), Some(height)) = (
            pixels.width.checked_mul(factor),
            pixels.height.checked_mul(factor),
        ) else {
            return Err(ImageCodecError::Resize(format!(
                "{}x{} scaled by {} overflows",
                pixels.width, pixels.height, factor
            )));
        };

        let resized_bytes = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|n| n.checked_mul(3));
        if resized_bytes.is_none_or(|n| n > MAX_RESIZED_BYTES) {
            return Err(ImageCodecError::Resize(format!(
                "{width}x{height} exceeds the {MAX_RESIZED_BYTES} byte limit"
            )));
        }

        let source = RgbImage::from_raw(pixels.width, pixels.height, pixels.rgb.clone())
            .ok_or_else(|| {
                ImageCodecError::Resize(format!(
                    "{} bytes do not form a {}x{} RGB image",
                    pixels.rgb.len(),
                    pixels.width,
                    pixels.height
                ))
            })?;

        let resized = imageops::resize(&source, width, height, self.filter);
        Ok(Pixels {
            width,
            height,
            rgb: resized.into_raw(),
        })
    }

    fn encode(&self, pixels: &Pixels) -> Result<Vec<u8>, ImageCodecError> {
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, self.quality)
            .encode(&pixels.rgb, pixels.width, pixels.height, ExtendedColorType::Rgb8)
            .map_err(|e| ImageCodecError::Encode(e.to_string()))?;
        Ok(out)
    }
}
