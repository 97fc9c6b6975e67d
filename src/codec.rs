use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};

use crate::config::UploadConfig;
use crate::error::{ImagingError, Result};

/// Color and grayscale views of one decoded upload
pub struct DecodedImage {
    pub color: RgbImage,
    pub gray: GrayImage,
}

impl DecodedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.color.dimensions()
    }
}

/// Decode raw bytes into an RGB raster
pub fn decode(bytes: &[u8]) -> Result<RgbImage> {
    Ok(load(bytes)?.to_rgb8())
}

/// Decode raw bytes into both the color raster and its luma view
pub fn decode_with_gray(bytes: &[u8]) -> Result<DecodedImage> {
    let img = load(bytes)?;
    Ok(DecodedImage {
        gray: img.to_luma8(),
        color: img.to_rgb8(),
    })
}

fn load(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| ImagingError::Decode(e.to_string()))
}

/// Serialize a processed raster as PNG
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ImagingError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Reject uploads that are too large or not in the allowed format list.
///
/// The format is sniffed from magic bytes before any decoding happens.
pub fn check_upload(bytes: &[u8], upload: &UploadConfig) -> Result<ImageFormat> {
    check_size(bytes, upload)?;

    let format = image::guess_format(bytes).map_err(|e| ImagingError::Decode(e.to_string()))?;
    if !upload.allowed_formats.iter().any(|f| f.matches(format)) {
        return Err(ImagingError::UnsupportedFormat(format!("{:?}", format)));
    }
    Ok(format)
}

pub fn check_size(bytes: &[u8], upload: &UploadConfig) -> Result<()> {
    if bytes.len() > upload.max_bytes {
        return Err(ImagingError::PayloadTooLarge {
            size: bytes.len(),
            limit: upload.max_bytes,
        });
    }
    Ok(())
}
