//! Image handling for plant photos and the footer logo.
//!
//! Photos are stored inline as `data:image/jpeg;base64,...` strings. On the way
//! in they are scaled down to fit a bounding box (never up) and re-encoded as
//! JPEG. On the way out the PDF renderer asks an [`ImageLoader`] for decoded RGB
//! pixels.

use crate::error::{PlantenError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType};
use std::fs;
use tracing::debug;

pub const MAX_IMAGE_WIDTH: u32 = 200;
pub const MAX_IMAGE_HEIGHT: u32 = 200;
pub const JPEG_QUALITY: u8 = 85;

const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Decoded pixels ready to be embedded in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Packed 8-bit RGB, row major.
    pub rgb: Vec<u8>,
}

impl RasterImage {
    fn from_dynamic(image: DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        Self {
            width: rgb.width(),
            height: rgb.height(),
            rgb: rgb.into_raw(),
        }
    }
}

/// Scales the dimensions down to fit `max_w` x `max_h`, preserving aspect ratio.
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_w && height <= max_h) {
        return (width, height);
    }
    let ratio = (max_w as f64 / width as f64).min(max_h as f64 / height as f64);
    let w = ((width as f64 * ratio).round() as u32).max(1);
    let h = ((height as f64 * ratio).round() as u32).max(1);
    (w, h)
}

/// Decodes an uploaded image, shrinks it to the bounding box and returns it as
/// a JPEG data URI.
pub fn resize_to_data_uri(bytes: &[u8], max_w: u32, max_h: u32) -> Result<String> {
    let decoded = image::load_from_memory(bytes)?;
    let (w, h) = fit_within(decoded.width(), decoded.height(), max_w, max_h);
    let scaled = if (w, h) == (decoded.width(), decoded.height()) {
        decoded
    } else {
        decoded.resize_exact(w, h, FilterType::Triangle)
    };

    let rgb = scaled.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;

    debug!(width = w, height = h, bytes = jpeg.len(), "image resized");
    Ok(format!("{}{}", JPEG_DATA_URI_PREFIX, STANDARD.encode(&jpeg)))
}

/// Extracts the payload of a base64 data URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| PlantenError::validation("Not a data URI"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PlantenError::validation("Malformed data URI"))?;
    if !meta.ends_with(";base64") {
        return Err(PlantenError::validation("Only base64 data URIs are supported"));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| PlantenError::validation(format!("Invalid base64 image data: {}", e)))
}

/// Resolves an image reference to decoded pixels.
pub trait ImageLoader {
    fn load(&self, source: &str) -> Result<RasterImage>;
}

/// Loads data URIs and local file paths. Remote URLs are rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataUriLoader;

impl ImageLoader for DataUriLoader {
    fn load(&self, source: &str) -> Result<RasterImage> {
        let source = source.trim();
        let bytes = if source.starts_with("data:") {
            decode_data_uri(source)?
        } else if source.starts_with("http://") || source.starts_with("https://") {
            return Err(PlantenError::validation(format!(
                "Remote images are not supported: {}",
                source
            )));
        } else {
            fs::read(source)?
        };
        Ok(RasterImage::from_dynamic(image::load_from_memory(&bytes)?))
    }
}
