//! Image decoding for image objects.

use printdesk_core::model::{ImageFormat, ImageSource};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Image loading errors.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("Unsupported image source: {0}")]
    Unsupported(String),
}

/// Decoded RGBA8 pixels ready to hand to a surface.
#[derive(Clone)]
pub struct DecodedImage {
    pub data: peniko::ImageData,
}

impl DecodedImage {
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            data: peniko::ImageData {
                data: peniko::Blob::new(Arc::new(pixels)),
                format: peniko::ImageFormat::Rgba8,
                width,
                height,
                alpha_type: peniko::ImageAlphaType::Alpha,
            },
        }
    }

    pub fn width(&self) -> u32 {
        self.data.width
    }

    pub fn height(&self) -> u32 {
        self.data.height
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

fn image_crate_format(format: ImageFormat) -> ::image::ImageFormat {
    match format {
        ImageFormat::Png => ::image::ImageFormat::Png,
        ImageFormat::Jpeg => ::image::ImageFormat::Jpeg,
        ImageFormat::WebP => ::image::ImageFormat::WebP,
    }
}

fn from_dynamic(decoded: ::image::DynamicImage) -> DecodedImage {
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::from_rgba8(width, height, rgba.into_vec())
}

/// Decode encoded image bytes.
pub fn decode_bytes(
    bytes: &[u8],
    format: Option<ImageFormat>,
) -> Result<DecodedImage, ImageLoadError> {
    let decoded = match format {
        Some(format) => ::image::load_from_memory_with_format(bytes, image_crate_format(format)),
        None => ::image::load_from_memory(bytes),
    }
    .map_err(|e| ImageLoadError::Decode(e.to_string()))?;
    Ok(from_dynamic(decoded))
}

/// Load and decode the pixels behind an image source.
///
/// Embedded data and local paths are handled here. Remote URLs are left to
/// the host, which fetches the bytes and calls [`decode_bytes`].
pub fn decode_image(source: &ImageSource) -> Result<DecodedImage, ImageLoadError> {
    use base64::{Engine, engine::general_purpose::STANDARD};

    match source {
        ImageSource::Embedded { format, data_base64 } => {
            let bytes = STANDARD.decode(data_base64)?;
            decode_bytes(&bytes, Some(*format))
        }
        ImageSource::Url { href } => {
            if href.contains("://") && !href.starts_with("file://") {
                return Err(ImageLoadError::Unsupported(href.clone()));
            }
            let path = Path::new(href.strip_prefix("file://").unwrap_or(href));
            let bytes = std::fs::read(path).map_err(|e| ImageLoadError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let format = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(ImageFormat::from_extension)
                .or_else(|| ImageFormat::from_magic_bytes(&bytes));
            decode_bytes(&bytes, format)
        }
    }
}
