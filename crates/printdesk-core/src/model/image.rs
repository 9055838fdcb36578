//! Image object content.

use serde::{Deserialize, Serialize};

/// Image format for embedded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// Opaque reference to the pixels an image object shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageSource {
    /// URL or filesystem path resolved by the loader.
    Url { href: String },
    /// Encoded image bytes carried inline as base64.
    Embedded {
        format: ImageFormat,
        data_base64: String,
    },
}

impl ImageSource {
    pub fn url(href: impl Into<String>) -> Self {
        ImageSource::Url { href: href.into() }
    }

    /// Embed raw encoded bytes. Returns `None` when the format is not recognized.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        use base64::{Engine, engine::general_purpose::STANDARD};

        let format = ImageFormat::from_magic_bytes(data)?;
        Some(ImageSource::Embedded {
            format,
            data_base64: STANDARD.encode(data),
        })
    }

    /// Short description for log lines; never includes inline data.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Url { href } => href.clone(),
            ImageSource::Embedded { format, data_base64 } => {
                format!("embedded {} ({} bytes)", format.mime_type(), data_base64.len() * 3 / 4)
            }
        }
    }
}

/// Content carried by an image object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub src: ImageSource,
}

impl ImageContent {
    pub fn new(src: ImageSource) -> Self {
        Self { src }
    }
}
