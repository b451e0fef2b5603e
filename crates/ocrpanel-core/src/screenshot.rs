use std::io::Cursor;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, ImageReader};
use ocrpanel_types::Size;

/// Screenshot as received from the server, with its natural resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Screenshot {
    /// Base64 PNG exactly as sent by the server
    pub base64: String,
    pub natural: Size,
}

impl Screenshot {
    /// Decode the PNG header to learn the natural width and height
    pub fn from_base64(base64: String) -> anyhow::Result<Self> {
        let trimmed = base64
            .strip_prefix("data:image/png;base64,")
            .unwrap_or(&base64);
        let bytes = STANDARD
            .decode(trimmed.trim())
            .context("Screenshot is not valid base64")?;

        let (width, height) = ImageReader::with_format(Cursor::new(bytes), ImageFormat::Png)
            .into_dimensions()
            .context("Screenshot is not a readable PNG")?;

        Ok(Self {
            base64,
            natural: Size::new(f64::from(width), f64::from(height)),
        })
    }
}
