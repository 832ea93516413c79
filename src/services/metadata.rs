use crate::utils::validation::validate_image_mime_type;
use anyhow::{Result, anyhow};
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

pub struct MetadataService;

impl MetadataService {
    /// Sniffs the real format from the bytes and reads pixel dimensions
    /// from the header without decoding the whole image.
    pub fn inspect_image(bytes: &[u8], declared_type: Option<&str>) -> Result<ImageInfo> {
        let mime_type = match infer::get(bytes) {
            Some(kind) => kind.mime_type().to_string(),
            None => declared_type
                .unwrap_or("application/octet-stream")
                .to_string(),
        };

        validate_image_mime_type(&mime_type)?;

        let (width, height) = image::io::Reader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| anyhow!("Failed to read image dimensions: {}", e))?;

        if width == 0 || height == 0 {
            return Err(anyhow!("Image has no pixels"));
        }

        Ok(ImageInfo {
            mime_type,
            width,
            height,
        })
    }
}
