//! Loader for standard image formats (PNG, JPEG, BMP, TIFF, WebP).

use image::RgbImage;

use crate::data::loader::{FrameLoader, LoaderError};

/// Loader for standard image formats.
///
/// Alpha is dropped and grayscale sources are expanded to three equal
/// channels, so every decoded image carries a green channel.
pub struct ImageLoader;

impl FrameLoader for ImageLoader {
    fn id(&self) -> &'static str {
        "image"
    }

    fn display_name(&self) -> &'static str {
        "Standard Image"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"]
    }

    fn can_load(&self, data: &[u8]) -> bool {
        if data.len() < 8 {
            return false;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return true;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return true;
        }

        // BMP: 42 4D (BM)
        if data.starts_with(&[0x42, 0x4D]) {
            return true;
        }

        // TIFF: 49 49 2A 00 (little endian) or 4D 4D 00 2A (big endian)
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return true;
        }

        // WebP: RIFF....WEBP
        data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP"
    }

    fn load(&self, data: &[u8]) -> Result<RgbImage, LoaderError> {
        let img = image::load_from_memory(data)
            .map_err(|e| {
                LoaderError::new(format!("Failed to decode image: {}", e)).with_loader(self.id())
            })?
            .to_rgb8();

        log::trace!("ImageLoader: decoded {}x{} image", img.width(), img.height());

        Ok(img)
    }
}
