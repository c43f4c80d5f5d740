//! Image ingestion: read a source image and fit it into the working frame.
//!
//! The resized frame defines the coordinate space for all polygons, so
//! regions must be traced on the ingested frame, never on the source file.

use std::path::Path;

use image::RgbImage;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::data::{Frame, LoaderError, LoaderRegistry};

/// Resampling filter used when fitting a source image into the working box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Nearest neighbour
    Nearest,
    /// Linear (area-like for moderate downscaling)
    #[default]
    Triangle,
    /// Cubic
    CatmullRom,
    /// Lanczos with window 3
    Lanczos3,
}

impl ResizeFilter {
    /// Map to the `image` crate filter.
    pub fn to_filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Compute the output size of an aspect-preserving fit.
///
/// The scale factor is `min(max_w / w, max_h / h)` and each side is
/// truncated, never padded or cropped. Upscaling is allowed. Sides never
/// collapse below one pixel.
pub fn fitted_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let scale = (f64::from(max_width) / f64::from(width))
        .min(f64::from(max_height) / f64::from(height));

    let fitted_w = ((f64::from(width) * scale) as u32).clamp(1, max_width.max(1));
    let fitted_h = ((f64::from(height) * scale) as u32).clamp(1, max_height.max(1));

    (fitted_w, fitted_h)
}

/// Resize an image so it fits entirely within `max_width × max_height`.
pub fn fit_within(image: &RgbImage, max_width: u32, max_height: u32, filter: ResizeFilter) -> RgbImage {
    let (width, height) = image.dimensions();
    let (fitted_w, fitted_h) = fitted_dimensions(width, height, max_width, max_height);

    if (fitted_w, fitted_h) == (width, height) {
        return image.clone();
    }

    log::debug!(
        "Resizing {}x{} -> {}x{} ({:?})",
        width,
        height,
        fitted_w,
        fitted_h,
        filter
    );

    imageops::resize(image, fitted_w, fitted_h, filter.to_filter_type())
}

/// Decode raw bytes and fit them into the working box.
pub fn ingest_bytes(
    registry: &LoaderRegistry,
    data: &[u8],
    filename: Option<&str>,
    max_width: u32,
    max_height: u32,
    filter: ResizeFilter,
) -> Result<Frame, LoaderError> {
    let decoded = registry.load(data, filename)?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(LoaderError::new("Decoded image is empty"));
    }
    Ok(Frame::new(fit_within(&decoded, max_width, max_height, filter)))
}

/// Read a file from disk and fit it into the working box.
pub fn ingest_file(
    registry: &LoaderRegistry,
    path: &Path,
    max_width: u32,
    max_height: u32,
    filter: ResizeFilter,
) -> Result<Frame, LoaderError> {
    let data = std::fs::read(path)
        .map_err(|e| LoaderError::new(format!("Failed to read {}: {}", path.display(), e)))?;
    let filename = path.file_name().and_then(|name| name.to_str());

    let frame = ingest_bytes(registry, &data, filename, max_width, max_height, filter)?;
    log::info!(
        "Ingested {} as {}x{} frame",
        path.display(),
        frame.width(),
        frame.height()
    );
    Ok(frame)
}
