//! Trait-based frame loading system.
//!
//! New source formats can be added by implementing the `FrameLoader`
//! trait and registering the loader with a `LoaderRegistry`.
//!
//! ## Supported Formats
//!
//! - **Standard Images**: PNG, JPEG, BMP, TIFF, WebP
//! - **NumPy Arrays**: `.npy` files holding `H × W` or `H × W × C` arrays
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mitodisp::data::LoaderRegistry;
//!
//! let registry = LoaderRegistry::new();
//! let image = registry.load(&bytes, Some("cell.tif"))?;
//! ```

use image::RgbImage;
use thiserror::Error;

/// Error type for loader operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}{}", loader_prefix(.loader_id), .message)]
pub struct LoaderError {
    /// Human-readable error message.
    pub message: String,
    /// The loader that produced this error (if known).
    pub loader_id: Option<&'static str>,
}

fn loader_prefix(loader_id: &Option<&'static str>) -> String {
    loader_id.map(|id| format!("[{}] ", id)).unwrap_or_default()
}

impl LoaderError {
    /// Create a new loader error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            loader_id: None,
        }
    }

    /// Attach the id of the loader that failed.
    pub fn with_loader(mut self, loader_id: &'static str) -> Self {
        self.loader_id = Some(loader_id);
        self
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", e))
    }
}

/// Trait for source image format loaders.
///
/// Each loader decodes raw file bytes into a full-resolution RGB image.
/// Resizing into the working frame happens afterwards in `ingest`.
pub trait FrameLoader: Send + Sync {
    /// Unique identifier for this loader (e.g., "image", "npy").
    fn id(&self) -> &'static str;

    /// Human-readable name for display.
    fn display_name(&self) -> &'static str;

    /// File extensions this loader handles (lowercase, without dots).
    fn extensions(&self) -> &'static [&'static str];

    /// Check magic bytes to see whether this loader can likely decode `data`.
    fn can_load(&self, data: &[u8]) -> bool;

    /// Decode raw bytes into an RGB image.
    fn load(&self, data: &[u8]) -> Result<RgbImage, LoaderError>;

    /// Priority for format detection (higher = checked first).
    fn priority(&self) -> i32 {
        0
    }
}

/// Registry of available frame loaders.
pub struct LoaderRegistry {
    loaders: Vec<Box<dyn FrameLoader>>,
}

impl LoaderRegistry {
    /// Create a new registry with all built-in loaders.
    pub fn new() -> Self {
        let mut registry = Self {
            loaders: Vec::new(),
        };

        registry.register(Box::new(super::loaders::ImageLoader));
        registry.register(Box::new(super::loaders::NpyLoader));

        registry
    }

    /// Register a new loader.
    pub fn register(&mut self, loader: Box<dyn FrameLoader>) {
        self.loaders.push(loader);
        self.loaders.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Get all supported file extensions (for file filtering).
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        let mut extensions: Vec<&'static str> = self
            .loaders
            .iter()
            .flat_map(|l| l.extensions().iter().copied())
            .collect();
        extensions.sort();
        extensions.dedup();
        extensions
    }

    fn loaders_for_extension(&self, ext: &str) -> impl Iterator<Item = &dyn FrameLoader> {
        let ext_lower = ext.to_lowercase();
        self.loaders
            .iter()
            .filter(move |l| l.extensions().iter().any(|e| *e == ext_lower))
            .map(|l| l.as_ref())
    }

    /// Load an image, auto-detecting the format.
    ///
    /// Tries loaders in this order:
    /// 1. By file extension (if filename provided)
    /// 2. By magic byte detection
    /// 3. All loaders as fallback
    pub fn load(&self, data: &[u8], filename: Option<&str>) -> Result<RgbImage, LoaderError> {
        let extension = filename
            .and_then(|f| f.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase());

        if let Some(ext) = extension.as_deref() {
            for loader in self.loaders_for_extension(ext) {
                match loader.load(data) {
                    Ok(image) => {
                        log::debug!("Loaded with {} loader (by extension)", loader.id());
                        return Ok(image);
                    }
                    Err(e) => log::trace!("Loader {} failed: {}", loader.id(), e),
                }
            }
        }

        if let Some(loader) = self.loaders.iter().find(|l| l.can_load(data)) {
            match loader.load(data) {
                Ok(image) => {
                    log::debug!("Loaded with {} loader (by detection)", loader.id());
                    return Ok(image);
                }
                Err(e) => log::trace!("Detected loader {} failed: {}", loader.id(), e),
            }
        }

        for loader in &self.loaders {
            if let Ok(image) = loader.load(data) {
                log::debug!("Loaded with {} loader (fallback)", loader.id());
                return Ok(image);
            }
        }

        Err(LoaderError::new(format!(
            "No loader could handle the data{}",
            filename
                .map(|f| format!(" (file: {})", f))
                .unwrap_or_default()
        )))
    }

    /// Check if a filename has a supported extension.
    pub fn is_supported_file(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        self.supported_extensions()
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext)))
    }

    /// Get all registered loaders.
    pub fn loaders(&self) -> &[Box<dyn FrameLoader>] {
        &self.loaders
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
