//! Error types for dispersal calculations.

use thiserror::Error;

use crate::data::LoaderError;

/// Errors that abort a calculation pass or an upload.
///
/// None of these is fatal to the caller: the previous frames, regions and
/// report stay as they were and the caller may retry.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Cell or mitochondrial frame has not been loaded
    #[error("missing image(s): both cell and mitochondrial images are required")]
    MissingImages,

    /// The ROI set is empty
    #[error("no regions defined: mark at least one cell region")]
    NoRegions,

    /// A region was started before a cell frame was loaded
    #[error("no cell image: upload a cell image before marking regions")]
    NoCellImage,

    /// The two frames do not share the same dimensions
    #[error("frame size mismatch: cell is {cell_width}x{cell_height}, mito is {mito_width}x{mito_height}")]
    DimensionMismatch {
        /// Cell frame width
        cell_width: u32,
        /// Cell frame height
        cell_height: u32,
        /// Mitochondrial frame width
        mito_width: u32,
        /// Mitochondrial frame height
        mito_height: u32,
    },

    /// A source image could not be read or decoded
    #[error("failed to load image: {0}")]
    Load(#[from] LoaderError),
}

/// Convenience alias for results of analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
