//! Global constants for the dispersal analyzer

/// Default working frame width (ingestion bounding box)
pub const DEFAULT_FRAME_WIDTH: u32 = 600;

/// Default working frame height (ingestion bounding box)
pub const DEFAULT_FRAME_HEIGHT: u32 = 600;

/// Mask value for pixels inside a region
pub const MASK_INSIDE: u8 = 255;

/// Mask value for pixels outside a region
pub const MASK_OUTSIDE: u8 = 0;

/// Channel carrying the fluorescence signal (green, index 1 in both RGB and BGR order)
pub const SIGNAL_CHANNEL: usize = 1;

/// Number of intensity levels in an 8-bit histogram
pub const HISTOGRAM_BINS: usize = 256;

/// Number of columns in the per-ROI histogram panel grid
pub const HISTOGRAM_COLUMNS: usize = 2;

/// Default file name for the JSON report written by the binary
pub const DEFAULT_REPORT_FILENAME: &str = "mitodisp-report.json";
