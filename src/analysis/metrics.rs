//! Per-region area counts and the dispersal ratio.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::constants::MASK_INSIDE;
use crate::model::Mask;

/// Column headings of the result table, in order.
pub const RESULT_COLUMNS: [&str; 4] = [
    "ROI Number",
    "Marked Area Pixels",
    "Mitochondrial Green Area Pixels",
    "Mitochondrial Dispersal Ratio",
];

/// Measurements for one region. Produced once per calculation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiResult {
    /// 1-based region number (insertion order in the ROI set).
    #[serde(rename = "ROI Number")]
    pub roi_number: usize,
    /// Pixels inside the region mask.
    #[serde(rename = "Marked Area Pixels")]
    pub marked_area_pixels: u64,
    /// Inside pixels classified as signal; never exceeds the marked area.
    #[serde(rename = "Mitochondrial Green Area Pixels")]
    pub signal_area_pixels: u64,
    /// `signal / marked`, or 0 for an empty region.
    #[serde(rename = "Mitochondrial Dispersal Ratio")]
    pub dispersal_ratio: f64,
}

impl RoiResult {
    /// Build a row from raw counts, applying the zero-area guard.
    pub fn from_counts(roi_number: usize, marked_area_pixels: u64, signal_area_pixels: u64) -> Self {
        let signal_area_pixels = signal_area_pixels.min(marked_area_pixels);
        Self {
            roi_number,
            marked_area_pixels,
            signal_area_pixels,
            dispersal_ratio: dispersal_ratio(marked_area_pixels, signal_area_pixels),
        }
    }

    /// Whether the region enclosed no pixels.
    pub fn is_degenerate(&self) -> bool {
        self.marked_area_pixels == 0
    }
}

/// `signal / marked` with 0 for an empty region.
pub fn dispersal_ratio(marked_area_pixels: u64, signal_area_pixels: u64) -> f64 {
    if marked_area_pixels == 0 {
        0.0
    } else {
        signal_area_pixels as f64 / marked_area_pixels as f64
    }
}

/// Fold a region mask and its classification grid into a result row.
pub fn measure(roi_number: usize, mask: &Mask, classified: &Array2<u8>) -> RoiResult {
    let marked = mask.area();
    let signal = ndarray::Zip::from(mask.as_array())
        .and(classified)
        .fold(0u64, |acc, &inside, &class| {
            acc + u64::from(inside == MASK_INSIDE && class == MASK_INSIDE)
        });

    RoiResult::from_counts(roi_number, marked, signal)
}
