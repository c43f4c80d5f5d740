//! Per-region intensity histograms and their panel layout.
//!
//! Rendering (log-scaled axes, threshold marker, figure lifecycle) belongs
//! to the front-end; this module only returns plain data for it.

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::constants::{HISTOGRAM_BINS, HISTOGRAM_COLUMNS, MASK_INSIDE};
use crate::model::Mask;

/// Count intensities of a grid into 256 bins.
///
/// With a mask only inside pixels are counted; without one every pixel
/// is, including the zeros a masked grid carries outside its region.
pub fn intensity_histogram(grid: &Array2<u8>, mask: Option<&Mask>) -> [u64; HISTOGRAM_BINS] {
    let mut bins = [0u64; HISTOGRAM_BINS];
    match mask {
        None => {
            for &value in grid {
                bins[usize::from(value)] += 1;
            }
        }
        Some(mask) => {
            Zip::from(grid).and(mask.as_array()).for_each(|&value, &inside| {
                if inside == MASK_INSIDE {
                    bins[usize::from(value)] += 1;
                }
            });
        }
    }
    bins
}

/// Intensity distribution used to threshold one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityHistogram {
    /// 1-based region number.
    pub roi_number: usize,
    /// 256 bin counts, index = intensity.
    pub counts: Vec<u64>,
    /// Otsu threshold computed from these counts.
    pub threshold: u8,
}

impl IntensityHistogram {
    pub fn new(roi_number: usize, counts: [u64; HISTOGRAM_BINS], threshold: u8) -> Self {
        Self {
            roi_number,
            counts: counts.to_vec(),
            threshold,
        }
    }

    /// Total number of counted pixels.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Count for a single intensity level.
    pub fn count(&self, level: u8) -> u64 {
        self.counts.get(usize::from(level)).copied().unwrap_or(0)
    }

    /// Pixels strictly above the threshold.
    pub fn above_threshold(&self) -> u64 {
        self.counts
            .iter()
            .skip(usize::from(self.threshold) + 1)
            .sum()
    }
}

/// Position of one region's panel in the histogram figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSlot {
    pub roi_number: usize,
    pub row: usize,
    pub column: usize,
}

/// Fixed-width grid of histogram panels, filled row by row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelGrid {
    pub rows: usize,
    pub columns: usize,
    pub panels: Vec<PanelSlot>,
    /// Trailing slots in the last row left blank.
    pub blank_slots: usize,
}

impl PanelGrid {
    /// Lay out `count` panels in the standard two-column grid.
    pub fn for_regions(count: usize) -> Self {
        Self::with_columns(count, HISTOGRAM_COLUMNS)
    }

    /// Lay out `count` panels in a grid `columns` wide.
    pub fn with_columns(count: usize, columns: usize) -> Self {
        let columns = columns.max(1);
        let rows = count.div_ceil(columns);
        let panels = (0..count)
            .map(|i| PanelSlot {
                roi_number: i + 1,
                row: i / columns,
                column: i % columns,
            })
            .collect();

        Self {
            rows,
            columns,
            panels,
            blank_slots: rows * columns - count,
        }
    }
}
