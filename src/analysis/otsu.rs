//! Otsu thresholding over a 256-level histogram.
//!
//! For each candidate `t`, class A holds levels `<= t` and class B levels
//! `> t`. The chosen threshold maximizes `w_a * w_b * (mean_a - mean_b)^2`.

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::constants::{HISTOGRAM_BINS, MASK_INSIDE, MASK_OUTSIDE};
use crate::model::Mask;

/// Which pixels feed the threshold histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdScope {
    /// Every frame pixel, with out-of-region pixels forced to 0.
    ///
    /// Background zeros land in class A, pulling the threshold down for
    /// small regions. This reproduces historical results.
    #[default]
    ZeroedFrame,
    /// Only pixels inside the region mask.
    RoiOnly,
}

/// Where the threshold sits when several levels give the same split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPlacement {
    /// First maximizing level (the historical marker position).
    Lowest,
    /// Middle of the run of empty bins following the first maximizing
    /// level. Classification is identical to `Lowest`.
    #[default]
    PlateauMidpoint,
}

/// Threshold behaviour for a calculation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThresholdOptions {
    pub scope: ThresholdScope,
    pub placement: ThresholdPlacement,
}

/// Compute the Otsu threshold of a histogram.
///
/// Empty or single-level histograms have no valid split and return 0.
pub fn otsu_threshold(histogram: &[u64; HISTOGRAM_BINS], placement: ThresholdPlacement) -> u8 {
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0;
    }

    let total_sum: u64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as u64 * count)
        .sum();
    let n = total as f64;

    let mut weight_a = 0u64;
    let mut sum_a = 0u64;
    let mut best: Option<(usize, f64)> = None;

    for (level, &count) in histogram.iter().enumerate() {
        weight_a += count;
        sum_a += level as u64 * count;

        let weight_b = total - weight_a;
        if weight_a == 0 {
            continue;
        }
        if weight_b == 0 {
            break;
        }

        let mean_a = sum_a as f64 / weight_a as f64;
        let mean_b = (total_sum - sum_a) as f64 / weight_b as f64;
        let q_a = weight_a as f64 / n;
        let q_b = weight_b as f64 / n;
        let variance = q_a * q_b * (mean_a - mean_b).powi(2);

        if best.is_none_or(|(_, best_variance)| variance > best_variance) {
            best = Some((level, variance));
        }
    }

    let Some((lowest, _)) = best else {
        return 0;
    };

    let chosen = match placement {
        ThresholdPlacement::Lowest => lowest,
        ThresholdPlacement::PlateauMidpoint => {
            // Levels lowest..=highest split the pixels identically.
            let mut highest = lowest;
            while highest + 1 < HISTOGRAM_BINS - 1 && histogram[highest + 1] == 0 {
                highest += 1;
            }
            (lowest + highest) / 2
        }
    };

    chosen as u8
}

/// Binary classification: 255 where `value > threshold` and inside the mask.
pub fn classify(intensity: &Array2<u8>, mask: &Mask, threshold: u8) -> Array2<u8> {
    Zip::from(intensity)
        .and(mask.as_array())
        .map_collect(|&value, &inside| {
            if value > threshold && inside == MASK_INSIDE {
                MASK_INSIDE
            } else {
                MASK_OUTSIDE
            }
        })
}
