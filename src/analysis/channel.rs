//! Channel extraction and per-region masking.

use ndarray::{Array2, Zip};

use crate::constants::SIGNAL_CHANNEL;
use crate::data::Frame;
use crate::model::Mask;

/// Copy the fluorescence (green) channel out of a frame.
pub fn extract_signal(frame: &Frame) -> Array2<u8> {
    frame.channel(SIGNAL_CHANNEL)
}

/// Elementwise AND of an intensity grid with a 0/255 mask.
///
/// The result equals the input inside the region and is 0 everywhere
/// else. It is the only input thresholding sees for that region.
///
/// # Panics
/// Panics if the grid and mask shapes differ; callers check frame
/// dimensions before building masks.
pub fn apply_mask(intensity: &Array2<u8>, mask: &Mask) -> Array2<u8> {
    Zip::from(intensity)
        .and(mask.as_array())
        .map_collect(|&value, &inside| value & inside)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Polygon, rasterize};

    #[test]
    fn test_extract_signal_reads_green() {
        let frame = Frame::filled(3, 2, [10, 77, 200]);
        let green = extract_signal(&frame);
        assert!(green.iter().all(|&v| v == 77));
        assert_eq!(green.dim(), (2, 3));
    }

    #[test]
    fn test_apply_mask_zeroes_outside() {
        let frame = Frame::filled(20, 20, [0, 180, 0]);
        let poly = Polygon::from_points([(5, 5), (9, 5), (9, 9), (5, 9)]);
        let mask = rasterize(&poly, 20, 20);

        let masked = apply_mask(&extract_signal(&frame), &mask);
        assert_eq!(masked[[7, 7]], 180);
        assert_eq!(masked[[5, 9]], 180);
        assert_eq!(masked[[0, 0]], 0);
        assert_eq!(masked[[10, 7]], 0);
        assert_eq!(masked.iter().filter(|&&v| v == 180).count(), 25);
    }
}
