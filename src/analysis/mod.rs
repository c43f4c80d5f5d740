//! The measurement pipeline.
//!
//! Per region, in ROI-set order:
//! 1. rasterize the polygon into a mask the size of the frames
//! 2. AND the mitochondrial green channel with the mask
//! 3. build the threshold histogram and compute the Otsu threshold
//! 4. classify pixels as signal and fold them into a result row
//!
//! Regions never share state; each works from read-only views of the
//! two frames.

mod channel;
mod histogram;
mod metrics;
mod otsu;

pub use channel::{apply_mask, extract_signal};
pub use histogram::{IntensityHistogram, PanelGrid, PanelSlot, intensity_histogram};
pub use metrics::{RESULT_COLUMNS, RoiResult, dispersal_ratio, measure};
pub use otsu::{ThresholdOptions, ThresholdPlacement, ThresholdScope, classify, otsu_threshold};

use ndarray::Array2;
use web_time::Instant;

use crate::data::Frame;
use crate::error::{AnalysisError, Result};
use crate::model::{Mask, RoiSet};
use crate::report::Report;

/// Measure one region against the frame's signal grid.
pub fn analyze_region(
    roi_number: usize,
    signal: &Array2<u8>,
    mask: &Mask,
    options: &ThresholdOptions,
) -> (RoiResult, IntensityHistogram) {
    let isolated = apply_mask(signal, mask);

    let bins = match options.scope {
        ThresholdScope::ZeroedFrame => intensity_histogram(&isolated, None),
        ThresholdScope::RoiOnly => intensity_histogram(&isolated, Some(mask)),
    };
    let threshold = otsu_threshold(&bins, options.placement);

    let classified = classify(&isolated, mask, threshold);
    let row = measure(roi_number, mask, &classified);

    log::debug!(
        "ROI {}: marked={} signal={} ratio={:.4} threshold={}",
        row.roi_number,
        row.marked_area_pixels,
        row.signal_area_pixels,
        row.dispersal_ratio,
        threshold
    );

    (row, IntensityHistogram::new(roi_number, bins, threshold))
}

/// Run a full calculation pass over every committed region.
///
/// Fails without producing anything if either frame is absent, the ROI
/// set is empty, or the frames differ in size. An open, uncommitted
/// trace is not measured.
pub fn calculate(
    cell: Option<&Frame>,
    mito: Option<&Frame>,
    rois: &RoiSet,
    options: &ThresholdOptions,
) -> Result<Report> {
    let (Some(cell), Some(mito)) = (cell, mito) else {
        log::warn!("Calculation rejected: missing image(s)");
        return Err(AnalysisError::MissingImages);
    };

    if rois.is_empty() {
        log::warn!("Calculation rejected: no regions defined");
        return Err(AnalysisError::NoRegions);
    }

    if cell.dimensions() != mito.dimensions() {
        return Err(AnalysisError::DimensionMismatch {
            cell_width: cell.width(),
            cell_height: cell.height(),
            mito_width: mito.width(),
            mito_height: mito.height(),
        });
    }

    if rois.drawing().is_drawing() {
        log::warn!("An open trace is not finalized and will not be measured");
    }

    let start = Instant::now();
    let (width, height) = cell.dimensions();
    let signal = extract_signal(mito);

    let (rows, histograms): (Vec<_>, Vec<_>) = rois
        .masks(width, height)
        .iter()
        .enumerate()
        .map(|(i, mask)| analyze_region(i + 1, &signal, mask, options))
        .unzip();

    log::info!(
        "Measured {} region(s) on {}x{} frames in {:.1?}",
        rows.len(),
        width,
        height,
        start.elapsed()
    );

    Ok(Report::new(width, height, *options, rows, histograms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, Polygon};

    fn square_rois(squares: &[(i32, i32, i32)]) -> RoiSet {
        let mut set = RoiSet::new();
        for &(x, y, side) in squares {
            let far = side - 1;
            set.begin(Point::new(x, y));
            set.extend(Point::new(x + far, y));
            set.extend(Point::new(x + far, y + far));
            set.extend(Point::new(x, y + far));
            set.finalize();
        }
        set
    }

    #[test]
    fn test_missing_images() {
        let frame = Frame::filled(50, 50, [0, 0, 0]);
        let rois = square_rois(&[(5, 5, 10)]);
        let options = ThresholdOptions::default();

        assert!(matches!(
            calculate(Some(&frame), None, &rois, &options),
            Err(AnalysisError::MissingImages)
        ));
        assert!(matches!(
            calculate(None, None, &rois, &options),
            Err(AnalysisError::MissingImages)
        ));
    }

    #[test]
    fn test_no_regions() {
        let frame = Frame::filled(50, 50, [0, 0, 0]);
        let result = calculate(Some(&frame), Some(&frame), &RoiSet::new(), &ThresholdOptions::default());
        assert!(matches!(result, Err(AnalysisError::NoRegions)));
    }

    #[test]
    fn test_dimension_mismatch() {
        let cell = Frame::filled(60, 40, [0, 0, 0]);
        let mito = Frame::filled(40, 60, [0, 0, 0]);
        let rois = square_rois(&[(1, 1, 5)]);
        let result = calculate(Some(&cell), Some(&mito), &rois, &ThresholdOptions::default());
        assert!(matches!(result, Err(AnalysisError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_uniform_bright_region_in_dark_frame() {
        let cell = Frame::filled(100, 100, [0, 0, 0]);
        let mito = Frame::filled(100, 100, [0, 220, 0]);
        let rois = square_rois(&[(10, 10, 20)]);

        let report = calculate(Some(&cell), Some(&mito), &rois, &ThresholdOptions::default()).unwrap();
        let row = &report.rows[0];
        // Zeroed background gives class A; the whole region exceeds the threshold.
        assert_eq!(row.marked_area_pixels, 400);
        assert_eq!(row.signal_area_pixels, 400);
        assert_eq!(report.histograms[0].count(0), 100 * 100 - 400);
        assert_eq!(report.histograms[0].count(220), 400);
    }

    #[test]
    fn test_roi_only_scope_on_uniform_region() {
        let cell = Frame::filled(100, 100, [0, 0, 0]);
        let mito = Frame::filled(100, 100, [0, 220, 0]);
        let rois = square_rois(&[(10, 10, 20)]);
        let options = ThresholdOptions {
            scope: ThresholdScope::RoiOnly,
            ..ThresholdOptions::default()
        };

        let report = calculate(Some(&cell), Some(&mito), &rois, &options).unwrap();
        assert_eq!(report.histograms[0].total(), 400);
        // A single-level histogram has no split, so the threshold is 0.
        assert_eq!(report.histograms[0].threshold, 0);
        assert_eq!(report.rows[0].signal_area_pixels, 400);
    }

    #[test]
    fn test_regions_do_not_leak() {
        let cell = Frame::filled(80, 80, [0, 0, 0]);
        let mut mito = Frame::filled(80, 80, [0, 0, 0]);
        for y in 0..10 {
            for x in 0..10 {
                mito.pixels_mut().put_pixel(x, y, image::Rgb([0, 255, 0]));
            }
        }
        let rois = square_rois(&[(0, 0, 10), (40, 40, 10)]);

        let report = calculate(Some(&cell), Some(&mito), &rois, &ThresholdOptions::default()).unwrap();
        assert_eq!(report.rows[0].signal_area_pixels, 100);
        assert_eq!(report.rows[1].signal_area_pixels, 0);
        assert_eq!(report.histograms[1].count(255), 0);
    }

    #[test]
    fn test_degenerate_region_row() {
        let frame = Frame::filled(30, 30, [0, 90, 0]);
        let mut rois = RoiSet::new();
        rois.begin(Point::new(3, 3));
        rois.extend(Point::new(8, 8));
        rois.finalize();

        let report = calculate(Some(&frame), Some(&frame), &rois, &ThresholdOptions::default()).unwrap();
        let row = &report.rows[0];
        assert_eq!(row.marked_area_pixels, 0);
        assert_eq!(row.signal_area_pixels, 0);
        assert_eq!(row.dispersal_ratio, 0.0);
        assert_eq!(report.histograms[0].threshold, 0);
    }

    #[test]
    fn test_analyze_region_directly() {
        let signal = Array2::<u8>::from_elem((20, 20), 150);
        let mask = crate::model::rasterize(
            &Polygon::from_points([(0, 0), (9, 0), (9, 9), (0, 9)]),
            20,
            20,
        );

        let (row, hist) = analyze_region(7, &signal, &mask, &ThresholdOptions::default());
        assert_eq!(row.roi_number, 7);
        assert_eq!(hist.roi_number, 7);
        assert_eq!(row.marked_area_pixels, 100);
        assert_eq!(row.signal_area_pixels, 100);
    }
}
