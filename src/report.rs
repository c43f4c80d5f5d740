//! Output of a calculation pass: the result table and the histograms.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{IntensityHistogram, PanelGrid, RESULT_COLUMNS, RoiResult, ThresholdOptions};

/// Current report file format version.
pub const REPORT_VERSION: u32 = 1;

/// Complete, immutable result of one calculation pass.
///
/// A new pass produces a fresh report; rows are never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Version of the report format
    pub version: u32,
    /// Width of the frames the pass measured
    pub frame_width: u32,
    /// Height of the frames the pass measured
    pub frame_height: u32,
    /// Threshold behaviour used for the pass
    pub threshold: ThresholdOptions,
    /// One row per region, in region-number order
    pub rows: Vec<RoiResult>,
    /// One histogram per region, same order as `rows`
    pub histograms: Vec<IntensityHistogram>,
}

impl Report {
    pub fn new(
        frame_width: u32,
        frame_height: u32,
        threshold: ThresholdOptions,
        rows: Vec<RoiResult>,
        histograms: Vec<IntensityHistogram>,
    ) -> Self {
        Self {
            version: REPORT_VERSION,
            frame_width,
            frame_height,
            threshold,
            rows,
            histograms,
        }
    }

    /// Row for a 1-based region number.
    pub fn row(&self, roi_number: usize) -> Option<&RoiResult> {
        self.rows.iter().find(|row| row.roi_number == roi_number)
    }

    /// Histogram for a 1-based region number.
    pub fn histogram(&self, roi_number: usize) -> Option<&IntensityHistogram> {
        self.histograms.iter().find(|h| h.roi_number == roi_number)
    }

    /// Panel layout for rendering the histograms.
    pub fn panel_grid(&self) -> PanelGrid {
        PanelGrid::for_regions(self.histograms.len())
    }

    /// Serialize the report to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a report from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write the JSON report to `path`.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Saved report to {:?}", path);
        Ok(())
    }

    /// Render the result rows as a right-aligned text table.
    pub fn render_table(&self) -> String {
        let cells: Vec<[String; 4]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.roi_number.to_string(),
                    row.marked_area_pixels.to_string(),
                    row.signal_area_pixels.to_string(),
                    format!("{:.6}", row.dispersal_ratio),
                ]
            })
            .collect();

        let mut widths = RESULT_COLUMNS.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let mut out = String::new();
        let header: Vec<String> = RESULT_COLUMNS
            .iter()
            .zip(widths)
            .map(|(name, width)| format!("{:>width$}", name))
            .collect();
        out.push_str(&header.join(" "));

        for row in &cells {
            out.push('\n');
            let line: Vec<String> = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{:>width$}", cell))
                .collect();
            out.push_str(&line.join(" "));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HISTOGRAM_BINS;

    fn sample_report() -> Report {
        let rows = vec![
            RoiResult::from_counts(1, 100, 25),
            RoiResult::from_counts(2, 0, 0),
            RoiResult::from_counts(3, 40, 40),
        ];
        let histograms = (1..=3)
            .map(|n| IntensityHistogram::new(n, [0u64; HISTOGRAM_BINS], 0))
            .collect();
        Report::new(600, 400, ThresholdOptions::default(), rows, histograms)
    }

    #[test]
    fn test_lookup_by_number() {
        let report = sample_report();
        assert_eq!(report.row(3).unwrap().dispersal_ratio, 1.0);
        assert!(report.row(4).is_none());
        assert_eq!(report.histogram(2).unwrap().roi_number, 2);
    }

    #[test]
    fn test_render_table() {
        let table = sample_report().render_table();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Mitochondrial Dispersal Ratio"));
        assert!(lines[1].trim_start().starts_with('1'));
        assert!(lines[1].ends_with("0.250000"));
        assert!(lines[2].ends_with("0.000000"));
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn test_json_roundtrip() {
        let report = sample_report();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"Marked Area Pixels\""));

        let back = Report::from_json(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_panel_grid_matches_histograms() {
        let grid = sample_report().panel_grid();
        assert_eq!(grid.panels.len(), 3);
        assert_eq!(grid.blank_slots, 1);
    }
}
