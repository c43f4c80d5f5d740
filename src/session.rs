//! Analyzer session: the state a front-end drives between user actions.
//!
//! Holds the two working frames, the ROI set and the last report. Every
//! operation is synchronous; a failure leaves prior state untouched.

use std::path::Path;

use crate::analysis;
use crate::config::AnalysisConfig;
use crate::data::{Frame, LoaderRegistry, ingest_bytes, ingest_file};
use crate::error::{AnalysisError, Result};
use crate::model::{Point, Polygon, RoiSet};
use crate::report::Report;

/// Which of the two input frames an upload targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSlot {
    /// Structural cell image; regions are traced on it.
    Cell,
    /// Fluorescence mitochondrial image; its green channel is measured.
    Mito,
}

/// Stateful core of the dispersal analyzer.
pub struct Analyzer {
    config: AnalysisConfig,
    registry: LoaderRegistry,
    cell: Option<Frame>,
    mito: Option<Frame>,
    rois: RoiSet,
    last_report: Option<Report>,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            registry: LoaderRegistry::new(),
            cell: None,
            mito: None,
            rois: RoiSet::new(),
            last_report: None,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Loader registry used for uploads; register extra formats here.
    pub fn registry_mut(&mut self) -> &mut LoaderRegistry {
        &mut self.registry
    }

    /// Load a source file into a frame slot, fitted to the working box.
    pub fn upload_file(&mut self, slot: FrameSlot, path: &Path) -> Result<()> {
        let frame = ingest_file(
            &self.registry,
            path,
            self.config.frame_width,
            self.config.frame_height,
            self.config.resize_filter,
        )
        .inspect_err(|e| log::warn!("Upload of {:?} failed: {}", path, e))?;

        self.set_frame(slot, frame);
        Ok(())
    }

    /// Load in-memory source bytes into a frame slot.
    pub fn upload_bytes(&mut self, slot: FrameSlot, data: &[u8], filename: Option<&str>) -> Result<()> {
        let frame = ingest_bytes(
            &self.registry,
            data,
            filename,
            self.config.frame_width,
            self.config.frame_height,
            self.config.resize_filter,
        )
        .inspect_err(|e| log::warn!("Upload of {} failed: {}", filename.unwrap_or("<memory>"), e))?;

        self.set_frame(slot, frame);
        Ok(())
    }

    /// Install an already fitted frame.
    ///
    /// A new cell frame redefines the coordinate space, so existing
    /// regions are discarded with it.
    pub fn set_frame(&mut self, slot: FrameSlot, frame: Frame) {
        log::info!(
            "{:?} frame set ({}x{})",
            slot,
            frame.width(),
            frame.height()
        );
        match slot {
            FrameSlot::Cell => {
                self.cell = Some(frame);
                self.rois.clear();
            }
            FrameSlot::Mito => self.mito = Some(frame),
        }
    }

    pub fn frame(&self, slot: FrameSlot) -> Option<&Frame> {
        match slot {
            FrameSlot::Cell => self.cell.as_ref(),
            FrameSlot::Mito => self.mito.as_ref(),
        }
    }

    /// Start a new trace. Regions can only be traced on a loaded cell frame.
    pub fn begin(&mut self, point: Point) -> Result<()> {
        if self.cell.is_none() {
            return Err(AnalysisError::NoCellImage);
        }
        self.rois.begin(point);
        Ok(())
    }

    /// Append a vertex to the open trace.
    pub fn extend(&mut self, point: Point) {
        self.rois.extend(point);
    }

    /// Commit the open trace; returns its region number.
    pub fn finalize(&mut self) -> Option<usize> {
        self.rois.finalize()
    }

    /// Commit complete polygons in order, e.g. from a ROI file.
    ///
    /// Returns the region number given to each polygon.
    pub fn add_regions(&mut self, polygons: impl IntoIterator<Item = Polygon>) -> Result<Vec<usize>> {
        if self.cell.is_none() {
            return Err(AnalysisError::NoCellImage);
        }
        let numbers: Vec<usize> = polygons.into_iter().map(|p| self.rois.commit(p)).collect();
        log::info!("Added {} region(s)", numbers.len());
        Ok(numbers)
    }

    /// Discard every region.
    pub fn clear(&mut self) {
        self.rois.clear();
    }

    pub fn rois(&self) -> &RoiSet {
        &self.rois
    }

    /// Run a calculation pass and keep its report.
    ///
    /// On failure the previous report, if any, is kept.
    pub fn calculate(&mut self) -> Result<&Report> {
        let report = analysis::calculate(
            self.cell.as_ref(),
            self.mito.as_ref(),
            &self.rois,
            &self.config.threshold,
        )?;
        Ok(self.last_report.insert(report))
    }

    /// Report of the last successful calculation.
    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}
