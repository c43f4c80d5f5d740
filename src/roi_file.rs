//! ROI files: regions traced outside the analyzer, stored as JSON.
//!
//! The file is an array of polygons, each an array of `[x, y]` integer
//! pairs in working-frame pixel coordinates:
//!
//! ```json
//! [[[120, 80], [180, 90], [150, 160]], [[300, 300], [340, 300], [320, 350]]]
//! ```
//!
//! Position in the array is the region number, so an empty polygon is
//! rejected instead of being skipped.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{Point, Polygon};

/// Errors from reading a ROI file.
#[derive(Error, Debug)]
pub enum RoiFileError {
    /// The file could not be read
    #[error("failed to read ROI file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not an array of `[x, y]` arrays
    #[error("failed to parse ROI file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A polygon entry has no vertices
    #[error("region {number} has no vertices")]
    EmptyPolygon {
        /// 1-based position of the entry in the file
        number: usize,
    },
}

/// Parse ROI file content into polygons in file order.
pub fn parse_rois(json: &str) -> Result<Vec<Polygon>, RoiFileError> {
    let entries: Vec<Vec<[i32; 2]>> = serde_json::from_str(json)?;

    entries
        .into_iter()
        .enumerate()
        .map(|(i, vertices)| {
            if vertices.is_empty() {
                return Err(RoiFileError::EmptyPolygon { number: i + 1 });
            }
            Ok(Polygon::from_points(vertices.into_iter().map(Point::from)))
        })
        .collect()
}

/// Read and parse a ROI file.
pub fn load_rois(path: &Path) -> Result<Vec<Polygon>, RoiFileError> {
    let json = std::fs::read_to_string(path).map_err(|source| RoiFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let polygons = parse_rois(&json)?;
    log::debug!("Read {} region(s) from {:?}", polygons.len(), path);
    Ok(polygons)
}
