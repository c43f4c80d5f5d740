//! mitodisp - Mitochondrial Dispersal Analyzer
//!
//! Measures how mitochondrial fluorescence spreads inside traced cell
//! regions. A front-end supplies two co-registered images and closed
//! polygons in working-frame coordinates; the core returns per-region
//! area counts, dispersal ratios and the intensity histograms behind
//! each Otsu threshold.
//!
//! ```rust,ignore
//! use mitodisp::{Analyzer, FrameSlot, model::Point};
//!
//! let mut analyzer = Analyzer::default();
//! analyzer.upload_file(FrameSlot::Cell, "cell.png".as_ref())?;
//! analyzer.upload_file(FrameSlot::Mito, "mito.png".as_ref())?;
//! analyzer.begin(Point::new(120, 80))?;
//! analyzer.extend(Point::new(180, 90));
//! analyzer.extend(Point::new(150, 160));
//! analyzer.finalize();
//! println!("{}", analyzer.calculate()?.render_table());
//! ```

pub mod analysis;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod model;
pub mod report;
pub mod roi_file;
mod session;

pub use analysis::calculate;
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use report::Report;
pub use session::{Analyzer, FrameSlot};
