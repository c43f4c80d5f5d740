//! Frames and the loaders that produce them.
//!
//! This module provides:
//! - `Frame`: the working-resolution 3-channel image every measurement runs on
//! - `LoaderRegistry`: extensible decoding of source files into RGB images
//! - `ingest`: aspect-preserving fit of a decoded image into the working box
//!
//! ## Adding New Formats
//!
//! 1. Create a new loader in `loaders/` implementing `FrameLoader`
//! 2. Register it in `LoaderRegistry::new()`

mod frame;
pub mod ingest;
mod loader;
pub mod loaders;

pub use frame::Frame;
pub use ingest::{ResizeFilter, fit_within, fitted_dimensions, ingest_bytes, ingest_file};
pub use loader::{FrameLoader, LoaderError, LoaderRegistry};
