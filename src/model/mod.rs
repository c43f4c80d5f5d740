//! Region-of-interest model: polygons, the drawing builder, and masks.

mod mask;
mod polygon;
mod roi;

pub use mask::{Mask, rasterize};
pub use polygon::{MIN_POLYGON_VERTICES, PixelBounds, Point, Polygon};
pub use roi::{DrawingState, RoiSet};
