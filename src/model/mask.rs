//! Binary region masks and polygon rasterization.
//!
//! Fill rule is even-odd: scanline crossings are paired left to right, so
//! the lobes of a self-intersecting trace that overlap an even number of
//! times are left out. Every pixel the boundary passes through is inside.

use ndarray::Array2;

use crate::constants::{MASK_INSIDE, MASK_OUTSIDE};
use crate::model::{Point, Polygon};

/// A binary grid with the frame's dimensions: 255 inside, 0 outside.
///
/// Masks are always regenerated from polygons, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    grid: Array2<u8>,
}

impl Mask {
    /// An all-outside mask of `width × height`.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            grid: Array2::from_elem((height as usize, width as usize), MASK_OUTSIDE),
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.grid.nrows() as u32
    }

    /// Whether pixel `(x, y)` is inside the region. Out-of-range is outside.
    pub fn is_inside(&self, x: u32, y: u32) -> bool {
        self.grid
            .get((y as usize, x as usize))
            .is_some_and(|&v| v == MASK_INSIDE)
    }

    /// Number of inside pixels.
    pub fn area(&self) -> u64 {
        self.grid.iter().filter(|&&v| v == MASK_INSIDE).count() as u64
    }

    /// The `(height, width)` grid of 0/255 values.
    pub fn as_array(&self) -> &Array2<u8> {
        &self.grid
    }

    fn set_inside(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(cell) = self.grid.get_mut((y as usize, x as usize)) {
            *cell = MASK_INSIDE;
        }
    }

    fn fill_span(&mut self, y: i64, x_start: i64, x_end: i64) {
        let last = i64::from(self.width()) - 1;
        let (x_start, x_end) = (x_start.max(0), x_end.min(last));
        for x in x_start..=x_end {
            self.set_inside(x, y);
        }
    }

    /// Bresenham line from `a` to `b`, clipped to the frame first so the
    /// walk never leaves the grid.
    fn draw_segment(&mut self, a: Point, b: Point) {
        let Some(((mut x, mut y), (x1, y1))) = clip_segment(a, b, self.width(), self.height())
        else {
            return;
        };
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_inside(x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// Liang-Barsky clip of segment `a -> b` to the pixel-center rectangle
/// `[0, width - 1] x [0, height - 1]`, rounded back to pixel coordinates.
///
/// Segments entirely inside are returned unchanged.
fn clip_segment(a: Point, b: Point, width: u32, height: u32) -> Option<((i64, i64), (i64, i64))> {
    if width == 0 || height == 0 {
        return None;
    }
    let (x_max, y_max) = (f64::from(width - 1), f64::from(height - 1));
    let (x0, y0) = (f64::from(a.x), f64::from(a.y));
    let (dx, dy) = (f64::from(b.x) - x0, f64::from(b.y) - y0);

    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [(-dx, x0), (dx, x_max - x0), (-dy, y0), (dy, y_max - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
    }

    let at = |t: f64| -> (i64, i64) {
        let x = (x0 + t * dx).round().clamp(0.0, x_max);
        let y = (y0 + t * dy).round().clamp(0.0, y_max);
        (x as i64, y as i64)
    };
    Some((at(t0), at(t1)))
}

/// Fill a closed polygon into a `width × height` mask.
///
/// Polygons with fewer than three vertices yield an empty mask. The result
/// depends only on the vertex list, so rasterizing twice is bit-identical.
pub fn rasterize(polygon: &Polygon, width: u32, height: u32) -> Mask {
    let mut mask = Mask::empty(width, height);
    if !polygon.is_fillable() || width == 0 || height == 0 {
        return mask;
    }

    let Some(bounds) = polygon.bounds() else {
        return mask;
    };

    let y_start = i64::from(bounds.min_y).max(0);
    let y_end = i64::from(bounds.max_y).min(i64::from(height) - 1);
    let mut crossings: Vec<f64> = Vec::with_capacity(polygon.len());

    for y in y_start..=y_end {
        let yc = y as f64;
        crossings.clear();

        // Half-open rule: an edge covers rows [min(y0, y1), max(y0, y1)).
        for (a, b) in polygon.edges() {
            let (ay, by) = (f64::from(a.y), f64::from(b.y));
            if (ay <= yc && yc < by) || (by <= yc && yc < ay) {
                let t = (yc - ay) / (by - ay);
                crossings.push(f64::from(a.x) + t * (f64::from(b.x) - f64::from(a.x)));
            }
        }

        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            mask.fill_span(y, pair[0].ceil() as i64, pair[1].floor() as i64);
        }
    }

    for (a, b) in polygon.edges() {
        mask.draw_segment(a, b);
    }

    mask
}
