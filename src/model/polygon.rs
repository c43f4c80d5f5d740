//! Geometry types in working-frame pixel coordinates.

use serde::{Deserialize, Serialize};

/// Minimum number of vertices for a polygon to enclose any area.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// A 2D integer point in frame pixel coordinates.
///
/// Points may lie outside the frame (a trace dragged past the image edge);
/// rasterization clips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Inclusive integer bounding box of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

/// A closed polygon; the last vertex implicitly connects to the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    /// The vertices of the polygon in trace order.
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a polygon from any sequence of point-like values.
    pub fn from_points<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Self {
        Self {
            vertices: points.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a vertex.
    pub fn push(&mut self, point: Point) {
        self.vertices.push(point);
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether the polygon has enough vertices to be filled.
    pub fn is_fillable(&self) -> bool {
        self.vertices.len() >= MIN_POLYGON_VERTICES
    }

    /// Where the region's number label is drawn: the first vertex.
    pub fn label_anchor(&self) -> Option<Point> {
        self.vertices.first().copied()
    }

    /// Iterate over closed edges `(v[i], v[i + 1 mod n])`.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Get the inclusive pixel bounding box of the polygon.
    pub fn bounds(&self) -> Option<PixelBounds> {
        let first = self.vertices.first()?;
        let init = PixelBounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };

        Some(self.vertices.iter().fold(init, |b, p| PixelBounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Check if a point is strictly inside the polygon (ray casting, even-odd).
    ///
    /// Boundary points are not guaranteed either way; the rasterizer adds
    /// them explicitly.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if !self.is_fillable() {
            return false;
        }

        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (f64::from(self.vertices[i].x), f64::from(self.vertices[i].y));
            let (xj, yj) = (f64::from(self.vertices[j].x), f64::from(self.vertices[j].y));

            if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: i32, y: i32, side: i32) -> Polygon {
        Polygon::from_points([(x, y), (x + side, y), (x + side, y + side), (x, y + side)])
    }

    #[test]
    fn test_fillable_needs_three_vertices() {
        let mut poly = Polygon::new();
        assert!(!poly.is_fillable());
        poly.push(Point::new(0, 0));
        poly.push(Point::new(5, 0));
        assert!(!poly.is_fillable());
        poly.push(Point::new(5, 5));
        assert!(poly.is_fillable());
    }

    #[test]
    fn test_edges_wrap_around() {
        let poly = Polygon::from_points([(0, 0), (4, 0), (4, 4)]);
        let edges: Vec<_> = poly.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (Point::new(4, 4), Point::new(0, 0)));
    }

    #[test]
    fn test_bounds() {
        let poly = Polygon::from_points([(3, 9), (-2, 4), (7, 1)]);
        let bounds = poly.bounds().unwrap();
        assert_eq!(
            bounds,
            PixelBounds {
                min_x: -2,
                min_y: 1,
                max_x: 7,
                max_y: 9
            }
        );
        assert!(Polygon::new().bounds().is_none());
    }

    #[test]
    fn test_contains_square() {
        let poly = square(10, 10, 10);
        assert!(poly.contains(15.0, 15.0));
        assert!(!poly.contains(25.0, 15.0));
        assert!(!poly.contains(5.0, 5.0));
    }

    #[test]
    fn test_label_anchor_is_first_vertex() {
        let poly = Polygon::from_points([[12, 34], [50, 34], [50, 80]]);
        assert_eq!(poly.label_anchor(), Some(Point::new(12, 34)));
        assert_eq!(Polygon::new().label_anchor(), None);
    }
}
