//! The ROI set and the drawing state machine that feeds it.
//!
//! Front-ends translate pointer gestures into `begin`, `extend`,
//! `finalize` and `clear` calls; nothing here knows about input events.

use crate::model::mask::{Mask, rasterize};
use crate::model::{Point, Polygon};

/// State for a trace currently being drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DrawingState {
    /// Not currently drawing anything.
    #[default]
    Idle,
    /// Drawing a polygon - stores vertices added so far.
    Drawing { vertices: Vec<Point> },
}

impl DrawingState {
    /// Check if a trace is open.
    pub fn is_drawing(&self) -> bool {
        matches!(self, DrawingState::Drawing { .. })
    }

    /// Vertices of the open trace, empty when idle.
    pub fn vertices(&self) -> &[Point] {
        match self {
            DrawingState::Idle => &[],
            DrawingState::Drawing { vertices } => vertices,
        }
    }
}

/// Ordered collection of finalized regions.
///
/// Insertion order is the region number (1-based) used in every report
/// row and on-image label. Regions cannot be reordered or removed
/// individually; only `clear` discards them.
#[derive(Debug, Clone, Default)]
pub struct RoiSet {
    polygons: Vec<Polygon>,
    drawing: DrawingState,
}

impl RoiSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new trace with one vertex.
    ///
    /// A trace that is still open is committed first, so every started
    /// trace keeps its place in the numbering.
    pub fn begin(&mut self, point: Point) {
        if self.drawing.is_drawing() {
            log::debug!("Starting a new trace while one is open; committing the open trace");
            self.finalize();
        }
        self.drawing = DrawingState::Drawing {
            vertices: vec![point],
        };
    }

    /// Append a vertex to the open trace. No-op when idle.
    pub fn extend(&mut self, point: Point) {
        if let DrawingState::Drawing { vertices } = &mut self.drawing {
            vertices.push(point);
        }
    }

    /// Close the open trace and commit it to the set.
    ///
    /// Returns the region number of the committed polygon, or `None` when
    /// no trace was open. Traces with fewer than three vertices are still
    /// committed and measure as zero-area regions.
    pub fn finalize(&mut self) -> Option<usize> {
        let DrawingState::Drawing { vertices } = std::mem::take(&mut self.drawing) else {
            return None;
        };

        if vertices.len() < crate::model::MIN_POLYGON_VERTICES {
            log::warn!(
                "Committed region {} has only {} vertex(es); it will measure as empty",
                self.polygons.len() + 1,
                vertices.len()
            );
        }

        self.polygons.push(Polygon { vertices });
        Some(self.polygons.len())
    }

    /// Commit an already complete polygon, as loaded from a ROI file.
    ///
    /// An open trace is committed first so numbering follows call order.
    /// Polygons with fewer than three vertices measure as zero-area regions.
    pub fn commit(&mut self, polygon: Polygon) -> usize {
        if self.drawing.is_drawing() {
            self.finalize();
        }
        self.drawing = DrawingState::Drawing {
            vertices: polygon.vertices,
        };
        self.finalize().unwrap_or(self.polygons.len())
    }

    /// Discard every region and any open trace.
    pub fn clear(&mut self) {
        self.polygons.clear();
        self.drawing = DrawingState::Idle;
    }

    /// Current drawing state.
    pub fn drawing(&self) -> &DrawingState {
        &self.drawing
    }

    /// Committed polygons in numbering order.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Polygon by 1-based region number.
    pub fn get(&self, number: usize) -> Option<&Polygon> {
        number.checked_sub(1).and_then(|i| self.polygons.get(i))
    }

    /// Number of committed regions.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// `(region number, label anchor)` for each committed region.
    pub fn labels(&self) -> Vec<(usize, Point)> {
        self.polygons
            .iter()
            .enumerate()
            .filter_map(|(i, poly)| poly.label_anchor().map(|anchor| (i + 1, anchor)))
            .collect()
    }

    /// Rasterize every committed region for a frame of the given size.
    pub fn masks(&self, width: u32, height: u32) -> Vec<Mask> {
        self.polygons
            .iter()
            .map(|poly| rasterize(poly, width, height))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(set: &mut RoiSet, points: &[(i32, i32)]) -> Option<usize> {
        let mut iter = points.iter().copied().map(Point::from);
        if let Some(first) = iter.next() {
            set.begin(first);
        }
        for p in iter {
            set.extend(p);
        }
        set.finalize()
    }

    #[test]
    fn test_state_transitions() {
        let mut set = RoiSet::new();
        assert!(!set.drawing().is_drawing());

        set.begin(Point::new(1, 1));
        assert!(set.drawing().is_drawing());
        set.extend(Point::new(5, 1));
        assert_eq!(set.drawing().vertices().len(), 2);
        assert!(set.is_empty());

        assert_eq!(set.finalize(), Some(1));
        assert!(!set.drawing().is_drawing());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_extend_and_finalize_when_idle_are_noops() {
        let mut set = RoiSet::new();
        set.extend(Point::new(3, 3));
        assert_eq!(set.finalize(), None);
        assert!(set.is_empty());
    }

    #[test]
    fn test_numbering_follows_insertion_order() {
        let mut set = RoiSet::new();
        trace(&mut set, &[(0, 0), (100, 0), (100, 100), (0, 100)]);
        trace(&mut set, &[(200, 200), (205, 200), (205, 205)]);

        assert_eq!(set.get(1).unwrap().vertices[1], Point::new(100, 0));
        assert_eq!(set.get(2).unwrap().vertices[0], Point::new(200, 200));
        assert!(set.get(0).is_none());
        assert!(set.get(3).is_none());
    }

    #[test]
    fn test_begin_commits_open_trace() {
        let mut set = RoiSet::new();
        set.begin(Point::new(0, 0));
        set.extend(Point::new(9, 0));
        set.extend(Point::new(9, 9));
        set.begin(Point::new(50, 50));

        assert_eq!(set.len(), 1);
        assert_eq!(set.drawing().vertices(), &[Point::new(50, 50)]);
    }

    #[test]
    fn test_short_trace_is_committed_as_empty_region() {
        let mut set = RoiSet::new();
        assert_eq!(trace(&mut set, &[(4, 4), (8, 8)]), Some(1));

        let masks = set.masks(20, 20);
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0].area(), 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut set = RoiSet::new();
        trace(&mut set, &[(0, 0), (10, 0), (10, 10)]);
        set.begin(Point::new(1, 2));
        set.clear();

        assert!(set.is_empty());
        assert_eq!(set.drawing(), &DrawingState::Idle);
        assert!(set.labels().is_empty());
    }

    #[test]
    fn test_labels() {
        let mut set = RoiSet::new();
        trace(&mut set, &[(7, 8), (20, 8), (20, 30)]);
        trace(&mut set, &[(40, 41), (60, 41), (60, 70)]);

        assert_eq!(
            set.labels(),
            vec![(1, Point::new(7, 8)), (2, Point::new(40, 41))]
        );
    }

    #[test]
    fn test_commit_keeps_call_order() {
        let mut set = RoiSet::new();
        set.begin(Point::new(0, 0));
        set.extend(Point::new(9, 0));
        set.extend(Point::new(9, 9));

        let square = Polygon::from_points([(20, 20), (29, 20), (29, 29), (20, 29)]);
        assert_eq!(set.commit(square), 2);
        assert_eq!(set.commit(Polygon::new()), 3);

        assert!(!set.drawing().is_drawing());
        assert_eq!(set.get(2).unwrap().vertices[0], Point::new(20, 20));
        assert_eq!(set.masks(40, 40)[2].area(), 0);
    }
}
