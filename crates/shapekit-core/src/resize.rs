//! Movement handlers for resize-box handles and point edits.

use crate::handles::{BoxHandle, Corner, Edge};
use crate::snap::{snap_coord, snap_point};
use kurbo::{Point, Rect, Size, Vec2};

/// Constraints applied while computing a tentative resize.
#[derive(Debug, Clone, Copy)]
pub struct ResizeRules {
    /// Grid spacing for edge snapping, if enabled.
    pub grid: Option<f64>,
    /// Minimum size on each axis; candidates below it reject the frame.
    pub min_size: Size,
    /// Preserve the gesture-start width/height ratio.
    pub lock_aspect: bool,
}

/// Snap a moving edge to the grid unless that would violate the minimum
/// size, in which case snapping is skipped for this edge only.
fn snapped_edge(raw: f64, opposite: f64, positive: f64, min: f64, grid: Option<f64>) -> f64 {
    let Some(spacing) = grid else {
        return raw;
    };
    let snapped = snap_coord(raw, spacing);
    let size = (snapped - opposite) * positive;
    if size + 1e-9 >= min { snapped } else { raw }
}

impl BoxHandle {
    /// Whether this handle moves the left/top edge (and thus the origin).
    fn moves(&self) -> (bool, bool, bool, bool) {
        // (left, top, right, bottom)
        match self {
            BoxHandle::Corner(Corner::TopLeft) => (true, true, false, false),
            BoxHandle::Corner(Corner::TopRight) => (false, true, true, false),
            BoxHandle::Corner(Corner::BottomRight) => (false, false, true, true),
            BoxHandle::Corner(Corner::BottomLeft) => (true, false, false, true),
            BoxHandle::Edge(Edge::Top) => (false, true, false, false),
            BoxHandle::Edge(Edge::Right) => (false, false, true, false),
            BoxHandle::Edge(Edge::Bottom) => (false, false, false, true),
            BoxHandle::Edge(Edge::Left) => (true, false, false, false),
        }
    }

    /// Turn a pointer delta into a tentative `(location, size)` for the
    /// owning shape, from the gesture-start bounds.
    ///
    /// Returns `None` when the candidate falls below the minimum size on
    /// either axis; the frame is rejected outright with no partial move.
    pub fn apply(&self, start: Rect, delta: Vec2, rules: &ResizeRules) -> Option<(Point, Size)> {
        let (left, top, right, bottom) = self.moves();
        let min = rules.min_size;

        let mut x0 = start.x0;
        let mut y0 = start.y0;
        let mut x1 = start.x1;
        let mut y1 = start.y1;

        if left {
            x0 = snapped_edge(start.x0 + delta.x, start.x1, -1.0, min.width, rules.grid);
        }
        if right {
            x1 = snapped_edge(start.x1 + delta.x, start.x0, 1.0, min.width, rules.grid);
        }
        if top {
            y0 = snapped_edge(start.y0 + delta.y, start.y1, -1.0, min.height, rules.grid);
        }
        if bottom {
            y1 = snapped_edge(start.y1 + delta.y, start.y0, 1.0, min.height, rules.grid);
        }

        let mut width = x1 - x0;
        let mut height = y1 - y0;
        let mut origin = Point::new(x0, y0);

        if rules.lock_aspect && start.width() > f64::EPSILON && start.height() > f64::EPSILON {
            let ratio = start.width() / start.height();
            let width_drives = match self {
                BoxHandle::Edge(Edge::Left) | BoxHandle::Edge(Edge::Right) => true,
                BoxHandle::Edge(Edge::Top) | BoxHandle::Edge(Edge::Bottom) => false,
                BoxHandle::Corner(_) => delta.x.abs() >= delta.y.abs(),
            };
            if width_drives {
                height = width / ratio;
            } else {
                width = height * ratio;
            }
            // Re-anchor so the unmoved corner stays fixed.
            origin = match self {
                BoxHandle::Corner(Corner::TopLeft) => {
                    Point::new(start.x1 - width, start.y1 - height)
                }
                BoxHandle::Corner(Corner::TopRight) => Point::new(start.x0, start.y1 - height),
                BoxHandle::Corner(Corner::BottomLeft) => Point::new(start.x1 - width, start.y0),
                BoxHandle::Corner(Corner::BottomRight) => Point::new(start.x0, start.y0),
                BoxHandle::Edge(Edge::Top) => Point::new(start.x0, start.y1 - height),
                BoxHandle::Edge(Edge::Left) => Point::new(start.x1 - width, start.y0),
                BoxHandle::Edge(Edge::Right) | BoxHandle::Edge(Edge::Bottom) => {
                    Point::new(start.x0, start.y0)
                }
            };
        }

        if width + 1e-9 < min.width || height + 1e-9 < min.height {
            return None;
        }
        Some((origin, Size::new(width, height)))
    }
}

/// Movement handler for vertices, path anchors, and control points:
/// the pre-drag point plus the accumulated delta, optionally grid-snapped.
pub fn move_point(origin: Point, delta: Vec2, grid: Option<f64>) -> Point {
    let target = origin + delta;
    match grid {
        Some(spacing) => snap_point(target, spacing),
        None => target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: ResizeRules = ResizeRules {
        grid: None,
        min_size: Size::new(5.0, 5.0),
        lock_aspect: false,
    };

    #[test]
    fn test_corner_moves_both_axes() {
        let start = Rect::new(10.0, 10.0, 50.0, 40.0);
        let (origin, size) = BoxHandle::Corner(Corner::BottomRight)
            .apply(start, Vec2::new(10.0, 20.0), &RULES)
            .unwrap();
        assert_eq!(origin, Point::new(10.0, 10.0));
        assert_eq!(size, Size::new(50.0, 50.0));
    }

    #[test]
    fn test_top_left_moves_origin() {
        let start = Rect::new(10.0, 10.0, 50.0, 40.0);
        let (origin, size) = BoxHandle::Corner(Corner::TopLeft)
            .apply(start, Vec2::new(-5.0, -5.0), &RULES)
            .unwrap();
        assert_eq!(origin, Point::new(5.0, 5.0));
        assert_eq!(size, Size::new(45.0, 35.0));
    }

    #[test]
    fn test_edge_moves_single_axis() {
        let start = Rect::new(10.0, 10.0, 50.0, 40.0);
        let (origin, size) = BoxHandle::Edge(Edge::Right)
            .apply(start, Vec2::new(15.0, 99.0), &RULES)
            .unwrap();
        assert_eq!(origin, Point::new(10.0, 10.0));
        assert_eq!(size, Size::new(55.0, 30.0));
    }

    #[test]
    fn test_minimum_size_rejects_frame() {
        let start = Rect::new(10.0, 10.0, 50.0, 40.0);
        let result = BoxHandle::Edge(Edge::Right).apply(start, Vec2::new(-38.0, 0.0), &RULES);
        assert!(result.is_none());

        // Dragging past the opposite edge is also a rejection.
        let crossed = BoxHandle::Edge(Edge::Left).apply(start, Vec2::new(60.0, 0.0), &RULES);
        assert!(crossed.is_none());
    }

    #[test]
    fn test_snap_moving_edge() {
        let rules = ResizeRules {
            grid: Some(8.0),
            ..RULES
        };
        let start = Rect::new(0.0, 0.0, 40.0, 40.0);
        let (_, size) = BoxHandle::Edge(Edge::Right)
            .apply(start, Vec2::new(5.0, 0.0), &rules)
            .unwrap();
        // Right edge 45 snaps to 48.
        assert!((size.width - 48.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_skipped_when_below_minimum() {
        let rules = ResizeRules {
            grid: Some(8.0),
            min_size: Size::new(5.0, 5.0),
            lock_aspect: false,
        };
        let start = Rect::new(0.0, 0.0, 40.0, 40.0);
        // Raw right edge 6.5 keeps width 6.5; snapping to 8 would be fine,
        // but snapping to 0 would not. 6.5 snaps to 8 -> allowed.
        let (_, size) = BoxHandle::Edge(Edge::Right)
            .apply(start, Vec2::new(-33.5, 0.0), &rules)
            .unwrap();
        assert!((size.width - 8.0).abs() < f64::EPSILON);

        // Raw right edge 3.9 would snap to 0 (below minimum): snap skipped,
        // the unsnapped width 3.9 then rejects the frame entirely.
        let result = BoxHandle::Edge(Edge::Right).apply(start, Vec2::new(-36.1, 0.0), &rules);
        assert!(result.is_none());

        // Raw right edge 6.0 would snap to 8; width 8 >= minimum -> snapped.
        let (_, size) = BoxHandle::Edge(Edge::Right)
            .apply(start, Vec2::new(-34.0, 0.0), &rules)
            .unwrap();
        assert!((size.width - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aspect_lock_preserves_ratio() {
        let rules = ResizeRules {
            grid: None,
            min_size: Size::new(1.0, 1.0),
            lock_aspect: true,
        };
        let start = Rect::new(0.0, 0.0, 100.0, 50.0);
        for delta in [Vec2::new(40.0, 10.0), Vec2::new(10.0, 40.0)] {
            let (_, size) = BoxHandle::Corner(Corner::BottomRight)
                .apply(start, delta, &rules)
                .unwrap();
            assert!(
                (size.width / size.height - 2.0).abs() < 1e-9,
                "ratio broken for {delta:?}"
            );
        }
    }

    #[test]
    fn test_aspect_lock_keeps_unmoved_corner() {
        let rules = ResizeRules {
            grid: None,
            min_size: Size::new(1.0, 1.0),
            lock_aspect: true,
        };
        let start = Rect::new(10.0, 10.0, 110.0, 60.0);
        let (origin, size) = BoxHandle::Corner(Corner::TopLeft)
            .apply(start, Vec2::new(-20.0, -5.0), &rules)
            .unwrap();
        // Bottom-right corner is fixed.
        assert!((origin.x + size.width - 110.0).abs() < 1e-9);
        assert!((origin.y + size.height - 60.0).abs() < 1e-9);
        assert!((size.width / size.height - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_point_snapped() {
        let moved = move_point(Point::new(12.0, 12.0), Vec2::new(5.0, 5.0), Some(8.0));
        assert_eq!(moved, Point::new(16.0, 16.0));

        let free = move_point(Point::new(12.0, 12.0), Vec2::new(5.0, 5.0), None);
        assert_eq!(free, Point::new(17.0, 17.0));
    }
}
