//! Line shape.

use super::{ShapeBehavior, ShapeId, ShapeStyle, point_to_segment_dist};
use crate::error::{EditError, EditResult};
use kurbo::{Affine, BezPath, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line segment between two endpoints.
///
/// Lines are always point-editable: both endpoints are individually
/// draggable and there is no independent resize box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Optional 2D transform applied around the local frame.
    #[serde(default)]
    pub transform: Option<Affine>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            transform: None,
            style: ShapeStyle::default(),
        }
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// The endpoint at `index` (0 = start, 1 = end).
    pub fn point_at(&self, index: usize) -> EditResult<Point> {
        match index {
            0 => Ok(self.start),
            1 => Ok(self.end),
            _ => Err(EditError::InvalidPointIndex { index, count: 2 }),
        }
    }

    /// Replace the endpoint at `index`.
    pub fn set_point_at(&mut self, index: usize, point: Point) -> EditResult<()> {
        match index {
            0 => self.start = point,
            1 => self.end = point,
            _ => return Err(EditError::InvalidPointIndex { index, count: 2 }),
        }
        Ok(())
    }
}

impl ShapeBehavior for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    fn set_location(&mut self, location: Point) {
        let delta = location - self.location();
        self.start += delta;
        self.end += delta;
    }

    fn set_size(&mut self, size: Size) {
        // Scale both endpoints about the bounds origin; a degenerate axis
        // (vertical/horizontal line) keeps its offsets unchanged.
        let bounds = self.bounds();
        let sx = if bounds.width() > f64::EPSILON {
            size.width / bounds.width()
        } else {
            1.0
        };
        let sy = if bounds.height() > f64::EPSILON {
            size.height / bounds.height()
        } else {
            1.0
        };
        let origin = bounds.origin();
        for p in [&mut self.start, &mut self.end] {
            p.x = origin.x + (p.x - origin.x) * sx;
            p.y = origin.y + (p.y - origin.y) * sy;
        }
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dist = point_to_segment_dist(point, self.start, self.end);
        dist <= tolerance + self.style.stroke_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    fn transform(&self) -> Option<Affine> {
        self.transform
    }

    fn set_transform(&mut self, transform: Option<Affine>) {
        self.transform = transform;
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
