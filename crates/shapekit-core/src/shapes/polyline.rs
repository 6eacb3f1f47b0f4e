//! Polyline and polygon shapes.

use super::{ShapeBehavior, ShapeId, ShapeStyle, point_to_polyline_dist};
use crate::error::{EditError, EditResult};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered point sequence, open (polyline) or closed (polygon).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polyline {
    pub(crate) id: ShapeId,
    /// Vertices in order.
    pub points: Vec<Point>,
    /// Closed sequences connect the last vertex back to the first.
    pub closed: bool,
    /// Optional 2D transform applied around the local frame.
    #[serde(default)]
    pub transform: Option<Affine>,
    /// Style properties.
    pub style: ShapeStyle,
    /// Bounds cache, refreshed on every geometry mutation.
    #[serde(skip)]
    cached_bounds: Option<Rect>,
}

impl Polyline {
    /// Create an open polyline.
    pub fn open(points: Vec<Point>) -> Self {
        Self::with_closed(points, false)
    }

    /// Create a closed polygon.
    pub fn polygon(points: Vec<Point>) -> Self {
        Self::with_closed(points, true)
    }

    fn with_closed(points: Vec<Point>, closed: bool) -> Self {
        let mut shape = Self {
            id: Uuid::new_v4(),
            points,
            closed,
            transform: None,
            style: ShapeStyle::default(),
            cached_bounds: None,
        };
        shape.refresh_bounds();
        shape
    }

    fn compute_bounds(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let mut rect = Rect::new(first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            rect = Rect::new(
                rect.x0.min(p.x),
                rect.y0.min(p.y),
                rect.x1.max(p.x),
                rect.y1.max(p.y),
            );
        }
        Some(rect)
    }

    /// Recompute the cached bounding box from the current vertices.
    pub fn refresh_bounds(&mut self) {
        self.cached_bounds = self.compute_bounds();
    }

    /// The vertex at `index`.
    pub fn point_at(&self, index: usize) -> EditResult<Point> {
        self.points
            .get(index)
            .copied()
            .ok_or(EditError::InvalidPointIndex {
                index,
                count: self.points.len(),
            })
    }

    /// Replace the vertex at `index`.
    pub fn set_point_at(&mut self, index: usize, point: Point) -> EditResult<()> {
        let count = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(EditError::InvalidPointIndex { index, count })?;
        *slot = point;
        self.refresh_bounds();
        Ok(())
    }

    /// Vertex sequence including the implicit closing segment for polygons.
    fn outline(&self) -> Vec<Point> {
        let mut pts = self.points.clone();
        if self.closed {
            if let Some(first) = self.points.first() {
                pts.push(*first);
            }
        }
        pts
    }
}

impl ShapeBehavior for Polyline {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.cached_bounds
            .or_else(|| self.compute_bounds())
            .unwrap_or(Rect::ZERO)
    }

    fn set_location(&mut self, location: Point) {
        let delta = location - self.location();
        for p in &mut self.points {
            *p += delta;
        }
        self.refresh_bounds();
    }

    fn set_size(&mut self, size: Size) {
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
        for p in &mut self.points {
            p.x = origin.x + (p.x - origin.x) * sx;
            p.y = origin.y + (p.y - origin.y) * sy;
        }
        self.refresh_bounds();
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.points.len() < 2 {
            return false;
        }
        if self.closed && self.style.fill_color.is_some() && self.to_path().contains(point) {
            return true;
        }
        let dist = point_to_polyline_dist(point, &self.outline());
        dist <= tolerance + self.style.stroke_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };
        path.move_to(*first);
        for p in &self.points[1..] {
            path.line_to(*p);
        }
        if self.closed {
            path.close_path();
        }
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
