//! Path shape built from drawing commands.

use super::{ShapeBehavior, ShapeId, ShapeStyle, point_to_polyline_dist};
use crate::error::{EditError, EditResult};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Samples per cubic segment when flattening for hit tests.
const CURVE_SAMPLES: usize = 16;

/// A single drawing command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    /// Start a new subpath at the given anchor.
    MoveTo(Point),
    /// Straight segment to the given anchor.
    LineTo(Point),
    /// Cubic Bézier segment with two control points and an end anchor.
    CurveTo { c1: Point, c2: Point, to: Point },
    /// Close the current subpath.
    Close,
}

impl PathCommand {
    /// The command's anchor point, if it has one.
    pub fn anchor(&self) -> Option<Point> {
        match self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
            PathCommand::CurveTo { to, .. } => Some(*to),
            PathCommand::Close => None,
        }
    }

    /// Number of addressable points at `depth`.
    fn point_count(&self, depth: super::PointDepth) -> usize {
        match (self, depth) {
            (PathCommand::Close, _) => 0,
            (PathCommand::CurveTo { .. }, super::PointDepth::Full) => 3,
            _ => 1,
        }
    }
}

/// An ordered command sequence mixing straight and cubic segments.
///
/// Points are addressed by a flat index at a [`super::PointDepth`]: `Simple`
/// counts one anchor per drawing command, `Full` interleaves each cubic's
/// control points in `c1, c2, to` order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    pub(crate) id: ShapeId,
    /// Drawing commands in order.
    pub commands: Vec<PathCommand>,
    /// Optional 2D transform applied around the local frame.
    #[serde(default)]
    pub transform: Option<Affine>,
    /// Style properties.
    pub style: ShapeStyle,
    /// Bounds cache, refreshed on every geometry mutation.
    #[serde(skip)]
    cached_bounds: Option<Rect>,
}

impl Path {
    /// Create a path from a command sequence.
    pub fn new(commands: Vec<PathCommand>) -> Self {
        let mut path = Self {
            id: Uuid::new_v4(),
            commands,
            transform: None,
            style: ShapeStyle::default(),
            cached_bounds: None,
        };
        path.refresh_bounds();
        path
    }

    /// Whether any command carries a point.
    pub fn has_points(&self) -> bool {
        self.commands
            .iter()
            .any(|c| !matches!(c, PathCommand::Close))
    }

    /// All points at `depth`, in flat-index order.
    pub fn points(&self, depth: super::PointDepth) -> Vec<Point> {
        let mut pts = Vec::new();
        for cmd in &self.commands {
            match (cmd, depth) {
                (PathCommand::CurveTo { c1, c2, to }, super::PointDepth::Full) => {
                    pts.extend([*c1, *c2, *to]);
                }
                _ => pts.extend(cmd.anchor()),
            }
        }
        pts
    }

    /// Number of addressable points at `depth`.
    pub fn point_count(&self, depth: super::PointDepth) -> usize {
        self.commands.iter().map(|c| c.point_count(depth)).sum()
    }

    /// The point at flat `index`, addressed at `depth`.
    pub fn point_at(&self, index: usize, depth: super::PointDepth) -> EditResult<Point> {
        self.points(depth)
            .get(index)
            .copied()
            .ok_or(EditError::InvalidPointIndex {
                index,
                count: self.point_count(depth),
            })
    }

    /// Replace the point at flat `index`, addressed at `depth`.
    pub fn set_point_at(
        &mut self,
        index: usize,
        depth: super::PointDepth,
        point: Point,
    ) -> EditResult<()> {
        let mut cursor = 0;
        for cmd in &mut self.commands {
            let count = cmd.point_count(depth);
            if index < cursor + count {
                let slot = index - cursor;
                match cmd {
                    PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p = point,
                    PathCommand::CurveTo { c1, c2, to } => match (depth, slot) {
                        (super::PointDepth::Simple, _) => *to = point,
                        (super::PointDepth::Full, 0) => *c1 = point,
                        (super::PointDepth::Full, 1) => *c2 = point,
                        (super::PointDepth::Full, _) => *to = point,
                    },
                    PathCommand::Close => unreachable!("close has no points"),
                }
                self.refresh_bounds();
                return Ok(());
            }
            cursor += count;
        }
        Err(EditError::InvalidPointIndex {
            index,
            count: cursor,
        })
    }

    fn compute_bounds(&self) -> Option<Rect> {
        // Control-point hull: conservative but stable under point edits.
        let pts = self.points(super::PointDepth::Full);
        let first = pts.first()?;
        let mut rect = Rect::new(first.x, first.y, first.x, first.y);
        for p in &pts[1..] {
            rect = Rect::new(
                rect.x0.min(p.x),
                rect.y0.min(p.y),
                rect.x1.max(p.x),
                rect.y1.max(p.y),
            );
        }
        Some(rect)
    }

    /// Recompute the cached bounding box from the current commands.
    pub fn refresh_bounds(&mut self) {
        self.cached_bounds = self.compute_bounds();
    }

    /// Flatten each subpath into a sampled point sequence for hit testing.
    fn sampled_subpaths(&self) -> Vec<Vec<Point>> {
        let mut subpaths: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        let mut subpath_start = Point::ZERO;

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    if current.len() > 1 {
                        subpaths.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                    subpath_start = p;
                    current.push(p);
                }
                PathCommand::LineTo(p) => current.push(p),
                PathCommand::CurveTo { c1, c2, to } => {
                    let from = current.last().copied().unwrap_or(to);
                    for i in 1..=CURVE_SAMPLES {
                        let t = i as f64 / CURVE_SAMPLES as f64;
                        current.push(cubic_point(from, c1, c2, to, t));
                    }
                }
                PathCommand::Close => current.push(subpath_start),
            }
        }
        if current.len() > 1 {
            subpaths.push(current);
        }
        subpaths
    }
}

/// Evaluate a cubic Bézier at parameter `t`.
fn cubic_point(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Point::new(
        a * p0.x + b * c1.x + c * c2.x + d * p3.x,
        a * p0.y + b * c1.y + c * c2.y + d * p3.y,
    )
}

impl ShapeBehavior for Path {
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
        for cmd in &mut self.commands {
            match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p += delta,
                PathCommand::CurveTo { c1, c2, to } => {
                    *c1 += delta;
                    *c2 += delta;
                    *to += delta;
                }
                PathCommand::Close => {}
            }
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
        let scale = |p: &mut Point| {
            p.x = origin.x + (p.x - origin.x) * sx;
            p.y = origin.y + (p.y - origin.y) * sy;
        };
        for cmd in &mut self.commands {
            match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => scale(p),
                PathCommand::CurveTo { c1, c2, to } => {
                    scale(c1);
                    scale(c2);
                    scale(to);
                }
                PathCommand::Close => {}
            }
        }
        self.refresh_bounds();
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.style.fill_color.is_some() && self.to_path().contains(point) {
            return true;
        }
        let reach = tolerance + self.style.stroke_width / 2.0;
        self.sampled_subpaths()
            .iter()
            .any(|pts| point_to_polyline_dist(point, pts) <= reach)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => path.move_to(p),
                PathCommand::LineTo(p) => path.line_to(p),
                PathCommand::CurveTo { c1, c2, to } => path.curve_to(c1, c2, to),
                PathCommand::Close => path.close_path(),
            }
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
