//! Shape definitions for the scene graph.

mod ellipse;
mod group;
mod image;
mod line;
mod path;
mod polyline;
mod rectangle;
mod text;

pub use ellipse::Ellipse;
pub use group::Group;
pub use image::Image;
pub use line::Line;
pub use path::{Path, PathCommand};
pub use polyline::Polyline;
pub use rectangle::Rectangle;
pub use text::Text;

use crate::error::{EditError, EditResult};
use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
        }
    }
}

impl ShapeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }
}

/// Addressing depth for a shape's editable points.
///
/// `Simple` exposes only top-level anchor points and is used whenever more
/// than one shape is selected. `Full` additionally exposes Bézier control
/// points and requires exactly one selected path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointDepth {
    #[default]
    Simple,
    Full,
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Common surface shared by every shape variant.
///
/// Coordinates are in the shape's local frame; a shape's optional transform
/// is applied by callers (hit testing inverse-maps the query point first).
pub trait ShapeBehavior {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in local coordinates.
    fn bounds(&self) -> Rect;

    /// Bounding-box origin.
    fn location(&self) -> Point {
        self.bounds().origin()
    }

    /// Move the shape so its bounding-box origin lands at `location`.
    fn set_location(&mut self, location: Point);

    /// Bounding-box size.
    fn size(&self) -> Size {
        self.bounds().size()
    }

    /// Resize the shape, keeping its bounding-box origin fixed.
    fn set_size(&mut self, size: Size);

    /// Check if a local-frame point hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the active 2D transform, if any.
    fn transform(&self) -> Option<Affine>;

    /// Set or clear the 2D transform.
    fn set_transform(&mut self, transform: Option<Affine>);

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;
}

/// Closed enum over all shape variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Polyline(Polyline),
    Path(Path),
    Text(Text),
    Image(Image),
    Group(Group),
}

impl Shape {
    fn behavior(&self) -> &dyn ShapeBehavior {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Line(s) => s,
            Shape::Polyline(s) => s,
            Shape::Path(s) => s,
            Shape::Text(s) => s,
            Shape::Image(s) => s,
            Shape::Group(s) => s,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn ShapeBehavior {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Line(s) => s,
            Shape::Polyline(s) => s,
            Shape::Path(s) => s,
            Shape::Text(s) => s,
            Shape::Image(s) => s,
            Shape::Group(s) => s,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.behavior().id()
    }

    pub fn bounds(&self) -> Rect {
        self.behavior().bounds()
    }

    /// Bounding box, failing on shapes with no defined bounds.
    pub fn try_bounds(&self) -> EditResult<Rect> {
        let defined = match self {
            Shape::Polyline(s) => !s.points.is_empty(),
            Shape::Path(s) => s.has_points(),
            Shape::Group(s) => !s.children.is_empty(),
            _ => true,
        };
        if defined {
            Ok(self.bounds())
        } else {
            Err(EditError::BoundsUndefined(self.id()))
        }
    }

    pub fn location(&self) -> Point {
        self.behavior().location()
    }

    pub fn set_location(&mut self, location: Point) {
        self.behavior_mut().set_location(location);
    }

    pub fn size(&self) -> Size {
        self.behavior().size()
    }

    pub fn set_size(&mut self, size: Size) {
        self.behavior_mut().set_size(size);
    }

    /// Translate the shape by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        let location = self.location();
        self.set_location(location + delta);
    }

    /// Check if a local-frame point hits this shape.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.behavior().hit_test(point, tolerance)
    }

    pub fn to_path(&self) -> BezPath {
        self.behavior().to_path()
    }

    pub fn transform(&self) -> Option<Affine> {
        self.behavior().transform()
    }

    pub fn set_transform(&mut self, transform: Option<Affine>) {
        self.behavior_mut().set_transform(transform);
    }

    pub fn style(&self) -> &ShapeStyle {
        self.behavior().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.behavior_mut().style_mut()
    }

    /// Regenerate the shape's ID (for duplication/paste).
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Rectangle(s) => s.id = new_id,
            Shape::Ellipse(s) => s.id = new_id,
            Shape::Line(s) => s.id = new_id,
            Shape::Polyline(s) => s.id = new_id,
            Shape::Path(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
            Shape::Image(s) => s.id = new_id,
            Shape::Group(s) => s.id = new_id,
        }
    }

    // Capability predicates.

    pub fn is_movable(&self) -> bool {
        true
    }

    /// Whether the shape exposes the 8-handle resize box.
    pub fn is_resizable(&self) -> bool {
        !matches!(self, Shape::Line(_))
    }

    pub fn is_nudgeable(&self) -> bool {
        true
    }

    /// Whether the shape can enter point-edit mode. Lines always expose
    /// their endpoint handles and so always count as point-editable.
    pub fn is_point_editable(&self) -> bool {
        matches!(self, Shape::Line(_) | Shape::Polyline(_) | Shape::Path(_))
    }

    pub fn is_point_movable(&self) -> bool {
        self.is_point_editable()
    }

    /// Whether inserting this shape requires resource preparation first.
    pub fn needs_resources(&self) -> bool {
        matches!(self, Shape::Image(_) | Shape::Group(_))
    }

    // Point access at a given depth.

    /// Number of addressable points at `depth` (0 for box shapes).
    pub fn point_count(&self, depth: PointDepth) -> usize {
        match self {
            Shape::Line(_) => 2,
            Shape::Polyline(s) => s.points.len(),
            Shape::Path(s) => s.point_count(depth),
            _ => 0,
        }
    }

    /// The point at `index`, addressed at `depth`.
    pub fn point_at(&self, index: usize, depth: PointDepth) -> EditResult<Point> {
        match self {
            Shape::Line(s) => s.point_at(index),
            Shape::Polyline(s) => s.point_at(index),
            Shape::Path(s) => s.point_at(index, depth),
            _ => Err(EditError::PointsUnsupported(self.id())),
        }
    }

    /// Replace the point at `index`, addressed at `depth`. Refreshes any
    /// cached bounds held by the shape.
    pub fn set_point_at(&mut self, index: usize, depth: PointDepth, point: Point) -> EditResult<()> {
        match self {
            Shape::Line(s) => s.set_point_at(index, point),
            Shape::Polyline(s) => s.set_point_at(index, point),
            Shape::Path(s) => s.set_point_at(index, depth, point),
            _ => Err(EditError::PointsUnsupported(self.id())),
        }
    }

    /// Test if this shape's bounds intersect a region.
    pub fn intersects_region(&self, region: Rect) -> bool {
        region.intersect(self.bounds()).area() > 0.0
    }

    /// Test if this shape's bounds are fully contained by a region.
    pub fn contained_by_region(&self, region: Rect) -> bool {
        let b = self.bounds();
        b.x0 >= region.x0 && b.y0 >= region.y0 && b.x1 <= region.x1 && b.y1 <= region.y1
    }
}
