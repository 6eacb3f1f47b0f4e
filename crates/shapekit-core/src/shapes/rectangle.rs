//! Rectangle shape.

use super::{ShapeBehavior, ShapeId, ShapeStyle};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle defined by its origin and size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width and height.
    pub size: Size,
    /// Optional 2D transform applied around the local frame.
    #[serde(default)]
    pub transform: Option<Affine>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            size,
            transform: None,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let origin = Point::new(p1.x.min(p2.x), p1.y.min(p2.y));
        let size = Size::new((p2.x - p1.x).abs(), (p2.y - p1.y).abs());
        Self::new(origin, size)
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

impl ShapeBehavior for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn set_location(&mut self, location: Point) {
        self.position = location;
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect();
        if self.style.fill_color.is_some() {
            // Filled: hit anywhere inside
            rect.inflate(tolerance, tolerance).contains(point)
        } else {
            // Outline only: hit on the border
            let reach = tolerance + self.style.stroke_width / 2.0;
            let outer = rect.inflate(reach, reach);
            let inner = rect.inflate(-reach, -reach);
            outer.contains(point) && !inner.contains(point)
        }
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), Size::new(100.0, 50.0));
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.size.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.size.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_corners() {
        let rect = Rectangle::from_corners(Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert!((rect.position.x - 50.0).abs() < f64::EPSILON);
        assert!((rect.size.width - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let mut rect = Rectangle::new(Point::ZERO, Size::new(100.0, 100.0));
        rect.style.fill_color = Some(super::super::SerializableColor::black());
        assert!(rect.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!rect.hit_test(Point::new(150.0, 50.0), 0.0));
        assert!(rect.hit_test(Point::new(105.0, 50.0), 10.0));
    }

    #[test]
    fn test_outline_hit_test() {
        let rect = Rectangle::new(Point::ZERO, Size::new(100.0, 100.0));
        assert!(rect.hit_test(Point::new(0.0, 50.0), 2.0));
        assert!(!rect.hit_test(Point::new(50.0, 50.0), 2.0));
    }

    #[test]
    fn test_set_location_and_size() {
        let mut rect = Rectangle::new(Point::ZERO, Size::new(10.0, 10.0));
        rect.set_location(Point::new(5.0, 6.0));
        rect.set_size(Size::new(20.0, 30.0));
        assert_eq!(rect.bounds(), Rect::new(5.0, 6.0, 25.0, 36.0));
    }
}
