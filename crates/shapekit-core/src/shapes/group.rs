//! Group (sub-model) shape.

use super::{Shape, ShapeBehavior, ShapeId, ShapeStyle};
use kurbo::{Affine, BezPath, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A container embedding a set of child shapes that move and resize as one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub(crate) id: ShapeId,
    /// Child shapes in z-order (back to front).
    pub children: Vec<Shape>,
    /// Optional 2D transform applied around the local frame.
    #[serde(default)]
    pub transform: Option<Affine>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Group {
    /// Create a group from child shapes.
    pub fn new(children: Vec<Shape>) -> Self {
        Self {
            id: Uuid::new_v4(),
            children,
            transform: None,
            style: ShapeStyle::default(),
        }
    }

    /// Dissolve the group into its children.
    pub fn ungroup(self) -> Vec<Shape> {
        self.children
    }
}

impl ShapeBehavior for Group {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let mut iter = self.children.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(first.bounds(), |acc, child| acc.union(child.bounds()))
    }

    fn set_location(&mut self, location: Point) {
        let delta = location - self.location();
        for child in &mut self.children {
            child.translate(delta);
        }
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
        for child in &mut self.children {
            let child_bounds = child.bounds();
            child.set_location(Point::new(
                origin.x + (child_bounds.x0 - origin.x) * sx,
                origin.y + (child_bounds.y0 - origin.y) * sy,
            ));
            child.set_size(Size::new(
                child_bounds.width() * sx,
                child_bounds.height() * sy,
            ));
        }
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.children.iter().any(|c| c.hit_test(point, tolerance))
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for child in &self.children {
            for el in child.to_path().elements() {
                path.push(*el);
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

#[cfg(test)]
mod tests {
    use super::super::Rectangle;
    use super::*;

    fn sample() -> Group {
        Group::new(vec![
            Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), Size::new(20.0, 20.0))),
            Shape::Rectangle(Rectangle::new(Point::new(50.0, 30.0), Size::new(10.0, 10.0))),
        ])
    }

    #[test]
    fn test_union_bounds() {
        let group = sample();
        assert_eq!(group.bounds(), Rect::new(10.0, 10.0, 60.0, 40.0));
    }

    #[test]
    fn test_move_translates_children() {
        let mut group = sample();
        group.set_location(Point::ZERO);
        assert_eq!(group.children[0].location(), Point::ZERO);
        assert_eq!(group.children[1].location(), Point::new(40.0, 20.0));
    }

    #[test]
    fn test_resize_scales_children() {
        let mut group = sample();
        group.set_size(Size::new(100.0, 60.0));
        // 2x on both axes about (10, 10).
        assert_eq!(group.children[1].location(), Point::new(90.0, 50.0));
        assert_eq!(group.children[1].size(), Size::new(20.0, 20.0));
        assert_eq!(group.bounds(), Rect::new(10.0, 10.0, 110.0, 70.0));
    }
}
