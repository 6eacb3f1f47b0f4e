//! Ellipse shape.

use super::{ShapeBehavior, ShapeId, ShapeStyle};
use kurbo::{Affine, BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ellipse defined by center and radii.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    /// Center point.
    pub center: Point,
    /// Horizontal radius.
    pub radius_x: f64,
    /// Vertical radius.
    pub radius_y: f64,
    /// Optional 2D transform applied around the local frame.
    #[serde(default)]
    pub transform: Option<Affine>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius_x,
            radius_y,
            transform: None,
            style: ShapeStyle::default(),
        }
    }

    /// Create a circle.
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(center, radius, radius)
    }

    /// Create an ellipse inscribed in a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.center(), rect.width() / 2.0, rect.height() / 2.0)
    }

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center, (self.radius_x, self.radius_y), 0.0)
    }
}

impl ShapeBehavior for Ellipse {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius_x,
            self.center.y - self.radius_y,
            self.center.x + self.radius_x,
            self.center.y + self.radius_y,
        )
    }

    fn set_location(&mut self, location: Point) {
        self.center = location + Vec2::new(self.radius_x, self.radius_y);
    }

    fn set_size(&mut self, size: Size) {
        let origin = self.location();
        self.radius_x = size.width / 2.0;
        self.radius_y = size.height / 2.0;
        self.center = origin + Vec2::new(self.radius_x, self.radius_y);
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let half_sw = self.style.stroke_width / 2.0;
        let dx = (point.x - self.center.x) / (self.radius_x + tolerance + half_sw);
        let dy = (point.y - self.center.y) / (self.radius_y + tolerance + half_sw);
        if dx * dx + dy * dy > 1.0 {
            return false;
        }
        if self.style.fill_color.is_some() {
            return true;
        }
        // Outline only: reject if inside the inner ellipse
        let inner_rx = (self.radius_x - tolerance - half_sw).max(0.0);
        let inner_ry = (self.radius_y - tolerance - half_sw).max(0.0);
        if inner_rx < f64::EPSILON || inner_ry < f64::EPSILON {
            return true;
        }
        let dxi = (point.x - self.center.x) / inner_rx;
        let dyi = (point.y - self.center.y) / inner_ry;
        dxi * dxi + dyi * dyi > 1.0
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
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
