//! Text shape.

use super::{ShapeBehavior, ShapeId, ShapeStyle};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text block occupying a rectangular region.
///
/// Layout and glyph rendering belong to the external renderer; the engine
/// only manipulates the block's region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Occupied region size.
    pub size: Size,
    /// Text content.
    pub content: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Optional 2D transform applied around the local frame.
    #[serde(default)]
    pub transform: Option<Affine>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Text {
    /// Create a new text block.
    pub fn new(position: Point, size: Size, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            size,
            content: content.into(),
            font_size: 16.0,
            transform: None,
            style: ShapeStyle::default(),
        }
    }
}

impl ShapeBehavior for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    fn set_location(&mut self, location: Point) {
        self.position = location;
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.bounds().to_path(0.1)
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
