//! Image shape.

use super::{ShapeBehavior, ShapeId, ShapeStyle};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A placed image. Pixel data is loaded by the external resource manager;
/// the engine tracks only the placement region and the source identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Displayed size.
    pub size: Size,
    /// Resource identifier resolved by the host's resource manager.
    pub source: String,
    /// Natural pixel size of the source.
    pub source_size: Size,
    /// Optional 2D transform applied around the local frame.
    #[serde(default)]
    pub transform: Option<Affine>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Image {
    /// Create a new image placement.
    pub fn new(position: Point, size: Size, source: impl Into<String>, source_size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            size,
            source: source.into(),
            source_size,
            transform: None,
            style: ShapeStyle::default(),
        }
    }

    /// Natural width/height ratio of the source.
    pub fn natural_aspect(&self) -> f64 {
        if self.source_size.height > f64::EPSILON {
            self.source_size.width / self.source_size.height
        } else {
            1.0
        }
    }
}

impl ShapeBehavior for Image {
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
