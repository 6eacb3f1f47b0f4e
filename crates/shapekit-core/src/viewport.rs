//! Mapping between raw input-device coordinates and scene coordinates.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Converts raw pointer coordinates into scene space.
///
/// The viewport element may be displayed at a different size than its backing
/// surface (the host can scale the element independently), so conversion
/// corrects by the per-axis surface/view ratio before dividing by the render
/// scale. Scene coordinates are rounded to the nearest integer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Bounding rectangle of the interactive element, in raw device coordinates.
    pub bounds: Rect,
    /// Size of the backing surface in surface pixels.
    pub surface_size: Size,
    /// Current render scale (surface pixels per scene unit).
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
            surface_size: Size::new(800.0, 600.0),
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Create a viewport whose element and surface sizes agree.
    pub fn new(bounds: Rect, scale: f64) -> Self {
        Self {
            bounds,
            surface_size: bounds.size(),
            scale,
        }
    }

    /// Create a viewport with an independently sized backing surface.
    pub fn with_surface(bounds: Rect, surface_size: Size, scale: f64) -> Self {
        Self {
            bounds,
            surface_size,
            scale,
        }
    }

    /// Per-axis ratio between surface pixels and element pixels.
    fn surface_ratio(&self) -> (f64, f64) {
        let w = self.bounds.width().max(1.0);
        let h = self.bounds.height().max(1.0);
        (self.surface_size.width / w, self.surface_size.height / h)
    }

    /// Map a raw device point into scene space, rounded to the nearest integer.
    pub fn to_scene(&self, raw: Point) -> Point {
        let (rx, ry) = self.surface_ratio();
        Point::new(
            ((raw.x - self.bounds.x0) * rx / self.scale).round(),
            ((raw.y - self.bounds.y0) * ry / self.scale).round(),
        )
    }

    /// Map a scene point back into raw device space (unrounded).
    pub fn to_device(&self, scene: Point) -> Point {
        let (rx, ry) = self.surface_ratio();
        Point::new(
            scene.x * self.scale / rx + self.bounds.x0,
            scene.y * self.scale / ry + self.bounds.y0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping() {
        let viewport = Viewport::new(Rect::new(0.0, 0.0, 200.0, 200.0), 1.0);
        let scene = viewport.to_scene(Point::new(42.0, 17.0));
        assert!((scene.x - 42.0).abs() < f64::EPSILON);
        assert!((scene.y - 17.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_offset_and_scale() {
        let viewport = Viewport::new(Rect::new(10.0, 20.0, 210.0, 220.0), 2.0);
        let scene = viewport.to_scene(Point::new(110.0, 120.0));
        assert!((scene.x - 50.0).abs() < f64::EPSILON);
        assert!((scene.y - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scaled_element_ratio_correct() {
        // Element displayed at half the surface size on x only.
        let viewport = Viewport::with_surface(
            Rect::new(0.0, 0.0, 100.0, 200.0),
            Size::new(200.0, 200.0),
            1.0,
        );
        let scene = viewport.to_scene(Point::new(50.0, 50.0));
        assert!((scene.x - 100.0).abs() < f64::EPSILON);
        assert!((scene.y - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round_trip_within_rounding() {
        for scale in [0.25, 0.5, 1.0, 1.5, 3.0] {
            let viewport = Viewport::new(Rect::new(5.0, 5.0, 805.0, 605.0), scale);
            let original = Point::new(120.0, 84.0);
            let device = viewport.to_device(original);
            let back = viewport.to_scene(device);
            assert!((back.x - original.x).abs() <= 0.5, "scale {scale}");
            assert!((back.y - original.y).abs() <= 0.5, "scale {scale}");
        }
    }
}
