//! Grid snapping helpers.

use kurbo::{Point, Vec2};

/// Quantize a coordinate to the nearest multiple of `spacing`.
pub fn snap_coord(value: f64, spacing: f64) -> f64 {
    (value / spacing).round() * spacing
}

/// Quantize both coordinates of a point to the grid.
pub fn snap_point(point: Point, spacing: f64) -> Point {
    Point::new(snap_coord(point.x, spacing), snap_coord(point.y, spacing))
}

/// Adjust a translation delta so that `origin + delta` lands on the grid.
///
/// Used for group moves: the anchor shape's origin snaps and every other
/// member keeps its relative offset.
pub fn snap_delta_for_origin(origin: Point, delta: Vec2, spacing: f64) -> Vec2 {
    let target = snap_point(origin + delta, spacing);
    target - origin
}
