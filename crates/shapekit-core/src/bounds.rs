//! Containment of moves and resizes within the scene canvas.

use kurbo::{Point, Rect, Size, Vec2};

/// Union bounding box of a set of rectangles.
pub fn union_bounds(rects: &[Rect]) -> Option<Rect> {
    let mut iter = rects.iter();
    let first = *iter.next()?;
    Some(iter.fold(first, |acc, r| acc.union(*r)))
}

/// Whether a rectangle lies fully inside `[0,0]..container`.
pub fn fits(rect: Rect, container: Size) -> bool {
    rect.x0 >= 0.0 && rect.y0 >= 0.0 && rect.x1 <= container.width && rect.y1 <= container.height
}

/// Reduce a group translation delta so every member stays inside the canvas.
///
/// The union box of the group's current bounds is moved by the candidate
/// delta; each overflowing axis is shrunk by exactly the overflow amount, so
/// the union box's relevant edge lands on the container edge. The reduced
/// delta applies uniformly to every member, preserving relative layout.
pub fn clamp_group_delta(current: &[Rect], delta: Vec2, container: Size) -> Vec2 {
    let Some(union) = union_bounds(current) else {
        return delta;
    };
    let mut dx = delta.x;
    let mut dy = delta.y;

    if union.x0 + dx < 0.0 {
        dx = -union.x0;
    } else if union.x1 + dx > container.width {
        dx = container.width - union.x1;
    }
    if union.y0 + dy < 0.0 {
        dy = -union.y0;
    } else if union.y1 + dy > container.height {
        dy = container.height - union.y1;
    }
    Vec2::new(dx, dy)
}

/// Shrink a candidate size so the bottom/right edges stay inside the canvas.
pub fn clamp_resize(origin: Point, size: Size, container: Size) -> Size {
    Size::new(
        size.width.min(container.width - origin.x),
        size.height.min(container.height - origin.y),
    )
}

/// Clamp a point into `[0,0]..container` on each axis.
pub fn clamp_point(point: Point, container: Size) -> Point {
    Point::new(
        point.x.clamp(0.0, container.width),
        point.y.clamp(0.0, container.height),
    )
}
