//! Manipulation handle geometry.
//!
//! Handles are transient value objects recomputed from the current shape
//! geometry (plus any tentative gesture state) on every interaction frame.
//! Positions are produced in the shape's local frame; hit testing maps the
//! query point through the shape's inverse transform, and
//! [`project_handles`] maps positions out for display.

use crate::shapes::{PointDepth, Shape, PathCommand};
use kurbo::{Point, Rect, Size};

/// Handle extent in scene units at scale 1.0.
pub const HANDLE_SIZE: f64 = 8.0;

/// Corner positions, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

/// Edge midpoint positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// One of the eight resize-box handle roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxHandle {
    Corner(Corner),
    Edge(Edge),
}

impl BoxHandle {
    /// All eight roles in display order, clockwise from top-left.
    pub const ALL: [BoxHandle; 8] = [
        BoxHandle::Corner(Corner::TopLeft),
        BoxHandle::Edge(Edge::Top),
        BoxHandle::Corner(Corner::TopRight),
        BoxHandle::Edge(Edge::Right),
        BoxHandle::Corner(Corner::BottomRight),
        BoxHandle::Edge(Edge::Bottom),
        BoxHandle::Corner(Corner::BottomLeft),
        BoxHandle::Edge(Edge::Left),
    ];

    /// The handle's position on a bounding box.
    pub fn position(&self, bounds: Rect) -> Point {
        let center = bounds.center();
        match self {
            BoxHandle::Corner(Corner::TopLeft) => Point::new(bounds.x0, bounds.y0),
            BoxHandle::Corner(Corner::TopRight) => Point::new(bounds.x1, bounds.y0),
            BoxHandle::Corner(Corner::BottomRight) => Point::new(bounds.x1, bounds.y1),
            BoxHandle::Corner(Corner::BottomLeft) => Point::new(bounds.x0, bounds.y1),
            BoxHandle::Edge(Edge::Top) => Point::new(center.x, bounds.y0),
            BoxHandle::Edge(Edge::Right) => Point::new(bounds.x1, center.y),
            BoxHandle::Edge(Edge::Bottom) => Point::new(center.x, bounds.y1),
            BoxHandle::Edge(Edge::Left) => Point::new(bounds.x0, center.y),
        }
    }

    /// CSS-style resize cursor for this role.
    pub fn cursor(&self) -> Cursor {
        match self {
            BoxHandle::Corner(Corner::TopLeft) => Cursor::NwResize,
            BoxHandle::Corner(Corner::TopRight) => Cursor::NeResize,
            BoxHandle::Corner(Corner::BottomRight) => Cursor::SeResize,
            BoxHandle::Corner(Corner::BottomLeft) => Cursor::SwResize,
            BoxHandle::Edge(Edge::Top) => Cursor::NResize,
            BoxHandle::Edge(Edge::Right) => Cursor::EResize,
            BoxHandle::Edge(Edge::Bottom) => Cursor::SResize,
            BoxHandle::Edge(Edge::Left) => Cursor::WResize,
        }
    }
}

/// Handle identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleId {
    /// Resize-box corner or edge handle.
    Box(BoxHandle),
    /// Vertex or path anchor, indexed at the active point depth.
    Point(usize),
    /// Bézier control point, indexed at full depth. Only present when
    /// exactly one path is selected.
    Control(usize),
}

/// Pointer cursor hint carried by a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    NwResize,
    NResize,
    NeResize,
    EResize,
    SeResize,
    SResize,
    SwResize,
    WResize,
    Move,
    Pointer,
    #[default]
    Default,
}

impl Cursor {
    /// CSS cursor keyword for this hint.
    pub fn as_css(&self) -> &'static str {
        match self {
            Cursor::NwResize => "nw-resize",
            Cursor::NResize => "n-resize",
            Cursor::NeResize => "ne-resize",
            Cursor::EResize => "e-resize",
            Cursor::SeResize => "se-resize",
            Cursor::SResize => "s-resize",
            Cursor::SwResize => "sw-resize",
            Cursor::WResize => "w-resize",
            Cursor::Move => "move",
            Cursor::Pointer => "pointer",
            Cursor::Default => "default",
        }
    }
}

/// Visual marker of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleMarker {
    /// Square handle (box handles, vertices, anchors).
    #[default]
    Square,
    /// Circular handle (line endpoints, Bézier control points).
    Circle,
}

/// A transient manipulation handle.
#[derive(Debug, Clone)]
pub struct Handle {
    /// Handle identity, determining its movement behavior.
    pub id: HandleId,
    /// Position in the shape's local frame.
    pub position: Point,
    /// Pointer cursor hint.
    pub cursor: Cursor,
    /// Visual marker.
    pub marker: HandleMarker,
    /// Indices of related handles in the same list, for guide lines.
    pub connected: Vec<usize>,
}

impl Handle {
    fn new(id: HandleId, position: Point, cursor: Cursor) -> Self {
        Self {
            id,
            position,
            cursor,
            marker: HandleMarker::default(),
            connected: Vec::new(),
        }
    }

    fn with_marker(mut self, marker: HandleMarker) -> Self {
        self.marker = marker;
        self
    }

    fn connected_to(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.connected.extend(indices);
        self
    }
}

/// Uncommitted gesture state overlaid on a shape's authoritative geometry
/// when computing handle positions.
#[derive(Debug, Clone, Default)]
pub struct TentativeGeometry {
    /// Pending move target, if a move is in progress.
    pub location: Option<Point>,
    /// Pending resize target, if a resize is in progress.
    pub size: Option<Size>,
    /// Pending point edit: (index at the active depth, position).
    pub moving_point: Option<(usize, Point)>,
}

impl TentativeGeometry {
    /// Bounding box with the pending move/resize applied.
    pub fn apply_to(&self, bounds: Rect) -> Rect {
        let origin = self.location.unwrap_or_else(|| bounds.origin());
        let size = self.size.unwrap_or_else(|| bounds.size());
        Rect::from_origin_size(origin, size)
    }

    /// The pending position for a point index, if one is being dragged.
    fn point_override(&self, index: usize) -> Option<Point> {
        match self.moving_point {
            Some((i, p)) if i == index => Some(p),
            _ => None,
        }
    }
}

/// Compute the ordered handle list for a shape.
///
/// `editing` is the shape's point-edit mode; `depth` is the active point
/// depth (Full only when exactly one path is selected). Positions are in the
/// shape's local frame and reflect `tentative` gesture state.
pub fn handles_for(
    shape: &Shape,
    editing: bool,
    depth: PointDepth,
    tentative: &TentativeGeometry,
) -> Vec<Handle> {
    match shape {
        // Lines always expose their endpoints; there is no resize box.
        Shape::Line(line) => {
            let start = tentative.point_override(0).unwrap_or(line.start);
            let end = tentative.point_override(1).unwrap_or(line.end);
            vec![
                Handle::new(HandleId::Point(0), start, Cursor::Move)
                    .with_marker(HandleMarker::Circle),
                Handle::new(HandleId::Point(1), end, Cursor::Move)
                    .with_marker(HandleMarker::Circle)
                    .connected_to([0]),
            ]
        }
        Shape::Polyline(poly) if editing => {
            let count = poly.points.len();
            poly.points
                .iter()
                .enumerate()
                .map(|(i, &p)| {
                    let pos = tentative.point_override(i).unwrap_or(p);
                    let mut handle = Handle::new(HandleId::Point(i), pos, Cursor::Move);
                    if i > 0 {
                        handle.connected.push(i - 1);
                    }
                    // Closed loop: the last vertex links back to the first.
                    if poly.closed && count > 2 && i == count - 1 {
                        handle.connected.push(0);
                    }
                    handle
                })
                .collect()
        }
        Shape::Path(path) if editing => path_handles(path, depth, tentative),
        _ => box_handles(tentative.apply_to(shape.bounds())),
    }
}

/// The eight resize handles for a bounding box. Top-left and bottom-right
/// are mutually connected for guide-line rendering.
fn box_handles(bounds: Rect) -> Vec<Handle> {
    BoxHandle::ALL
        .iter()
        .map(|role| {
            let handle = Handle::new(HandleId::Box(*role), role.position(bounds), role.cursor());
            match role {
                BoxHandle::Corner(Corner::TopLeft) => handle.connected_to([4]),
                BoxHandle::Corner(Corner::BottomRight) => handle.connected_to([0]),
                _ => handle,
            }
        })
        .collect()
}

/// Handles for a path in point-edit mode: one per command anchor, plus the
/// cubic control points at full depth, each linked to its anchor.
fn path_handles(
    path: &crate::shapes::Path,
    depth: PointDepth,
    tentative: &TentativeGeometry,
) -> Vec<Handle> {
    let mut handles: Vec<Handle> = Vec::new();
    let mut prev_anchor: Option<usize> = None;
    let mut index = 0;

    for cmd in &path.commands {
        match *cmd {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => {
                let pos = tentative.point_override(index).unwrap_or(p);
                handles.push(Handle::new(HandleId::Point(index), pos, Cursor::Move));
                prev_anchor = Some(handles.len() - 1);
                index += 1;
            }
            PathCommand::CurveTo { c1, c2, to } => match depth {
                PointDepth::Simple => {
                    let pos = tentative.point_override(index).unwrap_or(to);
                    handles.push(Handle::new(HandleId::Point(index), pos, Cursor::Move));
                    prev_anchor = Some(handles.len() - 1);
                    index += 1;
                }
                PointDepth::Full => {
                    let anchor_pos = tentative.point_override(index + 2).unwrap_or(to);
                    handles.push(Handle::new(
                        HandleId::Point(index + 2),
                        anchor_pos,
                        Cursor::Move,
                    ));
                    let anchor_idx = handles.len() - 1;

                    let c1_pos = tentative.point_override(index).unwrap_or(c1);
                    let c1_handle = Handle::new(HandleId::Control(index), c1_pos, Cursor::Pointer)
                        .with_marker(HandleMarker::Circle)
                        .connected_to(prev_anchor);
                    handles.push(c1_handle);

                    let c2_pos = tentative.point_override(index + 1).unwrap_or(c2);
                    let c2_handle =
                        Handle::new(HandleId::Control(index + 1), c2_pos, Cursor::Pointer)
                            .with_marker(HandleMarker::Circle)
                            .connected_to([anchor_idx]);
                    handles.push(c2_handle);

                    prev_anchor = Some(anchor_idx);
                    index += 3;
                }
            },
            PathCommand::Close => {}
        }
    }
    handles
}

/// Map handle positions through the shape's transform for display.
pub fn project_handles(shape: &Shape, handles: &[Handle]) -> Vec<Handle> {
    let Some(transform) = shape.transform() else {
        return handles.to_vec();
    };
    handles
        .iter()
        .map(|h| {
            let mut mapped = h.clone();
            mapped.position = transform * h.position;
            mapped
        })
        .collect()
}

/// Find the handle hit by a scene-space point.
///
/// When the shape carries a transform, the query point is projected through
/// the inverse transform and tested against axis-aligned handle rectangles
/// in the local frame. Edge handles get a secondary "bar" test spanning the
/// whole edge of `bounds` (the local-frame box the handles were built from).
pub fn hit_test_handles(
    shape: &Shape,
    handles: &[Handle],
    bounds: Rect,
    point: Point,
    half_extent: f64,
) -> Option<HandleId> {
    let local = match shape.transform() {
        Some(t) => t.inverse() * point,
        None => point,
    };

    for handle in handles {
        let rect = Rect::new(
            handle.position.x - half_extent,
            handle.position.y - half_extent,
            handle.position.x + half_extent,
            handle.position.y + half_extent,
        );
        if rect.contains(local) {
            return Some(handle.id);
        }
    }

    // Secondary pass: edge bars.
    for handle in handles {
        if let HandleId::Box(BoxHandle::Edge(edge)) = handle.id {
            if edge_bar(edge, bounds, half_extent).contains(local) {
                return Some(handle.id);
            }
        }
    }
    None
}

/// Thin region along one edge of a box, corners excluded.
fn edge_bar(edge: Edge, bounds: Rect, half_extent: f64) -> Rect {
    match edge {
        Edge::Top => Rect::new(
            bounds.x0 + half_extent,
            bounds.y0 - half_extent,
            bounds.x1 - half_extent,
            bounds.y0 + half_extent,
        ),
        Edge::Bottom => Rect::new(
            bounds.x0 + half_extent,
            bounds.y1 - half_extent,
            bounds.x1 - half_extent,
            bounds.y1 + half_extent,
        ),
        Edge::Left => Rect::new(
            bounds.x0 - half_extent,
            bounds.y0 + half_extent,
            bounds.x0 + half_extent,
            bounds.y1 - half_extent,
        ),
        Edge::Right => Rect::new(
            bounds.x1 - half_extent,
            bounds.y0 + half_extent,
            bounds.x1 + half_extent,
            bounds.y1 - half_extent,
        ),
    }
}
