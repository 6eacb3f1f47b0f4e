//! Scene graph container and hit testing.

use crate::error::{EditError, EditResult};
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default hit tolerance in scene units.
pub const HIT_TOLERANCE: f64 = 4.0;

/// The shape container being edited.
///
/// Owns every shape, the z-order, and the canvas extent that bounds
/// interaction. Persistence of the scene is a host concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Canvas size; interaction is constrained to `[0,0]..size`.
    size: Size,
    /// All shapes, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
}

impl Scene {
    /// Create an empty scene with the given canvas size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            shapes: HashMap::new(),
            z_order: Vec::new(),
        }
    }

    /// Canvas size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Set the canvas size.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Add a shape on top of the z-order. Returns its ID.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    /// Remove a shape.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    /// Get a shape by ID.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Get a shape by ID, failing if absent.
    pub fn require(&self, id: ShapeId) -> EditResult<&Shape> {
        self.shapes.get(&id).ok_or(EditError::UnknownShape(id))
    }

    /// Get a mutable shape by ID, failing if absent.
    pub fn require_mut(&mut self, id: ShapeId) -> EditResult<&mut Shape> {
        self.shapes.get_mut(&id).ok_or(EditError::UnknownShape(id))
    }

    /// Shape IDs in z-order (back to front).
    pub fn ids(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the scene has no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Union bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for shape in self.shapes.values() {
            let bounds = shape.bounds();
            result = Some(match result {
                Some(r) => r.union(bounds),
                None => bounds,
            });
        }
        result
    }

    /// Map a scene-space point into a shape's local frame.
    fn to_local(shape: &Shape, point: Point) -> Point {
        match shape.transform() {
            Some(t) => t.inverse() * point,
            None => point,
        }
    }

    /// Topmost shape at a point, if any.
    pub fn shape_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.z_order.iter().rev().copied().find(|id| {
            self.shapes
                .get(id)
                .is_some_and(|s| s.hit_test(Self::to_local(s, point), tolerance))
        })
    }

    /// All shapes at a point, front to back.
    pub fn shapes_at(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .filter(|id| {
                self.shapes
                    .get(id)
                    .is_some_and(|s| s.hit_test(Self::to_local(s, point), tolerance))
            })
            .collect()
    }

    /// Shapes intersecting (or, when `contained` is set, fully inside) a region.
    pub fn shapes_in_region(&self, region: Rect, contained: bool) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .copied()
            .filter(|id| {
                self.shapes.get(id).is_some_and(|s| {
                    if contained {
                        s.contained_by_region(region)
                    } else {
                        s.intersects_region(region)
                    }
                })
            })
            .collect()
    }

    /// Bring a shape to the front (topmost). Returns true if it moved.
    pub fn move_to_front(&mut self, id: ShapeId) -> bool {
        let Some(pos) = self.z_order.iter().position(|&s| s == id) else {
            return false;
        };
        if pos == self.z_order.len() - 1 {
            return false;
        }
        self.z_order.remove(pos);
        self.z_order.push(id);
        true
    }

    /// Send a shape to the back (bottommost). Returns true if it moved.
    pub fn move_to_back(&mut self, id: ShapeId) -> bool {
        let Some(pos) = self.z_order.iter().position(|&s| s == id) else {
            return false;
        };
        if pos == 0 {
            return false;
        }
        self.z_order.remove(pos);
        self.z_order.insert(0, id);
        true
    }

    /// Swap a shape one step toward the front. Returns true if it moved.
    pub fn move_forward(&mut self, id: ShapeId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&s| s == id) {
            if pos < self.z_order.len() - 1 {
                self.z_order.swap(pos, pos + 1);
                return true;
            }
        }
        false
    }

    /// Swap a shape one step toward the back. Returns true if it moved.
    pub fn move_backward(&mut self, id: ShapeId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&s| s == id) {
            if pos > 0 {
                self.z_order.swap(pos, pos - 1);
                return true;
            }
        }
        false
    }
}
