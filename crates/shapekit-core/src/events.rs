//! Change notifications emitted by the editor.

use crate::shapes::ShapeId;
use kurbo::{Point, Rect, Size};
use std::collections::VecDeque;

/// Notification payloads published by the editor controller.
///
/// Hosts drain these from [`crate::SceneEditor::drain_events`] after each
/// dispatched input event. The enum is closed: every notification the engine
/// can raise is a variant here, so hosts match exhaustively instead of
/// registering per-event listener lists.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The selection set changed; carries the new selection count.
    SelectionChanged { count: usize },
    /// A shape entered the selection (per-shape component hook).
    ShapeSelected(ShapeId),
    /// A shape left the selection (per-shape component hook).
    ShapeDeselected(ShapeId),
    /// A shape was added to the scene.
    ElementAdded(ShapeId),
    /// A shape was removed from the scene.
    ElementRemoved(ShapeId),
    /// A move gesture updated a shape's tentative location.
    ElementMoving { id: ShapeId, location: Point },
    /// A committed move; `location` is the shape's new authoritative origin.
    ElementMoved { id: ShapeId, location: Point },
    /// A resize gesture updated a shape's tentative size.
    ElementSizing { id: ShapeId, size: Size },
    /// A committed resize; `size` is the shape's new authoritative size.
    ElementSized { id: ShapeId, size: Size },
    /// A non-selecting rubber band completed; creation tools consume the region.
    ElementCreated { region: Rect },
    /// The scene's z-order changed.
    ElementsReordered,
    /// The scene's dirty flag transitioned.
    DirtyChanged(bool),
}

/// FIFO queue of pending notifications.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    events: VecDeque<EditorEvent>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: EditorEvent) {
        self.events.push_back(event);
    }

    pub(crate) fn drain(&mut self) -> Vec<EditorEvent> {
        self.events.drain(..).collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_order() {
        let mut queue = EventQueue::default();
        queue.push(EditorEvent::SelectionChanged { count: 1 });
        queue.push(EditorEvent::ElementsReordered);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], EditorEvent::SelectionChanged { count: 1 });
        assert_eq!(drained[1], EditorEvent::ElementsReordered);
        assert!(queue.is_empty());
    }
}
