//! Collaborator seams: creation tools and resource preparation.

use crate::error::EditResult;
use crate::shapes::Shape;
use kurbo::Point;

/// A shape-creation tool that owns pointer gestures while installed.
///
/// The controller delegates pointer down/move/up to the active tool and
/// inserts whatever shape `finish` produces. A right-button press cancels an
/// in-progress creation.
pub trait CreationTool {
    /// Start a creation gesture at a scene point.
    fn begin(&mut self, point: Point);

    /// Update the gesture with the current scene point.
    fn update(&mut self, point: Point);

    /// End the gesture, returning the created shape if any.
    fn finish(&mut self, point: Point) -> Option<Shape>;

    /// Abandon the gesture without creating anything.
    fn cancel(&mut self);

    /// Whether a creation gesture is currently in progress.
    fn in_progress(&self) -> bool;
}

/// Prepares external resources (images, embedded models) before a shape is
/// inserted. Loading is the host's concern; the engine only waits for the
/// outcome and commits nothing on failure.
pub trait ResourceProvider {
    /// Prepare resources for `shape`, reporting the outcome through `done`.
    fn prepare(&mut self, shape: &Shape, done: Box<dyn FnOnce(EditResult<()>) + '_>);
}
