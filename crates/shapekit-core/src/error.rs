//! Error taxonomy for the manipulation engine.

use crate::shapes::ShapeId;
use thiserror::Error;

/// Engine errors.
///
/// These are invariant violations: programmer or integration mistakes that
/// abort the current operation. Soft preconditions (no scene attached on a
/// pointer event, a resize below the minimum size) are not errors; the
/// affected handler returns early instead.
#[derive(Debug, Error)]
pub enum EditError {
    /// The shape has no defined bounding region (e.g. an empty point container).
    #[error("bounds undefined for shape {0}")]
    BoundsUndefined(ShapeId),
    /// A point index outside the shape's point list at the requested depth.
    #[error("invalid point index {index} (shape has {count} points)")]
    InvalidPointIndex { index: usize, count: usize },
    /// The shape does not expose addressable points.
    #[error("shape {0} has no addressable points")]
    PointsUnsupported(ShapeId),
    /// The shape is not present in the scene.
    #[error("shape {0} not found in scene")]
    UnknownShape(ShapeId),
    /// An operation that requires a scene was invoked without one attached.
    #[error("no scene attached")]
    NoScene,
    /// Resource preparation for a shape failed; nothing was committed.
    #[error("resource preparation failed: {0}")]
    Resource(String),
}

/// Result type for engine operations.
pub type EditResult<T> = Result<T, EditError>;
