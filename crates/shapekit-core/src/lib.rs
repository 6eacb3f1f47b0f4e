//! ShapeKit Core Library
//!
//! Interactive manipulation engine for a 2D scene graph of geometric
//! shapes: pointer and keyboard input becomes selection changes, moves,
//! resizes, and per-point edits, with grid snapping, aspect locking,
//! minimum sizes, and containment within the scene canvas. Rendering,
//! persistence, and resource loading are host concerns reached through
//! narrow collaborator seams.

pub mod bounds;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod handles;
pub mod resize;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod tools;
pub mod viewport;

pub use config::EditorConfig;
pub use controller::{Key, Modifiers, MouseButton, SceneEditor};
pub use error::{EditError, EditResult};
pub use events::EditorEvent;
pub use handles::{
    BoxHandle, Corner, Cursor, Edge, Handle, HandleId, HandleMarker, TentativeGeometry,
};
pub use scene::Scene;
pub use selection::{SelectionSet, ToggleOutcome};
pub use shapes::{
    Ellipse, Group, Image, Line, Path, PathCommand, PointDepth, Polyline, Rectangle, Shape,
    ShapeId, ShapeStyle, Text,
};
pub use tools::{CreationTool, ResourceProvider};
pub use viewport::Viewport;
