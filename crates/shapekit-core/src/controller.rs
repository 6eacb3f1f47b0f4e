//! The manipulation state machine.
//!
//! Dispatches pointer and keyboard events into selection changes, moves,
//! resizes, point edits, rubber-band selection, or delegation to an active
//! creation tool. Tentative geometry lives in per-gesture maps and is only
//! committed to the shapes on pointer-up; cancellation discards it.

use crate::bounds::{clamp_group_delta, clamp_point, clamp_resize};
use crate::config::EditorConfig;
use crate::error::{EditError, EditResult};
use crate::events::{EditorEvent, EventQueue};
use crate::handles::{
    self, BoxHandle, Cursor, HANDLE_SIZE, Handle, HandleId, TentativeGeometry,
};
use crate::resize::{ResizeRules, move_point};
use crate::scene::{HIT_TOLERANCE, Scene};
use crate::selection::{SelectionSet, ToggleOutcome};
use crate::shapes::{PointDepth, Shape, ShapeId};
use crate::snap::snap_delta_for_origin;
use crate::tools::{CreationTool, ResourceProvider};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::HashMap;

/// Squared pointer travel before a press on a shape becomes a move gesture.
const MOVE_THRESHOLD_SQ: f64 = 8.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// The platform primary modifier (Ctrl, or Cmd on macOS).
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the controller responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Delete,
    Backspace,
    Escape,
    A,
}

/// One shape participating in a bulk resize.
#[derive(Debug, Clone, Copy)]
struct ResizeTarget {
    id: ShapeId,
    handle: BoxHandle,
    start: Rect,
}

/// An in-progress point edit.
#[derive(Debug, Clone, Copy)]
struct MovingPoint {
    id: ShapeId,
    index: usize,
    depth: PointDepth,
    origin: Point,
    current: Point,
}

/// Active gesture of the state machine.
#[derive(Debug, Default)]
enum Gesture {
    #[default]
    Idle,
    RubberBand {
        selecting: bool,
        region: Rect,
    },
    Moving {
        origins: HashMap<ShapeId, Point>,
    },
    Resizing {
        targets: Vec<ResizeTarget>,
    },
    MovingPoint(MovingPoint),
    ToolDelegated,
}

/// Hook invoked instead of direct removal when the host owns deletion.
type DeleteHook = Box<dyn FnMut(&[ShapeId])>;

/// Interactive manipulation controller for a [`Scene`].
pub struct SceneEditor {
    scene: Option<Scene>,
    selection: SelectionSet,
    viewport: Viewport,
    config: EditorConfig,
    events: EventQueue,
    gesture: Gesture,
    /// Tentative move targets; absence means the shape's geometry is authoritative.
    pending_moves: HashMap<ShapeId, Point>,
    /// Tentative resize targets; cleared on commit or cancel.
    pending_sizes: HashMap<ShapeId, Size>,
    /// Pointer-down position in scene coordinates.
    down: Option<Point>,
    /// Clamped current pointer position in scene coordinates.
    current: Point,
    cancelled: bool,
    enabled: bool,
    captured: bool,
    needs_redraw: bool,
    dirty: bool,
    tool: Option<Box<dyn CreationTool>>,
    resources: Option<Box<dyn ResourceProvider>>,
    delete_hook: Option<DeleteHook>,
}

impl Default for SceneEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneEditor {
    /// Create a controller with no scene attached.
    pub fn new() -> Self {
        Self {
            scene: None,
            selection: SelectionSet::new(),
            viewport: Viewport::default(),
            config: EditorConfig::default(),
            events: EventQueue::default(),
            gesture: Gesture::Idle,
            pending_moves: HashMap::new(),
            pending_sizes: HashMap::new(),
            down: None,
            current: Point::ZERO,
            cancelled: false,
            enabled: true,
            captured: false,
            needs_redraw: false,
            dirty: false,
            tool: None,
            resources: None,
            delete_hook: None,
        }
    }

    // Lifecycle -----------------------------------------------------------

    /// Attach to a host viewport and enable input handling.
    pub fn attach(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.enabled = true;
    }

    /// Detach from the host. An in-progress gesture is cancelled so nothing
    /// is left half-committed.
    pub fn detach(&mut self) {
        self.abort_interaction();
        self.enabled = false;
    }

    /// Set the render scale.
    pub fn set_scale(&mut self, scale: f64) {
        self.viewport.scale = scale.max(f64::EPSILON);
        self.needs_redraw = true;
    }

    /// Replace the controlled scene, resetting selection and gesture state.
    pub fn set_scene(&mut self, scene: Scene) {
        self.abort_interaction();
        self.clear_selection();
        self.scene = Some(scene);
        self.needs_redraw = true;
    }

    /// The controlled scene.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Mutable access to the controlled scene.
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Enable or disable input handling. Disabling mid-gesture synthesizes
    /// a cancelling pointer-up.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled && self.enabled {
            self.abort_interaction();
        }
        self.enabled = enabled;
    }

    /// The editor configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Mutable access to the editor configuration.
    pub fn config_mut(&mut self) -> &mut EditorConfig {
        &mut self.config
    }

    /// Install or remove the active creation tool.
    pub fn set_active_tool(&mut self, tool: Option<Box<dyn CreationTool>>) {
        self.tool = tool;
    }

    /// Install the resource provider consulted before shape insertion.
    pub fn set_resource_provider(&mut self, provider: Option<Box<dyn ResourceProvider>>) {
        self.resources = provider;
    }

    /// Install a deletion hook; when present, Delete/Backspace delegates to
    /// it instead of removing shapes directly.
    pub fn set_delete_hook(&mut self, hook: Option<DeleteHook>) {
        self.delete_hook = hook;
    }

    // Host polling --------------------------------------------------------

    /// Drain pending change notifications.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }

    /// Take the redraw flag, clearing it.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Whether this controller currently owns the pointer.
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Whether uncommitted scene changes exist since the last
    /// [`SceneEditor::mark_saved`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reset the dirty flag (e.g. after the host persisted the scene).
    pub fn mark_saved(&mut self) {
        self.set_dirty(false);
    }

    /// Clamped current pointer position in scene coordinates.
    pub fn pointer_position(&self) -> Point {
        self.current
    }

    fn set_dirty(&mut self, dirty: bool) {
        if self.dirty != dirty {
            self.dirty = dirty;
            self.events.push(EditorEvent::DirtyChanged(dirty));
        }
    }

    // Selection API -------------------------------------------------------

    /// The selection model.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// The active point depth: Full only when exactly one path is selected.
    pub fn point_depth(&self) -> PointDepth {
        if let (Some(id), Some(scene)) = (self.selection.sole(), self.scene.as_ref()) {
            if matches!(scene.get(id), Some(Shape::Path(_))) {
                return PointDepth::Full;
            }
        }
        PointDepth::Simple
    }

    /// Add a shape to the selection.
    pub fn select_shape(&mut self, id: ShapeId) -> EditResult<()> {
        self.scene.as_ref().ok_or(EditError::NoScene)?.require(id)?;
        if self.selection.select(id) {
            self.events.push(EditorEvent::ShapeSelected(id));
            self.emit_selection_changed();
        }
        Ok(())
    }

    /// Remove a shape from the selection.
    pub fn deselect_shape(&mut self, id: ShapeId) {
        if self.selection.deselect(id) {
            self.events.push(EditorEvent::ShapeDeselected(id));
            self.emit_selection_changed();
        }
    }

    /// Toggle a shape's selection, cycling point-edit mode for
    /// point-editable shapes.
    pub fn toggle_shape(&mut self, id: ShapeId) -> EditResult<()> {
        let point_editable = self
            .scene
            .as_ref()
            .ok_or(EditError::NoScene)?
            .require(id)?
            .is_point_editable();
        match self.selection.toggle(id, point_editable) {
            ToggleOutcome::Selected => self.events.push(EditorEvent::ShapeSelected(id)),
            ToggleOutcome::Deselected | ToggleOutcome::ExitedPointEdit => {
                self.events.push(EditorEvent::ShapeDeselected(id));
            }
            ToggleOutcome::EnteredPointEdit => {}
        }
        self.emit_selection_changed();
        Ok(())
    }

    /// Select every shape in the scene.
    pub fn select_all(&mut self) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        let ids: Vec<ShapeId> = scene.ids().to_vec();
        let mut changed = false;
        for id in ids {
            if self.selection.select(id) {
                self.events.push(EditorEvent::ShapeSelected(id));
                changed = true;
            }
        }
        if changed {
            self.emit_selection_changed();
        }
    }

    /// Clear the selection, dropping point-edit modes first.
    pub fn clear_selection(&mut self) {
        let cleared = self.selection.clear();
        if !cleared.is_empty() {
            for id in cleared {
                self.events.push(EditorEvent::ShapeDeselected(id));
            }
            self.emit_selection_changed();
        }
    }

    fn replace_selection(&mut self, ids: &[ShapeId]) {
        self.clear_selection();
        let mut changed = false;
        for &id in ids {
            if self.selection.select(id) {
                self.events.push(EditorEvent::ShapeSelected(id));
                changed = true;
            }
        }
        if changed {
            self.emit_selection_changed();
        }
    }

    fn emit_selection_changed(&mut self) {
        self.events.push(EditorEvent::SelectionChanged {
            count: self.selection.len(),
        });
        self.needs_redraw = true;
    }

    // Scene mutation API --------------------------------------------------

    /// Insert a shape, preparing its resources first when required.
    /// On resource failure nothing is committed.
    pub fn insert_shape(&mut self, shape: Shape) -> EditResult<ShapeId> {
        if self.scene.is_none() {
            return Err(EditError::NoScene);
        }
        if shape.needs_resources() {
            if let Some(provider) = self.resources.as_mut() {
                let mut outcome: EditResult<()> = Ok(());
                {
                    let slot = &mut outcome;
                    provider.prepare(&shape, Box::new(move |result| *slot = result));
                }
                if let Err(err) = outcome {
                    log::warn!("shape insertion aborted: {err}");
                    return Err(err);
                }
            }
        }
        let id = self.scene.as_mut().expect("scene present").add_shape(shape);
        self.events.push(EditorEvent::ElementAdded(id));
        self.set_dirty(true);
        self.needs_redraw = true;
        Ok(id)
    }

    /// Delete the selected shapes, or delegate to the deletion hook.
    pub fn delete_selected(&mut self) -> EditResult<()> {
        let ids: Vec<ShapeId> = self.selection.ids().to_vec();
        if ids.is_empty() {
            return Ok(());
        }
        if let Some(hook) = self.delete_hook.as_mut() {
            hook(&ids);
            return Ok(());
        }
        let scene = self.scene.as_mut().ok_or(EditError::NoScene)?;
        for &id in &ids {
            scene.remove_shape(id);
        }
        self.selection.clear();
        for id in ids {
            self.events.push(EditorEvent::ElementRemoved(id));
        }
        self.emit_selection_changed();
        self.set_dirty(true);
        Ok(())
    }

    fn reorder(&mut self, id: ShapeId, op: fn(&mut Scene, ShapeId) -> bool) -> EditResult<()> {
        let scene = self.scene.as_mut().ok_or(EditError::NoScene)?;
        scene.require(id)?;
        if op(scene, id) {
            self.events.push(EditorEvent::ElementsReordered);
            self.set_dirty(true);
            self.needs_redraw = true;
        }
        Ok(())
    }

    /// Bring a shape to the front of the z-order.
    pub fn move_to_front(&mut self, id: ShapeId) -> EditResult<()> {
        self.reorder(id, Scene::move_to_front)
    }

    /// Send a shape to the back of the z-order.
    pub fn move_to_back(&mut self, id: ShapeId) -> EditResult<()> {
        self.reorder(id, Scene::move_to_back)
    }

    /// Swap a shape one step toward the front.
    pub fn move_forward(&mut self, id: ShapeId) -> EditResult<()> {
        self.reorder(id, Scene::move_forward)
    }

    /// Swap a shape one step toward the back.
    pub fn move_backward(&mut self, id: ShapeId) -> EditResult<()> {
        self.reorder(id, Scene::move_backward)
    }

    // Handle queries ------------------------------------------------------

    fn tentative_for(&self, id: ShapeId) -> TentativeGeometry {
        let mut tentative = TentativeGeometry {
            location: self.pending_moves.get(&id).copied(),
            size: self.pending_sizes.get(&id).copied(),
            moving_point: None,
        };
        if let Gesture::MovingPoint(mp) = &self.gesture {
            if mp.id == id {
                tentative.moving_point = Some((mp.index, mp.current));
            }
        }
        tentative
    }

    /// Handles for every selected shape, projected for display.
    pub fn visible_handles(&self) -> Vec<(ShapeId, Vec<Handle>)> {
        let Some(scene) = self.scene.as_ref() else {
            return Vec::new();
        };
        let depth = self.point_depth();
        self.selection
            .iter()
            .filter_map(|id| {
                let shape = scene.get(id)?;
                let local = handles::handles_for(
                    shape,
                    self.selection.is_point_editing(id),
                    depth,
                    &self.tentative_for(id),
                );
                Some((id, handles::project_handles(shape, &local)))
            })
            .collect()
    }

    fn handle_half_extent(&self) -> f64 {
        HANDLE_SIZE / self.viewport.scale.max(f64::EPSILON)
    }

    fn hit_selected_handle(&self, point: Point) -> Option<(ShapeId, HandleId)> {
        let scene = self.scene.as_ref()?;
        let depth = self.point_depth();
        let half = self.handle_half_extent();
        for id in self.selection.iter() {
            let Some(shape) = scene.get(id) else {
                continue;
            };
            let tentative = self.tentative_for(id);
            let hs = handles::handles_for(
                shape,
                self.selection.is_point_editing(id),
                depth,
                &tentative,
            );
            let bounds = tentative.apply_to(shape.bounds());
            if let Some(hit) = handles::hit_test_handles(shape, &hs, bounds, point, half) {
                return Some((id, hit));
            }
        }
        None
    }

    /// Cursor hint for an idle pointer position (hover feedback).
    pub fn hover(&self, raw: Point) -> Cursor {
        if !self.enabled {
            return Cursor::Default;
        }
        let Some(scene) = self.scene.as_ref() else {
            return Cursor::Default;
        };
        let point = self.viewport.to_scene(raw);
        if let Some((_, hit)) = self.hit_selected_handle(point) {
            return match hit {
                HandleId::Box(role) => role.cursor(),
                HandleId::Point(_) => Cursor::Move,
                HandleId::Control(_) => Cursor::Pointer,
            };
        }
        if scene.shape_at(point, HIT_TOLERANCE).is_some() {
            Cursor::Move
        } else {
            Cursor::Default
        }
    }

    // Pointer dispatch ----------------------------------------------------

    /// Handle a pointer press. Returns whether this controller captured the
    /// pointer; the host routes subsequent move/up events back while true.
    pub fn pointer_down(
        &mut self,
        raw: Point,
        button: MouseButton,
        mods: Modifiers,
    ) -> EditResult<bool> {
        if !self.enabled || self.scene.is_none() {
            return Ok(false);
        }
        let point = self.viewport.to_scene(raw);
        self.current = point;
        self.cancelled = false;

        // An installed creation tool owns the gesture.
        if self.tool.is_some() {
            return Ok(self.pointer_down_tool(point, button));
        }
        if button != MouseButton::Left {
            return Ok(false);
        }

        // (a)/(b) manipulation handles of selected shapes.
        if let Some((id, hit)) = self.hit_selected_handle(point) {
            match hit {
                HandleId::Box(role) => {
                    let targets = self.collect_resize_targets(role);
                    if !targets.is_empty() {
                        log::debug!("resize gesture on {} shapes", targets.len());
                        self.gesture = Gesture::Resizing { targets };
                        return Ok(self.capture(point));
                    }
                }
                HandleId::Point(index) | HandleId::Control(index) => {
                    if self.selection.sole() == Some(id) {
                        let depth = self.point_depth();
                        let shape = self.scene.as_ref().expect("scene present").require(id)?;
                        if shape.is_point_movable() {
                            let origin = shape.point_at(index, depth)?;
                            log::debug!("point gesture on {id} index {index}");
                            self.gesture = Gesture::MovingPoint(MovingPoint {
                                id,
                                index,
                                depth,
                                origin,
                                current: origin,
                            });
                            return Ok(self.capture(point));
                        }
                    }
                }
            }
        }

        // (c) shapes under the pointer: click-selection rules.
        let hit_shape = self
            .scene
            .as_ref()
            .expect("scene present")
            .shape_at(point, HIT_TOLERANCE);
        if let Some(id) = hit_shape {
            if mods.shift || mods.primary() {
                self.toggle_shape(id)?;
            } else if !self.selection.is_selected(id) {
                self.replace_selection(&[id]);
            } else if self.selection.sole() == Some(id) {
                let point_editable = self
                    .scene
                    .as_ref()
                    .expect("scene present")
                    .require(id)?
                    .is_point_editable();
                if point_editable {
                    self.toggle_shape(id)?;
                }
            }
            return Ok(self.capture(point));
        }

        // (d) empty canvas: rubber band.
        if !mods.shift && self.config.selection_enabled {
            self.clear_selection();
        }
        self.gesture = Gesture::RubberBand {
            selecting: self.config.selection_enabled,
            region: Rect::from_origin_size(point, Size::ZERO),
        };
        Ok(self.capture(point))
    }

    fn pointer_down_tool(&mut self, point: Point, button: MouseButton) -> bool {
        let tool = self.tool.as_mut().expect("tool present");
        match button {
            MouseButton::Right => {
                if tool.in_progress() {
                    tool.cancel();
                    self.gesture = Gesture::Idle;
                    self.needs_redraw = true;
                }
                false
            }
            MouseButton::Left => {
                tool.begin(point);
                self.gesture = Gesture::ToolDelegated;
                self.capture(point)
            }
            MouseButton::Middle => false,
        }
    }

    fn capture(&mut self, point: Point) -> bool {
        self.down = Some(point);
        self.captured = true;
        self.needs_redraw = true;
        true
    }

    fn collect_resize_targets(&self, role: BoxHandle) -> Vec<ResizeTarget> {
        let Some(scene) = self.scene.as_ref() else {
            return Vec::new();
        };
        self.selection
            .iter()
            .filter_map(|id| {
                let shape = scene.get(id)?;
                shape.is_resizable().then(|| ResizeTarget {
                    id,
                    handle: role,
                    start: shape.bounds(),
                })
            })
            .collect()
    }

    /// Handle pointer movement during a captured gesture.
    pub fn pointer_move(&mut self, raw: Point) -> EditResult<()> {
        if !self.enabled || self.cancelled {
            return Ok(());
        }
        let Some(container) = self.scene.as_ref().map(|s| s.size()) else {
            return Ok(());
        };
        let Some(down) = self.down else {
            return Ok(());
        };
        // Neither axis may push the reference point outside the canvas.
        let point = clamp_point(self.viewport.to_scene(raw), container);
        self.current = point;
        let delta = point - down;

        match &self.gesture {
            Gesture::ToolDelegated => {
                if let Some(tool) = self.tool.as_mut() {
                    tool.update(point);
                    self.needs_redraw = true;
                }
            }
            Gesture::Resizing { targets } => {
                let targets = targets.clone();
                self.apply_resize(&targets, delta);
            }
            Gesture::Moving { origins } => {
                let origins = origins.clone();
                self.apply_move(&origins, delta);
            }
            Gesture::MovingPoint(mp) => {
                let updated = move_point(mp.origin, delta, self.config.snap_spacing());
                if let Gesture::MovingPoint(mp) = &mut self.gesture {
                    mp.current = updated;
                }
                self.needs_redraw = true;
            }
            Gesture::RubberBand { .. } => {
                let region = self.band_region(down, point, container);
                if let Gesture::RubberBand { region: slot, .. } = &mut self.gesture {
                    *slot = region;
                }
                self.needs_redraw = true;
            }
            Gesture::Idle => {
                // A press on a shape becomes a move once the pointer travels
                // far enough.
                if delta.hypot2() > MOVE_THRESHOLD_SQ {
                    let origins = self.movable_origins();
                    if !origins.is_empty() {
                        log::debug!("move gesture on {} shapes", origins.len());
                        self.gesture = Gesture::Moving {
                            origins: origins.clone(),
                        };
                        self.apply_move(&origins, delta);
                    }
                }
            }
        }
        Ok(())
    }

    fn movable_origins(&self) -> HashMap<ShapeId, Point> {
        let Some(scene) = self.scene.as_ref() else {
            return HashMap::new();
        };
        self.selection
            .iter()
            .filter_map(|id| {
                let shape = scene.get(id)?;
                shape.is_movable().then(|| (id, shape.location()))
            })
            .collect()
    }

    fn apply_move(&mut self, origins: &HashMap<ShapeId, Point>, delta: Vec2) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        let mut effective = delta;

        // Snap the gesture-anchor origin to the grid; group members keep
        // their relative offsets.
        if let Some(spacing) = self.config.snap_spacing() {
            if let Some(anchor) = self.selection.iter().find(|id| origins.contains_key(id)) {
                effective = snap_delta_for_origin(origins[&anchor], effective, spacing);
            }
        }

        if self.config.constrain_to_bounds {
            let rects: Vec<Rect> = origins
                .iter()
                .filter_map(|(id, origin)| {
                    scene
                        .get(*id)
                        .map(|s| Rect::from_origin_size(*origin, s.size()))
                })
                .collect();
            effective = clamp_group_delta(&rects, effective, scene.size());
        }

        for (&id, &origin) in origins {
            let location = origin + effective;
            self.pending_moves.insert(id, location);
            self.events.push(EditorEvent::ElementMoving { id, location });
        }
        self.needs_redraw = true;
    }

    fn apply_resize(&mut self, targets: &[ResizeTarget], delta: Vec2) {
        let Some(container) = self.scene.as_ref().map(|s| s.size()) else {
            return;
        };
        let rules = ResizeRules {
            grid: self.config.snap_spacing(),
            min_size: self.config.min_size,
            lock_aspect: self.config.lock_aspect,
        };
        for target in targets {
            let Some((location, mut size)) = target.handle.apply(target.start, delta, &rules)
            else {
                // Below minimum size: the frame is rejected for this shape.
                continue;
            };
            if self.config.constrain_to_bounds {
                size = clamp_resize(location, size, container);
                if size.width + 1e-9 < rules.min_size.width
                    || size.height + 1e-9 < rules.min_size.height
                {
                    continue;
                }
            }
            self.pending_moves.insert(target.id, location);
            self.pending_sizes.insert(target.id, size);
            self.events.push(EditorEvent::ElementSizing {
                id: target.id,
                size,
            });
        }
        self.needs_redraw = true;
    }

    fn band_region(&self, down: Point, current: Point, container: Size) -> Rect {
        let mut region = Rect::from_points(down, current);
        if let Some(spacing) = self.config.snap_spacing() {
            let origin = crate::snap::snap_point(region.origin(), spacing);
            region = Rect::new(
                origin.x.min(region.x1),
                origin.y.min(region.y1),
                region.x1,
                region.y1,
            );
        }
        Rect::new(
            region.x0.max(0.0),
            region.y0.max(0.0),
            region.x1.min(container.width),
            region.y1.min(container.height),
        )
    }

    /// Handle pointer release: commit or discard the gesture.
    pub fn pointer_up(&mut self, raw: Point) -> EditResult<()> {
        let Some(container) = self.scene.as_ref().map(|s| s.size()) else {
            self.captured = false;
            self.down = None;
            return Ok(());
        };
        let point = clamp_point(self.viewport.to_scene(raw), container);
        self.current = point;
        let gesture = std::mem::take(&mut self.gesture);
        let down = self.down.take();
        self.captured = false;

        if self.cancelled {
            self.cancelled = false;
            self.discard_tentative();
            self.needs_redraw = true;
            log::debug!("gesture cancelled; tentative state discarded");
            return Ok(());
        }

        match gesture {
            Gesture::Idle => {}
            Gesture::ToolDelegated => {
                if let Some(tool) = self.tool.as_mut() {
                    if let Some(shape) = tool.finish(point) {
                        self.insert_shape(shape)?;
                    }
                }
                self.needs_redraw = true;
            }
            Gesture::RubberBand { selecting, region } => {
                if selecting {
                    // Dragging up-and-left selects contained shapes only;
                    // any other direction selects intersecting shapes.
                    let contained = down.is_some_and(|d| point.x < d.x && point.y < d.y);
                    let ids = self
                        .scene
                        .as_ref()
                        .expect("scene present")
                        .shapes_in_region(region, contained);
                    self.replace_selection(&ids);
                } else {
                    let min = self.config.min_size;
                    if region.width() + 1e-9 >= min.width && region.height() + 1e-9 >= min.height {
                        self.events.push(EditorEvent::ElementCreated { region });
                    }
                }
                self.needs_redraw = true;
            }
            Gesture::Moving { .. } => self.commit_moves()?,
            Gesture::Resizing { .. } => self.commit_resizes()?,
            Gesture::MovingPoint(mp) => self.commit_point(mp)?,
        }
        Ok(())
    }

    fn commit_moves(&mut self) -> EditResult<()> {
        let moves: Vec<(ShapeId, Point)> = self.pending_moves.drain().collect();
        self.pending_sizes.clear();
        let scene = self.scene.as_mut().ok_or(EditError::NoScene)?;
        let count = moves.len();
        for (id, location) in moves {
            scene.require_mut(id)?.set_location(location);
            self.events.push(EditorEvent::ElementMoved { id, location });
        }
        if count > 0 {
            log::debug!("committed move of {count} shapes");
            self.set_dirty(true);
        }
        self.needs_redraw = true;
        Ok(())
    }

    fn commit_resizes(&mut self) -> EditResult<()> {
        let moves: Vec<(ShapeId, Point)> = self.pending_moves.drain().collect();
        let sizes: Vec<(ShapeId, Size)> = self.pending_sizes.drain().collect();
        let scene = self.scene.as_mut().ok_or(EditError::NoScene)?;
        for (id, location) in moves {
            scene.require_mut(id)?.set_location(location);
        }
        let count = sizes.len();
        for (id, size) in sizes {
            scene.require_mut(id)?.set_size(size);
            self.events.push(EditorEvent::ElementSized { id, size });
        }
        if count > 0 {
            log::debug!("committed resize of {count} shapes");
            self.set_dirty(true);
        }
        self.needs_redraw = true;
        Ok(())
    }

    fn commit_point(&mut self, mp: MovingPoint) -> EditResult<()> {
        let scene = self.scene.as_mut().ok_or(EditError::NoScene)?;
        let shape = scene.require_mut(mp.id)?;
        shape.set_point_at(mp.index, mp.depth, mp.current)?;
        let location = shape.location();
        self.events.push(EditorEvent::ElementMoved {
            id: mp.id,
            location,
        });
        log::debug!("committed point {} of {}", mp.index, mp.id);
        self.set_dirty(true);
        self.needs_redraw = true;
        Ok(())
    }

    fn discard_tentative(&mut self) {
        self.pending_moves.clear();
        self.pending_sizes.clear();
    }

    /// Cancel the in-progress gesture; the matching pointer-up commits
    /// nothing.
    pub fn cancel_gesture(&mut self) {
        self.discard_tentative();
        self.gesture = Gesture::Idle;
        self.cancelled = true;
        self.needs_redraw = true;
    }

    fn abort_interaction(&mut self) {
        if let Some(tool) = self.tool.as_mut() {
            if tool.in_progress() {
                tool.cancel();
            }
        }
        self.discard_tentative();
        self.gesture = Gesture::Idle;
        self.down = None;
        self.captured = false;
        self.cancelled = false;
        self.needs_redraw = true;
    }

    // Keyboard dispatch ---------------------------------------------------

    /// Handle a key press.
    pub fn key_down(&mut self, key: Key, mods: Modifiers) -> EditResult<()> {
        if !self.enabled || self.scene.is_none() {
            return Ok(());
        }
        match key {
            Key::ArrowLeft => self.nudge(Vec2::new(-1.0, 0.0), mods),
            Key::ArrowRight => self.nudge(Vec2::new(1.0, 0.0), mods),
            Key::ArrowUp => self.nudge(Vec2::new(0.0, -1.0), mods),
            Key::ArrowDown => self.nudge(Vec2::new(0.0, 1.0), mods),
            Key::Delete | Key::Backspace => self.delete_selected(),
            Key::A if mods.primary() => {
                self.select_all();
                Ok(())
            }
            Key::A => Ok(()),
            Key::Escape => {
                self.escape();
                Ok(())
            }
        }
    }

    fn escape(&mut self) {
        if let Some(tool) = self.tool.as_mut() {
            if tool.in_progress() {
                tool.cancel();
                self.gesture = Gesture::Idle;
                self.needs_redraw = true;
                return;
            }
        }
        let gesture_active = !matches!(self.gesture, Gesture::Idle)
            || !self.pending_moves.is_empty()
            || !self.pending_sizes.is_empty();
        if gesture_active {
            self.cancel_gesture();
        } else {
            self.clear_selection();
        }
    }

    fn nudge(&mut self, direction: Vec2, mods: Modifiers) -> EditResult<()> {
        if mods.primary() {
            // Size nudges use the configured jump amount.
            self.nudge_size(direction * self.config.nudge_jump)
        } else {
            let amount = if mods.shift {
                self.config.nudge_jump
            } else {
                1.0
            };
            self.nudge_location(direction * amount)
        }
    }

    fn nudge_location(&mut self, delta: Vec2) -> EditResult<()> {
        let Some(scene) = self.scene.as_ref() else {
            return Ok(());
        };
        let targets: Vec<(ShapeId, Point, Size)> = self
            .selection
            .iter()
            .filter_map(|id| {
                let shape = scene.get(id)?;
                (shape.is_nudgeable() && shape.is_movable())
                    .then(|| (id, shape.location(), shape.size()))
            })
            .collect();
        if targets.is_empty() {
            return Ok(());
        }

        let mut effective = delta;
        if self.config.constrain_to_bounds {
            let rects: Vec<Rect> = targets
                .iter()
                .map(|(_, loc, size)| Rect::from_origin_size(*loc, *size))
                .collect();
            effective = clamp_group_delta(&rects, effective, scene.size());
        }

        let scene = self.scene.as_mut().expect("scene present");
        for (id, location, _) in targets {
            let moved = location + effective;
            scene.require_mut(id)?.set_location(moved);
            self.events.push(EditorEvent::ElementMoved {
                id,
                location: moved,
            });
        }
        self.set_dirty(true);
        self.needs_redraw = true;
        Ok(())
    }

    fn nudge_size(&mut self, delta: Vec2) -> EditResult<()> {
        let Some(scene) = self.scene.as_ref() else {
            return Ok(());
        };
        let container = scene.size();
        let targets: Vec<(ShapeId, Point, Size)> = self
            .selection
            .iter()
            .filter_map(|id| {
                let shape = scene.get(id)?;
                (shape.is_nudgeable() && shape.is_resizable())
                    .then(|| (id, shape.location(), shape.size()))
            })
            .collect();
        if targets.is_empty() {
            return Ok(());
        }

        // Bounded growth is reduced for the whole group.
        let mut effective = delta;
        if self.config.constrain_to_bounds {
            for (_, location, size) in &targets {
                effective.x = effective
                    .x
                    .min(container.width - (location.x + size.width));
                effective.y = effective
                    .y
                    .min(container.height - (location.y + size.height));
            }
        }

        // All-or-nothing: any member below minimum vetoes the whole nudge.
        let min = self.config.min_size;
        for (_, _, size) in &targets {
            if size.width + effective.x + 1e-9 < min.width
                || size.height + effective.y + 1e-9 < min.height
            {
                return Ok(());
            }
        }

        let scene = self.scene.as_mut().expect("scene present");
        for (id, _, size) in targets {
            let resized = Size::new(size.width + effective.x, size.height + effective.y);
            scene.require_mut(id)?.set_size(resized);
            self.events.push(EditorEvent::ElementSized { id, size: resized });
        }
        self.set_dirty(true);
        self.needs_redraw = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, Rectangle, SerializableColor};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn editor(width: f64, height: f64) -> SceneEditor {
        let mut editor = SceneEditor::new();
        editor.attach(Viewport::new(Rect::new(0.0, 0.0, width, height), 1.0));
        editor.set_scene(Scene::new(Size::new(width, height)));
        editor.drain_events();
        editor
    }

    fn add_rect(editor: &mut SceneEditor, x: f64, y: f64, w: f64, h: f64) -> ShapeId {
        let mut rect = Rectangle::new(Point::new(x, y), Size::new(w, h));
        rect.style.fill_color = Some(SerializableColor::black());
        let id = editor
            .scene_mut()
            .unwrap()
            .add_shape(Shape::Rectangle(rect));
        editor.drain_events();
        id
    }

    fn press(editor: &mut SceneEditor, x: f64, y: f64) -> bool {
        editor
            .pointer_down(Point::new(x, y), MouseButton::Left, Modifiers::default())
            .unwrap()
    }

    fn drag(editor: &mut SceneEditor, x: f64, y: f64) {
        editor.pointer_move(Point::new(x, y)).unwrap();
    }

    fn release(editor: &mut SceneEditor, x: f64, y: f64) {
        editor.pointer_up(Point::new(x, y)).unwrap();
    }

    #[test]
    fn test_click_selects_and_replaces() {
        let mut editor = editor(200.0, 200.0);
        let a = add_rect(&mut editor, 10.0, 10.0, 20.0, 20.0);
        let b = add_rect(&mut editor, 100.0, 100.0, 20.0, 20.0);

        assert!(press(&mut editor, 15.0, 15.0));
        release(&mut editor, 15.0, 15.0);
        assert!(editor.selection().is_selected(a));

        press(&mut editor, 110.0, 110.0);
        release(&mut editor, 110.0, 110.0);
        assert!(editor.selection().is_selected(b));
        assert!(!editor.selection().is_selected(a));
        assert_eq!(editor.selection().len(), 1);
    }

    #[test]
    fn test_shift_click_adds() {
        let mut editor = editor(200.0, 200.0);
        let a = add_rect(&mut editor, 10.0, 10.0, 20.0, 20.0);
        let b = add_rect(&mut editor, 100.0, 100.0, 20.0, 20.0);

        press(&mut editor, 15.0, 15.0);
        release(&mut editor, 15.0, 15.0);
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        editor
            .pointer_down(Point::new(110.0, 110.0), MouseButton::Left, shift)
            .unwrap();
        editor.pointer_up(Point::new(110.0, 110.0)).unwrap();

        assert!(editor.selection().is_selected(a));
        assert!(editor.selection().is_selected(b));
    }

    #[test]
    fn test_selection_events() {
        let mut editor = editor(200.0, 200.0);
        let a = add_rect(&mut editor, 10.0, 10.0, 20.0, 20.0);

        editor.select_shape(a).unwrap();
        let events = editor.drain_events();
        assert!(events.contains(&EditorEvent::ShapeSelected(a)));
        assert!(events.contains(&EditorEvent::SelectionChanged { count: 1 }));

        editor.clear_selection();
        let events = editor.drain_events();
        assert!(events.contains(&EditorEvent::ShapeDeselected(a)));
        assert!(events.contains(&EditorEvent::SelectionChanged { count: 0 }));
    }

    #[test]
    fn test_rubber_band_intersection_rule() {
        let mut editor = editor(200.0, 200.0);
        let a = add_rect(&mut editor, 10.0, 10.0, 20.0, 20.0);
        let b = add_rect(&mut editor, 150.0, 150.0, 20.0, 20.0);

        // Down-right drag: intersection selects.
        press(&mut editor, 0.0, 0.0);
        drag(&mut editor, 40.0, 40.0);
        release(&mut editor, 40.0, 40.0);

        assert!(editor.selection().is_selected(a));
        assert!(!editor.selection().is_selected(b));
    }

    #[test]
    fn test_rubber_band_containment_rule() {
        let mut editor = editor(200.0, 200.0);
        let contained = add_rect(&mut editor, 5.0, 5.0, 10.0, 10.0);
        // Overlaps the band but is not contained by it.
        let partial = add_rect(&mut editor, 35.0, 5.0, 10.0, 10.0);

        // Up-and-left drag: containment selects.
        press(&mut editor, 40.0, 40.0);
        drag(&mut editor, 0.0, 0.0);
        release(&mut editor, 0.0, 0.0);

        assert!(editor.selection().is_selected(contained));
        assert!(!editor.selection().is_selected(partial));
    }

    #[test]
    fn test_non_selecting_band_reports_creation() {
        let mut editor = editor(200.0, 200.0);
        editor.config_mut().selection_enabled = false;

        press(&mut editor, 10.0, 10.0);
        drag(&mut editor, 60.0, 50.0);
        release(&mut editor, 60.0, 50.0);

        let events = editor.drain_events();
        assert!(events.contains(&EditorEvent::ElementCreated {
            region: Rect::new(10.0, 10.0, 60.0, 50.0)
        }));
    }

    #[test]
    fn test_tiny_band_reports_nothing() {
        let mut editor = editor(200.0, 200.0);
        editor.config_mut().selection_enabled = false;

        press(&mut editor, 10.0, 10.0);
        drag(&mut editor, 12.0, 12.0);
        release(&mut editor, 12.0, 12.0);

        let events = editor.drain_events();
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, EditorEvent::ElementCreated { .. }))
        );
    }

    #[test]
    fn test_move_gesture_commits() {
        let mut editor = editor(200.0, 200.0);
        let id = add_rect(&mut editor, 10.0, 10.0, 20.0, 20.0);
        editor.select_shape(id).unwrap();

        press(&mut editor, 20.0, 20.0);
        drag(&mut editor, 50.0, 40.0);
        // Tentative state is visible before commit.
        let scene_loc = editor.scene().unwrap().get(id).unwrap().location();
        assert_eq!(scene_loc, Point::new(10.0, 10.0));

        release(&mut editor, 50.0, 40.0);
        let committed = editor.scene().unwrap().get(id).unwrap().location();
        assert_eq!(committed, Point::new(40.0, 30.0));

        let events = editor.drain_events();
        assert!(events.contains(&EditorEvent::ElementMoved {
            id,
            location: Point::new(40.0, 30.0)
        }));
        assert!(events.contains(&EditorEvent::DirtyChanged(true)));
    }

    #[test]
    fn test_group_bounded_move() {
        let mut editor = editor(100.0, 100.0);
        let a = add_rect(&mut editor, 10.0, 10.0, 40.0, 40.0);
        let b = add_rect(&mut editor, 50.0, 50.0, 40.0, 40.0);
        editor.select_shape(a).unwrap();
        editor.select_shape(b).unwrap();

        // Union bounds [10,10]-[90,90]; requested (+20,0) reduces to (+10,0).
        press(&mut editor, 20.0, 20.0);
        drag(&mut editor, 40.0, 20.0);
        release(&mut editor, 40.0, 20.0);

        let scene = editor.scene().unwrap();
        assert_eq!(scene.get(a).unwrap().location(), Point::new(20.0, 10.0));
        assert_eq!(scene.get(b).unwrap().location(), Point::new(60.0, 50.0));
    }

    #[test]
    fn test_bounds_containment_after_commit() {
        let mut editor = editor(100.0, 100.0);
        let id = add_rect(&mut editor, 60.0, 60.0, 30.0, 30.0);
        editor.select_shape(id).unwrap();

        press(&mut editor, 70.0, 70.0);
        drag(&mut editor, 99.0, 99.0);
        release(&mut editor, 99.0, 99.0);

        let bounds = editor.scene().unwrap().get(id).unwrap().bounds();
        assert!(bounds.x0 >= 0.0 && bounds.y0 >= 0.0);
        assert!(bounds.x1 <= 100.0 && bounds.y1 <= 100.0);
    }

    #[test]
    fn test_resize_gesture_commits() {
        let mut editor = editor(200.0, 200.0);
        let id = add_rect(&mut editor, 10.0, 10.0, 40.0, 30.0);
        editor.select_shape(id).unwrap();

        // Bottom-right handle sits at (50, 40).
        press(&mut editor, 50.0, 40.0);
        drag(&mut editor, 70.0, 60.0);
        release(&mut editor, 70.0, 60.0);

        let shape = editor.scene().unwrap().get(id).unwrap();
        assert_eq!(shape.size(), Size::new(60.0, 50.0));
        assert_eq!(shape.location(), Point::new(10.0, 10.0));

        let events = editor.drain_events();
        assert!(events.contains(&EditorEvent::ElementSized {
            id,
            size: Size::new(60.0, 50.0)
        }));
    }

    #[test]
    fn test_resize_respects_minimum() {
        let mut editor = editor(200.0, 200.0);
        let id = add_rect(&mut editor, 10.0, 10.0, 40.0, 30.0);
        editor.select_shape(id).unwrap();

        // Drag the bottom-right handle far past the opposite corner: every
        // frame is rejected and the committed geometry is unchanged.
        press(&mut editor, 50.0, 40.0);
        drag(&mut editor, 11.0, 11.0);
        release(&mut editor, 11.0, 11.0);

        let shape = editor.scene().unwrap().get(id).unwrap();
        assert_eq!(shape.size(), Size::new(40.0, 30.0));
    }

    #[test]
    fn test_aspect_locked_resize() {
        let mut editor = editor(400.0, 400.0);
        let id = add_rect(&mut editor, 0.0, 0.0, 100.0, 50.0);
        editor.select_shape(id).unwrap();
        editor.config_mut().lock_aspect = true;

        press(&mut editor, 100.0, 50.0);
        drag(&mut editor, 140.0, 60.0);
        release(&mut editor, 140.0, 60.0);

        let size = editor.scene().unwrap().get(id).unwrap().size();
        assert!((size.width / size.height - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_endpoint_edit() {
        let mut editor = editor(200.0, 200.0);
        let id = editor
            .scene_mut()
            .unwrap()
            .add_shape(Shape::Line(Line::new(Point::ZERO, Point::new(10.0, 0.0))));
        editor.select_shape(id).unwrap();

        // Drag the handle at index 1 by (5, 5).
        press(&mut editor, 10.0, 0.0);
        drag(&mut editor, 15.0, 5.0);
        release(&mut editor, 15.0, 5.0);

        let shape = editor.scene().unwrap().get(id).unwrap();
        assert_eq!(
            shape.point_at(1, PointDepth::Simple).unwrap(),
            Point::new(15.0, 5.0)
        );
        assert_eq!(shape.point_at(0, PointDepth::Simple).unwrap(), Point::ZERO);
    }

    #[test]
    fn test_cancellation_preserves_geometry() {
        let mut editor = editor(200.0, 200.0);
        let id = add_rect(&mut editor, 10.0, 10.0, 30.0, 30.0);
        editor.select_shape(id).unwrap();
        let before = editor.scene().unwrap().get(id).unwrap().bounds();

        // Start a resize on the bottom-right handle, then Escape before up.
        press(&mut editor, 40.0, 40.0);
        drag(&mut editor, 80.0, 80.0);
        editor
            .key_down(Key::Escape, Modifiers::default())
            .unwrap();
        release(&mut editor, 80.0, 80.0);

        let after = editor.scene().unwrap().get(id).unwrap().bounds();
        assert_eq!(before, after);
    }

    #[test]
    fn test_nudge_with_modifiers() {
        let mut editor = editor(200.0, 200.0);
        let id = add_rect(&mut editor, 50.0, 50.0, 40.0, 40.0);
        editor.select_shape(id).unwrap();

        // Size-nudge modifier + left arrow reduces width by the jump.
        let primary = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        editor.key_down(Key::ArrowLeft, primary).unwrap();
        assert_eq!(
            editor.scene().unwrap().get(id).unwrap().size(),
            Size::new(30.0, 40.0)
        );

        // Plain left arrow moves by one unit.
        editor
            .key_down(Key::ArrowLeft, Modifiers::default())
            .unwrap();
        assert_eq!(
            editor.scene().unwrap().get(id).unwrap().location(),
            Point::new(49.0, 50.0)
        );

        // Shift adds the jump to moves.
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        editor.key_down(Key::ArrowRight, shift).unwrap();
        assert_eq!(
            editor.scene().unwrap().get(id).unwrap().location(),
            Point::new(59.0, 50.0)
        );
    }

    #[test]
    fn test_nudge_bounded_as_group() {
        let mut editor = editor(100.0, 100.0);
        let a = add_rect(&mut editor, 10.0, 10.0, 40.0, 40.0);
        let b = add_rect(&mut editor, 50.0, 50.0, 40.0, 40.0);
        editor.select_shape(a).unwrap();
        editor.select_shape(b).unwrap();

        // Union right edge is at 90; a jump of 10 fits exactly.
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        editor.key_down(Key::ArrowRight, shift).unwrap();
        editor.key_down(Key::ArrowRight, shift).unwrap();

        let scene = editor.scene().unwrap();
        // Second nudge was reduced to zero for the whole group.
        assert_eq!(scene.get(a).unwrap().location(), Point::new(20.0, 10.0));
        assert_eq!(scene.get(b).unwrap().location(), Point::new(60.0, 50.0));
    }

    #[test]
    fn test_select_all_and_delete() {
        let mut editor = editor(200.0, 200.0);
        let a = add_rect(&mut editor, 10.0, 10.0, 20.0, 20.0);
        let b = add_rect(&mut editor, 100.0, 100.0, 20.0, 20.0);

        let primary = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        editor.key_down(Key::A, primary).unwrap();
        assert_eq!(editor.selection().len(), 2);

        editor
            .key_down(Key::Delete, Modifiers::default())
            .unwrap();
        assert!(editor.scene().unwrap().is_empty());
        let events = editor.drain_events();
        assert!(events.contains(&EditorEvent::ElementRemoved(a)));
        assert!(events.contains(&EditorEvent::ElementRemoved(b)));
    }

    #[test]
    fn test_delete_hook_delegates() {
        let mut editor = editor(200.0, 200.0);
        let id = add_rect(&mut editor, 10.0, 10.0, 20.0, 20.0);
        editor.select_shape(id).unwrap();

        let captured: Rc<RefCell<Vec<ShapeId>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&captured);
        editor.set_delete_hook(Some(Box::new(move |ids| {
            sink.borrow_mut().extend_from_slice(ids);
        })));

        editor
            .key_down(Key::Backspace, Modifiers::default())
            .unwrap();

        // The hook saw the selection and nothing was removed directly.
        assert_eq!(captured.borrow().as_slice(), &[id]);
        assert_eq!(editor.scene().unwrap().len(), 1);
    }

    #[test]
    fn test_escape_clears_selection_when_idle() {
        let mut editor = editor(200.0, 200.0);
        let id = add_rect(&mut editor, 10.0, 10.0, 20.0, 20.0);
        editor.select_shape(id).unwrap();

        editor
            .key_down(Key::Escape, Modifiers::default())
            .unwrap();
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_disable_mid_gesture_cancels() {
        let mut editor = editor(200.0, 200.0);
        let id = add_rect(&mut editor, 10.0, 10.0, 30.0, 30.0);
        editor.select_shape(id).unwrap();
        let before = editor.scene().unwrap().get(id).unwrap().bounds();

        press(&mut editor, 40.0, 40.0);
        drag(&mut editor, 80.0, 80.0);
        editor.set_enabled(false);

        assert!(!editor.is_captured());
        let after = editor.scene().unwrap().get(id).unwrap().bounds();
        assert_eq!(before, after);
    }

    #[test]
    fn test_point_edit_toggle_cycle_on_clicks() {
        let mut editor = editor(200.0, 200.0);
        let mut polygon = crate::shapes::Polyline::polygon(vec![
            Point::new(20.0, 20.0),
            Point::new(60.0, 20.0),
            Point::new(60.0, 60.0),
            Point::new(20.0, 60.0),
        ]);
        polygon.style.fill_color = Some(SerializableColor::black());
        let id = editor
            .scene_mut()
            .unwrap()
            .add_shape(Shape::Polyline(polygon));

        // First click (away from the resize handles) selects.
        press(&mut editor, 40.0, 40.0);
        release(&mut editor, 40.0, 40.0);
        assert!(editor.selection().is_selected(id));
        assert!(!editor.selection().is_point_editing(id));

        // Second click enters point-edit mode.
        press(&mut editor, 40.0, 40.0);
        release(&mut editor, 40.0, 40.0);
        assert!(editor.selection().is_point_editing(id));
        assert_eq!(editor.visible_handles()[0].1.len(), 4);
    }

    #[test]
    fn test_vertex_drag_in_point_edit() {
        let mut editor = editor(200.0, 200.0);
        let id = editor.scene_mut().unwrap().add_shape(Shape::Polyline(
            crate::shapes::Polyline::open(vec![
                Point::new(20.0, 20.0),
                Point::new(60.0, 20.0),
                Point::new(60.0, 60.0),
            ]),
        ));
        editor.select_shape(id).unwrap();
        editor.toggle_shape(id).unwrap(); // enter point-edit

        press(&mut editor, 60.0, 20.0);
        drag(&mut editor, 80.0, 30.0);
        release(&mut editor, 80.0, 30.0);

        let shape = editor.scene().unwrap().get(id).unwrap();
        assert_eq!(
            shape.point_at(1, PointDepth::Simple).unwrap(),
            Point::new(80.0, 30.0)
        );
    }

    #[test]
    fn test_reorder_emits_event() {
        let mut editor = editor(200.0, 200.0);
        let a = add_rect(&mut editor, 10.0, 10.0, 20.0, 20.0);
        let _b = add_rect(&mut editor, 10.0, 10.0, 20.0, 20.0);

        editor.move_to_front(a).unwrap();
        let events = editor.drain_events();
        assert!(events.contains(&EditorEvent::ElementsReordered));
        assert!(editor.is_dirty());
    }

    struct FailingResources;

    impl ResourceProvider for FailingResources {
        fn prepare(&mut self, _shape: &Shape, done: Box<dyn FnOnce(EditResult<()>) + '_>) {
            done(Err(EditError::Resource("missing image".into())));
        }
    }

    #[test]
    fn test_resource_failure_commits_nothing() {
        let mut editor = editor(200.0, 200.0);
        editor.set_resource_provider(Some(Box::new(FailingResources)));

        let image = Shape::Image(crate::shapes::Image::new(
            Point::ZERO,
            Size::new(10.0, 10.0),
            "missing.png",
            Size::new(10.0, 10.0),
        ));
        assert!(editor.insert_shape(image).is_err());
        assert!(editor.scene().unwrap().is_empty());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_pointer_down_without_scene_is_noop() {
        let mut editor = SceneEditor::new();
        let captured = editor
            .pointer_down(Point::new(10.0, 10.0), MouseButton::Left, Modifiers::default())
            .unwrap();
        assert!(!captured);
    }

    #[test]
    fn test_snap_to_grid_move() {
        let mut editor = editor(200.0, 200.0);
        let id = add_rect(&mut editor, 12.0, 12.0, 20.0, 20.0);
        editor.select_shape(id).unwrap();
        editor.config_mut().snap_to_grid = true;
        editor.config_mut().set_grid_spacing(8.0);

        press(&mut editor, 22.0, 22.0);
        drag(&mut editor, 27.0, 27.0);
        release(&mut editor, 27.0, 27.0);

        let location = editor.scene().unwrap().get(id).unwrap().location();
        assert_eq!(location, Point::new(16.0, 16.0));
    }
}
