//! Pointer-driven state machine for Canvas.
//!
//! Pointer events arrive in screen coordinates and are mapped through the
//! viewport. Placement commits on pointer-down; drag, resize and rotate
//! commit on pointer-up, with grid snapping applied only at that point.

use uuid::Uuid;

use super::types::{
    CanvasOutcome, DragSession, Handle, InteractionState, PanSession, ResizeHandle, ResizeSession,
    RotateSession, MIN_ELEMENT_SIZE, ROTATION_SNAP_DEGREES,
};
use super::Canvas;
use crate::geometry::{angle_from, normalize_degrees, snap_point, snap_to_grid, Point};
use crate::model::{default_element_name, ElementType, FloorPlanElement};
use crate::validity::{attach_to_wall, find_parent_wall, GhostElement, InvalidReason};

/// Dimensions produced by dragging `handle` from `pointer_start` to
/// `pointer`, measured in the element's own (rotated) frame.
pub fn resize_dimensions(
    start: &FloorPlanElement,
    handle: ResizeHandle,
    pointer_start: Point,
    pointer: Point,
) -> (f64, f64) {
    let center = start.center();
    let from = pointer_start.rotated_around(&center, -start.rotation);
    let to = pointer.rotated_around(&center, -start.rotation);
    let (dir_x, dir_y) = handle.direction();
    let width = if dir_x != 0.0 {
        (start.width + dir_x * (to.x - from.x)).max(MIN_ELEMENT_SIZE)
    } else {
        start.width
    };
    let height = if dir_y != 0.0 {
        (start.height + dir_y * (to.y - from.y)).max(MIN_ELEMENT_SIZE)
    } else {
        start.height
    };
    (width, height)
}

/// Copy of `start` resized to `width × height` with the handle opposite to
/// `handle` left where it was.
pub fn resize_from_anchor(
    start: &FloorPlanElement,
    handle: ResizeHandle,
    width: f64,
    height: f64,
) -> FloorPlanElement {
    let (dir_x, dir_y) = handle.direction();
    let center = start.center();
    // Centre shift in the local frame: the anchor stays at -dir * size / 2.
    let local = Point::new(
        center.x + dir_x * (width - start.width) / 2.0,
        center.y + dir_y * (height - start.height) / 2.0,
    );
    let new_center = local.rotated_around(&center, start.rotation);

    let mut resized = start.clone();
    resized.width = width;
    resized.height = height;
    resized.x = new_center.x - width / 2.0;
    resized.y = new_center.y - height / 2.0;
    resized
}

impl Canvas {
    /// Selects a placement tool (`None` returns to plain selection).
    /// Clears the selection and any gesture or ghost.
    pub fn select_tool(&mut self, tool: Option<ElementType>) {
        self.cancel();
        self.selection_manager.clear();
        if let Some(tool) = tool {
            self.state = InteractionState::Placing { tool, ghost: None };
        }
        tracing::debug!("Tool changed to {:?}", tool);
    }

    pub fn active_tool(&self) -> Option<ElementType> {
        match &self.state {
            InteractionState::Placing { tool, .. } => Some(*tool),
            _ => None,
        }
    }

    pub fn ghost(&self) -> Option<&GhostElement> {
        match &self.state {
            InteractionState::Placing { ghost, .. } => ghost.as_ref(),
            _ => None,
        }
    }

    /// Discards the tool or gesture in flight without touching the model.
    pub fn cancel(&mut self) -> bool {
        if self.state.is_idle() {
            return false;
        }
        tracing::debug!("Cancelled {}", self.state.name());
        self.state = InteractionState::Idle;
        true
    }

    /// Clears the selection and discards any gesture.
    pub fn deselect(&mut self) -> bool {
        self.cancel();
        self.selection_manager.clear()
    }

    pub fn pointer_down(&mut self, screen_x: f64, screen_y: f64) -> CanvasOutcome {
        let point = self.viewport.screen_to_plan(screen_x, screen_y);
        match &self.state {
            InteractionState::Placing { tool, .. } => {
                let tool = *tool;
                self.place(tool, point)
            }
            InteractionState::Idle => self.begin_gesture(point, screen_x, screen_y),
            _ => CanvasOutcome::Unchanged,
        }
    }

    pub fn pointer_move(&mut self, screen_x: f64, screen_y: f64) -> CanvasOutcome {
        let point = self.viewport.screen_to_plan(screen_x, screen_y);
        let placement_point = self.placement_point(point);
        let tolerance = self.settings.wall_tolerance;

        match &mut self.state {
            InteractionState::Idle => CanvasOutcome::Unchanged,
            InteractionState::Placing { tool, ghost } => {
                *ghost = Some(GhostElement::compute(
                    *tool,
                    placement_point,
                    &self.elements,
                    tolerance,
                ));
                CanvasOutcome::GhostUpdated
            }
            InteractionState::Dragging(session) => {
                session.position = Point::new(
                    session.origin.x + point.x - session.pointer_start.x,
                    session.origin.y + point.y - session.pointer_start.y,
                );
                CanvasOutcome::Unchanged
            }
            InteractionState::Resizing(session) => {
                let (width, height) =
                    resize_dimensions(&session.start, session.handle, session.pointer_start, point);
                session.current = resize_from_anchor(&session.start, session.handle, width, height);
                CanvasOutcome::Unchanged
            }
            InteractionState::Rotating(session) => {
                session.rotation = angle_from(&session.center, &point);
                CanvasOutcome::Unchanged
            }
            InteractionState::Panning(session) => {
                self.viewport
                    .pan_by(screen_x - session.last_x, screen_y - session.last_y);
                session.last_x = screen_x;
                session.last_y = screen_y;
                CanvasOutcome::Panned
            }
        }
    }

    /// Ends the active gesture and commits it.
    pub fn pointer_up(&mut self, _screen_x: f64, _screen_y: f64) -> CanvasOutcome {
        let state = std::mem::take(&mut self.state);
        match state {
            InteractionState::Dragging(session) => self.commit_drag(session),
            InteractionState::Resizing(session) => self.commit_resize(session),
            InteractionState::Rotating(session) => self.commit_rotation(session),
            InteractionState::Placing { .. } => {
                self.state = state;
                CanvasOutcome::Unchanged
            }
            InteractionState::Panning(_) | InteractionState::Idle => CanvasOutcome::Unchanged,
        }
    }

    /// In-flight geometry of the element being placed, dragged, resized or
    /// rotated.
    pub fn preview(&self) -> Option<FloorPlanElement> {
        match &self.state {
            InteractionState::Placing { ghost, .. } => ghost.as_ref().map(|g| g.element.clone()),
            InteractionState::Dragging(session) => self.element(&session.element_id).map(|e| {
                let mut moved = e.clone();
                moved.x = session.position.x;
                moved.y = session.position.y;
                moved
            }),
            InteractionState::Resizing(session) => Some(session.current.clone()),
            InteractionState::Rotating(session) => self.element(&session.element_id).map(|e| {
                let mut turned = e.clone();
                turned.rotation = session.rotation;
                turned
            }),
            InteractionState::Panning(_) | InteractionState::Idle => None,
        }
    }

    /// Elements as they should be drawn right now: committed elements with
    /// the in-flight preview substituted, plus the ghost while placing.
    pub fn display_elements(&self) -> Vec<FloorPlanElement> {
        let mut elements = self.elements().to_vec();
        if let Some(preview) = self.preview() {
            match elements.iter_mut().find(|e| e.id == preview.id) {
                Some(slot) => *slot = preview,
                None => elements.push(preview),
            }
        }
        elements
    }

    fn placement_point(&self, point: Point) -> Point {
        if self.settings.snap_enabled {
            snap_point(point, self.settings.grid_size)
        } else {
            point
        }
    }

    fn place(&mut self, tool: ElementType, point: Point) -> CanvasOutcome {
        let tolerance = self.settings.wall_tolerance;
        let at = self.placement_point(point);
        let ghost = GhostElement::compute(tool, at, self.elements(), tolerance);

        if !ghost.is_valid() {
            let reason = ghost.reason.unwrap_or(InvalidReason::NeedsWallAdjacency);
            tracing::warn!("Rejected {} placement at ({}, {}): {}", tool, at.x, at.y, reason);
            self.state = InteractionState::Placing {
                tool,
                ghost: Some(ghost),
            };
            return CanvasOutcome::PlacementRejected(reason);
        }

        let mut element = ghost.element;
        element.id = format!("element-{}", Uuid::new_v4());
        element.name = Some(default_element_name(tool, self.elements()));
        if tool == ElementType::Window {
            if let Some(wall) = find_parent_wall(&element, self.elements(), tolerance) {
                let wall = wall.clone();
                attach_to_wall(&mut element, &wall);
            }
        }

        let id = element.id.clone();
        self.mutate(|all| all.push(element));
        self.selection_manager.select(id.clone());
        self.state = InteractionState::Idle;
        tracing::info!("Placed {} {} at ({}, {})", tool, id, at.x, at.y);
        CanvasOutcome::ElementCreated(id)
    }

    fn begin_gesture(&mut self, point: Point, screen_x: f64, screen_y: f64) -> CanvasOutcome {
        let pan = InteractionState::Panning(PanSession {
            last_x: screen_x,
            last_y: screen_y,
        });
        if self.move_mode {
            self.state = pan;
            return CanvasOutcome::Unchanged;
        }

        if let Some(selected) = self.selected_element().cloned() {
            match self.handle_at(&point) {
                Some(Handle::Resize(handle)) => {
                    tracing::debug!("Resizing {} from {:?}", selected.id, handle);
                    self.state = InteractionState::Resizing(ResizeSession {
                        handle,
                        pointer_start: point,
                        current: selected.clone(),
                        start: selected,
                    });
                    return CanvasOutcome::Unchanged;
                }
                Some(Handle::Rotate) => {
                    tracing::debug!("Rotating {}", selected.id);
                    self.state = InteractionState::Rotating(RotateSession {
                        center: selected.center(),
                        start_rotation: selected.rotation,
                        rotation: selected.rotation,
                        element_id: selected.id,
                    });
                    return CanvasOutcome::Unchanged;
                }
                None => {}
            }
        }

        let hit = self
            .element_at(&point, 0.0)
            .map(|e| (e.id.clone(), Point::new(e.x, e.y)));
        match hit {
            Some((id, origin)) => {
                let changed = self.selection_manager.select(id.clone());
                self.state = InteractionState::Dragging(DragSession {
                    element_id: id.clone(),
                    pointer_start: point,
                    origin,
                    position: origin,
                });
                if changed {
                    CanvasOutcome::SelectionChanged(Some(id))
                } else {
                    CanvasOutcome::Unchanged
                }
            }
            None => {
                let changed = self.selection_manager.clear();
                self.state = pan;
                if changed {
                    CanvasOutcome::SelectionChanged(None)
                } else {
                    CanvasOutcome::Unchanged
                }
            }
        }
    }

    fn commit_drag(&mut self, session: DragSession) -> CanvasOutcome {
        if !session.moved() {
            return CanvasOutcome::Unchanged;
        }
        let position = self.placement_point(session.position);
        self.commit(&session.element_id, |e| {
            e.x = position.x;
            e.y = position.y;
        })
    }

    fn commit_resize(&mut self, session: ResizeSession) -> CanvasOutcome {
        if session.current == session.start {
            return CanvasOutcome::Unchanged;
        }
        let mut width = session.current.width;
        let mut height = session.current.height;
        if self.settings.snap_enabled {
            let grid = self.settings.grid_size;
            let (dir_x, dir_y) = session.handle.direction();
            if dir_x != 0.0 {
                width = snap_to_grid(width, grid).max(MIN_ELEMENT_SIZE);
            }
            if dir_y != 0.0 {
                height = snap_to_grid(height, grid).max(MIN_ELEMENT_SIZE);
            }
        }
        let resized = resize_from_anchor(&session.start, session.handle, width, height);
        self.commit(&session.start.id, |e| {
            e.x = resized.x;
            e.y = resized.y;
            e.width = resized.width;
            e.height = resized.height;
        })
    }

    fn commit_rotation(&mut self, session: RotateSession) -> CanvasOutcome {
        if session.rotation == session.start_rotation {
            return CanvasOutcome::Unchanged;
        }
        let rotation = if self.settings.snap_enabled {
            snap_to_grid(session.rotation, ROTATION_SNAP_DEGREES)
        } else {
            session.rotation
        };
        self.commit(&session.element_id, |e| e.rotation = normalize_degrees(rotation))
    }

    fn commit(&mut self, id: &str, edit: impl FnOnce(&mut FloorPlanElement)) -> CanvasOutcome {
        match self.update_element(id, edit) {
            Ok(()) => {
                tracing::debug!("Committed gesture on {}", id);
                CanvasOutcome::ElementCommitted(id.to_string())
            }
            Err(e) => {
                tracing::warn!("Discarded gesture on {}: {}", id, e);
                CanvasOutcome::Unchanged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new();
        canvas
            .add_element(
                FloorPlanElement::new("wall-1", ElementType::Wall, 100.0, 100.0).with_size(200.0, 20.0),
            )
            .unwrap();
        canvas
    }

    #[test]
    fn test_place_valid_door() {
        let mut canvas = canvas();
        canvas.select_tool(Some(ElementType::Door));
        assert_eq!(canvas.pointer_move(150.0, 95.0), CanvasOutcome::GhostUpdated);
        assert!(canvas.ghost().unwrap().is_valid());

        let outcome = canvas.pointer_down(150.0, 95.0);
        let CanvasOutcome::ElementCreated(id) = outcome else {
            panic!("expected a new element, got {:?}", outcome);
        };
        assert!(id.starts_with("element-"));
        assert_eq!(canvas.selected_id(), Some(id.as_str()));
        assert!(canvas.state().is_idle());
        let door = canvas.element(&id).unwrap();
        assert_eq!(door.name.as_deref(), Some("Door 1"));
        // Snapped to the 20 grid
        assert_eq!((door.x, door.y), (160.0, 100.0));
    }

    #[test]
    fn test_invalid_click_keeps_placing() {
        let mut canvas = canvas();
        canvas.select_tool(Some(ElementType::Door));
        assert_eq!(
            canvas.pointer_down(150.0, 400.0),
            CanvasOutcome::PlacementRejected(InvalidReason::NeedsWallAdjacency)
        );
        assert_eq!(canvas.active_tool(), Some(ElementType::Door));
        assert_eq!(canvas.element_count(), 1);
        assert_eq!(canvas.ghost().unwrap().element.valid, Some(false));
    }

    #[test]
    fn test_window_attaches_to_wall() {
        let mut canvas = canvas();
        canvas.set_snap_enabled(false);
        canvas.select_tool(Some(ElementType::Window));
        let CanvasOutcome::ElementCreated(id) = canvas.pointer_down(120.0, 105.0) else {
            panic!("window should be placed");
        };
        let window = canvas.element(&id).unwrap();
        assert_eq!(window.parent_wall_id.as_deref(), Some("wall-1"));
        assert_eq!(window.window_top_distance, Some(20.0));
    }

    #[test]
    fn test_drag_commits_snapped_on_release() {
        let mut canvas = canvas();
        canvas.pointer_down(150.0, 110.0);
        assert_eq!(canvas.selected_id(), Some("wall-1"));
        canvas.pointer_move(163.0, 117.0);
        assert_eq!(canvas.element("wall-1").unwrap().x, 100.0);
        assert_eq!(canvas.preview().unwrap().x, 113.0);

        let outcome = canvas.pointer_up(163.0, 117.0);
        assert_eq!(outcome, CanvasOutcome::ElementCommitted("wall-1".into()));
        let wall = canvas.element("wall-1").unwrap();
        assert_eq!((wall.x, wall.y), (120.0, 100.0));
        assert!(canvas.state().is_idle());
    }

    #[test]
    fn test_click_without_move_changes_nothing() {
        let mut canvas = canvas();
        let revision = canvas.revision();
        canvas.pointer_down(150.0, 110.0);
        assert_eq!(canvas.pointer_up(150.0, 110.0), CanvasOutcome::Unchanged);
        assert_eq!(canvas.revision(), revision);
    }

    #[test]
    fn test_empty_click_deselects_and_pans() {
        let mut canvas = canvas();
        canvas.selection_manager.select("wall-1");
        assert_eq!(canvas.pointer_down(600.0, 600.0), CanvasOutcome::SelectionChanged(None));
        assert_eq!(canvas.pointer_move(610.0, 590.0), CanvasOutcome::Panned);
        assert_eq!(canvas.viewport().offset(), (10.0, -10.0));
        canvas.pointer_up(610.0, 590.0);
        assert!(canvas.state().is_idle());
    }

    #[test]
    fn test_move_mode_never_selects() {
        let mut canvas = canvas();
        canvas.toggle_move_mode();
        assert_eq!(canvas.pointer_down(150.0, 110.0), CanvasOutcome::Unchanged);
        assert_eq!(canvas.selected_id(), None);
        assert!(matches!(canvas.state(), InteractionState::Panning(_)));
    }

    #[test]
    fn test_resize_west_keeps_east_edge() {
        let mut canvas = canvas();
        canvas.set_snap_enabled(false);
        canvas.selection_manager.select("wall-1");
        // West handle sits at (100, 110)
        canvas.pointer_down(100.0, 110.0);
        assert!(matches!(canvas.state(), InteractionState::Resizing(_)));
        canvas.pointer_move(60.0, 130.0);
        canvas.pointer_up(60.0, 130.0);
        let wall = canvas.element("wall-1").unwrap();
        assert_eq!((wall.x, wall.width), (60.0, 240.0));
        assert_eq!((wall.y, wall.height), (100.0, 20.0));
    }

    #[test]
    fn test_resize_clamps_minimum() {
        let mut canvas = canvas();
        canvas.set_snap_enabled(false);
        canvas.selection_manager.select("wall-1");
        canvas.pointer_down(300.0, 120.0);
        canvas.pointer_move(0.0, 0.0);
        canvas.pointer_up(0.0, 0.0);
        let wall = canvas.element("wall-1").unwrap();
        assert_eq!((wall.x, wall.y, wall.width, wall.height), (100.0, 100.0, 10.0, 10.0));
    }

    #[test]
    fn test_rotate_snaps_to_fifteen_degrees() {
        let mut canvas = canvas();
        canvas.selection_manager.select("wall-1");
        // Rotate handle above the top edge, centre is (200, 110)
        canvas.pointer_down(200.0, 75.0);
        assert!(matches!(canvas.state(), InteractionState::Rotating(_)));
        // About 48 degrees below the east axis
        canvas.pointer_move(236.0, 150.0);
        canvas.pointer_up(236.0, 150.0);
        assert_eq!(canvas.element("wall-1").unwrap().rotation, 45.0);
    }

    #[test]
    fn test_rotate_takes_pointer_angle_from_centre() {
        let mut canvas = canvas();
        canvas.set_snap_enabled(false);
        canvas.selection_manager.select("wall-1");
        canvas.pointer_down(200.0, 75.0);
        canvas.pointer_move(200.0, 160.0);
        assert!((canvas.preview().unwrap().rotation - 90.0).abs() < 1e-9);
        canvas.pointer_up(200.0, 160.0);
        assert!((canvas.element("wall-1").unwrap().rotation - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_due_east_stores_zero() {
        let mut canvas = canvas();
        canvas.set_snap_enabled(false);
        canvas.set_rotation("wall-1", 90.0).unwrap();
        canvas.selection_manager.select("wall-1");
        let grab = crate::canvas::rotate_handle_position(
            canvas.element("wall-1").unwrap(),
            crate::canvas::ROTATE_HANDLE_OFFSET,
        );
        canvas.pointer_down(grab.x, grab.y);
        assert!(matches!(canvas.state(), InteractionState::Rotating(_)));
        canvas.pointer_move(300.0, 110.0);
        assert_eq!(canvas.pointer_up(300.0, 110.0), CanvasOutcome::ElementCommitted("wall-1".into()));
        assert_eq!(canvas.element("wall-1").unwrap().rotation, 0.0);
    }

    #[test]
    fn test_cancel_discards_gesture() {
        let mut canvas = canvas();
        canvas.pointer_down(150.0, 110.0);
        canvas.pointer_move(400.0, 400.0);
        assert!(canvas.cancel());
        assert_eq!(canvas.pointer_up(400.0, 400.0), CanvasOutcome::Unchanged);
        assert_eq!(canvas.element("wall-1").unwrap().x, 100.0);
    }

    #[test]
    fn test_tool_change_clears_ghost_and_selection() {
        let mut canvas = canvas();
        canvas.selection_manager.select("wall-1");
        canvas.select_tool(Some(ElementType::Shelf));
        assert_eq!(canvas.selected_id(), None);
        canvas.pointer_move(500.0, 500.0);
        assert!(canvas.ghost().is_some());
        canvas.select_tool(Some(ElementType::Door));
        assert!(canvas.ghost().is_none());
        canvas.select_tool(None);
        assert!(canvas.state().is_idle());
    }

    #[test]
    fn test_display_elements_include_ghost() {
        let mut canvas = canvas();
        canvas.select_tool(Some(ElementType::Shelf));
        canvas.pointer_move(500.0, 500.0);
        let shown = canvas.display_elements();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[1].id, GhostElement::ID);
    }
}
