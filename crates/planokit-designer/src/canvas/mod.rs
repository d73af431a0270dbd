//! Canvas holding the floor-plan elements and the pointer state machine.
//!
//! The element collection sits behind an `Arc`: readers take a cheap
//! [`Canvas::snapshot`] and keep a consistent view while the canvas swaps in
//! a new collection on every mutation. Gesture state lives in
//! [`InteractionState`] and only reaches the collection on pointer-up.

mod interaction;
mod operations;
mod types;

pub use interaction::{resize_dimensions, resize_from_anchor};
pub use types::{
    rotate_handle_position, CanvasOutcome, DragSession, Handle, InteractionState, PanSession,
    ResizeHandle, ResizeSession, RotateSession, HANDLE_RADIUS, MIN_ELEMENT_SIZE,
    ROTATE_HANDLE_OFFSET, ROTATION_SNAP_DEGREES,
};

use std::sync::Arc;

use crate::model::FloorPlanElement;
use crate::selection_manager::SelectionManager;
use crate::validity::WALL_ADJACENCY_TOLERANCE;
use crate::viewport::Viewport;

/// Default snap grid spacing in plan units.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Editor settings the state machine consults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSettings {
    pub snap_enabled: bool,
    pub grid_size: f64,
    /// Maximum gap between a door/window and its wall.
    pub wall_tolerance: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            grid_size: DEFAULT_GRID_SIZE,
            wall_tolerance: WALL_ADJACENCY_TOLERANCE,
        }
    }
}

/// Canvas state managing elements, selection and pointer gestures.
#[derive(Debug, Clone)]
pub struct Canvas {
    elements: Arc<Vec<FloorPlanElement>>,
    revision: u64,
    pub selection_manager: SelectionManager,
    state: InteractionState,
    settings: CanvasSettings,
    move_mode: bool,
    viewport: Viewport,
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_settings(CanvasSettings::default())
    }

    pub fn with_settings(settings: CanvasSettings) -> Self {
        Self {
            elements: Arc::new(Vec::new()),
            revision: 0,
            selection_manager: SelectionManager::new(),
            state: InteractionState::Idle,
            settings,
            move_mode: false,
            viewport: Viewport::default(),
        }
    }

    /// Current elements in paint order (last is topmost).
    pub fn elements(&self) -> &[FloorPlanElement] {
        &self.elements
    }

    /// Shared, immutable view of the current elements.
    pub fn snapshot(&self) -> Arc<Vec<FloorPlanElement>> {
        Arc::clone(&self.elements)
    }

    /// Bumped on every committed change to the element collection.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn element(&self, id: &str) -> Option<&FloorPlanElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection_manager.selected_id()
    }

    pub fn selected_element(&self) -> Option<&FloorPlanElement> {
        self.selected_id().and_then(|id| self.element(id))
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: CanvasSettings) {
        self.settings = settings;
    }

    pub fn snap_enabled(&self) -> bool {
        self.settings.snap_enabled
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.settings.snap_enabled = enabled;
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.settings.snap_enabled = !self.settings.snap_enabled;
        self.settings.snap_enabled
    }

    /// Sets the grid spacing; non-positive or non-finite values are ignored.
    pub fn set_grid_size(&mut self, grid_size: f64) -> bool {
        if grid_size.is_finite() && grid_size > 0.0 {
            self.settings.grid_size = grid_size;
            true
        } else {
            tracing::warn!("Ignoring invalid grid size {}", grid_size);
            false
        }
    }

    pub fn move_mode(&self) -> bool {
        self.move_mode
    }

    /// Toggles move mode. Any gesture in flight is discarded.
    pub fn toggle_move_mode(&mut self) -> bool {
        self.cancel();
        self.move_mode = !self.move_mode;
        self.move_mode
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Applies `f` to a private copy of the collection and publishes it.
    fn mutate<R>(&mut self, f: impl FnOnce(&mut Vec<FloorPlanElement>) -> R) -> R {
        let result = f(Arc::make_mut(&mut self.elements));
        self.revision += 1;
        result
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}
