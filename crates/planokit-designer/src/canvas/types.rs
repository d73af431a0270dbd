//! Canvas type definitions: handles, gesture sessions, interaction states and
//! pointer outcomes.

use crate::geometry::Point;
use crate::model::{ElementType, FloorPlanElement};
use crate::validity::{GhostElement, InvalidReason};

/// Smallest width or height a resize may produce, in plan units.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

/// Rotation snapping step in degrees.
pub const ROTATION_SNAP_DEGREES: f64 = 15.0;

/// Hit radius of a handle, in screen pixels.
pub const HANDLE_RADIUS: f64 = 8.0;

/// Distance of the rotate handle above the top edge, in screen pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// The eight compass resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::North,
        ResizeHandle::NorthEast,
        ResizeHandle::East,
        ResizeHandle::SouthEast,
        ResizeHandle::South,
        ResizeHandle::SouthWest,
        ResizeHandle::West,
        ResizeHandle::NorthWest,
    ];

    /// Direction of the handle in the element's local frame, each axis in
    /// `{-1, 0, 1}`. Zero means the axis is not resized.
    pub fn direction(&self) -> (f64, f64) {
        match self {
            ResizeHandle::North => (0.0, -1.0),
            ResizeHandle::NorthEast => (1.0, -1.0),
            ResizeHandle::East => (1.0, 0.0),
            ResizeHandle::SouthEast => (1.0, 1.0),
            ResizeHandle::South => (0.0, 1.0),
            ResizeHandle::SouthWest => (-1.0, 1.0),
            ResizeHandle::West => (-1.0, 0.0),
            ResizeHandle::NorthWest => (-1.0, -1.0),
        }
    }

    pub fn opposite(&self) -> ResizeHandle {
        match self {
            ResizeHandle::North => ResizeHandle::South,
            ResizeHandle::NorthEast => ResizeHandle::SouthWest,
            ResizeHandle::East => ResizeHandle::West,
            ResizeHandle::SouthEast => ResizeHandle::NorthWest,
            ResizeHandle::South => ResizeHandle::North,
            ResizeHandle::SouthWest => ResizeHandle::NorthEast,
            ResizeHandle::West => ResizeHandle::East,
            ResizeHandle::NorthWest => ResizeHandle::SouthEast,
        }
    }

    pub fn is_corner(&self) -> bool {
        let (dx, dy) = self.direction();
        dx != 0.0 && dy != 0.0
    }

    /// World position of this handle on `element`, following its rotation.
    pub fn position(&self, element: &FloorPlanElement) -> Point {
        let center = element.center();
        let (dx, dy) = self.direction();
        let local = Point::new(
            center.x + dx * element.width / 2.0,
            center.y + dy * element.height / 2.0,
        );
        local.rotated_around(&center, element.rotation)
    }
}

/// Anything grabbable on the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Resize(ResizeHandle),
    Rotate,
}

/// World position of the rotate handle, `offset` plan units above the top edge.
pub fn rotate_handle_position(element: &FloorPlanElement, offset: f64) -> Point {
    let center = element.center();
    Point::new(center.x, element.y - offset).rotated_around(&center, element.rotation)
}

/// Drag in progress. Positions are plan coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub element_id: String,
    pub pointer_start: Point,
    pub origin: Point,
    pub position: Point,
}

impl DragSession {
    pub fn moved(&self) -> bool {
        self.position != self.origin
    }
}

/// Resize in progress. `start` is the element as it was on pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub handle: ResizeHandle,
    pub start: FloorPlanElement,
    pub pointer_start: Point,
    pub current: FloorPlanElement,
}

/// Rotation in progress around the element centre.
#[derive(Debug, Clone, PartialEq)]
pub struct RotateSession {
    pub element_id: String,
    pub center: Point,
    pub start_rotation: f64,
    pub rotation: f64,
}

/// Canvas pan in progress, tracked in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSession {
    pub last_x: f64,
    pub last_y: f64,
}

/// Where the pointer state machine currently is.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Placing {
        tool: ElementType,
        ghost: Option<GhostElement>,
    },
    Dragging(DragSession),
    Resizing(ResizeSession),
    Rotating(RotateSession),
    Panning(PanSession),
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Placing { .. } => "placing",
            InteractionState::Dragging(_) => "dragging",
            InteractionState::Resizing(_) => "resizing",
            InteractionState::Rotating(_) => "rotating",
            InteractionState::Panning(_) => "panning",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// True while a pointer gesture is held down.
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            InteractionState::Dragging(_)
                | InteractionState::Resizing(_)
                | InteractionState::Rotating(_)
                | InteractionState::Panning(_)
        )
    }
}

/// Result of feeding a pointer event to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOutcome {
    /// Nothing the model or selection cares about changed.
    Unchanged,
    SelectionChanged(Option<String>),
    /// The ghost moved while placing.
    GhostUpdated,
    PlacementRejected(InvalidReason),
    ElementCreated(String),
    /// A gesture ended and changed the element.
    ElementCommitted(String),
    Panned,
}
