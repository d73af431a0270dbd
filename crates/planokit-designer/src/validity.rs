//! Placement validity rules.
//!
//! Doors and windows must sit against a wall: the axis-aligned gap between
//! the candidate footprint and some wall must not exceed the adjacency
//! tolerance on either axis. Every other element type may be placed
//! anywhere; overlaps between furniture are not checked.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::model::{ElementType, FloorPlanElement};

/// Default distance, in plan units, a door or window may sit from a wall.
pub const WALL_ADJACENCY_TOLERANCE: f64 = 10.0;

/// Cap for the default window top/bottom distances.
const MAX_WINDOW_MARGIN: f64 = 20.0;

/// Why a placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidReason {
    NeedsWallAdjacency,
}

impl InvalidReason {
    /// Stable code surfaced to presentation layers.
    pub fn code(&self) -> &'static str {
        match self {
            InvalidReason::NeedsWallAdjacency => "needs-wall-adjacency",
        }
    }

    pub fn message(&self, element_type: ElementType) -> &'static str {
        match (self, element_type) {
            (InvalidReason::NeedsWallAdjacency, ElementType::Window) => "Must be placed on a wall",
            (InvalidReason::NeedsWallAdjacency, _) => "Must be placed next to a wall",
        }
    }
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of a validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub valid: bool,
    pub reason: Option<InvalidReason>,
}

impl Placement {
    pub const VALID: Placement = Placement {
        valid: true,
        reason: None,
    };

    pub fn invalid(reason: InvalidReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Nearest wall within `tolerance` of `candidate`, ignoring the candidate itself.
pub fn find_parent_wall<'a>(
    candidate: &FloorPlanElement,
    elements: &'a [FloorPlanElement],
    tolerance: f64,
) -> Option<&'a FloorPlanElement> {
    let bounds = candidate.bounds();
    elements
        .iter()
        .filter(|e| e.element_type == ElementType::Wall && e.id != candidate.id)
        .filter_map(|wall| {
            let (gap_x, gap_y) = wall.bounds().gap(&bounds);
            (gap_x <= tolerance && gap_y <= tolerance).then_some((wall, gap_x.max(gap_y)))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(wall, _)| wall)
}

/// Checks whether `candidate` may be placed among `elements`.
pub fn check_placement(
    candidate: &FloorPlanElement,
    elements: &[FloorPlanElement],
    tolerance: f64,
) -> Placement {
    if !candidate.element_type.requires_wall() {
        return Placement::VALID;
    }
    match find_parent_wall(candidate, elements, tolerance) {
        Some(_) => Placement::VALID,
        None => Placement::invalid(InvalidReason::NeedsWallAdjacency),
    }
}

/// Links a window to the wall it sits on and fills the default
/// top/bottom distances when they are unset.
pub fn attach_to_wall(window: &mut FloorPlanElement, wall: &FloorPlanElement) {
    let margin = (wall.depth * 0.2).min(MAX_WINDOW_MARGIN);
    window.parent_wall_id = Some(wall.id.clone());
    window.window_top_distance.get_or_insert(margin);
    window.window_bottom_distance.get_or_insert(margin);
}

/// Transient preview of a placement in progress. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostElement {
    pub element: FloorPlanElement,
    pub reason: Option<InvalidReason>,
}

impl GhostElement {
    pub const ID: &'static str = "ghost";

    /// Builds the preview of `tool` with its top-left corner at `at`.
    pub fn compute(
        tool: ElementType,
        at: Point,
        elements: &[FloorPlanElement],
        tolerance: f64,
    ) -> Self {
        let mut element = FloorPlanElement::new(Self::ID, tool, at.x, at.y);
        let placement = check_placement(&element, elements, tolerance);
        element.valid = Some(placement.valid);
        Self {
            element,
            reason: placement.reason,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.element.valid.unwrap_or(true)
    }
}
