//! Projection of floor-plan elements into the 3D store scene.
//!
//! The plan's vertical axis (`y`, `height`) becomes scene depth (`z`), and the
//! element extrusion (`depth`) becomes scene height. All functions are pure and
//! can be re-derived from an element at any time.

use serde::{Deserialize, Serialize};

use planokit_core::units::{plan_to_meters, PIXELS_PER_METER};

use crate::geometry::{Bounds, Point};
use crate::model::FloorPlanElement;

/// Default room footprint of the store scene, in metres.
pub const DEFAULT_ROOM_SIZE: f64 = 20.0;

/// Box transform for rendering an element in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneTransform {
    pub x: f64,
    /// Centre of the box above the floor.
    pub y: f64,
    pub z: f64,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub rotation_rad: f64,
}

/// Position of matched furniture in the store scene, metres.
///
/// `rotation` stays in degrees; renderers convert when needed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenePlacement {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotation: f64,
}

/// Projects an element into scene space.
pub fn to_scene(element: &FloorPlanElement, room_width: f64, room_depth: f64) -> SceneTransform {
    SceneTransform {
        x: element.x - room_width / 2.0,
        y: element.depth / 2.0,
        z: element.y - room_depth / 2.0,
        width: element.width,
        depth: element.height,
        height: element.depth,
        rotation_rad: element.rotation.to_radians(),
    }
}

/// Position at which matched furniture is dropped into the store scene.
pub fn auto_placement(element: &FloorPlanElement, room_width: f64, room_depth: f64) -> ScenePlacement {
    ScenePlacement {
        x: element.x / PIXELS_PER_METER - room_width / 4.0 + element.width / (2.0 * PIXELS_PER_METER),
        y: 0.0,
        z: element.y / PIXELS_PER_METER - room_depth / 4.0
            + element.height / (2.0 * PIXELS_PER_METER),
        rotation: element.rotation,
    }
}

/// Union of the element footprints.
pub fn plan_bounds(elements: &[FloorPlanElement]) -> Option<Bounds> {
    elements
        .iter()
        .map(FloorPlanElement::bounds)
        .reduce(|a, b| a.union(&b))
}

/// Centre of the plan, origin when empty. Used to centre the camera.
pub fn plan_center(elements: &[FloorPlanElement]) -> Point {
    plan_bounds(elements)
        .map(|b| b.center())
        .unwrap_or_default()
}

/// Room size in metres that encloses the plan, never smaller than `minimum`.
pub fn room_extent(elements: &[FloorPlanElement], minimum: f64) -> (f64, f64) {
    match plan_bounds(elements) {
        Some(b) => (
            plan_to_meters(b.width()).max(minimum),
            plan_to_meters(b.height()).max(minimum),
        ),
        None => (minimum, minimum),
    }
}
