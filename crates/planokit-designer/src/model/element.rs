use serde::{Deserialize, Serialize};

use planokit_core::GeometryError;

use super::ElementType;
use crate::geometry::{normalize_degrees, Bounds, Point};

/// A placed 2D element of a floor plan.
///
/// `(x, y)` is the top-left corner of the unrotated footprint;
/// `rotation` turns the footprint around its centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlanElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Extrusion above the floor; becomes the scene height.
    #[serde(default)]
    pub depth: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    /// Wall a window was placed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_wall_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_top_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_bottom_distance: Option<f64>,
}

impl FloorPlanElement {
    /// Creates an element of `element_type` at `(x, y)` with the type's default size.
    pub fn new(id: impl Into<String>, element_type: ElementType, x: f64, y: f64) -> Self {
        let d = element_type.default_dimensions();
        Self {
            id: id.into(),
            element_type,
            x,
            y,
            width: d.width,
            height: d.height,
            depth: d.depth,
            rotation: 0.0,
            name: None,
            valid: None,
            parent_wall_id: None,
            window_top_distance: None,
            window_bottom_distance: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = normalize_degrees(degrees);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name shown in lists, falling back to the type label.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.element_type.label())
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Axis-aligned bounds of the rotated footprint.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_rotated_rect(self.x, self.y, self.width, self.height, self.rotation)
    }

    /// Hit test against the rotated footprint, grown by `tolerance`.
    pub fn contains_point(&self, point: &Point, tolerance: f64) -> bool {
        let local = point.rotated_around(&self.center(), -self.rotation);
        local.x >= self.x - tolerance
            && local.x <= self.x + self.width + tolerance
            && local.y >= self.y - tolerance
            && local.y <= self.y + self.height + tolerance
    }

    pub fn is_furniture_capable(&self) -> bool {
        self.element_type.is_furniture_capable()
    }

    /// Checks the model invariants: finite numbers, positive dimensions,
    /// rotation in `[0, 360)`.
    pub fn validate(&self) -> Result<(), GeometryError> {
        for (field, value) in [
            ("x", self.x),
            ("y", self.y),
            ("rotation", self.rotation),
        ] {
            if !value.is_finite() {
                return Err(GeometryError::NonFinite {
                    element_id: self.id.clone(),
                    field,
                });
            }
        }
        for (dimension, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ] {
            if !value.is_finite() {
                return Err(GeometryError::NonFinite {
                    element_id: self.id.clone(),
                    field: dimension,
                });
            }
            if value <= 0.0 {
                return Err(GeometryError::NonPositiveDimension {
                    element_id: self.id.clone(),
                    dimension,
                    value,
                });
            }
        }
        if !(0.0..360.0).contains(&self.rotation) {
            return Err(GeometryError::RotationOutOfRange {
                element_id: self.id.clone(),
                rotation: self.rotation,
            });
        }
        Ok(())
    }

    /// Folds the rotation into `[0, 360)`.
    pub fn normalize_rotation(&mut self) {
        self.rotation = normalize_degrees(self.rotation);
    }
}

/// Default name for the `n`-th element of a type, e.g. `"Wall 3"`.
pub fn default_element_name(element_type: ElementType, existing: &[FloorPlanElement]) -> String {
    let count = existing
        .iter()
        .filter(|e| e.element_type == element_type)
        .count();
    format!("{} {}", element_type.label(), count + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_type_defaults() {
        let door = FloorPlanElement::new("d1", ElementType::Door, 150.0, 95.0);
        assert_eq!((door.width, door.height, door.depth), (80.0, 10.0, 10.0));
        assert_eq!(door.display_name(), "Door");
    }

    #[test]
    fn test_wire_format() {
        let mut window = FloorPlanElement::new("w1", ElementType::Window, 0.0, 0.0);
        window.parent_wall_id = Some("wall-1".to_string());
        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(json["type"], "window");
        assert_eq!(json["parentWallId"], "wall-1");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_validate() {
        let ok = FloorPlanElement::new("e", ElementType::Shelf, 0.0, 0.0);
        assert!(ok.validate().is_ok());

        let flat = ok.clone().with_size(0.0, 10.0);
        assert!(matches!(
            flat.validate(),
            Err(GeometryError::NonPositiveDimension {
                dimension: "width",
                ..
            })
        ));

        let mut spun = ok.clone();
        spun.rotation = 360.0;
        assert!(spun.validate().is_err());
        spun.normalize_rotation();
        assert!(spun.validate().is_ok());
    }

    #[test]
    fn test_contains_point_rotated() {
        let wall = FloorPlanElement::new("w", ElementType::Wall, 0.0, 0.0).with_rotation(90.0);
        // Rotated 90 degrees around (100, 5): spans x 95..105, y -95..105
        assert!(wall.contains_point(&Point::new(100.0, -80.0), 0.0));
        assert!(!wall.contains_point(&Point::new(180.0, 5.0), 0.0));
    }

    #[test]
    fn test_default_element_name() {
        let existing = vec![
            FloorPlanElement::new("a", ElementType::Wall, 0.0, 0.0),
            FloorPlanElement::new("b", ElementType::Wall, 0.0, 0.0),
            FloorPlanElement::new("c", ElementType::Door, 0.0, 0.0),
        ];
        assert_eq!(default_element_name(ElementType::Wall, &existing), "Wall 3");
        assert_eq!(default_element_name(ElementType::Gondola, &existing), "Gondola 1");
    }
}
