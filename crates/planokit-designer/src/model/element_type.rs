use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use planokit_core::GeometryError;

/// Kind of a floor-plan element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Wall,
    Door,
    Window,
    Shelf,
    Rack,
    Display,
    Table,
    Fridge,
    Planogram,
    Gondola,
    Line,
    Rectangle,
    Circle,
    Chair,
    Sofa,
    Bed,
    Plant,
    Counter,
    Cashier,
    Mannequin,
    Cube,
}

/// Default footprint and extrusion of a freshly placed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

const fn dims(width: f64, height: f64, depth: f64) -> DefaultDimensions {
    DefaultDimensions {
        width,
        height,
        depth,
    }
}

impl ElementType {
    pub const ALL: [ElementType; 21] = [
        ElementType::Wall,
        ElementType::Door,
        ElementType::Window,
        ElementType::Shelf,
        ElementType::Rack,
        ElementType::Display,
        ElementType::Table,
        ElementType::Fridge,
        ElementType::Planogram,
        ElementType::Gondola,
        ElementType::Line,
        ElementType::Rectangle,
        ElementType::Circle,
        ElementType::Chair,
        ElementType::Sofa,
        ElementType::Bed,
        ElementType::Plant,
        ElementType::Counter,
        ElementType::Cashier,
        ElementType::Mannequin,
        ElementType::Cube,
    ];

    /// Types that can be paired with a furniture template.
    pub const FURNITURE_CAPABLE: [ElementType; 11] = [
        ElementType::Shelf,
        ElementType::Display,
        ElementType::Table,
        ElementType::Fridge,
        ElementType::Planogram,
        ElementType::Gondola,
        ElementType::Counter,
        ElementType::Cashier,
        ElementType::Rack,
        ElementType::Mannequin,
        ElementType::Cube,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Wall => "wall",
            ElementType::Door => "door",
            ElementType::Window => "window",
            ElementType::Shelf => "shelf",
            ElementType::Rack => "rack",
            ElementType::Display => "display",
            ElementType::Table => "table",
            ElementType::Fridge => "fridge",
            ElementType::Planogram => "planogram",
            ElementType::Gondola => "gondola",
            ElementType::Line => "line",
            ElementType::Rectangle => "rectangle",
            ElementType::Circle => "circle",
            ElementType::Chair => "chair",
            ElementType::Sofa => "sofa",
            ElementType::Bed => "bed",
            ElementType::Plant => "plant",
            ElementType::Counter => "counter",
            ElementType::Cashier => "cashier",
            ElementType::Mannequin => "mannequin",
            ElementType::Cube => "cube",
        }
    }

    /// Human-readable label, also the stem of default element names.
    pub fn label(&self) -> &'static str {
        match self {
            ElementType::Wall => "Wall",
            ElementType::Door => "Door",
            ElementType::Window => "Window",
            ElementType::Shelf => "Shelf",
            ElementType::Rack => "Rack",
            ElementType::Display => "Display",
            ElementType::Table => "Table",
            ElementType::Fridge => "Fridge",
            ElementType::Planogram => "Planogram",
            ElementType::Gondola => "Gondola",
            ElementType::Line => "Line",
            ElementType::Rectangle => "Rectangle",
            ElementType::Circle => "Circle",
            ElementType::Chair => "Chair",
            ElementType::Sofa => "Sofa",
            ElementType::Bed => "Bed",
            ElementType::Plant => "Plant",
            ElementType::Counter => "Counter",
            ElementType::Cashier => "Cashier",
            ElementType::Mannequin => "Mannequin",
            ElementType::Cube => "Cube",
        }
    }

    /// Fill colour used by the 2D canvas and the 3D viewer.
    pub fn color(&self) -> &'static str {
        match self {
            ElementType::Wall => "#555555",
            ElementType::Door => "#8B4513",
            ElementType::Window => "#87CEEB",
            ElementType::Shelf => "#A0522D",
            ElementType::Rack => "#708090",
            ElementType::Display => "#4682B4",
            ElementType::Table => "#CD853F",
            ElementType::Fridge => "#B0C4DE",
            ElementType::Line => "#333333",
            ElementType::Rectangle => "#5D8AA8",
            ElementType::Circle => "#6495ED",
            ElementType::Chair => "#8B8970",
            ElementType::Sofa => "#9370DB",
            ElementType::Bed => "#8B008B",
            ElementType::Plant => "#228B22",
            ElementType::Counter => "#D2691E",
            ElementType::Cashier => "#FF7F50",
            ElementType::Mannequin => "#E6E6FA",
            ElementType::Gondola => "#20B2AA",
            ElementType::Planogram | ElementType::Cube => "#CCCCCC",
        }
    }

    pub fn default_dimensions(&self) -> DefaultDimensions {
        match self {
            ElementType::Wall => dims(200.0, 10.0, 100.0),
            ElementType::Door => dims(80.0, 10.0, 10.0),
            ElementType::Window => dims(100.0, 10.0, 10.0),
            ElementType::Shelf | ElementType::Display => dims(120.0, 40.0, 60.0),
            ElementType::Rack => dims(80.0, 80.0, 40.0),
            ElementType::Table => dims(100.0, 100.0, 30.0),
            ElementType::Fridge => dims(80.0, 60.0, 80.0),
            ElementType::Planogram => dims(150.0, 40.0, 80.0),
            ElementType::Gondola => dims(200.0, 60.0, 100.0),
            ElementType::Line => dims(100.0, 2.0, 2.0),
            ElementType::Rectangle => dims(80.0, 60.0, 2.0),
            ElementType::Circle => dims(60.0, 60.0, 2.0),
            ElementType::Chair => dims(40.0, 40.0, 40.0),
            ElementType::Sofa => dims(120.0, 60.0, 40.0),
            ElementType::Bed => dims(140.0, 200.0, 40.0),
            ElementType::Plant => dims(40.0, 40.0, 80.0),
            ElementType::Counter => dims(150.0, 60.0, 40.0),
            ElementType::Cashier => dims(100.0, 80.0, 60.0),
            ElementType::Mannequin => dims(40.0, 40.0, 180.0),
            ElementType::Cube => dims(120.0, 120.0, 120.0),
        }
    }

    pub fn is_furniture_capable(&self) -> bool {
        Self::FURNITURE_CAPABLE.contains(self)
    }

    /// Doors and windows must sit against a wall.
    pub fn requires_wall(&self) -> bool {
        matches!(self, ElementType::Door | ElementType::Window)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ElementType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| GeometryError::UnknownElementType {
                name: s.to_string(),
            })
    }
}
