use serde::{Deserialize, Serialize};

use planokit_core::GeometryError;

use crate::furniture::FurnitureType;

/// How products are drawn inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Units packed into a small grid.
    #[default]
    Compact,
    Spaced,
}

impl DisplayMode {
    pub fn toggled(&self) -> Self {
        match self {
            DisplayMode::Compact => DisplayMode::Spaced,
            DisplayMode::Spaced => DisplayMode::Compact,
        }
    }
}

/// Physical size of the furniture in metres, used by the 3D preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FurnitureDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub base_height: f64,
    pub shelf_thickness: f64,
}

impl Default for FurnitureDimensions {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 4.0,
            depth: 1.2,
            base_height: 0.3,
            shelf_thickness: 0.05,
        }
    }
}

/// Face layout of a four-sided shelves display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelvesConfig {
    pub rows: u32,
    /// Columns of the front face, and of the back face.
    pub front_back_columns: u32,
    /// Columns of the left side, and of the right side.
    pub left_right_columns: u32,
}

impl ShelvesConfig {
    pub fn total_columns(&self) -> u32 {
        2 * self.left_right_columns + 2 * self.front_back_columns
    }
}

impl Default for ShelvesConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            front_back_columns: 3,
            left_right_columns: 1,
        }
    }
}

/// Shape of a planogram grid and the furniture it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanogramConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub rows: u32,
    pub columns: u32,
    pub cell_width: f64,
    pub cell_height: f64,
    pub furniture_type: FurnitureType,
    #[serde(default)]
    pub display_mode: DisplayMode,
    #[serde(default)]
    pub furniture_dimensions: FurnitureDimensions,
    #[serde(default)]
    pub shelves_config: ShelvesConfig,
}

impl PlanogramConfig {
    pub fn new(name: impl Into<String>, furniture_type: FurnitureType, rows: u32, columns: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            rows,
            columns,
            cell_width: 120.0,
            cell_height: 100.0,
            furniture_type,
            display_mode: DisplayMode::Compact,
            furniture_dimensions: FurnitureDimensions::default(),
            shelves_config: ShelvesConfig::default(),
        }
    }

    pub fn with_shelves(mut self, shelves: ShelvesConfig) -> Self {
        self.shelves_config = shelves;
        self
    }

    /// Effective `(rows, columns)` of the grid. A shelves display takes its
    /// shape from the shelves configuration.
    pub fn grid_size(&self) -> (u32, u32) {
        if self.furniture_type.is_four_sided() {
            (self.shelves_config.rows, self.shelves_config.total_columns())
        } else {
            (self.rows, self.columns)
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let (rows, columns) = self.grid_size();
        if rows == 0 || columns == 0 {
            return Err(GeometryError::InvalidGridSize {
                size: f64::from(rows.min(columns)),
            });
        }
        for (dimension, value) in [("cellWidth", self.cell_width), ("cellHeight", self.cell_height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(GeometryError::NonPositiveDimension {
                    element_id: self.id.clone().unwrap_or_else(|| self.name.clone()),
                    dimension,
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for PlanogramConfig {
    fn default() -> Self {
        Self::new("New planogram", FurnitureType::Gondola, 4, 6)
    }
}
