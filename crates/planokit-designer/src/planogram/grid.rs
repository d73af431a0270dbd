use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use planokit_core::GeometryError;

use super::config::PlanogramConfig;
use super::zones::{self, Side};
use crate::furniture::{FurnitureProduct, FurnitureType};

pub const DEFAULT_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 20;

/// Clamps a facing count into `[1, max]`.
pub fn clamp_quantity(quantity: u32, max: u32) -> u32 {
    quantity.clamp(1, max.max(1))
}

/// Grid used to draw `quantity` units in compact mode: `(columns, rows)`
/// with `columns = ceil(sqrt(q))` and `rows = ceil(q / columns)`.
pub fn compact_layout(quantity: u32) -> (u32, u32) {
    let quantity = clamp_quantity(quantity, MAX_QUANTITY);
    let columns = f64::from(quantity).sqrt().ceil() as u32;
    (columns, quantity.div_ceil(columns))
}

/// One slot of a planogram. `x` is the column, `y` the row from the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanogramCell {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub product_id: Option<String>,
    pub instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub furniture_type: FurnitureType,
}

impl PlanogramCell {
    pub fn is_empty(&self) -> bool {
        self.instance_id.is_none()
    }

    fn clear(&mut self) {
        self.product_id = None;
        self.instance_id = None;
        self.quantity = None;
    }
}

/// A product occurrence that one or more cells point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInstance {
    pub instance_id: String,
    pub product_id: String,
    pub furniture_type: FurnitureType,
}

/// What [`PlanogramGrid::clear_cell`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedCell {
    pub cell_id: String,
    pub instance_id: String,
    /// True when no other cell referenced the instance and it was deleted.
    pub instance_released: bool,
}

/// Cells and product instances of the planogram being edited.
///
/// Cells of furniture types other than the configured one are kept, so
/// switching type and back does not lose work.
#[derive(Debug, Clone)]
pub struct PlanogramGrid {
    config: PlanogramConfig,
    cells: Arc<Vec<PlanogramCell>>,
    instances: Vec<ProductInstance>,
    revision: u64,
    default_quantity: u32,
    max_quantity: u32,
}

fn generate_cells(config: &PlanogramConfig) -> Vec<PlanogramCell> {
    let (rows, columns) = config.grid_size();
    let furniture_type = config.furniture_type;
    let mut cells = Vec::with_capacity((rows * columns) as usize);
    for x in 0..columns {
        for y in 0..rows {
            let side = furniture_type
                .is_four_sided()
                .then(|| zones::shelves_side(x, &config.shelves_config));
            let id = match side {
                Some(side) => format!("cell-{}-{}-{}-{}", x, y, furniture_type, side),
                None => format!("cell-{}-{}-{}", x, y, furniture_type),
            };
            cells.push(PlanogramCell {
                id,
                x,
                y,
                product_id: None,
                instance_id: None,
                quantity: None,
                side,
                furniture_type,
            });
        }
    }
    cells.sort_by_key(|c| (c.y, c.x));
    cells
}

impl PlanogramGrid {
    pub fn new(config: PlanogramConfig) -> Result<Self, GeometryError> {
        config.validate()?;
        let cells = generate_cells(&config);
        Ok(Self {
            config,
            cells: Arc::new(cells),
            instances: Vec::new(),
            revision: 0,
            default_quantity: DEFAULT_QUANTITY,
            max_quantity: MAX_QUANTITY,
        })
    }

    /// Sets the quantity given to new drops and the upper clamp.
    pub fn with_quantities(mut self, default_quantity: u32, max_quantity: u32) -> Self {
        self.max_quantity = max_quantity.max(1);
        self.default_quantity = clamp_quantity(default_quantity, self.max_quantity);
        self
    }

    pub fn config(&self) -> &PlanogramConfig {
        &self.config
    }

    pub fn default_quantity(&self) -> u32 {
        self.default_quantity
    }

    pub fn max_quantity(&self) -> u32 {
        self.max_quantity
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies a new configuration. Cells of the configured furniture type
    /// are regenerated empty; instances left without a cell are dropped.
    pub fn configure(&mut self, config: PlanogramConfig) -> Result<(), GeometryError> {
        config.validate()?;
        let fresh = generate_cells(&config);
        let furniture_type = config.furniture_type;
        self.config = config;
        self.mutate(|cells| {
            cells.retain(|c| c.furniture_type != furniture_type);
            cells.extend(fresh);
        });
        let cells = Arc::clone(&self.cells);
        self.instances.retain(|i| {
            cells
                .iter()
                .any(|c| c.instance_id.as_deref() == Some(i.instance_id.as_str()))
        });
        let (rows, columns) = self.config.grid_size();
        tracing::debug!("Planogram configured as {}x{} {}", rows, columns, furniture_type);
        Ok(())
    }

    /// Every cell, including those kept for other furniture types.
    pub fn all_cells(&self) -> &[PlanogramCell] {
        &self.cells
    }

    pub fn snapshot(&self) -> Arc<Vec<PlanogramCell>> {
        Arc::clone(&self.cells)
    }

    /// Cells of the configured furniture type, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &PlanogramCell> {
        let furniture_type = self.config.furniture_type;
        self.cells
            .iter()
            .filter(move |c| c.furniture_type == furniture_type)
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<&PlanogramCell> {
        self.cells().find(|c| c.x == x && c.y == y)
    }

    pub fn cell_by_id(&self, id: &str) -> Option<&PlanogramCell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn instances(&self) -> &[ProductInstance] {
        &self.instances
    }

    pub fn instance(&self, instance_id: &str) -> Option<&ProductInstance> {
        self.instances.iter().find(|i| i.instance_id == instance_id)
    }

    pub fn filled_count(&self) -> usize {
        self.cells().filter(|c| !c.is_empty()).count()
    }

    /// Shelf number of row `y`, 1 being the bottom shelf.
    pub fn shelf_level(&self, y: u32) -> u32 {
        self.config.grid_size().0.saturating_sub(y)
    }

    /// Zone label of a cell: its explicit side, else the derived one.
    pub fn zone_label(&self, cell: &PlanogramCell) -> Option<&'static str> {
        cell.side
            .map(|s| s.as_str())
            .or_else(|| zones::zone_label(&self.config, cell.x))
    }

    /// Cell addressed by face, shelf level (1 = bottom) and 1-based column
    /// within the face.
    pub fn cell_for_position(&self, side: Option<Side>, shelf_level: u32, column: u32) -> Option<&PlanogramCell> {
        let (rows, _) = self.config.grid_size();
        if shelf_level == 0 || shelf_level > rows {
            return None;
        }
        let x = zones::grid_column(&self.config, side, column)?;
        self.cell(x, rows - shelf_level)
    }

    /// Puts a new instance of `product_id` into the cell.
    pub fn assign(&mut self, x: u32, y: u32, product_id: &str, quantity: Option<u32>) -> Option<String> {
        let index = self.index_of(x, y)?;
        let instance_id = format!("instance-{}", Uuid::new_v4());
        let quantity = clamp_quantity(quantity.unwrap_or(self.default_quantity), self.max_quantity);
        self.instances.push(ProductInstance {
            instance_id: instance_id.clone(),
            product_id: product_id.to_string(),
            furniture_type: self.config.furniture_type,
        });
        let previous = self.mutate(|cells| {
            let cell = &mut cells[index];
            let previous = cell.instance_id.replace(instance_id.clone());
            cell.product_id = Some(product_id.to_string());
            cell.quantity = Some(quantity);
            previous
        });
        if let Some(previous) = previous {
            self.release_if_orphaned(&previous);
        }
        Some(instance_id)
    }

    /// Sets the facing count of a cell, clamped to `[1, max]`. Returns the
    /// stored value.
    pub fn set_quantity(&mut self, x: u32, y: u32, quantity: u32) -> Option<u32> {
        let index = self.index_of(x, y)?;
        let quantity = clamp_quantity(quantity, self.max_quantity);
        self.mutate(|cells| cells[index].quantity = Some(quantity));
        Some(quantity)
    }

    /// Empties a cell. The instance record is deleted only when no other
    /// cell of this furniture type still uses it.
    pub fn clear_cell(&mut self, x: u32, y: u32) -> Option<ClearedCell> {
        let index = self.index_of(x, y)?;
        let instance_id = self.cells[index].instance_id.clone()?;
        let cell_id = self.mutate(|cells| {
            cells[index].clear();
            cells[index].id.clone()
        });
        let instance_released = self.release_if_orphaned(&instance_id);
        Some(ClearedCell {
            cell_id,
            instance_id,
            instance_released,
        })
    }

    /// Empties every cell of the configured furniture type.
    pub fn clear_all(&mut self) {
        let furniture_type = self.config.furniture_type;
        self.mutate(|cells| {
            cells
                .iter_mut()
                .filter(|c| c.furniture_type == furniture_type)
                .for_each(PlanogramCell::clear);
        });
        self.instances.retain(|i| i.furniture_type != furniture_type);
    }

    /// Products of the grid as furniture template rows: section is the
    /// shelf level, position the column within the face.
    pub fn to_furniture_products(&self) -> Vec<FurnitureProduct> {
        self.cells()
            .filter_map(|cell| {
                let product_id = cell.product_id.clone()?;
                Some(FurnitureProduct {
                    product_id,
                    section: self.shelf_level(cell.y),
                    position: zones::column_in_face(&self.config, cell.x),
                    quantity: cell.quantity,
                    side: cell
                        .side
                        .or_else(|| zones::face_of(&self.config, cell.x))
                        .map(|s| s.as_str().to_string()),
                })
            })
            .collect()
    }

    pub(crate) fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        let furniture_type = self.config.furniture_type;
        self.cells
            .iter()
            .position(|c| c.furniture_type == furniture_type && c.x == x && c.y == y)
    }

    pub(crate) fn mutate<R>(&mut self, f: impl FnOnce(&mut Vec<PlanogramCell>) -> R) -> R {
        let result = f(Arc::make_mut(&mut self.cells));
        self.revision += 1;
        result
    }

    pub(crate) fn push_instance(&mut self, instance: ProductInstance) {
        self.instances.push(instance);
    }

    /// Deletes the instance when no cell of its furniture type uses it.
    pub(crate) fn release_if_orphaned(&mut self, instance_id: &str) -> bool {
        let Some(position) = self.instances.iter().position(|i| i.instance_id == instance_id) else {
            return false;
        };
        let furniture_type = self.instances[position].furniture_type;
        let in_use = self.cells.iter().any(|c| {
            c.furniture_type == furniture_type && c.instance_id.as_deref() == Some(instance_id)
        });
        if in_use {
            return false;
        }
        self.instances.remove(position);
        tracing::debug!("Released product instance {}", instance_id);
        true
    }
}

impl Default for PlanogramGrid {
    fn default() -> Self {
        let config = PlanogramConfig::default();
        let cells = generate_cells(&config);
        Self {
            config,
            cells: Arc::new(cells),
            instances: Vec::new(),
            revision: 0,
            default_quantity: DEFAULT_QUANTITY,
            max_quantity: MAX_QUANTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planogram::config::ShelvesConfig;

    fn gondola() -> PlanogramGrid {
        PlanogramGrid::new(PlanogramConfig::new("g", FurnitureType::Gondola, 4, 6)).unwrap()
    }

    #[test]
    fn test_generate_cells() {
        let grid = gondola();
        assert_eq!(grid.cells().count(), 24);
        let cell = grid.cell(2, 3).unwrap();
        assert_eq!(cell.id, "cell-2-3-gondola");
        assert_eq!(grid.shelf_level(3), 1);
    }

    #[test]
    fn test_shelves_cells_carry_sides() {
        let config = PlanogramConfig::new("s", FurnitureType::ShelvesDisplay, 4, 0).with_shelves(ShelvesConfig {
            rows: 3,
            front_back_columns: 3,
            left_right_columns: 1,
        });
        let grid = PlanogramGrid::new(config).unwrap();
        assert_eq!(grid.cells().count(), 24);
        assert_eq!(grid.cell(0, 0).unwrap().id, "cell-0-0-shelves-display-left");
        assert_eq!(grid.cell(4, 1).unwrap().side, Some(Side::Back));
        assert_eq!(grid.zone_label(grid.cell(7, 2).unwrap()), Some("right"));
    }

    #[test]
    fn test_compact_layout() {
        assert_eq!(compact_layout(1), (1, 1));
        assert_eq!(compact_layout(5), (3, 2));
        assert_eq!(compact_layout(9), (3, 3));
        assert_eq!(compact_layout(10), (4, 3));
        assert_eq!(compact_layout(0), (1, 1));
        assert_eq!(compact_layout(500), (5, 4));
    }

    #[test]
    fn test_set_quantity_clamps() {
        let mut grid = gondola();
        assert_eq!(grid.set_quantity(0, 0, 0), Some(1));
        assert_eq!(grid.set_quantity(0, 0, 99), Some(20));
        assert_eq!(grid.set_quantity(40, 0, 3), None);
    }

    #[test]
    fn test_clear_keeps_shared_instance() {
        let mut grid = gondola();
        let instance = grid.assign(0, 0, "p1", None).unwrap();
        let shared = instance.clone();
        grid.mutate(|cells| {
            let cell = cells.iter_mut().find(|c| c.x == 1 && c.y == 0).unwrap();
            cell.instance_id = Some(shared);
            cell.product_id = Some("p1".into());
        });

        let first = grid.clear_cell(0, 0).unwrap();
        assert!(!first.instance_released);
        assert!(grid.instance(&instance).is_some());

        let second = grid.clear_cell(1, 0).unwrap();
        assert!(second.instance_released);
        assert!(grid.instances().is_empty());
        assert!(grid.clear_cell(1, 0).is_none());
    }

    #[test]
    fn test_configure_keeps_other_types() {
        let mut grid = gondola();
        grid.assign(0, 0, "p1", Some(4));
        let mut table = PlanogramConfig::new("t", FurnitureType::Table, 2, 2);
        table.id = Some("cfg".into());
        grid.configure(table).unwrap();
        assert_eq!(grid.cells().count(), 4);
        assert_eq!(grid.all_cells().len(), 28);
        assert_eq!(grid.instances().len(), 1);

        grid.configure(PlanogramConfig::new("g", FurnitureType::Gondola, 4, 6)).unwrap();
        assert_eq!(grid.filled_count(), 0);
        assert!(grid.instances().is_empty());
    }

    #[test]
    fn test_to_furniture_products() {
        let mut grid = gondola();
        grid.assign(4, 3, "p1", Some(2));
        let products = grid.to_furniture_products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].section, 1);
        assert_eq!(products[0].position, 2);
        assert_eq!(products[0].side.as_deref(), Some("back"));
        assert_eq!(products[0].quantity, Some(2));
    }

    #[test]
    fn test_cell_for_position() {
        let grid = gondola();
        let cell = grid.cell_for_position(Some(Side::Back), 4, 1).unwrap();
        assert_eq!((cell.x, cell.y), (3, 0));
        assert!(grid.cell_for_position(Some(Side::Back), 5, 1).is_none());
        assert!(grid.cell_for_position(Some(Side::Front), 1, 4).is_none());
    }
}
