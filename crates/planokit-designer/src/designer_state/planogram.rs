//! Planogram grid, catalog loading and planogram import.

use uuid::Uuid;

use planokit_core::{
    Completion, GeometryError, ImportError, LoadEvent, MatchError, PlanogramEvent, Product,
    ProductCatalog, RequestToken,
};

use super::DesignerState;
use crate::furniture::{FurnitureItem, SavedFurniture};
use crate::import::{import_planogram, PlanogramImport};
use crate::planogram::{DropEvent, DropOutcome, PlanogramConfig, Side};

/// Request key of the product catalog load.
pub const PRODUCTS_KEY: &str = "products";
/// Request key of the saved furniture load.
pub const FURNITURE_KEY: &str = "saved-furniture";

impl DesignerState {
    /// Regenerates the grid for `config`.
    pub fn configure_planogram(&mut self, config: PlanogramConfig) -> Result<(), GeometryError> {
        self.planogram.configure(config)?;
        let (rows, columns) = self.planogram.config().grid_size();
        self.publish(PlanogramEvent::Configured {
            rows: rows as usize,
            columns: columns as usize,
        });
        Ok(())
    }

    /// Applies a drag-and-drop message to the grid.
    pub fn drop_product(&mut self, event: &DropEvent) -> DropOutcome {
        let outcome = self.planogram.apply_drop(event);
        match &outcome {
            DropOutcome::Placed {
                cell_id,
                instance_id,
                product_id,
                released,
            } => {
                self.publish(PlanogramEvent::CellAssigned {
                    cell_id: cell_id.clone(),
                    instance_id: instance_id.clone(),
                    product_id: product_id.clone(),
                });
                self.publish_released(released.as_deref());
            }
            DropOutcome::Moved {
                from_cell_id,
                to_cell_id,
                instance_id,
                released,
            } => {
                self.publish(PlanogramEvent::CellCleared {
                    cell_id: from_cell_id.clone(),
                });
                let product_id = self
                    .planogram
                    .cell_by_id(to_cell_id)
                    .and_then(|c| c.product_id.clone())
                    .unwrap_or_default();
                self.publish(PlanogramEvent::CellAssigned {
                    cell_id: to_cell_id.clone(),
                    instance_id: instance_id.clone(),
                    product_id,
                });
                self.publish_released(released.as_deref());
            }
            DropOutcome::Rejected(reason) => {
                tracing::debug!("Drop rejected: {:?}", reason);
            }
        }
        outcome
    }

    fn publish_released(&self, released: Option<&str>) {
        if let Some(instance_id) = released {
            self.publish(PlanogramEvent::InstanceReleased {
                instance_id: instance_id.to_string(),
            });
        }
    }

    pub fn set_cell_quantity(&mut self, x: u32, y: u32, quantity: u32) -> Option<u32> {
        let stored = self.planogram.set_quantity(x, y, quantity)?;
        if let Some(cell) = self.planogram.cell(x, y) {
            self.publish(PlanogramEvent::QuantityChanged {
                cell_id: cell.id.clone(),
                quantity: stored,
            });
        }
        Some(stored)
    }

    pub fn clear_planogram_cell(&mut self, x: u32, y: u32) -> bool {
        let Some(cleared) = self.planogram.clear_cell(x, y) else {
            return false;
        };
        self.publish(PlanogramEvent::CellCleared {
            cell_id: cleared.cell_id,
        });
        if cleared.instance_released {
            self.publish_released(Some(&cleared.instance_id));
        }
        true
    }

    pub fn clear_planogram(&mut self) {
        self.planogram.clear_all();
        let (rows, columns) = self.planogram.config().grid_size();
        self.publish(PlanogramEvent::Configured {
            rows: rows as usize,
            columns: columns as usize,
        });
    }

    /// Saves the grid as a furniture template in the library.
    pub fn save_planogram_as_furniture(&mut self, name: &str) -> String {
        let config = self.planogram.config();
        let (rows, columns) = config.grid_size();
        let dims = &config.furniture_dimensions;
        let id = config
            .id
            .clone()
            .unwrap_or_else(|| format!("furniture-{}", Uuid::new_v4()));
        let item = FurnitureItem::new(id, name, config.furniture_type)
            .with_size(dims.width, dims.height, dims.depth)
            .with_layout(rows, columns);
        let products = self.planogram.to_furniture_products();
        tracing::info!("Saving planogram {} with {} products", name, products.len());
        self.add_furniture(SavedFurniture::new(item, products))
    }

    /// Opens a library template in the grid: sections become rows, slots
    /// columns, and its products are put back in their cells.
    pub fn edit_furniture_in_planogram(&mut self, furniture_id: &str) -> planokit_core::Result<usize> {
        let saved = self
            .library
            .get(furniture_id)
            .cloned()
            .ok_or_else(|| MatchError::FurnitureNotFound {
                furniture_id: furniture_id.to_string(),
            })?;
        let item = &saved.furniture;
        let mut config = PlanogramConfig::new(
            item.name.clone(),
            item.furniture_type,
            item.sections.max(1),
            item.slots.max(1),
        );
        config.id = Some(item.id.clone());
        config.furniture_dimensions.width = item.width;
        config.furniture_dimensions.height = item.height;
        config.furniture_dimensions.depth = item.depth;
        self.configure_planogram(config)?;
        self.planogram.clear_all();

        let mut placed = 0;
        for product in &saved.products {
            let side = product.side.as_deref().and_then(|s| s.parse::<Side>().ok());
            let target = self
                .planogram
                .cell_for_position(side, product.section, product.position)
                .map(|c| (c.x, c.y));
            if let Some((x, y)) = target {
                self.planogram
                    .assign(x, y, &product.product_id, product.quantity);
                placed += 1;
            }
        }
        Ok(placed)
    }

    /// Parses and checks a planogram envelope against the catalog.
    pub fn import_planogram_json(&self, json: &str) -> Result<PlanogramImport, ImportError> {
        import_planogram(json, &self.catalog)
    }

    /// Adds the compatible furniture of a checked import to the library.
    pub fn apply_planogram_import(
        &mut self,
        import: &PlanogramImport,
        selected: Option<&[String]>,
    ) -> Result<Vec<String>, ImportError> {
        let saved = import.to_saved_furniture(selected)?;
        Ok(saved.into_iter().map(|s| self.add_furniture(s)).collect())
    }

    /// Starts a keyed load; a previous load of the same key becomes stale.
    pub fn begin_load(&mut self, key: &str) -> RequestToken {
        self.publish(LoadEvent::Started {
            key: key.to_string(),
        });
        self.requests.begin(key)
    }

    fn finish_load(&mut self, token: &RequestToken, outcome: Result<(), String>) -> Completion {
        let key = token.key().to_string();
        let failure = outcome.as_ref().err().cloned();
        let completion = self.requests.complete(token, outcome);
        let event = match (completion, failure) {
            (Completion::Stale, _) => LoadEvent::Discarded { key },
            (Completion::Applied, Some(message)) => LoadEvent::Failed { key, message },
            (Completion::Applied, None) => LoadEvent::Finished { key },
        };
        self.publish(event);
        completion
    }

    /// Delivers a catalog response. Stale or failed responses change nothing.
    pub fn complete_catalog_load(
        &mut self,
        token: &RequestToken,
        response: Result<Vec<Product>, String>,
    ) -> Completion {
        match response {
            Ok(products) => {
                let completion = self.finish_load(token, Ok(()));
                if completion == Completion::Applied {
                    self.catalog = ProductCatalog::from_products(products);
                }
                completion
            }
            Err(message) => self.finish_load(token, Err(message)),
        }
    }

    /// Delivers a saved-furniture response.
    pub fn complete_library_load(
        &mut self,
        token: &RequestToken,
        response: Result<Vec<SavedFurniture>, String>,
    ) -> Completion {
        match response {
            Ok(items) => {
                let completion = self.finish_load(token, Ok(()));
                if completion == Completion::Applied {
                    self.set_library(items);
                }
                completion
            }
            Err(message) => self.finish_load(token, Err(message)),
        }
    }
}
