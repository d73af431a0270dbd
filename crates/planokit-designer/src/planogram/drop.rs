//! Typed drag-and-drop messages for the planogram grid.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::grid::{PlanogramGrid, ProductInstance};

/// Where a dragged product comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DropSource {
    /// A product dragged from the catalog: creates a new instance.
    #[serde(rename_all = "camelCase")]
    Library { product_id: String },
    /// The content of another cell: moves it.
    Cell { x: u32, y: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropEvent {
    pub source: DropSource,
    pub target_x: u32,
    pub target_y: u32,
}

impl DropEvent {
    pub fn from_library(product_id: impl Into<String>, target_x: u32, target_y: u32) -> Self {
        Self {
            source: DropSource::Library {
                product_id: product_id.into(),
            },
            target_x,
            target_y,
        }
    }

    pub fn from_cell(x: u32, y: u32, target_x: u32, target_y: u32) -> Self {
        Self {
            source: DropSource::Cell { x, y },
            target_x,
            target_y,
        }
    }
}

/// Why a drop did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRejection {
    TargetMissing,
    SourceMissing,
    SourceEmpty,
    SameCell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Placed {
        cell_id: String,
        instance_id: String,
        product_id: String,
        /// Instance previously in the target that is no longer used anywhere.
        released: Option<String>,
    },
    Moved {
        from_cell_id: String,
        to_cell_id: String,
        instance_id: String,
        released: Option<String>,
    },
    Rejected(DropRejection),
}

impl PlanogramGrid {
    /// Applies a drop event synchronously.
    pub fn apply_drop(&mut self, event: &DropEvent) -> DropOutcome {
        let Some(target) = self.index_of(event.target_x, event.target_y) else {
            return DropOutcome::Rejected(DropRejection::TargetMissing);
        };

        match &event.source {
            DropSource::Library { product_id } => {
                let instance_id = format!("instance-{}", Uuid::new_v4());
                let quantity = self.default_quantity();
                let furniture_type = self.config().furniture_type;
                self.push_instance(ProductInstance {
                    instance_id: instance_id.clone(),
                    product_id: product_id.clone(),
                    furniture_type,
                });
                let (cell_id, previous) = self.mutate(|cells| {
                    let cell = &mut cells[target];
                    let previous = cell.instance_id.replace(instance_id.clone());
                    cell.product_id = Some(product_id.clone());
                    cell.quantity = Some(quantity);
                    (cell.id.clone(), previous)
                });
                let released = previous.filter(|p| self.release_if_orphaned(p));
                tracing::debug!("Dropped product {} into {}", product_id, cell_id);
                DropOutcome::Placed {
                    cell_id,
                    instance_id,
                    product_id: product_id.clone(),
                    released,
                }
            }
            DropSource::Cell { x, y } => {
                let Some(source) = self.index_of(*x, *y) else {
                    return DropOutcome::Rejected(DropRejection::SourceMissing);
                };
                if source == target {
                    return DropOutcome::Rejected(DropRejection::SameCell);
                }
                if self.all_cells()[source].is_empty() {
                    return DropOutcome::Rejected(DropRejection::SourceEmpty);
                }

                let (from_cell_id, to_cell_id, instance_id, previous) = self.mutate(|cells| {
                    let moved = cells[source].clone();
                    cells[source].product_id = None;
                    cells[source].instance_id = None;
                    cells[source].quantity = None;

                    let cell = &mut cells[target];
                    let previous = cell.instance_id.take();
                    cell.instance_id = moved.instance_id.clone();
                    cell.product_id = moved.product_id;
                    cell.quantity = moved.quantity;
                    (
                        moved.id,
                        cell.id.clone(),
                        moved.instance_id.unwrap_or_default(),
                        previous,
                    )
                });
                let released = previous
                    .filter(|p| *p != instance_id)
                    .filter(|p| self.release_if_orphaned(p));
                tracing::debug!("Moved {} from {} to {}", instance_id, from_cell_id, to_cell_id);
                DropOutcome::Moved {
                    from_cell_id,
                    to_cell_id,
                    instance_id,
                    released,
                }
            }
        }
    }
}
