//! Planogram grid model.
//!
//! A planogram is a `rows × columns` grid of shelf cells for one furniture
//! template. Cells point at product instances; dropping a catalog product
//! creates an instance, dragging between cells moves it. Cell storage is
//! copy-on-write like the canvas element collection.

mod config;
mod drop;
mod grid;
pub mod zones;

pub use config::{DisplayMode, FurnitureDimensions, PlanogramConfig, ShelvesConfig};
pub use drop::{DropEvent, DropOutcome, DropRejection, DropSource};
pub use grid::{
    clamp_quantity, compact_layout, ClearedCell, PlanogramCell, PlanogramGrid, ProductInstance,
    DEFAULT_QUANTITY, MAX_QUANTITY,
};
pub use zones::Side;
