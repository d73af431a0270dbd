//! Owned editor state for presentation layers.
//!
//! `DesignerState` ties the canvas, matching, store display and planogram
//! models together, records undo history and publishes an [`EditorEvent`]
//! after every committed change. There is no global instance: the host
//! creates one and hands it the [`EventBus`] its views subscribe to.
//!
//! This module is split into submodules:
//! - `history`: Undo/redo of element changes
//! - `elements`: Pointer input, tools and element commands
//! - `file_io`: Active plan, import/export, save/load
//! - `matching`: Furniture library, matches and store placement
//! - `planogram`: Planogram grid, catalog loading, planogram import

mod elements;
mod file_io;
mod history;
mod matching;
mod planogram;

pub use file_io::PlanMeta;
pub use planogram::{FURNITURE_KEY, PRODUCTS_KEY};

use std::sync::Arc;

use planokit_core::{EditorEvent, EventBus, ProductCatalog, RequestTracker};

use crate::canvas::{Canvas, CanvasSettings};
use crate::commands::EditorCommand;
use crate::furniture::FurnitureLibrary;
use crate::matching::MatchRegistry;
use crate::planogram::{PlanogramGrid, DEFAULT_QUANTITY, MAX_QUANTITY};
use crate::store_display::StoreDisplay;

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Settings the editor state is created with.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignerSettings {
    pub canvas: CanvasSettings,
    pub default_quantity: u32,
    pub max_quantity: u32,
    /// Store scene size in metres.
    pub room_width: f64,
    pub room_depth: f64,
    pub history_limit: usize,
}

impl Default for DesignerSettings {
    fn default() -> Self {
        Self {
            canvas: CanvasSettings::default(),
            default_quantity: DEFAULT_QUANTITY,
            max_quantity: MAX_QUANTITY,
            room_width: 20.0,
            room_depth: 20.0,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Designer state for UI integration
pub struct DesignerState {
    pub canvas: Canvas,
    pub(crate) bus: Arc<EventBus>,
    pub(crate) requests: RequestTracker,
    pub(crate) plan: Option<PlanMeta>,
    pub current_file_path: Option<std::path::PathBuf>,
    pub is_modified: bool,
    pub(crate) catalog: ProductCatalog,
    pub(crate) library: FurnitureLibrary,
    pub(crate) matches: MatchRegistry,
    pub(crate) display: StoreDisplay,
    pub(crate) planogram: PlanogramGrid,
    pub(crate) undo_stack: Vec<EditorCommand>,
    pub(crate) redo_stack: Vec<EditorCommand>,
    pub(crate) history_limit: usize,
}

impl DesignerState {
    /// Creates a state with default settings publishing on `bus`.
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self::with_settings(bus, DesignerSettings::default())
    }

    pub fn with_settings(bus: Arc<EventBus>, settings: DesignerSettings) -> Self {
        let planogram = PlanogramGrid::default()
            .with_quantities(settings.default_quantity, settings.max_quantity);
        Self {
            canvas: Canvas::with_settings(settings.canvas),
            bus,
            requests: RequestTracker::new(),
            plan: None,
            current_file_path: None,
            is_modified: false,
            catalog: ProductCatalog::new(),
            library: FurnitureLibrary::new(),
            matches: MatchRegistry::new(),
            display: StoreDisplay::new(settings.room_width, settings.room_depth),
            planogram,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            history_limit: settings.history_limit.max(1),
        }
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn library(&self) -> &FurnitureLibrary {
        &self.library
    }

    pub fn matches(&self) -> &MatchRegistry {
        &self.matches
    }

    pub fn store_display(&self) -> &StoreDisplay {
        &self.display
    }

    pub fn planogram(&self) -> &PlanogramGrid {
        &self.planogram
    }

    pub fn requests(&self) -> &RequestTracker {
        &self.requests
    }

    /// Publishes `event`. Having nobody listening is fine.
    pub(crate) fn publish(&self, event: impl Into<EditorEvent>) {
        let event = event.into();
        tracing::debug!("{}", event.description());
        let _ = self.bus.publish(event);
    }
}
