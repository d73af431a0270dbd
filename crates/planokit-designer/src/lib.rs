//! # PlanoKit Designer
//!
//! Store floor-plan editing and merchandising layout. This crate holds the
//! interactive layout engine: everything a presentation layer needs to draw
//! and edit a plan, without drawing anything itself.
//!
//! ## Core Components
//!
//! ### Floor plans
//! - **Model**: Element kinds with default sizes, placed elements, plans
//! - **Validity**: Doors and windows must touch a wall; ghost previews
//! - **Canvas**: Pointer state machine for placing, dragging, resizing,
//!   rotating and panning, with grid snapping on commit
//! - **Viewport**: Zoom and pan between screen and plan coordinates
//! - **Scene**: Projection of plan elements into the 3D store scene
//!
//! ### Merchandising
//! - **Furniture**: Furniture templates and the saved-furniture library
//! - **Matching**: One-to-one pairing of templates with plan elements
//! - **Store display**: Placement of matched furniture in the scene
//! - **Planogram**: Zoned product grids with drag-and-drop assignment
//!
//! ### Editor
//! - **Import/Export**: Floor-plan documents and planogram envelopes
//! - **Designer state**: Owned editor state with undo/redo and change events
//!
//! ## Architecture
//!
//! ```text
//! DesignerState
//!   ├── Canvas (elements, selection, gestures, viewport)
//!   ├── MatchRegistry ── StoreDisplay (scene placement)
//!   ├── FurnitureLibrary
//!   ├── PlanogramGrid (cells, product instances)
//!   └── EventBus (change notification)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use planokit_core::EventBus;
//! use planokit_designer::{CanvasOutcome, DesignerState, ElementType};
//!
//! let mut state = DesignerState::new(Arc::new(EventBus::new()));
//! state.new_plan("Main store");
//!
//! state.select_tool(Some(ElementType::Shelf));
//! let outcome = state.pointer_down(120.0, 80.0);
//! assert!(matches!(outcome, CanvasOutcome::ElementCreated(_)));
//! assert_eq!(state.canvas.element_count(), 1);
//! ```

pub mod canvas;
pub mod commands;
pub mod designer_state;
pub mod furniture;
pub mod geometry;
pub mod import;
pub mod matching;
pub mod model;
pub mod planogram;
pub mod scene;
pub mod selection_manager;
pub mod serialization;
pub mod store_display;
pub mod validity;
pub mod viewport;

pub use canvas::{Canvas, CanvasOutcome, CanvasSettings, Handle, InteractionState, ResizeHandle};
pub use commands::EditorCommand;
pub use designer_state::{DesignerSettings, DesignerState, PlanMeta};
pub use furniture::{FurnitureItem, FurnitureLibrary, FurnitureProduct, FurnitureType, SavedFurniture};
pub use geometry::{Bounds, Point};
pub use import::{
    import_floor_plan, import_planogram, FurnitureCheck, PlanogramEnvelope, PlanogramImport,
    ProductCheck,
};
pub use matching::{AutoMatchOutcome, MatchKind, MatchRegistry, MatchedPlanElement};
pub use model::{ElementType, FloorPlan, FloorPlanElement};
pub use planogram::{
    DisplayMode, DropEvent, DropOutcome, DropSource, PlanogramCell, PlanogramConfig, PlanogramGrid,
    ProductInstance, Side,
};
pub use scene::{auto_placement, to_scene, ScenePlacement, SceneTransform};
pub use selection_manager::SelectionManager;
pub use serialization::export_floor_plan;
pub use store_display::{PlacedFurniture, StoreDisplay, StoreLayout};
pub use validity::{GhostElement, InvalidReason};
pub use viewport::Viewport;
