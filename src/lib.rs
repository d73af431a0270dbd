//! # PlanoKit
//!
//! A store layout engine: a 2D floor-plan editor core, projection of the plan
//! into a 3D store scene, matching of furniture templates to plan elements and
//! planogram product grids.
//!
//! ## Architecture
//!
//! PlanoKit is organized as a workspace with multiple crates:
//!
//! 1. **planokit-core** - Errors, units, product catalog, event bus, request tracking
//! 2. **planokit-designer** - Element model, canvas state machine, scene projection,
//!    matching, planogram grid, import/export
//! 3. **planokit-settings** - Configuration and key/value persistence
//! 4. **planokit** - Command line inspector that integrates all crates

pub use planokit_designer as designer;
pub use planokit_settings as settings;

pub use planokit_core::{
    EditorEvent, Error, EventBus, Product, ProductCatalog, Result, UnitSystem,
};

pub use planokit_designer::{
    import_floor_plan, import_planogram, Canvas, CanvasOutcome, DesignerState, ElementType,
    FloorPlan, FloorPlanElement, PlanogramGrid, SavedFurniture,
};

pub use planokit_settings::{
    Config, FileStore, FloorPlanRepository, FurnitureRepository, KeyValueStore, MemoryStore,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty formatted output on stderr, keeping stdout for command output
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
