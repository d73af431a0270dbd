//! # PlanoKit Core
//!
//! Shared types for the PlanoKit layout engine: the error hierarchy, unit
//! conversion between plan units and scene metres, the read-only product
//! catalog and category hierarchy, the change bus editor states publish on,
//! and the stale-response guard used by asynchronous loads.

pub mod catalog;
pub mod error;
pub mod event_bus;
pub mod request;
pub mod units;

pub use catalog::{Category, CategoryArena, CategoryTree, Product, ProductCatalog, ProductLookup};

pub use error::{Error, GeometryError, ImportError, MatchError, Result, StorageError};

// Re-export event bus for convenience
pub use event_bus::{
    EditorEvent, ElementEvent, EventBus, EventBusConfig, EventCategory, EventFilter,
    InteractionEvent, LoadEvent, MatchEvent, PlanEvent, PlanogramEvent, SubscriptionId,
};

pub use request::{Completion, LoadState, RequestToken, RequestTracker};
pub use units::{format_dimension, UnitSystem, PIXELS_PER_METER};
