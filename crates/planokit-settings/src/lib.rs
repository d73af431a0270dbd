//! PlanoKit Settings Crate
//!
//! Handles application configuration and the key/value persistence of floor
//! plans, saved furniture and store layouts.

pub mod config;
pub mod error;
pub mod storage;

pub use config::{Config, EditorSettings, PlanogramSettings, SceneSettings, StorageSettings};
pub use error::{SettingsError, SettingsResult};
pub use storage::{
    FileStore, FloorPlanRepository, FurnitureRepository, KeyValueStore, MemoryStore,
    ACTIVE_FLOOR_PLAN_KEY, FLOOR_PLANS_KEY, SAVED_FURNITURE_KEY, STORE_LAYOUTS_KEY,
};
