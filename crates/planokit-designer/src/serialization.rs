//! Floor-plan files.
//!
//! A plan is written as the flat camelCase `FloorPlan` document, the same
//! shape the import/export contract uses. Reading goes through
//! [`import_floor_plan`] so files edited by hand get the same checks as
//! pasted documents.

use anyhow::{Context, Result};
use std::path::Path;

use crate::import::import_floor_plan;
use crate::model::FloorPlan;

/// File extension used for exported plans.
pub const PLAN_FILE_EXTENSION: &str = "json";

/// Serializes `plan` as pretty-printed JSON.
pub fn export_floor_plan(plan: &FloorPlan) -> serde_json::Result<String> {
    serde_json::to_string_pretty(plan)
}

impl FloorPlan {
    /// Save plan to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = export_floor_plan(self).context("Failed to serialize floor plan")?;

        std::fs::write(path.as_ref(), json).context("Failed to write floor plan file")?;

        Ok(())
    }

    /// Load plan from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read floor plan file")?;

        let plan = import_floor_plan(&content)
            .with_context(|| format!("Failed to parse floor plan {}", path.as_ref().display()))?;

        Ok(plan)
    }
}
