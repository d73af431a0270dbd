//! Active plan, import/export and save/load operations for designer state.

use anyhow::Context;
use chrono::{DateTime, Utc};

use planokit_core::{ImportError, MatchEvent, PlanEvent};

use super::DesignerState;
use crate::import::import_floor_plan;
use crate::model::FloorPlan;
use crate::serialization::export_floor_plan;

/// Identity of the active plan. Its elements live in the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanMeta {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DesignerState {
    pub fn active_plan(&self) -> Option<&PlanMeta> {
        self.plan.as_ref()
    }

    pub fn active_plan_id(&self) -> Option<&str> {
        self.plan.as_ref().map(|p| p.id.as_str())
    }

    /// Starts an empty plan and makes it active.
    pub fn new_plan(&mut self, name: impl Into<String>) -> String {
        let plan = FloorPlan::new(name);
        let id = plan.id.clone();
        self.activate_plan(plan);
        id
    }

    /// Makes `plan` the active one. Matches, history, placed furniture and
    /// outstanding loads of the previous plan are dropped.
    pub fn activate_plan(&mut self, plan: FloorPlan) {
        let FloorPlan {
            id,
            name,
            elements,
            created_at,
            updated_at,
        } = plan;

        if let Some(previous) = &self.plan {
            self.requests.invalidate(&previous.id);
        }
        self.canvas.load_elements(elements);
        if !self.matches.is_empty() {
            self.matches.clear();
            self.publish(MatchEvent::Cleared);
        }
        self.display.clear();
        self.clear_history();
        self.is_modified = false;

        tracing::info!("Activated plan {} ({} elements)", id, self.canvas.element_count());
        self.publish(PlanEvent::Activated {
            plan_id: id.clone(),
            name: name.clone(),
        });
        self.plan = Some(PlanMeta {
            id,
            name,
            created_at,
            updated_at,
        });
    }

    /// Renames the active plan.
    pub fn rename_plan(&mut self, name: &str) -> bool {
        let name = name.trim();
        match self.plan.as_mut() {
            Some(plan) if !name.is_empty() => {
                plan.name = name.to_string();
                plan.updated_at = Utc::now();
                self.is_modified = true;
                true
            }
            _ => false,
        }
    }

    /// The active plan with the canvas elements, as it would be persisted.
    pub fn current_plan(&self) -> Option<FloorPlan> {
        let meta = self.plan.as_ref()?;
        Some(FloorPlan {
            id: meta.id.clone(),
            name: meta.name.clone(),
            elements: self.canvas.elements().to_vec(),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        })
    }

    /// Marks the active plan persisted and refreshes its `updatedAt`.
    pub fn mark_saved(&mut self) -> Option<FloorPlan> {
        let plan_id = {
            let plan = self.plan.as_mut()?;
            plan.updated_at = Utc::now();
            plan.id.clone()
        };
        self.is_modified = false;
        self.publish(PlanEvent::Saved { plan_id });
        self.current_plan()
    }

    /// Imports a floor-plan document and makes it active. A rejected
    /// document leaves the editor untouched.
    pub fn import_plan_json(&mut self, json: &str) -> Result<String, ImportError> {
        let plan = import_floor_plan(json).inspect_err(|e| {
            tracing::warn!("Floor plan import rejected: {}", e);
        })?;
        let plan_id = plan.id.clone();
        let element_count = plan.elements.len();
        self.activate_plan(plan);
        self.is_modified = true;
        self.publish(PlanEvent::Imported {
            plan_id: plan_id.clone(),
            element_count,
        });
        Ok(plan_id)
    }

    /// Exports the active plan as JSON.
    pub fn export_plan_json(&self) -> anyhow::Result<String> {
        let plan = self.current_plan().context("No active floor plan")?;
        export_floor_plan(&plan).context("Failed to serialize floor plan")
    }

    /// Save plan to file.
    pub fn save_to_file(&mut self, path: impl AsRef<std::path::Path>) -> anyhow::Result<()> {
        let plan = self.current_plan().context("No active floor plan")?;
        plan.save_to_file(path.as_ref())?;
        self.current_file_path = Some(path.as_ref().to_path_buf());
        self.mark_saved();
        Ok(())
    }

    /// Load plan from file.
    pub fn load_from_file(&mut self, path: impl AsRef<std::path::Path>) -> anyhow::Result<()> {
        let plan = FloorPlan::load_from_file(path.as_ref())?;
        self.activate_plan(plan);
        self.current_file_path = Some(path.as_ref().to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use planokit_core::EventBus;

    use super::*;
    use crate::model::{ElementType, FloorPlanElement};

    fn state() -> DesignerState {
        DesignerState::new(Arc::new(EventBus::new()))
    }

    #[test]
    fn test_activate_clears_matches() {
        let mut state = state();
        let plan = FloorPlan::new("A")
            .with_elements(vec![FloorPlanElement::new("g1", ElementType::Gondola, 0.0, 0.0)]);
        state.activate_plan(plan);
        let element = state.canvas.element("g1").cloned().unwrap();
        state.matches.set_match("f1", &element).unwrap();

        state.new_plan("B");
        assert!(state.matches.is_empty());
        assert_eq!(state.canvas.element_count(), 0);
        assert_eq!(state.active_plan().unwrap().name, "B");
    }

    #[test]
    fn test_rejected_import_keeps_plan() {
        let mut state = state();
        let id = state.new_plan("Keep");
        assert!(state.import_plan_json(r#"{"elements": 3}"#).is_err());
        assert_eq!(state.active_plan_id(), Some(id.as_str()));
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut state = state();
        state.new_plan("Shop");
        state
            .add_element(FloorPlanElement::new("w1", ElementType::Wall, 0.0, 0.0))
            .unwrap();
        let json = state.export_plan_json().unwrap();

        let mut other = DesignerState::new(Arc::new(EventBus::new()));
        other.import_plan_json(&json).unwrap();
        assert_eq!(other.current_plan().unwrap().elements, state.canvas.elements());
        assert_eq!(other.active_plan().unwrap().name, "Shop");
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        let mut state = state();
        state.new_plan("Shop");
        state
            .add_element(FloorPlanElement::new("s1", ElementType::Shelf, 20.0, 20.0))
            .unwrap();
        assert!(state.is_modified);
        state.save_to_file(&path).unwrap();
        assert!(!state.is_modified);

        let mut loaded = DesignerState::new(Arc::new(EventBus::new()));
        loaded.load_from_file(&path).unwrap();
        assert_eq!(loaded.canvas.element_count(), 1);
        assert_eq!(loaded.current_file_path.as_deref(), Some(path.as_path()));
    }
}
