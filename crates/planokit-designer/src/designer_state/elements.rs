//! Pointer input, tools and element commands.

use std::sync::Arc;

use planokit_core::{ElementEvent, GeometryError, InteractionEvent, MatchEvent, PlanEvent};

use super::DesignerState;
use crate::canvas::CanvasOutcome;
use crate::commands::EditorCommand;
use crate::model::{ElementType, FloorPlanElement};

impl DesignerState {
    /// Selects a placement tool, `None` for plain selection.
    pub fn select_tool(&mut self, tool: Option<ElementType>) {
        self.canvas.select_tool(tool);
        self.publish(InteractionEvent::ToolChanged {
            tool: tool.map(|t| t.as_str().to_string()),
        });
    }

    pub fn pointer_down(&mut self, screen_x: f64, screen_y: f64) -> CanvasOutcome {
        let before = self.canvas.snapshot();
        let outcome = self.canvas.pointer_down(screen_x, screen_y);
        self.after_pointer(before, &outcome);
        outcome
    }

    pub fn pointer_move(&mut self, screen_x: f64, screen_y: f64) -> CanvasOutcome {
        self.canvas.pointer_move(screen_x, screen_y)
    }

    pub fn pointer_up(&mut self, screen_x: f64, screen_y: f64) -> CanvasOutcome {
        let before = self.canvas.snapshot();
        let outcome = self.canvas.pointer_up(screen_x, screen_y);
        self.after_pointer(before, &outcome);
        outcome
    }

    fn after_pointer(&mut self, before: Arc<Vec<FloorPlanElement>>, outcome: &CanvasOutcome) {
        match outcome {
            CanvasOutcome::ElementCreated(id) => {
                self.record(id, &before);
                let element_type = self
                    .canvas
                    .element(id)
                    .map(|e| e.element_type.as_str().to_string())
                    .unwrap_or_default();
                self.publish(ElementEvent::Added {
                    element_id: id.clone(),
                    element_type,
                });
                self.publish(InteractionEvent::ToolChanged { tool: None });
                self.publish(InteractionEvent::SelectionChanged {
                    element_id: Some(id.clone()),
                });
            }
            CanvasOutcome::ElementCommitted(id) => {
                self.record(id, &before);
                self.publish(ElementEvent::Updated {
                    element_id: id.clone(),
                });
            }
            CanvasOutcome::SelectionChanged(selection) => {
                self.publish(InteractionEvent::SelectionChanged {
                    element_id: selection.clone(),
                });
            }
            CanvasOutcome::PlacementRejected(reason) => {
                self.publish(InteractionEvent::PlacementRejected {
                    reason: reason.code().to_string(),
                });
            }
            CanvasOutcome::Unchanged | CanvasOutcome::GhostUpdated | CanvasOutcome::Panned => {}
        }
    }

    /// Records the change to `element_id` since `before` for undo.
    fn record(&mut self, element_id: &str, before: &[FloorPlanElement]) {
        if let Some(command) = EditorCommand::between(element_id, before, self.canvas.elements()) {
            self.push_command(command);
        }
    }

    /// Escape: drops the tool or gesture in flight.
    pub fn cancel(&mut self) -> bool {
        let had_tool = self.canvas.active_tool().is_some();
        let cancelled = self.canvas.cancel();
        if cancelled {
            self.publish(InteractionEvent::GestureCancelled);
            if had_tool {
                self.publish(InteractionEvent::ToolChanged { tool: None });
            }
        }
        cancelled
    }

    pub fn deselect(&mut self) {
        if self.canvas.deselect() {
            self.publish(InteractionEvent::SelectionChanged { element_id: None });
        }
    }

    /// Adds a fully specified element, e.g. from a property panel.
    pub fn add_element(&mut self, element: FloorPlanElement) -> Result<String, GeometryError> {
        let before = self.canvas.snapshot();
        let id = self.canvas.add_element(element)?;
        self.record(&id, &before);
        let element_type = self
            .canvas
            .element(&id)
            .map(|e| e.element_type.as_str().to_string())
            .unwrap_or_default();
        self.publish(ElementEvent::Added {
            element_id: id.clone(),
            element_type,
        });
        Ok(id)
    }

    /// Deletes an element and drops the match it hosted.
    pub fn remove_element(&mut self, id: &str) -> Option<FloorPlanElement> {
        let before = self.canvas.snapshot();
        let was_selected = self.canvas.selection_manager.is_selected(id);
        let removed = self.canvas.remove_element(id)?;
        self.record(id, &before);
        if let Some(pruned) = self.matches.prune_element(id) {
            self.unmatched(pruned);
        }
        self.publish(ElementEvent::Removed {
            element_id: id.to_string(),
        });
        if was_selected {
            self.publish(InteractionEvent::SelectionChanged { element_id: None });
        }
        Some(removed)
    }

    pub fn delete_selected(&mut self) -> Option<FloorPlanElement> {
        let id = self.canvas.selected_id()?.to_string();
        self.remove_element(&id)
    }

    /// Removes every element of the active plan. Matches go with them.
    pub fn clear_plan(&mut self) -> usize {
        let before = self.canvas.snapshot();
        let count = self.canvas.clear();
        if count == 0 {
            return 0;
        }
        self.push_command(EditorCommand::ReplaceElements {
            name: "Clear Plan",
            before,
            after: self.canvas.snapshot(),
        });
        if !self.matches.is_empty() {
            self.matches.clear();
            self.display.clear();
            self.publish(MatchEvent::Cleared);
        }
        let plan_id = self.plan.as_ref().map(|p| p.id.clone()).unwrap_or_default();
        self.publish(PlanEvent::Cleared { plan_id });
        count
    }

    fn edit_selected(
        &mut self,
        edit: impl FnOnce(&mut crate::canvas::Canvas, &str) -> Result<(), GeometryError>,
    ) -> Result<String, GeometryError> {
        let id = self
            .canvas
            .selected_id()
            .map(str::to_string)
            .ok_or_else(|| GeometryError::ElementNotFound {
                element_id: String::new(),
            })?;
        let before = self.canvas.snapshot();
        edit(&mut self.canvas, &id)?;
        self.record(&id, &before);
        self.publish(ElementEvent::Updated {
            element_id: id.clone(),
        });
        Ok(id)
    }

    /// Sets the extrusion of the selected element.
    pub fn set_selected_depth(&mut self, depth: f64) -> Result<String, GeometryError> {
        self.edit_selected(|canvas, id| canvas.set_depth(id, depth))
    }

    pub fn set_selected_dimensions(&mut self, width: f64, height: f64) -> Result<String, GeometryError> {
        self.edit_selected(|canvas, id| canvas.set_dimensions(id, width, height))
    }

    pub fn set_selected_rotation(&mut self, degrees: f64) -> Result<String, GeometryError> {
        self.edit_selected(|canvas, id| canvas.set_rotation(id, degrees))
    }

    /// Renames the selected element and any match listing that shows it.
    pub fn rename_selected(&mut self, name: &str) -> Result<String, GeometryError> {
        let id = self.edit_selected(|canvas, id| canvas.rename(id, name))?;
        if let Some(furniture_id) = self.matches.furniture_for_element(&id).map(str::to_string) {
            if let Some(element) = self.canvas.element(&id).cloned() {
                // Re-pairing refreshes the cached element name.
                let _ = self.matches.set_match(&furniture_id, &element);
            }
        }
        Ok(id)
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.canvas.toggle_snap()
    }

    pub fn set_grid_size(&mut self, grid_size: f64) -> bool {
        self.canvas.set_grid_size(grid_size)
    }

    pub fn toggle_move_mode(&mut self) -> bool {
        self.canvas.toggle_move_mode()
    }
}
