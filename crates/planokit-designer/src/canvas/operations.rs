//! Element edits and hit testing for Canvas.

use std::sync::Arc;

use planokit_core::GeometryError;

use super::types::{rotate_handle_position, Handle, ResizeHandle, HANDLE_RADIUS, ROTATE_HANDLE_OFFSET};
use super::Canvas;
use crate::geometry::Point;
use crate::model::{ElementType, FloorPlanElement};
use crate::validity::{attach_to_wall, check_placement, find_parent_wall};

impl Canvas {
    /// Replaces every element, e.g. when another plan becomes active.
    /// Selection and any gesture in flight are dropped.
    pub fn load_elements(&mut self, elements: Vec<FloorPlanElement>) {
        self.cancel();
        self.selection_manager.clear();
        self.mutate(|all| *all = elements);
        self.revalidate_openings();
    }

    /// Adds an element after normalising its rotation and checking it.
    pub fn add_element(&mut self, mut element: FloorPlanElement) -> Result<String, GeometryError> {
        element.normalize_rotation();
        element.validate()?;
        let id = element.id.clone();
        let opening = element.element_type.requires_wall();
        self.mutate(|all| all.push(element));
        if opening {
            self.revalidate_openings();
        }
        Ok(id)
    }

    pub fn remove_element(&mut self, id: &str) -> Option<FloorPlanElement> {
        let index = self.elements().iter().position(|e| e.id == id)?;
        if self.state.is_gesture() {
            self.cancel();
        }
        let removed = self.mutate(|all| all.remove(index));
        self.selection_manager.forget(id);
        if removed.element_type == ElementType::Wall {
            self.revalidate_openings();
        }
        tracing::debug!("Removed element {}", id);
        Some(removed)
    }

    /// Deletes the selected element and clears the selection.
    pub fn delete_selected(&mut self) -> Option<FloorPlanElement> {
        let id = self.selected_id()?.to_string();
        self.remove_element(&id)
    }

    /// Removes every element. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        self.cancel();
        self.selection_manager.clear();
        let count = self.element_count();
        if count > 0 {
            self.mutate(|all| all.clear());
        }
        count
    }

    /// Applies `edit` to a copy of the element and commits it if it is
    /// still valid.
    pub fn update_element(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut FloorPlanElement),
    ) -> Result<(), GeometryError> {
        let index = self
            .elements()
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| GeometryError::ElementNotFound {
                element_id: id.to_string(),
            })?;
        let mut updated = self.elements()[index].clone();
        edit(&mut updated);
        updated.normalize_rotation();
        updated.validate()?;
        let wall_changed = updated.element_type == ElementType::Wall
            || updated.element_type.requires_wall();
        self.mutate(|all| all[index] = updated);
        if wall_changed {
            self.revalidate_openings();
        }
        Ok(())
    }

    pub fn set_depth(&mut self, id: &str, depth: f64) -> Result<(), GeometryError> {
        self.update_element(id, |e| e.depth = depth)
    }

    pub fn set_dimensions(&mut self, id: &str, width: f64, height: f64) -> Result<(), GeometryError> {
        self.update_element(id, |e| {
            e.width = width;
            e.height = height;
        })
    }

    pub fn set_rotation(&mut self, id: &str, degrees: f64) -> Result<(), GeometryError> {
        self.update_element(id, |e| e.rotation = degrees)
    }

    pub fn move_element_to(&mut self, id: &str, x: f64, y: f64) -> Result<(), GeometryError> {
        self.update_element(id, |e| {
            e.x = x;
            e.y = y;
        })
    }

    /// Renames an element. A blank name falls back to the type label.
    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), GeometryError> {
        let name = name.trim();
        self.update_element(id, |e| {
            e.name = (!name.is_empty()).then(|| name.to_string());
        })
    }

    /// Topmost element under `point`, with `tolerance` in plan units.
    pub fn element_at(&self, point: &Point, tolerance: f64) -> Option<&FloorPlanElement> {
        self.elements()
            .iter()
            .rev()
            .find(|e| e.contains_point(point, tolerance))
    }

    /// Handle of the selected element under `point`, if any.
    pub fn handle_at(&self, point: &Point) -> Option<Handle> {
        let element = self.selected_element()?;
        let radius = self.viewport.screen_distance_to_plan(HANDLE_RADIUS);
        let rotate = rotate_handle_position(
            element,
            self.viewport.screen_distance_to_plan(ROTATE_HANDLE_OFFSET),
        );
        if rotate.distance_to(point) <= radius {
            return Some(Handle::Rotate);
        }
        ResizeHandle::ALL
            .iter()
            .find(|h| h.position(element).distance_to(point) <= radius)
            .map(|h| Handle::Resize(*h))
    }

    /// Puts a previously removed element back at `index` (clamped to the end).
    pub(crate) fn restore_element(&mut self, index: usize, element: FloorPlanElement) {
        self.cancel();
        self.mutate(|all| {
            let index = index.min(all.len());
            all.insert(index, element);
        });
        self.revalidate_openings();
    }

    /// Overwrites the element with the same id without re-checking it.
    pub(crate) fn replace_element(&mut self, element: FloorPlanElement) -> bool {
        let Some(index) = self.elements().iter().position(|e| e.id == element.id) else {
            return false;
        };
        self.cancel();
        self.mutate(|all| all[index] = element);
        self.revalidate_openings();
        true
    }

    /// Swaps in a whole collection taken earlier with [`Canvas::snapshot`].
    pub(crate) fn restore_snapshot(&mut self, snapshot: Arc<Vec<FloorPlanElement>>) {
        self.cancel();
        self.elements = snapshot;
        self.revision += 1;
        if let Some(id) = self.selected_id().map(str::to_string) {
            if self.element(&id).is_none() {
                self.selection_manager.forget(&id);
            }
        }
        self.revalidate_openings();
    }

    /// Recomputes `valid` (and the parent wall of windows) for every door
    /// and window. Only publishes a new collection when something changed.
    pub(crate) fn revalidate_openings(&mut self) {
        let tolerance = self.settings.wall_tolerance;
        let elements = self.elements();
        let updates: Vec<(usize, FloorPlanElement)> = elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.element_type.requires_wall())
            .filter_map(|(index, opening)| {
                let mut updated = opening.clone();
                updated.valid = Some(check_placement(opening, elements, tolerance).valid);
                if opening.element_type == ElementType::Window {
                    match find_parent_wall(opening, elements, tolerance) {
                        Some(wall) => attach_to_wall(&mut updated, wall),
                        None => updated.parent_wall_id = None,
                    }
                }
                (updated != *opening).then_some((index, updated))
            })
            .collect();

        if !updates.is_empty() {
            self.mutate(|all| {
                for (index, updated) in updates {
                    all[index] = updated;
                }
            });
        }
    }
}
