//! Furniture library, matches and store placement.

use planokit_core::{MatchError, MatchEvent};

use super::DesignerState;
use crate::furniture::{FurnitureItem, FurnitureProduct, SavedFurniture};
use crate::matching::{manual_candidates, AutoMatchOutcome, MatchKind, MatchedPlanElement};
use crate::model::FloorPlanElement;
use crate::store_display::{AutoPlacementReport, PlacedFurniture, StoreLayout};

impl DesignerState {
    /// Replaces the furniture library, dropping matches and placements of
    /// templates that are gone.
    pub fn set_library(&mut self, items: Vec<SavedFurniture>) {
        self.library = crate::furniture::FurnitureLibrary::from_items(items);
        let stale: Vec<String> = self
            .matches
            .iter()
            .filter(|m| self.library.get(&m.furniture_id).is_none())
            .map(|m| m.furniture_id.clone())
            .collect();
        for furniture_id in stale {
            self.matches.cancel(&furniture_id);
            self.display.remove_furniture(&furniture_id);
            self.publish(MatchEvent::Unmatched { furniture_id });
        }
    }

    pub fn add_furniture(&mut self, saved: SavedFurniture) -> String {
        self.library.add(saved).id().to_string()
    }

    pub fn update_furniture(
        &mut self,
        id: &str,
        furniture: FurnitureItem,
        products: Vec<FurnitureProduct>,
        description: Option<String>,
    ) -> Result<(), MatchError> {
        let name = furniture.name.clone();
        self.library.update(id, furniture, products, description)?;
        self.display.rename(id, &name);
        Ok(())
    }

    /// Deletes a template together with its match and placements.
    pub fn remove_furniture(&mut self, id: &str) -> Option<SavedFurniture> {
        let removed = self.library.remove(id)?;
        if let Some(cancelled) = self.matches.cancel(id) {
            self.unmatched(cancelled);
        }
        self.display.remove_furniture(id);
        Some(removed)
    }

    /// Publishes a dropped pairing and removes the placements made from it.
    pub(crate) fn unmatched(&mut self, removed: MatchedPlanElement) {
        let placements = self.display.remove_furniture(&removed.furniture_id);
        if placements > 0 {
            tracing::debug!(
                "Removed {} placement(s) of {} with its match",
                placements,
                removed.furniture_id
            );
        }
        self.publish(MatchEvent::Unmatched {
            furniture_id: removed.furniture_id,
        });
    }

    fn furniture(&self, furniture_id: &str) -> Result<&SavedFurniture, MatchError> {
        self.library
            .get(furniture_id)
            .ok_or_else(|| MatchError::FurnitureNotFound {
                furniture_id: furniture_id.to_string(),
            })
    }

    fn require_plan(&self) -> Result<(), MatchError> {
        match self.plan {
            Some(_) => Ok(()),
            None => Err(MatchError::NoActivePlan),
        }
    }

    /// Automatic match of one template against the active plan.
    pub fn auto_match(&mut self, furniture_id: &str) -> Result<AutoMatchOutcome, MatchError> {
        self.require_plan()?;
        let furniture = self.furniture(furniture_id)?.clone();
        let previous = self
            .matches
            .match_for(furniture_id)
            .map(|m| m.element_id.clone());
        let outcome = self.matches.auto_match(&furniture, self.canvas.elements());
        match &outcome {
            AutoMatchOutcome::Matched { element_id, kind } => {
                if previous.as_ref().is_some_and(|p| p != element_id) {
                    self.display.remove_furniture(furniture_id);
                }
                self.publish(MatchEvent::Matched {
                    furniture_id: furniture_id.to_string(),
                    element_id: element_id.clone(),
                    kind: kind.as_str().to_string(),
                })
            }
            AutoMatchOutcome::NoCompatibleItem => self.publish(MatchEvent::NoCompatibleItem {
                furniture_id: furniture_id.to_string(),
            }),
        }
        Ok(outcome)
    }

    /// Elements a user may pick for a manual match.
    pub fn match_candidates(&self, query: &str) -> Vec<&FloorPlanElement> {
        manual_candidates(self.canvas.elements(), query)
    }

    /// Manual match, overwriting earlier pairings of either side.
    pub fn set_match(&mut self, furniture_id: &str, element_id: &str) -> Result<(), MatchError> {
        self.require_plan()?;
        self.furniture(furniture_id)?;
        let element = self
            .canvas
            .element(element_id)
            .cloned()
            .ok_or_else(|| MatchError::ElementNotFound {
                element_id: element_id.to_string(),
            })?;
        let replaced = self.matches.set_match(furniture_id, &element)?;
        for previous in replaced {
            if previous.furniture_id == furniture_id {
                self.display.remove_furniture(furniture_id);
            } else {
                self.unmatched(previous);
            }
        }
        self.publish(MatchEvent::Matched {
            furniture_id: furniture_id.to_string(),
            element_id: element_id.to_string(),
            kind: MatchKind::Manual.as_str().to_string(),
        });
        Ok(())
    }

    /// Drops the match of `furniture_id` and any placement made from it.
    /// The template stays in the library.
    pub fn cancel_match(&mut self, furniture_id: &str) -> bool {
        match self.matches.cancel(furniture_id) {
            Some(cancelled) => {
                self.unmatched(cancelled);
                true
            }
            None => false,
        }
    }

    /// Drops a matched template into the store scene over its element.
    pub fn place_furniture(&mut self, furniture_id: &str) -> Result<PlacedFurniture, MatchError> {
        let furniture = self.furniture(furniture_id)?.clone();
        let placed = self
            .display
            .place_matched(&furniture, &self.matches, self.canvas.elements())?
            .clone();
        self.publish(MatchEvent::Placed {
            furniture_id: furniture_id.to_string(),
            placement_id: placed.id.clone(),
        });
        Ok(placed)
    }

    /// Matches and places every template that has a compatible element.
    pub fn auto_place_all(&mut self) -> Result<AutoPlacementReport, MatchError> {
        self.require_plan()?;
        let report = self
            .display
            .auto_place_all(&self.library, &mut self.matches, self.canvas.elements());
        for placement_id in &report.placed {
            if let Some(placed) = self.display.get(placement_id) {
                self.publish(MatchEvent::Placed {
                    furniture_id: placed.saved_furniture_id.clone(),
                    placement_id: placement_id.clone(),
                });
            }
        }
        for furniture_id in &report.unmatched {
            self.publish(MatchEvent::NoCompatibleItem {
                furniture_id: furniture_id.clone(),
            });
        }
        tracing::info!(
            "Automatic placement: {} placed, {} without a compatible element",
            report.placed.len(),
            report.unmatched.len()
        );
        Ok(report)
    }

    pub fn remove_placement(&mut self, placement_id: &str) -> Option<PlacedFurniture> {
        self.display.remove(placement_id)
    }

    pub fn store_layout(&self, name: &str, description: Option<String>) -> StoreLayout {
        self.display.to_store_layout(name, description)
    }

    /// Restores a saved layout. Returns template ids missing from the library.
    pub fn load_store_layout(&mut self, layout: &StoreLayout) -> Vec<String> {
        self.display.load_layout(layout, &self.library)
    }
}
