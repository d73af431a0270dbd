//! Furniture placed in the 3D store scene and its persisted layout form.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use planokit_core::MatchError;

use crate::furniture::{FurnitureLibrary, SavedFurniture};
use crate::matching::{AutoMatchOutcome, MatchRegistry};
use crate::model::FloorPlanElement;
use crate::scene::{auto_placement, DEFAULT_ROOM_SIZE};

/// A furniture template standing in the store scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedFurniture {
    pub id: String,
    pub saved_furniture_id: String,
    pub saved_furniture: SavedFurniture,
    #[serde(rename = "type")]
    pub furniture_type: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotation: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_element_name: Option<String>,
}

/// Pose of one furniture in a saved layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    pub furniture_id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotation: f64,
}

/// Persisted arrangement of a store scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreLayout {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub furniture: Vec<LayoutEntry>,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

/// Summary of [`StoreDisplay::auto_place_all`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoPlacementReport {
    pub placed: Vec<String>,
    /// Furniture ids for which no compatible element exists.
    pub unmatched: Vec<String>,
}

/// Furniture placed in the store scene.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreDisplay {
    placed: Vec<PlacedFurniture>,
    room_width: f64,
    room_depth: f64,
}

impl StoreDisplay {
    pub fn new(room_width: f64, room_depth: f64) -> Self {
        Self {
            placed: Vec::new(),
            room_width,
            room_depth,
        }
    }

    pub fn placed(&self) -> &[PlacedFurniture] {
        &self.placed
    }

    pub fn get(&self, id: &str) -> Option<&PlacedFurniture> {
        self.placed.iter().find(|p| p.id == id)
    }

    pub fn room_size(&self) -> (f64, f64) {
        (self.room_width, self.room_depth)
    }

    /// Places `furniture` over the element it is matched to. Placing the
    /// same furniture again moves the existing placement.
    pub fn place_matched(
        &mut self,
        furniture: &SavedFurniture,
        matches: &MatchRegistry,
        elements: &[FloorPlanElement],
    ) -> Result<&PlacedFurniture, MatchError> {
        let matched = matches
            .match_for(furniture.id())
            .ok_or_else(|| MatchError::NotMatched {
                furniture_id: furniture.id().to_string(),
            })?;
        let element = elements
            .iter()
            .find(|e| e.id == matched.element_id)
            .ok_or_else(|| MatchError::ElementNotFound {
                element_id: matched.element_id.clone(),
            })?;

        let pose = auto_placement(element, self.room_width, self.room_depth);
        let item = &furniture.furniture;
        let existing = self
            .placed
            .iter()
            .position(|p| p.saved_furniture_id == item.id);
        let placed = PlacedFurniture {
            id: existing
                .map(|i| self.placed[i].id.clone())
                .unwrap_or_else(|| format!("placed-{}", Uuid::new_v4())),
            saved_furniture_id: item.id.clone(),
            saved_furniture: furniture.clone(),
            furniture_type: item.furniture_type.to_string(),
            x: pose.x,
            y: pose.y,
            z: pose.z,
            rotation: pose.rotation,
            width: item.width,
            height: item.height,
            depth: item.depth,
            matched_element_name: Some(matched.element_name.clone()),
        };
        tracing::info!(
            "Placed furniture {} at ({:.2}, {:.2}) over {}",
            item.id,
            placed.x,
            placed.z,
            matched.element_id
        );

        let index = match existing {
            Some(index) => {
                self.placed[index] = placed;
                index
            }
            None => {
                self.placed.push(placed);
                self.placed.len() - 1
            }
        };
        Ok(&self.placed[index])
    }

    /// Matches every library template that is not matched yet and places
    /// every matched one.
    pub fn auto_place_all(
        &mut self,
        library: &FurnitureLibrary,
        matches: &mut MatchRegistry,
        elements: &[FloorPlanElement],
    ) -> AutoPlacementReport {
        let mut report = AutoPlacementReport::default();
        for furniture in library.iter() {
            if !matches.is_matched(furniture.id())
                && matches.auto_match(furniture, elements) == AutoMatchOutcome::NoCompatibleItem
            {
                report.unmatched.push(furniture.id().to_string());
                continue;
            }
            match self.place_matched(furniture, matches, elements) {
                Ok(placed) => report.placed.push(placed.id.clone()),
                Err(e) => {
                    tracing::warn!("Could not place {}: {}", furniture.id(), e);
                    report.unmatched.push(furniture.id().to_string());
                }
            }
        }
        report
    }

    pub fn move_to(&mut self, id: &str, x: f64, y: f64, z: f64) -> bool {
        match self.placed.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.x = x;
                p.y = y;
                p.z = z;
                true
            }
            None => false,
        }
    }

    pub fn rotate(&mut self, id: &str, degrees: f64) -> bool {
        match self.placed.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.rotation = crate::geometry::normalize_degrees(degrees);
                true
            }
            None => false,
        }
    }

    /// Renames the template copy held by every placement of `saved_furniture_id`.
    pub fn rename(&mut self, saved_furniture_id: &str, name: &str) -> usize {
        let name = name.trim();
        let mut renamed = 0;
        for p in self
            .placed
            .iter_mut()
            .filter(|p| p.saved_furniture_id == saved_furniture_id)
        {
            p.saved_furniture.furniture.name = name.to_string();
            renamed += 1;
        }
        renamed
    }

    pub fn remove(&mut self, id: &str) -> Option<PlacedFurniture> {
        let index = self.placed.iter().position(|p| p.id == id)?;
        Some(self.placed.remove(index))
    }

    /// Removes every placement of a template, e.g. after it was deleted.
    pub fn remove_furniture(&mut self, saved_furniture_id: &str) -> usize {
        let before = self.placed.len();
        self.placed
            .retain(|p| p.saved_furniture_id != saved_furniture_id);
        before - self.placed.len()
    }

    pub fn clear(&mut self) {
        self.placed.clear();
    }

    /// Snapshot of the current scene as a layout record.
    pub fn to_store_layout(&self, name: &str, description: Option<String>) -> StoreLayout {
        let now = Utc::now().timestamp_millis();
        StoreLayout {
            id: format!("layout-{}", Uuid::new_v4()),
            name: name.to_string(),
            description,
            furniture: self
                .placed
                .iter()
                .map(|p| LayoutEntry {
                    furniture_id: p.saved_furniture_id.clone(),
                    x: p.x,
                    y: p.y,
                    z: p.z,
                    rotation: p.rotation,
                })
                .collect(),
            created_at: now,
            updated_at: now,
            store_id: None,
        }
    }

    /// Replaces the scene with `layout`. Entries whose template is missing
    /// from `library` are skipped and returned.
    pub fn load_layout(&mut self, layout: &StoreLayout, library: &FurnitureLibrary) -> Vec<String> {
        let mut missing = Vec::new();
        self.placed.clear();
        for entry in &layout.furniture {
            let Some(furniture) = library.get(&entry.furniture_id) else {
                missing.push(entry.furniture_id.clone());
                continue;
            };
            let item = &furniture.furniture;
            self.placed.push(PlacedFurniture {
                id: format!("placed-{}", Uuid::new_v4()),
                saved_furniture_id: item.id.clone(),
                saved_furniture: furniture.clone(),
                furniture_type: item.furniture_type.to_string(),
                x: entry.x,
                y: entry.y,
                z: entry.z,
                rotation: entry.rotation,
                width: item.width,
                height: item.height,
                depth: item.depth,
                matched_element_name: None,
            });
        }
        if !missing.is_empty() {
            tracing::warn!("Layout {} references {} unknown furniture", layout.id, missing.len());
        }
        missing
    }
}

impl Default for StoreDisplay {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_SIZE, DEFAULT_ROOM_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::furniture::{FurnitureItem, FurnitureType};
    use crate::model::ElementType;

    fn gondola() -> SavedFurniture {
        SavedFurniture::new(
            FurnitureItem::new("f1", "Gondola Centrale", FurnitureType::Gondola).with_size(2.0, 1.8, 0.6),
            vec![],
        )
    }

    fn elements() -> Vec<FloorPlanElement> {
        vec![FloorPlanElement::new("g", ElementType::Gondola, 400.0, 600.0).with_name("gondola centrale")]
    }

    #[test]
    fn test_place_requires_match() {
        let mut display = StoreDisplay::default();
        let err = display
            .place_matched(&gondola(), &MatchRegistry::new(), &elements())
            .unwrap_err();
        assert!(matches!(err, MatchError::NotMatched { .. }));
    }

    #[test]
    fn test_place_uses_auto_placement() {
        let mut display = StoreDisplay::default();
        let mut matches = MatchRegistry::new();
        let elements = elements();
        matches.auto_match(&gondola(), &elements);
        let placed = display.place_matched(&gondola(), &matches, &elements).unwrap().clone();
        assert!((placed.x - 0.0).abs() < 1e-12);
        assert!((placed.z - 1.3).abs() < 1e-12);
        assert_eq!(placed.furniture_type, "gondola");
        assert_eq!(placed.matched_element_name.as_deref(), Some("gondola centrale"));

        // Placing again moves the same placement
        let again = display.place_matched(&gondola(), &matches, &elements).unwrap();
        assert_eq!(again.id, placed.id);
        assert_eq!(display.placed().len(), 1);
    }

    #[test]
    fn test_auto_place_all_and_layout() {
        let mut library = FurnitureLibrary::new();
        library.add(gondola());
        library.add(SavedFurniture::new(
            FurnitureItem::new("f2", "Fridge", FurnitureType::Refrigerator),
            vec![],
        ));
        let mut display = StoreDisplay::default();
        let mut matches = MatchRegistry::new();
        let report = display.auto_place_all(&library, &mut matches, &elements());
        assert_eq!(report.placed.len(), 1);
        assert_eq!(report.unmatched, vec!["f2".to_string()]);

        let layout = display.to_store_layout("Spring", None);
        assert_eq!(layout.furniture.len(), 1);
        assert_eq!(layout.furniture[0].furniture_id, "f1");

        let mut restored = StoreDisplay::default();
        let missing = restored.load_layout(&layout, &library);
        assert!(missing.is_empty());
        assert_eq!(restored.placed()[0].x, display.placed()[0].x);
    }

    #[test]
    fn test_rename_and_remove() {
        let mut display = StoreDisplay::default();
        let mut matches = MatchRegistry::new();
        let elements = elements();
        matches.auto_match(&gondola(), &elements);
        let id = display.place_matched(&gondola(), &matches, &elements).unwrap().id.clone();
        assert_eq!(display.rename("f1", " Island "), 1);
        assert_eq!(display.get(&id).unwrap().saved_furniture.furniture.name, "Island");
        assert_eq!(display.remove_furniture("f1"), 1);
        assert!(display.remove(&id).is_none());
    }
}
