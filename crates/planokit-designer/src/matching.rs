//! Pairing of furniture templates with floor-plan elements.
//!
//! A match is one-to-one: each furniture is paired with at most one element
//! of the active plan and each element hosts at most one furniture. Setting a
//! match drops whatever either side was previously paired with.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use planokit_core::MatchError;

use crate::furniture::SavedFurniture;
use crate::model::FloorPlanElement;

/// An active furniture ↔ element pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPlanElement {
    pub furniture_id: String,
    pub element_id: String,
    pub element_name: String,
}

/// How a match was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Name,
    Type,
    Manual,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Name => "name",
            MatchKind::Type => "type",
            MatchKind::Manual => "manual",
        }
    }
}

/// Result of an automatic match attempt. Finding nothing is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoMatchOutcome {
    Matched { element_id: String, kind: MatchKind },
    NoCompatibleItem,
}

/// Name shown for an element in match listings: its name, else its type.
pub fn element_match_name(element: &FloorPlanElement) -> String {
    element
        .name
        .clone()
        .unwrap_or_else(|| element.element_type.as_str().to_string())
}

/// Furniture-capable elements whose name or type contains `query`,
/// ignoring case. A blank query lists all of them.
pub fn manual_candidates<'a>(elements: &'a [FloorPlanElement], query: &str) -> Vec<&'a FloorPlanElement> {
    let query = query.trim().to_lowercase();
    elements
        .iter()
        .filter(|e| e.is_furniture_capable())
        .filter(|e| {
            query.is_empty()
                || e.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&query))
                || e.element_type.as_str().contains(&query)
        })
        .collect()
}

/// Active matches of the current plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRegistry {
    by_furniture: BTreeMap<String, MatchedPlanElement>,
    by_element: HashMap<String, String>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_furniture.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_furniture.is_empty()
    }

    /// Matches ordered by furniture id.
    pub fn iter(&self) -> impl Iterator<Item = &MatchedPlanElement> {
        self.by_furniture.values()
    }

    pub fn is_matched(&self, furniture_id: &str) -> bool {
        self.by_furniture.contains_key(furniture_id)
    }

    pub fn match_for(&self, furniture_id: &str) -> Option<&MatchedPlanElement> {
        self.by_furniture.get(furniture_id)
    }

    pub fn furniture_for_element(&self, element_id: &str) -> Option<&str> {
        self.by_element.get(element_id).map(String::as_str)
    }

    /// Best element for `furniture`: first a case-insensitive name match,
    /// then an identical type. Elements already hosting another furniture
    /// are skipped.
    pub fn find_compatible<'a>(
        &self,
        furniture: &SavedFurniture,
        elements: &'a [FloorPlanElement],
    ) -> Option<(&'a FloorPlanElement, MatchKind)> {
        let furniture_id = furniture.id();
        let name = furniture.name().trim().to_lowercase();
        let furniture_type = furniture.furniture.furniture_type.as_str();

        let candidates: Vec<&FloorPlanElement> = elements
            .iter()
            .filter(|e| e.is_furniture_capable())
            .filter(|e| {
                self.furniture_for_element(&e.id)
                    .is_none_or(|owner| owner == furniture_id)
            })
            .collect();

        candidates
            .iter()
            .find(|e| {
                !name.is_empty()
                    && e.name
                        .as_deref()
                        .is_some_and(|n| n.trim().to_lowercase() == name)
            })
            .map(|e| (*e, MatchKind::Name))
            .or_else(|| {
                candidates
                    .iter()
                    .find(|e| e.element_type.as_str().eq_ignore_ascii_case(furniture_type))
                    .map(|e| (*e, MatchKind::Type))
            })
    }

    /// Matches `furniture` automatically against `elements`.
    pub fn auto_match(
        &mut self,
        furniture: &SavedFurniture,
        elements: &[FloorPlanElement],
    ) -> AutoMatchOutcome {
        match self.find_compatible(furniture, elements) {
            Some((element, kind)) => {
                let element_id = element.id.clone();
                self.insert(furniture.id(), element);
                tracing::info!(
                    "Matched furniture {} to {} by {}",
                    furniture.id(),
                    element_id,
                    kind.as_str()
                );
                AutoMatchOutcome::Matched { element_id, kind }
            }
            None => {
                tracing::debug!("No compatible element for furniture {}", furniture.id());
                AutoMatchOutcome::NoCompatibleItem
            }
        }
    }

    /// Pairs `furniture_id` with `element`, replacing any earlier pairing of
    /// either side. Returns the pairings that were dropped.
    pub fn set_match(
        &mut self,
        furniture_id: &str,
        element: &FloorPlanElement,
    ) -> Result<Vec<MatchedPlanElement>, MatchError> {
        if !element.is_furniture_capable() {
            return Err(MatchError::NotFurnitureCapable {
                element_id: element.id.clone(),
                element_type: element.element_type.to_string(),
            });
        }
        let replaced = self.insert(furniture_id, element);
        tracing::info!("Matched furniture {} to {} manually", furniture_id, element.id);
        Ok(replaced)
    }

    /// Removes the match of `furniture_id` only.
    pub fn cancel(&mut self, furniture_id: &str) -> Option<MatchedPlanElement> {
        let removed = self.by_furniture.remove(furniture_id)?;
        self.by_element.remove(&removed.element_id);
        Some(removed)
    }

    /// Drops the match hosted by `element_id`, e.g. after the element was deleted.
    pub fn prune_element(&mut self, element_id: &str) -> Option<MatchedPlanElement> {
        let furniture_id = self.by_element.remove(element_id)?;
        self.by_furniture.remove(&furniture_id)
    }

    /// Drops matches whose element is no longer in `elements`.
    pub fn retain_elements(&mut self, elements: &[FloorPlanElement]) -> Vec<MatchedPlanElement> {
        let stale: Vec<String> = self
            .by_element
            .keys()
            .filter(|id| !elements.iter().any(|e| &e.id == *id))
            .cloned()
            .collect();
        stale
            .iter()
            .filter_map(|id| self.prune_element(id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.by_furniture.clear();
        self.by_element.clear();
    }

    fn insert(&mut self, furniture_id: &str, element: &FloorPlanElement) -> Vec<MatchedPlanElement> {
        let mut replaced = Vec::new();
        if let Some(previous) = self.cancel(furniture_id) {
            if previous.element_id != element.id {
                replaced.push(previous);
            }
        }
        if let Some(previous) = self.prune_element(&element.id) {
            replaced.push(previous);
        }
        self.by_element
            .insert(element.id.clone(), furniture_id.to_string());
        self.by_furniture.insert(
            furniture_id.to_string(),
            MatchedPlanElement {
                furniture_id: furniture_id.to_string(),
                element_id: element.id.clone(),
                element_name: element_match_name(element),
            },
        );
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::furniture::{FurnitureItem, FurnitureType};
    use crate::model::ElementType;

    fn saved(id: &str, name: &str, kind: FurnitureType) -> SavedFurniture {
        SavedFurniture::new(FurnitureItem::new(id, name, kind), vec![])
    }

    fn plan() -> Vec<FloorPlanElement> {
        vec![
            FloorPlanElement::new("w", ElementType::Wall, 0.0, 0.0).with_name("Gondola Centrale"),
            FloorPlanElement::new("g1", ElementType::Gondola, 0.0, 0.0).with_name("Gondola 1"),
            FloorPlanElement::new("g2", ElementType::Gondola, 0.0, 0.0).with_name("Gondola Centrale"),
            FloorPlanElement::new("t", ElementType::Table, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_name_beats_type() {
        let mut registry = MatchRegistry::new();
        let outcome = registry.auto_match(&saved("f", "gondola centrale", FurnitureType::Gondola), &plan());
        assert_eq!(
            outcome,
            AutoMatchOutcome::Matched {
                element_id: "g2".into(),
                kind: MatchKind::Name
            }
        );
        assert_eq!(registry.match_for("f").unwrap().element_name, "Gondola Centrale");
    }

    #[test]
    fn test_type_fallback_skips_taken_elements() {
        let mut registry = MatchRegistry::new();
        let elements = plan();
        registry.auto_match(&saved("a", "Main", FurnitureType::Gondola), &elements);
        registry.auto_match(&saved("b", "Other", FurnitureType::Gondola), &elements);
        assert_eq!(registry.match_for("a").unwrap().element_id, "g1");
        assert_eq!(registry.match_for("b").unwrap().element_id, "g2");
        assert_eq!(
            registry.auto_match(&saved("c", "Third", FurnitureType::Gondola), &elements),
            AutoMatchOutcome::NoCompatibleItem
        );
    }

    #[test]
    fn test_no_compatible_item() {
        let mut registry = MatchRegistry::new();
        let outcome = registry.auto_match(&saved("f", "Rack", FurnitureType::ClothingRack), &plan());
        assert_eq!(outcome, AutoMatchOutcome::NoCompatibleItem);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_set_match_replaces_both_sides() {
        let elements = plan();
        let mut registry = MatchRegistry::new();
        registry.set_match("a", &elements[1]).unwrap();
        registry.set_match("b", &elements[2]).unwrap();
        let replaced = registry.set_match("a", &elements[2]).unwrap();
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].furniture_id, "b");
        assert!(!registry.is_matched("b"));
        assert_eq!(registry.furniture_for_element("g2"), Some("a"));
        assert_eq!(registry.furniture_for_element("g1"), None);
    }

    #[test]
    fn test_set_match_rejects_walls() {
        let mut registry = MatchRegistry::new();
        assert!(matches!(
            registry.set_match("a", &plan()[0]),
            Err(MatchError::NotFurnitureCapable { .. })
        ));
    }

    #[test]
    fn test_cancel_and_prune() {
        let elements = plan();
        let mut registry = MatchRegistry::new();
        registry.set_match("a", &elements[1]).unwrap();
        registry.set_match("b", &elements[3]).unwrap();
        assert!(registry.cancel("a").is_some());
        assert!(registry.prune_element("t").is_some());
        assert!(registry.is_empty());

        registry.set_match("a", &elements[1]).unwrap();
        let dropped = registry.retain_elements(&elements[2..]);
        assert_eq!(dropped.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_manual_candidates() {
        let elements = plan();
        let ids: Vec<&str> = manual_candidates(&elements, "CENTRALE").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["g2"]);
        assert_eq!(manual_candidates(&elements, "tab").len(), 1);
        assert_eq!(manual_candidates(&elements, "").len(), 3);
    }
}
