use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ElementType, FloorPlanElement};
use crate::geometry::Bounds;

/// A named floor plan, the unit the persistence adapter stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlan {
    pub id: String,
    pub name: String,
    pub elements: Vec<FloorPlanElement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FloorPlan {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("plan-{}", uuid::Uuid::new_v4()),
            name: name.into(),
            elements: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_elements(mut self, elements: Vec<FloorPlanElement>) -> Self {
        self.elements = elements;
        self
    }

    pub fn element(&self, id: &str) -> Option<&FloorPlanElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn elements_of_type(&self, element_type: ElementType) -> impl Iterator<Item = &FloorPlanElement> {
        self.elements
            .iter()
            .filter(move |e| e.element_type == element_type)
    }

    /// Union of all element bounds, `None` for an empty plan.
    pub fn bounds(&self) -> Option<Bounds> {
        self.elements
            .iter()
            .map(FloorPlanElement::bounds)
            .reduce(|a, b| a.union(&b))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
