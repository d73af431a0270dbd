//! Event type definitions for the change bus.
//!
//! Events carry ids and plain values only, so presentation layers can react
//! to a change and then query the editor state for the new snapshot.

use serde::{Deserialize, Serialize};

/// Root event enum for all editor events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    /// Active floor plan lifecycle
    Plan(PlanEvent),
    /// Element collection changes
    Element(ElementEvent),
    /// Tool, selection and gesture changes
    Interaction(InteractionEvent),
    /// Furniture matching and scene placement
    Match(MatchEvent),
    /// Planogram grid changes
    Planogram(PlanogramEvent),
    /// Asynchronous data loads
    Load(LoadEvent),
}

impl EditorEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EditorEvent::Plan(_) => EventCategory::Plan,
            EditorEvent::Element(_) => EventCategory::Element,
            EditorEvent::Interaction(_) => EventCategory::Interaction,
            EditorEvent::Match(_) => EventCategory::Match,
            EditorEvent::Planogram(_) => EventCategory::Planogram,
            EditorEvent::Load(_) => EventCategory::Load,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EditorEvent::Plan(e) => e.description(),
            EditorEvent::Element(e) => e.description(),
            EditorEvent::Interaction(e) => e.description(),
            EditorEvent::Match(e) => e.description(),
            EditorEvent::Planogram(e) => e.description(),
            EditorEvent::Load(e) => e.description(),
        }
    }
}

macro_rules! impl_from_event {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for EditorEvent {
                fn from(event: $ty) -> Self {
                    EditorEvent::$variant(event)
                }
            }
        )*
    };
}

impl_from_event!(
    Plan(PlanEvent),
    Element(ElementEvent),
    Interaction(InteractionEvent),
    Match(MatchEvent),
    Planogram(PlanogramEvent),
    Load(LoadEvent),
);

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Active floor plan lifecycle.
    Plan,
    /// Element collection changes.
    Element,
    /// Tool, selection and gesture changes.
    Interaction,
    /// Furniture matching.
    Match,
    /// Planogram grid changes.
    Planogram,
    /// Data loading.
    Load,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Plan => write!(f, "Plan"),
            EventCategory::Element => write!(f, "Element"),
            EventCategory::Interaction => write!(f, "Interaction"),
            EventCategory::Match => write!(f, "Match"),
            EventCategory::Planogram => write!(f, "Planogram"),
            EventCategory::Load => write!(f, "Load"),
        }
    }
}

/// Floor plan lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanEvent {
    /// A plan became the active one
    Activated { plan_id: String, name: String },
    /// All elements were removed
    Cleared { plan_id: String },
    /// A plan document was imported
    Imported { plan_id: String, element_count: usize },
    /// The plan was handed to the persistence adapter
    Saved { plan_id: String },
}

impl PlanEvent {
    pub fn description(&self) -> String {
        match self {
            PlanEvent::Activated { name, .. } => format!("Plan '{}' activated", name),
            PlanEvent::Cleared { plan_id } => format!("Plan {} cleared", plan_id),
            PlanEvent::Imported {
                plan_id,
                element_count,
            } => format!("Plan {} imported ({} elements)", plan_id, element_count),
            PlanEvent::Saved { plan_id } => format!("Plan {} saved", plan_id),
        }
    }
}

/// Element collection events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementEvent {
    /// An element was created by a placement
    Added { element_id: String, element_type: String },
    /// An element's geometry or properties were committed
    Updated { element_id: String },
    /// An element was deleted
    Removed { element_id: String },
    /// The whole collection was swapped, e.g. by undo of a clear
    Reloaded { element_count: usize },
}

impl ElementEvent {
    pub fn description(&self) -> String {
        match self {
            ElementEvent::Added {
                element_id,
                element_type,
            } => format!("Added {} {}", element_type, element_id),
            ElementEvent::Updated { element_id } => format!("Updated {}", element_id),
            ElementEvent::Removed { element_id } => format!("Removed {}", element_id),
            ElementEvent::Reloaded { element_count } => {
                format!("Elements reloaded ({})", element_count)
            }
        }
    }
}

/// Interaction events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InteractionEvent {
    /// The placement tool changed (`None` returns to selection)
    ToolChanged { tool: Option<String> },
    /// The selection changed
    SelectionChanged { element_id: Option<String> },
    /// A placement click was ignored because the ghost is invalid
    PlacementRejected { reason: String },
    /// A gesture was abandoned without touching the model
    GestureCancelled,
}

impl InteractionEvent {
    pub fn description(&self) -> String {
        match self {
            InteractionEvent::ToolChanged { tool } => match tool {
                Some(tool) => format!("Tool: {}", tool),
                None => "Tool cleared".to_string(),
            },
            InteractionEvent::SelectionChanged { element_id } => match element_id {
                Some(id) => format!("Selected {}", id),
                None => "Selection cleared".to_string(),
            },
            InteractionEvent::PlacementRejected { reason } => {
                format!("Placement rejected: {}", reason)
            }
            InteractionEvent::GestureCancelled => "Gesture cancelled".to_string(),
        }
    }
}

/// Matching events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A furniture template was paired with an element
    Matched {
        furniture_id: String,
        element_id: String,
        kind: String,
    },
    /// A pairing was removed
    Unmatched { furniture_id: String },
    /// Every pairing was dropped
    Cleared,
    /// No compatible element exists for the furniture
    NoCompatibleItem { furniture_id: String },
    /// Matched furniture was placed in the store scene
    Placed {
        furniture_id: String,
        placement_id: String,
    },
}

impl MatchEvent {
    pub fn description(&self) -> String {
        match self {
            MatchEvent::Matched {
                furniture_id,
                element_id,
                kind,
            } => format!("{} matched to {} by {}", furniture_id, element_id, kind),
            MatchEvent::Unmatched { furniture_id } => format!("{} unmatched", furniture_id),
            MatchEvent::Cleared => "Matches cleared".to_string(),
            MatchEvent::NoCompatibleItem { furniture_id } => {
                format!("No compatible item for {}", furniture_id)
            }
            MatchEvent::Placed {
                furniture_id,
                placement_id,
            } => format!("{} placed as {}", furniture_id, placement_id),
        }
    }
}

/// Planogram grid events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanogramEvent {
    /// The grid was regenerated from a configuration
    Configured { rows: usize, columns: usize },
    /// A product instance was assigned to a cell
    CellAssigned {
        cell_id: String,
        instance_id: String,
        product_id: String,
    },
    /// A cell was emptied
    CellCleared { cell_id: String },
    /// A cell quantity changed
    QuantityChanged { cell_id: String, quantity: u32 },
    /// An instance lost its last cell and was deleted
    InstanceReleased { instance_id: String },
}

impl PlanogramEvent {
    pub fn description(&self) -> String {
        match self {
            PlanogramEvent::Configured { rows, columns } => {
                format!("Grid configured {}x{}", rows, columns)
            }
            PlanogramEvent::CellAssigned {
                cell_id,
                product_id,
                ..
            } => format!("{} -> {}", product_id, cell_id),
            PlanogramEvent::CellCleared { cell_id } => format!("{} cleared", cell_id),
            PlanogramEvent::QuantityChanged { cell_id, quantity } => {
                format!("{} quantity {}", cell_id, quantity)
            }
            PlanogramEvent::InstanceReleased { instance_id } => {
                format!("Instance {} released", instance_id)
            }
        }
    }
}

/// Data load events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoadEvent {
    Started { key: String },
    Finished { key: String },
    Failed { key: String, message: String },
    /// A response arrived for a request that is no longer current
    Discarded { key: String },
}

impl LoadEvent {
    pub fn description(&self) -> String {
        match self {
            LoadEvent::Started { key } => format!("Loading {}", key),
            LoadEvent::Finished { key } => format!("Loaded {}", key),
            LoadEvent::Failed { key, message } => format!("Loading {} failed: {}", key, message),
            LoadEvent::Discarded { key } => format!("Stale {} response discarded", key),
        }
    }
}
