//! Floor-plan data model: element kinds, placed elements and plans.

mod element;
mod element_type;
mod plan;

pub use crate::geometry::Point;
pub use element::{default_element_name, FloorPlanElement};
pub use element_type::{DefaultDimensions, ElementType};
pub use plan::FloorPlan;
