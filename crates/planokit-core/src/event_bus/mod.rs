//! # Event Bus Module
//!
//! Publish/subscribe change notification between the editor state and any
//! presentation layer (2D canvas, 3D viewer, side panels).
//!
//! - The editor publishes typed events after every committed change
//! - Subscribers filter by category and then query the state for a snapshot
//! - Async consumers can poll a broadcast receiver instead of registering a handler
//!
//! ## Usage
//!
//! ```rust
//! use planokit_core::event_bus::{EditorEvent, EventBus, EventCategory, EventFilter, PlanEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Plan]),
//!     |event| {
//!         if let EditorEvent::Plan(plan) = event {
//!             println!("{}", plan.description());
//!         }
//!     },
//! );
//!
//! bus.publish(EditorEvent::Plan(PlanEvent::Saved {
//!     plan_id: "plan-1".to_string(),
//! }))
//! .ok();
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
