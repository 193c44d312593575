//! Layout sessions and image-to-placeholder assignment
//!
//! A [`LayoutSession`] is created by [`assign`] each time a template is
//! selected. It records the placeholders in visual order, the locked group
//! that holds them and the authored geometry every later geometry change is
//! derived from.

pub mod assigner;
pub mod session;

pub use assigner::{assign, sort_by_visual_order, visual_order_key};
pub use session::{LayoutSession, Placeholder, SessionId, Slot};
