//! Drag-based placeholder reordering
//!
//! - [`gesture`]: pointer events from the host's gesture recognizer
//! - [`controller`]: the long-press drag state machine and hit testing
//! - [`swap`]: immediate and animated geometry exchange

pub mod controller;
pub mod gesture;
pub mod swap;

pub use controller::{hit_test, DragState, GestureOutcome, ReorderController, ReorderEvent};
pub use gesture::{GestureEvent, GestureId, GestureKind};
pub use swap::{swap_now, SwapTransition};
