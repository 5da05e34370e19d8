//! Scarp Engine - Per-frame rotation, re-projection, and picking
//!
//! The [`Scene`] owns the grid, the projection value, and the yaw/pitch
//! state machines. Each frame it resolves what is under the cursor,
//! advances any in-flight rotation, keeps every corner's screen position
//! consistent, and lazily rebuilds the line buffer the renderer consumes.

mod gizmo;
mod picking;
mod scene;

pub use gizmo::axis_gizmo;
pub use picking::PickMode;
pub use scene::{LineVertex, Scene};
