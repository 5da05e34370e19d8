//! Scarp Viewer - Interactive window hosting the editor core
//!
//! Wires a winit event loop and a wgpu line renderer around the engine:
//! input events become camera/scene commands, and each frame the scene's
//! line buffer is drawn over a sky gradient with an axis gizmo on top.

mod app;
mod render;

pub use app::{run, ViewerConfig};
