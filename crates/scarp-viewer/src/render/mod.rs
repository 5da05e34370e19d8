//! wgpu rendering for the viewer window

mod context;
mod line_pipeline;

pub use context::{RenderContext, RenderError};
pub use line_pipeline::{GpuVertex, LinePipeline, VertexBuffer, ViewBinding};
