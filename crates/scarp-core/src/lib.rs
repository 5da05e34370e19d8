//! Scarp Core - Foundational types for the scarp editor
//!
//! This crate provides what every other scarp crate depends on:
//! - `Vec2`, `GridCoord`, `Color` - Spatial and color primitives
//! - `Projection` - The oblique world<->screen transform
//! - `Smoothed`, `SmoothedVec2` - Epsilon-snap interpolation
//! - Error types and Result alias

mod error;
mod projection;
mod smooth;
mod types;

pub use error::{Result, ScarpError};
pub use projection::{
    offset_point_along_direction, project_point_on_line, rotate_around_z, Projection,
};
pub use smooth::{Smoothed, SmoothedVec2};
pub use types::{Color, GridCoord, Vec2};
