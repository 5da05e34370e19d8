//! Scarp Grid - Height-map sources and grid topology
//!
//! A [`MapSource`] supplies the initial height/color array (from a TOML
//! map file, a grayscale PNG, or the built-in demo map). A [`Grid`] owns
//! the corner arena and the derived tile index built once from it.

mod grid;
mod source;

pub use grid::{Corner, CornerIdx, Grid, Tile};
pub use source::MapSource;
