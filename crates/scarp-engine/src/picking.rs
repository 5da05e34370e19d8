//! Cursor-to-grid resolution
//!
//! Both picking strategies share one preamble: invert the projection at
//! ground height, undo the current yaw about the grid centroid, and round
//! to the nearest lattice coordinate. The rounded coordinate is only a
//! starting guess — projection distortion and corner heights mean the
//! element visually under the cursor can sit a few cells away, so each
//! strategy searches outward from it against actual screen positions.

use scarp_core::{rotate_around_z, GridCoord, Projection, Vec2};
use scarp_grid::{CornerIdx, Grid};

/// Which grid element the cursor resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickMode {
    /// The nearest lattice corner
    #[default]
    Corner,
    /// The tile (quad) containing the cursor
    Tile,
}

impl PickMode {
    /// Switch to the other mode
    pub fn toggled(self) -> Self {
        match self {
            Self::Corner => Self::Tile,
            Self::Tile => Self::Corner,
        }
    }

    /// Human-readable label for display
    pub fn label(self) -> &'static str {
        match self {
            Self::Corner => "corner",
            Self::Tile => "tile",
        }
    }
}

/// Map a cursor position (view world-screen coordinates) back into
/// un-rotated grid space. The grid's screen positions bake in the current
/// yaw, so the inverse must un-spin about the centroid or picking would
/// be off by the rotation.
pub(crate) fn cursor_world_position(
    grid: &Grid,
    projection: &Projection,
    yaw_degrees: f32,
    cursor: Vec2,
) -> Vec2 {
    let centroid = grid.centroid();
    let world = projection.screen_to_world(cursor.x, cursor.y, 0.0);
    rotate_around_z(-yaw_degrees, world - centroid) + centroid
}

/// Resolve the cursor to the corners it selects: one for corner mode,
/// a tile's four for tile mode, none when nothing is close enough.
pub(crate) fn pick(
    grid: &Grid,
    projection: &Projection,
    yaw_degrees: f32,
    mode: PickMode,
    cursor: Vec2,
    max_radius: i32,
) -> Vec<CornerIdx> {
    let world = cursor_world_position(grid, projection, yaw_degrees, cursor);
    let coord = GridCoord::from_rounded(world);

    match mode {
        PickMode::Corner => closest_corner(grid, projection, coord, cursor, max_radius)
            .into_iter()
            .collect(),
        PickMode::Tile => match tile_under_cursor(grid, coord, cursor, max_radius) {
            Some(tile_idx) => grid.tile(tile_idx).corners.to_vec(),
            None => Vec::new(),
        },
    }
}

/// Search a (2*radius)^2 window of corners around the rounded coordinate
/// and keep the one whose actual screen position is nearest the cursor.
/// Rejected entirely when even the nearest corner is farther than one
/// tile extent — the cursor is over empty background, not the grid.
fn closest_corner(
    grid: &Grid,
    projection: &Projection,
    center: GridCoord,
    cursor: Vec2,
    radius: i32,
) -> Option<CornerIdx> {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let cx = center.x.clamp(0, width - 1);
    let cy = center.y.clamp(0, height - 1);

    let start_x = (cx - radius).max(0);
    let end_x = (cx + radius).min(width);
    let start_y = (cy - radius).max(0);
    let end_y = (cy + radius).min(height);

    let mut best: Option<(CornerIdx, f32)> = None;
    for y in start_y..end_y {
        for x in start_x..end_x {
            let idx = y as usize * grid.width() + x as usize;
            let dist = grid.corner(idx).screen_pos.distance_to(cursor);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((idx, dist));
            }
        }
    }

    let (tile_x, tile_y) = projection.tile_size();
    let reject_distance = tile_x.max(tile_y);
    best.and_then(|(idx, dist)| (dist <= reject_distance).then_some(idx))
}

/// Exact containment test on the guessed tile, then square rings of
/// increasing radius around it. Only the border tiles of each ring are
/// tested: the interior was already covered at smaller radii.
fn tile_under_cursor(
    grid: &Grid,
    coord: GridCoord,
    cursor: Vec2,
    max_radius: i32,
) -> Option<usize> {
    if grid.tiles().is_empty() {
        return None;
    }

    let max_x = grid.tiles_x() as i32 - 1;
    let max_y = grid.tiles_y() as i32 - 1;
    let center = GridCoord::new(coord.x.clamp(0, max_x), coord.y.clamp(0, max_y));

    let direct = grid.tile_index(center)?;
    if grid.tile_contains_point(grid.tile(direct), cursor) {
        return Some(direct);
    }

    for radius in 1..=max_radius {
        let start_x = (center.x - radius).max(0);
        let end_x = (center.x + radius).min(max_x);
        let start_y = (center.y - radius).max(0);
        let end_y = (center.y + radius).min(max_y);

        for x in start_x..=end_x {
            if let Some(hit) = test_tile(grid, x, start_y, cursor) {
                return Some(hit);
            }
            if end_y != start_y {
                if let Some(hit) = test_tile(grid, x, end_y, cursor) {
                    return Some(hit);
                }
            }
        }
        for y in start_y + 1..end_y {
            if let Some(hit) = test_tile(grid, start_x, y, cursor) {
                return Some(hit);
            }
            if end_x != start_x {
                if let Some(hit) = test_tile(grid, end_x, y, cursor) {
                    return Some(hit);
                }
            }
        }
    }
    None
}

fn test_tile(grid: &Grid, x: i32, y: i32, cursor: Vec2) -> Option<usize> {
    let idx = grid.tile_index(GridCoord::new(x, y))?;
    grid.tile_contains_point(grid.tile(idx), cursor)
        .then_some(idx)
}
