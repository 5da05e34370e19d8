//! Corner arena and tile topology
//!
//! Corners live in one row-major arena owned by the [`Grid`]; tiles hold
//! arena indices into it, never copies. Topology is fixed at build time:
//! height edits and re-projection mutate corners in place.

use scarp_core::{Color, GridCoord, Projection, Vec2};

use crate::source::MapSource;

/// Index of a corner in the grid's arena
pub type CornerIdx = usize;

/// One lattice intersection of the height grid
#[derive(Clone, Copy, Debug)]
pub struct Corner {
    /// Grid coordinate; identity, never mutated after construction
    pub grid_pos: GridCoord,
    /// World height, mutated by editing
    pub height: f32,
    /// World (x, y) after yaw is applied about the grid centroid
    pub rotated_pos: Vec2,
    /// Projection of (rotated_pos, height); must be refreshed after any
    /// rotation, pitch, pivot, or height change
    pub screen_pos: Vec2,
    /// Color from the map source
    pub base_color: Color,
    /// Display color, recomputed every frame from selection membership
    pub color: Color,
}

/// The quad bounded by four adjacent corners, in top-left, top-right,
/// bottom-right, bottom-left winding
#[derive(Clone, Copy, Debug)]
pub struct Tile {
    pub corners: [CornerIdx; 4],
}

/// Owns all corners plus the tile index derived from their topology
pub struct Grid {
    width: usize,
    height: usize,
    corners: Vec<Corner>,
    tiles: Vec<Tile>,
}

/// Tolerance for the triangle-area containment test, in squared-pixel
/// units of area
const AREA_EPSILON: f32 = 0.01;

impl Grid {
    /// Build the corner arena and tile index from a map source. Runs once
    /// at startup; O(W*H).
    pub fn from_source(source: &MapSource, projection: &Projection) -> Self {
        let width = source.width();
        let height = source.height();

        let mut corners = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let grid_pos = GridCoord::new(x as i32, y as i32);
                let world = grid_pos.as_vec2();
                let h = source.height_at(x, y);
                corners.push(Corner {
                    grid_pos,
                    height: h,
                    rotated_pos: world,
                    screen_pos: projection.project(world, h),
                    base_color: source.color(),
                    color: source.color(),
                });
            }
        }

        let mut tiles = Vec::new();
        if width > 1 && height > 1 {
            tiles.reserve((width - 1) * (height - 1));
            for y in 0..height - 1 {
                for x in 0..width - 1 {
                    tiles.push(Tile {
                        corners: [
                            y * width + x,
                            y * width + x + 1,
                            (y + 1) * width + x + 1,
                            (y + 1) * width + x,
                        ],
                    });
                }
            }
        }

        Self {
            width,
            height,
            corners,
            tiles,
        }
    }

    /// Corners per row
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of corner rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tiles per row
    pub fn tiles_x(&self) -> usize {
        self.width.saturating_sub(1)
    }

    /// Number of tile rows
    pub fn tiles_y(&self) -> usize {
        self.height.saturating_sub(1)
    }

    /// Geometric center of the lattice; yaw spins the grid about it
    pub fn centroid(&self) -> Vec2 {
        Vec2::new(
            (self.width as f32 - 1.0) / 2.0,
            (self.height as f32 - 1.0) / 2.0,
        )
    }

    pub fn corner_index(&self, coord: GridCoord) -> Option<CornerIdx> {
        if coord.x < 0
            || coord.y < 0
            || coord.x as usize >= self.width
            || coord.y as usize >= self.height
        {
            return None;
        }
        Some(coord.y as usize * self.width + coord.x as usize)
    }

    pub fn corner(&self, idx: CornerIdx) -> &Corner {
        &self.corners[idx]
    }

    pub fn corner_mut(&mut self, idx: CornerIdx) -> &mut Corner {
        &mut self.corners[idx]
    }

    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    pub fn corners_mut(&mut self) -> &mut [Corner] {
        &mut self.corners
    }

    pub fn tile_index(&self, coord: GridCoord) -> Option<usize> {
        if coord.x < 0
            || coord.y < 0
            || coord.x as usize >= self.tiles_x()
            || coord.y as usize >= self.tiles_y()
        {
            return None;
        }
        Some(coord.y as usize * self.tiles_x() + coord.x as usize)
    }

    pub fn tile(&self, idx: usize) -> &Tile {
        &self.tiles[idx]
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// In-place height edit of exactly one corner. Does not re-project;
    /// the caller must refresh the corner's screen position before the
    /// next draw.
    pub fn add_corner_height(&mut self, offset: f32, coord: GridCoord) {
        if let Some(idx) = self.corner_index(coord) {
            self.corners[idx].height += offset;
        }
    }

    /// Reset every corner's display color to its base color
    pub fn reset_colors(&mut self) {
        for corner in &mut self.corners {
            corner.color = corner.base_color;
        }
    }

    /// Screen-space quad of a tile in winding order
    pub fn tile_screen_corners(&self, tile: &Tile) -> [Vec2; 4] {
        [
            self.corners[tile.corners[0]].screen_pos,
            self.corners[tile.corners[1]].screen_pos,
            self.corners[tile.corners[2]].screen_pos,
            self.corners[tile.corners[3]].screen_pos,
        ]
    }

    /// Exact point-in-quad test against a tile's current screen shape.
    /// The quad is split into two triangles along the (top-left,
    /// bottom-right) diagonal. A zero-area tile contains nothing.
    pub fn tile_contains_point(&self, tile: &Tile, point: Vec2) -> bool {
        let [a, b, c, d] = self.tile_screen_corners(tile);
        point_in_triangle(point, a, b, c) || point_in_triangle(point, c, d, a)
    }
}

fn triangle_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    ((a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)) / 2.0).abs()
}

/// Containment by area sum: the point is inside when the three
/// sub-triangles it forms with the edges cover exactly the full area.
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let total = triangle_area(a, b, c);
    if total < AREA_EPSILON {
        return false;
    }
    let sum = triangle_area(p, b, c) + triangle_area(a, p, c) + triangle_area(a, b, p);
    (total - sum).abs() < AREA_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_grid(width: usize, height: usize) -> Grid {
        let source =
            MapSource::from_raw(vec![vec![0.0; width]; height]).unwrap();
        let projection = Projection::new(64.0, 64.0, 6.0, 45.0, 35.0);
        Grid::from_source(&source, &projection)
    }

    #[test]
    fn test_construction_counts() {
        let grid = flat_grid(10, 8);
        assert_eq!(grid.corners().len(), 80);
        assert_eq!(grid.tiles().len(), 9 * 7);
        assert_eq!(grid.tiles_x(), 9);
        assert_eq!(grid.tiles_y(), 7);
    }

    #[test]
    fn test_single_row_has_no_tiles() {
        let grid = flat_grid(5, 1);
        assert_eq!(grid.corners().len(), 5);
        assert!(grid.tiles().is_empty());
    }

    #[test]
    fn test_tile_winding() {
        let grid = flat_grid(3, 3);
        let tile = grid.tile(grid.tile_index(GridCoord::new(1, 1)).unwrap());
        let expected: Vec<GridCoord> = [(1, 1), (2, 1), (2, 2), (1, 2)]
            .iter()
            .map(|&(x, y)| GridCoord::new(x, y))
            .collect();
        let actual: Vec<GridCoord> = tile
            .corners
            .iter()
            .map(|&idx| grid.corner(idx).grid_pos)
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_centroid() {
        assert_eq!(flat_grid(10, 10).centroid(), Vec2::new(4.5, 4.5));
        assert_eq!(flat_grid(3, 5).centroid(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_out_of_bounds_lookups() {
        let grid = flat_grid(4, 4);
        assert!(grid.corner_index(GridCoord::new(-1, 0)).is_none());
        assert!(grid.corner_index(GridCoord::new(4, 0)).is_none());
        assert!(grid.tile_index(GridCoord::new(3, 0)).is_none());
        assert!(grid.tile_index(GridCoord::new(0, 3)).is_none());
        assert!(grid.tile_index(GridCoord::new(2, 2)).is_some());
    }

    #[test]
    fn test_height_edit_in_place() {
        let mut grid = flat_grid(4, 4);
        grid.add_corner_height(3.0, GridCoord::new(2, 1));
        let idx = grid.corner_index(GridCoord::new(2, 1)).unwrap();
        assert_eq!(grid.corner(idx).height, 3.0);
        // out of bounds is a no-op
        grid.add_corner_height(3.0, GridCoord::new(9, 9));
    }

    #[test]
    fn test_tile_contains_its_screen_centroid() {
        let grid = flat_grid(5, 5);
        for tile in grid.tiles() {
            let [a, b, c, d] = grid.tile_screen_corners(tile);
            let center = (a + b + c + d) * 0.25;
            assert!(grid.tile_contains_point(tile, center));
        }
    }

    #[test]
    fn test_tile_excludes_far_point() {
        let grid = flat_grid(5, 5);
        let tile = grid.tile(0);
        assert!(!grid.tile_contains_point(tile, Vec2::new(1.0e5, 1.0e5)));
    }

    #[test]
    fn test_degenerate_tile_contains_nothing() {
        let mut grid = flat_grid(2, 2);
        // collapse the quad to a single screen point
        for corner in grid.corners_mut() {
            corner.screen_pos = Vec2::ZERO;
        }
        let tile = *grid.tile(0);
        assert!(!grid.tile_contains_point(&tile, Vec2::ZERO));
    }

    #[test]
    fn test_reset_colors() {
        let mut grid = flat_grid(3, 3);
        grid.corner_mut(4).color = Color::RED;
        grid.reset_colors();
        assert_eq!(grid.corner(4).color, grid.corner(4).base_color);
    }
}
