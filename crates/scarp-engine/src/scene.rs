//! The per-frame rotation and selection engine

use scarp_core::{rotate_around_z, Color, Projection, Smoothed, Vec2};
use scarp_grid::{CornerIdx, Grid, MapSource};

use crate::picking::{self, PickMode};

/// Per-axis interpolation speeds and the snap tolerance in degrees
const YAW_SPEED: f32 = 10.0;
const PITCH_SPEED: f32 = 20.0;
const ANGLE_EPSILON: f32 = 0.5;

/// Maximum search radius, in cells, for both picking strategies
const PICK_RADIUS: i32 = 3;

/// Highlight color for selected corners
const SELECTED_COLOR: Color = Color::new(1.0, 0.85, 0.1, 1.0);

/// One endpoint of a grid edge; consecutive pairs form line segments
/// ready for immediate-mode rendering
#[derive(Clone, Copy, Debug)]
pub struct LineVertex {
    pub position: Vec2,
    pub color: Color,
}

/// Owns the grid, the projection value, and the yaw/pitch state machines
pub struct Scene {
    grid: Grid,
    projection: Projection,
    yaw: Smoothed,
    pitch: Smoothed,
    pick_mode: PickMode,
    selection: Vec<CornerIdx>,
    line_buffer: Vec<LineVertex>,
    buffer_dirty: bool,
}

impl Scene {
    /// Build a scene from a validated map source. The projection pivot is
    /// derived once so the grid centroid projects to the screen origin;
    /// rotations then visibly spin the grid in place.
    pub fn new(
        source: &MapSource,
        tile_size_x: f32,
        tile_size_y: f32,
        height_scale: f32,
        angle_x: f32,
        angle_y: f32,
    ) -> Self {
        let mut projection =
            Projection::new(tile_size_x, tile_size_y, height_scale, angle_x, angle_y);
        let centroid = Vec2::new(
            (source.width() as f32 - 1.0) / 2.0,
            (source.height() as f32 - 1.0) / 2.0,
        );
        projection.set_world_pivot(projection.project(centroid, 0.0));

        let grid = Grid::from_source(source, &projection);

        Self {
            grid,
            projection,
            yaw: Smoothed::new(0.0, YAW_SPEED, ANGLE_EPSILON),
            pitch: Smoothed::new(angle_y, PITCH_SPEED, ANGLE_EPSILON),
            pick_mode: PickMode::default(),
            selection: Vec::new(),
            line_buffer: Vec::new(),
            buffer_dirty: true,
        }
    }

    /// Advance one frame: refresh the selection from the cursor, then
    /// advance any in-flight yaw/pitch interpolation and re-project.
    /// `cursor` is in the view's world-screen coordinates; `None` when
    /// the cursor is outside the window.
    pub fn update(&mut self, dt: f32, cursor: Option<Vec2>) {
        self.update_selection(cursor);

        if self.yaw.advance(dt) {
            self.apply_yaw();
        }
        if self.pitch.advance(dt) {
            self.apply_pitch();
        }
    }

    /// Queue a yaw rotation, eased over the following frames
    pub fn rotate(&mut self, yaw_delta: f32) {
        self.yaw.shift_target(yaw_delta);
    }

    /// Queue a pitch change, eased over the following frames
    pub fn pitch(&mut self, pitch_delta: f32) {
        self.pitch.shift_target(pitch_delta);
    }

    pub fn current_yaw(&self) -> f32 {
        self.yaw.current()
    }

    pub fn current_pitch(&self) -> f32 {
        self.pitch.current()
    }

    /// True once both rotation state machines sit exactly on target
    pub fn is_settled(&self) -> bool {
        self.yaw.is_settled() && self.pitch.is_settled()
    }

    pub fn pick_mode(&self) -> PickMode {
        self.pick_mode
    }

    pub fn set_pick_mode(&mut self, mode: PickMode) {
        self.pick_mode = mode;
    }

    pub fn toggle_pick_mode(&mut self) {
        self.pick_mode = self.pick_mode.toggled();
    }

    /// Corner indices currently under the cursor; cleared and repopulated
    /// every update
    pub fn selection(&self) -> &[CornerIdx] {
        &self.selection
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Raise or lower every selected corner. A no-op with no selection.
    pub fn raise_selection(&mut self, offset: f32) {
        if self.selection.is_empty() {
            return;
        }
        let projection = self.projection;
        for &idx in &self.selection {
            let coord = self.grid.corner(idx).grid_pos;
            self.grid.add_corner_height(offset, coord);
            let corner = self.grid.corner_mut(idx);
            corner.screen_pos = projection.project(corner.rotated_pos, corner.height);
        }
        self.buffer_dirty = true;
    }

    /// Re-derive the projection pivot from a screen point and refresh
    /// every corner's screen position
    pub fn set_pivot(&mut self, screen_point: Vec2) {
        self.projection.set_world_pivot(screen_point);
        self.reproject_screen_positions();
    }

    /// Screen position of the rounded grid centroid
    pub fn center(&self) -> Vec2 {
        let c = self.grid.centroid();
        self.projection
            .project(Vec2::new(c.x.round(), c.y.round()), 0.0)
    }

    /// Cursor position mapped back into un-rotated grid coordinates
    pub fn cursor_world_position(&self, cursor: Vec2) -> Vec2 {
        picking::cursor_world_position(&self.grid, &self.projection, self.yaw.current(), cursor)
    }

    /// True when the next [`Self::line_vertices`] call will rebuild the
    /// buffer; lets a renderer skip re-uploading unchanged geometry
    pub fn needs_rebuild(&self) -> bool {
        self.buffer_dirty
    }

    /// The grid-edge line buffer, rebuilt at most once per frame and only
    /// when a screen position or color actually changed
    pub fn line_vertices(&mut self) -> &[LineVertex] {
        if self.buffer_dirty {
            self.rebuild_line_buffer();
            self.buffer_dirty = false;
        }
        &self.line_buffer
    }

    fn update_selection(&mut self, cursor: Option<Vec2>) {
        let new_selection = match cursor {
            Some(c) => picking::pick(
                &self.grid,
                &self.projection,
                self.yaw.current(),
                self.pick_mode,
                c,
                PICK_RADIUS,
            ),
            None => Vec::new(),
        };

        if new_selection != self.selection {
            self.selection = new_selection;
            self.buffer_dirty = true;
        }

        self.grid.reset_colors();
        for &idx in &self.selection {
            self.grid.corner_mut(idx).color = SELECTED_COLOR;
        }
    }

    fn apply_yaw(&mut self) {
        let angle = self.yaw.current();
        let centroid = self.grid.centroid();
        let projection = self.projection;
        for corner in self.grid.corners_mut() {
            // spin about the grid center, not the origin, so the grid
            // rotates in place
            corner.rotated_pos =
                rotate_around_z(angle, corner.grid_pos.as_vec2() - centroid) + centroid;
            corner.screen_pos = projection.project(corner.rotated_pos, corner.height);
        }
        self.buffer_dirty = true;
    }

    fn apply_pitch(&mut self) {
        // pitch only changes the projection's Y angle; rotated positions
        // are untouched
        self.projection.set_pitch_angle(self.pitch.current());
        self.reproject_screen_positions();
    }

    fn reproject_screen_positions(&mut self) {
        let projection = self.projection;
        for corner in self.grid.corners_mut() {
            corner.screen_pos = projection.project(corner.rotated_pos, corner.height);
        }
        self.buffer_dirty = true;
    }

    fn rebuild_line_buffer(&mut self) {
        self.line_buffer.clear();
        let width = self.grid.width();
        let height = self.grid.height();
        for y in 0..height {
            for x in 0..width {
                let corner = self.grid.corner(y * width + x);
                // each edge once: right and down neighbors only
                if x + 1 < width {
                    let right = self.grid.corner(y * width + x + 1);
                    self.line_buffer.push(LineVertex {
                        position: corner.screen_pos,
                        color: corner.color,
                    });
                    self.line_buffer.push(LineVertex {
                        position: right.screen_pos,
                        color: right.color,
                    });
                }
                if y + 1 < height {
                    let down = self.grid.corner((y + 1) * width + x);
                    self.line_buffer.push(LineVertex {
                        position: corner.screen_pos,
                        color: corner.color,
                    });
                    self.line_buffer.push(LineVertex {
                        position: down.screen_pos,
                        color: down.color,
                    });
                }
            }
        }
    }
}
