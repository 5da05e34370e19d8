//! Oblique axonometric projection between world-grid and screen space
//!
//! The projection maps a grid position plus a height to a 2D screen point.
//! It is not orthonormal: the X angle controls horizontal shear and
//! foreshortening, the Y angle controls vertical shear and, together with
//! the height scale, how strongly elevation tips toward the viewer.
//! Angles are stored in degrees and converted to radians only inside the
//! math.

use crate::types::Vec2;

/// Projection parameters. Plain `Copy` data: the owner holds it by value
/// and every transform is a pure function of the stored parameters.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    tile_size_x: f32,
    tile_size_y: f32,
    height_scale: f32,
    /// X projection angle in degrees
    angle_x: f32,
    /// Y projection angle in degrees; pitch changes mutate this
    angle_y: f32,
    /// Recentering point in un-rotated world-grid units
    pivot: Vec2,
}

impl Projection {
    pub fn new(
        tile_size_x: f32,
        tile_size_y: f32,
        height_scale: f32,
        angle_x: f32,
        angle_y: f32,
    ) -> Self {
        Self {
            tile_size_x,
            tile_size_y,
            height_scale,
            angle_x,
            angle_y,
            pivot: Vec2::ZERO,
        }
    }

    /// Project a 3D world point (grid units, height) to screen space.
    pub fn world_to_screen(&self, x: f32, y: f32, z: f32) -> Vec2 {
        let centered_x = x - self.pivot.x;
        let centered_y = y - self.pivot.y;
        let scaled_x = centered_x * self.tile_size_x;
        let scaled_y = centered_y * self.tile_size_y;
        let angle_x = self.angle_x.to_radians();
        let angle_y = self.angle_y.to_radians();

        Vec2 {
            x: angle_x.cos() * scaled_x - angle_x.cos() * scaled_y,
            y: angle_y.sin() * scaled_y + angle_y.sin() * scaled_x - z * self.height_scale,
        }
    }

    /// Project a world position at a given height. Convenience over
    /// [`Self::world_to_screen`].
    pub fn project(&self, world: Vec2, height: f32) -> Vec2 {
        self.world_to_screen(world.x, world.y, height)
    }

    /// Un-project a screen point back to world-grid coordinates, assuming
    /// it lies on the height plane `pz` (0 for ground picking). Exact
    /// inverse of [`Self::world_to_screen`] for angles strictly between
    /// 0 and 90 degrees.
    pub fn screen_to_world(&self, px: f32, py: f32, pz: f32) -> Vec2 {
        let angle_x = self.angle_x.to_radians();
        let angle_y = self.angle_y.to_radians();

        let lifted = py + pz * self.height_scale;
        let scaled_x = 0.5 * (px / angle_x.cos() + lifted / angle_y.sin());
        let scaled_y = 0.5 * (-(px / angle_x.cos()) + lifted / angle_y.sin());

        Vec2::new(scaled_x / self.tile_size_x, scaled_y / self.tile_size_y) + self.pivot
    }

    /// Change the Y projection angle. This is how pitch is realized: the
    /// grid's vertical foreshortening changes, world points do not move.
    pub fn set_pitch_angle(&mut self, degrees: f32) {
        self.angle_y = degrees;
    }

    pub fn pitch_angle(&self) -> f32 {
        self.angle_y
    }

    /// Derive the world pivot from a screen point at ground height. All
    /// subsequent projections recenter on it, so a pivot taken at the
    /// grid's projected centroid puts that centroid at the screen origin.
    pub fn set_world_pivot(&mut self, screen_point: Vec2) {
        self.pivot = self.screen_to_world(screen_point.x, screen_point.y, 0.0);
    }

    pub fn world_pivot(&self) -> Vec2 {
        self.pivot
    }

    pub fn tile_size(&self) -> (f32, f32) {
        (self.tile_size_x, self.tile_size_y)
    }

    pub fn height_scale(&self) -> f32 {
        self.height_scale
    }
}

/// Rotate a 2D point around the origin. This is the yaw rotation; to spin
/// around a different center, subtract it first and add it back after.
pub fn rotate_around_z(angle_degrees: f32, point: Vec2) -> Vec2 {
    let rad = angle_degrees.to_radians();
    Vec2 {
        x: point.x * rad.cos() - point.y * rad.sin(),
        y: point.x * rad.sin() + point.y * rad.cos(),
    }
}

/// Project a point onto the line through `line_point` along `direction`.
/// Returns `line_point` itself when the direction is degenerate.
pub fn project_point_on_line(point: Vec2, line_point: Vec2, direction: Vec2) -> Vec2 {
    let to_point = point - line_point;
    let mag_sq = direction.dot(&direction);
    if mag_sq == 0.0 {
        return line_point;
    }
    line_point + direction * (to_point.dot(&direction) / mag_sq)
}

/// Offset a point along `direction` by `radius`. The direction is
/// normalized internally; a zero direction yields a non-finite result,
/// so callers must pass a non-degenerate direction.
pub fn offset_point_along_direction(point: Vec2, direction: Vec2, radius: f32) -> Vec2 {
    let len = direction.length();
    point + Vec2::new(direction.x / len, direction.y / len) * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn standard() -> Projection {
        Projection::new(64.0, 64.0, 6.0, 45.0, 35.0)
    }

    #[test]
    fn test_round_trip_ground_plane() {
        let proj = standard();
        for &(x, y) in &[(0.0, 0.0), (5.0, 5.0), (9.0, 2.0), (-3.0, 7.5)] {
            let screen = proj.world_to_screen(x, y, 0.0);
            let world = proj.screen_to_world(screen.x, screen.y, 0.0);
            assert!(
                close(world, Vec2::new(x, y)),
                "round trip of ({x}, {y}) gave {world:?}"
            );
        }
    }

    #[test]
    fn test_round_trip_with_height_plane() {
        let proj = standard();
        let screen = proj.world_to_screen(4.0, 3.0, 2.0);
        let world = proj.screen_to_world(screen.x, screen.y, 2.0);
        assert!(close(world, Vec2::new(4.0, 3.0)));
    }

    #[test]
    fn test_round_trip_various_angles() {
        for &(ax, ay) in &[(30.0, 20.0), (45.0, 35.0), (60.0, 80.0)] {
            let proj = Projection::new(32.0, 48.0, 4.0, ax, ay);
            let screen = proj.world_to_screen(2.0, 6.0, 0.0);
            let world = proj.screen_to_world(screen.x, screen.y, 0.0);
            assert!(close(world, Vec2::new(2.0, 6.0)), "angles {ax}/{ay}");
        }
    }

    #[test]
    fn test_height_moves_points_up_screen() {
        let proj = standard();
        let flat = proj.world_to_screen(3.0, 3.0, 0.0);
        let raised = proj.world_to_screen(3.0, 3.0, 2.0);
        assert_eq!(raised.x, flat.x);
        assert!(raised.y < flat.y);
        assert!((flat.y - raised.y - 2.0 * 6.0).abs() < EPS);
    }

    #[test]
    fn test_yaw_rotation_inverse() {
        let p = Vec2::new(3.5, -1.25);
        let spun = rotate_around_z(137.0, p);
        let back = rotate_around_z(-137.0, spun);
        assert!(close(back, p));
    }

    #[test]
    fn test_yaw_quarter_turn() {
        let spun = rotate_around_z(90.0, Vec2::new(1.0, 0.0));
        assert!(close(spun, Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_pivot_recenters_projection() {
        let mut proj = standard();
        let centroid = Vec2::new(4.5, 4.5);
        let screen = proj.project(centroid, 0.0);
        proj.set_world_pivot(screen);

        // The pivot's world coordinate is the centroid, and the centroid
        // now projects to the screen origin.
        assert!(close(proj.world_pivot(), centroid));
        assert!(close(proj.project(centroid, 0.0), Vec2::ZERO));
        // The inverse agrees: the screen origin maps back to the pivot.
        assert!(close(proj.screen_to_world(0.0, 0.0, 0.0), centroid));
    }

    #[test]
    fn test_round_trip_survives_pivot() {
        let mut proj = standard();
        proj.set_world_pivot(proj.project(Vec2::new(4.5, 4.5), 0.0));
        let screen = proj.world_to_screen(7.0, 1.0, 0.0);
        let world = proj.screen_to_world(screen.x, screen.y, 0.0);
        assert!(close(world, Vec2::new(7.0, 1.0)));
    }

    #[test]
    fn test_pitch_angle_mutation() {
        let mut proj = standard();
        let before = proj.world_to_screen(2.0, 2.0, 1.0);
        proj.set_pitch_angle(50.0);
        let after = proj.world_to_screen(2.0, 2.0, 1.0);
        assert_eq!(proj.pitch_angle(), 50.0);
        assert_eq!(before.x, after.x);
        assert_ne!(before.y, after.y);
    }

    #[test]
    fn test_project_point_on_line() {
        let projected = project_point_on_line(
            Vec2::new(3.0, 4.0),
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
        );
        assert!(close(projected, Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn test_project_point_on_degenerate_line() {
        let anchor = Vec2::new(2.0, 2.0);
        let projected = project_point_on_line(Vec2::new(5.0, 5.0), anchor, Vec2::ZERO);
        assert_eq!(projected, anchor);
    }

    #[test]
    fn test_offset_point_along_direction() {
        let moved = offset_point_along_direction(Vec2::ZERO, Vec2::new(0.0, 3.0), 2.0);
        assert!(close(moved, Vec2::new(0.0, 2.0)));
    }
}
