//! Screen-space axis gizmo
//!
//! Three colored segments showing where the world X (red), Y (green), and
//! height (blue) axes currently point on screen, for drawing in a window
//! corner. The X/Y directions follow the current yaw; the height axis is
//! unaffected by yaw.

use scarp_core::{offset_point_along_direction, rotate_around_z, Color, Projection, Vec2};

use crate::scene::LineVertex;

/// Emit the gizmo's line segments anchored at `origin` (any coordinate
/// space the caller draws in), each `size` units long. Axes whose screen
/// direction degenerates at the current angles are skipped.
pub fn axis_gizmo(
    projection: &Projection,
    yaw_degrees: f32,
    origin: Vec2,
    size: f32,
) -> Vec<LineVertex> {
    let center = projection.project(Vec2::ZERO, 0.0);

    let directions = [
        (
            projection.project(rotate_around_z(yaw_degrees, Vec2::new(1.0, 0.0)), 0.0) - center,
            Color::RED,
        ),
        (
            projection.project(rotate_around_z(yaw_degrees, Vec2::new(0.0, 1.0)), 0.0) - center,
            Color::GREEN,
        ),
        // the height axis is not yaw-rotated
        (projection.project(Vec2::ZERO, 1.0) - center, Color::BLUE),
    ];

    let mut segments = Vec::with_capacity(6);
    for (direction, color) in directions {
        if direction.length() == 0.0 {
            continue;
        }
        let tip = offset_point_along_direction(origin, direction, size);
        segments.push(LineVertex {
            position: origin,
            color,
        });
        segments.push(LineVertex {
            position: tip,
            color,
        });
    }
    segments
}
