pub mod angle;
pub mod pixel;

pub use angle::{epsilon_eq, is_reversal, is_straight, normalize_angle, signed_angle};
pub use pixel::{estimate_side_count, snap_to_pixel_centre, PixelGrid};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f32>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f32>;

/// 2D rotation type.
pub type Rotation2 = nalgebra::Rotation2<f32>;

/// Tolerance for angle comparisons and for coalescing coincident points.
pub const EPSILON: f32 = 1e-3;

/// Returns the counter-clockwise perpendicular of `dir`.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Returns the unit direction from `a` to `b`, or `None` if the points coincide.
#[must_use]
pub fn direction(a: &Point2, b: &Point2) -> Option<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < f32::EPSILON {
        None
    } else {
        Some(d / len)
    }
}

/// Returns `true` when two points are closer than [`EPSILON`].
#[must_use]
pub fn coincident(a: &Point2, b: &Point2) -> bool {
    (b - a).norm_squared() < EPSILON * EPSILON
}
