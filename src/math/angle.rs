//! Angle helpers used to classify joins.
//!
//! All angles are in radians. Bend angles are signed: positive means the
//! path turns counter-clockwise.

use std::f32::consts::{PI, TAU};

use super::{Vector2, EPSILON};

/// Returns `true` when `a` and `b` differ by less than [`EPSILON`].
#[must_use]
pub fn epsilon_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Returns the angle that rotates `from` onto `to`, in `(-π, π]`.
///
/// Positive values are counter-clockwise.
#[must_use]
pub fn signed_angle(from: &Vector2, to: &Vector2) -> f32 {
    let angle = from.perp(to).atan2(from.dot(to));
    if angle <= -PI {
        angle + TAU
    } else {
        angle
    }
}

/// Returns `true` for bend angles where a mitre has no usable length.
///
/// This covers the straight-through case (0 or 2π) and the full reversal
/// (±π), where `sin` vanishes and the mitre would run off to infinity.
#[must_use]
pub fn is_straight(angle: f32) -> bool {
    epsilon_eq(angle, 0.0) || epsilon_eq(angle, TAU) || epsilon_eq(angle.abs(), PI)
}

/// Returns `true` for bend angles where the path doubles back on itself.
///
/// The outgoing edge's left side is then the incoming edge's right side.
#[must_use]
pub fn is_reversal(angle: f32) -> bool {
    epsilon_eq(angle.abs(), PI)
}

/// Wraps an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn counter_clockwise_is_positive() {
        let a = signed_angle(&Vector2::new(1.0, 0.0), &Vector2::new(0.0, 1.0));
        assert_abs_diff_eq!(a, FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn clockwise_is_negative() {
        let a = signed_angle(&Vector2::new(1.0, 0.0), &Vector2::new(0.0, -1.0));
        assert_abs_diff_eq!(a, -FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn reversal_is_positive_pi() {
        let a = signed_angle(&Vector2::new(1.0, 0.0), &Vector2::new(-1.0, 0.0));
        assert_abs_diff_eq!(a, PI, epsilon = 1e-6);
        let b = signed_angle(&Vector2::new(1.0, 0.0), &Vector2::new(-1.0, -1e-9));
        assert_abs_diff_eq!(b, PI, epsilon = 1e-6);
    }

    #[test]
    fn angle_ignores_vector_length() {
        let a = signed_angle(&Vector2::new(5.0, 0.0), &Vector2::new(0.1, 0.1));
        assert_abs_diff_eq!(a, PI / 4.0, epsilon = 1e-6);
    }

    #[test]
    fn straight_detection() {
        assert!(is_straight(0.0));
        assert!(is_straight(0.0005));
        assert!(is_straight(TAU - 0.0005));
        assert!(is_straight(PI));
        assert!(is_straight(-PI + 0.0001));
        assert!(!is_straight(0.01));
        assert!(!is_straight(FRAC_PI_2));
    }

    #[test]
    fn reversal_detection() {
        assert!(is_reversal(PI));
        assert!(is_reversal(-PI + 0.0005));
        assert!(!is_reversal(0.0));
        assert!(!is_reversal(PI - 0.01));
    }

    #[test]
    fn normalize_wraps_into_range() {
        assert_abs_diff_eq!(normalize_angle(-FRAC_PI_2), 3.0 * FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(normalize_angle(TAU + 1.0), 1.0, epsilon = 1e-5);
        assert!(normalize_angle(-1e-9) < TAU);
    }
}
