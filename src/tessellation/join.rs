//! Offset points where two stroked edges meet.
//!
//! Every function returns a [`JoinPoints`] pair: `left` lies on the
//! counter-clockwise side of the direction of travel, `right` on the
//! clockwise side, whichever way the path bends. Callers that need the
//! inside or outside of a bend pick by the sign of the bend angle.

use crate::math::{direction, is_straight, left_normal, signed_angle, Point2, Vector2};

/// The two offset points of a join.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinPoints {
    pub left: Point2,
    pub right: Point2,
}

impl JoinPoints {
    /// Both points collapsed onto `p`.
    #[must_use]
    pub fn collapsed(p: Point2) -> Self {
        Self { left: p, right: p }
    }

    /// The point on the inner side of a bend by `angle`.
    #[must_use]
    pub fn inside(&self, angle: f32) -> Point2 {
        if angle > 0.0 {
            self.left
        } else {
            self.right
        }
    }

    /// The point on the outer side of a bend by `angle`.
    #[must_use]
    pub fn outside(&self, angle: f32) -> Point2 {
        if angle > 0.0 {
            self.right
        } else {
            self.left
        }
    }

    /// Applies `f` to both points.
    #[must_use]
    pub fn map(self, f: impl Fn(Point2) -> Point2) -> Self {
        Self {
            left: f(self.left),
            right: f(self.right),
        }
    }
}

/// Which edge a smooth join's outside point is cut square to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    /// The join ends the incoming edge `A -> B`.
    End,
    /// The join starts the outgoing edge `B -> C`.
    Start,
}

/// Mitre join at `b` for the path `a -> b -> c`.
///
/// Both edges are pushed out by `half_width / sin(angle)` along their own
/// directions and the offset lines intersect at the returned points. Near
/// a straight or fully reversed bend the mitre has no finite length and the
/// straight join is returned instead. The bend angle is returned alongside.
#[must_use]
pub fn pointy(a: &Point2, b: &Point2, c: &Point2, half_width: f32) -> (JoinPoints, f32) {
    let Some((ab, bc, angle)) = bend(a, b, c) else {
        return (fallback(a, b, c, half_width), 0.0);
    };
    if is_straight(angle) {
        return (straight(b, &ab, half_width), angle);
    }
    (mitre(b, &ab, &bc, angle, half_width), angle)
}

/// Smooth (bevelled) join at `b` for the path `a -> b -> c`.
///
/// The inside point is the mitre point. The outside point sits at
/// `b + perpendicular(edge) * half_width`, where `edge` is `b -> c` for
/// [`EdgeEnd::Start`] and `a -> b` for [`EdgeEnd::End`]. The outside point
/// therefore never leaves the stroke's own width, and the wedge between
/// the two outside points has to be filled separately.
#[must_use]
pub fn smooth(
    a: &Point2,
    b: &Point2,
    c: &Point2,
    half_width: f32,
    end: EdgeEnd,
) -> (JoinPoints, f32) {
    let Some((ab, bc, angle)) = bend(a, b, c) else {
        return (fallback(a, b, c, half_width), 0.0);
    };
    if is_straight(angle) {
        return (straight(b, &ab, half_width), angle);
    }
    let mitre = mitre(b, &ab, &bc, angle, half_width);
    let edge = match end {
        EdgeEnd::End => ab,
        EdgeEnd::Start => bc,
    };
    let offset = left_normal(edge) * half_width;
    let points = if angle > 0.0 {
        JoinPoints {
            left: mitre.left,
            right: b - offset,
        }
    } else {
        JoinPoints {
            left: b + offset,
            right: mitre.right,
        }
    };
    (points, angle)
}

/// Join for a path that does not bend at `b`: both points sit
/// perpendicular to `dir`.
#[must_use]
pub fn straight(b: &Point2, dir: &Vector2, half_width: f32) -> JoinPoints {
    perpendicular(b, dir, half_width)
}

/// Flat cap at the end of an open path. `dir` is the direction of travel
/// at `point`; its length does not matter.
#[must_use]
pub fn flat_endpoint(point: &Point2, dir: &Vector2, half_width: f32) -> JoinPoints {
    perpendicular(point, dir, half_width)
}

/// Cap at the end of an open arc, offset along the radius through `point`.
///
/// For counter-clockwise travel around `centre` the left point lies towards
/// the centre.
#[must_use]
pub fn radial_endpoint(point: &Point2, centre: &Point2, half_width: f32) -> JoinPoints {
    match (point - centre).try_normalize(f32::EPSILON) {
        Some(radial) => {
            let offset = radial * half_width;
            JoinPoints {
                left: point - offset,
                right: point + offset,
            }
        }
        None => JoinPoints::collapsed(*point),
    }
}

fn perpendicular(p: &Point2, dir: &Vector2, half_width: f32) -> JoinPoints {
    match dir.try_normalize(f32::EPSILON) {
        Some(dir) => {
            let offset = left_normal(dir) * half_width;
            JoinPoints {
                left: p + offset,
                right: p - offset,
            }
        }
        None => JoinPoints::collapsed(*p),
    }
}

/// Unit edge directions and the signed bend angle, or `None` when either
/// edge has no length.
fn bend(a: &Point2, b: &Point2, c: &Point2) -> Option<(Vector2, Vector2, f32)> {
    let ab = direction(a, b)?;
    let bc = direction(b, c)?;
    let angle = signed_angle(&ab, &bc);
    Some((ab, bc, angle))
}

fn mitre(b: &Point2, ab: &Vector2, bc: &Vector2, angle: f32, half_width: f32) -> JoinPoints {
    // Signed length: a clockwise bend flips both vectors, which keeps
    // `left` on the counter-clockwise side.
    let len = half_width / angle.sin();
    let (ab, bc) = (ab * len, bc * len);
    JoinPoints {
        left: b - ab + bc,
        right: b + ab - bc,
    }
}

fn fallback(a: &Point2, b: &Point2, c: &Point2, half_width: f32) -> JoinPoints {
    match direction(a, b).or_else(|| direction(b, c)) {
        Some(dir) => straight(b, &dir, half_width),
        None => JoinPoints::collapsed(*b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    fn p(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    fn assert_point(actual: Point2, expected: Point2) {
        assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-4);
        assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-4);
    }

    #[test]
    fn pointy_left_turn_square_corner() {
        let (j, angle) = pointy(&p(0.0, 0.0), &p(10.0, 0.0), &p(10.0, 10.0), 1.0);
        assert_abs_diff_eq!(angle, FRAC_PI_2, epsilon = 1e-6);
        // Inside of a left turn is the left point.
        assert_point(j.left, p(9.0, 1.0));
        assert_point(j.right, p(11.0, -1.0));
        assert_point(j.inside(angle), j.left);
        assert_point(j.outside(angle), j.right);
    }

    #[test]
    fn pointy_right_turn_keeps_left_ccw() {
        let (j, angle) = pointy(&p(0.0, 0.0), &p(10.0, 0.0), &p(10.0, -10.0), 1.0);
        assert!(angle < 0.0);
        assert_point(j.left, p(11.0, 1.0));
        assert_point(j.right, p(9.0, -1.0));
        assert_point(j.inside(angle), p(9.0, -1.0));
    }

    #[test]
    fn mitre_offsets_follow_inverse_sine() {
        let half = 0.75;
        for deg in [20.0f32, 45.0, 100.0, 150.0, -60.0, -135.0] {
            let theta = deg.to_radians();
            let a = p(-5.0, 0.0);
            let b = p(0.0, 0.0);
            let c = p(5.0 * theta.cos(), 5.0 * theta.sin());
            let (j, angle) = pointy(&a, &b, &c, half);
            assert_abs_diff_eq!(angle, theta, epsilon = 1e-5);

            // Both points lie on the bisector of the two edges.
            let ab = Vector2::new(1.0, 0.0);
            let bc = Vector2::new(theta.cos(), theta.sin());
            let bisector = (bc - ab).normalize();
            for q in [j.left, j.right] {
                let v = q - b;
                assert_abs_diff_eq!(v.perp(&bisector), 0.0, epsilon = 1e-4);
            }

            // And at half_width from each edge's offset line.
            let len = half / theta.sin().abs();
            let expected = (ab * len - bc * len).norm();
            assert_abs_diff_eq!((j.right - b).norm(), expected, epsilon = 1e-3);
            assert_abs_diff_eq!((j.left - b).norm(), expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn near_straight_switches_to_straight_join() {
        let a = p(0.0, 0.0);
        let b = p(10.0, 0.0);
        let c = p(20.0, 0.001);
        let (j, angle) = pointy(&a, &b, &c, 1.0);
        assert!(is_straight(angle));
        assert_point(j.left, p(10.0, 1.0));
        assert_point(j.right, p(10.0, -1.0));
        assert!(j.left.x.is_finite() && j.right.y.is_finite());
    }

    #[test]
    fn reversal_stays_finite() {
        let (j, _) = pointy(&p(0.0, 0.0), &p(10.0, 0.0), &p(0.0, 0.0), 1.0);
        assert_point(j.left, p(10.0, 1.0));
        assert_point(j.right, p(10.0, -1.0));
    }

    #[test]
    fn collinear_joins_agree() {
        let (a, b, c) = (p(1.0, 1.0), p(3.0, 3.0), p(7.0, 7.0));
        let expected = straight(&b, &(b - a), 0.5);
        let (pj, _) = pointy(&a, &b, &c, 0.5);
        let (sj_end, _) = smooth(&a, &b, &c, 0.5, EdgeEnd::End);
        let (sj_start, _) = smooth(&a, &b, &c, 0.5, EdgeEnd::Start);
        for j in [pj, sj_end, sj_start] {
            assert_point(j.left, expected.left);
            assert_point(j.right, expected.right);
        }
        let d = std::f32::consts::FRAC_1_SQRT_2 * 0.5;
        assert_point(expected.left, p(3.0 - d, 3.0 + d));
    }

    #[test]
    fn smooth_inside_matches_pointy() {
        let (a, b, c) = (p(0.0, 0.0), p(10.0, 0.0), p(12.0, 8.0));
        let (pj, angle) = pointy(&a, &b, &c, 1.0);
        let (end, _) = smooth(&a, &b, &c, 1.0, EdgeEnd::End);
        let (start, _) = smooth(&a, &b, &c, 1.0, EdgeEnd::Start);
        assert_point(end.inside(angle), pj.inside(angle));
        assert_point(start.inside(angle), pj.inside(angle));
    }

    #[test]
    fn smooth_outside_is_square_to_edge() {
        let (a, b, c) = (p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0));
        let (end, angle) = smooth(&a, &b, &c, 1.0, EdgeEnd::End);
        let (start, _) = smooth(&a, &b, &c, 1.0, EdgeEnd::Start);
        // Left turn: outside is on the right.
        assert_point(end.outside(angle), p(10.0, -1.0));
        assert_point(start.outside(angle), p(11.0, 0.0));
    }

    #[test]
    fn smooth_right_turn_outside_on_left() {
        let (a, b, c) = (p(0.0, 0.0), p(10.0, 0.0), p(10.0, -10.0));
        let (end, angle) = smooth(&a, &b, &c, 1.0, EdgeEnd::End);
        let (start, _) = smooth(&a, &b, &c, 1.0, EdgeEnd::Start);
        assert!(angle < 0.0);
        assert_point(end.left, p(10.0, 1.0));
        assert_point(start.left, p(11.0, 0.0));
        assert_point(end.right, p(9.0, -1.0));
    }

    #[test]
    fn smooth_outside_stays_within_width_for_sharp_bends() {
        let (a, b, c) = (p(0.0, 0.0), p(10.0, 0.0), p(0.5, 0.5));
        let (end, angle) = smooth(&a, &b, &c, 1.0, EdgeEnd::End);
        assert_abs_diff_eq!((end.outside(angle) - b).norm(), 1.0, epsilon = 1e-5);
        let (pj, _) = pointy(&a, &b, &c, 1.0);
        assert!((pj.outside(angle) - b).norm() > 10.0);
    }

    #[test]
    fn zero_length_edges_fall_back() {
        let (j, angle) = pointy(&p(1.0, 1.0), &p(1.0, 1.0), &p(3.0, 1.0), 1.0);
        assert!(angle.abs() < f32::EPSILON);
        assert_point(j.left, p(1.0, 2.0));
        let (j, _) = smooth(&p(2.0, 2.0), &p(2.0, 2.0), &p(2.0, 2.0), 1.0, EdgeEnd::End);
        assert_eq!(j, JoinPoints::collapsed(p(2.0, 2.0)));
    }

    #[test]
    fn flat_endpoint_is_perpendicular() {
        let j = flat_endpoint(&p(0.0, 0.0), &Vector2::new(0.0, 3.0), 2.0);
        assert_point(j.left, p(-2.0, 0.0));
        assert_point(j.right, p(2.0, 0.0));
    }

    #[test]
    fn radial_endpoint_runs_along_radius() {
        let j = radial_endpoint(&p(5.0, 0.0), &p(0.0, 0.0), 1.0);
        assert_point(j.left, p(4.0, 0.0));
        assert_point(j.right, p(6.0, 0.0));
        let j = radial_endpoint(&p(3.0, 3.0), &p(3.0, 3.0), 1.0);
        assert_eq!(j, JoinPoints::collapsed(p(3.0, 3.0)));
    }
}
