use tracing::trace;

use super::join;
use super::line_stroke::LineStroke;
use super::ribbon::{emit_ribbon, RibbonJoint};
use super::stroke_style::{JoinType, StrokeStyle};
use crate::batch::Batch;
use crate::math::{coincident, Point2};

/// Reusable buffers for path stroking, owned by the drawer so stroking does
/// not allocate once the buffers have grown.
#[derive(Debug, Default)]
pub struct PathScratch {
    points: Vec<Point2>,
    /// Cumulative arc length at each point.
    distances: Vec<f32>,
    total: f32,
}

impl PathScratch {
    /// Creates empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the distinct, finite points of a path and measures it.
    fn load(&mut self, points: &[Point2], closed: bool) {
        self.points.clear();
        self.distances.clear();

        for p in points.iter().filter(|p| p.x.is_finite() && p.y.is_finite()) {
            match self.points.last() {
                Some(last) if coincident(last, p) => {}
                _ => self.points.push(*p),
            }
        }
        let n = self.points.len();
        if closed && n > 2 && coincident(&self.points[0], &self.points[n - 1]) {
            self.points.pop();
        }

        let mut total = 0.0;
        self.distances.push(0.0);
        for pair in self.points.windows(2) {
            total += (pair[1] - pair[0]).norm();
            self.distances.push(total);
        }
        if closed && self.points.len() > 2 {
            total += (self.points[0] - self.points[self.points.len() - 1]).norm();
        }
        self.total = total;
    }

    /// Normalized arc length at point `i`.
    fn progress(&self, i: usize) -> f32 {
        if self.total > 0.0 {
            self.distances[i] / self.total
        } else {
            0.0
        }
    }
}

/// Strokes an open or closed polyline.
///
/// Consecutive points closer than [`crate::math::EPSILON`] are merged first.
/// Fewer than two distinct points draw nothing; exactly two draw a single
/// flat-ended segment. Otherwise every edge becomes one quad between the
/// joins at its ends, smooth joins add a fill triangle per bend, and open
/// paths end in flat caps. The width tapers by arc length when the style
/// asks for it; a closed path reaches its end width on the closing edge.
#[derive(Debug, Clone, Copy)]
pub struct StrokePath<'a> {
    points: &'a [Point2],
    style: StrokeStyle,
    closed: bool,
}

impl<'a> StrokePath<'a> {
    /// Creates a stroke over `points`.
    #[must_use]
    pub fn new(points: &'a [Point2], style: StrokeStyle, closed: bool) -> Self {
        Self {
            points,
            style,
            closed,
        }
    }

    /// Strokes the path, reusing `scratch` for the cleaned-up points.
    pub fn execute<B: Batch>(&self, batch: &mut B, scratch: &mut PathScratch) {
        scratch.load(self.points, self.closed);
        let scratch = &*scratch;
        let n = scratch.points.len();
        if n < 2 {
            trace!(points = self.points.len(), "path has fewer than two distinct points");
            return;
        }

        let style = &self.style;
        let pts = &scratch.points;
        let half_at = |i: usize| style.half_width_at(scratch.progress(i));

        if n == 2 {
            LineStroke::new(pts[0], pts[1])
                .with_half_widths(half_at(0), half_at(1))
                .with_colour(style.colour())
                .execute(batch, None);
            return;
        }

        let closed = self.closed;
        if style.join() == JoinType::None {
            let edges = if closed { n } else { n - 1 };
            for i in 0..edges {
                let j = (i + 1) % n;
                let end_half = if j == 0 {
                    style.half_width_at(1.0)
                } else {
                    half_at(j)
                };
                LineStroke::new(pts[i], pts[j])
                    .with_half_widths(half_at(i), end_half)
                    .with_colour(style.colour())
                    .execute(batch, None);
            }
            return;
        }

        emit_ribbon(batch, n, closed, style.colour(), |i| {
            let half = half_at(i);
            if !closed && i == 0 {
                RibbonJoint::shared(join::flat_endpoint(&pts[0], &(pts[1] - pts[0]), half))
            } else if !closed && i == n - 1 {
                RibbonJoint::shared(join::flat_endpoint(&pts[i], &(pts[i] - pts[i - 1]), half))
            } else {
                let prev = (i + n - 1) % n;
                let next = (i + 1) % n;
                RibbonJoint::between(style.join(), &pts[prev], &pts[i], &pts[next], half)
            }
        });
    }
}
