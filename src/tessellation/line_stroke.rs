use tracing::trace;

use crate::batch::{Batch, Corner};
use crate::colour::PackedColour;
use crate::math::{left_normal, PixelGrid, Point2, Vector2, EPSILON};

/// How far, in pixels, snapped endpoints are pushed outward along the line
/// so both end pixel centres fall inside the quad.
const SNAP_NUDGE: f32 = 1e-3;

/// A single straight segment stroked as one quad.
///
/// The half-width and colour are set independently at each end. Quads are
/// emitted as `[start left, start right, end right, end left]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStroke {
    start: Point2,
    end: Point2,
    start_half_width: f32,
    end_half_width: f32,
    start_colour: PackedColour,
    end_colour: PackedColour,
    snap: bool,
}

impl LineStroke {
    /// Creates a white, one unit wide, unsnapped segment.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            start,
            end,
            start_half_width: 0.5,
            end_half_width: 0.5,
            start_colour: PackedColour::WHITE,
            end_colour: PackedColour::WHITE,
            snap: false,
        }
    }

    /// Sets the full width at both ends.
    #[must_use]
    pub fn with_width(self, width: f32) -> Self {
        self.with_half_widths(width * 0.5, width * 0.5)
    }

    /// Sets the half-widths at the start and end.
    #[must_use]
    pub fn with_half_widths(mut self, start: f32, end: f32) -> Self {
        self.start_half_width = start;
        self.end_half_width = end;
        self
    }

    /// Uses `colour` at both ends.
    #[must_use]
    pub fn with_colour(self, colour: PackedColour) -> Self {
        self.with_colours(colour, colour)
    }

    /// Sets the colours at the start and end.
    #[must_use]
    pub fn with_colours(mut self, start: PackedColour, end: PackedColour) -> Self {
        self.start_colour = start;
        self.end_colour = end;
        self
    }

    /// Snaps both endpoints to pixel centres when executed with a grid.
    #[must_use]
    pub fn snapped(mut self, snap: bool) -> Self {
        self.snap = snap;
        self
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> Point2 {
        self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> Point2 {
        self.end
    }

    /// Pushes the quad. Segments shorter than [`EPSILON`] (after snapping)
    /// or with a half-width that is not positive and finite draw nothing.
    pub fn execute<B: Batch>(&self, batch: &mut B, grid: Option<&PixelGrid>) {
        let usable = |h: f32| h.is_finite() && h > 0.0;
        if !(usable(self.start_half_width) && usable(self.end_half_width)) {
            trace!(
                start_half_width = self.start_half_width,
                end_half_width = self.end_half_width,
                "skipping segment with unusable width"
            );
            return;
        }

        let (start, end) = match grid {
            Some(grid) if self.snap => snap_segment(&self.start, &self.end, grid),
            _ => (self.start, self.end),
        };

        let d = end - start;
        if !(d.x.is_finite() && d.y.is_finite()) || d.norm_squared() < EPSILON * EPSILON {
            trace!(?start, ?end, "skipping degenerate segment");
            return;
        }

        let normal = segment_normal(&d);
        let n1 = normal * self.start_half_width;
        let n2 = normal * self.end_half_width;
        batch.push_quad(&[
            Corner::new(start + n1, self.start_colour),
            Corner::new(start - n1, self.start_colour),
            Corner::new(end - n2, self.end_colour),
            Corner::new(end + n2, self.end_colour),
        ]);
    }
}

/// Unit left normal of `d`, exact for axis-aligned segments.
fn segment_normal(d: &Vector2) -> Vector2 {
    if d.y.abs() < f32::EPSILON {
        Vector2::new(0.0, d.x.signum())
    } else if d.x.abs() < f32::EPSILON {
        Vector2::new(-d.y.signum(), 0.0)
    } else {
        left_normal(d / d.norm())
    }
}

fn snap_segment(start: &Point2, end: &Point2, grid: &PixelGrid) -> (Point2, Point2) {
    let start = grid.snap_point(start);
    let end = grid.snap_point(end);
    match (end - start).try_normalize(f32::EPSILON) {
        Some(dir) => {
            let nudge = dir * (SNAP_NUDGE * grid.size());
            (start - nudge, end + nudge)
        }
        None => (start, end),
    }
}
