use std::f32::consts::TAU;

use crate::math::{Point2, Rotation2, EPSILON};

/// Angular sampling of a regular polygon, ellipse or arc.
///
/// Vertices sit every `2π / sides` radians from the start angle. A partial
/// arc gets just enough segments to cover its sweep, and its last vertex
/// lands exactly on the end angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ArcSampling {
    start: f32,
    sweep: f32,
    interval: f32,
    segments: usize,
    full: bool,
}

impl ArcSampling {
    /// Returns `None` when there is nothing to draw: no sides, a sweep
    /// under [`EPSILON`], or non-finite angles. Negative sweeps are turned
    /// around so sampling always runs counter-clockwise.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub(crate) fn new(sides: usize, start_angle: f32, sweep: f32) -> Option<Self> {
        if sides == 0 || !start_angle.is_finite() || !sweep.is_finite() || sweep.abs() < EPSILON {
            return None;
        }
        let (start, sweep) = if sweep < 0.0 {
            (start_angle + sweep, -sweep)
        } else {
            (start_angle, sweep)
        };
        let interval = TAU / sides as f32;
        let full = sweep >= TAU - EPSILON;
        let segments = if full {
            sides
        } else {
            // Tolerate rounding in `sweep / interval` so an exact multiple
            // does not grow a sliver segment.
            ((sweep / interval - EPSILON).ceil() as usize).clamp(1, sides)
        };
        Some(Self {
            start,
            sweep: if full { TAU } else { sweep },
            interval,
            segments,
            full,
        })
    }

    /// Whether the sampling wraps into a closed loop.
    pub(crate) fn is_full(&self) -> bool {
        self.full
    }

    /// Number of edges.
    pub(crate) fn segments(&self) -> usize {
        self.segments
    }

    /// Number of distinct vertices.
    pub(crate) fn vertex_count(&self) -> usize {
        if self.full {
            self.segments
        } else {
            self.segments + 1
        }
    }

    /// Angle of vertex `i`; indices past the last vertex of a loop wrap.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn angle(&self, i: usize) -> f32 {
        if self.full {
            self.start + (i % self.segments) as f32 * self.interval
        } else if i >= self.segments {
            self.start + self.sweep
        } else {
            self.start + i as f32 * self.interval
        }
    }
}

/// An axis-aligned ellipse, rotated about and translated to `centre`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EllipseFrame {
    centre: Point2,
    radius_x: f32,
    radius_y: f32,
    rotation: Rotation2,
}

impl EllipseFrame {
    pub(crate) fn new(centre: Point2, radius_x: f32, radius_y: f32, rotation: f32) -> Self {
        Self {
            centre,
            radius_x: radius_x.abs(),
            radius_y: radius_y.abs(),
            rotation: Rotation2::new(rotation),
        }
    }

    /// Whether both radii are too small to draw.
    pub(crate) fn is_degenerate(&self) -> bool {
        !(self.radius_x.is_finite() && self.radius_y.is_finite())
            || (self.radius_x < EPSILON && self.radius_y < EPSILON)
    }

    /// Point at `angle` in the unrotated frame centred on the origin.
    pub(crate) fn local(&self, angle: f32) -> Point2 {
        Point2::new(self.radius_x * angle.cos(), self.radius_y * angle.sin())
    }

    /// Maps a local point into world space.
    pub(crate) fn to_world(&self, local: Point2) -> Point2 {
        self.centre + self.rotation * local.coords
    }

    pub(crate) fn centre(&self) -> Point2 {
        self.centre
    }
}
