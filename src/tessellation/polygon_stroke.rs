use std::f32::consts::TAU;

use tracing::trace;

use super::arc_sampling::{ArcSampling, EllipseFrame};
use super::join;
use super::line_stroke::LineStroke;
use super::ribbon::{emit_ribbon, RibbonJoint};
use super::stroke_style::{JoinType, StrokeStyle};
use crate::batch::Batch;
use crate::math::Point2;

/// Strokes the outline of a regular polygon, ellipse or elliptical arc.
///
/// Vertices are generated on the fly at `2π / sides` intervals, so no point
/// list is built. Joins are solved in the unrotated frame (where the
/// non-uniform radii already apply) and the results are rotated into
/// place. A full sweep closes into a loop; a partial sweep ends in caps cut
/// along the radius. The stroke width is constant: a tapered style uses its
/// start width.
#[derive(Debug, Clone, Copy)]
pub struct StrokePolygon {
    centre: Point2,
    sides: usize,
    radius_x: f32,
    radius_y: f32,
    rotation: f32,
    start_angle: f32,
    sweep: f32,
    style: StrokeStyle,
}

impl StrokePolygon {
    /// Creates a closed outline with the given side count.
    #[must_use]
    pub fn new(
        centre: Point2,
        sides: usize,
        radius_x: f32,
        radius_y: f32,
        style: StrokeStyle,
    ) -> Self {
        Self {
            centre,
            sides,
            radius_x,
            radius_y,
            rotation: 0.0,
            start_angle: 0.0,
            sweep: TAU,
            style,
        }
    }

    /// Rotates the whole shape about its centre.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Limits the outline to `sweep` radians starting at `start_angle`.
    #[must_use]
    pub fn with_arc(mut self, start_angle: f32, sweep: f32) -> Self {
        self.start_angle = start_angle;
        self.sweep = sweep;
        self
    }

    /// Pushes the outline. Zero sides, zero sweep or zero radii draw nothing.
    pub fn execute<B: Batch>(&self, batch: &mut B) {
        let frame = EllipseFrame::new(self.centre, self.radius_x, self.radius_y, self.rotation);
        let Some(sampling) = ArcSampling::new(self.sides, self.start_angle, self.sweep) else {
            trace!(sides = self.sides, sweep = self.sweep, "skipping empty polygon outline");
            return;
        };
        if frame.is_degenerate() {
            trace!("skipping polygon outline with zero radii");
            return;
        }

        let style = &self.style;
        let local = |i: usize| frame.local(sampling.angle(i));

        if style.join() == JoinType::None {
            for i in 0..sampling.segments() {
                LineStroke::new(frame.to_world(local(i)), frame.to_world(local(i + 1)))
                    .with_width(style.width())
                    .with_colour(style.colour())
                    .execute(batch, None);
            }
            return;
        }

        let count = sampling.vertex_count();
        let full = sampling.is_full();
        let half = style.half_width();
        emit_ribbon(batch, count, full, style.colour(), |i| {
            let b = local(i);
            let joint = if !full && (i == 0 || i == count - 1) {
                RibbonJoint::shared(join::radial_endpoint(&b, &Point2::origin(), half))
            } else {
                let a = local(if i == 0 { count - 1 } else { i - 1 });
                let c = local(i + 1);
                RibbonJoint::between(style.join(), &a, &b, &c, half)
            };
            joint.map(|p| frame.to_world(p))
        });
    }
}
