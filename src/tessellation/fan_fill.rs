use std::f32::consts::TAU;

use tracing::trace;

use super::arc_sampling::{ArcSampling, EllipseFrame};
use crate::batch::{Batch, Corner};
use crate::colour::PackedColour;
use crate::math::{Point2, Rotation2, Vector2, EPSILON};

/// Fills a regular polygon, ellipse or pie slice as a fan around its centre.
///
/// A full sweep gives `sides` triangles; a partial sweep gives only the
/// triangles covering the arc, the last one trimmed to the end angle.
#[derive(Debug, Clone, Copy)]
pub struct FillSector {
    centre: Point2,
    sides: usize,
    radius_x: f32,
    radius_y: f32,
    rotation: f32,
    start_angle: f32,
    sweep: f32,
    colour: PackedColour,
    centre_colour: PackedColour,
}

impl FillSector {
    /// Creates a full, white fill.
    #[must_use]
    pub fn new(centre: Point2, sides: usize, radius_x: f32, radius_y: f32) -> Self {
        Self {
            centre,
            sides,
            radius_x,
            radius_y,
            rotation: 0.0,
            start_angle: 0.0,
            sweep: TAU,
            colour: PackedColour::WHITE,
            centre_colour: PackedColour::WHITE,
        }
    }

    /// Rotates the shape about its centre.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Limits the fill to `sweep` radians starting at `start_angle`.
    #[must_use]
    pub fn with_arc(mut self, start_angle: f32, sweep: f32) -> Self {
        self.start_angle = start_angle;
        self.sweep = sweep;
        self
    }

    /// Uses `colour` for the hub and the rim.
    #[must_use]
    pub fn with_colour(self, colour: PackedColour) -> Self {
        self.with_colours(colour, colour)
    }

    /// Uses `centre` at the hub of the fan and `rim` on the outline.
    #[must_use]
    pub fn with_colours(mut self, centre: PackedColour, rim: PackedColour) -> Self {
        self.centre_colour = centre;
        self.colour = rim;
        self
    }

    /// Pushes the fan. A zero sweep, zero sides or zero radii draw nothing.
    pub fn execute<B: Batch>(&self, batch: &mut B) {
        let frame = EllipseFrame::new(self.centre, self.radius_x, self.radius_y, self.rotation);
        let Some(sampling) = ArcSampling::new(self.sides, self.start_angle, self.sweep) else {
            trace!(sides = self.sides, sweep = self.sweep, "skipping empty sector");
            return;
        };
        if frame.is_degenerate() {
            trace!("skipping sector with zero radii");
            return;
        }

        let triangles = sampling.segments();
        batch.ensure_space((triangles + 2).min(batch.max_vertices()));
        let rim = (0..=triangles).map(|i| {
            let p = frame.to_world(frame.local(sampling.angle(i)));
            Corner::new(p, self.colour)
        });
        batch.push_fan(Corner::new(frame.centre(), self.centre_colour), rim);
    }
}

/// Fills a rectangle, optionally rotated about its centre, as one quad.
///
/// Corner colours run counter-clockwise from the corner at `(x, y)`.
#[derive(Debug, Clone, Copy)]
pub struct FillRectangle {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    rotation: f32,
    colours: [PackedColour; 4],
}

impl FillRectangle {
    /// Creates a white rectangle with its corner at `(x, y)`.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
            colours: [PackedColour::WHITE; 4],
        }
    }

    /// Rotates the rectangle about its centre.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Uses `colour` at every corner.
    #[must_use]
    pub fn with_colour(self, colour: PackedColour) -> Self {
        self.with_corner_colours([colour; 4])
    }

    /// Sets the colour of each corner.
    #[must_use]
    pub fn with_corner_colours(mut self, colours: [PackedColour; 4]) -> Self {
        self.colours = colours;
        self
    }

    /// Pushes the quad. A rectangle with no width or height draws nothing.
    pub fn execute<B: Batch>(&self, batch: &mut B) {
        if self.width.abs() < EPSILON || self.height.abs() < EPSILON {
            trace!(width = self.width, height = self.height, "skipping empty rectangle");
            return;
        }
        let corners = rectangle_corners(self.x, self.y, self.width, self.height, self.rotation);
        batch.push_quad(&[
            Corner::new(corners[0], self.colours[0]),
            Corner::new(corners[1], self.colours[1]),
            Corner::new(corners[2], self.colours[2]),
            Corner::new(corners[3], self.colours[3]),
        ]);
    }
}

/// Fills a single triangle with per-corner colours.
#[derive(Debug, Clone, Copy)]
pub struct FillTriangle {
    points: [Point2; 3],
    colours: [PackedColour; 3],
}

impl FillTriangle {
    /// Creates a white triangle.
    #[must_use]
    pub fn new(a: Point2, b: Point2, c: Point2) -> Self {
        Self {
            points: [a, b, c],
            colours: [PackedColour::WHITE; 3],
        }
    }

    /// Uses `colour` at every corner.
    #[must_use]
    pub fn with_colour(self, colour: PackedColour) -> Self {
        self.with_corner_colours([colour; 3])
    }

    /// Sets the colour of each corner.
    #[must_use]
    pub fn with_corner_colours(mut self, colours: [PackedColour; 3]) -> Self {
        self.colours = colours;
        self
    }

    /// Pushes the triangle. A zero-area triangle draws nothing.
    pub fn execute<B: Batch>(&self, batch: &mut B) {
        let [a, b, c] = self.points;
        if (b - a).perp(&(c - a)).abs() < EPSILON * EPSILON {
            trace!("skipping zero-area triangle");
            return;
        }
        batch.push_triangle(&[
            Corner::new(a, self.colours[0]),
            Corner::new(b, self.colours[1]),
            Corner::new(c, self.colours[2]),
        ]);
    }
}

/// Corners of a `width` x `height` rectangle at `(x, y)`, counter-clockwise
/// from `(x, y)`, rotated about the rectangle's centre.
pub(crate) fn rectangle_corners(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    rotation: f32,
) -> [Point2; 4] {
    let centre = Point2::new(x + width * 0.5, y + height * 0.5);
    let (hw, hh) = (width * 0.5, height * 0.5);
    let offsets = [
        Vector2::new(-hw, -hh),
        Vector2::new(hw, -hh),
        Vector2::new(hw, hh),
        Vector2::new(-hw, hh),
    ];
    if rotation == 0.0 {
        return offsets.map(|o| centre + o);
    }
    let rotation = Rotation2::new(rotation);
    offsets.map(|o| centre + rotation * o)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::batch::testing::{RecordingIndexedSink, RecordingSink};
    use crate::batch::{IndexedBatch, QuadBatch};
    use crate::colour::Colour;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn p(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    fn indexed(f: impl FnOnce(&mut IndexedBatch<RecordingIndexedSink>)) -> RecordingIndexedSink {
        let mut batch = IndexedBatch::with_defaults(RecordingIndexedSink::default()).unwrap();
        batch.start_caching();
        f(&mut batch);
        batch.end_caching();
        batch.into_sink()
    }

    fn quad_stream(f: impl FnOnce(&mut QuadBatch<RecordingSink>)) -> RecordingSink {
        let mut batch = QuadBatch::with_defaults(RecordingSink::default()).unwrap();
        f(&mut batch);
        batch.into_sink()
    }

    fn area(t: &[Point2; 3]) -> f32 {
        ((t[1] - t[0]).perp(&(t[2] - t[0])) * 0.5).abs()
    }

    #[test]
    fn full_sector_emits_one_triangle_per_side() {
        let sink = indexed(|b| FillSector::new(p(0.0, 0.0), 6, 1.0, 1.0).execute(b));
        let triangles = sink.triangles();
        assert_eq!(triangles.len(), 6);
        // Every triangle shares the centre.
        assert!(triangles.iter().all(|t| t[0] == p(0.0, 0.0)));
        assert_eq!(sink.vertex_count(), 1 + 7);
    }

    #[test]
    fn zero_sweep_emits_nothing() {
        let sector = FillSector::new(p(0.0, 0.0), 6, 1.0, 1.0).with_arc(0.3, 0.0);
        let sink = indexed(|b| sector.execute(b));
        assert!(sink.triangles().is_empty());
        assert!(sink.flushes.is_empty());
    }

    #[test]
    fn half_sector_covers_half_the_polygon() {
        let full = indexed(|b| FillSector::new(p(0.0, 0.0), 32, 2.0, 2.0).execute(b));
        let half_sector = FillSector::new(p(0.0, 0.0), 32, 2.0, 2.0).with_arc(0.0, PI);
        let half = indexed(|b| half_sector.execute(b));
        let full_area: f32 = full.triangles().iter().map(area).sum();
        let half_area: f32 = half.triangles().iter().map(area).sum();
        assert_eq!(half.triangles().len(), 16);
        assert_abs_diff_eq!(half_area * 2.0, full_area, epsilon = 1e-3);
    }

    #[test]
    fn partial_sector_is_trimmed_to_end_angle() {
        let sector = FillSector::new(p(0.0, 0.0), 4, 1.0, 1.0).with_arc(0.0, 2.0);
        let sink = indexed(|b| sector.execute(b));
        let triangles = sink.triangles();
        assert_eq!(triangles.len(), 2);
        let end = triangles[1][2];
        assert_abs_diff_eq!(end.x, 2.0f32.cos(), epsilon = 1e-5);
        assert_abs_diff_eq!(end.y, 2.0f32.sin(), epsilon = 1e-5);
    }

    #[test]
    fn quad_batch_fan_matches_indexed_triangles() {
        let sector = FillSector::new(p(1.0, 2.0), 7, 3.0, 1.5).with_rotation(0.4);
        let indexed_tris = indexed(|b| sector.execute(b)).triangles();

        let stream = quad_stream(|b| sector.execute(b)).stream();
        let mut quad_tris = Vec::new();
        for q in stream.chunks_exact(4) {
            quad_tris.push([q[0].position, q[1].position, q[2].position]);
            if q[2] != q[3] {
                quad_tris.push([q[0].position, q[2].position, q[3].position]);
            }
        }
        assert_eq!(quad_tris, indexed_tris);
    }

    #[test]
    fn sector_colours_split_hub_and_rim() {
        let hub = Colour::BLACK.pack();
        let rim = Colour::WHITE.pack();
        let sink = indexed(|b| {
            FillSector::new(p(0.0, 0.0), 4, 1.0, 1.0)
                .with_colours(hub, rim)
                .execute(b);
        });
        let (vertices, _) = &sink.flushes[0];
        assert_eq!(vertices[0].colour, hub);
        assert!(vertices[1..].iter().all(|v| v.colour == rim));
    }

    #[test]
    fn rectangle_is_one_quad() {
        let sink = indexed(|b| FillRectangle::new(1.0, 2.0, 4.0, 2.0).execute(b));
        let (vertices, indices) = &sink.flushes[0];
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices.len(), 6);
        assert_eq!(vertices[0].position, p(1.0, 2.0));
        assert_eq!(vertices[2].position, p(5.0, 4.0));
    }

    #[test]
    fn rotated_rectangle_turns_about_centre() {
        let corners = rectangle_corners(0.0, 0.0, 4.0, 2.0, FRAC_PI_2);
        // Centre (2, 1); the (0, 0) corner maps to (3, -1).
        assert_abs_diff_eq!(corners[0].x, 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(corners[0].y, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(corners[2].x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(corners[2].y, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn rectangle_corner_colours_follow_corners() {
        let c = [
            Colour::new(1.0, 0.0, 0.0, 1.0).pack(),
            Colour::new(0.0, 1.0, 0.0, 1.0).pack(),
            Colour::new(0.0, 0.0, 1.0, 1.0).pack(),
            Colour::WHITE.pack(),
        ];
        let rectangle = FillRectangle::new(0.0, 0.0, 1.0, 1.0).with_corner_colours(c);
        let sink = quad_stream(|b| rectangle.execute(b));
        let colours: Vec<_> = sink.stream().iter().map(|v| v.colour).collect();
        assert_eq!(colours, c.to_vec());
    }

    #[test]
    fn empty_rectangle_draws_nothing() {
        let sink = quad_stream(|b| FillRectangle::new(0.0, 0.0, 0.0, 5.0).execute(b));
        assert!(sink.flushes.is_empty());
    }

    #[test]
    fn triangle_fill() {
        let sink = indexed(|b| FillTriangle::new(p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0)).execute(b));
        assert_eq!(sink.triangles(), vec![[p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0)]]);
        let flat = indexed(|b| FillTriangle::new(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)).execute(b));
        assert!(flat.flushes.is_empty());
    }
}
