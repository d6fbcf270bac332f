use tracing::debug;

use crate::batch::Batch;
use crate::colour::Colour;
use crate::error::Result;
use crate::math::{estimate_side_count, PixelGrid, Point2};
use crate::tessellation::{
    rectangle_corners, FillPolygon, FillRectangle, FillSector, FillTriangle, LineStroke,
    PathScratch, StrokePath, StrokePolygon, StrokeStyle,
};

/// Settings for a [`Drawer`].
#[derive(Debug, Clone, Copy)]
pub struct DrawerConfig {
    /// Size of one device pixel in world units. Drives line snapping and
    /// the side count of ellipses and circles.
    pub pixel_size: f32,
}

impl DrawerConfig {
    /// Checks the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `pixel_size` is not positive and finite.
    pub fn validate(&self) -> Result<()> {
        PixelGrid::new(self.pixel_size).map(|_| ())
    }
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self { pixel_size: 1.0 }
    }
}

/// Shape-drawing engine over a batch.
///
/// Every call draws one shape inside its own caching session, so a shape
/// reaches the sink in as few flushes as the batch capacity allows. Calls
/// made while the caller holds an outer session on the batch are merged
/// into that session.
#[derive(Debug)]
pub struct Drawer<B> {
    batch: B,
    grid: PixelGrid,
    scratch: PathScratch,
}

impl<B: Batch> Drawer<B> {
    /// Creates a drawer over `batch`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(batch: B, config: DrawerConfig) -> Result<Self> {
        let grid = PixelGrid::new(config.pixel_size)?;
        debug!(
            pixel_size = config.pixel_size,
            max_vertices = batch.max_vertices(),
            "created drawer"
        );
        Ok(Self {
            batch,
            grid,
            scratch: PathScratch::new(),
        })
    }

    /// Returns the batch.
    #[must_use]
    pub fn batch(&self) -> &B {
        &self.batch
    }

    /// Returns the batch mutably.
    pub fn batch_mut(&mut self) -> &mut B {
        &mut self.batch
    }

    /// Flushes anything still staged and returns the batch.
    pub fn into_batch(mut self) -> B {
        self.batch.flush();
        self.batch
    }

    /// Returns the current pixel size.
    #[must_use]
    pub fn pixel_size(&self) -> f32 {
        self.grid.size()
    }

    /// Changes the pixel size for shapes drawn from now on.
    ///
    /// # Errors
    ///
    /// Returns an error if `pixel_size` is not positive and finite; the
    /// previous size is kept.
    pub fn set_pixel_size(&mut self, pixel_size: f32) -> Result<()> {
        self.grid = PixelGrid::new(pixel_size)?;
        debug!(pixel_size, "changed pixel size");
        Ok(())
    }

    /// Hands everything staged so far to the sink.
    pub fn flush(&mut self) {
        self.batch.flush();
    }

    /// Draws a single segment, snapped to pixel centres if the line asks
    /// for it.
    pub fn line(&mut self, line: &LineStroke) {
        let grid = self.grid;
        self.cached(|batch, _| line.execute(batch, Some(&grid)));
    }

    /// Strokes a polyline, closing it back to the first point if `closed`.
    pub fn path(&mut self, points: &[Point2], style: &StrokeStyle, closed: bool) {
        let path = StrokePath::new(points, *style, closed);
        self.cached(|batch, scratch| path.execute(batch, scratch));
    }

    /// Strokes a regular polygon, ellipse or arc with an explicit side
    /// count.
    pub fn polygon(&mut self, polygon: &StrokePolygon) {
        self.cached(|batch, _| polygon.execute(batch));
    }

    /// Strokes a circular arc of `sweep` radians from `start_angle`.
    pub fn arc(
        &mut self,
        centre: Point2,
        radius: f32,
        start_angle: f32,
        sweep: f32,
        style: &StrokeStyle,
    ) {
        let sides = self.side_count(radius, radius);
        let arc = StrokePolygon::new(centre, sides, radius, radius, *style)
            .with_arc(start_angle, sweep);
        self.polygon(&arc);
    }

    /// Strokes an ellipse rotated by `rotation` radians about its centre.
    pub fn ellipse(
        &mut self,
        centre: Point2,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
        style: &StrokeStyle,
    ) {
        let sides = self.side_count(radius_x, radius_y);
        let ellipse = StrokePolygon::new(centre, sides, radius_x, radius_y, *style)
            .with_rotation(rotation);
        self.polygon(&ellipse);
    }

    /// Strokes a circle.
    pub fn circle(&mut self, centre: Point2, radius: f32, style: &StrokeStyle) {
        self.ellipse(centre, radius, radius, 0.0, style);
    }

    /// Strokes the outline of a rectangle with its corner at `(x, y)`,
    /// rotated about its centre.
    pub fn rectangle(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rotation: f32,
        style: &StrokeStyle,
    ) {
        let corners = rectangle_corners(x, y, width, height, rotation);
        self.path(&corners, style, true);
    }

    /// Fills a rectangle.
    pub fn filled_rectangle(&mut self, rectangle: &FillRectangle) {
        self.cached(|batch, _| rectangle.execute(batch));
    }

    /// Fills a triangle.
    pub fn filled_triangle(&mut self, triangle: &FillTriangle) {
        self.cached(|batch, _| triangle.execute(batch));
    }

    /// Fills a circular pie slice of `sweep` radians from `start_angle`.
    pub fn sector(
        &mut self,
        centre: Point2,
        radius: f32,
        start_angle: f32,
        sweep: f32,
        colour: Colour,
    ) {
        let sides = self.side_count(radius, radius);
        let sector = FillSector::new(centre, sides, radius, radius)
            .with_arc(start_angle, sweep)
            .with_colour(colour.pack());
        self.cached(|batch, _| sector.execute(batch));
    }

    /// Fills an ellipse rotated by `rotation` radians about its centre.
    pub fn filled_ellipse(
        &mut self,
        centre: Point2,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
        colour: Colour,
    ) {
        let sides = self.side_count(radius_x, radius_y);
        let fill = FillSector::new(centre, sides, radius_x, radius_y)
            .with_rotation(rotation)
            .with_colour(colour.pack());
        self.cached(|batch, _| fill.execute(batch));
    }

    /// Fills a circle.
    pub fn filled_circle(&mut self, centre: Point2, radius: f32, colour: Colour) {
        self.filled_ellipse(centre, radius, radius, 0.0, colour);
    }

    /// Fills a simple polygon, convex or concave.
    ///
    /// # Errors
    ///
    /// Returns an error if the outline has fewer than three distinct
    /// points, crosses itself, or cannot be triangulated. Nothing is drawn
    /// in that case.
    pub fn filled_polygon(&mut self, points: &[Point2], colour: Colour) -> Result<()> {
        let fill = FillPolygon::new(points).with_colour(colour.pack());
        self.cached(|batch, _| fill.execute(batch))
    }

    fn side_count(&self, radius_x: f32, radius_y: f32) -> usize {
        estimate_side_count(self.grid.size(), radius_x, radius_y)
    }

    /// Runs `draw` inside one caching session, closed even when `draw`
    /// returns an error.
    fn cached<R>(&mut self, draw: impl FnOnce(&mut B, &mut PathScratch) -> R) -> R {
        self.batch.start_caching();
        let result = draw(&mut self.batch, &mut self.scratch);
        self.batch.end_caching();
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::batch::testing::{RecordingIndexedSink, RecordingSink};
    use crate::batch::{BatchConfig, IndexedBatch, QuadBatch, TextureRegion};
    use crate::error::{ConfigError, StrokisError};
    use crate::tessellation::JoinType;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;
    use tracing_subscriber::EnvFilter;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn quad_drawer() -> Drawer<QuadBatch<RecordingSink>> {
        init_tracing();
        let batch = QuadBatch::with_defaults(RecordingSink::default()).unwrap();
        Drawer::new(batch, DrawerConfig::default()).unwrap()
    }

    fn indexed_drawer() -> Drawer<IndexedBatch<RecordingIndexedSink>> {
        init_tracing();
        let batch = IndexedBatch::with_defaults(RecordingIndexedSink::default()).unwrap();
        Drawer::new(batch, DrawerConfig::default()).unwrap()
    }

    fn p(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    fn style(width: f32) -> StrokeStyle {
        StrokeStyle::new(width).unwrap()
    }

    #[test]
    fn invalid_pixel_size_is_rejected() {
        let batch = QuadBatch::with_defaults(RecordingSink::default()).unwrap();
        let err = Drawer::new(batch, DrawerConfig { pixel_size: 0.0 }).unwrap_err();
        assert!(matches!(err, StrokisError::Config(ConfigError::PixelSize(_))));

        let mut drawer = quad_drawer();
        assert!(drawer.set_pixel_size(f32::NAN).is_err());
        assert_abs_diff_eq!(drawer.pixel_size(), 1.0);
    }

    #[test]
    fn each_shape_is_one_flush() {
        let mut drawer = quad_drawer();
        drawer.path(&[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)], &style(2.0), false);
        drawer.circle(p(0.0, 0.0), 50.0, &style(1.0));
        let batch = drawer.into_batch();
        assert_eq!(batch.flush_count(), 2);
    }

    #[test]
    fn outer_session_merges_shapes() {
        let mut drawer = quad_drawer();
        drawer.batch_mut().start_caching();
        drawer.path(&[p(0.0, 0.0), p(10.0, 0.0)], &style(2.0), false);
        drawer.filled_triangle(&FillTriangle::new(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)));
        assert!(drawer.batch().sink().flushes.is_empty());
        drawer.batch_mut().end_caching();
        assert_eq!(drawer.batch().flush_count(), 1);
        assert_eq!(drawer.batch().sink().flushes[0].len(), 8);
    }

    #[test]
    fn line_uses_drawer_grid() {
        let mut drawer = quad_drawer();
        drawer.set_pixel_size(2.0).unwrap();
        drawer.line(&LineStroke::new(p(0.4, 0.4), p(9.0, 0.4)).snapped(true));
        let q = drawer.into_batch().into_sink().quads()[0];
        // Snapped to the centre of the 2-unit pixel at y = 1.
        assert_abs_diff_eq!(q[0].y, 1.5, epsilon = 1e-5);
        assert_abs_diff_eq!(q[1].y, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn circle_side_count_follows_pixel_size() {
        let mut drawer = quad_drawer();
        drawer.circle(p(0.0, 0.0), 100.0, &style(1.0));
        let coarse = drawer.batch().sink().quads().len();
        assert_eq!(coarse, estimate_side_count(1.0, 100.0, 100.0));

        drawer.batch_mut().sink_mut().flushes.clear();
        drawer.set_pixel_size(0.5).unwrap();
        drawer.circle(p(0.0, 0.0), 100.0, &style(1.0));
        assert!(drawer.batch().sink().quads().len() > coarse);
    }

    #[test]
    fn rectangle_outline_has_mitred_corners() {
        let mut drawer = quad_drawer();
        drawer.rectangle(0.0, 0.0, 10.0, 10.0, 0.0, &style(2.0));
        let quads = drawer.into_batch().into_sink().quads();
        assert_eq!(quads.len(), 4);
        // Outer mitre at the (10, 0) corner.
        assert!(quads
            .iter()
            .flatten()
            .any(|c| (c.x - 11.0).abs() < 1e-4 && (c.y + 1.0).abs() < 1e-4));
    }

    #[test]
    fn arc_ends_on_requested_angle() {
        let mut drawer = quad_drawer();
        drawer.arc(p(0.0, 0.0), 10.0, 0.0, PI, &style(2.0).with_join(JoinType::Pointy));
        let quads = drawer.into_batch().into_sink().quads();
        let last = quads.last().unwrap();
        assert_abs_diff_eq!(last[3].x, -9.0, epsilon = 1e-4);
        assert_abs_diff_eq!(last[2].x, -11.0, epsilon = 1e-4);
    }

    #[test]
    fn filled_circle_uses_estimated_sides() {
        let mut drawer = indexed_drawer();
        drawer.filled_circle(p(0.0, 0.0), 10.0, Colour::WHITE);
        let sink = drawer.into_batch().into_sink();
        assert_eq!(sink.triangles().len(), estimate_side_count(1.0, 10.0, 10.0));
    }

    #[test]
    fn empty_sector_draws_nothing() {
        let mut drawer = indexed_drawer();
        drawer.sector(p(0.0, 0.0), 10.0, 1.0, 0.0, Colour::WHITE);
        assert!(drawer.into_batch().into_sink().flushes.is_empty());
    }

    #[test]
    fn failed_polygon_fill_closes_session() {
        let mut drawer = indexed_drawer();
        let bow_tie = [p(0.0, 0.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 1.0)];
        assert!(drawer.filled_polygon(&bow_tie, Colour::WHITE).is_err());
        assert!(!drawer.batch().is_caching());

        drawer
            .filled_polygon(&[p(0.0, 0.0), p(3.0, 0.0), p(0.0, 3.0)], Colour::BLACK)
            .unwrap();
        let sink = drawer.into_batch().into_sink();
        assert_eq!(sink.triangles().len(), 1);
        assert_eq!(sink.flushes[0].0[0].colour, Colour::BLACK.pack());
    }

    #[test]
    fn small_batch_stream_matches_large_batch() {
        let draw = |drawer: &mut Drawer<QuadBatch<RecordingSink>>| {
            drawer.ellipse(p(5.0, 5.0), 40.0, 20.0, 0.3, &style(3.0).with_join(JoinType::Smooth));
            drawer.filled_rectangle(&FillRectangle::new(0.0, 0.0, 4.0, 4.0).with_rotation(0.5));
        };

        let mut large = quad_drawer();
        draw(&mut large);
        let small_batch = QuadBatch::new(
            RecordingSink::default(),
            TextureRegion::default(),
            BatchConfig { max_vertices: 12 },
        )
        .unwrap();
        let mut small = Drawer::new(small_batch, DrawerConfig::default()).unwrap();
        draw(&mut small);

        let small = small.into_batch();
        assert!(small.flush_count() > 2);
        assert_eq!(small.into_sink().stream(), large.into_batch().into_sink().stream());
    }
}
