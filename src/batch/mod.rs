mod buffer;
mod indexed_batch;
mod quad_batch;

pub use indexed_batch::IndexedBatch;
pub use quad_batch::QuadBatch;

use crate::colour::PackedColour;
use crate::error::{ConfigError, Result};
use crate::math::Point2;

/// Default vertex capacity of a batch (1000 quads).
pub const DEFAULT_MAX_VERTICES: usize = 4000;

/// Smallest usable capacity: one quad.
pub const MIN_VERTICES: usize = 4;

/// Largest capacity addressable by `u16` indices.
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// A finished vertex as handed to a sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point2,
    pub uv: Point2,
    pub colour: PackedColour,
}

/// A vertex as staged by the tessellators, before the batch assigns its
/// texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub position: Point2,
    pub colour: PackedColour,
}

impl Corner {
    /// Creates a corner at `position`.
    #[must_use]
    pub fn new(position: Point2, colour: PackedColour) -> Self {
        Self { position, colour }
    }
}

/// Texture coordinates of the region every vertex samples from.
///
/// Solid-colour drawing uses a region that collapses onto the centre of a
/// single white texel, so every corner gets the same coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRegion {
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
}

impl TextureRegion {
    /// Creates a region from its corner texture coordinates.
    #[must_use]
    pub fn new(u: f32, v: f32, u2: f32, v2: f32) -> Self {
        Self { u, v, u2, v2 }
    }

    /// Region covering only the centre of texel `(x, y)` in a texture of
    /// `width` x `height` texels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn texel_centre(x: u32, y: u32, width: u32, height: u32) -> Self {
        let u = (x as f32 + 0.5) / width.max(1) as f32;
        let v = (y as f32 + 0.5) / height.max(1) as f32;
        Self::new(u, v, u, v)
    }

    /// Texture coordinates assigned to quad slots 0 to 3, in the order the
    /// tessellators emit quad corners.
    #[must_use]
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.u, self.v),
            Point2::new(self.u2, self.v),
            Point2::new(self.u2, self.v2),
            Point2::new(self.u, self.v2),
        ]
    }
}

impl Default for TextureRegion {
    fn default() -> Self {
        Self::texel_centre(0, 0, 1, 1)
    }
}

/// Capacity settings for a batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    /// Number of vertices the batch holds before it must flush.
    pub max_vertices: usize,
}

impl BatchConfig {
    /// Checks that the capacity fits at least one quad and stays
    /// addressable by `u16` indices.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Capacity`] when `max_vertices` is out of range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_VERTICES..=MAX_VERTICES).contains(&self.max_vertices) {
            return Err(ConfigError::Capacity {
                requested: self.max_vertices,
                min: MIN_VERTICES,
                max: MAX_VERTICES,
            }
            .into());
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_vertices: DEFAULT_MAX_VERTICES,
        }
    }
}

/// Receives finished triangle-list vertices, four per quad.
///
/// Every quad `[a, b, c, d]` is drawn as triangles `(a, b, c)` and
/// `(a, c, d)`.
pub trait QuadSink {
    /// Receives one batch of vertices; the slice is only valid for the call.
    fn flush(&mut self, vertices: &[Vertex]);
}

impl<F> QuadSink for F
where
    F: FnMut(&[Vertex]),
{
    fn flush(&mut self, vertices: &[Vertex]) {
        self(vertices);
    }
}

/// Receives finished vertices together with a triangle index list.
pub trait IndexedSink {
    /// Receives one batch of vertices and the triangle indices into it.
    fn flush(&mut self, vertices: &[Vertex], indices: &[u16]);
}

impl<F> IndexedSink for F
where
    F: FnMut(&[Vertex], &[u16]),
{
    fn flush(&mut self, vertices: &[Vertex], indices: &[u16]) {
        self(vertices, indices);
    }
}

/// A bounded vertex cache that hands its contents to a sink.
///
/// Every push reserves its own room first, so the buffer never overflows;
/// a flush only ever happens between whole quads or triangles. Outside a
/// caching session each push is flushed immediately.
pub trait Batch {
    /// Flushes now if fewer than `vertices` slots remain.
    fn ensure_space(&mut self, vertices: usize);

    /// Pushes one quad, drawn as triangles `(0, 1, 2)` and `(0, 2, 3)`.
    fn push_quad(&mut self, corners: &[Corner; 4]);

    /// Pushes one triangle.
    fn push_triangle(&mut self, corners: &[Corner; 3]);

    /// Pushes a triangle fan around `centre`: one triangle per consecutive
    /// pair of `rim` corners.
    fn push_fan<I>(&mut self, centre: Corner, rim: I)
    where
        I: IntoIterator<Item = Corner>;

    /// Opens a caching session. Sessions nest; only the outermost
    /// [`end_caching`](Batch::end_caching) flushes.
    fn start_caching(&mut self);

    /// Closes a caching session and flushes once the outermost one ends.
    fn end_caching(&mut self);

    /// Returns `true` while a caching session is open.
    fn is_caching(&self) -> bool;

    /// Hands all staged geometry to the sink. No-op when nothing is staged.
    fn flush(&mut self);

    /// Number of vertices currently staged.
    fn vertex_count(&self) -> usize;

    /// Vertex capacity fixed at construction.
    fn max_vertices(&self) -> usize;
}
