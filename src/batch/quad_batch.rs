use tracing::{debug, trace};

use super::buffer::VertexBuffer;
use super::{Batch, BatchConfig, Corner, QuadSink, TextureRegion};
use crate::error::Result;

/// Batch for sinks that draw every four vertices as one quad.
///
/// Triangles are stored as quads whose last corner repeats the third, and
/// fans are packed two triangles per quad: `(c, r0, r1, r2)` covers
/// `(c, r0, r1)` and `(c, r1, r2)`.
#[derive(Debug)]
pub struct QuadBatch<S> {
    sink: S,
    buffer: VertexBuffer,
    caching_depth: usize,
    flush_count: usize,
}

impl<S: QuadSink> QuadBatch<S> {
    /// Creates a batch that flushes into `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` holds an unusable capacity.
    pub fn new(sink: S, region: TextureRegion, config: BatchConfig) -> Result<Self> {
        config.validate()?;
        debug!(max_vertices = config.max_vertices, "created quad batch");
        Ok(Self {
            sink,
            buffer: VertexBuffer::new(&region, config.max_vertices),
            caching_depth: 0,
            flush_count: 0,
        })
    }

    /// Creates a batch with the default capacity and a solid white texel.
    ///
    /// # Errors
    ///
    /// Never fails with the default configuration; the `Result` mirrors
    /// [`QuadBatch::new`].
    pub fn with_defaults(sink: S) -> Result<Self> {
        Self::new(sink, TextureRegion::default(), BatchConfig::default())
    }

    /// Returns the sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the sink mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Flushes anything still staged and returns the sink.
    pub fn into_sink(mut self) -> S {
        self.flush();
        self.sink
    }

    /// Number of non-empty flushes handed to the sink so far.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    fn stage_quad(&mut self, corners: [&Corner; 4], slots: [usize; 4]) {
        self.ensure_space(4);
        for (corner, slot) in corners.into_iter().zip(slots) {
            self.buffer.push(corner, slot);
        }
    }

    fn commit(&mut self) {
        if self.caching_depth == 0 {
            self.flush();
        }
    }
}

impl<S: QuadSink> Batch for QuadBatch<S> {
    fn ensure_space(&mut self, vertices: usize) {
        if self.buffer.remaining() < vertices {
            self.flush();
        }
    }

    fn push_quad(&mut self, corners: &[Corner; 4]) {
        let [a, b, c, d] = corners;
        self.stage_quad([a, b, c, d], [0, 1, 2, 3]);
        self.commit();
    }

    fn push_triangle(&mut self, corners: &[Corner; 3]) {
        let [a, b, c] = corners;
        self.stage_quad([a, b, c, c], [0, 1, 2, 2]);
        self.commit();
    }

    fn push_fan<I>(&mut self, centre: Corner, rim: I)
    where
        I: IntoIterator<Item = Corner>,
    {
        let mut rim = rim.into_iter();
        let Some(mut first) = rim.next() else {
            return;
        };
        while let Some(second) = rim.next() {
            if let Some(third) = rim.next() {
                self.stage_quad([&centre, &first, &second, &third], [0, 1, 2, 3]);
                first = third;
            } else {
                self.stage_quad([&centre, &first, &second, &second], [0, 1, 2, 2]);
                break;
            }
        }
        self.commit();
    }

    fn start_caching(&mut self) {
        self.caching_depth += 1;
    }

    fn end_caching(&mut self) {
        self.caching_depth = self.caching_depth.saturating_sub(1);
        if self.caching_depth == 0 {
            self.flush();
        }
    }

    fn is_caching(&self) -> bool {
        self.caching_depth > 0
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        trace!(vertices = self.buffer.len(), "flushing quad batch");
        self.sink.flush(self.buffer.vertices());
        self.buffer.clear();
        self.flush_count += 1;
    }

    fn vertex_count(&self) -> usize {
        self.buffer.len()
    }

    fn max_vertices(&self) -> usize {
        self.buffer.max_vertices()
    }
}
