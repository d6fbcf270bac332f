use tracing::{debug, trace};

use super::buffer::VertexBuffer;
use super::{Batch, BatchConfig, Corner, IndexedSink, TextureRegion};
use crate::error::Result;

/// Quad corner order expanded into two triangles.
const QUAD_INDICES: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// Batch for sinks that take an explicit triangle index list.
///
/// Fans share their centre vertex instead of repeating it per triangle. The
/// index buffer holds 1.5 indices per vertex slot, which is exactly what a
/// buffer filled with quads needs, so vertex room is always the binding
/// limit for quads and triangles alike.
#[derive(Debug)]
pub struct IndexedBatch<S> {
    sink: S,
    buffer: VertexBuffer,
    indices: Vec<u16>,
    max_indices: usize,
    caching_depth: usize,
    flush_count: usize,
}

impl<S: IndexedSink> IndexedBatch<S> {
    /// Creates a batch that flushes into `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` holds an unusable capacity.
    pub fn new(sink: S, region: TextureRegion, config: BatchConfig) -> Result<Self> {
        config.validate()?;
        let max_indices = index_capacity(config.max_vertices);
        debug!(
            max_vertices = config.max_vertices,
            max_indices, "created indexed batch"
        );
        Ok(Self {
            sink,
            buffer: VertexBuffer::new(&region, config.max_vertices),
            indices: Vec::with_capacity(max_indices),
            max_indices,
            caching_depth: 0,
            flush_count: 0,
        })
    }

    /// Creates a batch with the default capacity and a solid white texel.
    ///
    /// # Errors
    ///
    /// Never fails with the default configuration; the `Result` mirrors
    /// [`IndexedBatch::new`].
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

    /// Number of indices currently staged.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Index capacity derived from the vertex capacity.
    #[must_use]
    pub fn max_indices(&self) -> usize {
        self.max_indices
    }

    /// Number of non-empty flushes handed to the sink so far.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    fn has_room(&self, vertices: usize, indices: usize) -> bool {
        self.buffer.remaining() >= vertices && self.max_indices - self.indices.len() >= indices
    }

    fn reserve(&mut self, vertices: usize, indices: usize) {
        if !self.has_room(vertices, indices) {
            self.flush();
        }
    }

    // Capacity is capped at u16::MAX + 1 vertices, so every index fits.
    #[allow(clippy::cast_possible_truncation)]
    fn push_vertex(&mut self, corner: &Corner, slot: usize) -> u16 {
        self.buffer.push(corner, slot) as u16
    }

    fn commit(&mut self) {
        if self.caching_depth == 0 {
            self.flush();
        }
    }
}

impl<S: IndexedSink> Batch for IndexedBatch<S> {
    fn ensure_space(&mut self, vertices: usize) {
        self.reserve(vertices, index_capacity(vertices));
    }

    fn push_quad(&mut self, corners: &[Corner; 4]) {
        self.reserve(4, QUAD_INDICES.len());
        let mut slots = [0u16; 4];
        for (i, corner) in corners.iter().enumerate() {
            slots[i] = self.push_vertex(corner, i);
        }
        self.indices.extend(QUAD_INDICES.iter().map(|&i| slots[i]));
        self.commit();
    }

    fn push_triangle(&mut self, corners: &[Corner; 3]) {
        self.reserve(3, 3);
        for (i, corner) in corners.iter().enumerate() {
            let index = self.push_vertex(corner, i);
            self.indices.push(index);
        }
        self.commit();
    }

    fn push_fan<I>(&mut self, centre: Corner, rim: I)
    where
        I: IntoIterator<Item = Corner>,
    {
        let mut rim = rim.into_iter();
        let Some(mut previous) = rim.next() else {
            return;
        };
        // (centre, previous) indices valid in the current buffer contents.
        let mut anchor: Option<(u16, u16)> = None;
        for next in rim {
            let (hub, last) = match anchor {
                Some(pair) if self.has_room(1, 3) => pair,
                _ => {
                    // First triangle, or the buffer was flushed underneath
                    // the fan: restate the shared vertices.
                    self.reserve(3, 3);
                    (self.push_vertex(&centre, 0), self.push_vertex(&previous, 1))
                }
            };
            let current = self.push_vertex(&next, 2);
            self.indices.extend_from_slice(&[hub, last, current]);
            anchor = Some((hub, current));
            previous = next;
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
        trace!(
            vertices = self.buffer.len(),
            indices = self.indices.len(),
            "flushing indexed batch"
        );
        self.sink.flush(self.buffer.vertices(), &self.indices);
        self.buffer.clear();
        self.indices.clear();
        self.flush_count += 1;
    }

    fn vertex_count(&self) -> usize {
        self.buffer.len()
    }

    fn max_vertices(&self) -> usize {
        self.buffer.max_vertices()
    }
}

/// Indices needed in the worst case for `vertices` slots: all quads, six
/// indices per four vertices.
fn index_capacity(vertices: usize) -> usize {
    (vertices * 3).div_ceil(2)
}
