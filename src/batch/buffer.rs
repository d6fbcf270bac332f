use super::{Corner, TextureRegion, Vertex};
use crate::math::Point2;

/// Fixed-capacity vertex storage shared by both batch kinds.
#[derive(Debug)]
pub(crate) struct VertexBuffer {
    vertices: Vec<Vertex>,
    max_vertices: usize,
    uvs: [Point2; 4],
}

impl VertexBuffer {
    pub(crate) fn new(region: &TextureRegion, max_vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(max_vertices),
            max_vertices,
            uvs: region.corners(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.vertices.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub(crate) fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    pub(crate) fn remaining(&self) -> usize {
        self.max_vertices - self.vertices.len()
    }

    pub(crate) fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub(crate) fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Appends `corner` with the texture coordinate of quad slot `slot`,
    /// returning its index in the buffer.
    pub(crate) fn push(&mut self, corner: &Corner, slot: usize) -> usize {
        debug_assert!(self.vertices.len() < self.max_vertices, "vertex buffer overflow");
        let index = self.vertices.len();
        self.vertices.push(Vertex {
            position: corner.position,
            uv: self.uvs[slot & 3],
            colour: corner.colour,
        });
        index
    }
}
