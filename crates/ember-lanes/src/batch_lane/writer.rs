// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cursors over the vertex and index bytes reserved for one allocation.

use super::vertex::{vertex_stride, BatchVertex};
use std::marker::PhantomData;

/// Writes the vertices of one allocation.
///
/// Writing past the reserved count panics.
pub struct VertexWriter<'a, V: BatchVertex> {
    bytes: &'a mut [u8],
    count: usize,
    position: usize,
    _vertex: PhantomData<V>,
}

impl<'a, V: BatchVertex> VertexWriter<'a, V> {
    pub(crate) fn new(bytes: &'a mut [u8], count: usize) -> Self {
        debug_assert_eq!(bytes.len(), count * vertex_stride::<V>());
        Self {
            bytes,
            count,
            position: 0,
            _vertex: PhantomData,
        }
    }

    /// Writes `vertex` at the current position without moving.
    pub fn write(&mut self, vertex: V) {
        self.set(self.position, vertex);
    }

    /// Moves to the next vertex.
    pub fn advance(&mut self) {
        self.position += 1;
    }

    /// Writes `vertex` at `index`.
    pub fn set(&mut self, index: usize, vertex: V) {
        assert!(
            index < self.count,
            "vertex {index} written past the {} reserved",
            self.count
        );
        let start = index * vertex_stride::<V>();
        let value = bytemuck::bytes_of(&vertex);
        self.bytes[start..start + value.len()].copy_from_slice(value);
    }

    /// Writes `vertex` and advances.
    pub fn push(&mut self, vertex: V) {
        self.write(vertex);
        self.advance();
    }

    /// The current position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of reserved vertices.
    pub fn len(&self) -> usize {
        self.count
    }

    /// `true` when no vertex was reserved.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Writes the indices of one allocation.
///
/// Indices are relative to the allocation's first vertex; the writer adds the
/// batch base. When the allocation continues a triangle strip, the first
/// written index is also duplicated into the bridge that joins the strips.
pub struct IndexWriter<'a> {
    bytes: &'a mut [u8],
    base: u16,
    lead: usize,
    count: usize,
    position: usize,
}

impl<'a> IndexWriter<'a> {
    pub(crate) fn new(bytes: &'a mut [u8], base: u16, lead: usize, count: usize) -> Self {
        debug_assert_eq!(bytes.len(), (lead + count) * 2);
        Self {
            bytes,
            base,
            lead,
            count,
            position: 0,
        }
    }

    fn put(&mut self, slot: usize, value: u16) {
        self.bytes[slot * 2..slot * 2 + 2].copy_from_slice(&value.to_ne_bytes());
    }

    /// Writes `index` at the current position without moving.
    pub fn write(&mut self, index: u16) {
        self.set(self.position, index);
    }

    /// Moves to the next index.
    pub fn advance(&mut self) {
        self.position += 1;
    }

    /// Writes `index` at position `at`.
    pub fn set(&mut self, at: usize, index: u16) {
        assert!(
            at < self.count,
            "index {at} written past the {} reserved",
            self.count
        );
        let value = self.base + index;
        if at == 0 && self.lead == 2 {
            self.put(1, value);
        }
        self.put(self.lead + at, value);
    }

    /// Writes `index` and advances.
    pub fn push(&mut self, index: u16) {
        self.write(index);
        self.advance();
    }

    /// The current position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of reserved indices, bridge excluded.
    pub fn len(&self) -> usize {
        self.count
    }

    /// `true` when no index was reserved.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// The writers of one [`alloc_batch`](crate::render_lane::Render::alloc_batch)
/// call.
pub struct BatchAllocation<'a, V: BatchVertex> {
    /// Vertex cursor.
    pub vertices: VertexWriter<'a, V>,
    /// Index cursor.
    pub indices: IndexWriter<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch_lane::SpriteVertex;
    use ember_core::math::{Color32, Vec2};

    fn read_u16(bytes: &[u8]) -> Vec<u16> {
        bytes
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect()
    }

    #[test]
    fn indices_are_offset_by_base() {
        let mut bytes = vec![0u8; 6];
        let mut writer = IndexWriter::new(&mut bytes, 4, 0, 3);
        writer.push(0);
        writer.push(1);
        writer.push(2);
        assert_eq!(writer.position(), 3);
        assert_eq!(read_u16(&bytes), vec![4, 5, 6]);
    }

    #[test]
    fn first_index_fills_the_bridge() {
        let mut bytes = vec![0u8; 8];
        bytes[0..2].copy_from_slice(&3u16.to_ne_bytes());
        let mut writer = IndexWriter::new(&mut bytes, 4, 2, 2);
        writer.push(0);
        writer.push(1);
        assert_eq!(read_u16(&bytes), vec![3, 4, 4, 5]);
    }

    #[test]
    fn vertices_are_strided() {
        let mut bytes = vec![0u8; 64];
        let mut writer = VertexWriter::<SpriteVertex>::new(&mut bytes, 2);
        let a = SpriteVertex::new(Vec2::new(1.0, 2.0), Vec2::ZERO, Color32::WHITE);
        let b = SpriteVertex::new(Vec2::new(3.0, 4.0), Vec2::ONE, Color32::BLACK);
        writer.push(a);
        writer.set(1, b);
        let second: SpriteVertex = bytemuck::pod_read_unaligned(&bytes[32..56]);
        assert_eq!(second, b);
        let first: SpriteVertex = bytemuck::pod_read_unaligned(&bytes[0..24]);
        assert_eq!(first, a);
    }

    #[test]
    #[should_panic(expected = "written past")]
    fn vertex_overrun_panics() {
        let mut bytes = vec![0u8; 32];
        let mut writer = VertexWriter::<SpriteVertex>::new(&mut bytes, 1);
        writer.push(SpriteVertex::default());
        writer.push(SpriteVertex::default());
    }
}
