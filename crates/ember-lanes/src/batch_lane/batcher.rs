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

//! Merges small draws that share a material into large indexed draws.
//!
//! Geometry is written into scratch regions: fixed-capacity byte arrays, one
//! family for vertices and one for 16-bit indices. A batch is a run of
//! vertices and indices inside the current pair of regions drawn with one
//! material. Indices are absolute within their region, so every batch of a
//! region shares one vertex buffer bound at offset 0.

use super::error::BatcherError;
use super::vertex::{vertex_stride, BatchVertex};
use super::writer::{BatchAllocation, IndexWriter, VertexWriter};
use crate::render_lane::Render;
use ember_core::math::align_up;
use ember_core::renderer::api::{
    BindVertexBuffersCommand, BufferUsage, CommandBlock, DrawIndexedCommand, IndexBuffer,
    IndexDeclaration, IndexType, Material, Shader, Topology, VertexAttribs, VertexBuffer,
};
use ember_core::renderer::{RenderBackend, RenderError};
use std::rc::Rc;

/// One more than the largest vertex count of a single allocation.
pub const MAX_BATCH_VERTICES: usize = 1 << 15;
/// Byte capacity of a vertex region.
pub const VERTEX_REGION_CAPACITY: usize = MAX_BATCH_VERTICES * 16;
/// Byte capacity of an index region.
pub const INDEX_REGION_CAPACITY: usize = MAX_BATCH_VERTICES * 3 * 2;

const INDEX_SIZE: usize = std::mem::size_of::<u16>();

#[derive(Debug)]
struct Region {
    data: Vec<u8>,
    capacity: usize,
}

impl Region {
    fn new(capacity: usize) -> Self {
        Self {
            data: Vec::new(),
            capacity,
        }
    }

    fn available(&self, align: usize) -> usize {
        self.capacity
            .saturating_sub(align_up(self.data.len(), align))
    }

    fn reserve(&mut self, align: usize, bytes: usize) -> usize {
        let start = align_up(self.data.len(), align);
        self.data.resize(start + bytes, 0);
        start
    }

    fn index_at(&self, offset: usize) -> u16 {
        u16::from_ne_bytes([self.data[offset], self.data[offset + 1]])
    }
}

/// A strip appended to a non-empty strip batch is joined by two degenerate
/// indices.
fn bridges(topology: Topology, batched: usize, appended: usize) -> bool {
    topology == Topology::TrianglesStrip && batched > 0 && appended > 0
}

/// A run of geometry drawn with one material.
#[derive(Debug, Clone)]
pub struct Batch {
    material: Rc<Material>,
    attribs: VertexAttribs,
    topology: Topology,
    vertex_region: usize,
    index_region: usize,
    vertex_offset: usize,
    vertex_count: usize,
    index_offset: usize,
    index_count: usize,
}

impl Batch {
    /// The material.
    pub fn material(&self) -> &Rc<Material> {
        &self.material
    }

    /// The vertex layout.
    pub fn attribs(&self) -> &VertexAttribs {
        &self.attribs
    }

    /// The topology.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of indices, strip bridges included.
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Byte offset of the first index in its region.
    pub fn index_offset(&self) -> usize {
        self.index_offset
    }
}

/// Collects batches for one frame. Owned by the render module.
#[derive(Debug)]
pub struct Batcher {
    enabled: bool,
    vertex_regions: Vec<Region>,
    index_regions: Vec<Region>,
    batches: Vec<Batch>,
}

impl Batcher {
    /// Creates an empty batcher. With `merge` off every allocation opens its
    /// own batch.
    pub fn new(merge: bool) -> Self {
        Self {
            enabled: merge,
            vertex_regions: Vec::new(),
            index_regions: Vec::new(),
            batches: Vec::new(),
        }
    }

    /// `true` when compatible allocations merge into one batch.
    pub fn merges(&self) -> bool {
        self.enabled
    }

    /// The batches recorded since the last flush.
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Number of batches.
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// `true` when nothing is batched.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Number of vertex regions in use.
    pub fn vertex_region_count(&self) -> usize {
        self.vertex_regions.len()
    }

    /// Drops every batch and region.
    pub fn clear(&mut self) {
        self.batches.clear();
        self.vertex_regions.clear();
        self.index_regions.clear();
    }

    /// Copies the vertices of `batch` out of its region.
    pub fn read_vertices<V: BatchVertex>(&self, batch: &Batch) -> Vec<V> {
        let stride = vertex_stride::<V>();
        let size = std::mem::size_of::<V>();
        let Some(region) = self.vertex_regions.get(batch.vertex_region) else {
            return Vec::new();
        };
        (0..batch.vertex_count)
            .map(|i| {
                let start = batch.vertex_offset + i * stride;
                bytemuck::pod_read_unaligned(&region.data[start..start + size])
            })
            .collect()
    }

    /// Copies the indices of `batch` out of its region. Values are absolute
    /// within the vertex region.
    pub fn read_indices(&self, batch: &Batch) -> Vec<u16> {
        let Some(region) = self.index_regions.get(batch.index_region) else {
            return Vec::new();
        };
        (0..batch.index_count)
            .map(|i| region.index_at(batch.index_offset + i * INDEX_SIZE))
            .collect()
    }

    fn merge_target(
        &self,
        attribs: &VertexAttribs,
        material: &Rc<Material>,
        topology: Topology,
        vertex_bytes: usize,
        index_bytes: usize,
        stride: usize,
    ) -> Option<usize> {
        if !self.enabled {
            return None;
        }
        let last = self.batches.last()?;
        let same_material = Rc::ptr_eq(&last.material, material) || last.material == *material;
        if !same_material || last.attribs != *attribs || last.topology != topology {
            return None;
        }
        let bridge = if bridges(topology, last.index_count, index_bytes) {
            2 * INDEX_SIZE
        } else {
            0
        };
        let vertices = &self.vertex_regions[last.vertex_region];
        let indices = &self.index_regions[last.index_region];
        (vertices.available(stride) >= vertex_bytes
            && indices.available(INDEX_SIZE) >= index_bytes + bridge)
            .then_some(self.batches.len() - 1)
    }

    fn region_for(regions: &mut Vec<Region>, capacity: usize, align: usize, bytes: usize) -> usize {
        match regions.last() {
            Some(region) if region.available(align) >= bytes => regions.len() - 1,
            _ => {
                regions.push(Region::new(capacity));
                regions.len() - 1
            }
        }
    }

    /// Reserves room for `vertex_count` vertices and `index_count` indices
    /// drawn with `material`, merging into the last batch when possible.
    ///
    /// Prefer [`Render::alloc_batch`], which interns `attribs` from the vertex
    /// type.
    pub fn alloc_batch<V: BatchVertex>(
        &mut self,
        attribs: &VertexAttribs,
        material: &Rc<Material>,
        topology: Topology,
        vertex_count: usize,
        index_count: usize,
    ) -> Result<BatchAllocation<'_, V>, BatcherError> {
        if vertex_count >= MAX_BATCH_VERTICES {
            return Err(BatcherError::TooManyVertices(vertex_count));
        }
        let stride = vertex_stride::<V>();
        let vertex_bytes = vertex_count * stride;
        if vertex_bytes > VERTEX_REGION_CAPACITY {
            return Err(BatcherError::VertexOverflow {
                bytes: vertex_bytes,
                capacity: VERTEX_REGION_CAPACITY,
            });
        }
        let index_bytes = index_count * INDEX_SIZE;
        if index_bytes > INDEX_REGION_CAPACITY {
            return Err(BatcherError::IndexOverflow {
                bytes: index_bytes,
                capacity: INDEX_REGION_CAPACITY,
            });
        }

        let (vertex_region, index_region, lead) = match self.merge_target(
            attribs,
            material,
            topology,
            vertex_bytes,
            index_bytes,
            stride,
        ) {
            Some(at) => {
                let batch = &mut self.batches[at];
                let lead = if bridges(topology, batch.index_count, index_count) {
                    2
                } else {
                    0
                };
                batch.vertex_count += vertex_count;
                batch.index_count += lead + index_count;
                (batch.vertex_region, batch.index_region, lead)
            }
            None => {
                let vertex_region = Self::region_for(
                    &mut self.vertex_regions,
                    VERTEX_REGION_CAPACITY,
                    stride,
                    vertex_bytes,
                );
                let index_region = Self::region_for(
                    &mut self.index_regions,
                    INDEX_REGION_CAPACITY,
                    INDEX_SIZE,
                    index_bytes,
                );
                self.batches.push(Batch {
                    material: Rc::clone(material),
                    attribs: attribs.clone(),
                    topology,
                    vertex_region,
                    index_region,
                    vertex_offset: align_up(self.vertex_regions[vertex_region].data.len(), stride),
                    vertex_count,
                    index_offset: align_up(self.index_regions[index_region].data.len(), INDEX_SIZE),
                    index_count,
                });
                log::trace!("Batch {} opened", self.batches.len());
                (vertex_region, index_region, 0)
            }
        };

        let vertex_start = self.vertex_regions[vertex_region].reserve(stride, vertex_bytes);
        let index_len = (lead + index_count) * INDEX_SIZE;
        let index_start = self.index_regions[index_region].reserve(INDEX_SIZE, index_len);
        let base = vertex_start / stride;
        debug_assert!(base + vertex_count <= u16::MAX as usize + 1);

        let indices = &mut self.index_regions[index_region];
        if lead == 2 {
            let previous = indices.index_at(index_start - INDEX_SIZE);
            indices.data[index_start..index_start + INDEX_SIZE]
                .copy_from_slice(&previous.to_ne_bytes());
        }
        let index_slice = &mut indices.data[index_start..index_start + index_len];
        let vertex_slice =
            &mut self.vertex_regions[vertex_region].data[vertex_start..vertex_start + vertex_bytes];

        Ok(BatchAllocation {
            vertices: VertexWriter::new(vertex_slice, vertex_count),
            indices: IndexWriter::new(index_slice, base as u16, lead, index_count),
        })
    }

    /// Builds the commands drawing every batch, creating one static vertex and
    /// index buffer per region.
    pub fn commands<B: RenderBackend>(
        &self,
        render: &mut Render<B>,
    ) -> Result<CommandBlock, BatcherError> {
        let vertex_buffers = self
            .vertex_regions
            .iter()
            .map(|region| {
                (!region.data.is_empty())
                    .then(|| render.create_vertex_buffer(&region.data, BufferUsage::Static))
                    .transpose()
            })
            .collect::<Result<Vec<Option<VertexBuffer>>, _>>()?;
        let index_buffers = self
            .index_regions
            .iter()
            .map(|region| {
                (!region.data.is_empty())
                    .then(|| {
                        render.create_index_buffer(
                            &region.data,
                            IndexDeclaration::new(IndexType::U16),
                            BufferUsage::Static,
                        )
                    })
                    .transpose()
            })
            .collect::<Result<Vec<Option<IndexBuffer>>, _>>()?;

        let mut block = CommandBlock::new();
        let mut bound: Option<(usize, &VertexAttribs, &Shader)> = None;
        for batch in &self.batches {
            let (Some(Some(vertices)), Some(Some(indices))) = (
                vertex_buffers.get(batch.vertex_region),
                index_buffers.get(batch.index_region),
            ) else {
                continue;
            };
            if batch.index_count == 0 {
                continue;
            }
            let key = (batch.vertex_region, &batch.attribs, batch.material.shader());
            if bound != Some(key) {
                block.add_command(BindVertexBuffersCommand::new().bind(
                    0,
                    vertices.clone(),
                    batch.attribs.clone(),
                    0,
                ));
                bound = Some(key);
            }
            block.add_command(Rc::clone(&batch.material));
            block.add_command(
                DrawIndexedCommand::new(indices.clone())
                    .topology(batch.topology)
                    .range(batch.index_offset, batch.index_count as u32),
            );
        }
        Ok(block)
    }

    /// Draws every batch in the open pass, then clears the batcher even when
    /// drawing fails. A no-op when nothing is batched.
    pub fn flush<B: RenderBackend>(&mut self, render: &mut Render<B>) -> Result<(), BatcherError> {
        if self.batches.is_empty() {
            return Ok(());
        }
        let result = if render.is_pass_open() {
            self.commands(render)
                .and_then(|block| render.execute_all(&block).map_err(BatcherError::from))
        } else {
            Err(BatcherError::Render(RenderError::NoActivePass))
        };
        log::debug!(
            "Flushed {} batches from {} vertex regions",
            self.batches.len(),
            self.vertex_regions.len()
        );
        self.clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch_lane::{batch_declaration, SpriteVertex};
    use ember_core::renderer::api::{ReleaseQueue, ShaderId, ShaderSource};

    fn material(id: usize, queue: &ReleaseQueue) -> Rc<Material> {
        Rc::new(Material::new(Shader::new(
            ShaderId(id),
            &ShaderSource::new(),
            queue,
        )))
    }

    fn quad(batcher: &mut Batcher, attribs: &VertexAttribs, material: &Rc<Material>) {
        let mut alloc = batcher
            .alloc_batch::<SpriteVertex>(attribs, material, Topology::Triangles, 4, 6)
            .expect("room for a quad");
        for _ in 0..4 {
            alloc.vertices.push(SpriteVertex::default());
        }
        for i in [0, 1, 2, 1, 2, 3] {
            alloc.indices.push(i);
        }
    }

    #[test]
    fn same_key_merges() {
        let queue = ReleaseQueue::new();
        let attribs = VertexAttribs::new(batch_declaration::<SpriteVertex>());
        let m = material(1, &queue);
        let mut batcher = Batcher::new(true);
        quad(&mut batcher, &attribs, &m);
        quad(&mut batcher, &attribs, &m);
        assert_eq!(batcher.batch_count(), 1);
        let batch = &batcher.batches()[0];
        assert_eq!(batch.vertex_count(), 8);
        assert_eq!(
            batcher.read_indices(batch),
            vec![0, 1, 2, 1, 2, 3, 4, 5, 6, 5, 6, 7]
        );
    }

    #[test]
    fn merging_off_opens_a_batch_per_allocation() {
        let queue = ReleaseQueue::new();
        let attribs = VertexAttribs::new(batch_declaration::<SpriteVertex>());
        let m = material(1, &queue);
        let mut batcher = Batcher::new(false);
        quad(&mut batcher, &attribs, &m);
        quad(&mut batcher, &attribs, &m);
        assert_eq!(batcher.batch_count(), 2);
        // both batches share the region, the second starts at vertex 4
        assert_eq!(batcher.vertex_region_count(), 1);
        assert_eq!(batcher.read_indices(&batcher.batches()[1])[0], 4);
        assert_eq!(batcher.batches()[1].index_offset(), 12);
    }

    #[test]
    fn different_materials_split() {
        let queue = ReleaseQueue::new();
        let attribs = VertexAttribs::new(batch_declaration::<SpriteVertex>());
        let mut batcher = Batcher::new(true);
        quad(&mut batcher, &attribs, &material(1, &queue));
        quad(&mut batcher, &attribs, &material(2, &queue));
        assert_eq!(batcher.batch_count(), 2);
    }

    #[test]
    fn strips_are_bridged() {
        let queue = ReleaseQueue::new();
        let attribs = VertexAttribs::new(batch_declaration::<SpriteVertex>());
        let m = material(1, &queue);
        let mut batcher = Batcher::new(true);
        for _ in 0..2 {
            let mut alloc = batcher
                .alloc_batch::<SpriteVertex>(&attribs, &m, Topology::TrianglesStrip, 4, 4)
                .expect("room for a strip");
            for i in 0..4 {
                alloc.vertices.push(SpriteVertex::default());
                alloc.indices.push(i);
            }
        }
        assert_eq!(batcher.batch_count(), 1);
        let batch = &batcher.batches()[0];
        assert_eq!(batch.index_count(), 10);
        assert_eq!(
            batcher.read_indices(batch),
            vec![0, 1, 2, 3, 3, 4, 4, 5, 6, 7]
        );
    }

    #[test]
    fn full_region_rolls_over() {
        let queue = ReleaseQueue::new();
        let attribs = VertexAttribs::new(batch_declaration::<SpriteVertex>());
        let m = material(1, &queue);
        let mut batcher = Batcher::new(true);
        for _ in 0..2 {
            batcher
                .alloc_batch::<SpriteVertex>(&attribs, &m, Topology::Triangles, 10_000, 0)
                .expect("fits in an empty region");
        }
        assert_eq!(batcher.batch_count(), 2);
        assert_eq!(batcher.vertex_region_count(), 2);
        batcher.clear();
        assert!(batcher.is_empty());
        assert_eq!(batcher.vertex_region_count(), 0);
    }

    #[test]
    fn oversized_allocations_fail() {
        let queue = ReleaseQueue::new();
        let attribs = VertexAttribs::new(batch_declaration::<SpriteVertex>());
        let m = material(1, &queue);
        let mut batcher = Batcher::new(true);
        assert!(matches!(
            batcher.alloc_batch::<SpriteVertex>(&attribs, &m, Topology::Triangles, 1 << 15, 0),
            Err(BatcherError::TooManyVertices(32768))
        ));
        assert!(matches!(
            batcher.alloc_batch::<SpriteVertex>(&attribs, &m, Topology::Triangles, 20_000, 0),
            Err(BatcherError::VertexOverflow { .. })
        ));
        assert!(matches!(
            batcher.alloc_batch::<SpriteVertex>(&attribs, &m, Topology::Triangles, 4, 200_000),
            Err(BatcherError::IndexOverflow { .. })
        ));
        assert!(batcher.is_empty());
    }

    #[test]
    fn available_saturates() {
        let mut region = Region::new(40);
        region.reserve(1, 30);
        assert_eq!(region.available(16), 8);
        region.reserve(1, 5);
        assert_eq!(region.available(16), 0);
        assert_eq!(region.available(1), 5);
    }
}
