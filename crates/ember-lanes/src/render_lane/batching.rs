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

use super::render::Render;
use crate::batch_lane::{
    batch_declaration, BatchAllocation, BatchPrimitive, BatchVertex, Batcher, BatcherError,
};
use ember_core::renderer::api::{Material, Topology};
use ember_core::renderer::RenderBackend;
use std::rc::Rc;

impl<B: RenderBackend> Render<B> {
    /// Reserves batch room for `vertex_count` vertices of type `V` and
    /// `index_count` indices drawn with `material`.
    pub fn alloc_batch<V: BatchVertex>(
        &mut self,
        vertex_count: usize,
        index_count: usize,
        topology: Topology,
        material: &Rc<Material>,
    ) -> Result<BatchAllocation<'_, V>, BatcherError> {
        let attribs = self.create_vertex_attribs(&batch_declaration::<V>())?;
        self.batcher
            .alloc_batch(&attribs, material, topology, vertex_count, index_count)
    }

    /// Writes `primitive` into the batcher.
    pub fn add_batch<P: BatchPrimitive>(
        &mut self,
        material: &Rc<Material>,
        primitive: &P,
    ) -> Result<(), BatcherError> {
        let mut allocation = self.alloc_batch::<P::Vertex>(
            primitive.vertex_count(),
            primitive.index_count(),
            primitive.topology(),
            material,
        )?;
        primitive.write_vertices(&mut allocation.vertices);
        primitive.write_indices(&mut allocation.indices);
        Ok(())
    }

    /// Draws everything batched so far in the open pass.
    pub fn flush_batches(&mut self) -> Result<(), BatcherError> {
        let merge = self.settings().batching;
        let mut batcher = std::mem::replace(&mut self.batcher, Batcher::new(merge));
        let result = batcher.flush(self);
        self.batcher = batcher;
        result
    }
}
