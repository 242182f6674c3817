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

//! The render module's copy of the pipeline state.
//!
//! Every setter compares against what the backend was last told and forwards
//! only differences. `None` in a slot means "unknown", which always forwards.

use ember_core::math::URect;
use ember_core::renderer::api::{
    BlendingState, BufferId, ConstBuffer, CullingState, DepthState, RenderTargetId, SamplerState,
    SamplerType, ScopeType, Shader, ShaderId, StencilState, VertexAttribs, VertexBufferBinding,
    MAX_VERTEX_BUFFERS,
};
use ember_core::renderer::RenderBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
struct BoundConstants {
    shader: ShaderId,
    buffer: ConstBuffer,
    version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BoundVertices {
    shader: ShaderId,
    buffer: BufferId,
    attribs: VertexAttribs,
    offset: usize,
}

#[derive(Debug, Default)]
pub(crate) struct StateShadow {
    diffing: bool,
    target: Option<Option<RenderTargetId>>,
    depth: Option<DepthState>,
    stencil: Option<StencilState>,
    culling: Option<CullingState>,
    blending: Option<BlendingState>,
    scissor: Option<Option<URect>>,
    shader: Option<Shader>,
    constants: [Option<BoundConstants>; ScopeType::ALL.len()],
    samplers: Vec<Option<SamplerState>>,
    vertices: [Option<BoundVertices>; MAX_VERTEX_BUFFERS],
    pending_vertices: [Option<VertexBufferBinding>; MAX_VERTEX_BUFFERS],
}

impl StateShadow {
    pub(crate) fn new(diffing: bool) -> Self {
        Self {
            diffing,
            ..Self::default()
        }
    }

    fn skip<T: PartialEq>(&self, current: &Option<T>, next: &T) -> bool {
        self.diffing && current.as_ref() == Some(next)
    }

    pub(crate) fn bind_render_target<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        target: Option<RenderTargetId>,
    ) {
        if self.skip(&self.target, &target) {
            return;
        }
        backend.bind_render_target(target);
        self.target = Some(target);
    }

    pub(crate) fn set_depth<B: RenderBackend>(&mut self, backend: &mut B, state: &DepthState) {
        if self.skip(&self.depth, state) {
            return;
        }
        backend.set_depth_state(state);
        self.depth = Some(*state);
    }

    pub(crate) fn set_stencil<B: RenderBackend>(&mut self, backend: &mut B, state: &StencilState) {
        if self.skip(&self.stencil, state) {
            return;
        }
        backend.set_stencil_state(state);
        self.stencil = Some(*state);
    }

    pub(crate) fn set_culling<B: RenderBackend>(&mut self, backend: &mut B, state: &CullingState) {
        if self.skip(&self.culling, state) {
            return;
        }
        backend.set_culling_state(state);
        self.culling = Some(*state);
    }

    pub(crate) fn set_blending<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        state: &BlendingState,
    ) {
        if self.skip(&self.blending, state) {
            return;
        }
        backend.set_blending_state(state);
        self.blending = Some(*state);
    }

    pub(crate) fn set_scissor<B: RenderBackend>(&mut self, backend: &mut B, rect: Option<URect>) {
        if self.skip(&self.scissor, &rect) {
            return;
        }
        backend.set_scissor(rect);
        self.scissor = Some(rect);
    }

    pub(crate) fn use_program<B: RenderBackend>(&mut self, backend: &mut B, shader: &Shader) {
        if self.skip(&self.shader, shader) {
            return;
        }
        backend.use_program(shader.id());
        self.shader = Some(shader.clone());
    }

    pub(crate) fn shader(&self) -> Option<&Shader> {
        self.shader.as_ref()
    }

    /// Uploads `buffer` to the current program unless this exact version is
    /// already there.
    pub(crate) fn bind_constants<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        shader: &Shader,
        buffer: &ConstBuffer,
    ) {
        let next = BoundConstants {
            shader: shader.id(),
            buffer: buffer.clone(),
            version: buffer.version(),
        };
        let slot = buffer.scope().index();
        if self.skip(&self.constants[slot], &next) {
            return;
        }
        backend.bind_constants(
            shader.id(),
            buffer.scope(),
            buffer.template(),
            &buffer.data(),
            buffer.id(),
        );
        self.constants[slot] = Some(next);
    }

    pub(crate) fn bind_sampler<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        unit: u8,
        sampler_type: SamplerType,
        state: &SamplerState,
    ) {
        let unit_index = unit as usize;
        if self.samplers.len() <= unit_index {
            self.samplers.resize(unit_index + 1, None);
        }
        if self.skip(&self.samplers[unit_index], state) {
            return;
        }
        backend.bind_sampler(unit, sampler_type, state);
        self.samplers[unit_index] = Some(state.clone());
    }

    /// Records vertex buffers for the next draw. Attribute locations depend on
    /// the program, so the actual binding waits for [`commit_vertices`](Self::commit_vertices).
    pub(crate) fn set_vertex_buffers(
        &mut self,
        bindings: &[Option<VertexBufferBinding>; MAX_VERTEX_BUFFERS],
    ) {
        for (pending, binding) in self.pending_vertices.iter_mut().zip(bindings) {
            if binding.is_some() {
                pending.clone_from(binding);
            }
        }
    }

    /// The bindings the next draw will read, with their slot.
    pub(crate) fn pending_vertices(&self) -> impl Iterator<Item = (usize, &VertexBufferBinding)> {
        self.pending_vertices
            .iter()
            .enumerate()
            .filter_map(|(slot, binding)| binding.as_ref().map(|binding| (slot, binding)))
    }

    pub(crate) fn commit_vertices<B: RenderBackend>(&mut self, backend: &mut B) {
        let Some(shader) = self.shader.clone() else {
            return;
        };
        for slot in 0..MAX_VERTEX_BUFFERS {
            let Some(binding) = &self.pending_vertices[slot] else {
                continue;
            };
            let next = BoundVertices {
                shader: shader.id(),
                buffer: binding.buffer.id(),
                attribs: binding.attribs.clone(),
                offset: binding.offset,
            };
            if self.skip(&self.vertices[slot], &next) {
                continue;
            }
            backend.bind_vertex_buffer(
                slot,
                next.buffer,
                binding.attribs.decl(),
                next.offset,
                shader.attributes(),
            );
            self.vertices[slot] = Some(next);
        }
    }

    /// Forgets every binding that holds a resource handle. Fixed-function state
    /// is kept, the backend still has it.
    pub(crate) fn invalidate_bindings(&mut self) {
        self.shader = None;
        self.constants = Default::default();
        self.samplers.clear();
        self.vertices = Default::default();
        self.pending_vertices = Default::default();
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> Option<&DepthState> {
        self.depth.as_ref()
    }
}
