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

use super::call::BackendCall;
use ember_core::math::{LinearRgba, UVec2, URect};
use ember_core::renderer::api::{
    Attachment, BlendingState, BufferId, BufferKind, BufferUsage, CbufferTemplate, CullingState,
    DepthState, DeviceCaps, IndexType, PixelDeclaration, RenderTargetId, SamplerState,
    SamplerType, ScopeType, ShaderAttribute, ShaderId, ShaderSource, StencilState,
    TextureId, Topology, VertexDeclaration,
};
use ember_core::renderer::{RenderBackend, ResourceError, ShaderError};
use std::collections::HashMap;

/// A backend without a device.
///
/// Shaders "fail to compile" when a stage contains an `#error` directive, so
/// error paths can be exercised without a driver. Everything else succeeds.
#[derive(Debug)]
pub struct HeadlessBackend {
    caps: DeviceCaps,
    next_id: usize,
    calls: Vec<BackendCall>,
    buffers: HashMap<BufferId, Vec<u8>>,
    textures: HashMap<TextureId, (UVec2, PixelDeclaration)>,
    shaders: usize,
    render_targets: usize,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(DeviceCaps::permissive())
    }
}

impl HeadlessBackend {
    /// Creates a backend reporting `caps`.
    pub fn new(caps: DeviceCaps) -> Self {
        log::info!("Headless render backend initialized ({:?} profile)", caps.profile);
        Self {
            caps,
            next_id: 1,
            calls: Vec::new(),
            buffers: HashMap::new(),
            textures: HashMap::new(),
            shaders: 0,
            render_targets: 0,
        }
    }

    /// Every call since creation or the last [`take_calls`](Self::take_calls).
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Returns and clears the call log.
    pub fn take_calls(&mut self) -> Vec<BackendCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of draw calls in the log.
    pub fn draw_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_draw()).count()
    }

    /// Contents of a live buffer.
    pub fn buffer_data(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(&id).map(Vec::as_slice)
    }

    /// Live buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Live textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Live programs.
    pub fn shader_count(&self) -> usize {
        self.shaders
    }

    /// Live framebuffers.
    pub fn render_target_count(&self) -> usize {
        self.render_targets
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn check_stage(stage: &'static str, text: &str) -> Result<(), ShaderError> {
    match text.lines().find(|line| line.trim_start().starts_with("#error")) {
        Some(line) => Err(ShaderError::CompilationFailed {
            stage,
            log: line.trim().to_owned(),
        }),
        None => Ok(()),
    }
}

impl RenderBackend for HeadlessBackend {
    fn name(&self) -> &'static str {
        "none"
    }

    fn caps(&self) -> &DeviceCaps {
        &self.caps
    }

    fn create_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, ResourceError> {
        check_stage("vertex", source.vertex_text())?;
        check_stage("fragment", source.fragment_text())?;
        let id = ShaderId(self.next_id());
        self.shaders += 1;
        self.calls.push(BackendCall::CreateShader(id));
        Ok(id)
    }

    fn destroy_shader(&mut self, id: ShaderId) {
        self.shaders = self.shaders.saturating_sub(1);
        self.calls.push(BackendCall::DestroyShader(id));
    }

    fn create_texture(
        &mut self,
        size: UVec2,
        decl: PixelDeclaration,
        _data: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError> {
        let id = TextureId(self.next_id());
        self.textures.insert(id, (size, decl));
        self.calls.push(BackendCall::CreateTexture { id, size, decl });
        Ok(id)
    }

    fn update_texture(
        &mut self,
        id: TextureId,
        _decl: PixelDeclaration,
        region: URect,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        if !self.textures.contains_key(&id) {
            return Err(ResourceError::BackendError(format!("unknown texture {}", id.0)));
        }
        self.calls.push(BackendCall::UpdateTexture {
            id,
            region,
            len: data.len(),
        });
        Ok(())
    }

    fn destroy_texture(&mut self, id: TextureId) {
        self.textures.remove(&id);
        self.calls.push(BackendCall::DestroyTexture(id));
    }

    fn create_buffer(
        &mut self,
        kind: BufferKind,
        usage: BufferUsage,
        size: usize,
        data: Option<&[u8]>,
    ) -> Result<BufferId, ResourceError> {
        let id = BufferId(self.next_id());
        let mut bytes = vec![0; size];
        if let Some(data) = data {
            let len = data.len().min(size);
            bytes[..len].copy_from_slice(&data[..len]);
        }
        self.buffers.insert(id, bytes);
        self.calls.push(BackendCall::CreateBuffer {
            id,
            kind,
            usage,
            size,
        });
        Ok(id)
    }

    fn update_buffer(
        &mut self,
        id: BufferId,
        _kind: BufferKind,
        offset: usize,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let bytes = self
            .buffers
            .get_mut(&id)
            .ok_or_else(|| ResourceError::BackendError(format!("unknown buffer {}", id.0)))?;
        let end = offset
            .checked_add(data.len())
            .filter(|end| *end <= bytes.len())
            .ok_or(ResourceError::OutOfBounds)?;
        bytes[offset..end].copy_from_slice(data);
        self.calls.push(BackendCall::UpdateBuffer {
            id,
            offset,
            len: data.len(),
        });
        Ok(())
    }

    fn destroy_buffer(&mut self, id: BufferId) {
        self.buffers.remove(&id);
        self.calls.push(BackendCall::DestroyBuffer(id));
    }

    fn create_render_target(
        &mut self,
        _size: UVec2,
        _color: Option<&Attachment>,
        _depth: Option<&Attachment>,
    ) -> Result<RenderTargetId, ResourceError> {
        let id = RenderTargetId(self.next_id());
        self.render_targets += 1;
        self.calls.push(BackendCall::CreateRenderTarget(id));
        Ok(id)
    }

    fn destroy_render_target(&mut self, id: RenderTargetId) {
        self.render_targets = self.render_targets.saturating_sub(1);
        self.calls.push(BackendCall::DestroyRenderTarget(id));
    }

    fn bind_render_target(&mut self, target: Option<RenderTargetId>) {
        self.calls.push(BackendCall::BindRenderTarget(target));
    }

    fn set_viewport(&mut self, viewport: URect) {
        self.calls.push(BackendCall::Viewport(viewport));
    }

    fn set_depth_range(&mut self, near: f32, far: f32) {
        self.calls.push(BackendCall::DepthRange(near, far));
    }

    fn clear(&mut self, color: Option<LinearRgba>, depth: Option<f32>, stencil: Option<u8>) {
        self.calls.push(BackendCall::Clear {
            color,
            depth,
            stencil,
        });
    }

    fn discard(&mut self, color: bool, depth: bool, stencil: bool) {
        self.calls.push(BackendCall::Discard {
            color,
            depth,
            stencil,
        });
    }

    fn set_depth_state(&mut self, state: &DepthState) {
        self.calls.push(BackendCall::DepthState(*state));
    }

    fn set_stencil_state(&mut self, state: &StencilState) {
        self.calls.push(BackendCall::StencilState(*state));
    }

    fn set_culling_state(&mut self, state: &CullingState) {
        self.calls.push(BackendCall::CullingState(*state));
    }

    fn set_blending_state(&mut self, state: &BlendingState) {
        self.calls.push(BackendCall::BlendingState(*state));
    }

    fn set_scissor(&mut self, rect: Option<URect>) {
        self.calls.push(BackendCall::Scissor(rect));
    }

    fn use_program(&mut self, shader: ShaderId) {
        self.calls.push(BackendCall::UseProgram(shader));
    }

    fn bind_sampler(&mut self, unit: u8, _sampler_type: SamplerType, state: &SamplerState) {
        self.calls.push(BackendCall::BindSampler {
            unit,
            texture: state.sampled_texture().map(|t| t.id()),
        });
    }

    fn bind_constants(
        &mut self,
        shader: ShaderId,
        scope: ScopeType,
        _template: &CbufferTemplate,
        data: &[u8],
        _buffer: Option<BufferId>,
    ) {
        self.calls.push(BackendCall::BindConstants {
            shader,
            scope,
            data: data.to_vec(),
        });
    }

    fn bind_vertex_buffer(
        &mut self,
        slot: usize,
        buffer: BufferId,
        decl: &VertexDeclaration,
        offset: usize,
        attributes: &[ShaderAttribute],
    ) {
        let fed = attributes
            .iter()
            .filter(|a| decl.attributes().iter().any(|d| d.name_hash == a.name_hash))
            .count();
        self.calls.push(BackendCall::BindVertexBuffer {
            slot,
            buffer,
            offset,
            attributes: fed,
        });
    }

    fn draw(&mut self, topology: Topology, first_vertex: u32, vertex_count: u32) {
        self.calls.push(BackendCall::Draw {
            topology,
            first_vertex,
            vertex_count,
        });
    }

    fn draw_indexed(
        &mut self,
        topology: Topology,
        buffer: BufferId,
        index_type: IndexType,
        offset: usize,
        index_count: u32,
    ) {
        self.calls.push(BackendCall::DrawIndexed {
            topology,
            buffer,
            index_type,
            offset,
            index_count,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_directive_fails_compilation() {
        let mut backend = HeadlessBackend::default();
        let bad = ShaderSource::new()
            .vertex_shader("void main() {}")
            .fragment_shader("#error unsupported\nvoid main() {}");
        assert!(matches!(
            backend.create_shader(&bad),
            Err(ResourceError::Shader(ShaderError::CompilationFailed { stage: "fragment", .. }))
        ));
        let good = ShaderSource::new()
            .vertex_shader("void main() {}")
            .fragment_shader("void main() {}");
        assert!(backend.create_shader(&good).is_ok());
        assert_eq!(backend.shader_count(), 1);
    }

    #[test]
    fn buffers_keep_their_bytes() {
        let mut backend = HeadlessBackend::default();
        let id = backend
            .create_buffer(BufferKind::Vertex, BufferUsage::Dynamic, 8, Some(&[1, 2, 3, 4]))
            .expect("created");
        backend
            .update_buffer(id, BufferKind::Vertex, 4, &[9, 9])
            .expect("in bounds");
        assert_eq!(backend.buffer_data(id), Some(&[1, 2, 3, 4, 9, 9, 0, 0][..]));
        assert_eq!(
            backend.update_buffer(id, BufferKind::Vertex, 7, &[1, 1]),
            Err(ResourceError::OutOfBounds)
        );
        backend.destroy_buffer(id);
        assert_eq!(backend.buffer_count(), 0);
    }
}
