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

use crate::math::{LinearRgba, UVec2, URect};
use crate::renderer::api::command::Topology;
use crate::renderer::api::core::DeviceCaps;
use crate::renderer::api::declaration::{IndexType, PixelDeclaration, VertexDeclaration};
use crate::renderer::api::resource::{
    Attachment, BufferId, BufferKind, BufferUsage, RenderTargetId, ShaderId, TextureId,
};
use crate::renderer::api::shader_source::{
    CbufferTemplate, SamplerType, ScopeType, ShaderAttribute, ShaderSource,
};
use crate::renderer::api::state::{
    BlendingState, CullingState, DepthState, SamplerState, StencilState,
};
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The device-facing half of the render module.
///
/// A backend owns the graphics context and maps ids to native objects. It does
/// no validation and no state diffing: the render module checks every request
/// against [`caps`](RenderBackend::caps) and only forwards state that changed.
/// All calls happen on the thread that owns the context.
pub trait RenderBackend: Debug {
    /// A short name for logs, e.g. `"opengl"`.
    fn name(&self) -> &'static str;

    /// Limits and features of the device.
    fn caps(&self) -> &DeviceCaps;

    /// Compiles and links a program.
    fn create_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, ResourceError>;

    /// Destroys a program.
    fn destroy_shader(&mut self, id: ShaderId);

    /// Creates a texture, filled with `data` when given.
    ///
    /// `data` holds exactly `decl.data_size(size)` bytes.
    fn create_texture(
        &mut self,
        size: UVec2,
        decl: PixelDeclaration,
        data: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError>;

    /// Replaces the texels of `region`.
    fn update_texture(
        &mut self,
        id: TextureId,
        decl: PixelDeclaration,
        region: URect,
        data: &[u8],
    ) -> Result<(), ResourceError>;

    /// Destroys a texture.
    fn destroy_texture(&mut self, id: TextureId);

    /// Creates a buffer of `size` bytes, filled with `data` when given.
    fn create_buffer(
        &mut self,
        kind: BufferKind,
        usage: BufferUsage,
        size: usize,
        data: Option<&[u8]>,
    ) -> Result<BufferId, ResourceError>;

    /// Writes `data` at byte `offset`.
    fn update_buffer(
        &mut self,
        id: BufferId,
        kind: BufferKind,
        offset: usize,
        data: &[u8],
    ) -> Result<(), ResourceError>;

    /// Destroys a buffer.
    fn destroy_buffer(&mut self, id: BufferId);

    /// Creates a framebuffer. Attachments without a texture get a renderbuffer.
    fn create_render_target(
        &mut self,
        size: UVec2,
        color: Option<&Attachment>,
        depth: Option<&Attachment>,
    ) -> Result<RenderTargetId, ResourceError>;

    /// Destroys a framebuffer and its renderbuffers.
    fn destroy_render_target(&mut self, id: RenderTargetId);

    /// Binds a framebuffer, `None` for the default one.
    fn bind_render_target(&mut self, target: Option<RenderTargetId>);

    /// Sets the viewport.
    fn set_viewport(&mut self, viewport: URect);

    /// Sets the depth range.
    fn set_depth_range(&mut self, near: f32, far: f32);

    /// Clears the given attachments of the bound framebuffer.
    ///
    /// Write masks must not get in the way: the backend enables color, depth
    /// and stencil writes for the duration of the clear.
    fn clear(&mut self, color: Option<LinearRgba>, depth: Option<f32>, stencil: Option<u8>);

    /// Hints that the contents of the given attachments are no longer needed.
    fn discard(&mut self, color: bool, depth: bool, stencil: bool);

    /// Applies a depth state.
    fn set_depth_state(&mut self, state: &DepthState);

    /// Applies a stencil state.
    fn set_stencil_state(&mut self, state: &StencilState);

    /// Applies a culling state.
    fn set_culling_state(&mut self, state: &CullingState);

    /// Applies a blending state.
    fn set_blending_state(&mut self, state: &BlendingState);

    /// Enables the scissor test on `rect`, or disables it.
    fn set_scissor(&mut self, rect: Option<URect>);

    /// Makes `shader` the current program.
    fn use_program(&mut self, shader: ShaderId);

    /// Binds the sampler's texture and parameters to a texture unit.
    fn bind_sampler(&mut self, unit: u8, sampler_type: SamplerType, state: &SamplerState);

    /// Uploads a constant block to the current program.
    ///
    /// `buffer` is the backing uniform buffer when the device has them, in
    /// which case `data` is already uploaded and only the binding changes.
    fn bind_constants(
        &mut self,
        shader: ShaderId,
        scope: ScopeType,
        template: &CbufferTemplate,
        data: &[u8],
        buffer: Option<BufferId>,
    );

    /// Points the shader attributes matching `decl` at a vertex buffer.
    fn bind_vertex_buffer(
        &mut self,
        slot: usize,
        buffer: BufferId,
        decl: &VertexDeclaration,
        offset: usize,
        attributes: &[ShaderAttribute],
    );

    /// Draws non-indexed primitives. The caller guarantees every bound vertex
    /// buffer holds the vertex range.
    fn draw(&mut self, topology: Topology, first_vertex: u32, vertex_count: u32);

    /// Draws indexed primitives. `offset` is in bytes, aligned to the index size,
    /// and the caller guarantees the range lies inside the buffer.
    fn draw_indexed(
        &mut self,
        topology: Topology,
        buffer: BufferId,
        index_type: IndexType,
        offset: usize,
        index_count: u32,
    );
}
