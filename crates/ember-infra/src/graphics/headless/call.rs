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

use ember_core::math::{LinearRgba, UVec2, URect};
use ember_core::renderer::api::{
    BlendingState, BufferId, BufferKind, BufferUsage, CullingState, DepthState, IndexType,
    PixelDeclaration, RenderTargetId, ScopeType, ShaderId, StencilState, TextureId, Topology,
};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// A program was linked.
    CreateShader(ShaderId),
    /// A program was destroyed.
    DestroyShader(ShaderId),
    /// A texture was created.
    CreateTexture {
        /// New id.
        id: TextureId,
        /// Size in pixels.
        size: UVec2,
        /// Pixel layout.
        decl: PixelDeclaration,
    },
    /// A texture region was replaced.
    UpdateTexture {
        /// Target texture.
        id: TextureId,
        /// Updated region.
        region: URect,
        /// Uploaded byte count.
        len: usize,
    },
    /// A texture was destroyed.
    DestroyTexture(TextureId),
    /// A buffer was created.
    CreateBuffer {
        /// New id.
        id: BufferId,
        /// Contents.
        kind: BufferKind,
        /// Update frequency.
        usage: BufferUsage,
        /// Size in bytes.
        size: usize,
    },
    /// A buffer range was replaced.
    UpdateBuffer {
        /// Target buffer.
        id: BufferId,
        /// Byte offset.
        offset: usize,
        /// Uploaded byte count.
        len: usize,
    },
    /// A buffer was destroyed.
    DestroyBuffer(BufferId),
    /// A framebuffer was created.
    CreateRenderTarget(RenderTargetId),
    /// A framebuffer was destroyed.
    DestroyRenderTarget(RenderTargetId),
    /// A framebuffer was bound.
    BindRenderTarget(Option<RenderTargetId>),
    /// The viewport changed.
    Viewport(URect),
    /// The depth range changed.
    DepthRange(f32, f32),
    /// Attachments were cleared.
    Clear {
        /// Color clear value.
        color: Option<LinearRgba>,
        /// Depth clear value.
        depth: Option<f32>,
        /// Stencil clear value.
        stencil: Option<u8>,
    },
    /// Attachments were invalidated.
    Discard {
        /// Color discarded.
        color: bool,
        /// Depth discarded.
        depth: bool,
        /// Stencil discarded.
        stencil: bool,
    },
    /// Depth state applied.
    DepthState(DepthState),
    /// Stencil state applied.
    StencilState(StencilState),
    /// Culling state applied.
    CullingState(CullingState),
    /// Blending state applied.
    BlendingState(BlendingState),
    /// Scissor changed.
    Scissor(Option<URect>),
    /// A program became current.
    UseProgram(ShaderId),
    /// A texture unit was bound.
    BindSampler {
        /// Texture unit.
        unit: u8,
        /// Bound texture.
        texture: Option<TextureId>,
    },
    /// A constant block was uploaded.
    BindConstants {
        /// Current program.
        shader: ShaderId,
        /// Block scope.
        scope: ScopeType,
        /// Block bytes.
        data: Vec<u8>,
    },
    /// A vertex buffer was bound.
    BindVertexBuffer {
        /// Slot.
        slot: usize,
        /// Buffer.
        buffer: BufferId,
        /// Byte offset.
        offset: usize,
        /// Number of shader attributes fed by the buffer.
        attributes: usize,
    },
    /// Non-indexed draw.
    Draw {
        /// Topology.
        topology: Topology,
        /// First vertex.
        first_vertex: u32,
        /// Vertex count.
        vertex_count: u32,
    },
    /// Indexed draw.
    DrawIndexed {
        /// Topology.
        topology: Topology,
        /// Index buffer.
        buffer: BufferId,
        /// Index type.
        index_type: IndexType,
        /// Byte offset.
        offset: usize,
        /// Index count.
        index_count: u32,
    },
}

impl BackendCall {
    /// `true` for draw calls.
    pub fn is_draw(&self) -> bool {
        matches!(self, BackendCall::Draw { .. } | BackendCall::DrawIndexed { .. })
    }
}
