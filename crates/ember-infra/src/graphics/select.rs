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

//! Backend selection from [`RenderSettings`].

use super::headless::HeadlessBackend;
use ember_core::math::{LinearRgba, URect, UVec2};
use ember_core::renderer::api::{
    ApiProfile, Attachment, BlendingState, BufferId, BufferKind, BufferUsage, CbufferTemplate,
    CullingState, DepthState, DeviceCaps, IndexType, PixelDeclaration, RenderMode,
    RenderSettings, RenderTargetId, SamplerState, SamplerType, ScopeType, ShaderAttribute,
    ShaderId, ShaderSource, StencilState, TextureId, Topology, VertexDeclaration,
};
use ember_core::renderer::{RenderBackend, ResourceError};
use std::ffi::c_void;

#[cfg(feature = "opengl")]
use super::gl::GlBackend;

/// Resolves a GL entry point by name.
pub type GlLoader<'a> = &'a mut dyn FnMut(&'static str) -> *const c_void;

/// `true` when a device reporting `profile` serves the API family `mode`
/// asks for. An undetected profile matches every mode.
pub fn profile_matches(mode: RenderMode, profile: ApiProfile) -> bool {
    match (mode, profile) {
        (_, ApiProfile::Unknown) => true,
        (RenderMode::None, _) => false,
        (RenderMode::OpenGl, p) => matches!(p, ApiProfile::Gl2Compat | ApiProfile::Gl4Compat),
        (RenderMode::OpenGles, p) => matches!(p, ApiProfile::Gles2 | ApiProfile::Gles3),
        (RenderMode::OpenGles3, p) => p == ApiProfile::Gles3,
    }
}

/// The backend [`RenderSettings::mode`] picked at startup.
#[derive(Debug)]
pub enum AnyBackend {
    /// [`RenderMode::None`]: commands are recorded, nothing is drawn.
    Headless(HeadlessBackend),
    /// Every OpenGL mode.
    #[cfg(feature = "opengl")]
    Gl(GlBackend),
}

impl AnyBackend {
    /// Creates the backend `settings.mode` names.
    ///
    /// GL modes need `loader` and a context current on the calling thread.
    /// Their error checks follow `settings.debug`.
    pub fn from_settings(
        settings: &RenderSettings,
        loader: Option<GlLoader<'_>>,
    ) -> Result<Self, ResourceError> {
        match settings.mode {
            RenderMode::None => {
                log::info!("Render mode 'none', using the headless backend");
                Ok(Self::Headless(HeadlessBackend::default()))
            }
            mode => Self::open_gl(mode, settings.debug, loader),
        }
    }

    #[cfg(feature = "opengl")]
    fn open_gl(
        mode: RenderMode,
        debug: bool,
        loader: Option<GlLoader<'_>>,
    ) -> Result<Self, ResourceError> {
        let loader = loader.ok_or_else(|| {
            ResourceError::BackendError(format!("render mode '{mode}' needs a GL loader"))
        })?;
        let backend = GlBackend::new(loader)?.with_error_checks(debug);
        let profile = backend.caps().profile;
        if !profile_matches(mode, profile) {
            log::warn!("Render mode '{mode}' requested, the context reports {profile:?}");
        }
        Ok(Self::Gl(backend))
    }

    #[cfg(not(feature = "opengl"))]
    fn open_gl(
        mode: RenderMode,
        _debug: bool,
        _loader: Option<GlLoader<'_>>,
    ) -> Result<Self, ResourceError> {
        Err(ResourceError::BackendError(format!(
            "render mode '{mode}' needs the `opengl` feature"
        )))
    }

    /// The headless backend, when selected.
    pub fn headless(&self) -> Option<&HeadlessBackend> {
        match self {
            Self::Headless(backend) => Some(backend),
            #[cfg(feature = "opengl")]
            Self::Gl(_) => None,
        }
    }

    /// Mutable access to the headless backend, when selected.
    pub fn headless_mut(&mut self) -> Option<&mut HeadlessBackend> {
        match self {
            Self::Headless(backend) => Some(backend),
            #[cfg(feature = "opengl")]
            Self::Gl(_) => None,
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $backend:ident => $call:expr) => {
        match $self {
            AnyBackend::Headless($backend) => $call,
            #[cfg(feature = "opengl")]
            AnyBackend::Gl($backend) => $call,
        }
    };
}

impl RenderBackend for AnyBackend {
    fn name(&self) -> &'static str {
        dispatch!(self, b => b.name())
    }

    fn caps(&self) -> &DeviceCaps {
        dispatch!(self, b => b.caps())
    }

    fn create_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, ResourceError> {
        dispatch!(self, b => b.create_shader(source))
    }

    fn destroy_shader(&mut self, id: ShaderId) {
        dispatch!(self, b => b.destroy_shader(id))
    }

    fn create_texture(
        &mut self,
        size: UVec2,
        decl: PixelDeclaration,
        data: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError> {
        dispatch!(self, b => b.create_texture(size, decl, data))
    }

    fn update_texture(
        &mut self,
        id: TextureId,
        decl: PixelDeclaration,
        region: URect,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        dispatch!(self, b => b.update_texture(id, decl, region, data))
    }

    fn destroy_texture(&mut self, id: TextureId) {
        dispatch!(self, b => b.destroy_texture(id))
    }

    fn create_buffer(
        &mut self,
        kind: BufferKind,
        usage: BufferUsage,
        size: usize,
        data: Option<&[u8]>,
    ) -> Result<BufferId, ResourceError> {
        dispatch!(self, b => b.create_buffer(kind, usage, size, data))
    }

    fn update_buffer(
        &mut self,
        id: BufferId,
        kind: BufferKind,
        offset: usize,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        dispatch!(self, b => b.update_buffer(id, kind, offset, data))
    }

    fn destroy_buffer(&mut self, id: BufferId) {
        dispatch!(self, b => b.destroy_buffer(id))
    }

    fn create_render_target(
        &mut self,
        size: UVec2,
        color: Option<&Attachment>,
        depth: Option<&Attachment>,
    ) -> Result<RenderTargetId, ResourceError> {
        dispatch!(self, b => b.create_render_target(size, color, depth))
    }

    fn destroy_render_target(&mut self, id: RenderTargetId) {
        dispatch!(self, b => b.destroy_render_target(id))
    }

    fn bind_render_target(&mut self, target: Option<RenderTargetId>) {
        dispatch!(self, b => b.bind_render_target(target))
    }

    fn set_viewport(&mut self, viewport: URect) {
        dispatch!(self, b => b.set_viewport(viewport))
    }

    fn set_depth_range(&mut self, near: f32, far: f32) {
        dispatch!(self, b => b.set_depth_range(near, far))
    }

    fn clear(&mut self, color: Option<LinearRgba>, depth: Option<f32>, stencil: Option<u8>) {
        dispatch!(self, b => b.clear(color, depth, stencil))
    }

    fn discard(&mut self, color: bool, depth: bool, stencil: bool) {
        dispatch!(self, b => b.discard(color, depth, stencil))
    }

    fn set_depth_state(&mut self, state: &DepthState) {
        dispatch!(self, b => b.set_depth_state(state))
    }

    fn set_stencil_state(&mut self, state: &StencilState) {
        dispatch!(self, b => b.set_stencil_state(state))
    }

    fn set_culling_state(&mut self, state: &CullingState) {
        dispatch!(self, b => b.set_culling_state(state))
    }

    fn set_blending_state(&mut self, state: &BlendingState) {
        dispatch!(self, b => b.set_blending_state(state))
    }

    fn set_scissor(&mut self, rect: Option<URect>) {
        dispatch!(self, b => b.set_scissor(rect))
    }

    fn use_program(&mut self, shader: ShaderId) {
        dispatch!(self, b => b.use_program(shader))
    }

    fn bind_sampler(&mut self, unit: u8, sampler_type: SamplerType, state: &SamplerState) {
        dispatch!(self, b => b.bind_sampler(unit, sampler_type, state))
    }

    fn bind_constants(
        &mut self,
        shader: ShaderId,
        scope: ScopeType,
        template: &CbufferTemplate,
        data: &[u8],
        buffer: Option<BufferId>,
    ) {
        dispatch!(self, b => b.bind_constants(shader, scope, template, data, buffer))
    }

    fn bind_vertex_buffer(
        &mut self,
        slot: usize,
        buffer: BufferId,
        decl: &VertexDeclaration,
        offset: usize,
        attributes: &[ShaderAttribute],
    ) {
        dispatch!(self, b => b.bind_vertex_buffer(slot, buffer, decl, offset, attributes))
    }

    fn draw(&mut self, topology: Topology, first_vertex: u32, vertex_count: u32) {
        dispatch!(self, b => b.draw(topology, first_vertex, vertex_count))
    }

    fn draw_indexed(
        &mut self,
        topology: Topology,
        buffer: BufferId,
        index_type: IndexType,
        offset: usize,
        index_count: u32,
    ) {
        dispatch!(self, b => b.draw_indexed(topology, buffer, index_type, offset, index_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_none_selects_headless() {
        // --- 1. ARRANGE ---
        let settings = RenderSettings {
            mode: RenderMode::None,
            ..RenderSettings::default()
        };

        // --- 2. ACT ---
        let backend = AnyBackend::from_settings(&settings, None);

        // --- 3. ASSERT ---
        let backend = backend.expect("headless needs no context");
        assert_eq!(backend.name(), "none");
        assert!(
            backend.headless().is_some(),
            "mode none must not open a GL backend"
        );
    }

    #[test]
    fn test_gl_modes_without_loader_fail() {
        for mode in [RenderMode::OpenGl, RenderMode::OpenGles, RenderMode::OpenGles3] {
            // --- 1. ARRANGE ---
            let settings = RenderSettings {
                mode,
                ..RenderSettings::default()
            };

            // --- 2. ACT ---
            let result = AnyBackend::from_settings(&settings, None);

            // --- 3. ASSERT ---
            assert!(
                matches!(result, Err(ResourceError::BackendError(_))),
                "mode {mode} cannot start without a GL loader"
            );
        }
    }

    #[test]
    fn test_profile_matches_the_requested_family() {
        assert!(profile_matches(RenderMode::OpenGl, ApiProfile::Gl4Compat));
        assert!(profile_matches(RenderMode::OpenGles, ApiProfile::Gles3));
        assert!(profile_matches(RenderMode::OpenGles3, ApiProfile::Unknown));
        assert!(
            !profile_matches(RenderMode::OpenGles3, ApiProfile::Gles2),
            "an ES 2 context cannot serve an ES 3 request"
        );
        assert!(
            !profile_matches(RenderMode::OpenGl, ApiProfile::Gles2),
            "an ES context is not desktop GL"
        );
    }

    #[test]
    fn test_headless_backend_delegates() {
        // --- 1. ARRANGE ---
        let settings = RenderSettings {
            mode: RenderMode::None,
            ..RenderSettings::default()
        };
        let mut backend = AnyBackend::from_settings(&settings, None).expect("headless");

        // --- 2. ACT ---
        backend.draw(Topology::Triangles, 0, 3);

        // --- 3. ASSERT ---
        let headless = backend.headless_mut().expect("headless was selected");
        assert_eq!(headless.draw_count(), 1, "the draw reached the headless backend");
        assert_eq!(headless.take_calls().len(), 1);
    }
}
