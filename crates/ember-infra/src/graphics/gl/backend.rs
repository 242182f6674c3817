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

use super::caps::{gl_limit, gl_string, query_caps};
use super::conversions::{framebuffer_status_name, pixel_format, IntoGl, PixelFormat};
use super::state::GlState;
use ember_core::math::{LinearRgba, URect, UVec2};
use ember_core::renderer::api::{
    ApiProfile, Attachment, BlendingState, BufferId, BufferKind, BufferUsage, CbufferTemplate,
    ColorMask, CullingState, DepthState, DeviceCaps, IndexType, PixelDeclaration, RenderTargetId,
    SamplerState, SamplerType, ScopeType, ShaderAttribute, ShaderId, ShaderSource, StencilState,
    TextureId, Topology, ValueType, VertexDeclaration,
};
use ember_core::renderer::{RenderBackend, ResourceError, ShaderError};
use ember_core::StrHash;
use gl::types::{GLboolean, GLchar, GLenum, GLint, GLintptr, GLsizei, GLsizeiptr, GLuint};
use std::collections::HashMap;
use std::ffi::{c_void, CString};
use std::ptr;

const BLOCK_NAMES: [&str; 3] = ["cb_pass", "cb_material", "cb_draw"];

#[derive(Debug)]
struct GlProgram {
    handle: GLuint,
    /// Uniform locations of every constant block member.
    uniforms: HashMap<StrHash, GLint>,
    /// Uniform block index per scope, when the program declares the block.
    blocks: [Option<GLuint>; 3],
}

#[derive(Debug)]
struct GlTexture {
    handle: GLuint,
    size: UVec2,
}

#[derive(Debug)]
struct GlBuffer {
    handle: GLuint,
    target: GLenum,
}

#[derive(Debug)]
struct GlFramebuffer {
    handle: GLuint,
    renderbuffers: Vec<GLuint>,
}

/// A [`RenderBackend`] on top of the `gl` crate.
#[derive(Debug)]
pub struct GlBackend {
    caps: DeviceCaps,
    state: GlState,
    next_id: usize,
    default_framebuffer: GLuint,
    vertex_array: Option<GLuint>,
    programs: HashMap<ShaderId, GlProgram>,
    textures: HashMap<TextureId, GlTexture>,
    buffers: HashMap<BufferId, GlBuffer>,
    framebuffers: HashMap<RenderTargetId, GlFramebuffer>,
    // write masks of the last applied states, restored after clears
    color_mask: ColorMask,
    depth_write: bool,
    stencil_write: u8,
    error_checks: bool,
}

fn gl_bool(value: bool) -> GLboolean {
    if value {
        gl::TRUE
    } else {
        gl::FALSE
    }
}

fn c_string(text: &str) -> Result<CString, String> {
    CString::new(text).map_err(|_| format!("'{}' contains a nul byte", text.escape_debug()))
}

/// Logs pending GL errors.
fn drain_errors(context: &str) {
    loop {
        // SAFETY: only called by backend methods, with the context current.
        let error = unsafe { gl::GetError() };
        if error == gl::NO_ERROR {
            break;
        }
        log::error!("OpenGL error 0x{error:04X} in {context}");
    }
}

unsafe fn shader_log(handle: GLuint) -> String {
    let mut len: GLint = 0;
    gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut len);
    let mut log = vec![0u8; len.max(1) as usize];
    let mut written: GLsizei = 0;
    gl::GetShaderInfoLog(handle, len, &mut written, log.as_mut_ptr().cast::<GLchar>());
    log.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&log).trim_end().to_owned()
}

unsafe fn program_log(handle: GLuint) -> String {
    let mut len: GLint = 0;
    gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut len);
    let mut log = vec![0u8; len.max(1) as usize];
    let mut written: GLsizei = 0;
    gl::GetProgramInfoLog(handle, len, &mut written, log.as_mut_ptr().cast::<GLchar>());
    log.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&log).trim_end().to_owned()
}

unsafe fn compile_stage(
    ty: GLenum,
    stage: &'static str,
    text: &str,
) -> Result<GLuint, ShaderError> {
    let failed = |log: String| ShaderError::CompilationFailed { stage, log };
    let source = c_string(text).map_err(failed)?;
    let handle = gl::CreateShader(ty);
    if handle == 0 {
        return Err(failed("unable to create shader stage".to_owned()));
    }
    gl::ShaderSource(handle, 1, &source.as_ptr(), ptr::null());
    gl::CompileShader(handle);
    let mut compiled: GLint = gl::FALSE.into();
    gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut compiled);
    if compiled == GLint::from(gl::FALSE) {
        let log = shader_log(handle);
        gl::DeleteShader(handle);
        return Err(failed(log));
    }
    Ok(handle)
}

unsafe fn uniform_location(program: GLuint, name: &str) -> Option<GLint> {
    let name = c_string(name).ok()?;
    let location = gl::GetUniformLocation(program, name.as_ptr());
    (location >= 0).then_some(location)
}

/// Uploads one uniform from its constant buffer bytes.
unsafe fn upload_uniform(location: GLint, value_type: ValueType, bytes: &[u8]) {
    if value_type == ValueType::I32 {
        gl::Uniform1i(location, bytemuck::pod_read_unaligned::<i32>(&bytes[..4]));
        return;
    }
    let floats: Vec<f32> = bytes
        .chunks_exact(4)
        .map(bytemuck::pod_read_unaligned)
        .collect();
    // matrix columns are padded to four floats in constant buffer layout
    let columns = |n: usize| -> Vec<f32> {
        floats
            .chunks(4)
            .take(n)
            .flat_map(|column| column[..n].iter().copied())
            .collect()
    };
    match value_type {
        ValueType::F32 => gl::Uniform1fv(location, 1, floats.as_ptr()),
        ValueType::V2f => gl::Uniform2fv(location, 1, floats.as_ptr()),
        ValueType::V3f => gl::Uniform3fv(location, 1, floats.as_ptr()),
        ValueType::V4f => gl::Uniform4fv(location, 1, floats.as_ptr()),
        ValueType::M2f => gl::UniformMatrix2fv(location, 1, gl::FALSE, columns(2).as_ptr()),
        ValueType::M3f => gl::UniformMatrix3fv(location, 1, gl::FALSE, columns(3).as_ptr()),
        ValueType::M4f => gl::UniformMatrix4fv(location, 1, gl::FALSE, floats.as_ptr()),
        ValueType::I32 => {}
    }
}

impl GlBackend {
    /// Loads the GL entry points with `loader` and queries the device.
    ///
    /// The context must be current on the calling thread.
    pub fn new<F>(loader: F) -> Result<Self, ResourceError>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        if !gl::GetString::is_loaded() || !gl::DrawElements::is_loaded() {
            return Err(ResourceError::BackendError(
                "OpenGL entry points could not be loaded".to_owned(),
            ));
        }

        // SAFETY: the caller made a context current and the entry points are loaded.
        let backend = unsafe {
            let caps = query_caps();
            log::info!(
                "OpenGL backend initialized: {} ({}), version {}, GLSL {}",
                gl_string(gl::RENDERER),
                gl_string(gl::VENDOR),
                gl_string(gl::VERSION),
                gl_string(gl::SHADING_LANGUAGE_VERSION),
            );
            log::debug!("Device caps: {caps:?}");

            let default_framebuffer = gl_limit(gl::FRAMEBUFFER_BINDING);
            let vertex_array = gl::GenVertexArrays::is_loaded().then(|| {
                let mut vao = 0;
                gl::GenVertexArrays(1, &mut vao);
                gl::BindVertexArray(vao);
                vao
            });
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            // culling is always counter-clockwise
            gl::FrontFace(gl::CCW);

            Self {
                state: GlState::new(
                    caps.max_combined_texture_image_units as usize,
                    default_framebuffer,
                ),
                caps,
                next_id: 1,
                default_framebuffer,
                vertex_array,
                programs: HashMap::new(),
                textures: HashMap::new(),
                buffers: HashMap::new(),
                framebuffers: HashMap::new(),
                color_mask: ColorMask::RGBA,
                depth_write: true,
                stencil_write: 0xFF,
                error_checks: cfg!(debug_assertions),
            }
        };
        backend.check_errors("initialization");
        Ok(backend)
    }

    /// Enables `glGetError` checks after resource updates and draws.
    ///
    /// Defaults to on in debug builds. Mirrors `RenderSettings::debug`.
    pub fn with_error_checks(mut self, enabled: bool) -> Self {
        self.error_checks = enabled;
        self
    }

    fn check_errors(&self, context: &str) {
        if self.error_checks {
            drain_errors(context);
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn is_legacy(&self) -> bool {
        matches!(self.caps.profile, ApiProfile::Gles2 | ApiProfile::Gl2Compat)
    }

    unsafe fn activate_unit(&mut self, unit: GLuint) {
        self.state
            .active_unit
            .set_if_invalid(unit, || gl::ActiveTexture(gl::TEXTURE0 + unit));
    }

    /// Binds `texture` on unit 0 for filling and returns what was bound there.
    unsafe fn bind_for_upload(&mut self, texture: GLuint) -> (GLenum, GLuint) {
        self.activate_unit(0);
        let previous = self.state.units[0];
        gl::BindTexture(gl::TEXTURE_2D, texture);
        previous
    }

    unsafe fn restore_unit_zero(&mut self, (target, texture): (GLenum, GLuint)) {
        if target != gl::TEXTURE_2D {
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }
        gl::BindTexture(target, texture);
        self.state.units[0] = (target, texture);
    }

    fn forget_program(&mut self) {
        // creation left its program bound
        self.state.program.invalidate();
    }

    unsafe fn attach(
        &mut self,
        attachment: &Attachment,
        size: UVec2,
        point: GLenum,
        renderbuffers: &mut Vec<GLuint>,
    ) -> Result<(), ResourceError> {
        let points: &[GLenum] =
            if attachment.decl.is_stencil() && point == gl::DEPTH_ATTACHMENT {
                if self.caps.profile == ApiProfile::Gles2 {
                    &[gl::DEPTH_ATTACHMENT, gl::STENCIL_ATTACHMENT]
                } else {
                    &[gl::DEPTH_STENCIL_ATTACHMENT]
                }
            } else {
                std::slice::from_ref(&point)
            };

        match &attachment.texture {
            Some(texture) => {
                let handle = self
                    .textures
                    .get(&texture.id())
                    .map(|t| t.handle)
                    .ok_or_else(|| {
                        ResourceError::BackendError(format!("unknown texture {:?}", texture.id()))
                    })?;
                for &p in points {
                    gl::FramebufferTexture2D(gl::FRAMEBUFFER, p, gl::TEXTURE_2D, handle, 0);
                }
            }
            None => {
                let format = pixel_format(attachment.decl, self.caps.profile);
                let mut renderbuffer = 0;
                gl::GenRenderbuffers(1, &mut renderbuffer);
                gl::BindRenderbuffer(gl::RENDERBUFFER, renderbuffer);
                gl::RenderbufferStorage(
                    gl::RENDERBUFFER,
                    format.internal,
                    size.x as GLsizei,
                    size.y as GLsizei,
                );
                for &p in points {
                    gl::FramebufferRenderbuffer(gl::FRAMEBUFFER, p, gl::RENDERBUFFER, renderbuffer);
                }
                renderbuffers.push(renderbuffer);
            }
        }
        Ok(())
    }

    unsafe fn apply_swizzle(format: &PixelFormat) {
        if let Some(swizzle) = format.swizzle {
            let params = [
                gl::TEXTURE_SWIZZLE_R,
                gl::TEXTURE_SWIZZLE_G,
                gl::TEXTURE_SWIZZLE_B,
                gl::TEXTURE_SWIZZLE_A,
            ];
            for (param, channel) in params.into_iter().zip(swizzle) {
                gl::TexParameteri(gl::TEXTURE_2D, param, channel as GLint);
            }
        }
    }
}

impl RenderBackend for GlBackend {
    fn name(&self) -> &'static str {
        "opengl"
    }

    fn caps(&self) -> &DeviceCaps {
        &self.caps
    }

    fn create_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, ResourceError> {
        // SAFETY: the context is current; every handle created here is owned below.
        let program = unsafe {
            let vertex = compile_stage(gl::VERTEX_SHADER, "vertex", source.vertex_text())?;
            let fragment =
                match compile_stage(gl::FRAGMENT_SHADER, "fragment", source.fragment_text()) {
                    Ok(fragment) => fragment,
                    Err(e) => {
                        gl::DeleteShader(vertex);
                        return Err(e.into());
                    }
                };

            let handle = gl::CreateProgram();
            gl::AttachShader(handle, vertex);
            gl::AttachShader(handle, fragment);
            for attribute in source.attributes() {
                if let Ok(name) = c_string(&attribute.name) {
                    gl::BindAttribLocation(handle, GLuint::from(attribute.index), name.as_ptr());
                }
            }
            gl::LinkProgram(handle);
            gl::DetachShader(handle, vertex);
            gl::DetachShader(handle, fragment);
            gl::DeleteShader(vertex);
            gl::DeleteShader(fragment);

            let mut linked: GLint = gl::FALSE.into();
            gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);
            if linked == GLint::from(gl::FALSE) {
                let log = program_log(handle);
                gl::DeleteProgram(handle);
                return Err(ShaderError::LinkFailed { log }.into());
            }

            gl::UseProgram(handle);
            for sampler in source.samplers() {
                match uniform_location(handle, &sampler.name) {
                    Some(location) => gl::Uniform1i(location, GLint::from(sampler.unit)),
                    None => log::warn!("Sampler '{}' is not used by the program", sampler.name),
                }
            }

            let mut uniforms = HashMap::new();
            let mut blocks = [None; 3];
            for scope in ScopeType::ALL {
                let Some(template) = source.block(scope) else {
                    continue;
                };
                if self.caps.uniform_buffer_supported {
                    let index = c_string(BLOCK_NAMES[scope.index()])
                        .map(|name| gl::GetUniformBlockIndex(handle, name.as_ptr()))
                        .unwrap_or(gl::INVALID_INDEX);
                    if index != gl::INVALID_INDEX {
                        gl::UniformBlockBinding(handle, index, scope.index() as GLuint);
                        blocks[scope.index()] = Some(index);
                        continue;
                    }
                }
                for uniform in template.uniforms() {
                    if let Some(location) = uniform_location(handle, &uniform.name) {
                        uniforms.insert(uniform.name_hash, location);
                    }
                }
            }
            self.forget_program();

            GlProgram {
                handle,
                uniforms,
                blocks,
            }
        };
        self.check_errors("create_shader");

        let id = ShaderId(self.next_id());
        self.programs.insert(id, program);
        Ok(id)
    }

    fn destroy_shader(&mut self, id: ShaderId) {
        if let Some(program) = self.programs.remove(&id) {
            if self.state.program.holds(&program.handle) {
                self.state.program.invalidate();
            }
            // SAFETY: the handle came from CreateProgram and is deleted once.
            unsafe { gl::DeleteProgram(program.handle) };
        }
    }

    fn create_texture(
        &mut self,
        size: UVec2,
        decl: PixelDeclaration,
        data: Option<&[u8]>,
    ) -> Result<TextureId, ResourceError> {
        let format = pixel_format(decl, self.caps.profile);
        let zeroed;
        // SAFETY: `data` holds `decl.data_size(size)` bytes, checked by the render module.
        let handle = unsafe {
            let mut handle = 0;
            gl::GenTextures(1, &mut handle);
            let previous = self.bind_for_upload(handle);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as GLint);
            if decl.is_compressed() {
                // compressed storage can only be allocated from data
                let bytes = match data {
                    Some(bytes) => bytes,
                    None => {
                        zeroed = vec![0u8; decl.data_size(size)];
                        &zeroed
                    }
                };
                gl::CompressedTexImage2D(
                    gl::TEXTURE_2D,
                    0,
                    format.internal,
                    size.x as GLsizei,
                    size.y as GLsizei,
                    0,
                    bytes.len() as GLsizei,
                    bytes.as_ptr().cast(),
                );
            } else {
                gl::TexImage2D(
                    gl::TEXTURE_2D,
                    0,
                    format.internal as GLint,
                    size.x as GLsizei,
                    size.y as GLsizei,
                    0,
                    format.format,
                    format.ty,
                    data.map_or(ptr::null(), |bytes| bytes.as_ptr().cast()),
                );
            }
            Self::apply_swizzle(&format);
            self.restore_unit_zero(previous);
            handle
        };
        self.check_errors("create_texture");

        let id = TextureId(self.next_id());
        self.textures.insert(id, GlTexture { handle, size });
        Ok(id)
    }

    fn update_texture(
        &mut self,
        id: TextureId,
        decl: PixelDeclaration,
        region: URect,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let handle = self
            .textures
            .get(&id)
            .map(|t| t.handle)
            .ok_or_else(|| ResourceError::BackendError(format!("unknown texture {id:?}")))?;
        let format = pixel_format(decl, self.caps.profile);
        // SAFETY: the region lies inside the texture and `data` covers it.
        unsafe {
            let previous = self.bind_for_upload(handle);
            let (x, y) = (region.position.x as GLint, region.position.y as GLint);
            let (w, h) = (region.size.x as GLsizei, region.size.y as GLsizei);
            if decl.is_compressed() {
                gl::CompressedTexSubImage2D(
                    gl::TEXTURE_2D,
                    0,
                    x,
                    y,
                    w,
                    h,
                    format.internal,
                    data.len() as GLsizei,
                    data.as_ptr().cast(),
                );
            } else {
                gl::TexSubImage2D(
                    gl::TEXTURE_2D,
                    0,
                    x,
                    y,
                    w,
                    h,
                    format.format,
                    format.ty,
                    data.as_ptr().cast(),
                );
            }
            self.restore_unit_zero(previous);
        }
        self.check_errors("update_texture");
        Ok(())
    }

    fn destroy_texture(&mut self, id: TextureId) {
        let Some(texture) = self.textures.remove(&id) else {
            return;
        };
        for unit in &mut self.state.units {
            if unit.1 == texture.handle {
                *unit = (gl::TEXTURE_2D, 0);
            }
        }
        log::trace!("Deleting {}x{} texture", texture.size.x, texture.size.y);
        // SAFETY: the handle came from GenTextures and is deleted once.
        unsafe { gl::DeleteTextures(1, &texture.handle) };
    }

    fn create_buffer(
        &mut self,
        kind: BufferKind,
        usage: BufferUsage,
        size: usize,
        data: Option<&[u8]>,
    ) -> Result<BufferId, ResourceError> {
        let target = kind.into_gl();
        // SAFETY: `data`, when given, holds `size` bytes.
        let handle = unsafe {
            let mut handle = 0;
            gl::GenBuffers(1, &mut handle);
            gl::BindBuffer(target, handle);
            gl::BufferData(
                target,
                size as GLsizeiptr,
                data.map_or(ptr::null(), |bytes| bytes.as_ptr().cast()),
                usage.into_gl(),
            );
            handle
        };
        if target == gl::ARRAY_BUFFER {
            self.state.array_buffer.invalidate();
        }
        self.check_errors("create_buffer");

        let id = BufferId(self.next_id());
        self.buffers.insert(id, GlBuffer { handle, target });
        Ok(id)
    }

    fn update_buffer(
        &mut self,
        id: BufferId,
        _kind: BufferKind,
        offset: usize,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let buffer = self
            .buffers
            .get(&id)
            .ok_or_else(|| ResourceError::BackendError(format!("unknown buffer {id:?}")))?;
        let (handle, target) = (buffer.handle, buffer.target);
        // SAFETY: the range was checked against the buffer size by the render module.
        unsafe {
            gl::BindBuffer(target, handle);
            gl::BufferSubData(
                target,
                offset as GLintptr,
                data.len() as GLsizeiptr,
                data.as_ptr().cast(),
            );
        }
        if target == gl::ARRAY_BUFFER {
            self.state.array_buffer.invalidate();
        }
        self.check_errors("update_buffer");
        Ok(())
    }

    fn destroy_buffer(&mut self, id: BufferId) {
        if let Some(buffer) = self.buffers.remove(&id) {
            if self.state.array_buffer.holds(&buffer.handle) {
                self.state.array_buffer.invalidate();
            }
            // SAFETY: the handle came from GenBuffers and is deleted once.
            unsafe { gl::DeleteBuffers(1, &buffer.handle) };
        }
    }

    fn create_render_target(
        &mut self,
        size: UVec2,
        color: Option<&Attachment>,
        depth: Option<&Attachment>,
    ) -> Result<RenderTargetId, ResourceError> {
        let mut renderbuffers = Vec::new();
        // SAFETY: the context is current; the previous binding is restored below.
        let (handle, status) = unsafe {
            let mut handle = 0;
            gl::GenFramebuffers(1, &mut handle);
            gl::BindFramebuffer(gl::FRAMEBUFFER, handle);

            let mut attached = Ok(());
            if let Some(color) = color {
                attached = self.attach(color, size, gl::COLOR_ATTACHMENT0, &mut renderbuffers);
            }
            if let Some(depth) = depth.filter(|_| attached.is_ok()) {
                attached = self.attach(depth, size, gl::DEPTH_ATTACHMENT, &mut renderbuffers);
            }
            if color.is_none() && gl::DrawBuffer::is_loaded() && !self.is_legacy() {
                gl::DrawBuffer(gl::NONE);
                gl::ReadBuffer(gl::NONE);
            }
            let status = match attached {
                Ok(()) => Ok(gl::CheckFramebufferStatus(gl::FRAMEBUFFER)),
                Err(e) => Err(e),
            };
            gl::BindFramebuffer(gl::FRAMEBUFFER, self.state.framebuffer);
            (handle, status)
        };
        self.check_errors("create_render_target");

        let failure = match status {
            Ok(gl::FRAMEBUFFER_COMPLETE) => None,
            Ok(status) => Some(ResourceError::FramebufferIncomplete(
                framebuffer_status_name(status).to_owned(),
            )),
            Err(e) => Some(e),
        };
        if let Some(error) = failure {
            // SAFETY: the handles were created above and are not referenced elsewhere.
            unsafe {
                gl::DeleteFramebuffers(1, &handle);
                gl::DeleteRenderbuffers(renderbuffers.len() as GLsizei, renderbuffers.as_ptr());
            }
            return Err(error);
        }

        let id = RenderTargetId(self.next_id());
        self.framebuffers.insert(
            id,
            GlFramebuffer {
                handle,
                renderbuffers,
            },
        );
        Ok(id)
    }

    fn destroy_render_target(&mut self, id: RenderTargetId) {
        let Some(framebuffer) = self.framebuffers.remove(&id) else {
            return;
        };
        let rebind = self
            .state
            .release_framebuffer(framebuffer.handle, self.default_framebuffer);
        // SAFETY: the handles came from GenFramebuffers / GenRenderbuffers and
        // the default framebuffer outlives the backend.
        unsafe {
            if rebind {
                gl::BindFramebuffer(gl::FRAMEBUFFER, self.default_framebuffer);
            }
            gl::DeleteFramebuffers(1, &framebuffer.handle);
            gl::DeleteRenderbuffers(
                framebuffer.renderbuffers.len() as GLsizei,
                framebuffer.renderbuffers.as_ptr(),
            );
        }
    }

    fn bind_render_target(&mut self, target: Option<RenderTargetId>) {
        let handle = match target {
            Some(id) => match self.framebuffers.get(&id) {
                Some(framebuffer) => framebuffer.handle,
                None => {
                    log::error!("Unknown render target {id:?}, binding the default framebuffer");
                    self.default_framebuffer
                }
            },
            None => self.default_framebuffer,
        };
        self.state.framebuffer = handle;
        // SAFETY: `handle` is a live framebuffer or the default one.
        unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, handle) };
    }

    fn set_viewport(&mut self, viewport: URect) {
        // SAFETY: plain state call.
        unsafe {
            gl::Viewport(
                viewport.position.x as GLint,
                viewport.position.y as GLint,
                viewport.size.x as GLsizei,
                viewport.size.y as GLsizei,
            );
        }
    }

    fn set_depth_range(&mut self, near: f32, far: f32) {
        // SAFETY: plain state call.
        unsafe {
            if gl::DepthRangef::is_loaded() {
                gl::DepthRangef(near, far);
            } else {
                gl::DepthRange(f64::from(near), f64::from(far));
            }
        }
    }

    fn clear(&mut self, color: Option<LinearRgba>, depth: Option<f32>, stencil: Option<u8>) {
        let mut mask = 0;
        // SAFETY: plain state calls; write masks are restored after the clear.
        unsafe {
            if let Some(c) = color {
                gl::ColorMask(gl::TRUE, gl::TRUE, gl::TRUE, gl::TRUE);
                gl::ClearColor(c.r, c.g, c.b, c.a);
                mask |= gl::COLOR_BUFFER_BIT;
            }
            if let Some(d) = depth {
                gl::DepthMask(gl::TRUE);
                if gl::ClearDepthf::is_loaded() {
                    gl::ClearDepthf(d);
                } else {
                    gl::ClearDepth(f64::from(d));
                }
                mask |= gl::DEPTH_BUFFER_BIT;
            }
            if let Some(s) = stencil {
                gl::StencilMask(0xFF);
                gl::ClearStencil(GLint::from(s));
                mask |= gl::STENCIL_BUFFER_BIT;
            }
            if mask == 0 {
                return;
            }
            gl::Clear(mask);

            let m = self.color_mask;
            gl::ColorMask(
                gl_bool(m.contains(ColorMask::R)),
                gl_bool(m.contains(ColorMask::G)),
                gl_bool(m.contains(ColorMask::B)),
                gl_bool(m.contains(ColorMask::A)),
            );
            gl::DepthMask(gl_bool(self.depth_write));
            gl::StencilMask(GLuint::from(self.stencil_write));
        }
    }

    fn discard(&mut self, color: bool, depth: bool, stencil: bool) {
        if !self.caps.framebuffer_invalidate_supported {
            return;
        }
        let default = self.state.framebuffer == self.default_framebuffer;
        let names = if default {
            [gl::COLOR, gl::DEPTH, gl::STENCIL]
        } else {
            [gl::COLOR_ATTACHMENT0, gl::DEPTH_ATTACHMENT, gl::STENCIL_ATTACHMENT]
        };
        let attachments: Vec<GLenum> = names
            .into_iter()
            .zip([color, depth, stencil])
            .filter_map(|(name, discard)| discard.then_some(name))
            .collect();
        if attachments.is_empty() {
            return;
        }
        // SAFETY: the entry point was checked when the caps were queried.
        unsafe {
            gl::InvalidateFramebuffer(
                gl::FRAMEBUFFER,
                attachments.len() as GLsizei,
                attachments.as_ptr(),
            );
        }
    }

    fn set_depth_state(&mut self, state: &DepthState) {
        self.depth_write = state.write_enabled();
        // SAFETY: plain state calls.
        unsafe {
            if state.test_enabled() {
                gl::Enable(gl::DEPTH_TEST);
            } else {
                gl::Disable(gl::DEPTH_TEST);
            }
            gl::DepthMask(gl_bool(state.write_enabled()));
            gl::DepthFunc(state.compare_func().into_gl());
        }
    }

    fn set_stencil_state(&mut self, state: &StencilState) {
        self.stencil_write = state.write_mask();
        // SAFETY: plain state calls.
        unsafe {
            if state.test_enabled() {
                gl::Enable(gl::STENCIL_TEST);
            } else {
                gl::Disable(gl::STENCIL_TEST);
            }
            gl::StencilMask(GLuint::from(state.write_mask()));
            gl::StencilFunc(
                state.compare_func().into_gl(),
                GLint::from(state.reference()),
                GLuint::from(state.read_mask()),
            );
            gl::StencilOp(
                state.sfail_op().into_gl(),
                state.zfail_op().into_gl(),
                state.pass_op().into_gl(),
            );
        }
    }

    fn set_culling_state(&mut self, state: &CullingState) {
        // SAFETY: plain state calls.
        unsafe {
            if state.enabled() {
                gl::Enable(gl::CULL_FACE);
                gl::CullFace(state.culled_face().into_gl());
            } else {
                gl::Disable(gl::CULL_FACE);
            }
        }
    }

    fn set_blending_state(&mut self, state: &BlendingState) {
        let m = state.mask();
        self.color_mask = m;
        // SAFETY: plain state calls.
        unsafe {
            if state.enabled() {
                gl::Enable(gl::BLEND);
            } else {
                gl::Disable(gl::BLEND);
            }
            gl::BlendFuncSeparate(
                state.src_rgb().into_gl(),
                state.dst_rgb().into_gl(),
                state.src_alpha().into_gl(),
                state.dst_alpha().into_gl(),
            );
            gl::BlendEquationSeparate(state.rgb().into_gl(), state.alpha().into_gl());
            gl::ColorMask(
                gl_bool(m.contains(ColorMask::R)),
                gl_bool(m.contains(ColorMask::G)),
                gl_bool(m.contains(ColorMask::B)),
                gl_bool(m.contains(ColorMask::A)),
            );
        }
    }

    fn set_scissor(&mut self, rect: Option<URect>) {
        // SAFETY: plain state calls.
        unsafe {
            match rect {
                Some(r) => {
                    gl::Enable(gl::SCISSOR_TEST);
                    gl::Scissor(
                        r.position.x as GLint,
                        r.position.y as GLint,
                        r.size.x as GLsizei,
                        r.size.y as GLsizei,
                    );
                }
                None => gl::Disable(gl::SCISSOR_TEST),
            }
        }
    }

    fn use_program(&mut self, shader: ShaderId) {
        let Some(program) = self.programs.get(&shader) else {
            log::error!("Unknown shader {shader:?}");
            return;
        };
        let handle = program.handle;
        // SAFETY: `handle` is a linked program.
        self.state
            .program
            .set_if_invalid(handle, || unsafe { gl::UseProgram(handle) });
    }

    fn bind_sampler(&mut self, unit: u8, sampler_type: SamplerType, state: &SamplerState) {
        let unit = GLuint::from(unit);
        if unit as usize >= self.state.units.len() {
            log::error!("Texture unit {unit} exceeds the device limit");
            return;
        }
        let target = sampler_type.into_gl();
        let handle = state
            .sampled_texture()
            .and_then(|texture| self.textures.get(&texture.id()))
            .map_or(0, |texture| texture.handle);
        // SAFETY: `unit` is below the device limit and `handle` is live or zero.
        unsafe {
            self.activate_unit(unit);
            let (bound_target, bound) = self.state.units[unit as usize];
            if bound_target != target && bound != 0 {
                gl::BindTexture(bound_target, 0);
            }
            gl::BindTexture(target, handle);
            self.state.units[unit as usize] = (target, handle);
            if handle != 0 {
                gl::TexParameteri(target, gl::TEXTURE_WRAP_S, state.s_wrap_mode().into_gl());
                gl::TexParameteri(target, gl::TEXTURE_WRAP_T, state.t_wrap_mode().into_gl());
                gl::TexParameteri(target, gl::TEXTURE_MIN_FILTER, state.min_filter_mode().into_gl());
                gl::TexParameteri(target, gl::TEXTURE_MAG_FILTER, state.mag_filter_mode().into_gl());
            }
        }
    }

    fn bind_constants(
        &mut self,
        shader: ShaderId,
        scope: ScopeType,
        template: &CbufferTemplate,
        data: &[u8],
        buffer: Option<BufferId>,
    ) {
        let Some(program) = self.programs.get(&shader) else {
            log::error!("Unknown shader {shader:?}");
            return;
        };
        let block_buffer = program.blocks[scope.index()]
            .and(buffer)
            .and_then(|id| self.buffers.get(&id));
        // SAFETY: the program is current and every uniform range lies inside `data`.
        unsafe {
            if let Some(block) = block_buffer {
                gl::BindBufferBase(gl::UNIFORM_BUFFER, scope.index() as GLuint, block.handle);
                return;
            }
            for uniform in template.uniforms() {
                let Some(&location) = program.uniforms.get(&uniform.name_hash) else {
                    continue;
                };
                let start = usize::from(uniform.offset);
                match data.get(start..start + uniform.value_type.size()) {
                    Some(bytes) => upload_uniform(location, uniform.value_type, bytes),
                    None => log::error!("Uniform '{}' lies outside its block", uniform.name),
                }
            }
        }
    }

    fn bind_vertex_buffer(
        &mut self,
        slot: usize,
        buffer: BufferId,
        decl: &VertexDeclaration,
        offset: usize,
        attributes: &[ShaderAttribute],
    ) {
        let Some(handle) = self.buffers.get(&buffer).map(|b| b.handle) else {
            log::error!("Unknown vertex buffer {buffer:?}");
            return;
        };
        let stride = decl.bytes_per_vertex() as GLsizei;
        let mut enabled = if slot == 0 { 0 } else { self.state.enabled_attributes };
        // SAFETY: attribute offsets stay inside the vertex stride of `buffer`.
        unsafe {
            self.state
                .array_buffer
                .set_if_invalid(handle, || gl::BindBuffer(gl::ARRAY_BUFFER, handle));
            for attribute in decl.attributes() {
                let Some(input) = attributes.iter().find(|a| a.name_hash == attribute.name_hash)
                else {
                    continue;
                };
                let row_size = attribute.attribute_type.size() * usize::from(attribute.columns);
                for row in 0..attribute.rows {
                    let location = GLuint::from(input.index) + GLuint::from(row);
                    if location >= 32 {
                        log::error!("Attribute '{}' exceeds the tracked locations", attribute.name);
                        break;
                    }
                    gl::EnableVertexAttribArray(location);
                    gl::VertexAttribPointer(
                        location,
                        GLint::from(attribute.columns),
                        attribute.attribute_type.into_gl(),
                        gl_bool(attribute.normalized),
                        stride,
                        (offset + attribute.stride + usize::from(row) * row_size) as *const c_void,
                    );
                    enabled |= 1 << location;
                }
            }
            let stale = self.state.enabled_attributes & !enabled;
            for location in 0..32 {
                if stale & (1 << location) != 0 {
                    gl::DisableVertexAttribArray(location);
                }
            }
        }
        self.state.enabled_attributes = enabled;
    }

    fn draw(&mut self, topology: Topology, first_vertex: u32, vertex_count: u32) {
        // SAFETY: Render::execute rejects draws that overrun a bound vertex buffer.
        unsafe {
            gl::DrawArrays(topology.into_gl(), first_vertex as GLint, vertex_count as GLsizei);
        }
        self.check_errors("draw");
    }

    fn draw_indexed(
        &mut self,
        topology: Topology,
        buffer: BufferId,
        index_type: IndexType,
        offset: usize,
        index_count: u32,
    ) {
        let Some(handle) = self.buffers.get(&buffer).map(|b| b.handle) else {
            log::error!("Unknown index buffer {buffer:?}");
            return;
        };
        // SAFETY: Render::execute rejects index ranges that are misaligned or overrun the buffer.
        unsafe {
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, handle);
            gl::DrawElements(
                topology.into_gl(),
                index_count as GLsizei,
                index_type.into_gl(),
                offset as *const c_void,
            );
        }
        self.check_errors("draw_indexed");
    }
}

impl Drop for GlBackend {
    fn drop(&mut self) {
        let leaked = self.programs.len()
            + self.textures.len()
            + self.buffers.len()
            + self.framebuffers.len();
        if leaked > 0 {
            log::warn!("OpenGL backend dropped with {leaked} live objects");
        }
        // SAFETY: every handle below is owned by this backend.
        unsafe {
            for program in self.programs.values() {
                gl::DeleteProgram(program.handle);
            }
            for texture in self.textures.values() {
                gl::DeleteTextures(1, &texture.handle);
            }
            for buffer in self.buffers.values() {
                gl::DeleteBuffers(1, &buffer.handle);
            }
            for framebuffer in self.framebuffers.values() {
                gl::DeleteFramebuffers(1, &framebuffer.handle);
                gl::DeleteRenderbuffers(
                    framebuffer.renderbuffers.len() as GLsizei,
                    framebuffer.renderbuffers.as_ptr(),
                );
            }
            if let Some(vao) = self.vertex_array {
                gl::DeleteVertexArrays(1, &vao);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_names_follow_scope_order() {
        for scope in ScopeType::ALL {
            assert!(BLOCK_NAMES[scope.index()].starts_with("cb_"));
        }
        assert_eq!(BLOCK_NAMES[ScopeType::Material.index()], "cb_material");
    }

    #[test]
    fn nul_bytes_are_rejected() {
        assert!(c_string("u_matrix").is_ok());
        assert!(c_string("u_\0matrix").is_err());
    }
}
