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

//! The render module: resource creation and updates, queries and lifecycle.

use super::pass::{ActivePass, StoreOps};
use super::shadow::StateShadow;
use crate::batch_lane::Batcher;
use ember_core::math::{URect, UVec2};
use ember_core::platform::FrameSurface;
use ember_core::renderer::api::{
    ApiProfile, Attachment, BufferKind, BufferUsage, CompressionFamily, ConstBuffer, DeviceCaps,
    ExternalTexture, FrameStatistics, Image, IndexBuffer, IndexDeclaration, IndexType, Material,
    PixelDeclaration, PixelType, PropertyMap, ReleaseQueue, ReleasedResource, RenderSettings,
    RenderTarget, ScopeType, Shader, ShaderSource, Texture, VertexAttribs, VertexBuffer,
    VertexDeclaration,
};
use ember_core::renderer::api::schema::MaterialDescription;
use ember_core::renderer::{RenderBackend, ResourceError};
use std::collections::HashMap;
use std::rc::Rc;

/// The render module.
///
/// Creates and updates GPU resources, drives render passes and executes
/// commands against a [`RenderBackend`]. It also owns the frame's [`Batcher`].
/// The module and every handle it returns live on the thread that created it.
pub struct Render<B: RenderBackend> {
    pub(super) backend: B,
    surface: Box<dyn FrameSurface>,
    settings: RenderSettings,
    release: ReleaseQueue,
    attribs: HashMap<VertexDeclaration, VertexAttribs>,
    pub(super) shadow: StateShadow,
    pub(super) pass: Option<ActivePass>,
    pub(super) store_ops: StoreOps,
    pub(super) batcher: Batcher,
    pub(super) stats: FrameStatistics,
    pub(super) last_stats: FrameStatistics,
    pub(super) frame_id: u64,
}

fn creation_failed<T>(what: &str, error: ResourceError) -> Result<T, ResourceError> {
    log::error!("Failed to create {what}: {error}");
    Err(error)
}

impl<B: RenderBackend> Render<B> {
    /// Creates the render module over `backend`, presenting to `surface`.
    pub fn new(backend: B, surface: Box<dyn FrameSurface>, settings: RenderSettings) -> Self {
        let caps = backend.caps();
        log::info!(
            "Render module started: backend '{}', {:?} profile, max texture size {}",
            backend.name(),
            caps.profile,
            caps.max_texture_size
        );
        Self {
            shadow: StateShadow::new(settings.state_diffing),
            batcher: Batcher::new(settings.batching),
            backend,
            surface,
            settings,
            release: ReleaseQueue::new(),
            attribs: HashMap::new(),
            pass: None,
            store_ops: StoreOps::default(),
            stats: FrameStatistics::default(),
            last_stats: FrameStatistics::default(),
            frame_id: 0,
        }
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably. Changing device state behind the module's back
    /// desynchronizes its state shadow.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The settings the module was created with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Limits and features of the device.
    pub fn device_caps(&self) -> &DeviceCaps {
        self.backend.caps()
    }

    /// Counters of the frame being recorded.
    pub fn frame_statistics(&self) -> FrameStatistics {
        self.stats
    }

    /// Counters of the last presented frame.
    pub fn last_frame_statistics(&self) -> FrameStatistics {
        self.last_stats
    }

    /// Number of presented frames.
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// The batcher of the current frame.
    pub fn batcher(&self) -> &Batcher {
        &self.batcher
    }

    /// Size of the default framebuffer.
    pub fn framebuffer_size(&self) -> UVec2 {
        self.surface.framebuffer_size()
    }

    /// Compiles and links `source`.
    pub fn create_shader(&mut self, source: &ShaderSource) -> Result<Shader, ResourceError> {
        match self.backend.create_shader(source) {
            Ok(id) => Ok(Shader::new(id, source, &self.release)),
            Err(e) => creation_failed("shader", e),
        }
    }

    fn check_texture(&self, size: UVec2, decl: PixelDeclaration) -> Result<(), ResourceError> {
        let caps = self.backend.caps();
        if !self.is_pixel_supported(decl) {
            return Err(ResourceError::UnsupportedPixel(format!("{:?}", decl.pixel_type())));
        }
        if size.max_element() > caps.max_texture_size {
            return Err(ResourceError::TextureTooLarge {
                requested: size.max_element(),
                max: caps.max_texture_size,
            });
        }
        if !caps.npot_texture_supported && !size.is_power_of_two() {
            return Err(ResourceError::NonPowerOfTwo);
        }
        if decl.is_depth() && !caps.depth_texture_supported {
            return Err(ResourceError::DepthTextureUnsupported);
        }
        if size.has_zero() {
            return Err(ResourceError::InvalidSize(format!("empty texture {}x{}", size.x, size.y)));
        }
        let block = decl.compressed_block_size();
        if size.x % block.x != 0 || size.y % block.y != 0 {
            return Err(ResourceError::InvalidSize(format!(
                "{}x{} is not a multiple of the {}x{} compression block",
                size.x, size.y, block.x, block.y
            )));
        }
        Ok(())
    }

    /// Creates a texture with undefined contents.
    pub fn create_texture(
        &mut self,
        size: UVec2,
        decl: PixelDeclaration,
    ) -> Result<Texture, ResourceError> {
        if let Err(e) = self.check_texture(size, decl) {
            return creation_failed("texture", e);
        }
        match self.backend.create_texture(size, decl, None) {
            Ok(id) => Ok(Texture::new(id, size, decl, &self.release)),
            Err(e) => creation_failed("texture", e),
        }
    }

    /// Creates a texture holding `image`.
    pub fn create_texture_from_image(&mut self, image: &Image) -> Result<Texture, ResourceError> {
        let decl = image.format().pixel_declaration();
        if let Err(e) = self.check_texture(image.size(), decl) {
            return creation_failed("texture", e);
        }
        match self
            .backend
            .create_texture(image.size(), decl, Some(image.data()))
        {
            Ok(id) => Ok(Texture::new(id, image.size(), decl, &self.release)),
            Err(e) => creation_failed("texture", e),
        }
    }

    /// Creates an index buffer initialized from `indices`.
    pub fn create_index_buffer(
        &mut self,
        indices: &[u8],
        decl: IndexDeclaration,
        usage: BufferUsage,
    ) -> Result<IndexBuffer, ResourceError> {
        let checked = self.check_index_buffer(indices.len(), decl);
        if let Err(e) = checked {
            return creation_failed("index buffer", e);
        }
        match self
            .backend
            .create_buffer(BufferKind::Index, usage, indices.len(), Some(indices))
        {
            Ok(id) => Ok(IndexBuffer::new(id, indices.len(), decl, usage, &self.release)),
            Err(e) => creation_failed("index buffer", e),
        }
    }

    /// Creates an index buffer of `size` bytes with undefined contents.
    /// Static buffers must be created from data.
    pub fn create_index_buffer_sized(
        &mut self,
        size: usize,
        decl: IndexDeclaration,
        usage: BufferUsage,
    ) -> Result<IndexBuffer, ResourceError> {
        let checked = check_sized_usage(usage).and_then(|_| self.check_index_buffer(size, decl));
        if let Err(e) = checked {
            return creation_failed("index buffer", e);
        }
        match self
            .backend
            .create_buffer(BufferKind::Index, usage, size, None)
        {
            Ok(id) => Ok(IndexBuffer::new(id, size, decl, usage, &self.release)),
            Err(e) => creation_failed("index buffer", e),
        }
    }

    fn check_index_buffer(&self, size: usize, decl: IndexDeclaration) -> Result<(), ResourceError> {
        if !self.is_index_supported(decl) {
            return Err(ResourceError::UnsupportedIndex(format!("{:?}", decl.index_type())));
        }
        if size == 0 || size % decl.bytes_per_index() != 0 {
            return Err(ResourceError::InvalidSize(format!(
                "{size} bytes of {:?} indices",
                decl.index_type()
            )));
        }
        Ok(())
    }

    /// Creates a vertex buffer initialized from `vertices`.
    pub fn create_vertex_buffer(
        &mut self,
        vertices: &[u8],
        usage: BufferUsage,
    ) -> Result<VertexBuffer, ResourceError> {
        if vertices.is_empty() {
            return creation_failed(
                "vertex buffer",
                ResourceError::InvalidSize("no vertex data".into()),
            );
        }
        match self
            .backend
            .create_buffer(BufferKind::Vertex, usage, vertices.len(), Some(vertices))
        {
            Ok(id) => Ok(VertexBuffer::new(id, vertices.len(), usage, &self.release)),
            Err(e) => creation_failed("vertex buffer", e),
        }
    }

    /// Creates a vertex buffer of `size` bytes with undefined contents.
    /// Static buffers must be created from data.
    pub fn create_vertex_buffer_sized(
        &mut self,
        size: usize,
        usage: BufferUsage,
    ) -> Result<VertexBuffer, ResourceError> {
        let checked = check_sized_usage(usage).and_then(|_| {
            if size == 0 {
                Err(ResourceError::InvalidSize("empty vertex buffer".into()))
            } else {
                Ok(())
            }
        });
        if let Err(e) = checked {
            return creation_failed("vertex buffer", e);
        }
        match self
            .backend
            .create_buffer(BufferKind::Vertex, usage, size, None)
        {
            Ok(id) => Ok(VertexBuffer::new(id, size, usage, &self.release)),
            Err(e) => creation_failed("vertex buffer", e),
        }
    }

    /// Returns the interned attribs of `decl`. Equal declarations share one
    /// handle.
    pub fn create_vertex_attribs(
        &mut self,
        decl: &VertexDeclaration,
    ) -> Result<VertexAttribs, ResourceError> {
        if let Some(attribs) = self.attribs.get(decl) {
            return Ok(attribs.clone());
        }
        if !self.is_vertex_supported(decl) {
            return creation_failed(
                "vertex attribs",
                ResourceError::UnsupportedVertex(format!(
                    "{} attributes, the device has {}",
                    decl.attribute_count(),
                    self.backend.caps().max_vertex_attributes
                )),
            );
        }
        let attribs = VertexAttribs::new(decl.clone());
        self.attribs.insert(decl.clone(), attribs.clone());
        Ok(attribs)
    }

    /// Creates the constant buffer of `shader`'s block at `scope`.
    ///
    /// Returns `Ok(None)` when the shader has no block there.
    pub fn create_const_buffer(
        &mut self,
        shader: &Shader,
        scope: ScopeType,
    ) -> Result<Option<ConstBuffer>, ResourceError> {
        let Some(template) = shader.block(scope) else {
            return Ok(None);
        };
        let template = Rc::clone(template);
        let id = if self.backend.caps().uniform_buffer_supported {
            match self.backend.create_buffer(
                BufferKind::Uniform,
                BufferUsage::Dynamic,
                template.block_size(),
                None,
            ) {
                Ok(id) => Some(id),
                Err(e) => return creation_failed("constant buffer", e),
            }
        } else {
            None
        };
        Ok(Some(ConstBuffer::new(id, scope, template, &self.release)))
    }

    /// Creates a framebuffer.
    ///
    /// Attachments named in `external` are created as textures that can be
    /// sampled later, the others as renderbuffers. Stencil comes with a depth
    /// declaration that has a stencil channel.
    pub fn create_render_target(
        &mut self,
        size: UVec2,
        color_decl: Option<PixelDeclaration>,
        depth_decl: Option<PixelDeclaration>,
        external: ExternalTexture,
    ) -> Result<RenderTarget, ResourceError> {
        if let Err(e) = self.check_render_target(size, color_decl, depth_decl) {
            return creation_failed("render target", e);
        }

        let color = match color_decl {
            Some(decl) => Some(Attachment {
                decl,
                texture: external
                    .contains(ExternalTexture::COLOR)
                    .then(|| self.create_texture(size, decl))
                    .transpose()?,
            }),
            None => None,
        };
        let depth = match depth_decl {
            Some(decl) => Some(Attachment {
                decl,
                texture: external
                    .contains(ExternalTexture::DEPTH)
                    .then(|| self.create_texture(size, decl))
                    .transpose()?,
            }),
            None => None,
        };

        match self
            .backend
            .create_render_target(size, color.as_ref(), depth.as_ref())
        {
            Ok(id) => Ok(RenderTarget::new(id, size, color, depth, &self.release)),
            Err(e) => creation_failed("render target", e),
        }
    }

    fn check_render_target(
        &self,
        size: UVec2,
        color_decl: Option<PixelDeclaration>,
        depth_decl: Option<PixelDeclaration>,
    ) -> Result<(), ResourceError> {
        let caps = self.backend.caps();
        if !caps.render_target_supported {
            return Err(ResourceError::RenderTargetUnsupported);
        }
        if size.has_zero() {
            return Err(ResourceError::InvalidSize(format!(
                "empty render target {}x{}",
                size.x, size.y
            )));
        }
        if size.max_element() > caps.max_renderbuffer_size {
            return Err(ResourceError::TextureTooLarge {
                requested: size.max_element(),
                max: caps.max_renderbuffer_size,
            });
        }
        if let Some(decl) = color_decl {
            if !decl.is_color() || decl.is_compressed() {
                return Err(ResourceError::UnsupportedPixel(format!(
                    "{:?} is not a color attachment format",
                    decl.pixel_type()
                )));
            }
        }
        if let Some(decl) = depth_decl {
            if !decl.is_depth() {
                return Err(ResourceError::UnsupportedPixel(format!(
                    "{:?} is not a depth attachment format",
                    decl.pixel_type()
                )));
            }
        }
        Ok(())
    }

    /// Builds a material from a resolved description, creating and filling
    /// its material-scope constant buffer.
    pub fn create_material(
        &mut self,
        desc: &MaterialDescription,
    ) -> Result<Material, ResourceError> {
        let constants = self.create_const_buffer(&desc.shader, ScopeType::Material)?;
        if let Some(constants) = &constants {
            self.update_const_buffer(constants, &desc.properties)?;
        } else if !desc.properties.is_empty() {
            log::warn!("Material properties ignored, the shader has no material block");
        }
        Ok(Material::new(desc.shader.clone())
            .constants(constants)
            .samplers(desc.samplers.clone())
            .blending(desc.blending)
            .culling(desc.culling))
    }

    /// Writes `indices` at index `offset` (in indices, not bytes).
    pub fn update_index_buffer(
        &mut self,
        buffer: &IndexBuffer,
        indices: &[u8],
        offset: usize,
    ) -> Result<(), ResourceError> {
        let stride = buffer.decl().bytes_per_index();
        if indices.len() % stride != 0 {
            return Err(ResourceError::MisalignedRegion);
        }
        let byte_offset = offset * stride;
        check_range(byte_offset, indices.len(), buffer.size())?;
        self.backend
            .update_buffer(buffer.id(), BufferKind::Index, byte_offset, indices)
    }

    /// Writes `vertices` at byte `offset`.
    pub fn update_vertex_buffer(
        &mut self,
        buffer: &VertexBuffer,
        vertices: &[u8],
        offset: usize,
    ) -> Result<(), ResourceError> {
        check_range(offset, vertices.len(), buffer.size())?;
        self.backend
            .update_buffer(buffer.id(), BufferKind::Vertex, offset, vertices)
    }

    /// Copies the values of `properties` into `buffer` and uploads it when it
    /// has a backend buffer.
    pub fn update_const_buffer(
        &mut self,
        buffer: &ConstBuffer,
        properties: &PropertyMap,
    ) -> Result<(), ResourceError> {
        buffer.write_properties(properties);
        match buffer.id() {
            Some(id) => self
                .backend
                .update_buffer(id, BufferKind::Uniform, 0, &buffer.data()),
            None => Ok(()),
        }
    }

    /// Replaces the texels of `region`.
    ///
    /// Compressed regions start on a block boundary and span whole blocks,
    /// except where they end on the texture border.
    pub fn update_texture(
        &mut self,
        texture: &Texture,
        pixels: &[u8],
        region: URect,
    ) -> Result<(), ResourceError> {
        let decl = texture.decl();
        let size = texture.size();
        if !URect::from_size(size).contains_rect(&region) {
            return Err(ResourceError::OutOfBounds);
        }
        if decl.is_compressed() {
            let block = decl.compressed_block_size();
            let aligned = |origin: u32, extent: u32, block: u32, edge: u32| {
                origin % block == 0 && (extent % block == 0 || origin + extent == edge)
            };
            if !aligned(region.position.x, region.size.x, block.x, size.x)
                || !aligned(region.position.y, region.size.y, block.y, size.y)
            {
                return Err(ResourceError::MisalignedRegion);
            }
        }
        let expected = decl.data_size(region.size);
        if pixels.len() != expected {
            return Err(ResourceError::InvalidSize(format!(
                "{} bytes for a region of {expected} bytes",
                pixels.len()
            )));
        }
        self.backend
            .update_texture(texture.id(), decl, region, pixels)
    }

    /// Copies `image` into `texture` at `offset`. The image format must match
    /// the texture's pixel declaration.
    pub fn update_texture_from_image(
        &mut self,
        texture: &Texture,
        image: &Image,
        offset: UVec2,
    ) -> Result<(), ResourceError> {
        let decl = image.format().pixel_declaration();
        if decl != texture.decl() {
            log::error!(
                "Failed to update texture: image is {:?}, texture is {:?}",
                decl.pixel_type(),
                texture.decl().pixel_type()
            );
            return Err(ResourceError::IncompatibleDeclaration(format!(
                "{:?} into {:?}",
                decl.pixel_type(),
                texture.decl().pixel_type()
            )));
        }
        let region = URect {
            position: offset,
            size: image.size(),
        };
        self.update_texture(texture, image.data(), region)
    }

    /// `true` when textures of `decl` can be created.
    pub fn is_pixel_supported(&self, decl: PixelDeclaration) -> bool {
        let caps = self.backend.caps();
        match decl.compression_family() {
            Some(CompressionFamily::Dxt) => caps.dxt_compression_supported,
            Some(CompressionFamily::Pvrtc) => caps.pvrtc_compression_supported,
            Some(CompressionFamily::Pvrtc2) => caps.pvrtc2_compression_supported,
            None if decl.is_depth() => caps.depth_texture_supported,
            None => true,
        }
    }

    /// `true` when index buffers of `decl` can be created.
    pub fn is_index_supported(&self, decl: IndexDeclaration) -> bool {
        match decl.index_type() {
            IndexType::U16 => true,
            IndexType::U32 => self.backend.caps().element_index_uint,
        }
    }

    /// `true` when the device has enough attribute locations for `decl`.
    pub fn is_vertex_supported(&self, decl: &VertexDeclaration) -> bool {
        let locations: u32 = decl.attributes().iter().map(|a| a.rows as u32).sum();
        locations <= self.backend.caps().max_vertex_attributes
    }

    /// The depth format to use for depth-only attachments, `None` without
    /// render target support.
    pub fn suitable_depth_pixel_type(&self) -> Option<PixelType> {
        let caps = self.backend.caps();
        if !caps.render_target_supported {
            return None;
        }
        Some(match caps.profile {
            ApiProfile::Gles2 => PixelType::Depth16,
            _ => PixelType::Depth24,
        })
    }

    /// The depth format to use for depth and stencil attachments, `None`
    /// without render target support.
    pub fn suitable_depth_stencil_pixel_type(&self) -> Option<PixelType> {
        self.backend
            .caps()
            .render_target_supported
            .then_some(PixelType::Depth24Stencil8)
    }

    /// Destroys the backend objects of every handle dropped since the last
    /// call.
    pub(super) fn release_dropped(&mut self) {
        for resource in self.release.drain() {
            log::trace!("Releasing {resource:?}");
            match resource {
                ReleasedResource::Shader(id) => self.backend.destroy_shader(id),
                ReleasedResource::Texture(id) => self.backend.destroy_texture(id),
                ReleasedResource::Buffer(id) => self.backend.destroy_buffer(id),
                ReleasedResource::RenderTarget(id) => self.backend.destroy_render_target(id),
            }
        }
    }

    pub(super) fn swap_buffers(&mut self) {
        self.surface.swap_buffers();
    }
}

impl<B: RenderBackend> Drop for Render<B> {
    fn drop(&mut self) {
        self.batcher.clear();
        self.pass = None;
        self.shadow.invalidate_bindings();
        self.release_dropped();
    }
}

fn check_sized_usage(usage: BufferUsage) -> Result<(), ResourceError> {
    match usage {
        BufferUsage::Static => Err(ResourceError::InvalidUsage(
            "static buffers are created from data".into(),
        )),
        BufferUsage::Stream | BufferUsage::Dynamic => Ok(()),
    }
}

fn check_range(offset: usize, len: usize, size: usize) -> Result<(), ResourceError> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(ResourceError::OutOfBounds),
    }
}
