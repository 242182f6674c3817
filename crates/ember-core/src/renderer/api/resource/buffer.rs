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

//! Index, vertex and constant buffer handles, and interned vertex attribs.

use super::ids::BufferId;
use super::release::{ReleaseQueue, ReleasedResource};
use super::shader::Shader;
use crate::renderer::api::declaration::{IndexDeclaration, VertexDeclaration};
use crate::renderer::api::property::PropertyMap;
use crate::renderer::api::shader_source::{CbufferTemplate, ScopeType};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

/// How often the contents of a buffer are expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferUsage {
    /// Written once at creation.
    #[default]
    Static,
    /// Rewritten about every frame.
    Stream,
    /// Updated from time to time.
    Dynamic,
}

/// What a backend buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Indices.
    Index,
    /// Vertices.
    Vertex,
    /// A uniform block.
    Uniform,
}

#[derive(Debug)]
struct BufferInner {
    id: BufferId,
    size: usize,
    usage: BufferUsage,
    release: ReleaseQueue,
}

impl BufferInner {
    fn new(id: BufferId, size: usize, usage: BufferUsage, release: &ReleaseQueue) -> Self {
        Self {
            id,
            size,
            usage,
            release: release.clone(),
        }
    }
}

impl Drop for BufferInner {
    fn drop(&mut self) {
        self.release.push(ReleasedResource::Buffer(self.id));
    }
}

/// A shared handle to an index buffer.
#[derive(Debug, Clone)]
pub struct IndexBuffer(Rc<(BufferInner, IndexDeclaration)>);

impl IndexBuffer {
    /// Wraps a backend buffer of `size` bytes.
    pub fn new(
        id: BufferId,
        size: usize,
        decl: IndexDeclaration,
        usage: BufferUsage,
        release: &ReleaseQueue,
    ) -> Self {
        Self(Rc::new((BufferInner::new(id, size, usage, release), decl)))
    }

    /// Backend id.
    pub fn id(&self) -> BufferId {
        self.0 .0.id
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.0 .0.size
    }

    /// Number of indices the buffer holds.
    pub fn index_count(&self) -> usize {
        self.size() / self.decl().bytes_per_index()
    }

    /// Index layout.
    pub fn decl(&self) -> IndexDeclaration {
        self.0 .1
    }

    /// Usage hint.
    pub fn usage(&self) -> BufferUsage {
        self.0 .0.usage
    }
}

impl PartialEq for IndexBuffer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for IndexBuffer {}

/// A shared handle to a vertex buffer.
#[derive(Debug, Clone)]
pub struct VertexBuffer(Rc<BufferInner>);

impl VertexBuffer {
    /// Wraps a backend buffer of `size` bytes.
    pub fn new(id: BufferId, size: usize, usage: BufferUsage, release: &ReleaseQueue) -> Self {
        Self(Rc::new(BufferInner::new(id, size, usage, release)))
    }

    /// Backend id.
    pub fn id(&self) -> BufferId {
        self.0.id
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.0.size
    }

    /// Usage hint.
    pub fn usage(&self) -> BufferUsage {
        self.0.usage
    }
}

impl PartialEq for VertexBuffer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for VertexBuffer {}

/// An interned vertex declaration.
///
/// The render module hands out one handle per distinct declaration, so two
/// handles are equal exactly when they are the same allocation.
#[derive(Debug, Clone)]
pub struct VertexAttribs(Rc<VertexDeclaration>);

impl VertexAttribs {
    /// Wraps `decl`. Prefer the render module's interning constructor.
    pub fn new(decl: VertexDeclaration) -> Self {
        Self(Rc::new(decl))
    }

    /// The vertex layout.
    pub fn decl(&self) -> &VertexDeclaration {
        &self.0
    }
}

impl PartialEq for VertexAttribs {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for VertexAttribs {}

#[derive(Debug)]
struct ConstBufferInner {
    id: Option<BufferId>,
    scope: ScopeType,
    template: Rc<CbufferTemplate>,
    shadow: RefCell<Vec<u8>>,
    version: Cell<u64>,
    release: ReleaseQueue,
}

impl Drop for ConstBufferInner {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.release.push(ReleasedResource::Buffer(id));
        }
    }
}

/// A shared handle to a constant buffer.
///
/// The buffer keeps a CPU shadow of its block. Every property update bumps
/// [`version`](Self::version), which lets the executor skip rebinding an
/// unchanged buffer. On devices with uniform buffers the shadow is mirrored in a
/// backend buffer.
#[derive(Debug, Clone)]
pub struct ConstBuffer(Rc<ConstBufferInner>);

impl ConstBuffer {
    /// Creates a zeroed buffer laid out by `template`.
    pub fn new(
        id: Option<BufferId>,
        scope: ScopeType,
        template: Rc<CbufferTemplate>,
        release: &ReleaseQueue,
    ) -> Self {
        let shadow = vec![0; template.block_size()];
        Self(Rc::new(ConstBufferInner {
            id,
            scope,
            template,
            shadow: RefCell::new(shadow),
            version: Cell::new(0),
            release: release.clone(),
        }))
    }

    /// Backend buffer id, when the device has uniform buffers.
    pub fn id(&self) -> Option<BufferId> {
        self.0.id
    }

    /// The scope the buffer binds at.
    pub fn scope(&self) -> ScopeType {
        self.0.scope
    }

    /// The block layout.
    pub fn template(&self) -> &Rc<CbufferTemplate> {
        &self.0.template
    }

    /// Size of the block in bytes.
    pub fn size(&self) -> usize {
        self.0.template.block_size()
    }

    /// Bumped on every update.
    pub fn version(&self) -> u64 {
        self.0.version.get()
    }

    /// The shadow bytes.
    pub fn data(&self) -> Ref<'_, [u8]> {
        Ref::map(self.0.shadow.borrow(), Vec::as_slice)
    }

    /// `true` when `shader` has a block at this buffer's scope built from the
    /// same template.
    pub fn is_compatible_with(&self, shader: &Shader) -> bool {
        shader
            .block(self.0.scope)
            .is_some_and(|block| Rc::ptr_eq(block, &self.0.template))
    }

    /// Copies the values of `properties` named by the template into the shadow
    /// and bumps the version.
    ///
    /// A value whose type differs from its uniform is skipped with a warning.
    /// Returns how many uniforms were written.
    pub fn write_properties(&self, properties: &PropertyMap) -> usize {
        let mut shadow = self.0.shadow.borrow_mut();
        let mut written = 0;
        for uniform in self.0.template.uniforms() {
            let Some(value) = properties.find(uniform.name_hash) else {
                continue;
            };
            if value.value_type() != uniform.value_type {
                log::warn!(
                    "Constant buffer: property '{}' is {:?}, the uniform expects {:?}",
                    uniform.name,
                    value.value_type(),
                    uniform.value_type
                );
                continue;
            }
            let offset = uniform.offset as usize;
            value.write_to(&mut shadow[offset..offset + uniform.value_type.size()]);
            written += 1;
        }
        self.0.version.set(self.0.version.get() + 1);
        written
    }
}

impl PartialEq for ConstBuffer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ConstBuffer {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Mat4, Vec4};
    use crate::renderer::api::shader_source::ValueType;

    fn material_template() -> Rc<CbufferTemplate> {
        Rc::new(
            CbufferTemplate::new()
                .add_uniform("u_mvp", 0, ValueType::M4f)
                .add_uniform("u_tint", 64, ValueType::V4f),
        )
    }

    #[test]
    fn dropping_the_last_handle_queues_release() {
        let queue = ReleaseQueue::new();
        let vb = VertexBuffer::new(BufferId(7), 64, BufferUsage::Static, &queue);
        let copy = vb.clone();
        drop(vb);
        assert!(queue.is_empty());
        drop(copy);
        assert_eq!(queue.drain(), vec![ReleasedResource::Buffer(BufferId(7))]);
    }

    #[test]
    fn shadow_only_buffers_release_nothing() {
        let queue = ReleaseQueue::new();
        drop(ConstBuffer::new(None, ScopeType::Material, material_template(), &queue));
        assert!(queue.is_empty());
    }

    #[test]
    fn update_is_idempotent_on_bytes() {
        let queue = ReleaseQueue::new();
        let cb = ConstBuffer::new(None, ScopeType::Material, material_template(), &queue);
        let props = PropertyMap::new()
            .with("u_tint", Vec4::new(1.0, 0.5, 0.25, 1.0))
            .with("u_mvp", Mat4::IDENTITY);
        assert_eq!(cb.write_properties(&props), 2);
        let first = cb.data().to_vec();
        cb.write_properties(&props);
        assert_eq!(*cb.data(), first[..]);
        assert_eq!(cb.version(), 2);
        assert_eq!(&first[64..68], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn mismatched_types_are_skipped() {
        let queue = ReleaseQueue::new();
        let cb = ConstBuffer::new(None, ScopeType::Material, material_template(), &queue);
        let props = PropertyMap::new().with("u_tint", 1.0f32).with("u_other", 3);
        assert_eq!(cb.write_properties(&props), 0);
        assert!(cb.data().iter().all(|b| *b == 0));
        assert_eq!(cb.version(), 1);
    }

    #[test]
    fn index_buffer_counts_elements() {
        let queue = ReleaseQueue::new();
        let ib = IndexBuffer::new(
            BufferId(1),
            12,
            IndexDeclaration::default(),
            BufferUsage::Dynamic,
            &queue,
        );
        assert_eq!(ib.index_count(), 6);
        assert_eq!(ib, ib.clone());
    }
}
