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

//! Shader program sources and the metadata the render core needs to bind them.
//!
//! A [`ShaderSource`] carries the GLSL text of both stages, the vertex
//! attributes the program consumes, its samplers and up to three constant
//! buffer templates, one per [`ScopeType`].

use crate::utils::StrHash;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// The type of an attribute or uniform value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// 32-bit signed integer.
    I32,
    /// 32-bit float.
    F32,
    /// Two floats.
    V2f,
    /// Three floats.
    V3f,
    /// Four floats.
    V4f,
    /// 2x2 float matrix, each column padded to 16 bytes.
    M2f,
    /// 3x3 float matrix, each column padded to 16 bytes.
    M3f,
    /// 4x4 float matrix.
    M4f,
}

impl ValueType {
    /// Size of the value inside a constant buffer, padding included.
    pub const fn size(self) -> usize {
        match self {
            ValueType::I32 | ValueType::F32 => 4,
            ValueType::V2f => 8,
            ValueType::V3f => 12,
            ValueType::V4f => 16,
            ValueType::M2f => 32,
            ValueType::M3f => 48,
            ValueType::M4f => 64,
        }
    }
}

/// The kind of texture a sampler reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplerType {
    /// A 2D texture.
    #[serde(rename = "_2d")]
    Texture2d,
    /// A cube map.
    #[serde(rename = "cube_map")]
    CubeMap,
}

/// How often a constant buffer or sampler binding changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    /// Bound once per render pass.
    RenderPass,
    /// Bound with each material.
    #[default]
    Material,
    /// Bound with each draw.
    DrawCommand,
}

impl ScopeType {
    /// Every scope, in binding order.
    pub const ALL: [ScopeType; 3] = [
        ScopeType::RenderPass,
        ScopeType::Material,
        ScopeType::DrawCommand,
    ];

    /// A dense index, for per-scope tables.
    pub const fn index(self) -> usize {
        match self {
            ScopeType::RenderPass => 0,
            ScopeType::Material => 1,
            ScopeType::DrawCommand => 2,
        }
    }
}

/// One uniform of a constant buffer block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformInfo {
    /// The uniform name.
    pub name: String,
    /// Hash of the name.
    pub name_hash: StrHash,
    /// Byte offset inside the block.
    pub offset: u16,
    /// Value type.
    pub value_type: ValueType,
}

/// The layout of one constant buffer block.
///
/// Templates are shared between a shader and the constant buffers created for
/// it: a buffer is compatible with a shader when they point to the same
/// template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CbufferTemplate {
    uniforms: Vec<UniformInfo>,
    block_size: usize,
}

impl CbufferTemplate {
    /// Creates an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a uniform. The block grows to cover it.
    pub fn add_uniform(mut self, name: &str, offset: u16, value_type: ValueType) -> Self {
        self.block_size = self.block_size.max(offset as usize + value_type.size());
        self.uniforms.push(UniformInfo {
            name: name.to_owned(),
            name_hash: StrHash::new(name),
            offset,
            value_type,
        });
        self
    }

    /// Uniforms in declaration order.
    pub fn uniforms(&self) -> &[UniformInfo] {
        &self.uniforms
    }

    /// Finds a uniform by name.
    pub fn uniform(&self, name: impl Into<StrHash>) -> Option<&UniformInfo> {
        let hash = name.into();
        self.uniforms.iter().find(|u| u.name_hash == hash)
    }

    /// Size of the block in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

/// A vertex attribute consumed by a shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderAttribute {
    /// The attribute name.
    pub name: String,
    /// Hash of the name, matched against vertex declarations.
    pub name_hash: StrHash,
    /// The attribute location.
    pub index: u8,
    /// Value type.
    pub value_type: ValueType,
}

/// A sampler uniform of a shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSampler {
    /// The sampler name.
    pub name: String,
    /// Hash of the name, matched against sampler blocks.
    pub name_hash: StrHash,
    /// The texture unit the sampler reads from.
    pub unit: u8,
    /// Texture kind.
    pub sampler_type: SamplerType,
    /// Which sampler block feeds it.
    pub scope: ScopeType,
}

/// The sources and binding tables of a shader program.
#[derive(Debug, Clone, Default)]
pub struct ShaderSource {
    vertex: String,
    fragment: String,
    attributes: Vec<ShaderAttribute>,
    samplers: Vec<ShaderSampler>,
    blocks: [Option<Rc<CbufferTemplate>>; 3],
}

impl ShaderSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vertex stage text.
    pub fn vertex_shader(mut self, source: impl Into<String>) -> Self {
        self.vertex = source.into();
        self
    }

    /// Sets the fragment stage text.
    pub fn fragment_shader(mut self, source: impl Into<String>) -> Self {
        self.fragment = source.into();
        self
    }

    /// Declares a vertex attribute.
    pub fn add_attribute(mut self, name: &str, index: u8, value_type: ValueType) -> Self {
        self.attributes.push(ShaderAttribute {
            name: name.to_owned(),
            name_hash: StrHash::new(name),
            index,
            value_type,
        });
        self
    }

    /// Declares a sampler.
    ///
    /// Samplers bind at render-pass or material scope only; a draw-command
    /// sampler is never fed.
    pub fn add_sampler(
        mut self,
        name: &str,
        unit: u8,
        sampler_type: SamplerType,
        scope: ScopeType,
    ) -> Self {
        if scope == ScopeType::DrawCommand {
            log::warn!("Sampler '{name}' declared at draw-command scope will never be bound");
        }
        self.samplers.push(ShaderSampler {
            name: name.to_owned(),
            name_hash: StrHash::new(name),
            unit,
            sampler_type,
            scope,
        });
        self
    }

    /// Sets the constant buffer template for `scope`.
    pub fn set_block(mut self, template: Rc<CbufferTemplate>, scope: ScopeType) -> Self {
        self.blocks[scope.index()] = Some(template);
        self
    }

    /// The vertex stage text.
    pub fn vertex_text(&self) -> &str {
        &self.vertex
    }

    /// The fragment stage text.
    pub fn fragment_text(&self) -> &str {
        &self.fragment
    }

    /// Declared attributes.
    pub fn attributes(&self) -> &[ShaderAttribute] {
        &self.attributes
    }

    /// Declared samplers.
    pub fn samplers(&self) -> &[ShaderSampler] {
        &self.samplers
    }

    /// The constant buffer template for `scope`, if any.
    pub fn block(&self, scope: ScopeType) -> Option<&Rc<CbufferTemplate>> {
        self.blocks[scope.index()].as_ref()
    }

    /// Every template, indexed by [`ScopeType::index`].
    pub fn blocks(&self) -> &[Option<Rc<CbufferTemplate>>; 3] {
        &self.blocks
    }

    /// `true` when either stage is missing.
    pub fn is_empty(&self) -> bool {
        self.vertex.is_empty() || self.fragment.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_size_covers_every_uniform() {
        let template = CbufferTemplate::new()
            .add_uniform("u_matrix_vp", 0, ValueType::M4f)
            .add_uniform("u_time", 64, ValueType::F32)
            .add_uniform("u_tint", 80, ValueType::V4f);
        assert_eq!(template.block_size(), 96);
        assert_eq!(template.uniform("u_time").map(|u| u.offset), Some(64));
        assert!(template.uniform("u_missing").is_none());

        // out-of-order uniforms still produce the max extent
        let reversed = CbufferTemplate::new()
            .add_uniform("b", 16, ValueType::M3f)
            .add_uniform("a", 0, ValueType::V2f);
        assert_eq!(reversed.block_size(), 64);
    }

    #[test]
    fn value_sizes() {
        let sizes: Vec<usize> = [
            ValueType::F32,
            ValueType::V2f,
            ValueType::V3f,
            ValueType::V4f,
            ValueType::M2f,
            ValueType::M3f,
            ValueType::M4f,
        ]
        .iter()
        .map(|t| t.size())
        .collect();
        assert_eq!(sizes, vec![4, 8, 12, 16, 32, 48, 64]);
    }

    #[test]
    fn blocks_are_keyed_by_scope() {
        let pass = Rc::new(CbufferTemplate::new().add_uniform("u_vp", 0, ValueType::M4f));
        let source = ShaderSource::new()
            .vertex_shader("void main() {}")
            .fragment_shader("void main() {}")
            .add_attribute("a_vertex", 0, ValueType::V3f)
            .add_sampler("u_texture", 0, SamplerType::Texture2d, ScopeType::Material)
            .set_block(pass.clone(), ScopeType::RenderPass);
        assert!(source.block(ScopeType::RenderPass).is_some_and(|b| Rc::ptr_eq(b, &pass)));
        assert!(source.block(ScopeType::Material).is_none());
        assert!(source.block(ScopeType::DrawCommand).is_none());
        assert!(!source.is_empty());
        assert_eq!(source.samplers()[0].name_hash, StrHash::new("u_texture"));
    }
}
