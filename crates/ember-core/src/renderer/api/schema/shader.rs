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

//! Cbuffer template and shader descriptions.

use super::resolver::{require, AssetResolver};
use crate::renderer::api::core::RenderMode;
use crate::renderer::api::shader_source::{
    CbufferTemplate, SamplerType, ScopeType, ShaderSource, ValueType,
};
use crate::renderer::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// One uniform record of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniformDesc {
    /// Uniform name.
    pub name: String,
    /// Byte offset inside the block.
    pub offset: u16,
    /// Value type.
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

/// `{ "uniforms": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CbufferTemplateDesc {
    /// Uniforms in declaration order.
    pub uniforms: Vec<UniformDesc>,
}

impl CbufferTemplateDesc {
    /// Builds the template.
    pub fn build(&self) -> CbufferTemplate {
        self.uniforms
            .iter()
            .fold(CbufferTemplate::new(), |template, u| {
                template.add_uniform(&u.name, u.offset, u.value_type)
            })
    }
}

impl From<&CbufferTemplate> for CbufferTemplateDesc {
    fn from(template: &CbufferTemplate) -> Self {
        Self {
            uniforms: template
                .uniforms()
                .iter()
                .map(|u| UniformDesc {
                    name: u.name.clone(),
                    offset: u.offset,
                    value_type: u.value_type,
                })
                .collect(),
        }
    }
}

/// A vertex attribute record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDesc {
    /// Attribute name.
    pub name: String,
    /// Attribute location.
    pub index: u8,
    /// Value type.
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

fn default_sampler_type() -> SamplerType {
    SamplerType::Texture2d
}

/// A sampler record. Type defaults to 2D, scope to material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShaderSamplerDesc {
    /// Sampler name.
    pub name: String,
    /// Texture unit.
    pub unit: u8,
    /// Texture kind.
    #[serde(rename = "type", default = "default_sampler_type")]
    pub sampler_type: SamplerType,
    /// Binding scope.
    #[serde(default)]
    pub scope: ScopeType,
}

/// Addresses of the two stages of one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageSourcesDesc {
    /// Address of the vertex stage text.
    pub vertex: String,
    /// Address of the fragment stage text.
    pub fragment: String,
}

/// A shader description. `gles2` sources are mandatory, `gles3` ones are used
/// instead when the device runs ES 3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShaderDesc {
    /// Vertex attributes.
    #[serde(default)]
    pub attributes: Vec<AttributeDesc>,
    /// Samplers.
    #[serde(default)]
    pub samplers: Vec<ShaderSamplerDesc>,
    /// Address of the render-pass block template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_pass_block: Option<String>,
    /// Address of the material block template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_block: Option<String>,
    /// Address of the draw-command block template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_command_block: Option<String>,
    /// GLES 2 sources.
    pub gles2: StageSourcesDesc,
    /// GLES 3 sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gles3: Option<StageSourcesDesc>,
}

impl ShaderDesc {
    /// Parses a shader description.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves every address and builds the source for `mode`.
    pub fn build(
        &self,
        resolver: &dyn AssetResolver,
        mode: RenderMode,
    ) -> Result<ShaderSource, SchemaError> {
        let stages = match (&self.gles3, mode) {
            (Some(gles3), RenderMode::OpenGles3) => gles3,
            _ => &self.gles2,
        };
        let vertex = require(resolver.text(&stages.vertex), &stages.vertex)?;
        let fragment = require(resolver.text(&stages.fragment), &stages.fragment)?;

        let mut source = ShaderSource::new()
            .vertex_shader(vertex)
            .fragment_shader(fragment);
        for a in &self.attributes {
            source = source.add_attribute(&a.name, a.index, a.value_type);
        }
        for s in &self.samplers {
            source = source.add_sampler(&s.name, s.unit, s.sampler_type, s.scope);
        }
        let blocks = [
            (&self.render_pass_block, ScopeType::RenderPass),
            (&self.material_block, ScopeType::Material),
            (&self.draw_command_block, ScopeType::DrawCommand),
        ];
        for (address, scope) in blocks {
            if let Some(address) = address {
                let template: Rc<CbufferTemplate> =
                    require(resolver.cbuffer_template(address), address)?;
                source = source.set_block(template, scope);
            }
        }
        Ok(source)
    }
}
