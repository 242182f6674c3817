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

//! Material descriptions.

use super::property::{parse_properties, PropertyDesc};
use super::resolver::{require, AssetResolver};
use crate::renderer::api::property::PropertyMap;
use crate::renderer::api::resource::Shader;
use crate::renderer::api::state::{
    BlendingState, CullingState, DepthState, SamplerBlock, SamplerFilter, SamplerState,
    SamplerWrap, StencilState,
};
use crate::renderer::error::SchemaError;
use serde::{Deserialize, Serialize};

/// A wrap mode given once or per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WrapDesc {
    /// Same mode on both axes.
    Both(SamplerWrap),
    /// Per axis.
    Split {
        /// Horizontal.
        #[serde(default)]
        s: SamplerWrap,
        /// Vertical.
        #[serde(default)]
        t: SamplerWrap,
    },
}

/// A filter given once or per direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterDesc {
    /// Same filter for minification and magnification.
    Both(SamplerFilter),
    /// Per direction.
    Split {
        /// Minification.
        #[serde(default)]
        min: SamplerFilter,
        /// Magnification.
        #[serde(default)]
        mag: SamplerFilter,
    },
}

/// A sampler record of a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialSamplerDesc {
    /// Sampler name.
    pub name: String,
    /// Address of the sampled texture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    /// Wrap modes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<WrapDesc>,
    /// Filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterDesc>,
}

impl MaterialSamplerDesc {
    fn build(&self, resolver: &dyn AssetResolver) -> Result<SamplerState, SchemaError> {
        let mut state = SamplerState::default();
        if let Some(address) = &self.texture {
            state = state.texture(Some(require(resolver.texture(address), address)?));
        }
        state = match self.wrap {
            Some(WrapDesc::Both(wrap)) => state.wrap(wrap),
            Some(WrapDesc::Split { s, t }) => state.s_wrap(s).t_wrap(t),
            None => state,
        };
        state = match self.filter {
            Some(FilterDesc::Both(filter)) => state.filter(filter),
            Some(FilterDesc::Split { min, mag }) => state.min_filter(min).mag_filter(mag),
            None => state,
        };
        Ok(state)
    }
}

/// A material description as stored by the asset layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialDesc {
    /// Address of the shader.
    pub shader: String,
    /// Material-scope samplers.
    #[serde(default)]
    pub samplers: Vec<MaterialSamplerDesc>,
    /// Initial values of the material constant buffer.
    #[serde(default)]
    pub properties: Vec<PropertyDesc>,
    /// Depth state to apply while drawing with the material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_state: Option<DepthState>,
    /// Stencil state to apply while drawing with the material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stencil_state: Option<StencilState>,
    /// Culling override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culling_state: Option<CullingState>,
    /// Blending override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blending_state: Option<BlendingState>,
}

/// A resolved material description.
///
/// The render module turns it into a [`Material`](crate::renderer::api::material::Material),
/// creating the material constant buffer from `properties`. Depth and stencil
/// are not part of a material; callers issue them as state commands.
#[derive(Debug, Clone)]
pub struct MaterialDescription {
    /// The shader.
    pub shader: Shader,
    /// Material-scope samplers.
    pub samplers: SamplerBlock,
    /// Constant buffer contents.
    pub properties: PropertyMap,
    /// Depth state.
    pub depth: Option<DepthState>,
    /// Stencil state.
    pub stencil: Option<StencilState>,
    /// Culling override.
    pub culling: Option<CullingState>,
    /// Blending override.
    pub blending: Option<BlendingState>,
}

impl MaterialDesc {
    /// Parses a material description.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves the shader and textures and parses the properties.
    pub fn resolve(&self, resolver: &dyn AssetResolver) -> Result<MaterialDescription, SchemaError> {
        let shader = require(resolver.shader(&self.shader), &self.shader)?;
        let mut samplers = SamplerBlock::new();
        for sampler in &self.samplers {
            samplers.bind(sampler.name.as_str(), sampler.build(resolver)?);
        }
        Ok(MaterialDescription {
            shader,
            samplers,
            properties: parse_properties(&self.properties)?,
            depth: self.depth_state,
            stencil: self.stencil_state,
            culling: self.culling_state,
            blending: self.blending_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::UVec2;
    use crate::renderer::api::declaration::{PixelDeclaration, PixelType};
    use crate::renderer::api::resource::{ReleaseQueue, ShaderId, Texture, TextureId};
    use crate::renderer::api::shader_source::ShaderSource;
    use crate::renderer::api::state::BlendingFactor;

    struct Library {
        shader: Shader,
        texture: Texture,
    }

    impl AssetResolver for Library {
        fn shader(&self, address: &str) -> Option<Shader> {
            (address == "sprite.shader.json").then(|| self.shader.clone())
        }

        fn texture(&self, address: &str) -> Option<Texture> {
            (address == "ship.png").then(|| self.texture.clone())
        }
    }

    fn library(queue: &ReleaseQueue) -> Library {
        Library {
            shader: Shader::new(ShaderId(1), &ShaderSource::new(), queue),
            texture: Texture::new(
                TextureId(2),
                UVec2::new(64, 64),
                PixelDeclaration::new(PixelType::Rgba8),
                queue,
            ),
        }
    }

    #[test]
    fn resolves_samplers_and_states() {
        let queue = ReleaseQueue::new();
        let lib = library(&queue);
        let desc = MaterialDesc::from_json(
            r#"{
                "shader": "sprite.shader.json",
                "samplers": [{
                    "name": "u_texture",
                    "texture": "ship.png",
                    "wrap": { "s": "clamp", "t": "mirror" },
                    "filter": "nearest"
                }],
                "properties": [{ "name": "u_alpha", "type": "f32", "value": 0.5 }],
                "blending_state": {
                    "enable": true,
                    "src_factor": "src_alpha",
                    "dst_factor": "one_minus_src_alpha"
                }
            }"#,
        )
        .expect("valid material");
        let resolved = desc.resolve(&lib).expect("resolvable");
        assert_eq!(resolved.shader, lib.shader);
        let sampler = resolved.samplers.sampler("u_texture").expect("bound");
        assert_eq!(sampler.sampled_texture(), Some(&lib.texture));
        assert_eq!(sampler.s_wrap_mode(), SamplerWrap::Clamp);
        assert_eq!(sampler.t_wrap_mode(), SamplerWrap::Mirror);
        assert_eq!(sampler.mag_filter_mode(), SamplerFilter::Nearest);
        assert_eq!(resolved.properties.len(), 1);
        let blending = resolved.blending.expect("blending override");
        assert_eq!(blending.dst_alpha(), BlendingFactor::OneMinusSrcAlpha);
        assert!(resolved.culling.is_none());
    }

    #[test]
    fn unknown_texture_fails() {
        let queue = ReleaseQueue::new();
        let lib = library(&queue);
        let desc = MaterialDesc::from_json(
            r#"{ "shader": "sprite.shader.json", "samplers": [{ "name": "u_texture", "texture": "missing.png" }] }"#,
        )
        .expect("valid material");
        assert!(matches!(
            desc.resolve(&lib),
            Err(SchemaError::UnresolvedAddress(a)) if a == "missing.png"
        ));
    }
}
