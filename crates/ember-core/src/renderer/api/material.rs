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

//! Materials: a shader with its material-scope bindings and state overrides.

use super::resource::{ConstBuffer, Shader};
use super::state::{BlendingState, CullingState, SamplerBlock, SamplerState};
use crate::utils::StrHash;

/// What a draw needs besides geometry.
///
/// Blending and culling overrides replace the render pass baseline while the
/// material is bound; `None` falls back to the baseline. Equality is
/// component-wise, handles by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    shader: Shader,
    constants: Option<ConstBuffer>,
    samplers: SamplerBlock,
    blending: Option<BlendingState>,
    culling: Option<CullingState>,
}

impl Material {
    /// Creates a material drawing with `shader` and no bindings.
    pub fn new(shader: Shader) -> Self {
        Self {
            shader,
            constants: None,
            samplers: SamplerBlock::default(),
            blending: None,
            culling: None,
        }
    }

    /// Sets the material-scope constant buffer.
    pub fn constants(mut self, constants: Option<ConstBuffer>) -> Self {
        self.constants = constants;
        self
    }

    /// Replaces the material-scope sampler block.
    pub fn samplers(mut self, samplers: SamplerBlock) -> Self {
        self.samplers = samplers;
        self
    }

    /// Binds one sampler.
    pub fn sampler(mut self, name: impl Into<StrHash>, sampler: SamplerState) -> Self {
        self.samplers.bind(name, sampler);
        self
    }

    /// Sets the blending override.
    pub fn blending(mut self, state: Option<BlendingState>) -> Self {
        self.blending = state;
        self
    }

    /// Sets the culling override.
    pub fn culling(mut self, state: Option<CullingState>) -> Self {
        self.culling = state;
        self
    }

    /// The shader.
    pub fn shader(&self) -> &Shader {
        &self.shader
    }

    /// The material-scope constant buffer.
    pub fn const_buffer(&self) -> Option<&ConstBuffer> {
        self.constants.as_ref()
    }

    /// The material-scope samplers.
    pub fn sampler_block(&self) -> &SamplerBlock {
        &self.samplers
    }

    /// The blending override.
    pub fn blending_state(&self) -> Option<&BlendingState> {
        self.blending.as_ref()
    }

    /// The culling override.
    pub fn culling_state(&self) -> Option<&CullingState> {
        self.culling.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::resource::{ReleaseQueue, ShaderId};
    use crate::renderer::api::shader_source::ShaderSource;

    #[test]
    fn equality_is_component_wise() {
        let queue = ReleaseQueue::new();
        let source = ShaderSource::new();
        let a = Shader::new(ShaderId(1), &source, &queue);
        let b = Shader::new(ShaderId(1), &source, &queue);
        assert_eq!(Material::new(a.clone()), Material::new(a.clone()));
        // same id, different handle
        assert_ne!(Material::new(a.clone()), Material::new(b));
        assert_ne!(
            Material::new(a.clone()),
            Material::new(a.clone()).blending(Some(BlendingState::alpha_blend()))
        );
        // a disabled override still differs from no override
        assert_ne!(
            Material::new(a.clone()),
            Material::new(a).culling(Some(CullingState::default()))
        );
    }
}
