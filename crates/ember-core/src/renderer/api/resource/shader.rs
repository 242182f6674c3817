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

//! Linked shader program handles.

use super::ids::ShaderId;
use super::release::{ReleaseQueue, ReleasedResource};
use crate::renderer::api::shader_source::{
    CbufferTemplate, ScopeType, ShaderAttribute, ShaderSampler, ShaderSource,
};
use crate::utils::StrHash;
use std::rc::Rc;

#[derive(Debug)]
struct ShaderInner {
    id: ShaderId,
    attributes: Vec<ShaderAttribute>,
    samplers: Vec<ShaderSampler>,
    blocks: [Option<Rc<CbufferTemplate>>; 3],
    release: ReleaseQueue,
}

impl Drop for ShaderInner {
    fn drop(&mut self) {
        self.release.push(ReleasedResource::Shader(self.id));
    }
}

/// A shared handle to a linked program and its binding tables.
///
/// Shaders are immutable once linked. Handles compare by identity.
#[derive(Debug, Clone)]
pub struct Shader(Rc<ShaderInner>);

impl Shader {
    /// Wraps a backend program built from `source`.
    pub fn new(id: ShaderId, source: &ShaderSource, release: &ReleaseQueue) -> Self {
        Self(Rc::new(ShaderInner {
            id,
            attributes: source.attributes().to_vec(),
            samplers: source.samplers().to_vec(),
            blocks: source.blocks().clone(),
            release: release.clone(),
        }))
    }

    /// Backend id.
    pub fn id(&self) -> ShaderId {
        self.0.id
    }

    /// Vertex attributes the program consumes.
    pub fn attributes(&self) -> &[ShaderAttribute] {
        &self.0.attributes
    }

    /// Finds an attribute by name.
    pub fn attribute(&self, name: StrHash) -> Option<&ShaderAttribute> {
        self.0.attributes.iter().find(|a| a.name_hash == name)
    }

    /// Samplers of the program.
    pub fn samplers(&self) -> &[ShaderSampler] {
        &self.0.samplers
    }

    /// Finds a sampler by name.
    pub fn sampler(&self, name: StrHash) -> Option<&ShaderSampler> {
        self.0.samplers.iter().find(|s| s.name_hash == name)
    }

    /// The constant buffer template at `scope`, if the program has one.
    pub fn block(&self, scope: ScopeType) -> Option<&Rc<CbufferTemplate>> {
        self.0.blocks[scope.index()].as_ref()
    }
}

impl PartialEq for Shader {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Shader {}
