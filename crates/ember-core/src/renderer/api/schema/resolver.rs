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

//! Address resolution for descriptions that reference other assets.

use crate::renderer::api::resource::{RenderTarget, Shader, Texture};
use crate::renderer::api::shader_source::CbufferTemplate;
use crate::renderer::error::SchemaError;
use std::rc::Rc;

/// Resolves asset addresses found in descriptions.
///
/// The asset layer implements this over its library. Every method defaults to
/// "not found", so a resolver only provides what its descriptions reference.
pub trait AssetResolver {
    /// The text asset at `address`, e.g. a GLSL stage.
    fn text(&self, address: &str) -> Option<String> {
        let _ = address;
        None
    }

    /// The texture at `address`.
    fn texture(&self, address: &str) -> Option<Texture> {
        let _ = address;
        None
    }

    /// The shader at `address`.
    fn shader(&self, address: &str) -> Option<Shader> {
        let _ = address;
        None
    }

    /// The constant buffer template at `address`.
    fn cbuffer_template(&self, address: &str) -> Option<Rc<CbufferTemplate>> {
        let _ = address;
        None
    }

    /// The render target at `address`.
    fn render_target(&self, address: &str) -> Option<RenderTarget> {
        let _ = address;
        None
    }
}

/// Turns a failed lookup into [`SchemaError::UnresolvedAddress`].
pub(crate) fn require<T>(value: Option<T>, address: &str) -> Result<T, SchemaError> {
    value.ok_or_else(|| {
        log::error!("Failed to resolve asset address '{address}'");
        SchemaError::UnresolvedAddress(address.to_owned())
    })
}
