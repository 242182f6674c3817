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

//! Render pass descriptions.

use super::resolver::{require, AssetResolver};
use crate::math::{LinearRgba, URect};
use crate::renderer::api::pass::{LoadOp, RenderPassDesc, StoreOp};
use crate::renderer::api::state::StateBlock;
use crate::renderer::error::SchemaError;
use serde::{Deserialize, Serialize};

/// Load/store record of one attachment. Absent fields keep the pass defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttachmentDesc<T> {
    /// Load operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadOp>,
    /// Store operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreOp>,
    /// Clear value, used when `load` is `clear`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_value: Option<T>,
}

fn default_depth_range() -> [f32; 2] {
    [0.0, 1.0]
}

/// A render pass as stored by the asset layer.
///
/// ```
/// use ember_core::renderer::api::schema::RenderPassDescription;
///
/// let desc = RenderPassDescription::from_json(
///     r#"{ "viewport": [0, 0, 320, 240], "color": { "load": "clear", "clear_value": [0, 0, 0, 1] } }"#,
/// )
/// .unwrap();
/// assert_eq!(desc.viewport, [0, 0, 320, 240]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderPassDescription {
    /// Address of the render target, absent for the default framebuffer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// `[x, y, width, height]`.
    pub viewport: [u32; 4],
    /// `[near, far]`.
    #[serde(default = "default_depth_range")]
    pub depth_range: [f32; 2],
    /// Baseline states of the pass.
    #[serde(default)]
    pub states: StateBlock,
    /// Color attachment, clear value as `[r, g, b, a]`.
    #[serde(default)]
    pub color: AttachmentDesc<[f32; 4]>,
    /// Depth attachment.
    #[serde(default)]
    pub depth: AttachmentDesc<f32>,
    /// Stencil attachment.
    #[serde(default)]
    pub stencil: AttachmentDesc<u8>,
}

impl RenderPassDescription {
    /// Parses a render pass description.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves the target and builds the pass descriptor.
    pub fn build(&self, resolver: &dyn AssetResolver) -> Result<RenderPassDesc, SchemaError> {
        let [near, far] = self.depth_range;
        if !(0.0..=1.0).contains(&near) || !(0.0..=1.0).contains(&far) {
            return Err(SchemaError::InvalidValue(format!(
                "depth range [{near}, {far}] outside [0, 1]"
            )));
        }
        let [x, y, width, height] = self.viewport;
        let target = match &self.target {
            Some(address) => Some(require(resolver.render_target(address), address)?),
            None => None,
        };

        let mut desc = RenderPassDesc::new(URect::new(x, y, width, height))
            .target(target)
            .depth_range(near, far)
            .states(self.states);

        if let Some([r, g, b, a]) = self.color.clear_value {
            desc = desc.color_clear(LinearRgba::new(r, g, b, a));
        }
        desc = match self.color.load {
            Some(LoadOp::Clear) if self.color.clear_value.is_none() => {
                desc.color_clear(LinearRgba::TRANSPARENT)
            }
            Some(LoadOp::Load) => desc.color_load(),
            _ => desc,
        };
        desc = match self.color.store {
            Some(StoreOp::Discard) => desc.color_discard(),
            _ => desc,
        };

        if let Some(value) = self.depth.clear_value {
            desc = desc.depth_clear(value);
        }
        desc = match self.depth.load {
            Some(LoadOp::Clear) if self.depth.clear_value.is_none() => desc.depth_clear(1.0),
            Some(LoadOp::Load) => desc.depth_load(),
            _ => desc,
        };
        desc = match self.depth.store {
            Some(StoreOp::Discard) => desc.depth_discard(),
            _ => desc,
        };

        if let Some(value) = self.stencil.clear_value {
            desc = desc.stencil_clear(value);
        }
        desc = match self.stencil.load {
            Some(LoadOp::Clear) if self.stencil.clear_value.is_none() => desc.stencil_clear(0),
            Some(LoadOp::Load) => desc.stencil_load(),
            _ => desc,
        };
        desc = match self.stencil.store {
            Some(StoreOp::Discard) => desc.stencil_discard(),
            _ => desc,
        };
        Ok(desc)
    }
}
