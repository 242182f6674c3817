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

//! JSON descriptions of render assets.
//!
//! The asset layer stores states, cbuffer templates, shaders, materials and
//! render passes as JSON. The types here mirror that layout with serde and turn
//! it into the runtime values of [`crate::renderer::api`]. Addresses of other
//! assets are looked up through an [`AssetResolver`].
//!
//! State blocks serialize directly, see [`StateBlock`](crate::renderer::api::state::StateBlock).

pub mod material;
pub mod pass;
pub mod property;
pub mod resolver;
pub mod shader;

pub use self::material::{
    FilterDesc, MaterialDesc, MaterialDescription, MaterialSamplerDesc, WrapDesc,
};
pub use self::pass::{AttachmentDesc, RenderPassDescription};
pub use self::property::{parse_properties, PropertyDesc};
pub use self::resolver::AssetResolver;
pub use self::shader::{
    AttributeDesc, CbufferTemplateDesc, ShaderDesc, ShaderSamplerDesc, StageSourcesDesc,
    UniformDesc,
};
