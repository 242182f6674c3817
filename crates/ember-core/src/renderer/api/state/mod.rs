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

//! Pipeline states: depth, stencil, culling, blending and samplers.
//!
//! Every state is a small `Copy` value with chainable setters. Equality follows
//! what the GPU would observe: fields of a disabled test or stage are ignored.

pub mod blending;
pub mod block;
pub mod culling;
pub mod depth;
pub mod enums;
pub mod sampler;
pub mod stencil;

pub use self::blending::{BlendingState, ColorMask};
pub use self::block::StateBlock;
pub use self::culling::CullingState;
pub use self::depth::DepthState;
pub use self::enums::{
    BlendingEquation, BlendingFactor, CompareFunc, CullingFace, SamplerFilter, SamplerWrap,
    StencilOp,
};
pub use self::sampler::{SamplerBlock, SamplerState, MAX_SAMPLERS};
pub use self::stencil::StencilState;
