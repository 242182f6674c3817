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

//! The four pipeline states grouped together.

use super::blending::BlendingState;
use super::culling::CullingState;
use super::depth::DepthState;
use super::stencil::StencilState;
use serde::{Deserialize, Serialize};

/// Depth, stencil, culling and blending states, used as a render pass baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateBlock {
    #[serde(rename = "depth_state")]
    depth: DepthState,
    #[serde(rename = "stencil_state")]
    stencil: StencilState,
    #[serde(rename = "culling_state")]
    culling: CullingState,
    #[serde(rename = "blending_state")]
    blending: BlendingState,
}

impl StateBlock {
    /// Sets the depth state.
    pub fn depth(mut self, state: DepthState) -> Self {
        self.depth = state;
        self
    }

    /// Sets the stencil state.
    pub fn stencil(mut self, state: StencilState) -> Self {
        self.stencil = state;
        self
    }

    /// Sets the culling state.
    pub fn culling(mut self, state: CullingState) -> Self {
        self.culling = state;
        self
    }

    /// Sets the blending state.
    pub fn blending(mut self, state: BlendingState) -> Self {
        self.blending = state;
        self
    }

    /// The depth state.
    pub fn depth_state(&self) -> &DepthState {
        &self.depth
    }

    /// The stencil state.
    pub fn stencil_state(&self) -> &StencilState {
        &self.stencil
    }

    /// The culling state.
    pub fn culling_state(&self) -> &CullingState {
        &self.culling
    }

    /// The blending state.
    pub fn blending_state(&self) -> &BlendingState {
        &self.blending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::state::{BlendingFactor, CompareFunc, CullingFace, StencilOp};

    #[test]
    fn every_state_round_trips_through_json() {
        let block = StateBlock::default()
            .depth(DepthState::default().test(true).write(false).func(CompareFunc::GreaterEqual))
            .stencil(
                StencilState::default()
                    .test(true)
                    .func(CompareFunc::Equal, 1, 0x7F)
                    .op(StencilOp::Keep, StencilOp::Zero, StencilOp::DecrWrap),
            )
            .culling(CullingState::default().enable(true).face(CullingFace::Front))
            .blending(
                BlendingState::alpha_blend().alpha_factor(BlendingFactor::One, BlendingFactor::Zero),
            );
        let json = serde_json::to_string(&block).expect("serializable");
        let parsed: StateBlock = serde_json::from_str(&json).expect("parsable");
        assert_eq!(parsed, block);
        assert_eq!(parsed.stencil_state().zfail_op(), StencilOp::DecrWrap);

        for state in [DepthState::default(), DepthState::default().test(true)] {
            let json = serde_json::to_string(&state).expect("serializable");
            assert_eq!(serde_json::from_str::<DepthState>(&json).ok(), Some(state));
        }
    }

    #[test]
    fn missing_states_take_defaults() {
        let block: StateBlock =
            serde_json::from_str(r#"{ "culling_state": { "enable": true } }"#).expect("parsable");
        assert!(block.culling_state().enabled());
        assert_eq!(*block.depth_state(), DepthState::default());
    }
}
