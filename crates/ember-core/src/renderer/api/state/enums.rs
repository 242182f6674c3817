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

//! Enumerations shared by the pipeline states.
//!
//! Serialized names are the lowercase names used by material and pass descriptions.

use serde::{Deserialize, Serialize};

/// A comparison function for depth and stencil tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareFunc {
    /// Never passes.
    Never,
    /// Passes if the new value is less than the existing value.
    #[default]
    Less,
    /// Passes if the new value is less than or equal to the existing value.
    #[serde(rename = "lequal")]
    LessEqual,
    /// Passes if the new value is greater than the existing value.
    Greater,
    /// Passes if the new value is greater than or equal to the existing value.
    #[serde(rename = "gequal")]
    GreaterEqual,
    /// Passes if the values are equal.
    Equal,
    /// Passes if the values are not equal.
    #[serde(rename = "notequal")]
    NotEqual,
    /// Always passes.
    Always,
}

/// An operation applied to the stencil buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StencilOp {
    /// Keeps the current value.
    #[default]
    Keep,
    /// Sets the value to 0.
    Zero,
    /// Replaces the value with the reference value.
    Replace,
    /// Increments the value, clamping to the maximum.
    Incr,
    /// Increments the value, wrapping to 0.
    IncrWrap,
    /// Decrements the value, clamping to 0.
    Decr,
    /// Decrements the value, wrapping to the maximum.
    DecrWrap,
    /// Inverts the bits of the value.
    Invert,
}

/// Which faces get culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullingFace {
    /// Back faces.
    #[default]
    Back,
    /// Front faces.
    Front,
    /// Both faces.
    BackAndFront,
}

/// A source or destination blend factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum BlendingFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
    SrcAlphaSaturate,
}

/// How the blended source and destination terms are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendingEquation {
    /// `src + dst`.
    #[default]
    Add,
    /// `src - dst`.
    Subtract,
    /// `dst - src`.
    ReverseSubtract,
}

/// Texture coordinate wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerWrap {
    /// Clamps to the edge texel.
    Clamp,
    /// Repeats the texture.
    #[default]
    Repeat,
    /// Repeats the texture, mirrored every other tile.
    Mirror,
}

/// Texture filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerFilter {
    /// Nearest texel.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Linear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_descriptions() {
        let name = |v: serde_json::Value| v.as_str().map(str::to_owned);
        let json = |v| serde_json::to_value(v).ok().and_then(name);
        assert_eq!(json(CompareFunc::LessEqual).as_deref(), Some("lequal"));
        assert_eq!(json(CompareFunc::NotEqual).as_deref(), Some("notequal"));
        assert_eq!(
            serde_json::to_value(StencilOp::IncrWrap).ok().and_then(name).as_deref(),
            Some("incr_wrap")
        );
        assert_eq!(
            serde_json::to_value(BlendingFactor::OneMinusSrcAlpha)
                .ok()
                .and_then(name)
                .as_deref(),
            Some("one_minus_src_alpha")
        );
        assert_eq!(
            serde_json::to_value(CullingFace::BackAndFront).ok().and_then(name).as_deref(),
            Some("back_and_front")
        );
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(serde_json::from_str::<CompareFunc>("\"lessequal\"").is_err());
        assert!(serde_json::from_str::<SamplerWrap>("\"mirror\"").is_ok());
    }
}
