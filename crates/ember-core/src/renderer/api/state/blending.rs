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

//! Color blending state and the color write mask.

use super::enums::{BlendingEquation, BlendingFactor};
use crate::ember_bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

ember_bitflags! {
    /// The color channels written by a draw.
    pub struct ColorMask: u8 {
        /// Red.
        const R = 1 << 0;
        /// Green.
        const G = 1 << 1;
        /// Blue.
        const B = 1 << 2;
        /// Alpha.
        const A = 1 << 3;
        /// Red, green and blue.
        const RGB = Self::R.bits() | Self::G.bits() | Self::B.bits();
        /// Every channel.
        const RGBA = Self::RGB.bits() | Self::A.bits();
    }
}

const MASK_CHANNELS: [(char, ColorMask); 4] = [
    ('r', ColorMask::R),
    ('g', ColorMask::G),
    ('b', ColorMask::B),
    ('a', ColorMask::A),
];

impl ColorMask {
    /// The mask name used by descriptions: `none`, or the written channels in
    /// `rgba` order, e.g. `rb` or `rgba`.
    pub fn name(&self) -> String {
        if self.is_empty() {
            return "none".to_owned();
        }
        MASK_CHANNELS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(c, _)| *c)
            .collect()
    }

    /// Parses a mask name produced by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "none" {
            return Some(Self::EMPTY);
        }
        if name.is_empty() {
            return None;
        }
        let mut mask = Self::EMPTY;
        let mut next = 0;
        for c in name.chars() {
            let offset = MASK_CHANNELS[next..].iter().position(|(ch, _)| *ch == c)?;
            mask.insert(MASK_CHANNELS[next + offset].1);
            next += offset + 1;
        }
        Some(mask)
    }
}

impl Serialize for ColorMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for ColorMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        ColorMask::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown color mask '{name}'")))
    }
}

/// Blending configuration.
///
/// Two disabled states compare equal whatever their other fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "BlendingStateDesc", into = "BlendingStateDesc")]
pub struct BlendingState {
    enabled: bool,
    color_mask: ColorMask,
    src_rgb_factor: BlendingFactor,
    src_alpha_factor: BlendingFactor,
    dst_rgb_factor: BlendingFactor,
    dst_alpha_factor: BlendingFactor,
    rgb_equation: BlendingEquation,
    alpha_equation: BlendingEquation,
}

impl Default for BlendingState {
    fn default() -> Self {
        Self {
            enabled: false,
            color_mask: ColorMask::RGBA,
            src_rgb_factor: BlendingFactor::One,
            src_alpha_factor: BlendingFactor::One,
            dst_rgb_factor: BlendingFactor::Zero,
            dst_alpha_factor: BlendingFactor::Zero,
            rgb_equation: BlendingEquation::Add,
            alpha_equation: BlendingEquation::Add,
        }
    }
}

impl BlendingState {
    /// Enables or disables blending.
    pub fn enable(mut self, enable: bool) -> Self {
        self.enabled = enable;
        self
    }

    /// Sets the color write mask.
    pub fn color_mask(mut self, mask: ColorMask) -> Self {
        self.color_mask = mask;
        self
    }

    /// Sets source and destination factors for both color and alpha.
    pub fn factor(self, src: BlendingFactor, dst: BlendingFactor) -> Self {
        self.rgb_factor(src, dst).alpha_factor(src, dst)
    }

    /// Sets the source factor for both color and alpha.
    pub fn src_factor(mut self, src: BlendingFactor) -> Self {
        self.src_rgb_factor = src;
        self.src_alpha_factor = src;
        self
    }

    /// Sets the destination factor for both color and alpha.
    pub fn dst_factor(mut self, dst: BlendingFactor) -> Self {
        self.dst_rgb_factor = dst;
        self.dst_alpha_factor = dst;
        self
    }

    /// Sets the color factors.
    pub fn rgb_factor(mut self, src: BlendingFactor, dst: BlendingFactor) -> Self {
        self.src_rgb_factor = src;
        self.dst_rgb_factor = dst;
        self
    }

    /// Sets the alpha factors.
    pub fn alpha_factor(mut self, src: BlendingFactor, dst: BlendingFactor) -> Self {
        self.src_alpha_factor = src;
        self.dst_alpha_factor = dst;
        self
    }

    /// Sets the equation for both color and alpha.
    pub fn equation(self, equation: BlendingEquation) -> Self {
        self.rgb_equation(equation).alpha_equation(equation)
    }

    /// Sets the color equation.
    pub fn rgb_equation(mut self, equation: BlendingEquation) -> Self {
        self.rgb_equation = equation;
        self
    }

    /// Sets the alpha equation.
    pub fn alpha_equation(mut self, equation: BlendingEquation) -> Self {
        self.alpha_equation = equation;
        self
    }

    /// `true` when blending is on.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The color write mask.
    pub fn mask(&self) -> ColorMask {
        self.color_mask
    }

    /// Source factor for color.
    pub fn src_rgb(&self) -> BlendingFactor {
        self.src_rgb_factor
    }

    /// Source factor for alpha.
    pub fn src_alpha(&self) -> BlendingFactor {
        self.src_alpha_factor
    }

    /// Destination factor for color.
    pub fn dst_rgb(&self) -> BlendingFactor {
        self.dst_rgb_factor
    }

    /// Destination factor for alpha.
    pub fn dst_alpha(&self) -> BlendingFactor {
        self.dst_alpha_factor
    }

    /// Equation for color.
    pub fn rgb(&self) -> BlendingEquation {
        self.rgb_equation
    }

    /// Equation for alpha.
    pub fn alpha(&self) -> BlendingEquation {
        self.alpha_equation
    }

    /// Straight alpha blending, the usual sprite setup.
    pub fn alpha_blend() -> Self {
        Self::default()
            .enable(true)
            .factor(BlendingFactor::SrcAlpha, BlendingFactor::OneMinusSrcAlpha)
    }
}

impl PartialEq for BlendingState {
    fn eq(&self, other: &Self) -> bool {
        if !self.enabled && !other.enabled {
            return true;
        }
        self.enabled == other.enabled
            && self.color_mask == other.color_mask
            && self.src_rgb_factor == other.src_rgb_factor
            && self.src_alpha_factor == other.src_alpha_factor
            && self.dst_rgb_factor == other.dst_rgb_factor
            && self.dst_alpha_factor == other.dst_alpha_factor
            && self.rgb_equation == other.rgb_equation
            && self.alpha_equation == other.alpha_equation
    }
}

impl Eq for BlendingState {}

/// A value given either once for both color and alpha, or per channel group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum RgbAlpha<T> {
    Both(T),
    Split { rgb: T, alpha: T },
}

impl<T: Copy + PartialEq> RgbAlpha<T> {
    fn new(rgb: T, alpha: T) -> Self {
        if rgb == alpha {
            RgbAlpha::Both(rgb)
        } else {
            RgbAlpha::Split { rgb, alpha }
        }
    }

    fn split(self) -> (T, T) {
        match self {
            RgbAlpha::Both(v) => (v, v),
            RgbAlpha::Split { rgb, alpha } => (rgb, alpha),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BlendingStateDesc {
    enable: bool,
    color_mask: ColorMask,
    src_factor: RgbAlpha<BlendingFactor>,
    dst_factor: RgbAlpha<BlendingFactor>,
    equation: RgbAlpha<BlendingEquation>,
}

impl Default for BlendingStateDesc {
    fn default() -> Self {
        BlendingState::default().into()
    }
}

impl From<BlendingState> for BlendingStateDesc {
    fn from(state: BlendingState) -> Self {
        Self {
            enable: state.enabled,
            color_mask: state.color_mask,
            src_factor: RgbAlpha::new(state.src_rgb_factor, state.src_alpha_factor),
            dst_factor: RgbAlpha::new(state.dst_rgb_factor, state.dst_alpha_factor),
            equation: RgbAlpha::new(state.rgb_equation, state.alpha_equation),
        }
    }
}

impl From<BlendingStateDesc> for BlendingState {
    fn from(desc: BlendingStateDesc) -> Self {
        let (src_rgb, src_alpha) = desc.src_factor.split();
        let (dst_rgb, dst_alpha) = desc.dst_factor.split();
        let (rgb_eq, alpha_eq) = desc.equation.split();
        BlendingState::default()
            .enable(desc.enable)
            .color_mask(desc.color_mask)
            .rgb_factor(src_rgb, dst_rgb)
            .alpha_factor(src_alpha, dst_alpha)
            .rgb_equation(rgb_eq)
            .alpha_equation(alpha_eq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_mask_names() {
        assert_eq!(ColorMask::EMPTY.name(), "none");
        assert_eq!(ColorMask::RGBA.name(), "rgba");
        assert_eq!((ColorMask::R | ColorMask::A).name(), "ra");
        assert_eq!(ColorMask::from_name("gba"), Some(ColorMask::G | ColorMask::B | ColorMask::A));
        assert_eq!(ColorMask::from_name("none"), Some(ColorMask::EMPTY));
        assert_eq!(ColorMask::from_name("ar"), None);
        assert_eq!(ColorMask::from_name("rr"), None);
        assert_eq!(ColorMask::from_name("x"), None);
        for bits in 0..16u8 {
            let mask = ColorMask::from_bits_truncate(bits);
            assert_eq!(ColorMask::from_name(&mask.name()), Some(mask));
        }
    }

    #[test]
    fn disabled_states_are_equal() {
        let a = BlendingState::default().factor(BlendingFactor::SrcAlpha, BlendingFactor::One);
        assert_eq!(a, BlendingState::default());
        assert_ne!(a.enable(true), BlendingState::default().enable(true));
    }

    #[test]
    fn factors_accept_string_or_split_form() {
        let json = r#"{
            "enable": true,
            "color_mask": "rgb",
            "src_factor": "src_alpha",
            "dst_factor": { "rgb": "one_minus_src_alpha", "alpha": "one" },
            "equation": "reverse_subtract"
        }"#;
        let state: BlendingState = serde_json::from_str(json).expect("valid blending state");
        assert!(state.enabled());
        assert_eq!(state.mask(), ColorMask::RGB);
        assert_eq!(state.src_rgb(), BlendingFactor::SrcAlpha);
        assert_eq!(state.src_alpha(), BlendingFactor::SrcAlpha);
        assert_eq!(state.dst_rgb(), BlendingFactor::OneMinusSrcAlpha);
        assert_eq!(state.dst_alpha(), BlendingFactor::One);
        assert_eq!(state.alpha(), BlendingEquation::ReverseSubtract);
    }

    #[test]
    fn serialized_form_collapses_equal_pairs() {
        let value = serde_json::to_value(BlendingState::alpha_blend()).expect("serializable");
        assert_eq!(value["src_factor"], "src_alpha");
        assert_eq!(value["color_mask"], "rgba");
        assert_eq!(value["enable"], true);
    }
}
