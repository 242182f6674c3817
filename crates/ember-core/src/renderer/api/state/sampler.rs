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

//! Texture sampling state and per-scope sampler blocks.

use super::enums::{SamplerFilter, SamplerWrap};
use crate::renderer::api::resource::Texture;
use crate::utils::StrHash;

/// The maximum number of samplers in one [`SamplerBlock`].
pub const MAX_SAMPLERS: usize = 4;

/// A texture and the way it is sampled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplerState {
    texture: Option<Texture>,
    s_wrap: SamplerWrap,
    t_wrap: SamplerWrap,
    min_filter: SamplerFilter,
    mag_filter: SamplerFilter,
}

impl SamplerState {
    /// Creates a state sampling `texture` with default wrap and filters.
    pub fn new(texture: Texture) -> Self {
        Self::default().texture(Some(texture))
    }

    /// Sets the sampled texture.
    pub fn texture(mut self, texture: Option<Texture>) -> Self {
        self.texture = texture;
        self
    }

    /// Sets both wrap modes.
    pub fn wrap(self, wrap: SamplerWrap) -> Self {
        self.s_wrap(wrap).t_wrap(wrap)
    }

    /// Sets the horizontal wrap mode.
    pub fn s_wrap(mut self, wrap: SamplerWrap) -> Self {
        self.s_wrap = wrap;
        self
    }

    /// Sets the vertical wrap mode.
    pub fn t_wrap(mut self, wrap: SamplerWrap) -> Self {
        self.t_wrap = wrap;
        self
    }

    /// Sets both filters.
    pub fn filter(self, filter: SamplerFilter) -> Self {
        self.min_filter(filter).mag_filter(filter)
    }

    /// Sets the minification filter.
    pub fn min_filter(mut self, filter: SamplerFilter) -> Self {
        self.min_filter = filter;
        self
    }

    /// Sets the magnification filter.
    pub fn mag_filter(mut self, filter: SamplerFilter) -> Self {
        self.mag_filter = filter;
        self
    }

    /// The sampled texture.
    pub fn sampled_texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Horizontal wrap mode.
    pub fn s_wrap_mode(&self) -> SamplerWrap {
        self.s_wrap
    }

    /// Vertical wrap mode.
    pub fn t_wrap_mode(&self) -> SamplerWrap {
        self.t_wrap
    }

    /// Minification filter.
    pub fn min_filter_mode(&self) -> SamplerFilter {
        self.min_filter
    }

    /// Magnification filter.
    pub fn mag_filter_mode(&self) -> SamplerFilter {
        self.mag_filter
    }
}

/// Up to [`MAX_SAMPLERS`] named samplers bound together at one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplerBlock {
    entries: Vec<(StrHash, SamplerState)>,
}

impl SamplerBlock {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`bind`](Self::bind).
    pub fn with(mut self, name: impl Into<StrHash>, sampler: SamplerState) -> Self {
        self.bind(name, sampler);
        self
    }

    /// Binds `sampler` under `name`, replacing an existing binding of that name.
    ///
    /// A fifth distinct name is dropped with an error.
    pub fn bind(&mut self, name: impl Into<StrHash>, sampler: SamplerState) -> &mut Self {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            entry.1 = sampler;
        } else if self.entries.len() < MAX_SAMPLERS {
            self.entries.push((name, sampler));
        } else {
            debug_assert!(false, "sampler block is limited to {MAX_SAMPLERS} samplers");
            log::error!("Sampler block: {name:?} dropped, {MAX_SAMPLERS} samplers max");
        }
        self
    }

    /// The sampler bound under `name`.
    pub fn sampler(&self, name: impl Into<StrHash>) -> Option<&SamplerState> {
        let name = name.into();
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, sampler)| sampler)
    }

    /// Number of bound samplers.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (StrHash, &SamplerState)> {
        self.entries.iter().map(|(name, sampler)| (*name, sampler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::UVec2;
    use crate::renderer::api::declaration::{PixelDeclaration, PixelType};
    use crate::renderer::api::resource::{ReleaseQueue, TextureId};

    #[test]
    fn bind_replaces_existing_name() {
        let queue = ReleaseQueue::new();
        let tex = Texture::new(
            TextureId(1),
            UVec2::new(4, 4),
            PixelDeclaration::new(PixelType::Rgba8),
            &queue,
        );
        let mut block = SamplerBlock::new().with("u_texture", SamplerState::default());
        block.bind("u_texture", SamplerState::new(tex.clone()).filter(SamplerFilter::Nearest));
        assert_eq!(block.count(), 1);
        let bound = block.sampler("u_texture").expect("bound sampler");
        assert_eq!(bound.sampled_texture(), Some(&tex));
        assert_eq!(bound.min_filter_mode(), SamplerFilter::Nearest);
        assert_eq!(bound.s_wrap_mode(), SamplerWrap::Repeat);
    }

    #[test]
    fn keeps_insertion_order() {
        let block = SamplerBlock::new()
            .with("b", SamplerState::default())
            .with("a", SamplerState::default().wrap(SamplerWrap::Clamp));
        let names: Vec<StrHash> = block.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![StrHash::new("b"), StrHash::new("a")]);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "limited to 4 samplers"))]
    fn fifth_sampler_is_rejected() {
        let mut block = SamplerBlock::new();
        for name in ["s0", "s1", "s2", "s3", "s4"] {
            block.bind(name, SamplerState::default());
        }
        assert_eq!(block.count(), MAX_SAMPLERS);
        assert!(block.sampler("s4").is_none());
    }
}
