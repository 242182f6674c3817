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

//! A CPU-side mirror of the GL global state.

use gl::types::{GLenum, GLuint};

/// A value last sent to the driver.
///
/// Setting a value equal to the cached one skips the GL call. An empty cache
/// always issues the call.
#[derive(Debug)]
pub(super) struct Cached<T>(Option<T>);

impl<T: PartialEq> Cached<T> {
    pub(super) const fn empty() -> Self {
        Self(None)
    }

    /// Forces the next [`set_if_invalid`](Self::set_if_invalid) to run.
    pub(super) fn invalidate(&mut self) {
        self.0 = None;
    }

    /// Runs `f` and caches `value` unless `value` is already cached.
    ///
    /// Returns `true` when `f` ran.
    pub(super) fn set_if_invalid(&mut self, value: T, f: impl FnOnce()) -> bool {
        match &self.0 {
            Some(cached) if *cached == value => false,
            _ => {
                f();
                self.0 = Some(value);
                true
            }
        }
    }

    /// `true` when `value` is cached.
    pub(super) fn holds(&self, value: &T) -> bool {
        self.0.as_ref() == Some(value)
    }
}

/// Bindings the backend changes behind the render module's back.
///
/// Resource creation binds objects to fill them. The backend restores the
/// bindings the render module set, so they are tracked here.
#[derive(Debug)]
pub(super) struct GlState {
    pub(super) program: Cached<GLuint>,
    pub(super) array_buffer: Cached<GLuint>,
    pub(super) active_unit: Cached<GLuint>,
    /// `(target, texture)` bound on each texture unit.
    pub(super) units: Vec<(GLenum, GLuint)>,
    pub(super) framebuffer: GLuint,
    /// Bit `i` is set when attribute location `i` is enabled.
    pub(super) enabled_attributes: u32,
}

impl GlState {
    pub(super) fn new(unit_count: usize, framebuffer: GLuint) -> Self {
        Self {
            program: Cached::empty(),
            array_buffer: Cached::empty(),
            active_unit: Cached::empty(),
            units: vec![(gl::TEXTURE_2D, 0); unit_count.max(1)],
            framebuffer,
            enabled_attributes: 0,
        }
    }

    /// Forgets framebuffer `handle` before it is deleted. Returns `true` when it
    /// was bound, in which case `default` is now tracked and must be bound.
    pub(super) fn release_framebuffer(&mut self, handle: GLuint, default: GLuint) -> bool {
        if self.framebuffer != handle || handle == default {
            return false;
        }
        self.framebuffer = default;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_skips_equal_values() {
        let mut cache = Cached::empty();
        let mut calls = 0;
        assert!(cache.set_if_invalid(3u32, || calls += 1));
        assert!(!cache.set_if_invalid(3, || calls += 1));
        assert!(cache.set_if_invalid(4, || calls += 1));
        assert_eq!(calls, 2);
        assert!(cache.holds(&4));

        cache.invalidate();
        assert!(!cache.holds(&4));
        assert!(cache.set_if_invalid(4, || calls += 1));
        assert_eq!(calls, 3);
    }

    #[test]
    fn state_has_at_least_one_unit() {
        let state = GlState::new(0, 0);
        assert_eq!(state.units.len(), 1);
        assert_eq!(state.enabled_attributes, 0);
    }

    #[test]
    fn test_releasing_the_bound_framebuffer_falls_back_to_default() {
        // --- 1. ARRANGE ---
        let mut state = GlState::new(1, 0);
        state.framebuffer = 7;

        // --- 2. ACT ---
        let other = state.release_framebuffer(9, 0);
        let bound = state.release_framebuffer(7, 0);

        // --- 3. ASSERT ---
        assert!(!other, "an unbound framebuffer needs no rebind");
        assert!(bound, "deleting the bound framebuffer needs a rebind");
        assert_eq!(
            state.framebuffer, 0,
            "the default framebuffer is tracked after the delete"
        );
        assert!(
            !state.release_framebuffer(0, 0),
            "the default framebuffer is never released"
        );
    }
}
