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

//! The part of the window the render module talks to.

use crate::math::UVec2;

/// A trait that abstracts the presentable surface of a window.
///
/// Any windowing backend (glfw, winit + glutin, SDL2...) implements this to let
/// the render module present frames. The render core only ever calls
/// [`swap_buffers`](FrameSurface::swap_buffers) and queries the framebuffer size.
pub trait FrameSurface {
    /// Presents the back buffer.
    fn swap_buffers(&mut self);

    /// Returns the size of the default framebuffer in pixels.
    fn framebuffer_size(&self) -> UVec2;
}

/// A surface that presents nowhere, for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct OffscreenSurface {
    size: UVec2,
    swaps: u64,
}

impl OffscreenSurface {
    /// Creates an offscreen surface of the given size.
    pub fn new(size: UVec2) -> Self {
        Self { size, swaps: 0 }
    }

    /// How many times the buffers were swapped.
    pub fn swap_count(&self) -> u64 {
        self.swaps
    }
}

impl FrameSurface for OffscreenSurface {
    fn swap_buffers(&mut self) {
        self.swaps += 1;
    }

    fn framebuffer_size(&self) -> UVec2 {
        self.size
    }
}
