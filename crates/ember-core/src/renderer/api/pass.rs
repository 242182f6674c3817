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

//! Render pass descriptors.

use super::resource::RenderTarget;
use super::state::StateBlock;
use crate::math::{LinearRgba, URect};
use serde::{Deserialize, Serialize};

/// What happens to an attachment when a pass begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOp {
    /// Keep the previous contents.
    #[default]
    Load,
    /// Clear to the attachment clear value.
    Clear,
}

/// What happens to an attachment when a pass ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOp {
    /// Keep the rendered contents.
    #[default]
    Store,
    /// The contents may be thrown away.
    Discard,
}

/// Load and store behavior of one attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentOps<T> {
    /// Load operation.
    pub load: LoadOp,
    /// Store operation.
    pub store: StoreOp,
    /// Value written by [`LoadOp::Clear`].
    pub clear_value: T,
}

impl<T> AttachmentOps<T> {
    const fn new(clear_value: T) -> Self {
        Self {
            load: LoadOp::Load,
            store: StoreOp::Store,
            clear_value,
        }
    }

    /// `true` when the attachment is cleared at the start of the pass.
    pub fn clears(&self) -> bool {
        self.load == LoadOp::Clear
    }
}

/// Everything the render module needs to know to begin a pass.
///
/// Every attachment defaults to load/store. The clear values are transparent
/// black, depth 1.0 and stencil 0.
#[derive(Debug, Clone)]
pub struct RenderPassDesc {
    target: Option<RenderTarget>,
    viewport: URect,
    depth_range: (f32, f32),
    states: StateBlock,
    color: AttachmentOps<LinearRgba>,
    depth: AttachmentOps<f32>,
    stencil: AttachmentOps<u8>,
}

impl RenderPassDesc {
    /// A pass on the default framebuffer covering `viewport`.
    pub fn new(viewport: URect) -> Self {
        Self {
            target: None,
            viewport,
            depth_range: (0.0, 1.0),
            states: StateBlock::default(),
            color: AttachmentOps::new(LinearRgba::TRANSPARENT),
            depth: AttachmentOps::new(1.0),
            stencil: AttachmentOps::new(0),
        }
    }

    /// A pass on `target`, with a viewport covering all of it.
    pub fn with_target(target: RenderTarget) -> Self {
        Self::new(URect::from_size(target.size())).target(Some(target))
    }

    /// Sets the render target. `None` is the default framebuffer.
    pub fn target(mut self, target: Option<RenderTarget>) -> Self {
        self.target = target;
        self
    }

    /// Sets the viewport.
    pub fn viewport(mut self, viewport: URect) -> Self {
        self.viewport = viewport;
        self
    }

    /// Sets the depth range.
    pub fn depth_range(mut self, near: f32, far: f32) -> Self {
        self.depth_range = (near, far);
        self
    }

    /// Sets the baseline states.
    pub fn states(mut self, states: StateBlock) -> Self {
        self.states = states;
        self
    }

    /// Clears color to `value`.
    pub fn color_clear(mut self, value: LinearRgba) -> Self {
        self.color.load = LoadOp::Clear;
        self.color.clear_value = value;
        self
    }

    /// Keeps the previous color contents.
    pub fn color_load(mut self) -> Self {
        self.color.load = LoadOp::Load;
        self
    }

    /// Keeps the rendered color.
    pub fn color_store(mut self) -> Self {
        self.color.store = StoreOp::Store;
        self
    }

    /// Throws the rendered color away.
    pub fn color_discard(mut self) -> Self {
        self.color.store = StoreOp::Discard;
        self
    }

    /// Clears depth to `value`.
    pub fn depth_clear(mut self, value: f32) -> Self {
        self.depth.load = LoadOp::Clear;
        self.depth.clear_value = value;
        self
    }

    /// Keeps the previous depth contents.
    pub fn depth_load(mut self) -> Self {
        self.depth.load = LoadOp::Load;
        self
    }

    /// Keeps the rendered depth.
    pub fn depth_store(mut self) -> Self {
        self.depth.store = StoreOp::Store;
        self
    }

    /// Throws the rendered depth away.
    pub fn depth_discard(mut self) -> Self {
        self.depth.store = StoreOp::Discard;
        self
    }

    /// Clears stencil to `value`.
    pub fn stencil_clear(mut self, value: u8) -> Self {
        self.stencil.load = LoadOp::Clear;
        self.stencil.clear_value = value;
        self
    }

    /// Keeps the previous stencil contents.
    pub fn stencil_load(mut self) -> Self {
        self.stencil.load = LoadOp::Load;
        self
    }

    /// Keeps the rendered stencil.
    pub fn stencil_store(mut self) -> Self {
        self.stencil.store = StoreOp::Store;
        self
    }

    /// Throws the rendered stencil away.
    pub fn stencil_discard(mut self) -> Self {
        self.stencil.store = StoreOp::Discard;
        self
    }

    /// The render target, `None` for the default framebuffer.
    pub fn render_target(&self) -> Option<&RenderTarget> {
        self.target.as_ref()
    }

    /// The viewport.
    pub fn viewport_rect(&self) -> URect {
        self.viewport
    }

    /// The depth range as `(near, far)`.
    pub fn depth_range_values(&self) -> (f32, f32) {
        self.depth_range
    }

    /// The baseline states.
    pub fn state_block(&self) -> &StateBlock {
        &self.states
    }

    /// Color attachment behavior.
    pub fn color_ops(&self) -> &AttachmentOps<LinearRgba> {
        &self.color
    }

    /// Depth attachment behavior.
    pub fn depth_ops(&self) -> &AttachmentOps<f32> {
        &self.depth
    }

    /// Stencil attachment behavior.
    pub fn stencil_ops(&self) -> &AttachmentOps<u8> {
        &self.stencil
    }
}
