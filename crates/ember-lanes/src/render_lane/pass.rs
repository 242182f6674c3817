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

//! Render pass control: begin, end and present.

use super::render::Render;
use ember_core::renderer::api::{
    ConstBuffer, RenderPassDesc, SamplerBlock, ScopeType, StateBlock, StoreOp,
};
use ember_core::renderer::{RenderBackend, RenderError};

/// The store operations the next [`Render::end_pass`] applies.
///
/// Between passes they rest at color store, depth and stencil discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOps {
    /// Color attachment.
    pub color: StoreOp,
    /// Depth attachment.
    pub depth: StoreOp,
    /// Stencil attachment.
    pub stencil: StoreOp,
}

impl Default for StoreOps {
    fn default() -> Self {
        Self {
            color: StoreOp::Store,
            depth: StoreOp::Discard,
            stencil: StoreOp::Discard,
        }
    }
}

/// What the executor needs from the open pass.
#[derive(Debug)]
pub(crate) struct ActivePass {
    pub(crate) baseline: StateBlock,
    pub(crate) has_color: bool,
    pub(crate) has_depth: bool,
    pub(crate) has_stencil: bool,
    pub(crate) constants: Option<ConstBuffer>,
    pub(crate) samplers: SamplerBlock,
}

impl<B: RenderBackend> Render<B> {
    /// Opens a render pass, ending the current one first.
    ///
    /// `constants` must be a render-pass scope buffer. It and `samplers` are
    /// bound to every program a material brings in during the pass.
    pub fn begin_pass(
        &mut self,
        desc: &RenderPassDesc,
        constants: Option<&ConstBuffer>,
        samplers: &SamplerBlock,
    ) -> Result<(), RenderError> {
        if constants.is_some_and(|c| c.scope() != ScopeType::RenderPass) {
            return Err(RenderError::IncompatibleConstBuffer);
        }
        if self.pass.is_some() {
            log::debug!("Render pass still open, ending it");
            self.end_pass()?;
        }

        let target = desc.render_target();
        self.shadow
            .bind_render_target(&mut self.backend, target.map(|t| t.id()));
        let (has_color, has_depth, has_stencil) = match target {
            Some(t) => (t.has_color(), t.has_depth(), t.has_stencil()),
            None => (true, true, true),
        };

        self.backend.set_viewport(desc.viewport_rect());
        let (near, far) = desc.depth_range_values();
        self.backend.set_depth_range(near, far);
        self.shadow.set_scissor(&mut self.backend, None);

        let color = desc.color_ops();
        let depth = desc.depth_ops();
        let stencil = desc.stencil_ops();
        let clear_color = (has_color && color.clears()).then_some(color.clear_value);
        let clear_depth = (has_depth && depth.clears()).then_some(depth.clear_value);
        let clear_stencil = (has_stencil && stencil.clears()).then_some(stencil.clear_value);
        if clear_color.is_some() || clear_depth.is_some() || clear_stencil.is_some() {
            self.backend.clear(clear_color, clear_depth, clear_stencil);
        }

        let baseline = *desc.state_block();
        self.shadow
            .set_depth(&mut self.backend, baseline.depth_state());
        self.shadow
            .set_stencil(&mut self.backend, baseline.stencil_state());
        self.shadow
            .set_culling(&mut self.backend, baseline.culling_state());
        self.shadow
            .set_blending(&mut self.backend, baseline.blending_state());

        self.store_ops = StoreOps {
            color: color.store,
            depth: depth.store,
            stencil: stencil.store,
        };
        self.pass = Some(ActivePass {
            baseline,
            has_color,
            has_depth,
            has_stencil,
            constants: constants.cloned(),
            samplers: samplers.clone(),
        });
        self.stats.render_pass_count += 1;
        log::trace!(
            "Render pass {} begun on {}",
            self.stats.render_pass_count,
            if target.is_some() { "render target" } else { "default framebuffer" }
        );
        Ok(())
    }

    /// Closes the open pass, discarding the attachments whose store op says
    /// so when the device can.
    pub fn end_pass(&mut self) -> Result<(), RenderError> {
        let pass = self.pass.take().ok_or(RenderError::NoActivePass)?;
        let ops = std::mem::take(&mut self.store_ops);
        if self.backend.caps().can_discard_attachments() {
            let color = pass.has_color && ops.color == StoreOp::Discard;
            let depth = pass.has_depth && ops.depth == StoreOp::Discard;
            let stencil = pass.has_stencil && ops.stencil == StoreOp::Discard;
            if color || depth || stencil {
                self.backend.discard(color, depth, stencil);
            }
        }
        log::trace!("Render pass ended");
        Ok(())
    }

    /// `true` between [`begin_pass`](Self::begin_pass) and
    /// [`end_pass`](Self::end_pass).
    pub fn is_pass_open(&self) -> bool {
        self.pass.is_some()
    }

    /// The store operations the next [`end_pass`](Self::end_pass) applies.
    pub fn pending_store_ops(&self) -> StoreOps {
        self.store_ops
    }

    /// Finishes the frame.
    ///
    /// Destroys the backend objects of dropped handles, rolls the frame
    /// statistics over and swaps the surface buffers.
    pub fn present(&mut self) -> Result<(), RenderError> {
        if self.pass.is_some() {
            return Err(RenderError::PassStillOpen);
        }
        if !self.batcher.is_empty() {
            log::warn!(
                "{} unflushed batches dropped at present",
                self.batcher.batch_count()
            );
            self.batcher.clear();
        }
        self.shadow.invalidate_bindings();
        self.release_dropped();
        self.frame_id += 1;
        self.last_stats = std::mem::take(&mut self.stats);
        log::trace!(
            "Frame {} presented: {} passes, {} draw calls",
            self.frame_id,
            self.last_stats.render_pass_count,
            self.last_stats.draw_calls
        );
        self.swap_buffers();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_ops_rest_state() {
        let ops = StoreOps::default();
        assert_eq!(ops.color, StoreOp::Store);
        assert_eq!(ops.depth, StoreOp::Discard);
        assert_eq!(ops.stencil, StoreOp::Discard);
    }
}
