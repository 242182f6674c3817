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

//! Executes render commands against the open pass.

use super::render::Render;
use ember_core::renderer::api::{
    Command, CommandBlock, ConstBuffer, DrawCommand, DrawIndexedCommand, Material, ScopeType,
    Shader,
};
use ember_core::renderer::{RenderBackend, RenderError, ResourceError};

impl<B: RenderBackend> Render<B> {
    /// Executes one command.
    ///
    /// Every command but [`Command::Zero`] needs an open pass.
    pub fn execute(&mut self, command: &Command) -> Result<(), RenderError> {
        if matches!(command, Command::Zero) {
            return Ok(());
        }
        let pass = self.pass.as_ref().ok_or(RenderError::NoActivePass)?;
        let baseline = pass.baseline;
        match command {
            Command::Zero => {}
            Command::BindVertexBuffers(bind) => self.shadow.set_vertex_buffers(bind.slots()),
            Command::Material(material) => self.bind_material(material)?,
            Command::Scissor(rect) => self.shadow.set_scissor(&mut self.backend, *rect),
            Command::BlendingState(state) => {
                let state = state.as_ref().unwrap_or(baseline.blending_state());
                self.shadow.set_blending(&mut self.backend, state);
            }
            Command::CullingState(state) => {
                let state = state.as_ref().unwrap_or(baseline.culling_state());
                self.shadow.set_culling(&mut self.backend, state);
            }
            Command::StencilState(state) => {
                let state = state.as_ref().unwrap_or(baseline.stencil_state());
                self.shadow.set_stencil(&mut self.backend, state);
            }
            Command::DepthState(state) => {
                let state = state.as_ref().unwrap_or(baseline.depth_state());
                self.shadow.set_depth(&mut self.backend, state);
            }
            Command::Draw(draw) => self.draw(draw)?,
            Command::DrawIndexed(draw) => self.draw_indexed(draw)?,
        }
        Ok(())
    }

    /// Executes `block` in order, stopping at the first error.
    pub fn execute_all(&mut self, block: &CommandBlock) -> Result<(), RenderError> {
        block
            .commands()
            .iter()
            .try_for_each(|command| self.execute(command))
    }

    fn bind_material(&mut self, material: &Material) -> Result<(), RenderError> {
        let Some(pass) = self.pass.as_ref() else {
            return Err(RenderError::NoActivePass);
        };
        let shader = material.shader();
        self.shadow.use_program(&mut self.backend, shader);

        for sampler in shader.samplers() {
            let block = match sampler.scope {
                ScopeType::RenderPass => &pass.samplers,
                ScopeType::Material => material.sampler_block(),
                ScopeType::DrawCommand => {
                    log::warn!(
                        "Sampler '{}' has draw scope, draw samplers are not bound",
                        sampler.name
                    );
                    continue;
                }
            };
            if let Some(state) = block.sampler(sampler.name_hash) {
                self.shadow.bind_sampler(
                    &mut self.backend,
                    sampler.unit,
                    sampler.sampler_type,
                    state,
                );
            }
        }

        if let Some(constants) = &pass.constants {
            if shader.block(ScopeType::RenderPass).is_some() {
                check_compatible(constants, shader)?;
                self.shadow
                    .bind_constants(&mut self.backend, shader, constants);
            }
        }
        if let Some(constants) = material.const_buffer() {
            check_compatible(constants, shader)?;
            self.shadow
                .bind_constants(&mut self.backend, shader, constants);
        }

        let blending = material
            .blending_state()
            .unwrap_or(pass.baseline.blending_state());
        self.shadow.set_blending(&mut self.backend, blending);
        let culling = material
            .culling_state()
            .unwrap_or(pass.baseline.culling_state());
        self.shadow.set_culling(&mut self.backend, culling);
        Ok(())
    }

    fn bind_draw_constants(&mut self, constants: Option<&ConstBuffer>) -> Result<(), RenderError> {
        let Some(constants) = constants else {
            return Ok(());
        };
        let Some(shader) = self.shadow.shader().cloned() else {
            return Err(RenderError::IncompatibleConstBuffer);
        };
        if constants.scope() != ScopeType::DrawCommand {
            return Err(RenderError::IncompatibleConstBuffer);
        }
        check_compatible(constants, &shader)?;
        self.shadow
            .bind_constants(&mut self.backend, &shader, constants);
        Ok(())
    }

    fn draw(&mut self, draw: &DrawCommand) -> Result<(), RenderError> {
        self.check_vertex_range(draw)?;
        self.bind_draw_constants(draw.constants.as_ref())?;
        self.shadow.commit_vertices(&mut self.backend);
        self.backend
            .draw(draw.topology, draw.first_vertex, draw.vertex_count);
        self.stats.draw_calls += 1;
        Ok(())
    }

    fn draw_indexed(&mut self, draw: &DrawIndexedCommand) -> Result<(), RenderError> {
        check_index_range(draw)?;
        self.bind_draw_constants(draw.constants.as_ref())?;
        self.shadow.commit_vertices(&mut self.backend);
        self.backend.draw_indexed(
            draw.topology,
            draw.indices.id(),
            draw.indices.decl().index_type(),
            draw.index_offset,
            draw.index_count,
        );
        self.stats.draw_calls += 1;
        Ok(())
    }

    /// Every pending vertex buffer must hold the vertices the draw reads.
    fn check_vertex_range(&self, draw: &DrawCommand) -> Result<(), RenderError> {
        if draw.vertex_count == 0 {
            return Ok(());
        }
        let last = draw.first_vertex as usize + draw.vertex_count as usize;
        for (slot, binding) in self.shadow.pending_vertices() {
            let stride = binding.attribs.decl().bytes_per_vertex();
            if stride == 0 {
                continue;
            }
            let end = last
                .checked_mul(stride)
                .and_then(|bytes| bytes.checked_add(binding.offset));
            if !end.is_some_and(|end| end <= binding.buffer.size()) {
                log::error!(
                    "Draw of vertices {}..{last} overruns the {} byte buffer in slot {slot}",
                    draw.first_vertex,
                    binding.buffer.size()
                );
                return Err(ResourceError::OutOfBounds.into());
            }
        }
        Ok(())
    }
}

/// The index range must start on an index boundary and end inside the buffer.
fn check_index_range(draw: &DrawIndexedCommand) -> Result<(), RenderError> {
    let bytes_per_index = draw.indices.decl().bytes_per_index();
    if draw.index_offset % bytes_per_index != 0 {
        log::error!(
            "Index offset {} is not a multiple of {bytes_per_index}",
            draw.index_offset
        );
        return Err(ResourceError::MisalignedRegion.into());
    }
    let end = (draw.index_count as usize)
        .checked_mul(bytes_per_index)
        .and_then(|bytes| bytes.checked_add(draw.index_offset));
    if !end.is_some_and(|end| end <= draw.indices.size()) {
        log::error!(
            "Draw of {} indices at byte {} overruns the {} byte index buffer",
            draw.index_count,
            draw.index_offset,
            draw.indices.size()
        );
        return Err(ResourceError::OutOfBounds.into());
    }
    Ok(())
}

fn check_compatible(constants: &ConstBuffer, shader: &Shader) -> Result<(), RenderError> {
    if constants.is_compatible_with(shader) {
        Ok(())
    } else {
        log::error!(
            "Constant buffer of {:?} scope does not match the program's block",
            constants.scope()
        );
        Err(RenderError::IncompatibleConstBuffer)
    }
}
