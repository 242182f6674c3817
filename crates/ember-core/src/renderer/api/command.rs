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

//! The commands executed inside a render pass.

use super::material::Material;
use super::resource::{ConstBuffer, IndexBuffer, VertexAttribs, VertexBuffer};
use super::state::{BlendingState, CullingState, DepthState, StencilState};
use crate::math::URect;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// The maximum number of vertex buffers bound by one command.
pub const MAX_VERTEX_BUFFERS: usize = 4;

/// How vertices assemble into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Independent triangles.
    #[default]
    Triangles,
    /// A triangle strip.
    TrianglesStrip,
}

/// One vertex buffer slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexBufferBinding {
    /// The buffer.
    pub buffer: VertexBuffer,
    /// Layout of the vertices in the buffer.
    pub attribs: VertexAttribs,
    /// Byte offset of the first vertex.
    pub offset: usize,
}

/// Binds up to [`MAX_VERTEX_BUFFERS`] vertex buffers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindVertexBuffersCommand {
    slots: [Option<VertexBufferBinding>; MAX_VERTEX_BUFFERS],
}

impl BindVertexBuffersCommand {
    /// Creates a command with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills slot `index`. Out-of-range slots are ignored with an error.
    pub fn bind(
        mut self,
        index: usize,
        buffer: VertexBuffer,
        attribs: VertexAttribs,
        offset: usize,
    ) -> Self {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(VertexBufferBinding {
                    buffer,
                    attribs,
                    offset,
                })
            }
            None => {
                debug_assert!(false, "vertex buffer slot {index} out of range");
                log::error!("Vertex buffer slot {index} ignored, {MAX_VERTEX_BUFFERS} slots max");
            }
        }
        self
    }

    /// The binding in slot `index`.
    pub fn binding(&self, index: usize) -> Option<&VertexBufferBinding> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Every slot, empty ones included.
    pub fn slots(&self) -> &[Option<VertexBufferBinding>; MAX_VERTEX_BUFFERS] {
        &self.slots
    }
}

/// A non-indexed draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCommand {
    /// Primitive topology.
    pub topology: Topology,
    /// Index of the first vertex.
    pub first_vertex: u32,
    /// Number of vertices.
    pub vertex_count: u32,
    /// Per-draw constants.
    pub constants: Option<ConstBuffer>,
}

impl DrawCommand {
    /// Draws `vertex_count` vertices as triangles.
    pub fn new(vertex_count: u32) -> Self {
        Self {
            topology: Topology::Triangles,
            first_vertex: 0,
            vertex_count,
            constants: None,
        }
    }
}

/// An indexed draw. The index type comes from the buffer declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawIndexedCommand {
    /// Primitive topology.
    pub topology: Topology,
    /// The index buffer.
    pub indices: IndexBuffer,
    /// Byte offset of the first index.
    pub index_offset: usize,
    /// Number of indices.
    pub index_count: u32,
    /// Per-draw constants.
    pub constants: Option<ConstBuffer>,
}

impl DrawIndexedCommand {
    /// Draws every index of `indices` as triangles.
    pub fn new(indices: IndexBuffer) -> Self {
        let index_count = indices.index_count() as u32;
        Self {
            topology: Topology::Triangles,
            indices,
            index_offset: 0,
            index_count,
            constants: None,
        }
    }

    /// Sets the topology.
    pub fn topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    /// Draws `count` indices starting at byte `offset`.
    pub fn range(mut self, offset: usize, count: u32) -> Self {
        self.index_offset = offset;
        self.index_count = count;
        self
    }

    /// Sets the per-draw constants.
    pub fn constants(mut self, constants: Option<ConstBuffer>) -> Self {
        self.constants = constants;
        self
    }
}

/// A render command.
///
/// State commands carrying `None` restore the render pass baseline for that
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Command {
    /// Does nothing, valid outside a pass.
    #[default]
    Zero,
    /// Binds vertex buffers.
    BindVertexBuffers(BindVertexBuffersCommand),
    /// Binds a material.
    Material(Rc<Material>),
    /// Sets the scissor rectangle, `None` disables the scissor test.
    Scissor(Option<URect>),
    /// Overrides blending.
    BlendingState(Option<BlendingState>),
    /// Overrides culling.
    CullingState(Option<CullingState>),
    /// Overrides the stencil test.
    StencilState(Option<StencilState>),
    /// Overrides the depth test.
    DepthState(Option<DepthState>),
    /// Draws vertices.
    Draw(DrawCommand),
    /// Draws indexed vertices.
    DrawIndexed(DrawIndexedCommand),
}

impl From<BindVertexBuffersCommand> for Command {
    fn from(command: BindVertexBuffersCommand) -> Self {
        Command::BindVertexBuffers(command)
    }
}

impl From<Rc<Material>> for Command {
    fn from(material: Rc<Material>) -> Self {
        Command::Material(material)
    }
}

impl From<DrawCommand> for Command {
    fn from(command: DrawCommand) -> Self {
        Command::Draw(command)
    }
}

impl From<DrawIndexedCommand> for Command {
    fn from(command: DrawIndexedCommand) -> Self {
        Command::DrawIndexed(command)
    }
}

/// An ordered list of commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBlock {
    commands: Vec<Command>,
}

impl CommandBlock {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command.
    pub fn add_command(&mut self, command: impl Into<Command>) -> &mut Self {
        self.commands.push(command.into());
        self
    }

    /// Builder form of [`add_command`](Self::add_command).
    pub fn with(mut self, command: impl Into<Command>) -> Self {
        self.add_command(command);
        self
    }

    /// The commands in recording order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// `true` when the block is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Removes every command.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl<'a> IntoIterator for &'a CommandBlock {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_keeps_order() {
        let block = CommandBlock::new()
            .with(Command::Scissor(None))
            .with(DrawCommand::new(3))
            .with(Command::Zero);
        assert_eq!(block.len(), 3);
        assert!(matches!(block.commands()[1], Command::Draw(ref d) if d.vertex_count == 3));
        assert_eq!(block.commands()[2], Command::Zero);
    }

    #[test]
    fn empty_vertex_slots() {
        let command = BindVertexBuffersCommand::new();
        assert!(command.slots().iter().all(Option::is_none));
        assert!(command.binding(7).is_none());
    }
}
