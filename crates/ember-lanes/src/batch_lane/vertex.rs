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

//! Vertex types the batcher can store.

use bytemuck::{Pod, Zeroable};
use ember_core::math::{align_up, Color32, Vec2, Vec3};
use ember_core::renderer::api::VertexDeclaration;

/// A vertex that can be written into batch regions.
///
/// Vertices are stored at a stride of `size_of::<Self>()` rounded up to 16
/// bytes. The declaration describes the attributes; the render module pads it
/// to the stride before interning it.
pub trait BatchVertex: Pod {
    /// The attribute layout of this vertex type.
    fn declaration() -> VertexDeclaration;
}

/// Byte distance between two vertices of type `V` in a batch region.
pub const fn vertex_stride<V: BatchVertex>() -> usize {
    align_up(std::mem::size_of::<V>(), 16)
}

/// `V`'s declaration padded to the batch stride.
pub fn batch_declaration<V: BatchVertex>() -> VertexDeclaration {
    let decl = V::declaration();
    let stride = vertex_stride::<V>();
    debug_assert!(
        decl.bytes_per_vertex() <= stride,
        "declaration is larger than the vertex type"
    );
    match stride.checked_sub(decl.bytes_per_vertex()) {
        Some(padding) if padding > 0 => decl.skip_bytes(padding),
        _ => decl,
    }
}

/// The vertex of sprites and every built-in primitive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SpriteVertex {
    /// Position, `z` is usually 0.
    pub position: Vec3,
    /// Texture coordinates.
    pub uv: Vec2,
    /// Tint, normalized in the shader.
    pub color: Color32,
}

impl SpriteVertex {
    /// Creates a vertex in the `z = 0` plane.
    pub const fn new(position: Vec2, uv: Vec2, color: Color32) -> Self {
        Self {
            position: Vec3::from_vec2(position, 0.0),
            uv,
            color,
        }
    }
}

impl BatchVertex for SpriteVertex {
    fn declaration() -> VertexDeclaration {
        VertexDeclaration::new()
            .add_attribute::<f32>("a_vertex", 1, 3)
            .add_attribute::<f32>("a_st", 1, 2)
            .add_attribute::<u8>("a_tint", 1, 4)
            .normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_stride_is_padded() {
        assert_eq!(std::mem::size_of::<SpriteVertex>(), 24);
        assert_eq!(vertex_stride::<SpriteVertex>(), 32);
        let decl = batch_declaration::<SpriteVertex>();
        assert_eq!(decl.bytes_per_vertex(), 32);
        assert_eq!(decl.attribute_count(), 3);
        assert_eq!(SpriteVertex::declaration().bytes_per_vertex(), 24);
    }
}
