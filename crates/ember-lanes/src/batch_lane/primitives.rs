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

//! Geometry the batcher knows how to write.

use super::vertex::{BatchVertex, SpriteVertex};
use super::writer::{IndexWriter, VertexWriter};
use ember_core::math::{Color32, Rect, Vec2};
use ember_core::renderer::api::Topology;

/// A piece of geometry that writes itself into a batch allocation.
pub trait BatchPrimitive {
    /// The vertex type.
    type Vertex: BatchVertex;

    /// Number of vertices written by [`write_vertices`](Self::write_vertices).
    fn vertex_count(&self) -> usize;

    /// Number of indices written by [`write_indices`](Self::write_indices).
    fn index_count(&self) -> usize;

    /// How the indices assemble.
    fn topology(&self) -> Topology {
        Topology::Triangles
    }

    /// Writes every vertex.
    fn write_vertices(&self, writer: &mut VertexWriter<'_, Self::Vertex>);

    /// Writes every index, relative to the first vertex.
    fn write_indices(&self, writer: &mut IndexWriter<'_>);
}

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 1, 2, 3];

/// An axis-aligned textured rectangle.
///
/// Vertices go bottom-left, top-left, bottom-right, top-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// Placement.
    pub position: Rect,
    /// Texture coordinates.
    pub uv: Rect,
    /// Tint.
    pub color: Color32,
}

impl Rectangle {
    /// A white rectangle showing the whole texture.
    pub fn new(position: Rect) -> Self {
        Self {
            position,
            uv: Rect::UNIT,
            color: Color32::WHITE,
        }
    }

    /// Sets the texture coordinates.
    pub fn uv(mut self, uv: Rect) -> Self {
        self.uv = uv;
        self
    }

    /// Sets the tint.
    pub fn color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }
}

fn corners(rect: &Rect) -> [Vec2; 4] {
    let p = rect.position;
    let s = rect.size;
    [
        p,
        Vec2::new(p.x, p.y + s.y),
        Vec2::new(p.x + s.x, p.y),
        p + s,
    ]
}

impl BatchPrimitive for Rectangle {
    type Vertex = SpriteVertex;

    fn vertex_count(&self) -> usize {
        4
    }

    fn index_count(&self) -> usize {
        6
    }

    fn write_vertices(&self, writer: &mut VertexWriter<'_, SpriteVertex>) {
        for (position, uv) in corners(&self.position).into_iter().zip(corners(&self.uv)) {
            writer.push(SpriteVertex::new(position, uv, self.color));
        }
    }

    fn write_indices(&self, writer: &mut IndexWriter<'_>) {
        for index in QUAD_INDICES {
            writer.push(index);
        }
    }
}

/// Border widths of a nine-patch.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Borders {
    /// Left.
    pub left: f32,
    /// Right.
    pub right: f32,
    /// Bottom.
    pub bottom: f32,
    /// Top.
    pub top: f32,
}

impl Borders {
    /// The same width on every side.
    pub const fn uniform(width: f32) -> Self {
        Self {
            left: width,
            right: width,
            bottom: width,
            top: width,
        }
    }
}

/// A rectangle cut in a 3x3 grid whose corners keep their size while the
/// edges and center stretch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NinePatch {
    /// Placement.
    pub position: Rect,
    /// Texture coordinates of the whole patch.
    pub uv: Rect,
    /// Border widths in placement units.
    pub borders: Borders,
    /// Border widths in texture coordinates.
    pub uv_borders: Borders,
    /// Tint.
    pub color: Color32,
}

fn grid_lines(start: f32, extent: f32, low: f32, high: f32) -> [f32; 4] {
    [start, start + low, start + extent - high, start + extent]
}

impl BatchPrimitive for NinePatch {
    type Vertex = SpriteVertex;

    fn vertex_count(&self) -> usize {
        16
    }

    fn index_count(&self) -> usize {
        54
    }

    fn write_vertices(&self, writer: &mut VertexWriter<'_, SpriteVertex>) {
        let (p, b) = (&self.position, &self.borders);
        let xs = grid_lines(p.position.x, p.size.x, b.left, b.right);
        let ys = grid_lines(p.position.y, p.size.y, b.bottom, b.top);
        let (t, tb) = (&self.uv, &self.uv_borders);
        let us = grid_lines(t.position.x, t.size.x, tb.left, tb.right);
        let vs = grid_lines(t.position.y, t.size.y, tb.bottom, tb.top);
        for row in 0..4 {
            for column in 0..4 {
                writer.push(SpriteVertex::new(
                    Vec2::new(xs[column], ys[row]),
                    Vec2::new(us[column], vs[row]),
                    self.color,
                ));
            }
        }
    }

    fn write_indices(&self, writer: &mut IndexWriter<'_>) {
        for row in 0..3u16 {
            for column in 0..3u16 {
                let bottom_left = row * 4 + column;
                let corners = [bottom_left, bottom_left + 4, bottom_left + 1, bottom_left + 5];
                for index in QUAD_INDICES {
                    writer.push(corners[index as usize]);
                }
            }
        }
    }
}

/// A filled circle, a fan around the center written as a triangle list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center.
    pub center: Vec2,
    /// Radius.
    pub radius: f32,
    /// Rim vertices, at least 3.
    pub segments: usize,
    /// Texture coordinates of the bounding square.
    pub uv: Rect,
    /// Tint.
    pub color: Color32,
}

impl Circle {
    /// A white circle with `segments` rim vertices.
    pub fn new(center: Vec2, radius: f32, segments: usize) -> Self {
        Self {
            center,
            radius,
            segments,
            uv: Rect::UNIT,
            color: Color32::WHITE,
        }
    }

    fn rim(&self) -> usize {
        self.segments.max(3)
    }
}

impl BatchPrimitive for Circle {
    type Vertex = SpriteVertex;

    fn vertex_count(&self) -> usize {
        self.rim() + 1
    }

    fn index_count(&self) -> usize {
        self.rim() * 3
    }

    fn write_vertices(&self, writer: &mut VertexWriter<'_, SpriteVertex>) {
        let uv_center = self.uv.center();
        let uv_radius = self.uv.size * 0.5;
        writer.push(SpriteVertex::new(self.center, uv_center, self.color));
        let rim = self.rim();
        for i in 0..rim {
            let angle = std::f32::consts::TAU * i as f32 / rim as f32;
            let (sin, cos) = angle.sin_cos();
            writer.push(SpriteVertex::new(
                Vec2::new(self.center.x + cos * self.radius, self.center.y + sin * self.radius),
                Vec2::new(uv_center.x + cos * uv_radius.x, uv_center.y + sin * uv_radius.y),
                self.color,
            ));
        }
    }

    fn write_indices(&self, writer: &mut IndexWriter<'_>) {
        let rim = self.rim() as u16;
        for i in 0..rim {
            writer.push(0);
            writer.push(1 + i);
            writer.push(1 + (i + 1) % rim);
        }
    }
}

/// Arbitrary triangle strip geometry, e.g. skinned meshes. Consecutive strips
/// with the same material are joined by degenerate triangles.
#[derive(Debug, Clone, Copy)]
pub struct StripBatch<'a, V: BatchVertex> {
    /// Vertices.
    pub vertices: &'a [V],
    /// Indices into `vertices`.
    pub indices: &'a [u16],
}

impl<'a, V: BatchVertex> StripBatch<'a, V> {
    /// Wraps strip geometry.
    pub fn new(vertices: &'a [V], indices: &'a [u16]) -> Self {
        Self { vertices, indices }
    }
}

impl<V: BatchVertex> BatchPrimitive for StripBatch<'_, V> {
    type Vertex = V;

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn index_count(&self) -> usize {
        self.indices.len()
    }

    fn topology(&self) -> Topology {
        Topology::TrianglesStrip
    }

    fn write_vertices(&self, writer: &mut VertexWriter<'_, V>) {
        for vertex in self.vertices {
            writer.push(*vertex);
        }
    }

    fn write_indices(&self, writer: &mut IndexWriter<'_>) {
        for index in self.indices {
            writer.push(*index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written<P: BatchPrimitive<Vertex = SpriteVertex>>(primitive: &P) -> (Vec<u8>, Vec<u16>) {
        let mut vertices = vec![0u8; primitive.vertex_count() * 32];
        let mut indices = vec![0u8; primitive.index_count() * 2];
        primitive.write_vertices(&mut VertexWriter::new(&mut vertices, primitive.vertex_count()));
        primitive.write_indices(&mut IndexWriter::new(&mut indices, 0, 0, primitive.index_count()));
        let indices = indices
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect();
        (vertices, indices)
    }

    #[test]
    fn nine_patch_grid() {
        let patch = NinePatch {
            position: Rect::new(0.0, 0.0, 100.0, 50.0),
            uv: Rect::UNIT,
            borders: Borders::uniform(10.0),
            uv_borders: Borders::uniform(0.25),
            color: Color32::WHITE,
        };
        let (vertices, indices) = written(&patch);
        assert_eq!(indices.len(), 54);
        assert!(indices.iter().all(|&i| i < 16));
        // vertex 5 is the inner bottom-left corner
        let inner: SpriteVertex = bytemuck::pod_read_unaligned(&vertices[5 * 32..5 * 32 + 24]);
        assert_eq!(inner.position.x, 10.0);
        assert_eq!(inner.position.y, 10.0);
        assert_eq!(inner.uv, Vec2::new(0.25, 0.25));
        assert_eq!(&indices[..6], &[0, 4, 1, 4, 1, 5]);
    }

    #[test]
    fn circle_fan_as_list() {
        let circle = Circle::new(Vec2::ZERO, 1.0, 8);
        assert_eq!(circle.vertex_count(), 9);
        assert_eq!(circle.index_count(), 24);
        let (vertices, indices) = written(&circle);
        assert_eq!(&indices[21..], &[0, 8, 1]);
        let first_rim: SpriteVertex = bytemuck::pod_read_unaligned(&vertices[32..56]);
        approx::assert_relative_eq!(first_rim.position.x, 1.0);
        approx::assert_abs_diff_eq!(first_rim.position.y, 0.0);
        assert_eq!(Circle::new(Vec2::ZERO, 1.0, 1).vertex_count(), 4);
    }
}
