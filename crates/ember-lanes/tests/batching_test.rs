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

mod common;

use common::{render, sprite_material};
use ember_core::math::{Color32, Rect, URect, Vec2};
use ember_core::renderer::api::{
    BufferId, IndexType, RenderPassDesc, SamplerBlock, Topology,
};
use ember_core::renderer::RenderError;
use ember_infra::{BackendCall, HeadlessBackend};
use ember_lanes::batch_lane::{
    BatcherError, Rectangle, SpriteVertex, StripBatch, INDEX_REGION_CAPACITY,
};
use ember_lanes::Render;

fn open_pass(render: &mut Render<HeadlessBackend>) {
    render
        .begin_pass(
            &RenderPassDesc::new(URect::new(0, 0, 800, 600)),
            None,
            &SamplerBlock::new(),
        )
        .expect("pass should open");
}

fn rect_at(x: f32) -> Rectangle {
    Rectangle::new(Rect::new(x, 0.0, 10.0, 10.0))
}

fn count(render: &Render<HeadlessBackend>, pred: impl Fn(&BackendCall) -> bool) -> usize {
    render.backend().calls().iter().filter(|c| pred(c)).count()
}

#[test]
fn test_rectangle_batch() {
    // --- 1. ARRANGE ---
    let mut render = render();
    let material = sprite_material(&mut render);
    let rect = Rectangle::new(Rect::new(-100.0, -150.0, 200.0, 150.0))
        .uv(Rect::UNIT)
        .color(Color32::from_rgba_u32(0xFFFF_FFFF));

    // --- 2. ACT ---
    render.add_batch(&material, &rect).expect("rectangle fits");

    // --- 3. ASSERT ---
    let batcher = render.batcher();
    assert_eq!(batcher.batch_count(), 1, "one rectangle makes one batch");
    let batch = &batcher.batches()[0];
    let vertices = batcher.read_vertices::<SpriteVertex>(batch);
    let positions: Vec<Vec2> = vertices
        .iter()
        .map(|v| Vec2::new(v.position.x, v.position.y))
        .collect();
    assert_eq!(
        positions,
        vec![
            Vec2::new(-100.0, -150.0),
            Vec2::new(-100.0, 0.0),
            Vec2::new(100.0, -150.0),
            Vec2::new(100.0, 0.0),
        ]
    );
    assert_eq!(vertices[3].uv, Vec2::ONE);
    assert!(vertices.iter().all(|v| v.color == Color32::WHITE));
    assert_eq!(batcher.read_indices(batch), vec![0, 1, 2, 1, 2, 3]);

    open_pass(&mut render);
    render.backend_mut().take_calls();
    render.flush_batches().expect("flush inside a pass");

    assert_eq!(
        count(&render, |c| matches!(c, BackendCall::BindVertexBuffer { .. })),
        1,
        "one vertex buffer binding"
    );
    assert_eq!(
        count(&render, |c| matches!(c, BackendCall::UseProgram(_))),
        1,
        "one material bind"
    );
    let draws: Vec<&BackendCall> = render
        .backend()
        .calls()
        .iter()
        .filter(|c| c.is_draw())
        .collect();
    assert_eq!(draws.len(), 1);
    assert!(matches!(
        draws[0],
        BackendCall::DrawIndexed {
            topology: Topology::Triangles,
            index_type: IndexType::U16,
            offset: 0,
            index_count: 6,
            ..
        }
    ));
    assert!(render.batcher().is_empty(), "flush clears the batcher");
    assert_eq!(render.frame_statistics().draw_calls, 1);
}

#[test]
fn test_two_rectangles_make_one_draw() {
    let mut render = render();
    let material = sprite_material(&mut render);

    render.add_batch(&material, &rect_at(0.0)).expect("fits");
    render.add_batch(&material, &rect_at(20.0)).expect("fits");

    let batcher = render.batcher();
    assert_eq!(batcher.batch_count(), 1, "same material merges");
    let batch = &batcher.batches()[0];
    assert_eq!(batch.vertex_count(), 8);
    assert_eq!(batch.index_count(), 12);

    open_pass(&mut render);
    render.flush_batches().expect("flush inside a pass");
    assert_eq!(render.backend().draw_count(), 1);
    assert!(render.backend().calls().iter().any(|c| matches!(
        c,
        BackendCall::DrawIndexed { index_count: 12, .. }
    )));
}

#[test]
fn test_material_switch_splits_draws() {
    let mut render = render();
    let first = sprite_material(&mut render);
    let second = sprite_material(&mut render);

    render.add_batch(&first, &rect_at(0.0)).expect("fits");
    render.add_batch(&second, &rect_at(20.0)).expect("fits");
    assert_eq!(render.batcher().batch_count(), 2);

    open_pass(&mut render);
    render.flush_batches().expect("flush inside a pass");
    assert_eq!(render.backend().draw_count(), 2, "one draw per material");
    assert_eq!(render.frame_statistics().draw_calls, 2);
}

#[test]
fn test_strip_concatenation() {
    let mut render = render();
    let material = sprite_material(&mut render);
    let vertices = [SpriteVertex::default(); 4];
    let indices = [0u16, 1, 2, 3];

    render
        .add_batch(&material, &StripBatch::new(&vertices, &indices))
        .expect("fits");
    render
        .add_batch(&material, &StripBatch::new(&vertices, &indices))
        .expect("fits");

    let batcher = render.batcher();
    assert_eq!(batcher.batch_count(), 1);
    let batch = &batcher.batches()[0];
    assert_eq!(batch.topology(), Topology::TrianglesStrip);
    assert_eq!(batch.index_count(), 4 + 2 + 4);
    let written = batcher.read_indices(batch);
    assert_eq!(written[4], written[3], "bridge repeats the last index");
    assert_eq!(written[5], written[6], "bridge repeats the next first index");
}

#[test]
fn test_flush_outside_pass_fails_and_clears() {
    let mut render = render();
    let material = sprite_material(&mut render);
    render.add_batch(&material, &rect_at(0.0)).expect("fits");

    let result = render.flush_batches();

    assert!(matches!(
        result,
        Err(BatcherError::Render(RenderError::NoActivePass))
    ));
    assert!(render.batcher().is_empty(), "batches are dropped even on error");
    assert_eq!(render.backend().draw_count(), 0);
}

#[test]
fn test_empty_flush_is_noop() {
    let mut render = render();
    render.backend_mut().take_calls();
    render.flush_batches().expect("nothing to do");
    assert!(render.backend().calls().is_empty());
}

#[test]
fn test_merging_disabled_by_settings() {
    let mut settings = ember_core::renderer::api::RenderSettings::default();
    settings.batching = false;
    let mut render = Render::new(
        HeadlessBackend::default(),
        Box::new(ember_core::platform::OffscreenSurface::default()),
        settings,
    );
    let material = sprite_material(&mut render);
    render.add_batch(&material, &rect_at(0.0)).expect("fits");
    render.add_batch(&material, &rect_at(20.0)).expect("fits");
    assert_eq!(render.batcher().batch_count(), 2);

    open_pass(&mut render);
    render.flush_batches().expect("flush inside a pass");
    // the two batches share one region, so the vertex buffer is bound once
    assert_eq!(
        count(&render, |c| matches!(c, BackendCall::BindVertexBuffer { .. })),
        1
    );
    assert_eq!(render.backend().draw_count(), 2);
}

#[test]
fn test_unflushed_batches_dropped_at_present() {
    let mut render = render();
    let material = sprite_material(&mut render);
    render.add_batch(&material, &rect_at(0.0)).expect("fits");
    render.present().expect("no pass open");
    assert!(render.batcher().is_empty());
}

#[test]
fn test_vertex_regions_share_an_index_region_with_room() {
    // --- 1. ARRANGE ---
    let mut render = render();
    let material = sprite_material(&mut render);
    open_pass(&mut render);
    // 10_000 vertices of 32 bytes each, two of them overflow one region.
    for _ in 0..2 {
        let mut alloc = render
            .alloc_batch::<SpriteVertex>(10_000, 3, Topology::Triangles, &material)
            .expect("fits in an empty region");
        for i in 0..3 {
            alloc.indices.push(i);
        }
    }
    assert_eq!(render.batcher().vertex_region_count(), 2);
    assert_eq!(render.batcher().batch_count(), 2);

    // --- 2. ACT ---
    render.flush_batches().expect("both regions draw");

    // --- 3. ASSERT ---
    let draws = draw_calls(&render);
    assert_eq!(draws.len(), 2, "one draw per batch");
    let (first_vertices, first_indices, first_offset, first_count) = draws[0];
    let (second_vertices, second_indices, second_offset, second_count) = draws[1];
    assert_ne!(
        first_vertices, second_vertices,
        "each region draws from its own vertex buffer"
    );
    assert_eq!(
        first_indices, second_indices,
        "both batches fit in one index region"
    );
    assert_eq!((first_offset, first_count), (0, 3));
    assert_eq!(
        (second_offset, second_count),
        (6, 3),
        "the second batch follows the first in the index region"
    );
    assert_eq!(
        read_u16(&render, first_indices),
        vec![0, 1, 2, 0, 1, 2],
        "indices restart at zero in the second vertex region"
    );
    let second_region = second_vertices.and_then(|id| render.backend().buffer_data(id));
    assert_eq!(
        second_region.map(<[u8]>::len),
        Some(10_000 * 32),
        "the second region holds only the second batch"
    );
    assert!(render.batcher().is_empty(), "flush clears the batcher");
}

fn draw_calls(render: &Render<HeadlessBackend>) -> Vec<(Option<BufferId>, BufferId, usize, u32)> {
    let mut bound = None;
    let mut draws = Vec::new();
    for call in render.backend().calls() {
        match call {
            BackendCall::BindVertexBuffer { buffer, .. } => bound = Some(*buffer),
            BackendCall::DrawIndexed {
                buffer,
                offset,
                index_count,
                ..
            } => draws.push((bound, *buffer, *offset, *index_count)),
            _ => {}
        }
    }
    draws
}

fn read_u16(render: &Render<HeadlessBackend>, id: BufferId) -> Vec<u16> {
    render
        .backend()
        .buffer_data(id)
        .expect("batch buffers are live until present")
        .chunks_exact(2)
        .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
        .collect()
}

#[test]
fn test_flush_spanning_two_regions() {
    // --- 1. ARRANGE ---
    let mut render = render();
    let material = sprite_material(&mut render);
    open_pass(&mut render);
    // Each allocation fills more than half of a vertex and an index region.
    let index_count = INDEX_REGION_CAPACITY / 2 / 2 + 3;
    for _ in 0..2 {
        let mut alloc = render
            .alloc_batch::<SpriteVertex>(10_000, index_count, Topology::Triangles, &material)
            .expect("fits in empty regions");
        for i in 0..index_count {
            alloc.indices.push((i % 3) as u16);
        }
    }

    // --- 2. ACT ---
    render.flush_batches().expect("both regions draw");

    // --- 3. ASSERT ---
    let binds = count(&render, |c| matches!(c, BackendCall::BindVertexBuffer { .. }));
    assert_eq!(binds, 2, "one vertex buffer bind per region");
    let draws = draw_calls(&render);
    assert_eq!(draws.len(), 2, "one draw per batch");
    let (first_vertices, first_indices, first_offset, first_count) = draws[0];
    let (second_vertices, second_indices, second_offset, second_count) = draws[1];
    assert_ne!(
        first_vertices, second_vertices,
        "each region draws from its own vertex buffer"
    );
    assert_ne!(
        first_indices, second_indices,
        "each region draws from its own index buffer"
    );
    assert_eq!((first_offset, first_count), (0, index_count as u32));
    assert_eq!(
        (second_offset, second_count),
        (0, index_count as u32),
        "the second batch starts its own index region"
    );
    assert_eq!(
        read_u16(&render, second_indices)[..3],
        [0, 1, 2],
        "index bases restart at zero in the second region"
    );
    assert_eq!(read_u16(&render, second_indices).len(), index_count);
}
