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

use common::{pass_block, render, sprite_material, sprite_source};
use ember_core::math::{LinearRgba, URect, UVec2};
use ember_core::renderer::api::{
    BindVertexBuffersCommand, BufferUsage, Command, CommandBlock, DepthState, DrawCommand,
    DrawIndexedCommand, ExternalTexture, IndexDeclaration, IndexType, Material, PixelType,
    RenderPassDesc, SamplerBlock, ScopeType, StoreOp, VertexDeclaration,
};
use ember_core::renderer::{RenderError, ResourceError};
use ember_infra::{BackendCall, HeadlessBackend};
use ember_lanes::Render;
use std::rc::Rc;

fn viewport() -> URect {
    URect::new(0, 0, 800, 600)
}

fn begin(render: &mut Render<HeadlessBackend>, desc: &RenderPassDesc) {
    render
        .begin_pass(desc, None, &SamplerBlock::new())
        .expect("pass should open");
}

#[test]
fn test_render_pass_accounting() {
    // --- 1. ARRANGE ---
    let mut render = render();
    let desc = RenderPassDesc::new(viewport())
        .color_clear(LinearRgba::RED)
        .color_store()
        .depth_clear(1.0)
        .depth_discard();

    // --- 2. ACT ---
    begin(&mut render, &desc);
    render
        .execute(&Command::Draw(DrawCommand::new(3)))
        .expect("draw inside a pass");
    render.end_pass().expect("pass is open");
    render.present().expect("no pass left open");

    // --- 3. ASSERT ---
    let last = render.last_frame_statistics();
    assert_eq!(last.render_pass_count, 1);
    assert_eq!(last.draw_calls, 1);
    let current = render.frame_statistics();
    assert_eq!(current.render_pass_count, 0, "present zeroes the counters");
    assert_eq!(current.draw_calls, 0);
    assert_eq!(render.frame_id(), 1);

    let calls = render.backend().calls();
    assert!(calls.contains(&BackendCall::Clear {
        color: Some(LinearRgba::RED),
        depth: Some(1.0),
        stencil: None,
    }));
    assert!(
        calls.contains(&BackendCall::Discard {
            color: false,
            depth: true,
            stencil: false,
        }),
        "depth is marked discard"
    );
    assert!(calls.contains(&BackendCall::Viewport(viewport())));
    assert!(calls.contains(&BackendCall::DepthRange(0.0, 1.0)));
}

#[test]
fn test_pass_order_errors() {
    let mut render = render();
    assert_eq!(render.end_pass(), Err(RenderError::NoActivePass));
    assert_eq!(
        render.execute(&Command::Scissor(None)),
        Err(RenderError::NoActivePass)
    );
    assert_eq!(render.execute(&Command::Zero), Ok(()), "zero runs anywhere");

    begin(&mut render, &RenderPassDesc::new(viewport()));
    assert_eq!(render.present(), Err(RenderError::PassStillOpen));

    // a second begin closes the first pass
    begin(&mut render, &RenderPassDesc::new(viewport()));
    assert_eq!(render.frame_statistics().render_pass_count, 2);
    render.end_pass().expect("pass is open");
    assert!(!render.is_pass_open());
    assert_eq!(render.end_pass(), Err(RenderError::NoActivePass));
}

#[test]
fn test_store_ops_reset_after_end() {
    let mut render = render();
    begin(
        &mut render,
        &RenderPassDesc::new(viewport())
            .color_discard()
            .depth_store()
            .stencil_store(),
    );
    assert_eq!(render.pending_store_ops().color, StoreOp::Discard);
    render.end_pass().expect("pass is open");
    let ops = render.pending_store_ops();
    assert_eq!(ops.color, StoreOp::Store);
    assert_eq!(ops.depth, StoreOp::Discard);
    assert_eq!(ops.stencil, StoreOp::Discard);
}

#[test]
fn test_clears_only_existing_attachments() {
    let mut render = render();
    let target = render
        .create_render_target(
            UVec2::new(64, 64),
            Some(PixelType::Rgba8.into()),
            None,
            ExternalTexture::COLOR,
        )
        .expect("color-only target");
    assert!(target.color().is_some(), "external color is a texture");
    assert!(!target.has_depth());

    render.backend_mut().take_calls();
    begin(
        &mut render,
        &RenderPassDesc::with_target(target.clone())
            .color_clear(LinearRgba::BLACK)
            .depth_clear(1.0)
            .stencil_clear(0),
    );

    let calls = render.backend().calls();
    assert_eq!(calls[0], BackendCall::BindRenderTarget(Some(target.id())));
    assert!(calls.contains(&BackendCall::Viewport(URect::new(0, 0, 64, 64))));
    assert!(calls.contains(&BackendCall::Clear {
        color: Some(LinearRgba::BLACK),
        depth: None,
        stencil: None,
    }));
}

#[test]
fn test_state_commands_diff_and_restore() {
    let mut render = render();
    begin(&mut render, &RenderPassDesc::new(viewport()));
    render.backend_mut().take_calls();

    let tested = DepthState::default().test(true);
    render
        .execute(&Command::DepthState(Some(tested)))
        .expect("pass is open");
    render
        .execute(&Command::DepthState(Some(tested)))
        .expect("pass is open");
    assert_eq!(
        render.backend_mut().take_calls(),
        vec![BackendCall::DepthState(tested)],
        "an equal state is not forwarded"
    );

    render
        .execute(&Command::DepthState(None))
        .expect("pass is open");
    assert_eq!(
        render.backend_mut().take_calls(),
        vec![BackendCall::DepthState(DepthState::default())],
        "none restores the baseline"
    );

    // same baseline in the next pass: nothing to forward
    begin(&mut render, &RenderPassDesc::new(viewport()));
    assert!(!render
        .backend()
        .calls()
        .iter()
        .any(|c| matches!(c, BackendCall::DepthState(_))));
}

#[test]
fn test_execute_all_matches_sequential_execution() {
    let build = || {
        let mut render = render();
        let material = sprite_material(&mut render);
        begin(&mut render, &RenderPassDesc::new(viewport()));
        let block = CommandBlock::new()
            .with(Rc::clone(&material))
            .with(Command::Scissor(Some(URect::new(0, 0, 10, 10))))
            .with(DrawCommand::new(3))
            .with(Command::Scissor(None))
            .with(DrawCommand::new(6));
        (render, block)
    };

    let (mut sequential, block) = build();
    for command in block.commands() {
        sequential.execute(command).expect("valid command");
    }
    let (mut batched, block) = build();
    batched.execute_all(&block).expect("valid block");

    assert_eq!(sequential.backend().calls(), batched.backend().calls());
    assert_eq!(batched.frame_statistics().draw_calls, 2);
}

#[test]
fn test_execute_all_stops_at_first_error() {
    let mut render = render();
    let material = sprite_material(&mut render);
    let misplaced = render
        .create_const_buffer(material.shader(), ScopeType::Material)
        .expect("created")
        .expect("the sprite shader has a material block");
    begin(&mut render, &RenderPassDesc::new(viewport()));

    let mut bad_draw = DrawCommand::new(3);
    bad_draw.constants = Some(misplaced);
    let block = CommandBlock::new()
        .with(Rc::clone(&material))
        .with(bad_draw)
        .with(DrawCommand::new(3));

    assert_eq!(
        render.execute_all(&block),
        Err(RenderError::IncompatibleConstBuffer)
    );
    assert_eq!(render.backend().draw_count(), 0);
}

#[test]
fn test_pass_constants_reach_the_program() {
    let mut render = render();
    let source = sprite_source(common::material_block()).set_block(pass_block(), ScopeType::RenderPass);
    let shader = render.create_shader(&source).expect("shader builds");
    let pass_constants = render
        .create_const_buffer(&shader, ScopeType::RenderPass)
        .expect("created")
        .expect("the shader has a pass block");
    let material = Rc::new(Material::new(shader.clone()));

    render
        .begin_pass(
            &RenderPassDesc::new(viewport()),
            Some(&pass_constants),
            &SamplerBlock::new(),
        )
        .expect("pass scope buffer");
    render
        .execute(&Command::Material(material))
        .expect("compatible constants");

    assert!(render.backend().calls().iter().any(|c| matches!(
        c,
        BackendCall::BindConstants { scope: ScopeType::RenderPass, data, .. } if data.len() == 64
    )));

    let material_scope = render
        .create_const_buffer(&shader, ScopeType::Material)
        .expect("created");
    assert_eq!(
        render.begin_pass(
            &RenderPassDesc::new(viewport()),
            material_scope.as_ref(),
            &SamplerBlock::new(),
        ),
        Err(RenderError::IncompatibleConstBuffer)
    );
}

#[test]
fn test_dropped_resources_released_at_present() {
    let mut render = render();
    let texture = common::white_texture(&mut render);
    let id = texture.id();
    assert_eq!(render.backend().texture_count(), 1);

    drop(texture);
    assert_eq!(
        render.backend().texture_count(),
        1,
        "destruction waits for present"
    );

    render.present().expect("no pass open");
    assert_eq!(render.backend().texture_count(), 0);
    assert!(render
        .backend()
        .calls()
        .contains(&BackendCall::DestroyTexture(id)));
}

#[test]
fn test_indexed_draw_past_the_buffer_is_rejected() {
    // --- 1. ARRANGE ---
    let mut render = render();
    let material = sprite_material(&mut render);
    let indices = render
        .create_index_buffer(
            &[0u8; 12],
            IndexDeclaration::new(IndexType::U16),
            BufferUsage::Static,
        )
        .expect("six u16 indices");
    begin(&mut render, &RenderPassDesc::new(viewport()));
    render
        .execute(&Command::from(Rc::clone(&material)))
        .expect("material binds");

    // --- 2. ACT ---
    let mut draw_range = |offset: usize, count: u32| {
        let draw = DrawIndexedCommand::new(indices.clone()).range(offset, count);
        render.execute(&Command::DrawIndexed(draw))
    };
    let overrun = draw_range(1000, 600);
    let tail = draw_range(8, 3);
    let misaligned = draw_range(1, 2);
    let last_two = draw_range(8, 2);

    // --- 3. ASSERT ---
    assert_eq!(
        overrun,
        Err(RenderError::Resource(ResourceError::OutOfBounds)),
        "a range far past the buffer must not reach the backend"
    );
    assert_eq!(
        tail,
        Err(RenderError::Resource(ResourceError::OutOfBounds)),
        "one index past the end is still out of bounds"
    );
    assert_eq!(
        misaligned,
        Err(RenderError::Resource(ResourceError::MisalignedRegion)),
        "the offset must fall on an index boundary"
    );
    assert_eq!(last_two, Ok(()), "the last two indices are in range");
    assert_eq!(
        render.backend().draw_count(),
        1,
        "only the valid draw was recorded"
    );
    assert_eq!(render.frame_statistics().draw_calls, 1);
}

#[test]
fn test_draw_past_the_vertex_buffer_is_rejected() {
    // --- 1. ARRANGE ---
    let mut render = render();
    let material = sprite_material(&mut render);
    let decl = VertexDeclaration::new().add_attribute::<f32>("a_vertex", 1, 3);
    let attribs = render
        .create_vertex_attribs(&decl)
        .expect("one attribute is supported");
    let vertices = render
        .create_vertex_buffer(&[0u8; 36], BufferUsage::Static)
        .expect("three 12 byte vertices");
    begin(&mut render, &RenderPassDesc::new(viewport()));
    let block = CommandBlock::new()
        .with(Rc::clone(&material))
        .with(BindVertexBuffersCommand::new().bind(0, vertices, attribs, 0));
    render.execute_all(&block).expect("bindings are valid");

    // --- 2. ACT ---
    let fits = render.execute(&Command::Draw(DrawCommand::new(3)));
    let mut shifted = DrawCommand::new(3);
    shifted.first_vertex = 1;
    let overrun = render.execute(&Command::Draw(shifted));

    // --- 3. ASSERT ---
    assert_eq!(fits, Ok(()), "three vertices fill the buffer exactly");
    assert_eq!(
        overrun,
        Err(RenderError::Resource(ResourceError::OutOfBounds)),
        "vertices 1..4 reach past a three vertex buffer"
    );
    assert_eq!(
        render.backend().draw_count(),
        1,
        "the rejected draw never reached the backend"
    );
}
