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

//! Records a few frames on the headless backend and logs what reached it.

use anyhow::{Context, Result};
use ember_core::math::{Color32, LinearRgba, Rect, URect, UVec2, Vec2};
use ember_core::platform::OffscreenSurface;
use ember_core::renderer::api::{
    BuildInfo, CbufferTemplate, Material, PixelType, RenderMode, RenderPassDesc, RenderSettings,
    SamplerBlock, SamplerState, SamplerType, ScopeType, ShaderSource, ValueType,
};
use ember_core::renderer::RenderBackend;
use ember_infra::AnyBackend;
use ember_lanes::batch_lane::Circle;
use ember_lanes::{Rectangle, Render};
use std::rc::Rc;

const FRAMES: u32 = 3;

const SPRITE_VS: &str = "\
attribute vec3 a_vertex;
attribute vec2 a_st;
attribute vec4 a_tint;
uniform mat4 u_matrix_m;
varying vec2 v_st;
varying vec4 v_tint;
void main() {
    v_st = a_st;
    v_tint = a_tint;
    gl_Position = u_matrix_m * vec4(a_vertex, 1.0);
}";

const SPRITE_FS: &str = "\
uniform sampler2D u_texture;
varying vec2 v_st;
varying vec4 v_tint;
void main() {
    gl_FragColor = texture2D(u_texture, v_st) * v_tint;
}";

fn sprite_material(render: &mut Render<AnyBackend>) -> Result<Rc<Material>> {
    let block = Rc::new(CbufferTemplate::new().add_uniform("u_matrix_m", 0, ValueType::M4f));
    let source = ShaderSource::new()
        .vertex_shader(SPRITE_VS)
        .fragment_shader(SPRITE_FS)
        .add_attribute("a_vertex", 0, ValueType::V3f)
        .add_attribute("a_st", 1, ValueType::V2f)
        .add_attribute("a_tint", 2, ValueType::V4f)
        .add_sampler("u_texture", 0, SamplerType::Texture2d, ScopeType::Material)
        .set_block(block, ScopeType::Material);
    let shader = render.create_shader(&source)?;

    let pixels = vec![0xFFu8; 16 * 16 * 4];
    let texture = render.create_texture(UVec2::new(16, 16), PixelType::Rgba8.into())?;
    render.update_texture(&texture, &pixels, URect::new(0, 0, 16, 16))?;

    Ok(Rc::new(
        Material::new(shader).sampler("u_texture", SamplerState::new(texture)),
    ))
}

fn record_frame(
    render: &mut Render<AnyBackend>,
    material: &Rc<Material>,
    frame: u32,
) -> Result<()> {
    let size = render.framebuffer_size();
    let pass = RenderPassDesc::new(URect::from_size(size)).color_clear(LinearRgba::BLACK);
    render.begin_pass(&pass, None, &SamplerBlock::new())?;

    for i in 0..8 {
        let x = -400.0 + 100.0 * i as f32 + frame as f32;
        let rect = Rectangle::new(Rect::new(x, -50.0, 80.0, 80.0))
            .uv(Rect::UNIT)
            .color(Color32::WHITE);
        render.add_batch(material, &rect)?;
    }
    render.add_batch(material, &Circle::new(Vec2::ZERO, 120.0, 32))?;
    render.flush_batches()?;

    render.end_pass()?;
    render.present()?;
    Ok(())
}

/// Settings from the JSON file named by the first argument. Without one the
/// sandbox runs headless.
fn load_settings() -> Result<RenderSettings> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(RenderSettings {
            mode: RenderMode::None,
            ..RenderSettings::default()
        });
    };
    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    RenderSettings::from_json(&json).with_context(|| format!("parsing {path}"))
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let build = BuildInfo::current();
    log::info!("ember sandbox, {} {} build", build.platform, build.build_mode);

    let settings = load_settings()?;
    // No window here, so GL modes fail without a loader.
    let backend = AnyBackend::from_settings(&settings, None)
        .with_context(|| format!("creating the '{}' backend", settings.mode))?;
    let mut render = Render::new(
        backend,
        Box::new(OffscreenSurface::new(UVec2::new(800, 600))),
        settings,
    );
    log::info!(
        "Render core on '{}' backend, {:?} profile",
        render.backend().name(),
        render.device_caps().profile
    );

    let material = sprite_material(&mut render)?;
    for frame in 0..FRAMES {
        record_frame(&mut render, &material, frame)?;
        let stats = render.last_frame_statistics();
        log::info!(
            "Frame {}: {} passes, {} draw calls, {} backend calls",
            render.frame_id(),
            stats.render_pass_count,
            stats.draw_calls,
            render
                .backend_mut()
                .headless_mut()
                .map_or(0, |backend| backend.take_calls().len())
        );
    }

    if let Some(headless) = render.backend().headless() {
        log::info!(
            "{} buffers, {} textures, {} shaders alive on the backend",
            headless.buffer_count(),
            headless.texture_count(),
            headless.shader_count()
        );
    }
    Ok(())
}
