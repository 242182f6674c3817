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

#![allow(dead_code)]

use ember_core::math::UVec2;
use ember_core::platform::OffscreenSurface;
use ember_core::renderer::api::{
    CbufferTemplate, DeviceCaps, Material, PixelType, RenderSettings, SamplerState, SamplerType,
    ScopeType, Shader, ShaderSource, Texture, ValueType,
};
use ember_infra::HeadlessBackend;
use ember_lanes::Render;
use std::rc::Rc;

pub const SPRITE_VS: &str = "attribute vec3 a_vertex;\nvoid main() {}";
pub const SPRITE_FS: &str = "uniform sampler2D u_texture;\nvoid main() {}";

pub fn render_with(caps: DeviceCaps) -> Render<HeadlessBackend> {
    Render::new(
        HeadlessBackend::new(caps),
        Box::new(OffscreenSurface::new(UVec2::new(800, 600))),
        RenderSettings::default(),
    )
}

pub fn render() -> Render<HeadlessBackend> {
    render_with(DeviceCaps::permissive())
}

pub fn material_block() -> Rc<CbufferTemplate> {
    Rc::new(CbufferTemplate::new().add_uniform("u_matrix_m", 0, ValueType::M4f))
}

pub fn pass_block() -> Rc<CbufferTemplate> {
    Rc::new(CbufferTemplate::new().add_uniform("u_matrix_vp", 0, ValueType::M4f))
}

pub fn sprite_source(material: Rc<CbufferTemplate>) -> ShaderSource {
    ShaderSource::new()
        .vertex_shader(SPRITE_VS)
        .fragment_shader(SPRITE_FS)
        .add_attribute("a_vertex", 0, ValueType::V3f)
        .add_attribute("a_st", 1, ValueType::V2f)
        .add_attribute("a_tint", 2, ValueType::V4f)
        .add_sampler("u_texture", 0, SamplerType::Texture2d, ScopeType::Material)
        .set_block(material, ScopeType::Material)
}

pub fn sprite_shader(render: &mut Render<HeadlessBackend>) -> Shader {
    render
        .create_shader(&sprite_source(material_block()))
        .expect("sprite shader should build")
}

pub fn white_texture(render: &mut Render<HeadlessBackend>) -> Texture {
    render
        .create_texture(UVec2::new(4, 4), PixelType::Rgba8.into())
        .expect("4x4 texture should be created")
}

pub fn sprite_material(render: &mut Render<HeadlessBackend>) -> Rc<Material> {
    let shader = sprite_shader(render);
    let texture = white_texture(render);
    Rc::new(Material::new(shader).sampler("u_texture", SamplerState::new(texture)))
}
