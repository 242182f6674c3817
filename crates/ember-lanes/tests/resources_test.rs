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

use common::{render, render_with, sprite_shader};
use ember_core::math::{Mat4, URect, UVec2};
use ember_core::renderer::api::schema::{AssetResolver, MaterialDesc};
use ember_core::renderer::api::{
    ApiProfile, BufferUsage, DeviceCaps, ExternalTexture, Image, ImageFormat, IndexDeclaration,
    IndexType, PixelType, PropertyMap, ScopeType, Shader, ShaderSource, Texture,
    VertexDeclaration,
};
use ember_core::renderer::{ResourceError, ShaderError};
use ember_infra::BackendCall;

#[test]
fn test_constant_buffer_update() {
    // --- 1. ARRANGE ---
    let mut render = render();
    let shader = sprite_shader(&mut render);
    let buffer = render
        .create_const_buffer(&shader, ScopeType::Material)
        .expect("created")
        .expect("the sprite shader has a material block");
    assert_eq!(buffer.size(), 64);
    assert_eq!(buffer.version(), 0);

    // --- 2. ACT ---
    let properties = PropertyMap::new().with("u_matrix_m", Mat4::IDENTITY);
    render
        .update_const_buffer(&buffer, &properties)
        .expect("shadow-only update");

    // --- 3. ASSERT ---
    assert_eq!(&*buffer.data(), bytemuck::bytes_of(&Mat4::IDENTITY));
    assert_eq!(buffer.version(), 1);

    let first = buffer.data().to_vec();
    render
        .update_const_buffer(&buffer, &properties)
        .expect("shadow-only update");
    assert_eq!(*buffer.data(), *first, "same map, same bytes");
    assert_eq!(buffer.version(), 2);
}

#[test]
fn test_const_buffer_uploads_with_uniform_buffers() {
    let mut caps = DeviceCaps::permissive();
    caps.uniform_buffer_supported = true;
    let mut render = render_with(caps);
    let shader = sprite_shader(&mut render);
    let buffer = render
        .create_const_buffer(&shader, ScopeType::Material)
        .expect("created")
        .expect("material block");
    let id = buffer.id().expect("backed by a uniform buffer");

    render
        .update_const_buffer(&buffer, &PropertyMap::new().with("u_matrix_m", Mat4::IDENTITY))
        .expect("upload");

    assert_eq!(
        render.backend().buffer_data(id),
        Some(bytemuck::bytes_of(&Mat4::IDENTITY))
    );
    assert!(render
        .create_const_buffer(&shader, ScopeType::DrawCommand)
        .expect("no block is not an error")
        .is_none());
}

#[test]
fn test_shader_failure_is_reported() {
    let mut render = render();
    let broken = ShaderSource::new()
        .vertex_shader("#error no main\n")
        .fragment_shader("void main() {}");
    assert!(matches!(
        render.create_shader(&broken),
        Err(ResourceError::Shader(ShaderError::CompilationFailed {
            stage: "vertex",
            ..
        }))
    ));
    assert_eq!(render.backend().shader_count(), 0);
}

#[test]
fn test_texture_validation() {
    let mut caps = DeviceCaps::permissive();
    caps.max_texture_size = 256;
    caps.npot_texture_supported = false;
    caps.dxt_compression_supported = false;
    let mut render = render_with(caps);

    assert!(matches!(
        render.create_texture(UVec2::new(512, 64), PixelType::Rgba8.into()),
        Err(ResourceError::TextureTooLarge { requested: 512, max: 256 })
    ));
    assert_eq!(
        render.create_texture(UVec2::new(100, 64), PixelType::Rgba8.into()),
        Err(ResourceError::NonPowerOfTwo)
    );
    assert!(matches!(
        render.create_texture(UVec2::new(64, 64), PixelType::RgbaDxt5.into()),
        Err(ResourceError::UnsupportedPixel(_))
    ));
    assert!(matches!(
        render.create_texture(UVec2::ZERO, PixelType::Rgba8.into()),
        Err(ResourceError::NonPowerOfTwo) | Err(ResourceError::InvalidSize(_))
    ));
    assert!(render
        .create_texture(UVec2::new(64, 32), PixelType::Rgba8.into())
        .is_ok());
    assert!(!render.is_pixel_supported(PixelType::RgbDxt1.into()));
    assert!(render.is_pixel_supported(PixelType::RgbPvrtc4.into()));
}

#[test]
fn test_depth_texture_needs_support() {
    let mut caps = DeviceCaps::permissive();
    caps.depth_texture_supported = false;
    let mut render = render_with(caps);
    assert!(!render.is_pixel_supported(PixelType::Depth24.into()));
    assert!(render
        .create_texture(UVec2::new(64, 64), PixelType::Depth24.into())
        .is_err());
    // renderbuffer depth does not need depth textures
    assert!(render
        .create_render_target(
            UVec2::new(64, 64),
            Some(PixelType::Rgba8.into()),
            Some(PixelType::Depth24Stencil8.into()),
            ExternalTexture::COLOR,
        )
        .is_ok_and(|target| target.has_depth() && target.has_stencil()));
}

#[test]
fn test_texture_region_updates() {
    let mut render = render();
    let texture: Texture = render
        .create_texture(UVec2::new(8, 8), PixelType::Rgba8.into())
        .expect("created");

    render
        .update_texture(&texture, &[0; 2 * 2 * 4], URect::new(6, 6, 2, 2))
        .expect("region at the corner");
    assert_eq!(
        render.update_texture(&texture, &[0; 4 * 4 * 4], URect::new(6, 6, 4, 4)),
        Err(ResourceError::OutOfBounds)
    );
    assert!(matches!(
        render.update_texture(&texture, &[0; 3], URect::new(0, 0, 1, 1)),
        Err(ResourceError::InvalidSize(_))
    ));

    let dxt = render
        .create_texture(UVec2::new(16, 16), PixelType::RgbDxt1.into())
        .expect("compressed texture");
    assert_eq!(
        render.update_texture(&dxt, &[0; 8], URect::new(2, 0, 4, 4)),
        Err(ResourceError::MisalignedRegion)
    );
    render
        .update_texture(&dxt, &[0; 8], URect::new(4, 4, 4, 4))
        .expect("one aligned block");
    assert!(matches!(
        render.create_texture(UVec2::new(6, 8), PixelType::RgbDxt1.into()),
        Err(ResourceError::InvalidSize(_))
    ));
}

#[test]
fn test_texture_from_image() {
    let mut render = render();
    let image = Image::new(UVec2::new(2, 2), ImageFormat::Rgba8, vec![255; 16]).expect("valid");
    let texture = render.create_texture_from_image(&image).expect("created");
    assert_eq!(texture.size(), UVec2::new(2, 2));
    assert_eq!(texture.decl().pixel_type(), PixelType::Rgba8);

    let gray = Image::new(UVec2::new(2, 2), ImageFormat::G8, vec![0; 4]).expect("valid");
    assert!(matches!(
        render.update_texture_from_image(&texture, &gray, UVec2::ZERO),
        Err(ResourceError::IncompatibleDeclaration(_))
    ));
    render
        .update_texture_from_image(&texture, &image, UVec2::ZERO)
        .expect("same format");
    assert!(render.backend().calls().iter().any(|c| matches!(
        c,
        BackendCall::UpdateTexture { len: 16, .. }
    )));
}

#[test]
fn test_buffer_validation() {
    let mut caps = DeviceCaps::permissive();
    caps.element_index_uint = false;
    let mut render = render_with(caps);
    let u16s = IndexDeclaration::new(IndexType::U16);

    assert!(matches!(
        render.create_index_buffer_sized(64, u16s, BufferUsage::Static),
        Err(ResourceError::InvalidUsage(_))
    ));
    assert!(matches!(
        render.create_vertex_buffer_sized(64, BufferUsage::Static),
        Err(ResourceError::InvalidUsage(_))
    ));
    assert!(matches!(
        render.create_index_buffer(&[], u16s, BufferUsage::Static),
        Err(ResourceError::InvalidSize(_))
    ));
    assert!(matches!(
        render.create_index_buffer(&[0; 3], u16s, BufferUsage::Static),
        Err(ResourceError::InvalidSize(_))
    ));
    assert!(matches!(
        render.create_index_buffer(&[0; 8], IndexType::U32.into(), BufferUsage::Static),
        Err(ResourceError::UnsupportedIndex(_))
    ));

    let indices = render
        .create_index_buffer_sized(12, u16s, BufferUsage::Dynamic)
        .expect("dynamic sized buffer");
    assert_eq!(indices.index_count(), 6);
    render
        .update_index_buffer(&indices, bytemuck::cast_slice(&[7u16, 8]), 4)
        .expect("last two indices");
    assert_eq!(
        render.backend().buffer_data(indices.id()).map(|d| d[8..].to_vec()),
        Some(bytemuck::cast_slice::<u16, u8>(&[7, 8]).to_vec())
    );
    assert_eq!(
        render.update_index_buffer(&indices, bytemuck::cast_slice(&[1u16, 2]), 5),
        Err(ResourceError::OutOfBounds)
    );

    let vertices = render
        .create_vertex_buffer(&[0; 32], BufferUsage::Stream)
        .expect("vertex data");
    assert_eq!(
        render.update_vertex_buffer(&vertices, &[1; 8], 28),
        Err(ResourceError::OutOfBounds)
    );
    render
        .update_vertex_buffer(&vertices, &[1; 8], 24)
        .expect("in bounds");
}

#[test]
fn test_vertex_attribs_are_interned() {
    let mut caps = DeviceCaps::permissive();
    caps.max_vertex_attributes = 4;
    let mut render = render_with(caps);
    let decl = VertexDeclaration::new()
        .add_attribute::<f32>("a_vertex", 1, 2)
        .add_attribute::<u8>("a_tint", 1, 4)
        .normalized();

    let first = render.create_vertex_attribs(&decl).expect("supported");
    let second = render
        .create_vertex_attribs(&decl.clone())
        .expect("supported");
    assert_eq!(first, second, "same declaration, same handle");

    let matrix = VertexDeclaration::new()
        .add_attribute::<f32>("a_vertex", 1, 2)
        .add_attribute::<f32>("a_transform", 4, 4);
    assert!(!render.is_vertex_supported(&matrix));
    assert!(matches!(
        render.create_vertex_attribs(&matrix),
        Err(ResourceError::UnsupportedVertex(_))
    ));
}

#[test]
fn test_render_target_validation() {
    let mut render = render();
    assert!(matches!(
        render.create_render_target(
            UVec2::new(64, 64),
            Some(PixelType::Depth24.into()),
            None,
            ExternalTexture::EMPTY,
        ),
        Err(ResourceError::UnsupportedPixel(_))
    ));
    assert!(matches!(
        render.create_render_target(
            UVec2::new(64, 64),
            None,
            Some(PixelType::Rgba8.into()),
            ExternalTexture::EMPTY,
        ),
        Err(ResourceError::UnsupportedPixel(_))
    ));
    assert!(matches!(
        render.create_render_target(
            UVec2::new(16384, 64),
            Some(PixelType::Rgba8.into()),
            None,
            ExternalTexture::COLOR,
        ),
        Err(ResourceError::TextureTooLarge { .. })
    ));

    let target = render
        .create_render_target(
            UVec2::new(128, 64),
            Some(PixelType::Rgba8.into()),
            Some(PixelType::Depth24.into()),
            ExternalTexture::COLOR_AND_DEPTH,
        )
        .expect("both attachments");
    assert!(target.color().is_some() && target.depth().is_some());
    assert!(!target.has_stencil());
    assert_eq!(render.backend().texture_count(), 2);

    let mut caps = DeviceCaps::permissive();
    caps.render_target_supported = false;
    let mut limited = render_with(caps);
    assert_eq!(
        limited
            .create_render_target(
                UVec2::new(8, 8),
                Some(PixelType::Rgba8.into()),
                None,
                ExternalTexture::EMPTY,
            )
            .err(),
        Some(ResourceError::RenderTargetUnsupported)
    );
    assert_eq!(limited.suitable_depth_pixel_type(), None);
}

#[test]
fn test_suitable_depth_formats() {
    let mut caps = DeviceCaps::permissive();
    caps.profile = ApiProfile::Gles2;
    let gles2 = render_with(caps);
    assert_eq!(gles2.suitable_depth_pixel_type(), Some(PixelType::Depth16));

    let desktop = render();
    assert_eq!(desktop.suitable_depth_pixel_type(), Some(PixelType::Depth24));
    assert_eq!(
        desktop.suitable_depth_stencil_pixel_type(),
        Some(PixelType::Depth24Stencil8)
    );
}

struct Library {
    shader: Shader,
    texture: Texture,
}

impl AssetResolver for Library {
    fn shader(&self, address: &str) -> Option<Shader> {
        (address == "sprite.shader.json").then(|| self.shader.clone())
    }

    fn texture(&self, address: &str) -> Option<Texture> {
        (address == "ship.png").then(|| self.texture.clone())
    }
}

#[test]
fn test_material_from_description() {
    let mut render = render();
    let library = Library {
        shader: sprite_shader(&mut render),
        texture: common::white_texture(&mut render),
    };
    let desc = MaterialDesc::from_json(
        r#"{
            "shader": "sprite.shader.json",
            "samplers": [{ "name": "u_texture", "texture": "ship.png", "filter": "nearest" }],
            "properties": [{ "name": "u_matrix_m", "type": "m4f", "value": [
                1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1
            ] }]
        }"#,
    )
    .expect("valid json")
    .resolve(&library)
    .expect("addresses resolve");

    let material = render.create_material(&desc).expect("created");
    let constants = material.const_buffer().expect("material block filled");
    assert_eq!(&*constants.data(), bytemuck::bytes_of(&Mat4::IDENTITY));
    assert_eq!(
        material
            .sampler_block()
            .sampler("u_texture")
            .and_then(|s| s.sampled_texture())
            .map(Texture::id),
        Some(library.texture.id())
    );
}
