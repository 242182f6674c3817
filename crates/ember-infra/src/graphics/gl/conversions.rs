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

//! Conversions from render core types to GL enums.

use ember_core::renderer::api::{
    ApiProfile, AttributeType, BlendingEquation, BlendingFactor, BufferKind, BufferUsage,
    CompareFunc, CullingFace, IndexType, PixelDeclaration, PixelType, SamplerFilter, SamplerType,
    SamplerWrap, StencilOp, Topology,
};
use gl::types::{GLenum, GLint};

/// A local extension trait to convert render core types into GL enums.
pub(super) trait IntoGl<T> {
    /// Converts self into its GL counterpart.
    fn into_gl(self) -> T;
}

impl IntoGl<GLenum> for CompareFunc {
    fn into_gl(self) -> GLenum {
        match self {
            CompareFunc::Never => gl::NEVER,
            CompareFunc::Less => gl::LESS,
            CompareFunc::LessEqual => gl::LEQUAL,
            CompareFunc::Greater => gl::GREATER,
            CompareFunc::GreaterEqual => gl::GEQUAL,
            CompareFunc::Equal => gl::EQUAL,
            CompareFunc::NotEqual => gl::NOTEQUAL,
            CompareFunc::Always => gl::ALWAYS,
        }
    }
}

impl IntoGl<GLenum> for StencilOp {
    fn into_gl(self) -> GLenum {
        match self {
            StencilOp::Keep => gl::KEEP,
            StencilOp::Zero => gl::ZERO,
            StencilOp::Replace => gl::REPLACE,
            StencilOp::Incr => gl::INCR,
            StencilOp::IncrWrap => gl::INCR_WRAP,
            StencilOp::Decr => gl::DECR,
            StencilOp::DecrWrap => gl::DECR_WRAP,
            StencilOp::Invert => gl::INVERT,
        }
    }
}

impl IntoGl<GLenum> for CullingFace {
    fn into_gl(self) -> GLenum {
        match self {
            CullingFace::Back => gl::BACK,
            CullingFace::Front => gl::FRONT,
            CullingFace::BackAndFront => gl::FRONT_AND_BACK,
        }
    }
}

impl IntoGl<GLenum> for BlendingFactor {
    fn into_gl(self) -> GLenum {
        match self {
            BlendingFactor::Zero => gl::ZERO,
            BlendingFactor::One => gl::ONE,
            BlendingFactor::SrcColor => gl::SRC_COLOR,
            BlendingFactor::OneMinusSrcColor => gl::ONE_MINUS_SRC_COLOR,
            BlendingFactor::DstColor => gl::DST_COLOR,
            BlendingFactor::OneMinusDstColor => gl::ONE_MINUS_DST_COLOR,
            BlendingFactor::SrcAlpha => gl::SRC_ALPHA,
            BlendingFactor::OneMinusSrcAlpha => gl::ONE_MINUS_SRC_ALPHA,
            BlendingFactor::DstAlpha => gl::DST_ALPHA,
            BlendingFactor::OneMinusDstAlpha => gl::ONE_MINUS_DST_ALPHA,
            BlendingFactor::ConstantColor => gl::CONSTANT_COLOR,
            BlendingFactor::OneMinusConstantColor => gl::ONE_MINUS_CONSTANT_COLOR,
            BlendingFactor::ConstantAlpha => gl::CONSTANT_ALPHA,
            BlendingFactor::OneMinusConstantAlpha => gl::ONE_MINUS_CONSTANT_ALPHA,
            BlendingFactor::SrcAlphaSaturate => gl::SRC_ALPHA_SATURATE,
        }
    }
}

impl IntoGl<GLenum> for BlendingEquation {
    fn into_gl(self) -> GLenum {
        match self {
            BlendingEquation::Add => gl::FUNC_ADD,
            BlendingEquation::Subtract => gl::FUNC_SUBTRACT,
            BlendingEquation::ReverseSubtract => gl::FUNC_REVERSE_SUBTRACT,
        }
    }
}

impl IntoGl<GLint> for SamplerWrap {
    fn into_gl(self) -> GLint {
        (match self {
            SamplerWrap::Clamp => gl::CLAMP_TO_EDGE,
            SamplerWrap::Repeat => gl::REPEAT,
            SamplerWrap::Mirror => gl::MIRRORED_REPEAT,
        }) as GLint
    }
}

impl IntoGl<GLint> for SamplerFilter {
    fn into_gl(self) -> GLint {
        (match self {
            SamplerFilter::Nearest => gl::NEAREST,
            SamplerFilter::Linear => gl::LINEAR,
        }) as GLint
    }
}

impl IntoGl<GLenum> for SamplerType {
    fn into_gl(self) -> GLenum {
        match self {
            SamplerType::Texture2d => gl::TEXTURE_2D,
            SamplerType::CubeMap => gl::TEXTURE_CUBE_MAP,
        }
    }
}

impl IntoGl<GLenum> for Topology {
    fn into_gl(self) -> GLenum {
        match self {
            Topology::Triangles => gl::TRIANGLES,
            Topology::TrianglesStrip => gl::TRIANGLE_STRIP,
        }
    }
}

impl IntoGl<GLenum> for IndexType {
    fn into_gl(self) -> GLenum {
        match self {
            IndexType::U16 => gl::UNSIGNED_SHORT,
            IndexType::U32 => gl::UNSIGNED_INT,
        }
    }
}

impl IntoGl<GLenum> for AttributeType {
    fn into_gl(self) -> GLenum {
        match self {
            AttributeType::I8 => gl::BYTE,
            AttributeType::U8 => gl::UNSIGNED_BYTE,
            AttributeType::I16 => gl::SHORT,
            AttributeType::U16 => gl::UNSIGNED_SHORT,
            AttributeType::F32 => gl::FLOAT,
        }
    }
}

impl IntoGl<GLenum> for BufferKind {
    fn into_gl(self) -> GLenum {
        match self {
            BufferKind::Index => gl::ELEMENT_ARRAY_BUFFER,
            BufferKind::Vertex => gl::ARRAY_BUFFER,
            BufferKind::Uniform => gl::UNIFORM_BUFFER,
        }
    }
}

impl IntoGl<GLenum> for BufferUsage {
    fn into_gl(self) -> GLenum {
        match self {
            BufferUsage::Static => gl::STATIC_DRAW,
            BufferUsage::Stream => gl::STREAM_DRAW,
            BufferUsage::Dynamic => gl::DYNAMIC_DRAW,
        }
    }
}

// Legacy and vendor enums the core registry does not carry.
const LUMINANCE: GLenum = 0x1909;
const LUMINANCE_ALPHA: GLenum = 0x190A;
const COMPRESSED_RGB_S3TC_DXT1: GLenum = 0x83F0;
const COMPRESSED_RGBA_S3TC_DXT1: GLenum = 0x83F1;
const COMPRESSED_RGBA_S3TC_DXT3: GLenum = 0x83F2;
const COMPRESSED_RGBA_S3TC_DXT5: GLenum = 0x83F3;
const COMPRESSED_RGB_PVRTC_4BPPV1: GLenum = 0x8C00;
const COMPRESSED_RGB_PVRTC_2BPPV1: GLenum = 0x8C01;
const COMPRESSED_RGBA_PVRTC_4BPPV1: GLenum = 0x8C02;
const COMPRESSED_RGBA_PVRTC_2BPPV1: GLenum = 0x8C03;
const COMPRESSED_RGBA_PVRTC_2BPPV2: GLenum = 0x9137;
const COMPRESSED_RGBA_PVRTC_4BPPV2: GLenum = 0x9138;

/// How a pixel type is stored and uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct PixelFormat {
    /// Internal format of the texture or renderbuffer.
    pub internal: GLenum,
    /// Client data format. Unused for compressed formats.
    pub format: GLenum,
    /// Client data type. Unused for compressed formats.
    pub ty: GLenum,
    /// Channel swizzle applied after creation, for gray formats stored in red
    /// channels.
    pub swizzle: Option<[GLenum; 4]>,
}

const fn format(internal: GLenum, format: GLenum, ty: GLenum) -> PixelFormat {
    PixelFormat {
        internal,
        format,
        ty,
        swizzle: None,
    }
}

const fn compressed(internal: GLenum) -> PixelFormat {
    format(internal, internal, 0)
}

/// The storage of `decl` on a device of `profile`.
///
/// Gray formats use luminance on legacy profiles and swizzled red channels
/// elsewhere.
pub(super) fn pixel_format(decl: PixelDeclaration, profile: ApiProfile) -> PixelFormat {
    let legacy = matches!(profile, ApiProfile::Gles2 | ApiProfile::Gl2Compat);
    let gles = matches!(profile, ApiProfile::Gles2 | ApiProfile::Gles3);
    match decl.pixel_type() {
        PixelType::Depth16 => format(gl::DEPTH_COMPONENT16, gl::DEPTH_COMPONENT, gl::UNSIGNED_SHORT),
        PixelType::Depth24 => format(gl::DEPTH_COMPONENT24, gl::DEPTH_COMPONENT, gl::UNSIGNED_INT),
        PixelType::Depth32 => format(gl::DEPTH_COMPONENT32, gl::DEPTH_COMPONENT, gl::UNSIGNED_INT),
        // no 16-bit depth with stencil exists, the packed 24/8 format stands in
        PixelType::Depth16Stencil8 | PixelType::Depth24Stencil8 => {
            format(gl::DEPTH24_STENCIL8, gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8)
        }
        PixelType::Depth32Stencil8 => format(
            gl::DEPTH32F_STENCIL8,
            gl::DEPTH_STENCIL,
            gl::FLOAT_32_UNSIGNED_INT_24_8_REV,
        ),
        PixelType::G8 if legacy => format(LUMINANCE, LUMINANCE, gl::UNSIGNED_BYTE),
        PixelType::Ga8 if legacy => format(LUMINANCE_ALPHA, LUMINANCE_ALPHA, gl::UNSIGNED_BYTE),
        PixelType::G8 => PixelFormat {
            swizzle: (!gles).then_some([gl::RED, gl::RED, gl::RED, gl::ONE]),
            ..format(gl::R8, gl::RED, gl::UNSIGNED_BYTE)
        },
        PixelType::Ga8 => PixelFormat {
            swizzle: (!gles).then_some([gl::RED, gl::RED, gl::RED, gl::GREEN]),
            ..format(gl::RG8, gl::RG, gl::UNSIGNED_BYTE)
        },
        PixelType::Rgb8 if legacy => format(gl::RGB, gl::RGB, gl::UNSIGNED_BYTE),
        PixelType::Rgba8 if legacy => format(gl::RGBA, gl::RGBA, gl::UNSIGNED_BYTE),
        PixelType::Rgb8 => format(gl::RGB8, gl::RGB, gl::UNSIGNED_BYTE),
        PixelType::Rgba8 => format(gl::RGBA8, gl::RGBA, gl::UNSIGNED_BYTE),
        PixelType::RgbDxt1 => compressed(COMPRESSED_RGB_S3TC_DXT1),
        PixelType::RgbaDxt1 => compressed(COMPRESSED_RGBA_S3TC_DXT1),
        PixelType::RgbaDxt3 => compressed(COMPRESSED_RGBA_S3TC_DXT3),
        PixelType::RgbaDxt5 => compressed(COMPRESSED_RGBA_S3TC_DXT5),
        PixelType::RgbPvrtc2 => compressed(COMPRESSED_RGB_PVRTC_2BPPV1),
        PixelType::RgbPvrtc4 => compressed(COMPRESSED_RGB_PVRTC_4BPPV1),
        PixelType::RgbaPvrtc2 => compressed(COMPRESSED_RGBA_PVRTC_2BPPV1),
        PixelType::RgbaPvrtc4 => compressed(COMPRESSED_RGBA_PVRTC_4BPPV1),
        PixelType::RgbaPvrtc2V2 => compressed(COMPRESSED_RGBA_PVRTC_2BPPV2),
        PixelType::RgbaPvrtc4V2 => compressed(COMPRESSED_RGBA_PVRTC_4BPPV2),
    }
}

/// Names a framebuffer completeness status for error messages.
pub(super) fn framebuffer_status_name(status: GLenum) -> &'static str {
    match status {
        gl::FRAMEBUFFER_COMPLETE => "complete",
        gl::FRAMEBUFFER_UNDEFINED => "undefined",
        gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "incomplete attachment",
        gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => "missing attachment",
        gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => "incomplete draw buffer",
        gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => "incomplete read buffer",
        gl::FRAMEBUFFER_UNSUPPORTED => "unsupported",
        gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => "incomplete multisample",
        _ => "unknown status",
    }
}
