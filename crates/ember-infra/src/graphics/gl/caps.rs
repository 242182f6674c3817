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

//! Device capability detection.

use ember_core::renderer::api::{ApiProfile, DeviceCaps};
use gl::types::{GLenum, GLint, GLuint};
use std::collections::HashSet;
use std::ffi::CStr;

// Removed from core profiles, still answered by compatibility contexts.
const MAX_VARYING_COMPONENTS: GLenum = 0x8B4B;

/// Detects the API flavor from a `GL_VERSION` string.
///
/// ```
/// use ember_core::renderer::api::ApiProfile;
/// use ember_infra::graphics::gl::parse_profile;
///
/// assert_eq!(parse_profile("OpenGL ES 2.0 (ANGLE 2.1)"), ApiProfile::Gles2);
/// assert_eq!(parse_profile("4.6.0 NVIDIA 535.54"), ApiProfile::Gl4Compat);
/// ```
pub fn parse_profile(version: &str) -> ApiProfile {
    let (es, numbers) = match version.strip_prefix("OpenGL ES") {
        Some(rest) => (true, rest.trim_start_matches(|c: char| !c.is_ascii_digit())),
        None => (false, version.trim_start()),
    };
    let Some(major) = numbers
        .split('.')
        .next()
        .and_then(|major| major.parse::<u32>().ok())
    else {
        return ApiProfile::Unknown;
    };
    match (es, major) {
        (true, 2) => ApiProfile::Gles2,
        (true, m) if m >= 3 => ApiProfile::Gles3,
        (false, 2 | 3) => ApiProfile::Gl2Compat,
        (false, m) if m >= 4 => ApiProfile::Gl4Compat,
        _ => ApiProfile::Unknown,
    }
}

/// Derives the device caps from the profile, the extension list and a limit
/// query.
pub(super) fn build_caps(
    profile: ApiProfile,
    extensions: &HashSet<String>,
    limit: impl Fn(GLenum) -> u32,
) -> DeviceCaps {
    let has = |name: &str| extensions.contains(name);
    let gles2 = profile == ApiProfile::Gles2;
    let modern = matches!(profile, ApiProfile::Gles3 | ApiProfile::Gl4Compat);

    let uniform_vectors = |vectors: GLenum, components: GLenum| match limit(vectors) {
        0 => limit(components) / 4,
        n => n,
    };

    DeviceCaps {
        profile,
        max_texture_size: limit(gl::MAX_TEXTURE_SIZE),
        max_renderbuffer_size: limit(gl::MAX_RENDERBUFFER_SIZE),
        max_cube_map_texture_size: limit(gl::MAX_CUBE_MAP_TEXTURE_SIZE),
        max_texture_image_units: limit(gl::MAX_TEXTURE_IMAGE_UNITS),
        max_combined_texture_image_units: limit(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS),
        max_vertex_attributes: limit(gl::MAX_VERTEX_ATTRIBS),
        max_vertex_texture_image_units: limit(gl::MAX_VERTEX_TEXTURE_IMAGE_UNITS),
        max_varying_vectors: match limit(gl::MAX_VARYING_VECTORS) {
            0 => limit(MAX_VARYING_COMPONENTS) / 4,
            n => n,
        },
        max_vertex_uniform_vectors: uniform_vectors(
            gl::MAX_VERTEX_UNIFORM_VECTORS,
            gl::MAX_VERTEX_UNIFORM_COMPONENTS,
        ),
        max_fragment_uniform_vectors: uniform_vectors(
            gl::MAX_FRAGMENT_UNIFORM_VECTORS,
            gl::MAX_FRAGMENT_UNIFORM_COMPONENTS,
        ),
        npot_texture_supported: !gles2
            || has("GL_OES_texture_npot")
            || has("GL_ARB_texture_non_power_of_two"),
        depth_texture_supported: !gles2
            || has("GL_OES_depth_texture")
            || has("GL_ANGLE_depth_texture"),
        render_target_supported: profile != ApiProfile::Gl2Compat
            || has("GL_ARB_framebuffer_object")
            || has("GL_EXT_framebuffer_object"),
        element_index_uint: !gles2 || has("GL_OES_element_index_uint"),
        dxt_compression_supported: has("GL_EXT_texture_compression_s3tc"),
        pvrtc_compression_supported: has("GL_IMG_texture_compression_pvrtc"),
        pvrtc2_compression_supported: has("GL_IMG_texture_compression_pvrtc2"),
        uniform_buffer_supported: modern || has("GL_ARB_uniform_buffer_object"),
        framebuffer_invalidate_supported: profile == ApiProfile::Gles3
            || has("GL_ARB_invalidate_subdata"),
        // `glDiscardFramebufferEXT` is not among the entry points `gl` loads.
        framebuffer_discard_supported: false,
    }
}

/// Reads a `glGetString` value.
///
/// # Safety
///
/// A context must be current.
pub(super) unsafe fn gl_string(name: GLenum) -> String {
    let ptr = gl::GetString(name);
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned()
}

/// Reads an integer limit, zero when the query is not supported.
///
/// # Safety
///
/// A context must be current.
pub(super) unsafe fn gl_limit(name: GLenum) -> u32 {
    let mut value: GLint = 0;
    gl::GetIntegerv(name, &mut value);
    // unsupported queries raise INVALID_ENUM, which must not leak into later checks
    while gl::GetError() != gl::NO_ERROR {}
    value.max(0) as u32
}

/// Lists the extensions of the current context.
///
/// # Safety
///
/// A context must be current.
pub(super) unsafe fn gl_extensions(profile: ApiProfile) -> HashSet<String> {
    let indexed = gl::GetStringi::is_loaded()
        && !matches!(profile, ApiProfile::Gles2 | ApiProfile::Gl2Compat);
    if !indexed {
        return gl_string(gl::EXTENSIONS)
            .split_whitespace()
            .map(str::to_owned)
            .collect();
    }
    let count = gl_limit(gl::NUM_EXTENSIONS);
    (0..count as GLuint)
        .filter_map(|i| {
            let ptr = gl::GetStringi(gl::EXTENSIONS, i);
            (!ptr.is_null()).then(|| CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned())
        })
        .collect()
}

/// Queries the caps of the current context.
///
/// # Safety
///
/// A context must be current.
pub(super) unsafe fn query_caps() -> DeviceCaps {
    let profile = parse_profile(&gl_string(gl::VERSION));
    let extensions = gl_extensions(profile);
    let mut caps = build_caps(profile, &extensions, |name| unsafe { gl_limit(name) });
    caps.framebuffer_invalidate_supported &= gl::InvalidateFramebuffer::is_loaded();
    caps.uniform_buffer_supported &= gl::BindBufferBase::is_loaded();
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn profiles_from_version_strings() {
        assert_eq!(parse_profile("OpenGL ES 3.2 Mesa 23.0"), ApiProfile::Gles3);
        assert_eq!(parse_profile("OpenGL ES 2.0"), ApiProfile::Gles2);
        assert_eq!(parse_profile("2.1 Metal - 83.1"), ApiProfile::Gl2Compat);
        assert_eq!(parse_profile("3.3.0 Mesa"), ApiProfile::Gl2Compat);
        assert_eq!(parse_profile("4.1 ATI-4.8.101"), ApiProfile::Gl4Compat);
        assert_eq!(parse_profile("OpenGL ES-CM 1.1"), ApiProfile::Unknown);
        assert_eq!(parse_profile(""), ApiProfile::Unknown);
    }

    #[test]
    fn gles2_features_come_from_extensions() {
        let limit = |_| 64;
        let bare = build_caps(ApiProfile::Gles2, &HashSet::new(), limit);
        assert!(!bare.npot_texture_supported);
        assert!(!bare.depth_texture_supported);
        assert!(!bare.element_index_uint);
        assert!(!bare.uniform_buffer_supported);
        assert!(bare.render_target_supported);

        let extended = build_caps(
            ApiProfile::Gles2,
            &extensions(&["GL_OES_texture_npot", "GL_OES_element_index_uint"]),
            limit,
        );
        assert!(extended.npot_texture_supported);
        assert!(extended.element_index_uint);
        assert!(!extended.depth_texture_supported);
    }

    #[test]
    fn compression_needs_extensions_everywhere() {
        let caps = build_caps(ApiProfile::Gl4Compat, &HashSet::new(), |_| 1);
        assert!(!caps.dxt_compression_supported);
        assert!(caps.npot_texture_supported);
        assert!(caps.uniform_buffer_supported);
        let dxt = build_caps(
            ApiProfile::Gl4Compat,
            &extensions(&["GL_EXT_texture_compression_s3tc"]),
            |_| 1,
        );
        assert!(dxt.dxt_compression_supported);
        assert!(!dxt.pvrtc_compression_supported);
    }

    #[test]
    fn uniform_vectors_fall_back_to_components() {
        let caps = build_caps(ApiProfile::Gl2Compat, &HashSet::new(), |name| match name {
            gl::MAX_VERTEX_UNIFORM_COMPONENTS => 4096,
            gl::MAX_TEXTURE_SIZE => 2048,
            _ => 0,
        });
        assert_eq!(caps.max_vertex_uniform_vectors, 1024);
        assert_eq!(caps.max_texture_size, 2048);
        assert!(!caps.render_target_supported);
    }
}
