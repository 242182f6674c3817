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

//! Device capabilities reported by a backend.

use serde::{Deserialize, Serialize};

/// The API flavor the backend runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiProfile {
    /// Not detected, or no real device.
    #[default]
    Unknown,
    /// OpenGL ES 2.0.
    Gles2,
    /// OpenGL ES 3.x.
    Gles3,
    /// Desktop OpenGL 2.x compatibility profile.
    Gl2Compat,
    /// Desktop OpenGL 4.x compatibility profile.
    Gl4Compat,
}

/// Limits and optional features of the device.
///
/// Every limit is zero and every feature off by default, so a zeroed value
/// rejects any resource creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceCaps {
    /// The API flavor.
    pub profile: ApiProfile,

    /// Largest texture width or height.
    pub max_texture_size: u32,
    /// Largest renderbuffer width or height.
    pub max_renderbuffer_size: u32,
    /// Largest cube map face size.
    pub max_cube_map_texture_size: u32,

    /// Texture units available to the fragment stage.
    pub max_texture_image_units: u32,
    /// Texture units available to all stages together.
    pub max_combined_texture_image_units: u32,

    /// Vertex attribute locations.
    pub max_vertex_attributes: u32,
    /// Texture units available to the vertex stage.
    pub max_vertex_texture_image_units: u32,

    /// Varying vectors between the stages.
    pub max_varying_vectors: u32,
    /// Uniform vectors of the vertex stage.
    pub max_vertex_uniform_vectors: u32,
    /// Uniform vectors of the fragment stage.
    pub max_fragment_uniform_vectors: u32,

    /// Non power-of-two textures.
    pub npot_texture_supported: bool,
    /// Depth textures.
    pub depth_texture_supported: bool,
    /// Framebuffer objects.
    pub render_target_supported: bool,

    /// 32-bit element indices.
    pub element_index_uint: bool,

    /// DXT compressed textures.
    pub dxt_compression_supported: bool,
    /// PVRTC compressed textures.
    pub pvrtc_compression_supported: bool,
    /// PVRTC2 compressed textures.
    pub pvrtc2_compression_supported: bool,

    /// Uniform buffer objects. Without them constant buffers live in CPU
    /// shadows and are uploaded as plain uniforms.
    pub uniform_buffer_supported: bool,
    /// `glInvalidateFramebuffer`.
    pub framebuffer_invalidate_supported: bool,
    /// `EXT_discard_framebuffer`.
    pub framebuffer_discard_supported: bool,
}

impl DeviceCaps {
    /// A device with generous limits and every feature on. Used by the
    /// headless backend and tests.
    pub fn permissive() -> Self {
        Self {
            profile: ApiProfile::Unknown,
            max_texture_size: 8192,
            max_renderbuffer_size: 8192,
            max_cube_map_texture_size: 8192,
            max_texture_image_units: 16,
            max_combined_texture_image_units: 32,
            max_vertex_attributes: 16,
            max_vertex_texture_image_units: 16,
            max_varying_vectors: 15,
            max_vertex_uniform_vectors: 1024,
            max_fragment_uniform_vectors: 1024,
            npot_texture_supported: true,
            depth_texture_supported: true,
            render_target_supported: true,
            element_index_uint: true,
            dxt_compression_supported: true,
            pvrtc_compression_supported: true,
            pvrtc2_compression_supported: true,
            uniform_buffer_supported: false,
            framebuffer_invalidate_supported: true,
            framebuffer_discard_supported: false,
        }
    }

    /// `true` when attachments marked `discard` can be invalidated.
    pub fn can_discard_attachments(&self) -> bool {
        self.framebuffer_invalidate_supported || self.framebuffer_discard_supported
    }
}
