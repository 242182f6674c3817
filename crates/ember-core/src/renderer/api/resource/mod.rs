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

//! GPU resource handles.
//!
//! Every handle is a cheap, reference-counted, `!Send` value created by the
//! render module. Handles compare by identity. When the last clone of a handle
//! drops, its backend object is queued on a [`ReleaseQueue`] and destroyed at
//! the next present.

pub mod buffer;
pub mod ids;
pub mod image;
pub mod release;
pub mod render_target;
pub mod shader;
pub mod texture;

pub use self::buffer::{
    BufferKind, BufferUsage, ConstBuffer, IndexBuffer, VertexAttribs, VertexBuffer,
};
pub use self::ids::{BufferId, RenderTargetId, ShaderId, TextureId};
pub use self::image::{Image, ImageFormat};
pub use self::release::{ReleaseQueue, ReleasedResource};
pub use self::render_target::{Attachment, ExternalTexture, RenderTarget};
pub use self::shader::Shader;
pub use self::texture::Texture;
