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

//! Texture handles.

use super::ids::TextureId;
use super::release::{ReleaseQueue, ReleasedResource};
use crate::math::UVec2;
use crate::renderer::api::declaration::PixelDeclaration;
use std::rc::Rc;

#[derive(Debug)]
struct TextureInner {
    id: TextureId,
    size: UVec2,
    decl: PixelDeclaration,
    release: ReleaseQueue,
}

impl Drop for TextureInner {
    fn drop(&mut self) {
        self.release.push(ReleasedResource::Texture(self.id));
    }
}

/// A shared handle to a backend texture.
///
/// Handles compare by identity. The backend texture is destroyed once the last
/// clone is dropped and the frame is presented.
#[derive(Debug, Clone)]
pub struct Texture(Rc<TextureInner>);

impl Texture {
    /// Wraps a backend texture.
    pub fn new(id: TextureId, size: UVec2, decl: PixelDeclaration, release: &ReleaseQueue) -> Self {
        Self(Rc::new(TextureInner {
            id,
            size,
            decl,
            release: release.clone(),
        }))
    }

    /// Backend id.
    pub fn id(&self) -> TextureId {
        self.0.id
    }

    /// Size in pixels.
    pub fn size(&self) -> UVec2 {
        self.0.size
    }

    /// Pixel layout.
    pub fn decl(&self) -> PixelDeclaration {
        self.0.decl
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Texture {}
