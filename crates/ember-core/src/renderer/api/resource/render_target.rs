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

//! Offscreen framebuffer handles.

use super::ids::RenderTargetId;
use super::release::{ReleaseQueue, ReleasedResource};
use super::texture::Texture;
use crate::ember_bitflags;
use crate::math::UVec2;
use crate::renderer::api::declaration::PixelDeclaration;
use std::rc::Rc;

ember_bitflags! {
    /// Which render target attachments are created as sampleable textures.
    /// The others are backed by renderbuffers.
    pub struct ExternalTexture: u8 {
        /// The color attachment.
        const COLOR = 1 << 0;
        /// The depth (and stencil) attachment.
        const DEPTH = 1 << 1;
        /// Both attachments.
        const COLOR_AND_DEPTH = Self::COLOR.bits() | Self::DEPTH.bits();
    }
}

/// One attachment of a render target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Pixel layout.
    pub decl: PixelDeclaration,
    /// The texture, when the attachment was requested as external.
    pub texture: Option<Texture>,
}

#[derive(Debug)]
struct RenderTargetInner {
    id: RenderTargetId,
    size: UVec2,
    color: Option<Attachment>,
    depth: Option<Attachment>,
    release: ReleaseQueue,
}

impl Drop for RenderTargetInner {
    fn drop(&mut self) {
        self.release.push(ReleasedResource::RenderTarget(self.id));
    }
}

/// A shared handle to a framebuffer object.
#[derive(Debug, Clone)]
pub struct RenderTarget(Rc<RenderTargetInner>);

impl RenderTarget {
    /// Wraps a backend framebuffer.
    pub fn new(
        id: RenderTargetId,
        size: UVec2,
        color: Option<Attachment>,
        depth: Option<Attachment>,
        release: &ReleaseQueue,
    ) -> Self {
        Self(Rc::new(RenderTargetInner {
            id,
            size,
            color,
            depth,
            release: release.clone(),
        }))
    }

    /// Backend id.
    pub fn id(&self) -> RenderTargetId {
        self.0.id
    }

    /// Size in pixels.
    pub fn size(&self) -> UVec2 {
        self.0.size
    }

    /// The color attachment texture, if external.
    pub fn color(&self) -> Option<&Texture> {
        self.0.color.as_ref().and_then(|a| a.texture.as_ref())
    }

    /// The depth attachment texture, if external.
    pub fn depth(&self) -> Option<&Texture> {
        self.0.depth.as_ref().and_then(|a| a.texture.as_ref())
    }

    /// `true` when the target has a color attachment.
    pub fn has_color(&self) -> bool {
        self.0.color.is_some()
    }

    /// `true` when the target has a depth attachment.
    pub fn has_depth(&self) -> bool {
        self.0.depth.is_some()
    }

    /// `true` when the depth attachment carries a stencil channel.
    pub fn has_stencil(&self) -> bool {
        self.0.depth.as_ref().is_some_and(|a| a.decl.is_stencil())
    }
}

impl PartialEq for RenderTarget {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for RenderTarget {}
