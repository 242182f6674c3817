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

//! Deferred destruction of backend objects.

use super::ids::{BufferId, RenderTargetId, ShaderId, TextureId};
use std::cell::RefCell;
use std::rc::Rc;

/// A backend object whose last handle was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasedResource {
    /// A shader program.
    Shader(ShaderId),
    /// A texture.
    Texture(TextureId),
    /// A buffer of any kind.
    Buffer(BufferId),
    /// A framebuffer object.
    RenderTarget(RenderTargetId),
}

/// Collects the backend objects of dropped handles.
///
/// Handles cannot reach the backend when they drop, so they push their id here
/// and the render module destroys the objects when the frame is presented.
/// Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct ReleaseQueue {
    pending: Rc<RefCell<Vec<ReleasedResource>>>,
}

impl ReleaseQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `resource` for destruction.
    pub fn push(&self, resource: ReleasedResource) {
        self.pending.borrow_mut().push(resource);
    }

    /// Takes every pending resource, oldest first.
    pub fn drain(&self) -> Vec<ReleasedResource> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    /// Number of pending resources.
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}
