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

//! Hot-path lanes of the ember render core.
//!
//! The [`render_lane`] holds the render module: resource validation, render
//! passes and command execution with state diffing. The [`batch_lane`] merges
//! small primitives into large indexed draws executed through it.

#![warn(missing_docs)]

pub mod batch_lane;
pub mod render_lane;

pub use batch_lane::{BatchPrimitive, Batcher, BatcherError, Rectangle, SpriteVertex};
pub use render_lane::Render;
