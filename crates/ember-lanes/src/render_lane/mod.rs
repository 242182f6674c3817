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

//! Render lane: the render module, its pass controller and command executor.
//!
//! [`Render`] validates every resource request against the device caps before
//! it reaches the backend, keeps a shadow of the pipeline state so that only
//! changes are forwarded, and owns the frame's batcher.

mod batching;
mod executor;
mod pass;
mod render;
mod shadow;

pub use self::pass::StoreOps;
pub use self::render::Render;
