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

//! The backend of the `opengl` render mode.
//!
//! Runs on desktop OpenGL 2.1+ and on GLES contexts whose entry points the `gl`
//! crate can load. The caller owns the context: it makes it current and hands
//! a symbol loader to [`GlBackend::new`]. Every method assumes the context is
//! current on the calling thread.
//!
//! On devices with uniform buffers, a constant block is matched by name: the
//! block of each scope is declared as `cb_pass`, `cb_material` or `cb_draw` in
//! GLSL and uses the binding point of its scope. Programs without such a block
//! receive the block as plain uniforms, like devices without uniform buffers.

mod backend;
mod caps;
mod conversions;
mod state;

pub use self::backend::GlBackend;
pub use self::caps::parse_profile;
