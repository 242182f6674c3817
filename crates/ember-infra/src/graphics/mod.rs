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

//! Graphics backends, one per render mode family.

#[cfg(feature = "opengl")]
pub mod gl;
#[cfg(feature = "headless")]
pub mod headless;
#[cfg(feature = "headless")]
pub mod select;

#[cfg(feature = "opengl")]
pub use self::gl::GlBackend;
#[cfg(feature = "headless")]
pub use self::headless::{BackendCall, HeadlessBackend};
#[cfg(feature = "headless")]
pub use self::select::{profile_matches, AnyBackend, GlLoader};
