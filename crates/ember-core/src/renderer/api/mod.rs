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

//! Backend-agnostic render data: declarations, resources, states, commands.

pub mod command;
pub mod core;
pub mod declaration;
pub mod material;
pub mod pass;
pub mod property;
pub mod resource;
pub mod schema;
pub mod shader_source;
pub mod state;

pub use self::command::*;
pub use self::core::*;
pub use self::declaration::*;
pub use self::material::Material;
pub use self::pass::{AttachmentOps, LoadOp, RenderPassDesc, StoreOp};
pub use self::property::{PropertyMap, PropertyValue};
pub use self::resource::*;
pub use self::shader_source::*;
pub use self::state::*;
