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

//! Batch lane: merges sprites, patches and strips into few indexed draws.

mod batcher;
mod error;
mod primitives;
mod vertex;
mod writer;

pub use self::batcher::{
    Batch, Batcher, INDEX_REGION_CAPACITY, MAX_BATCH_VERTICES, VERTEX_REGION_CAPACITY,
};
pub use self::error::BatcherError;
pub use self::primitives::{BatchPrimitive, Borders, Circle, NinePatch, Rectangle, StripBatch};
pub use self::vertex::{batch_declaration, vertex_stride, BatchVertex, SpriteVertex};
pub use self::writer::{BatchAllocation, IndexWriter, VertexWriter};
