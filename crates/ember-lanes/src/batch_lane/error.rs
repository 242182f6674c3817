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

use super::batcher::MAX_BATCH_VERTICES;
use ember_core::renderer::{RenderError, ResourceError};
use thiserror::Error;

/// Errors raised while batching or flushing geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatcherError {
    /// The vertices of one batch do not fit in an empty region.
    #[error("{bytes} vertex bytes exceed the region capacity of {capacity} bytes")]
    VertexOverflow {
        /// Requested bytes.
        bytes: usize,
        /// Capacity of one region.
        capacity: usize,
    },
    /// The indices of one batch do not fit in an empty region.
    #[error("{bytes} index bytes exceed the region capacity of {capacity} bytes")]
    IndexOverflow {
        /// Requested bytes.
        bytes: usize,
        /// Capacity of one region.
        capacity: usize,
    },
    /// The batch has more vertices than 16-bit indices can address.
    #[error("{0} vertices in one batch, the limit is {max}", max = MAX_BATCH_VERTICES - 1)]
    TooManyVertices(usize),
    /// Creating the buffers or executing the draws failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<ResourceError> for BatcherError {
    fn from(err: ResourceError) -> Self {
        BatcherError::Render(RenderError::Resource(err))
    }
}
