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

//! Index element formats.

use serde::{Deserialize, Serialize};

/// The integer type of one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    /// 16-bit unsigned indices.
    #[default]
    U16,
    /// 32-bit unsigned indices. Requires `element_index_uint` on GLES2.
    U32,
}

/// Describes the index elements of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexDeclaration {
    index_type: IndexType,
}

impl IndexDeclaration {
    /// Creates a declaration for `index_type`.
    pub const fn new(index_type: IndexType) -> Self {
        Self { index_type }
    }

    /// The index type.
    pub const fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// Size of one index in bytes.
    pub const fn bytes_per_index(&self) -> usize {
        match self.index_type {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

impl From<IndexType> for IndexDeclaration {
    fn from(index_type: IndexType) -> Self {
        Self::new(index_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_per_index() {
        assert_eq!(IndexDeclaration::new(IndexType::U16).bytes_per_index(), 2);
        assert_eq!(IndexDeclaration::new(IndexType::U32).bytes_per_index(), 4);
        assert_eq!(IndexDeclaration::default().index_type(), IndexType::U16);
    }
}
