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

//! Hashed names for attributes, samplers and uniforms.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// A 32-bit FNV-1a hash of a name.
///
/// Lookups in sampler blocks, property maps and cbuffer templates compare these
/// instead of strings. The hash serializes back to nothing useful, so JSON
/// descriptions keep plain names and hash them on load.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StrHash(u32);

impl StrHash {
    /// Hashes `name`.
    pub const fn new(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = FNV_OFFSET;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// The raw hash value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<&str> for StrHash {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for StrHash {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl fmt::Debug for StrHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StrHash({:#010x})", self.0)
    }
}

impl Serialize for StrHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for StrHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(StrHash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_reference_values() {
        assert_eq!(StrHash::new("").value(), 0x811c_9dc5);
        assert_eq!(StrHash::new("a").value(), 0xe40c_292c);
    }

    #[test]
    fn equal_names_hash_equal() {
        assert_eq!(StrHash::new("u_texture"), StrHash::from("u_texture"));
        assert_ne!(StrHash::new("u_texture"), StrHash::new("u_matrix_m"));
    }
}
