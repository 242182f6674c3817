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

//! Interleaved vertex layouts.

use crate::utils::StrHash;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// The maximum number of attributes in one vertex declaration.
pub const MAX_ATTRIBUTES: usize = 8;

/// Element type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// Signed byte.
    I8,
    /// Unsigned byte.
    U8,
    /// Signed short.
    I16,
    /// Unsigned short.
    U16,
    /// 32-bit float.
    #[default]
    F32,
}

impl AttributeType {
    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            AttributeType::I8 | AttributeType::U8 => 1,
            AttributeType::I16 | AttributeType::U16 => 2,
            AttributeType::F32 => 4,
        }
    }
}

/// Scalar types that can back a vertex attribute.
pub trait AttributeElement {
    /// The matching attribute type.
    const TYPE: AttributeType;
}

macro_rules! attribute_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl AttributeElement for $ty {
            const TYPE: AttributeType = AttributeType::$variant;
        })*
    };
}

attribute_element! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    f32 => F32,
}

/// One attribute of a vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeInfo {
    /// Byte offset of the attribute inside the vertex.
    pub stride: usize,
    /// The attribute name, as the shader declares it.
    pub name: String,
    /// Hash of [`name`](Self::name).
    pub name_hash: StrHash,
    /// Number of rows (1 for vectors).
    pub rows: u8,
    /// Number of columns (components per row).
    pub columns: u8,
    /// Element type.
    pub attribute_type: AttributeType,
    /// Whether integer data is normalized to `[0, 1]` / `[-1, 1]`.
    pub normalized: bool,
}

impl AttributeInfo {
    /// Byte size of the attribute.
    pub fn byte_size(&self) -> usize {
        self.attribute_type.size() * self.rows as usize * self.columns as usize
    }
}

/// Describes an interleaved vertex, built attribute by attribute.
///
/// Each attribute records its offset within the vertex, so a backend can bind
/// all attributes of a buffer with one shared stride,
/// [`bytes_per_vertex`](Self::bytes_per_vertex).
///
/// ```
/// use ember_core::renderer::api::declaration::VertexDeclaration;
///
/// let decl = VertexDeclaration::new()
///     .add_attribute::<f32>("a_vertex", 1, 2)
///     .add_attribute::<f32>("a_st", 1, 2)
///     .add_attribute::<u8>("a_tint", 1, 4)
///     .normalized();
/// assert_eq!(decl.bytes_per_vertex(), 20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VertexDeclaration {
    attributes: Vec<AttributeInfo>,
    bytes_per_vertex: usize,
}

impl VertexDeclaration {
    /// Creates an empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute whose element type is inferred from `T`.
    pub fn add_attribute<T: AttributeElement>(self, name: &str, rows: u8, columns: u8) -> Self {
        self.add_attribute_raw(name, rows, columns, T::TYPE, false)
    }

    /// Adds an attribute at the current stride and advances the stride by its size.
    pub fn add_attribute_raw(
        mut self,
        name: &str,
        rows: u8,
        columns: u8,
        attribute_type: AttributeType,
        normalized: bool,
    ) -> Self {
        if self.attributes.len() >= MAX_ATTRIBUTES {
            debug_assert!(false, "vertex declaration is limited to {MAX_ATTRIBUTES} attributes");
            log::error!("Vertex declaration: attribute '{name}' dropped, {MAX_ATTRIBUTES} attributes max");
            return self;
        }
        let info = AttributeInfo {
            stride: self.bytes_per_vertex,
            name: name.to_owned(),
            name_hash: StrHash::new(name),
            rows,
            columns,
            attribute_type,
            normalized,
        };
        self.bytes_per_vertex += info.byte_size();
        self.attributes.push(info);
        self
    }

    /// Marks the last added attribute as normalized.
    pub fn normalized(mut self) -> Self {
        if let Some(last) = self.attributes.last_mut() {
            last.normalized = true;
        }
        self
    }

    /// Advances the stride by `bytes` without adding an attribute.
    pub fn skip_bytes(mut self, bytes: usize) -> Self {
        self.bytes_per_vertex += bytes;
        self
    }

    /// The attribute at `index`.
    pub fn attribute(&self, index: usize) -> Option<&AttributeInfo> {
        self.attributes.get(index)
    }

    /// All attributes in declaration order.
    pub fn attributes(&self) -> &[AttributeInfo] {
        &self.attributes
    }

    /// Number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Size of one vertex in bytes, padding included.
    pub fn bytes_per_vertex(&self) -> usize {
        self.bytes_per_vertex
    }
}

impl PartialEq for VertexDeclaration {
    fn eq(&self, other: &Self) -> bool {
        self.attributes.len() == other.attributes.len()
            && self.bytes_per_vertex == other.bytes_per_vertex
            && self
                .attributes
                .iter()
                .zip(&other.attributes)
                .all(|(l, r)| {
                    l.stride == r.stride
                        && l.name_hash == r.name_hash
                        && l.rows == r.rows
                        && l.columns == r.columns
                        && l.attribute_type == r.attribute_type
                        && l.normalized == r.normalized
                })
    }
}

impl Eq for VertexDeclaration {}

impl Hash for VertexDeclaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes_per_vertex.hash(state);
        for a in &self.attributes {
            (a.stride, a.name_hash, a.rows, a.columns, a.attribute_type, a.normalized).hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite_decl() -> VertexDeclaration {
        VertexDeclaration::new()
            .add_attribute::<f32>("a_vertex", 1, 3)
            .add_attribute::<f32>("a_st", 1, 2)
            .add_attribute::<u8>("a_tint", 1, 4)
            .normalized()
    }

    #[test]
    fn strides_accumulate() {
        let decl = sprite_decl();
        assert_eq!(decl.attribute_count(), 3);
        assert_eq!(decl.attribute(0).map(|a| a.stride), Some(0));
        assert_eq!(decl.attribute(1).map(|a| a.stride), Some(12));
        assert_eq!(decl.attribute(2).map(|a| a.stride), Some(20));
        assert_eq!(decl.bytes_per_vertex(), 24);
        assert!(decl.attribute(2).is_some_and(|a| a.normalized));
        assert!(decl.attribute(0).is_some_and(|a| !a.normalized));
    }

    #[test]
    fn bytes_per_vertex_counts_skips() {
        let decl = sprite_decl().skip_bytes(8);
        let sum: usize = decl.attributes().iter().map(AttributeInfo::byte_size).sum();
        assert_eq!(decl.bytes_per_vertex(), sum + 8);
        assert!(decl.bytes_per_vertex() >= sum);
    }

    #[test]
    fn matrix_attribute_size() {
        let decl = VertexDeclaration::new().add_attribute::<f32>("a_transform", 4, 4);
        assert_eq!(decl.bytes_per_vertex(), 64);
        let shorts = VertexDeclaration::new().add_attribute::<i16>("a_pos", 1, 2);
        assert_eq!(shorts.bytes_per_vertex(), 4);
    }

    #[test]
    fn equality_includes_name_and_normalized_flag() {
        assert_eq!(sprite_decl(), sprite_decl());
        let renamed = VertexDeclaration::new()
            .add_attribute::<f32>("a_position", 1, 3)
            .add_attribute::<f32>("a_st", 1, 2)
            .add_attribute::<u8>("a_tint", 1, 4)
            .normalized();
        assert_ne!(sprite_decl(), renamed);
        let not_normalized = VertexDeclaration::new()
            .add_attribute::<f32>("a_vertex", 1, 3)
            .add_attribute::<f32>("a_st", 1, 2)
            .add_attribute::<u8>("a_tint", 1, 4);
        assert_ne!(sprite_decl(), not_normalized);
        assert_ne!(sprite_decl(), sprite_decl().skip_bytes(4));
    }

    #[test]
    fn normalized_on_empty_is_noop() {
        let decl = VertexDeclaration::new().normalized();
        assert_eq!(decl.attribute_count(), 0);
        assert_eq!(decl.bytes_per_vertex(), 0);
    }
}
