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

//! Named uniform values fed into constant buffers.

use super::shader_source::ValueType;
use crate::math::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use crate::utils::StrHash;

/// A single uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub enum PropertyValue {
    I32(i32),
    F32(f32),
    V2f(Vec2),
    V3f(Vec3),
    V4f(Vec4),
    M2f(Mat2),
    M3f(Mat3),
    M4f(Mat4),
}

impl PropertyValue {
    /// The matching uniform type.
    pub fn value_type(&self) -> ValueType {
        match self {
            PropertyValue::I32(_) => ValueType::I32,
            PropertyValue::F32(_) => ValueType::F32,
            PropertyValue::V2f(_) => ValueType::V2f,
            PropertyValue::V3f(_) => ValueType::V3f,
            PropertyValue::V4f(_) => ValueType::V4f,
            PropertyValue::M2f(_) => ValueType::M2f,
            PropertyValue::M3f(_) => ValueType::M3f,
            PropertyValue::M4f(_) => ValueType::M4f,
        }
    }

    /// Writes the value in constant buffer layout at the start of `dst`.
    ///
    /// Columns of `m2f` and `m3f` start every 16 bytes; the padding bytes are
    /// left untouched. `dst` must hold at least [`ValueType::size`] bytes.
    pub fn write_to(&self, dst: &mut [u8]) {
        fn put(dst: &mut [u8], at: usize, floats: &[f32]) {
            let bytes: &[u8] = bytemuck::cast_slice(floats);
            dst[at..at + bytes.len()].copy_from_slice(bytes);
        }
        match self {
            PropertyValue::I32(v) => dst[..4].copy_from_slice(&v.to_ne_bytes()),
            PropertyValue::F32(v) => put(dst, 0, &[*v]),
            PropertyValue::V2f(v) => put(dst, 0, &v.to_array()),
            PropertyValue::V3f(v) => put(dst, 0, &v.to_array()),
            PropertyValue::V4f(v) => put(dst, 0, &v.to_array()),
            PropertyValue::M2f(m) => {
                for (i, col) in m.cols.iter().enumerate() {
                    put(dst, i * 16, &col.to_array());
                }
            }
            PropertyValue::M3f(m) => {
                for (i, col) in m.cols.iter().enumerate() {
                    put(dst, i * 16, &col.to_array());
                }
            }
            PropertyValue::M4f(m) => {
                for (i, col) in m.cols.iter().enumerate() {
                    put(dst, i * 16, &col.to_array());
                }
            }
        }
    }
}

macro_rules! property_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for PropertyValue {
            fn from(value: $ty) -> Self {
                PropertyValue::$variant(value)
            }
        })*
    };
}

property_from! {
    i32 => I32,
    f32 => F32,
    Vec2 => V2f,
    Vec3 => V3f,
    Vec4 => V4f,
    Mat2 => M2f,
    Mat3 => M3f,
    Mat4 => M4f,
}

/// A small map from uniform name to value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: Vec<(StrHash, PropertyValue)>,
}

impl PropertyMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`assign`](Self::assign).
    pub fn with(mut self, name: impl Into<StrHash>, value: impl Into<PropertyValue>) -> Self {
        self.assign(name, value);
        self
    }

    /// Sets `name` to `value`, replacing a previous value.
    pub fn assign(
        &mut self,
        name: impl Into<StrHash>,
        value: impl Into<PropertyValue>,
    ) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// The value of `name`, if set.
    pub fn find(&self, name: impl Into<StrHash>) -> Option<&PropertyValue> {
        let name = name.into();
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Copies every entry of `other` into `self`, overriding existing names.
    pub fn merge(&mut self, other: &PropertyMap) -> &mut Self {
        for (name, value) in &other.entries {
            self.assign(*name, *value);
        }
        self
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the map has no entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (StrHash, &PropertyValue)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }
}
