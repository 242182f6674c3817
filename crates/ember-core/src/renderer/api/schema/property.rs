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

//! Property records: `{ "name": ..., "type": ..., "value": ... }`.
//!
//! Scalars are JSON numbers. Vectors are arrays of 2 to 4 numbers and matrices
//! flat column-major arrays of 4, 9 or 16 numbers. A record without a value
//! holds zero (identity for matrices).

use crate::math::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use crate::renderer::api::property::{PropertyMap, PropertyValue};
use crate::renderer::api::shader_source::ValueType;
use crate::renderer::error::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDesc {
    /// Uniform name.
    pub name: String,
    /// Value type.
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// The value, shaped by `value_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PropertyDesc {
    /// Builds a record from a typed value.
    pub fn new(name: &str, value: PropertyValue) -> Self {
        let json = match value {
            PropertyValue::I32(v) => Value::from(v),
            PropertyValue::F32(v) => Value::from(v),
            PropertyValue::V2f(v) => Value::from(v.to_array().to_vec()),
            PropertyValue::V3f(v) => Value::from(v.to_array().to_vec()),
            PropertyValue::V4f(v) => Value::from(v.to_array().to_vec()),
            PropertyValue::M2f(m) => flatten(m.cols.map(|c| c.to_array())),
            PropertyValue::M3f(m) => flatten(m.cols.map(|c| c.to_array())),
            PropertyValue::M4f(m) => flatten(m.cols.map(|c| c.to_array())),
        };
        Self {
            name: name.to_owned(),
            value_type: value.value_type(),
            value: Some(json),
        }
    }

    /// Parses the value.
    pub fn parse(&self) -> Result<PropertyValue, SchemaError> {
        let invalid = || {
            SchemaError::InvalidValue(format!(
                "property '{}' does not hold a {:?}",
                self.name, self.value_type
            ))
        };
        let Some(value) = &self.value else {
            return Ok(default_value(self.value_type));
        };
        if self.value_type == ValueType::I32 {
            let v = value.as_i64().ok_or_else(invalid)?;
            return i32::try_from(v).map(PropertyValue::I32).map_err(|_| invalid());
        }
        let floats: Vec<f32> = match value {
            Value::Number(n) => vec![n.as_f64().ok_or_else(invalid)? as f32],
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_f64().map(|f| f as f32))
                .collect::<Option<_>>()
                .ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
        let f = floats.as_slice();
        let parsed = match (self.value_type, f.len()) {
            (ValueType::F32, 1) => PropertyValue::F32(f[0]),
            (ValueType::V2f, 2) => PropertyValue::V2f(Vec2::new(f[0], f[1])),
            (ValueType::V3f, 3) => PropertyValue::V3f(Vec3::new(f[0], f[1], f[2])),
            (ValueType::V4f, 4) => PropertyValue::V4f(Vec4::new(f[0], f[1], f[2], f[3])),
            (ValueType::M2f, 4) => {
                PropertyValue::M2f(Mat2::from_cols(Vec2::new(f[0], f[1]), Vec2::new(f[2], f[3])))
            }
            (ValueType::M3f, 9) => PropertyValue::M3f(Mat3::from_cols(
                Vec3::new(f[0], f[1], f[2]),
                Vec3::new(f[3], f[4], f[5]),
                Vec3::new(f[6], f[7], f[8]),
            )),
            (ValueType::M4f, 16) => PropertyValue::M4f(Mat4::from_cols(
                Vec4::new(f[0], f[1], f[2], f[3]),
                Vec4::new(f[4], f[5], f[6], f[7]),
                Vec4::new(f[8], f[9], f[10], f[11]),
                Vec4::new(f[12], f[13], f[14], f[15]),
            )),
            _ => return Err(invalid()),
        };
        Ok(parsed)
    }
}

fn flatten<const N: usize, const M: usize>(cols: [[f32; N]; M]) -> Value {
    Value::from(cols.concat())
}

fn default_value(value_type: ValueType) -> PropertyValue {
    match value_type {
        ValueType::I32 => PropertyValue::I32(0),
        ValueType::F32 => PropertyValue::F32(0.0),
        ValueType::V2f => PropertyValue::V2f(Vec2::ZERO),
        ValueType::V3f => PropertyValue::V3f(Vec3::ZERO),
        ValueType::V4f => PropertyValue::V4f(Vec4::ZERO),
        ValueType::M2f => PropertyValue::M2f(Mat2::IDENTITY),
        ValueType::M3f => PropertyValue::M3f(Mat3::IDENTITY),
        ValueType::M4f => PropertyValue::M4f(Mat4::IDENTITY),
    }
}

/// Parses a list of records into a map. Later records override earlier ones.
pub fn parse_properties(records: &[PropertyDesc]) -> Result<PropertyMap, SchemaError> {
    let mut map = PropertyMap::new();
    for record in records {
        map.assign(record.name.as_str(), record.parse()?);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_shape() {
        let json = r#"[
            { "name": "u_count", "type": "i32", "value": 3 },
            { "name": "u_time", "type": "f32", "value": 0.5 },
            { "name": "u_tint", "type": "v4f", "value": [1, 0.5, 0.25, 1] },
            { "name": "u_rot", "type": "m2f", "value": [0, 1, -1, 0] },
            { "name": "u_vp", "type": "m4f" }
        ]"#;
        let records: Vec<PropertyDesc> = serde_json::from_str(json).expect("valid records");
        let map = parse_properties(&records).expect("valid values");
        assert_eq!(map.len(), 5);
        assert_eq!(map.find("u_count"), Some(&PropertyValue::I32(3)));
        assert_eq!(
            map.find("u_tint"),
            Some(&PropertyValue::V4f(Vec4::new(1.0, 0.5, 0.25, 1.0)))
        );
        assert_eq!(
            map.find("u_rot"),
            Some(&PropertyValue::M2f(Mat2::from_cols(
                Vec2::new(0.0, 1.0),
                Vec2::new(-1.0, 0.0)
            )))
        );
        assert_eq!(map.find("u_vp"), Some(&PropertyValue::M4f(Mat4::IDENTITY)));
    }

    #[test]
    fn shape_mismatch_is_invalid() {
        let record = PropertyDesc {
            name: "u_tint".into(),
            value_type: ValueType::V3f,
            value: Some(serde_json::json!([1, 2])),
        };
        assert!(matches!(record.parse(), Err(SchemaError::InvalidValue(_))));
        let fractional = PropertyDesc {
            name: "u_count".into(),
            value_type: ValueType::I32,
            value: Some(serde_json::json!(1.5)),
        };
        assert!(fractional.parse().is_err());
    }

    #[test]
    fn typed_values_survive_a_record() {
        let value = PropertyValue::V3f(Vec3::new(1.0, 2.0, 3.0));
        let record = PropertyDesc::new("u_pos", value);
        let json = serde_json::to_string(&record).expect("serializable");
        let back: PropertyDesc = serde_json::from_str(&json).expect("parsable");
        assert_eq!(back.parse().ok(), Some(value));
    }
}
