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

//! Defines the column-major `Mat2`, `Mat3` and `Mat4` types.
//!
//! Only the pieces the render core uploads to constant buffers live here:
//! construction, identity and a std140 style byte layout.

use super::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// A 2x2 column-major matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Mat2 {
    /// The columns of the matrix.
    pub cols: [Vec2; 2],
}

impl Mat2 {
    /// The 2x2 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec2::X, Vec2::Y],
    };

    /// Creates a new matrix from two column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec2, c1: Vec2) -> Self {
        Self { cols: [c0, c1] }
    }
}

impl Default for Mat2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A 3x3 column-major matrix, typically used for 2D affine transformations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Mat3 {
    /// The columns of the matrix.
    pub cols: [Vec3; 3],
}

impl Mat3 {
    /// The 3x3 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// Creates a new matrix from three column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self {
            cols: [c0, c1, c2],
        }
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A 4x4 column-major matrix, used for world and projection transforms.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Creates a translation matrix.
    #[inline]
    pub const fn from_translation(v: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, Vec4::new(v.x, v.y, v.z, 1.0))
    }

    /// Creates a right-handed orthographic projection with a `[-1, 1]` depth range.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rl = right - left;
        let tb = top - bottom;
        let fnr = far - near;
        Self::from_cols(
            Vec4::new(2.0 / rl, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / tb, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -2.0 / fnr, 0.0),
            Vec4::new(
                -(right + left) / rl,
                -(top + bottom) / tb,
                -(far + near) / fnr,
                1.0,
            ),
        )
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orthographic_maps_corners_to_clip_space() {
        let m = Mat4::orthographic(0.0, 800.0, 0.0, 600.0, -1.0, 1.0);
        // x' = 2/800 * 800 + (-1) = 1
        let x = m.cols[0].x * 800.0 + m.cols[3].x;
        let y = m.cols[1].y * 600.0 + m.cols[3].y;
        assert_relative_eq!(x, 1.0);
        assert_relative_eq!(y, 1.0);
        assert_relative_eq!(m.cols[3].x, -1.0);
    }

    #[test]
    fn identity_is_default() {
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
        assert_eq!(Mat3::default(), Mat3::IDENTITY);
        assert_eq!(Mat2::default(), Mat2::IDENTITY);
    }
}
