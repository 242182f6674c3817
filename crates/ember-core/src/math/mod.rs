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

//! Provides the mathematics primitives the render core works with.
//!
//! This is deliberately small: vectors, matrices, rectangles and colors with
//! `bytemuck` layouts so they can be written straight into GPU-bound byte buffers.

pub mod color;
pub mod geometry;
pub mod matrix;
pub mod vector;

pub use self::color::{Color32, LinearRgba};
pub use self::geometry::{Rect, URect};
pub use self::matrix::{Mat2, Mat3, Mat4};
pub use self::vector::{UVec2, Vec2, Vec3, Vec4};

/// Rounds `value` up to the next multiple of `align`. `align` must be non-zero.
#[inline]
pub const fn align_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::align_up;

    #[test]
    fn align_up_rounds_to_multiple() {
        assert_eq!(align_up(0, 16), 0);
        assert_eq!(align_up(1, 16), 16);
        assert_eq!(align_up(16, 16), 16);
        assert_eq!(align_up(20, 16), 32);
        assert_eq!(align_up(7, 2), 8);
    }
}
