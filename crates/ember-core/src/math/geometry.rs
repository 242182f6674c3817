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

//! Axis-aligned rectangles for pixel regions and sprite placement.

use super::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

/// An integer rectangle, used for viewports, scissors and texture regions.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct URect {
    /// The bottom-left corner.
    pub position: UVec2,
    /// The extent in pixels.
    pub size: UVec2,
}

impl URect {
    /// Creates a rectangle from its corner and extent.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            position: UVec2::new(x, y),
            size: UVec2::new(width, height),
        }
    }

    /// Creates a rectangle anchored at the origin.
    #[inline]
    pub const fn from_size(size: UVec2) -> Self {
        Self {
            position: UVec2::ZERO,
            size,
        }
    }

    /// Returns the exclusive far corner, or `None` on overflow.
    #[inline]
    pub fn checked_max(&self) -> Option<UVec2> {
        Some(UVec2::new(
            self.position.x.checked_add(self.size.x)?,
            self.position.y.checked_add(self.size.y)?,
        ))
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    pub fn contains_rect(&self, other: &URect) -> bool {
        match (self.checked_max(), other.checked_max()) {
            (Some(a), Some(b)) => {
                other.position.x >= self.position.x
                    && other.position.y >= self.position.y
                    && b.x <= a.x
                    && b.y <= a.y
            }
            _ => false,
        }
    }
}

/// A floating point rectangle, used for sprite positions and texture coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// The bottom-left corner.
    pub position: Vec2,
    /// The extent.
    pub size: Vec2,
}

impl Rect {
    /// Creates a rectangle from its corner and extent.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// The unit rectangle `(0, 0, 1, 1)`, the usual full-texture uv range.
    pub const UNIT: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Returns the far corner.
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.position + self.size
    }

    /// Returns the center point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_rect_checks_both_corners() {
        let outer = URect::new(0, 0, 64, 64);
        assert!(outer.contains_rect(&URect::new(0, 0, 64, 64)));
        assert!(outer.contains_rect(&URect::new(8, 8, 16, 16)));
        assert!(!outer.contains_rect(&URect::new(60, 0, 8, 8)));
        assert!(!outer.contains_rect(&URect::new(u32::MAX, 0, 8, 8)));
    }
}
