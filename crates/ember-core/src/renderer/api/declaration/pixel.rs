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

//! Pixel formats for textures and render target attachments.

use crate::math::UVec2;
use serde::{Deserialize, Serialize};

/// Every pixel layout the render core knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelType {
    /// 16-bit depth.
    Depth16,
    /// 16-bit depth with an 8-bit stencil channel.
    Depth16Stencil8,
    /// 24-bit depth.
    Depth24,
    /// 24-bit depth with an 8-bit stencil channel.
    Depth24Stencil8,
    /// 32-bit depth.
    Depth32,
    /// 32-bit depth with an 8-bit stencil channel.
    Depth32Stencil8,
    /// 8-bit grayscale.
    G8,
    /// 8-bit grayscale with alpha.
    Ga8,
    /// 8-bit RGB.
    Rgb8,
    /// 8-bit RGBA.
    #[default]
    Rgba8,
    /// DXT1 without alpha.
    RgbDxt1,
    /// DXT1 with 1-bit alpha.
    RgbaDxt1,
    /// DXT3.
    RgbaDxt3,
    /// DXT5.
    RgbaDxt5,
    /// PVRTC 2bpp without alpha.
    RgbPvrtc2,
    /// PVRTC 4bpp without alpha.
    RgbPvrtc4,
    /// PVRTC 2bpp with alpha.
    RgbaPvrtc2,
    /// PVRTC 4bpp with alpha.
    RgbaPvrtc4,
    /// PVRTC2 2bpp.
    RgbaPvrtc2V2,
    /// PVRTC2 4bpp.
    RgbaPvrtc4V2,
}

impl PixelType {
    /// Every pixel type, in declaration order.
    pub const ALL: [PixelType; 20] = [
        PixelType::Depth16,
        PixelType::Depth16Stencil8,
        PixelType::Depth24,
        PixelType::Depth24Stencil8,
        PixelType::Depth32,
        PixelType::Depth32Stencil8,
        PixelType::G8,
        PixelType::Ga8,
        PixelType::Rgb8,
        PixelType::Rgba8,
        PixelType::RgbDxt1,
        PixelType::RgbaDxt1,
        PixelType::RgbaDxt3,
        PixelType::RgbaDxt5,
        PixelType::RgbPvrtc2,
        PixelType::RgbPvrtc4,
        PixelType::RgbaPvrtc2,
        PixelType::RgbaPvrtc4,
        PixelType::RgbaPvrtc2V2,
        PixelType::RgbaPvrtc4V2,
    ];
}

/// Compression family, used to check device support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionFamily {
    /// S3TC / DXT.
    Dxt,
    /// PVRTC.
    Pvrtc,
    /// PVRTC2.
    Pvrtc2,
}

struct PixelInfo {
    bits_per_pixel: u32,
    color: bool,
    depth: bool,
    stencil: bool,
    compressed: bool,
    block: (u32, u32),
}

const fn plain(bits_per_pixel: u32, color: bool, depth: bool, stencil: bool) -> PixelInfo {
    PixelInfo {
        bits_per_pixel,
        color,
        depth,
        stencil,
        compressed: false,
        block: (1, 1),
    }
}

const fn packed(bits_per_pixel: u32, block: (u32, u32)) -> PixelInfo {
    PixelInfo {
        bits_per_pixel,
        color: true,
        depth: false,
        stencil: false,
        compressed: true,
        block,
    }
}

const fn info(pixel_type: PixelType) -> PixelInfo {
    match pixel_type {
        PixelType::Depth16 => plain(16, false, true, false),
        PixelType::Depth16Stencil8 => plain(24, false, true, true),
        PixelType::Depth24 => plain(24, false, true, false),
        PixelType::Depth24Stencil8 => plain(32, false, true, true),
        PixelType::Depth32 => plain(32, false, true, false),
        PixelType::Depth32Stencil8 => plain(40, false, true, true),
        PixelType::G8 => plain(8, true, false, false),
        PixelType::Ga8 => plain(16, true, false, false),
        PixelType::Rgb8 => plain(24, true, false, false),
        PixelType::Rgba8 => plain(32, true, false, false),
        PixelType::RgbDxt1 | PixelType::RgbaDxt1 => packed(4, (4, 4)),
        PixelType::RgbaDxt3 | PixelType::RgbaDxt5 => packed(8, (4, 4)),
        PixelType::RgbPvrtc2 | PixelType::RgbaPvrtc2 | PixelType::RgbaPvrtc2V2 => {
            packed(2, (8, 4))
        }
        PixelType::RgbPvrtc4 | PixelType::RgbaPvrtc4 | PixelType::RgbaPvrtc4V2 => {
            packed(4, (4, 4))
        }
    }
}

/// Describes the layout of one texel. Equality is by [`PixelType`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelDeclaration {
    pixel_type: PixelType,
}

impl PixelDeclaration {
    /// Creates a declaration for `pixel_type`.
    pub const fn new(pixel_type: PixelType) -> Self {
        Self { pixel_type }
    }

    /// The pixel type.
    pub const fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    /// `true` for color formats, compressed or not.
    pub const fn is_color(&self) -> bool {
        info(self.pixel_type).color
    }

    /// `true` for depth formats.
    pub const fn is_depth(&self) -> bool {
        info(self.pixel_type).depth
    }

    /// `true` for depth formats carrying a stencil channel.
    pub const fn is_stencil(&self) -> bool {
        info(self.pixel_type).stencil
    }

    /// `true` for block-compressed formats.
    pub const fn is_compressed(&self) -> bool {
        info(self.pixel_type).compressed
    }

    /// Bits per texel (averaged over a block for compressed formats).
    pub const fn bits_per_pixel(&self) -> u32 {
        info(self.pixel_type).bits_per_pixel
    }

    /// The compression block size in texels, `(1, 1)` for uncompressed formats.
    pub const fn compressed_block_size(&self) -> UVec2 {
        let (x, y) = info(self.pixel_type).block;
        UVec2::new(x, y)
    }

    /// The compression family, if any.
    pub const fn compression_family(&self) -> Option<CompressionFamily> {
        match self.pixel_type {
            PixelType::RgbDxt1 | PixelType::RgbaDxt1 | PixelType::RgbaDxt3 | PixelType::RgbaDxt5 => {
                Some(CompressionFamily::Dxt)
            }
            PixelType::RgbPvrtc2
            | PixelType::RgbPvrtc4
            | PixelType::RgbaPvrtc2
            | PixelType::RgbaPvrtc4 => Some(CompressionFamily::Pvrtc),
            PixelType::RgbaPvrtc2V2 | PixelType::RgbaPvrtc4V2 => Some(CompressionFamily::Pvrtc2),
            _ => None,
        }
    }

    /// Byte size of a `size` image in this format.
    ///
    /// Compressed sizes round up to whole blocks.
    pub fn data_size(&self, size: UVec2) -> usize {
        let block = self.compressed_block_size();
        let blocks_x = size.x.div_ceil(block.x) as usize;
        let blocks_y = size.y.div_ceil(block.y) as usize;
        let bits_per_block = (self.bits_per_pixel() * block.x * block.y) as usize;
        blocks_x * blocks_y * bits_per_block / 8
    }
}

impl From<PixelType> for PixelDeclaration {
    fn from(pixel_type: PixelType) -> Self {
        Self::new(pixel_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_is_color_or_depth() {
        for ty in PixelType::ALL {
            let decl = PixelDeclaration::new(ty);
            assert!(
                decl.is_color() as u32 + decl.is_depth() as u32 >= 1,
                "{ty:?}"
            );
            if decl.is_stencil() {
                assert!(decl.is_depth(), "{ty:?}");
            }
            if decl.is_compressed() {
                let block = decl.compressed_block_size();
                assert!(block.x * block.y > 1, "{ty:?}");
            }
        }
    }

    #[test]
    fn table_values() {
        let d = PixelDeclaration::new;
        assert_eq!(d(PixelType::Depth24Stencil8).bits_per_pixel(), 32);
        assert_eq!(d(PixelType::Depth16Stencil8).bits_per_pixel(), 24);
        assert_eq!(d(PixelType::Rgb8).bits_per_pixel(), 24);
        assert_eq!(d(PixelType::RgbaDxt5).bits_per_pixel(), 8);
        assert_eq!(
            d(PixelType::RgbaPvrtc2V2).compressed_block_size(),
            UVec2::new(8, 4)
        );
        assert_eq!(d(PixelType::Rgba8).compressed_block_size(), UVec2::ONE);
        assert_eq!(
            d(PixelType::RgbPvrtc4).compression_family(),
            Some(CompressionFamily::Pvrtc)
        );
        assert_eq!(d(PixelType::G8).compression_family(), None);
    }

    #[test]
    fn data_size_rounds_to_blocks() {
        let rgba = PixelDeclaration::new(PixelType::Rgba8);
        assert_eq!(rgba.data_size(UVec2::new(2, 3)), 24);
        let dxt1 = PixelDeclaration::new(PixelType::RgbDxt1);
        // one 4x4 block of 8 bytes, even for a 1x1 image
        assert_eq!(dxt1.data_size(UVec2::new(1, 1)), 8);
        assert_eq!(dxt1.data_size(UVec2::new(8, 4)), 16);
        let pvrtc2 = PixelDeclaration::new(PixelType::RgbaPvrtc2);
        assert_eq!(pvrtc2.data_size(UVec2::new(16, 8)), 32);
    }

    #[test]
    fn equality_is_by_tag() {
        assert_eq!(
            PixelDeclaration::new(PixelType::G8),
            PixelType::G8.into()
        );
        assert_ne!(
            PixelDeclaration::new(PixelType::G8),
            PixelDeclaration::new(PixelType::Ga8)
        );
    }
}
