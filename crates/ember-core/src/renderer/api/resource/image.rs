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

//! CPU-side images, the usual source of texture data.

use crate::math::UVec2;
use crate::renderer::api::declaration::{PixelDeclaration, PixelType};
use crate::renderer::error::ResourceError;
use serde::{Deserialize, Serialize};

/// The pixel layout of an [`Image`]. Every image format is a color format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ImageFormat {
    G8,
    Ga8,
    Rgb8,
    #[default]
    Rgba8,
    RgbDxt1,
    RgbaDxt1,
    RgbaDxt3,
    RgbaDxt5,
    RgbPvrtc2,
    RgbPvrtc4,
    RgbaPvrtc2,
    RgbaPvrtc4,
    RgbaPvrtc2V2,
    RgbaPvrtc4V2,
}

impl ImageFormat {
    /// The pixel type a texture created from this format uses.
    pub const fn pixel_type(self) -> PixelType {
        match self {
            ImageFormat::G8 => PixelType::G8,
            ImageFormat::Ga8 => PixelType::Ga8,
            ImageFormat::Rgb8 => PixelType::Rgb8,
            ImageFormat::Rgba8 => PixelType::Rgba8,
            ImageFormat::RgbDxt1 => PixelType::RgbDxt1,
            ImageFormat::RgbaDxt1 => PixelType::RgbaDxt1,
            ImageFormat::RgbaDxt3 => PixelType::RgbaDxt3,
            ImageFormat::RgbaDxt5 => PixelType::RgbaDxt5,
            ImageFormat::RgbPvrtc2 => PixelType::RgbPvrtc2,
            ImageFormat::RgbPvrtc4 => PixelType::RgbPvrtc4,
            ImageFormat::RgbaPvrtc2 => PixelType::RgbaPvrtc2,
            ImageFormat::RgbaPvrtc4 => PixelType::RgbaPvrtc4,
            ImageFormat::RgbaPvrtc2V2 => PixelType::RgbaPvrtc2V2,
            ImageFormat::RgbaPvrtc4V2 => PixelType::RgbaPvrtc4V2,
        }
    }

    /// The matching pixel declaration.
    pub const fn pixel_declaration(self) -> PixelDeclaration {
        PixelDeclaration::new(self.pixel_type())
    }
}

/// Decoded image data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    size: UVec2,
    format: ImageFormat,
    data: Vec<u8>,
}

impl Image {
    /// Wraps `data`, which must hold exactly one `size` image in `format`.
    pub fn new(size: UVec2, format: ImageFormat, data: Vec<u8>) -> Result<Self, ResourceError> {
        let expected = format.pixel_declaration().data_size(size);
        if data.len() != expected {
            return Err(ResourceError::InvalidSize(format!(
                "image data is {} bytes, a {}x{} {:?} image needs {}",
                data.len(),
                size.x,
                size.y,
                format,
                expected
            )));
        }
        Ok(Self { size, format, data })
    }

    /// Size in pixels.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Pixel layout.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Raw bytes, row by row from the top.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// `true` for a zero-sized image.
    pub fn is_empty(&self) -> bool {
        self.size.has_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_length_must_match() {
        assert!(Image::new(UVec2::new(2, 2), ImageFormat::Rgb8, vec![0; 12]).is_ok());
        assert!(matches!(
            Image::new(UVec2::new(2, 2), ImageFormat::Rgb8, vec![0; 16]),
            Err(ResourceError::InvalidSize(_))
        ));
        assert!(Image::new(UVec2::new(4, 4), ImageFormat::RgbaDxt5, vec![0; 16]).is_ok());
    }

    #[test]
    fn every_image_format_maps_to_a_color_pixel() {
        for format in [ImageFormat::G8, ImageFormat::RgbaPvrtc4V2, ImageFormat::RgbDxt1] {
            assert!(format.pixel_declaration().is_color());
        }
    }
}
