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

//! Defines the hierarchy of error types for the render core.

use std::fmt;

/// An error raised while compiling or linking a shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    CompilationFailed {
        /// The stage that failed (`"vertex"` or `"fragment"`).
        stage: &'static str,
        /// The compiler log.
        log: String,
    },
    /// The program failed to link.
    LinkFailed {
        /// The linker log.
        log: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationFailed { stage, log } => {
                write!(f, "Failed to compile {stage} shader: {log}")
            }
            ShaderError::LinkFailed { log } => write!(f, "Failed to link shader program: {log}"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// A rejected resource operation: creation, update or query of a GPU resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A shader failed to build.
    Shader(ShaderError),
    /// The device cannot store this pixel format.
    UnsupportedPixel(String),
    /// The device cannot use this index type.
    UnsupportedIndex(String),
    /// The device cannot use this vertex layout.
    UnsupportedVertex(String),
    /// The requested texture or renderbuffer exceeds the device limit.
    TextureTooLarge {
        /// The requested width or height.
        requested: u32,
        /// The device limit.
        max: u32,
    },
    /// Non power-of-two textures are not supported by the device.
    NonPowerOfTwo,
    /// Depth textures are not supported by the device.
    DepthTextureUnsupported,
    /// Render targets are not supported by the device.
    RenderTargetUnsupported,
    /// The buffer usage does not allow this operation.
    InvalidUsage(String),
    /// A size or data length is zero or not a multiple of the element size.
    InvalidSize(String),
    /// An update reaches past the end of the resource.
    OutOfBounds,
    /// A compressed region is not aligned to the compression block.
    MisalignedRegion,
    /// The data declaration does not match the resource declaration.
    IncompatibleDeclaration(String),
    /// The backend reported an incomplete framebuffer.
    FramebufferIncomplete(String),
    /// An error originating from the backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::UnsupportedPixel(pixel) => {
                write!(f, "Unsupported pixel declaration: {pixel}")
            }
            ResourceError::UnsupportedIndex(index) => {
                write!(f, "Unsupported index declaration: {index}")
            }
            ResourceError::UnsupportedVertex(msg) => {
                write!(f, "Unsupported vertex declaration: {msg}")
            }
            ResourceError::TextureTooLarge { requested, max } => {
                write!(f, "Texture size {requested} exceeds the device limit {max}")
            }
            ResourceError::NonPowerOfTwo => {
                write!(f, "Non power of two textures are not supported")
            }
            ResourceError::DepthTextureUnsupported => {
                write!(f, "Depth textures are not supported")
            }
            ResourceError::RenderTargetUnsupported => {
                write!(f, "Render targets are not supported")
            }
            ResourceError::InvalidUsage(msg) => write!(f, "Invalid buffer usage: {msg}"),
            ResourceError::InvalidSize(msg) => write!(f, "Invalid size: {msg}"),
            ResourceError::OutOfBounds => write!(f, "Resource access out of bounds."),
            ResourceError::MisalignedRegion => {
                write!(f, "Region is not aligned to the compression block size")
            }
            ResourceError::IncompatibleDeclaration(msg) => {
                write!(f, "Incompatible declaration: {msg}")
            }
            ResourceError::FramebufferIncomplete(msg) => {
                write!(f, "Framebuffer is incomplete: {msg}")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// An error raised while recording or executing a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The operation needs an open render pass.
    NoActivePass,
    /// The operation needs every render pass to be closed.
    PassStillOpen,
    /// A constant buffer does not match the shader block it was bound to.
    IncompatibleConstBuffer,
    /// A resource operation failed.
    Resource(ResourceError),
    /// The graphics device was lost.
    DeviceLost,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoActivePass => write!(f, "No render pass is active"),
            RenderError::PassStillOpen => write!(f, "A render pass is still open"),
            RenderError::IncompatibleConstBuffer => {
                write!(f, "Constant buffer is incompatible with the bound shader")
            }
            RenderError::Resource(err) => write!(f, "Resource error: {err}"),
            RenderError::DeviceLost => write!(f, "The graphics device was lost"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::Resource(err)
    }
}

impl From<ShaderError> for RenderError {
    fn from(err: ShaderError) -> Self {
        RenderError::Resource(ResourceError::Shader(err))
    }
}

/// An error raised while reading or writing a JSON description.
#[derive(Debug)]
pub enum SchemaError {
    /// The document is not valid JSON or does not match the description layout.
    Json(serde_json::Error),
    /// An address could not be resolved by the asset layer.
    UnresolvedAddress(String),
    /// A field holds a value outside its domain.
    InvalidValue(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Json(err) => write!(f, "Invalid description: {err}"),
            SchemaError::UnresolvedAddress(address) => {
                write!(f, "Failed to resolve address '{address}'")
            }
            SchemaError::InvalidValue(msg) => write!(f, "Invalid value: {msg}"),
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchemaError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn shader_error_converts_through_resource() {
        let err: RenderError = ShaderError::LinkFailed {
            log: "missing main".into(),
        }
        .into();
        assert!(matches!(
            err,
            RenderError::Resource(ResourceError::Shader(ShaderError::LinkFailed { .. }))
        ));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("missing main"));
    }

    #[test]
    fn display_messages() {
        assert_eq!(RenderError::NoActivePass.to_string(), "No render pass is active");
        let too_large = ResourceError::TextureTooLarge {
            requested: 8192,
            max: 4096,
        };
        assert_eq!(
            too_large.to_string(),
            "Texture size 8192 exceeds the device limit 4096"
        );
    }
}
