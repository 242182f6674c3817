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

//! Render configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backend family drives the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// No device: commands are recorded and dropped.
    None,
    /// Desktop OpenGL.
    #[default]
    #[serde(rename = "opengl")]
    OpenGl,
    /// OpenGL ES 2.0.
    #[serde(rename = "opengles")]
    OpenGles,
    /// OpenGL ES 3.x.
    #[serde(rename = "opengles3")]
    OpenGles3,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderMode::None => "none",
            RenderMode::OpenGl => "opengl",
            RenderMode::OpenGles => "opengles",
            RenderMode::OpenGles3 => "opengles3",
        };
        f.write_str(name)
    }
}

/// A collection of global settings for the render module and the batcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// The backend family.
    pub mode: RenderMode,
    /// If `true`, the backend checks for errors after every call.
    pub debug: bool,
    /// If `true`, the batcher merges compatible batches.
    pub batching: bool,
    /// If `true`, the executor skips state changes that match the current
    /// pipeline state.
    pub state_diffing: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mode: RenderMode::OpenGl,
            debug: cfg!(debug_assertions),
            batching: true,
            state_diffing: true,
        }
    }
}

impl RenderSettings {
    /// Reads settings from a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A static description of how the binary was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    /// The target platform tag.
    pub platform: &'static str,
    /// `"debug"` or `"release"`.
    pub build_mode: &'static str,
    /// The render mode the binary defaults to.
    pub render_mode: RenderMode,
}

impl BuildInfo {
    /// Describes the current build.
    pub const fn current() -> Self {
        let platform = if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "ios") {
            "ios"
        } else if cfg!(target_os = "android") {
            "android"
        } else if cfg!(target_os = "linux") {
            "linux"
        } else {
            "unknown"
        };
        let render_mode = if cfg!(any(target_os = "ios", target_os = "android")) {
            RenderMode::OpenGles
        } else {
            RenderMode::OpenGl
        };
        Self {
            platform,
            build_mode: if cfg!(debug_assertions) { "debug" } else { "release" },
            render_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_load_from_partial_json() {
        let settings =
            RenderSettings::from_json(r#"{ "mode": "none", "batching": false }"#).expect("valid");
        assert_eq!(settings.mode, RenderMode::None);
        assert!(!settings.batching);
        assert!(settings.state_diffing);
        assert!(RenderSettings::from_json(r#"{ "mode": "vulkan" }"#).is_err());
    }

    #[test]
    fn render_mode_names() {
        assert_eq!(RenderMode::OpenGles3.to_string(), "opengles3");
        let parsed: RenderMode = serde_json::from_str("\"opengles\"").expect("valid");
        assert_eq!(parsed, RenderMode::OpenGles);
    }

    #[test]
    fn build_info_matches_cfg() {
        let info = BuildInfo::current();
        assert_eq!(info.build_mode == "debug", cfg!(debug_assertions));
        assert!(!info.platform.is_empty());
    }
}
