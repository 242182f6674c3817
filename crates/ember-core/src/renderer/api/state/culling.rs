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

//! Face culling state.

use super::enums::CullingFace;
use serde::{Deserialize, Serialize};

/// Face culling configuration. Front faces wind counter-clockwise.
///
/// Two disabled states compare equal whatever their face.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "CullingStateDesc", into = "CullingStateDesc")]
pub struct CullingState {
    enabled: bool,
    face: CullingFace,
}

impl CullingState {
    /// Enables or disables culling.
    pub fn enable(mut self, enable: bool) -> Self {
        self.enabled = enable;
        self
    }

    /// Sets the culled face.
    pub fn face(mut self, face: CullingFace) -> Self {
        self.face = face;
        self
    }

    /// `true` when culling is on.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The culled face.
    pub fn culled_face(&self) -> CullingFace {
        self.face
    }
}

impl PartialEq for CullingState {
    fn eq(&self, other: &Self) -> bool {
        if !self.enabled && !other.enabled {
            return true;
        }
        self.enabled == other.enabled && self.face == other.face
    }
}

impl Eq for CullingState {}

/// Winding of front faces. Only counter-clockwise is accepted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum CullingMode {
    #[default]
    Ccw,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CullingStateDesc {
    enable: bool,
    mode: CullingMode,
    face: CullingFace,
}

impl From<CullingStateDesc> for CullingState {
    fn from(desc: CullingStateDesc) -> Self {
        let CullingMode::Ccw = desc.mode;
        Self {
            enabled: desc.enable,
            face: desc.face,
        }
    }
}

impl From<CullingState> for CullingStateDesc {
    fn from(state: CullingState) -> Self {
        Self {
            enable: state.enabled,
            mode: CullingMode::Ccw,
            face: state.face,
        }
    }
}
