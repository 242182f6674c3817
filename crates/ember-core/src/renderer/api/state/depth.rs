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

//! Depth test and depth write state.

use super::enums::CompareFunc;
use serde::{Deserialize, Serialize};

/// Depth test configuration.
///
/// Two states compare equal when `test` and `write` match and, if the test is
/// enabled, the compare function matches too.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DepthState {
    test: bool,
    write: bool,
    func: CompareFunc,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            test: false,
            write: true,
            func: CompareFunc::Less,
        }
    }
}

impl DepthState {
    /// Enables or disables the depth test.
    pub fn test(mut self, enable: bool) -> Self {
        self.test = enable;
        self
    }

    /// Enables or disables depth writes.
    pub fn write(mut self, enable: bool) -> Self {
        self.write = enable;
        self
    }

    /// Sets the compare function.
    pub fn func(mut self, func: CompareFunc) -> Self {
        self.func = func;
        self
    }

    /// `true` when the depth test is on.
    pub fn test_enabled(&self) -> bool {
        self.test
    }

    /// `true` when depth writes are on.
    pub fn write_enabled(&self) -> bool {
        self.write
    }

    /// The compare function.
    pub fn compare_func(&self) -> CompareFunc {
        self.func
    }
}

impl PartialEq for DepthState {
    fn eq(&self, other: &Self) -> bool {
        self.test == other.test
            && self.write == other.write
            && (!self.test || self.func == other.func)
    }
}

impl Eq for DepthState {}
