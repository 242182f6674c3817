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

//! Stencil test state.

use super::enums::{CompareFunc, StencilOp};
use serde::{Deserialize, Serialize};

/// Stencil test configuration, shared by front and back faces.
///
/// Two states with the test disabled compare equal whatever their other fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StencilState {
    test: bool,
    write: u8,
    func: CompareFunc,
    #[serde(rename = "ref")]
    reference: u8,
    mask: u8,
    pass: StencilOp,
    sfail: StencilOp,
    zfail: StencilOp,
}

impl Default for StencilState {
    fn default() -> Self {
        Self {
            test: false,
            write: 0xFF,
            func: CompareFunc::Always,
            reference: 0,
            mask: 0xFF,
            pass: StencilOp::Keep,
            sfail: StencilOp::Keep,
            zfail: StencilOp::Keep,
        }
    }
}

impl StencilState {
    /// Enables or disables the stencil test.
    pub fn test(mut self, enable: bool) -> Self {
        self.test = enable;
        self
    }

    /// Sets the write mask.
    pub fn write(mut self, mask: u8) -> Self {
        self.write = mask;
        self
    }

    /// Sets the compare function, the reference value and the read mask.
    pub fn func(mut self, func: CompareFunc, reference: u8, mask: u8) -> Self {
        self.func = func;
        self.reference = reference;
        self.mask = mask;
        self
    }

    /// Sets the operations for stencil pass, stencil fail and depth fail.
    pub fn op(mut self, pass: StencilOp, sfail: StencilOp, zfail: StencilOp) -> Self {
        self.pass = pass;
        self.sfail = sfail;
        self.zfail = zfail;
        self
    }

    /// `true` when the stencil test is on.
    pub fn test_enabled(&self) -> bool {
        self.test
    }

    /// The write mask.
    pub fn write_mask(&self) -> u8 {
        self.write
    }

    /// The compare function.
    pub fn compare_func(&self) -> CompareFunc {
        self.func
    }

    /// The reference value.
    pub fn reference(&self) -> u8 {
        self.reference
    }

    /// The read mask.
    pub fn read_mask(&self) -> u8 {
        self.mask
    }

    /// The operation applied when both tests pass.
    pub fn pass_op(&self) -> StencilOp {
        self.pass
    }

    /// The operation applied when the stencil test fails.
    pub fn sfail_op(&self) -> StencilOp {
        self.sfail
    }

    /// The operation applied when the depth test fails.
    pub fn zfail_op(&self) -> StencilOp {
        self.zfail
    }
}

impl PartialEq for StencilState {
    fn eq(&self, other: &Self) -> bool {
        if !self.test && !other.test {
            return true;
        }
        self.test == other.test
            && self.write == other.write
            && self.func == other.func
            && self.reference == other.reference
            && self.mask == other.mask
            && self.pass == other.pass
            && self.sfail == other.sfail
            && self.zfail == other.zfail
    }
}

impl Eq for StencilState {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_states_are_equal() {
        let a = StencilState::default().write(0x0F).func(CompareFunc::Equal, 1, 0x0F);
        assert_eq!(a, StencilState::default());
    }

    #[test]
    fn enabled_states_compare_every_field() {
        let base = StencilState::default().test(true);
        assert_eq!(base, StencilState::default().test(true));
        assert_ne!(base, base.write(0x0F));
        assert_ne!(
            base,
            base.op(StencilOp::Replace, StencilOp::Keep, StencilOp::Keep)
        );
        assert_ne!(base, StencilState::default());
    }

    #[test]
    fn reference_is_named_ref_in_json() {
        let state: StencilState =
            serde_json::from_str(r#"{ "test": true, "ref": 3, "pass": "replace" }"#)
                .expect("valid stencil state");
        assert_eq!(state.reference(), 3);
        assert_eq!(state.pass_op(), StencilOp::Replace);
        assert_eq!(state.read_mask(), 0xFF);
    }
}
