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

//! A macro to declare small flag sets such as color write masks.

/// Declares a `Copy` flag set over an unsigned integer.
///
/// Flags whose value is zero are ignored by the `Debug` output.
#[macro_export]
#[doc(hidden)]
macro_rules! ember_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag_name:ident = $flag_value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            /// The set with no flag.
            pub const EMPTY: Self = Self { bits: 0 };

            $(
                $(#[$flag_attr])*
                pub const $flag_name: Self = Self { bits: $flag_value };
            )*

            /// Builds a set from raw bits, keeping unknown bits.
            pub const fn from_bits_truncate(bits: $ty) -> Self {
                Self { bits }
            }

            /// The raw bits.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// `true` when no bit is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// `true` when every flag of `other` is set in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// `true` when `self` and `other` share at least one flag.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// Sets the flags of `other`.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Clears the flags of `other`.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }

            /// Sets or clears the flags of `other` depending on `value`.
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }
        }

        impl core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }
        }

        impl core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, other: Self) {
                self.bits |= other.bits;
            }
        }

        impl core::ops::BitAnd for $name {
            type Output = Self;
            fn bitand(self, other: Self) -> Self {
                Self { bits: self.bits & other.bits }
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let mut set = f.debug_set();
                let mut rest = self.bits;
                $(
                    let value: $ty = $flag_value;
                    if value != 0 && (rest & value) == value {
                        set.entry(&format_args!("{}", stringify!($flag_name)));
                        rest &= !value;
                    }
                )*
                if rest != 0 {
                    set.entry(&format_args!("{:#x}", rest));
                }
                set.finish()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::ember_bitflags;

    ember_bitflags! {
        /// Test flags.
        pub struct Channels: u8 {
            const R = 1 << 0;
            const G = 1 << 1;
            const B = 1 << 2;
            const RG = Self::R.bits() | Self::G.bits();
        }
    }

    #[test]
    fn contains_and_intersects() {
        let rg = Channels::R | Channels::G;
        assert_eq!(rg, Channels::RG);
        assert!(rg.contains(Channels::R));
        assert!(!rg.contains(Channels::B));
        assert!(rg.intersects(Channels::G | Channels::B));
        assert!(Channels::default().is_empty());
    }

    #[test]
    fn set_and_remove() {
        let mut flags = Channels::EMPTY;
        flags.set(Channels::B, true);
        assert_eq!(flags, Channels::B);
        flags.set(Channels::B, false);
        assert!(flags.is_empty());
        flags.insert(Channels::RG);
        flags.remove(Channels::R);
        assert_eq!(flags, Channels::G);
    }

    #[test]
    fn debug_lists_named_flags_then_unknown_bits() {
        assert_eq!(format!("{:?}", Channels::EMPTY), "{}");
        assert_eq!(format!("{:?}", Channels::R | Channels::B), "{R, B}");
        assert_eq!(
            format!("{:?}", Channels::from_bits_truncate(0b1001)),
            "{R, 0x8}"
        );
    }
}
