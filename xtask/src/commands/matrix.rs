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


//! The crates of the render core and the feature sets they are verified with.

use clap::ValueEnum;

/// Library crates of the render core, in dependency order.
pub const CRATES: [&str; 3] = ["ember-core", "ember-lanes", "ember-infra"];

/// The crate whose features select the backends.
const BACKEND_CRATE: &str = "ember-infra";

/// A backend combination of `ember-infra`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeatureSet {
    /// Recording backend only. Needs no GL headers or drivers.
    Headless,
    /// Recording and OpenGL backends, the crate defaults.
    Opengl,
}

impl FeatureSet {
    /// Every set, the cheapest first.
    pub const ALL: [FeatureSet; 2] = [FeatureSet::Headless, FeatureSet::Opengl];

    /// `ember-infra` features enabled by this set.
    pub fn features(self) -> &'static [&'static str] {
        match self {
            FeatureSet::Headless => &["headless"],
            FeatureSet::Opengl => &["headless", "opengl"],
        }
    }

    /// Short name for task labels.
    pub fn name(self) -> &'static str {
        match self {
            FeatureSet::Headless => "headless",
            FeatureSet::Opengl => "opengl",
        }
    }

    /// Arguments running cargo `verb` over the render core crates with this
    /// feature set. `extra` follows a `--` separator when non-empty.
    pub fn cargo_args(self, verb: &str, extra: &[&str]) -> Vec<String> {
        let mut args = vec![verb.to_owned()];
        for krate in CRATES {
            args.push("-p".to_owned());
            args.push(krate.to_owned());
        }
        args.push("--no-default-features".to_owned());
        args.push("--features".to_owned());
        args.push(
            self.features()
                .iter()
                .map(|feature| format!("{BACKEND_CRATE}/{feature}"))
                .collect::<Vec<_>>()
                .join(","),
        );
        if !extra.is_empty() {
            args.push("--".to_owned());
            args.extend(extra.iter().map(|arg| (*arg).to_owned()));
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_set_disables_the_gl_backend() {
        // --- 1. ARRANGE ---
        let set = FeatureSet::Headless;

        // --- 2. ACT ---
        let args = set.cargo_args("test", &[]);

        // --- 3. ASSERT ---
        assert_eq!(args[0], "test");
        assert!(
            args.contains(&"--no-default-features".to_owned()),
            "default features would pull in the GL backend"
        );
        assert_eq!(args.last().map(String::as_str), Some("ember-infra/headless"));
        assert_eq!(
            args.iter().filter(|arg| *arg == "-p").count(),
            CRATES.len(),
            "every render core crate is selected"
        );
    }

    #[test]
    fn test_extra_args_follow_a_separator() {
        // --- 1. ARRANGE ---
        let set = FeatureSet::Opengl;

        // --- 2. ACT ---
        let args = set.cargo_args("clippy", &["-D", "warnings"]);

        // --- 3. ASSERT ---
        let split = args.iter().position(|arg| arg == "--").expect("separator");
        assert_eq!(args[split - 1], "ember-infra/headless,ember-infra/opengl");
        assert_eq!(args[split + 1..], ["-D", "warnings"]);
    }
}
