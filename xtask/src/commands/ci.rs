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


//! CI steps. Each task expands to cargo invocations over the feature matrix.

use super::matrix::FeatureSet;
use crate::helpers::{run_cargo, Outcome};
use anyhow::Result;

/// One cargo invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Shown before and after the run.
    pub label: String,
    /// Arguments after `cargo`.
    pub args: Vec<String>,
}

impl Step {
    fn new(label: impl Into<String>, args: &[&str]) -> Self {
        Self {
            label: label.into(),
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
        }
    }

    fn per_set(verb: &str, sets: &[FeatureSet], extra: &[&str]) -> Vec<Self> {
        sets.iter()
            .map(|set| Self {
                label: format!("{verb} ({})", set.name()),
                args: set.cargo_args(verb, extra),
            })
            .collect()
    }
}

/// The sets a task runs with: `only`, or the whole matrix.
fn sets(only: Option<FeatureSet>) -> Vec<FeatureSet> {
    only.map_or_else(|| FeatureSet::ALL.to_vec(), |set| vec![set])
}

pub fn build() -> Vec<Step> {
    vec![Step::new(
        "build",
        &["build", "--workspace", "--exclude", "xtask"],
    )]
}

pub fn test(only: Option<FeatureSet>) -> Vec<Step> {
    Step::per_set("test", &sets(only), &[])
}

pub fn check(only: Option<FeatureSet>) -> Vec<Step> {
    Step::per_set("check", &sets(only), &[])
}

pub fn clippy(only: Option<FeatureSet>) -> Vec<Step> {
    Step::per_set("clippy", &sets(only), &["-D", "warnings"])
}

pub fn format(check_only: bool) -> Vec<Step> {
    let args: &[&str] = if check_only {
        &["fmt", "--all", "--", "--check"]
    } else {
        &["fmt", "--all"]
    };
    vec![Step::new("format", args)]
}

/// The sandbox always runs headless.
pub fn sandbox() -> Vec<Step> {
    vec![Step::new("sandbox", &["run", "-p", "sandbox"])]
}

/// Format check first, then the matrix, then the sandbox.
pub fn pipeline() -> Vec<Step> {
    let mut steps = format(true);
    steps.extend(check(None));
    steps.extend(clippy(None));
    steps.extend(test(None));
    steps.extend(build());
    steps.extend(sandbox());
    steps
}

/// Runs every step, stopping at the first failure unless `keep_going`.
pub fn run(steps: &[Step], keep_going: bool) -> Result<()> {
    let mut failed = Vec::new();
    for (i, step) in steps.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, steps.len(), step.label);
        if let Outcome::Failed = run_cargo(&step.label, &step.args)? {
            failed.push(step.label.as_str());
            if !keep_going {
                break;
            }
        }
    }
    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("failed: {}", failed.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_covers_every_feature_set() {
        // --- 1. ARRANGE ---
        let steps = pipeline();

        // --- 2. ACT ---
        let labels: Vec<&str> = steps.iter().map(|step| step.label.as_str()).collect();

        // --- 3. ASSERT ---
        assert_eq!(labels[0], "format", "formatting fails fastest");
        for set in FeatureSet::ALL {
            for verb in ["check", "clippy", "test"] {
                let label = format!("{verb} ({})", set.name());
                assert!(labels.contains(&label.as_str()), "{label} is missing");
            }
        }
        assert_eq!(labels.last(), Some(&"sandbox"));
    }

    #[test]
    fn test_pipeline_only_checks_formatting() {
        let steps = pipeline();
        assert_eq!(
            steps[0].args,
            ["fmt", "--all", "--", "--check"],
            "CI must not rewrite sources"
        );
    }

    #[test]
    fn test_single_set_runs_once() {
        let steps = test(Some(FeatureSet::Headless));
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].label, "test (headless)");
    }
}
