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


mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::ci;
use commands::matrix::FeatureSet;

#[derive(Parser)]
#[command(name = "xtask", about = "Build automation for the ember render core")]
struct Cli {
    /// Keep running after a failed step.
    #[arg(long, global = true)]
    keep_going: bool,
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Build the workspace.
    Build,
    /// Test the render core crates for each backend feature set.
    Test {
        /// Only this feature set.
        #[arg(long, value_enum)]
        features: Option<FeatureSet>,
    },
    /// Test the render core with the recording backend only.
    Headless,
    /// Type-check the render core crates for each backend feature set.
    Check {
        /// Only this feature set.
        #[arg(long, value_enum)]
        features: Option<FeatureSet>,
    },
    /// Format the workspace.
    Format {
        /// Fail on unformatted code instead of rewriting it.
        #[arg(long)]
        check: bool,
    },
    /// Lint the render core crates with warnings as errors.
    Clippy {
        /// Only this feature set.
        #[arg(long, value_enum)]
        features: Option<FeatureSet>,
    },
    /// Run the headless sandbox.
    Sandbox,
    /// Run the full CI pipeline.
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let steps = match cli.command {
        Task::Build => ci::build(),
        Task::Test { features } => ci::test(features),
        Task::Headless => ci::test(Some(FeatureSet::Headless)),
        Task::Check { features } => ci::check(features),
        Task::Format { check } => ci::format(check),
        Task::Clippy { features } => ci::clippy(features),
        Task::Sandbox => ci::sandbox(),
        Task::All => ci::pipeline(),
    };
    ci::run(&steps, cli.keep_going)
}
