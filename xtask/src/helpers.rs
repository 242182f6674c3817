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


//! Runs cargo and reports the result.

use anyhow::{Context, Result};
use std::process::Command;
use std::time::Instant;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// How a cargo run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
}

/// Runs `cargo <args>` in the current directory. Errors only when cargo
/// cannot be spawned.
pub fn run_cargo(label: &str, args: &[String]) -> Result<Outcome> {
    println!("{BOLD}{CYAN}$ cargo {}{RESET}", args.join(" "));
    let start = Instant::now();
    let status = Command::new("cargo")
        .args(args)
        .status()
        .context("spawning cargo")?;
    let seconds = start.elapsed().as_secs_f64();
    if status.success() {
        println!("{BOLD}{GREEN}ok{RESET} {label} in {seconds:.2}s");
        Ok(Outcome::Passed)
    } else {
        println!("{BOLD}{RED}FAILED{RESET} {label} after {seconds:.2}s ({status})");
        Ok(Outcome::Failed)
    }
}
