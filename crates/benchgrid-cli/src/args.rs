// Dweve Benchgrid - Criterion benchmark grid runner
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command-line argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Run a Criterion benchmark suite across modes and thread counts and parse
/// the results into a table.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "benchgrid",
    author,
    version,
    about = "Run a benchmark suite across modes and thread counts and tabulate the results",
    long_about = None
)]
pub struct Args {
    /// Path to the project containing the benchmark target
    #[arg(long)]
    pub path: PathBuf,

    /// Directory to store output files
    #[arg(long = "work-dir", alias = "work_dir")]
    pub work_dir: PathBuf,

    /// Pin benchmark threads to specific cores (true/false)
    #[arg(
        long = "pin-to-core",
        value_name = "BOOL",
        default_value_t = false,
        action = clap::ArgAction::Set
    )]
    pub pin_to_core: bool,

    /// Mode(s): 0 = run all modes, or a comma-separated list like "1,3,5"
    #[arg(long)]
    pub mode: String,

    /// Comma-separated list of thread counts (e.g., "1,3,4")
    #[arg(long)]
    pub threads: String,

    /// Cargo bench target to drive
    #[arg(long = "bench-name", default_value = "tx_emulator_bench")]
    pub bench_name: String,

    /// Cargo feature list for the bench build (empty disables --features)
    #[arg(long, default_value = "tonlibjson")]
    pub features: String,
}
