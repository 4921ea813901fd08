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

//! Benchgrid command line entry point.
//!
//! Runs a Criterion benchmark suite across every requested (mode, threads)
//! combination, parses the captured output, and writes the aggregated grid
//! as a console table, a text report, and a CSV file.
//!
//! # Examples
//!
//! ```bash
//! # All modes, three thread counts
//! benchgrid --path ../ton-rs --work-dir ./out --mode 0 --threads 1,2,4
//!
//! # Two specific modes, pinned to cores
//! benchgrid --path ../ton-rs --work-dir ./out --mode 1,3 --threads 4 --pin-to-core true
//! ```

use benchgrid_cli::args::Args;
use benchgrid_cli::session;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    match session::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
