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

//! The run session: validation, the mode × threads loop, and report
//! emission.
//!
//! Control flow is strictly sequential. One child process runs at a time;
//! a failed or timed-out combination records an empty measurement map and
//! the loop continues. The accumulating [`ResultTable`] is a local owned by
//! [`run`] and handed to the display projection once the loop finishes.

use crate::args::Args;
use crate::error::CliError;
use crate::runner::{discover_modes, write_transcript, Invoker};
use benchgrid_core::{
    parse_measurements, parse_thread_spec, CoreError, ModeCatalog, ModeSpec, ResultTable,
};
use chrono::Local;
use colored::Colorize;
use std::fs;
use std::path::Path;

/// Execute one full Benchgrid invocation.
///
/// # Errors
///
/// Fatal conditions only: missing `--path`, unwritable output locations,
/// malformed or invalid `--mode`/`--threads`, an empty mode table, or a run
/// loop that produced no results or no benchmark names. Per-run failures are
/// warnings, not errors.
pub fn run(args: &Args) -> Result<(), CliError> {
    if !args.path.exists() {
        return Err(CliError::PathNotFound(args.path.clone()));
    }
    let path = fs::canonicalize(&args.path).map_err(|e| CliError::io_error(&args.path, e))?;

    fs::create_dir_all(&args.work_dir).map_err(|e| CliError::io_error(&args.work_dir, e))?;
    let work_dir =
        fs::canonicalize(&args.work_dir).map_err(|e| CliError::io_error(&args.work_dir, e))?;

    // Needs no catalog, so validate before any process is spawned.
    let thread_counts = parse_thread_spec(&args.threads)?;

    let invoker = Invoker::new(
        path.clone(),
        &args.bench_name,
        &args.features,
        args.pin_to_core,
    );

    let catalog = discover_modes(&invoker);
    if catalog.is_empty() {
        return Err(CoreError::EmptyModeTable.into());
    }

    let mode_spec = ModeSpec::parse(&args.mode, &catalog)?;
    let modes_to_run = mode_spec.resolve(&catalog);

    let run_dir = work_dir.join(format!(
        "{}_isol{}_{}",
        mode_spec.dir_label(),
        args.pin_to_core,
        Local::now().format("%H%M%S")
    ));
    fs::create_dir_all(&run_dir).map_err(|e| CliError::io_error(&run_dir, e))?;

    let config_path = run_dir.join("config.txt");
    fs::write(
        &config_path,
        config_text(args, &catalog, &mode_spec, &modes_to_run, &path, &work_dir, &run_dir),
    )
    .map_err(|e| CliError::io_error(&config_path, e))?;

    println!(
        "Running benchmarks with mode={}, threads={:?}, pin-to-core={}",
        mode_spec.display(),
        thread_counts,
        args.pin_to_core
    );
    println!("Test directory: {}", run_dir.display());

    let mut table = ResultTable::new();
    for &mode in &modes_to_run {
        println!("\n{}", "=".repeat(60));
        println!("Running benchmarks for MODE {}", mode);
        println!("{}\n", "=".repeat(60));

        for &threads in &thread_counts {
            println!(
                "Running benchmark with mode={} ({}), threads={}...",
                mode,
                catalog.name(mode),
                threads
            );
            let command_line = invoker.command_line(mode, threads);
            println!("  Command: {}", command_line);

            let outcome = invoker.run(mode, threads);
            let transcript = run_dir.join(format!("bench_mode{}_threads{}.txt", mode, threads));
            write_transcript(&transcript, &command_line, &outcome)?;

            if !outcome.status.is_success() {
                eprintln!(
                    "{} Benchmark failed ({})",
                    "Warning:".yellow(),
                    outcome.status
                );
                eprintln!("  Output saved to: {}", transcript.display());
            }

            let measurements = parse_measurements(&outcome.stdout);
            if measurements.is_empty() {
                eprintln!(
                    "{} No benchmark results found in output",
                    "Warning:".yellow()
                );
            } else {
                println!("  Found {} benchmark(s)", measurements.len());
            }
            table.insert(mode, threads, measurements);
        }
    }

    if table.is_empty() {
        return Err(CoreError::NoResults.into());
    }
    if table.benchmark_names().is_empty() {
        return Err(CoreError::NoBenchmarkNames.into());
    }

    let display = table.to_display(&thread_counts);
    let grid = display.render_grid();

    println!("\n{}", "=".repeat(80));
    println!("Benchmark Results (time in microseconds)");
    println!("{}", "=".repeat(80));
    println!("{}", grid);

    let label = mode_spec.dir_label();
    let report_path = run_dir.join(format!("results_mode{}.txt", label));
    let report = format!(
        "{}\n{}\n",
        report_header(args, &catalog, &mode_spec, &modes_to_run),
        grid
    );
    fs::write(&report_path, report).map_err(|e| CliError::io_error(&report_path, e))?;

    let csv_path = run_dir.join(format!("results_mode{}.csv", label));
    let csv_file = fs::File::create(&csv_path).map_err(|e| CliError::io_error(&csv_path, e))?;
    display.write_csv(csv_file)?;

    println!("\nAll results saved to test directory: {}", run_dir.display());
    println!("  - Configuration: config.txt");
    println!("  - Summary table (text): results_mode{}.txt", label);
    println!("  - Summary table (CSV): results_mode{}.csv", label);
    if modes_to_run.len() > 1 {
        println!("  - Individual outputs: bench_mode{{M}}_threads*.txt");
        println!("    ({})", catalog.listing(&modes_to_run));
    } else if let Some(&mode) = modes_to_run.first() {
        println!("  - Individual outputs: bench_mode{}_threads*.txt", mode);
    }

    Ok(())
}

/// The `config.txt` body: run parameters and resolved mode names.
#[allow(clippy::too_many_arguments)]
fn config_text(
    args: &Args,
    catalog: &ModeCatalog,
    mode_spec: &ModeSpec,
    modes_to_run: &[u32],
    path: &Path,
    work_dir: &Path,
    run_dir: &Path,
) -> String {
    let mut out = String::new();
    out.push_str("Test Configuration\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');
    out.push_str(&format!(
        "Timestamp: {}\n",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    out.push_str(&format!("Mode: {}\n", mode_spec.display()));
    if mode_spec.is_all() {
        out.push_str(&format!(
            "All available modes: {}\n",
            catalog.listing(&catalog.ids())
        ));
    }
    out.push_str(&format!("Modes to run: {}\n", catalog.listing(modes_to_run)));
    out.push_str(&format!("Pin-to-core: {}\n", args.pin_to_core));
    out.push_str(&format!("Threads: {}\n", args.threads));
    out.push_str(&format!("Path: {}\n", path.display()));
    out.push_str(&format!("Work Dir: {}\n", work_dir.display()));
    out.push_str(&format!("Test Dir: {}\n", run_dir.display()));
    out
}

/// The configuration header prefixed to the text report.
fn report_header(
    args: &Args,
    catalog: &ModeCatalog,
    mode_spec: &ModeSpec,
    modes_to_run: &[u32],
) -> String {
    let mut out = String::new();
    out.push_str("Benchmark Results (time in microseconds)\n");
    out.push_str(&"=".repeat(80));
    out.push('\n');
    out.push_str(&format!("Mode: {}\n", mode_spec.display()));
    if mode_spec.is_all() {
        out.push_str(&format!(
            "All available modes: {}\n",
            catalog.listing(&catalog.ids())
        ));
    }
    out.push_str(&format!("Modes to run: {}\n", catalog.listing(modes_to_run)));
    out.push_str(&format!("Pin-to-core: {}\n", args.pin_to_core));
    out.push_str(&format!("Threads: {}\n", args.threads));
    out.push_str(&format!(
        "Timestamp: {}\n",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    out.push_str(&"=".repeat(80));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn test_args(mode: &str, threads: &str) -> Args {
        Args::parse_from([
            "benchgrid",
            "--path",
            "/proj",
            "--work-dir",
            "/out",
            "--mode",
            mode,
            "--threads",
            threads,
        ])
    }

    #[test]
    fn test_config_text_all_modes() {
        let args = test_args("0", "1,2");
        let catalog = ModeCatalog::fallback();
        let spec = ModeSpec::parse("0", &catalog).unwrap();
        let modes = spec.resolve(&catalog);
        let text = config_text(
            &args,
            &catalog,
            &spec,
            &modes,
            Path::new("/proj"),
            Path::new("/out"),
            Path::new("/out/0_all_modes_isolfalse_120000"),
        );
        assert!(text.starts_with("Test Configuration\n"));
        assert!(text.contains("Mode: 0 (all modes)\n"));
        assert!(text.contains("All available modes: 1:SleepTest, 2:CpuLoadTest"));
        assert!(text.contains("Modes to run: 1:SleepTest"));
        assert!(text.contains("Pin-to-core: false\n"));
        assert!(text.contains("Threads: 1,2\n"));
        assert!(text.contains("Test Dir: /out/0_all_modes_isolfalse_120000\n"));
    }

    #[test]
    fn test_config_text_explicit_modes_omits_full_listing() {
        let args = test_args("1,3", "4");
        let catalog = ModeCatalog::fallback();
        let spec = ModeSpec::parse("1,3", &catalog).unwrap();
        let modes = spec.resolve(&catalog);
        let text = config_text(
            &args,
            &catalog,
            &spec,
            &modes,
            Path::new("/proj"),
            Path::new("/out"),
            Path::new("/out/1_3_isolfalse_120000"),
        );
        assert!(text.contains("Mode: 1,3\n"));
        assert!(!text.contains("All available modes:"));
        assert!(text.contains("Modes to run: 1:SleepTest, 3:EmulatorPoolOneByOne\n"));
    }

    #[test]
    fn test_report_header_layout() {
        let args = test_args("1", "2");
        let catalog = ModeCatalog::fallback();
        let spec = ModeSpec::parse("1", &catalog).unwrap();
        let modes = spec.resolve(&catalog);
        let header = report_header(&args, &catalog, &spec, &modes);
        assert!(header.starts_with("Benchmark Results (time in microseconds)\n"));
        assert!(header.contains(&"=".repeat(80)));
        assert!(header.contains("Mode: 1\n"));
        assert!(header.contains("Timestamp: "));
        assert!(header.ends_with(&format!("{}\n", "=".repeat(80))));
    }
}
