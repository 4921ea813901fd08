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

//! Benchmark process invocation.
//!
//! One [`Invoker`] per session builds and runs `cargo bench` command lines:
//! the measurement runs themselves (bounded by [`RUN_TIMEOUT`]) and the
//! `--help-modes` self-description query (bounded by [`DISCOVERY_TIMEOUT`]).
//! Only stdout is captured; stderr is discarded so Criterion's progress
//! chatter does not pollute the transcripts. Every run outcome - including
//! timeouts and spawn failures - is representable in [`RunStatus`], because
//! a failed combination must not abort the remaining ones.

use crate::error::CliError;
use benchgrid_core::{parse_mode_listing, ModeCatalog};
use colored::Colorize;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Ceiling for one measurement run.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(300);

/// Ceiling for the `--help-modes` discovery query.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How a benchmark invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Process exited with this code.
    Exited(i32),
    /// Process was killed by a signal.
    Terminated,
    /// Deadline elapsed; the process was killed and reaped.
    TimedOut(u64),
    /// The process could not be spawned or awaited.
    Failed(String),
}

impl RunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Exited(0))
    }

    /// Text for the transcript's return-code section: the bare exit code
    /// when there is one, a description otherwise.
    pub fn transcript_label(&self) -> String {
        match self {
            RunStatus::Exited(code) => code.to_string(),
            RunStatus::Terminated => "terminated by signal".to_string(),
            RunStatus::TimedOut(secs) => format!("timed out after {}s", secs),
            RunStatus::Failed(msg) => format!("failed to run: {}", msg),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Exited(code) => write!(f, "exit code {}", code),
            _ => write!(f, "{}", self.transcript_label()),
        }
    }
}

/// Captured stdout plus the final status of one invocation.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub stdout: String,
    pub status: RunStatus,
}

/// Builds and executes `cargo bench` invocations for one session.
#[derive(Debug, Clone)]
pub struct Invoker {
    project: PathBuf,
    bench_name: String,
    features: String,
    pin_to_core: bool,
}

impl Invoker {
    pub fn new(
        project: PathBuf,
        bench_name: impl Into<String>,
        features: impl Into<String>,
        pin_to_core: bool,
    ) -> Self {
        Self {
            project,
            bench_name: bench_name.into(),
            features: features.into(),
            pin_to_core,
        }
    }

    /// `cargo bench --bench <name> [--features <list>]`.
    fn base_args(&self) -> Vec<String> {
        let mut args = vec![
            "bench".to_string(),
            "--bench".to_string(),
            self.bench_name.clone(),
        ];
        if !self.features.is_empty() {
            args.push("--features".to_string());
            args.push(self.features.clone());
        }
        args
    }

    fn bench_args(&self, mode: u32, threads: u32) -> Vec<String> {
        let mut args = self.base_args();
        args.push("--".to_string());
        args.push("--pin-to-core".to_string());
        args.push(self.pin_to_core.to_string());
        args.push("--mode".to_string());
        args.push(mode.to_string());
        args.push("--threads".to_string());
        args.push(threads.to_string());
        args
    }

    fn discovery_args(&self) -> Vec<String> {
        let mut args = self.base_args();
        args.push("--".to_string());
        args.push("--help-modes".to_string());
        args
    }

    /// The full command line for one (mode, threads) run, for echoing and
    /// transcripts.
    pub fn command_line(&self, mode: u32, threads: u32) -> String {
        let mut parts = vec!["cargo".to_string()];
        parts.extend(self.bench_args(mode, threads));
        parts.join(" ")
    }

    /// Run one (mode, threads) combination, capped at [`RUN_TIMEOUT`].
    pub fn run(&self, mode: u32, threads: u32) -> RunOutcome {
        self.capture(&self.bench_args(mode, threads), RUN_TIMEOUT)
    }

    /// Run the `--help-modes` self-description query, capped at
    /// [`DISCOVERY_TIMEOUT`].
    pub fn query_modes(&self) -> RunOutcome {
        self.capture(&self.discovery_args(), DISCOVERY_TIMEOUT)
    }

    fn capture(&self, args: &[String], timeout: Duration) -> RunOutcome {
        let mut child = match Command::new("cargo")
            .args(args)
            .current_dir(&self.project)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return RunOutcome {
                    stdout: String::new(),
                    status: RunStatus::Failed(e.to_string()),
                }
            }
        };

        // Drain stdout on a separate thread so a chatty child can never
        // block on a full pipe while we poll for exit.
        let stdout_pipe = child.stdout.take();
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut pipe) = stdout_pipe {
                let _ = pipe.read_to_end(&mut buf);
            }
            buf
        });

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    break match status.code() {
                        Some(code) => RunStatus::Exited(code),
                        None => RunStatus::Terminated,
                    };
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        break RunStatus::TimedOut(timeout.as_secs());
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    break RunStatus::Failed(e.to_string());
                }
            }
        };

        let bytes = reader.join().unwrap_or_default();
        RunOutcome {
            stdout: String::from_utf8_lossy(&bytes).into_owned(),
            status,
        }
    }
}

/// Persist one run's transcript: the command line, the captured stdout, and
/// the final status. Written for every run, successful or not.
pub fn write_transcript(
    path: &Path,
    command_line: &str,
    outcome: &RunOutcome,
) -> Result<(), CliError> {
    let contents = format!(
        "=== COMMAND ===\n{}\n\n=== STDOUT ===\n{}\n=== RETURN CODE ===\n{}\n",
        command_line,
        outcome.stdout,
        outcome.status.transcript_label()
    );
    fs::write(path, contents).map_err(|e| CliError::io_error(path, e))
}

/// Obtain the mode catalog, preferring the live `--help-modes` query and
/// falling back to the built-in table on any failure. The fallback path
/// warns on stderr; the caller can also inspect the catalog's
/// [`source`](ModeCatalog::source).
pub fn discover_modes(invoker: &Invoker) -> ModeCatalog {
    let outcome = invoker.query_modes();
    if outcome.status.is_success() {
        if let Some(modes) = parse_mode_listing(&outcome.stdout) {
            return ModeCatalog::discovered(modes);
        }
        eprintln!(
            "{} Could not get modes from benchmark (no mode listing in output). Using built-in mode table.",
            "Warning:".yellow()
        );
    } else {
        eprintln!(
            "{} Could not get modes from benchmark ({}). Using built-in mode table.",
            "Warning:".yellow(),
            outcome.status
        );
    }
    ModeCatalog::fallback()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoker() -> Invoker {
        Invoker::new(PathBuf::from("/proj"), "tx_emulator_bench", "tonlibjson", false)
    }

    #[test]
    fn test_command_line_with_features() {
        assert_eq!(
            invoker().command_line(3, 4),
            "cargo bench --bench tx_emulator_bench --features tonlibjson -- \
             --pin-to-core false --mode 3 --threads 4"
        );
    }

    #[test]
    fn test_command_line_without_features() {
        let inv = Invoker::new(PathBuf::from("/proj"), "my_bench", "", true);
        assert_eq!(
            inv.command_line(1, 2),
            "cargo bench --bench my_bench -- --pin-to-core true --mode 1 --threads 2"
        );
    }

    #[test]
    fn test_discovery_args_use_help_modes() {
        let args = invoker().discovery_args();
        assert_eq!(args.last().map(String::as_str), Some("--help-modes"));
        assert!(args.contains(&"--".to_string()));
    }

    #[test]
    fn test_run_status_labels() {
        assert_eq!(RunStatus::Exited(0).transcript_label(), "0");
        assert_eq!(RunStatus::Exited(101).transcript_label(), "101");
        assert_eq!(RunStatus::TimedOut(300).transcript_label(), "timed out after 300s");
        assert!(RunStatus::Exited(0).is_success());
        assert!(!RunStatus::Exited(101).is_success());
        assert!(!RunStatus::TimedOut(300).is_success());
        assert_eq!(RunStatus::Exited(101).to_string(), "exit code 101");
    }

    #[test]
    fn test_write_transcript_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench_mode1_threads2.txt");
        let outcome = RunOutcome {
            stdout: "b   time:   [1.00 ms 2.00 ms 3.00 ms]\n".to_string(),
            status: RunStatus::Exited(0),
        };
        write_transcript(&path, "cargo bench -- --mode 1 --threads 2", &outcome).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("=== COMMAND ===\ncargo bench -- --mode 1 --threads 2\n"));
        assert!(contents.contains("\n=== STDOUT ===\nb   time:"));
        assert!(contents.ends_with("=== RETURN CODE ===\n0\n"));
    }
}
