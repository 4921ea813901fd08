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

//! Measurement extraction from raw benchmark harness output.
//!
//! Criterion prints its point estimate as a low/mid/high triple, either on
//! one line together with the benchmark name:
//!
//! ```text
//! sleep_task_bench        time:   [1.02 ms 1.10 ms 1.19 ms]
//! ```
//!
//! or, when the name is long, on two lines:
//!
//! ```text
//! emulator_task_bench_recreate
//!                         time:   [2.31 ms 2.40 ms 2.52 ms]
//! ```
//!
//! [`parse_measurements`] accepts both layouts, strips terminal color codes
//! first, and never fails: lines that match neither layout are skipped. The
//! middle value of the triple is the point estimate; low and high are
//! discarded. Values are returned in microseconds.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// ANSI escape sequences: CSI sequences plus two-character escapes.
static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("ANSI pattern is valid")
});

/// Single-line layout: name, `time:`, then the bracketed triple.
static SINGLE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\S+)\s+time:\s+\[[\d.]+\s+ms\s+([\d.]+)\s+ms\s+[\d.]+\s+ms\]")
        .expect("single-line pattern is valid")
});

/// Two-line layout, second line: leading whitespace, `time:`, the triple.
static TIME_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+time:\s+\[[\d.]+\s+ms\s+([\d.]+)\s+ms\s+[\d.]+\s+ms\]")
        .expect("time-line pattern is valid")
});

/// Remove all ANSI escape/control sequences from `text`.
///
/// Returns a borrowed `Cow` when the input contains no escapes, so stripping
/// already-clean text allocates nothing and is a no-op.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(text, "")
}

/// Parse benchmark measurements out of raw harness output.
///
/// Returns a map from benchmark name to the point-estimate time in
/// microseconds. Zero entries is a normal outcome, not an error; callers
/// decide whether an empty map is worth a warning.
///
/// # Matching rules
///
/// The cleaned text is scanned line by line with a cursor:
///
/// 1. If the current line matches the single-line layout, record the name
///    and the middle value, advance one line.
/// 2. Otherwise, if the *next* line is a `time:` triple line, the current
///    line (trimmed) is taken as the benchmark name - provided it is
///    non-empty and does not itself start with `time:` - and both lines are
///    consumed. The `time:` guard prevents a bare triple line from being
///    mis-read as a name.
/// 3. Otherwise the line is skipped.
///
/// A later measurement for the same name overwrites the earlier one.
pub fn parse_measurements(output: &str) -> BTreeMap<String, f64> {
    let clean = strip_ansi(output);
    let lines: Vec<&str> = clean.split('\n').collect();
    let mut results = BTreeMap::new();

    let mut i = 0;
    while i < lines.len() {
        if let Some(caps) = SINGLE_LINE.captures(lines[i]) {
            // [\d.]+ admits things like "1.2.3"; skip rather than panic.
            if let Ok(mid_ms) = caps[2].parse::<f64>() {
                results.insert(caps[1].to_string(), mid_ms * 1000.0);
                i += 1;
                continue;
            }
        }

        if i + 1 < lines.len() {
            if let Some(caps) = TIME_LINE.captures(lines[i + 1]) {
                let name = lines[i].trim();
                if !name.is_empty() && !name.starts_with("time:") {
                    if let Ok(mid_ms) = caps[1].parse::<f64>() {
                        results.insert(name.to_string(), mid_ms * 1000.0);
                        i += 2;
                        continue;
                    }
                }
            }
        }

        i += 1;
    }

    results
}
