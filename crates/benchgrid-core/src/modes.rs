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

//! The catalog of workload modes the benchmark suite understands.
//!
//! The suite can describe itself: run with `--help-modes` it prints an
//! `id: name` listing between `AVAILABLE_MODES_START` and
//! `AVAILABLE_MODES_END` marker lines. When that query fails for any reason
//! the fixed fallback table is used instead. Which branch was taken is
//! recorded in [`CatalogSource`] so callers can warn about stale mode lists
//! instead of silently degrading.

use std::collections::BTreeMap;

/// Marker line opening the self-description mode listing.
pub const MODES_START_MARKER: &str = "AVAILABLE_MODES_START";
/// Marker line closing the self-description mode listing.
pub const MODES_END_MARKER: &str = "AVAILABLE_MODES_END";

/// Where a [`ModeCatalog`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Parsed from the benchmark's own `--help-modes` output.
    Discovered,
    /// The built-in table; the live query failed or was unparseable.
    Fallback,
}

/// Mapping from mode id to human-readable mode name, plus its provenance.
///
/// Immutable once constructed; a catalog is obtained once per invocation and
/// every later validation and display step reads from it.
#[derive(Debug, Clone)]
pub struct ModeCatalog {
    modes: BTreeMap<u32, String>,
    source: CatalogSource,
}

impl ModeCatalog {
    /// The built-in mode table, used when discovery fails.
    pub fn fallback() -> Self {
        let modes = [
            (1, "SleepTest"),
            (2, "CpuLoadTest"),
            (3, "EmulatorPoolOneByOne"),
            (4, "EmulatorPoolMinQueue"),
            (5, "RecreateEmulTest"),
            (6, "AutoPoolAsyncGet"),
        ]
        .into_iter()
        .map(|(id, name)| (id, name.to_string()))
        .collect();
        Self {
            modes,
            source: CatalogSource::Fallback,
        }
    }

    /// Wrap a discovered mode table.
    pub fn discovered(modes: BTreeMap<u32, String>) -> Self {
        Self {
            modes,
            source: CatalogSource::Discovered,
        }
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.modes.contains_key(&id)
    }

    /// All mode ids, ascending.
    pub fn ids(&self) -> Vec<u32> {
        self.modes.keys().copied().collect()
    }

    /// Highest mode id, or 0 for an empty catalog.
    pub fn max_mode(&self) -> u32 {
        self.modes.keys().next_back().copied().unwrap_or(0)
    }

    /// Name for `id`, with a `Mode{id}` placeholder for unknown ids.
    pub fn name(&self, id: u32) -> String {
        self.modes
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Mode{}", id))
    }

    /// Render `ids` as an `id:name, id:name, ...` listing for headers.
    pub fn listing(&self, ids: &[u32]) -> String {
        ids.iter()
            .map(|&id| format!("{}:{}", id, self.name(id)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parse a `--help-modes` self-description into a mode table.
///
/// Scans for the start marker, collects `id: name` lines until the end
/// marker, and skips entries whose id is not an integer. Returns `None` when
/// no entries were found (missing markers or an empty section), which
/// callers treat as a discovery failure.
pub fn parse_mode_listing(output: &str) -> Option<BTreeMap<u32, String>> {
    let mut modes = BTreeMap::new();
    let mut in_section = false;

    for line in output.lines() {
        let line = line.trim();
        if line == MODES_START_MARKER {
            in_section = true;
            continue;
        }
        if line == MODES_END_MARKER {
            break;
        }
        if in_section {
            if let Some((id, name)) = line.split_once(':') {
                if let Ok(id) = id.trim().parse::<u32>() {
                    modes.insert(id, name.trim().to_string());
                }
            }
        }
    }

    if modes.is_empty() {
        None
    } else {
        Some(modes)
    }
}
