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

//! Parsing and validation of the user-supplied mode and thread selections.

use crate::error::CoreError;
use crate::modes::ModeCatalog;

/// The validated `--mode` selection.
///
/// `0` selects every mode in the catalog; otherwise a comma-separated list of
/// mode ids, each of which must exist in the catalog. A parsed list is
/// deduplicated and sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSpec {
    /// `--mode 0`: run all catalog modes.
    All,
    /// An explicit, validated, sorted list of mode ids.
    List(Vec<u32>),
}

impl ModeSpec {
    /// Parse and validate a `--mode` string against the catalog.
    ///
    /// # Errors
    ///
    /// - [`CoreError::MalformedModeSpec`] when the string is not `0` or a
    ///   comma-separated integer list.
    /// - [`CoreError::InvalidModes`] listing every value missing from the
    ///   catalog.
    pub fn parse(raw: &str, catalog: &ModeCatalog) -> Result<Self, CoreError> {
        let raw = raw.trim();
        if raw == "0" {
            return Ok(Self::All);
        }

        let mut ids = Vec::new();
        for part in raw.split(',') {
            let id: u32 = part
                .trim()
                .parse()
                .map_err(|_| CoreError::MalformedModeSpec(raw.to_string()))?;
            ids.push(id);
        }

        let invalid: Vec<u32> = ids.iter().copied().filter(|id| !catalog.contains(*id)).collect();
        if !invalid.is_empty() {
            return Err(CoreError::invalid_modes(invalid, catalog.max_mode()));
        }

        ids.sort_unstable();
        ids.dedup();
        Ok(Self::List(ids))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The concrete mode ids this spec selects, ascending.
    pub fn resolve(&self, catalog: &ModeCatalog) -> Vec<u32> {
        match self {
            Self::All => catalog.ids(),
            Self::List(ids) => ids.clone(),
        }
    }

    /// Human-readable form: `0 (all modes)` or `1,3,5`.
    pub fn display(&self) -> String {
        match self {
            Self::All => "0 (all modes)".to_string(),
            Self::List(ids) => ids
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// The display form sanitized for use in a directory name.
    pub fn dir_label(&self) -> String {
        self.display()
            .replace(' ', "_")
            .replace('(', "")
            .replace(')', "")
            .replace(',', "_")
    }
}

/// Parse a `--threads` string: comma-separated positive integers.
///
/// Order is preserved as supplied; duplicates are allowed here and collapsed
/// at display time.
///
/// # Errors
///
/// - [`CoreError::MalformedThreadSpec`] for non-integer or zero entries.
/// - [`CoreError::EmptyThreadSpec`] when nothing was supplied.
pub fn parse_thread_spec(raw: &str) -> Result<Vec<u32>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::EmptyThreadSpec);
    }

    let mut counts = Vec::new();
    for part in raw.split(',') {
        let count: u32 = part
            .trim()
            .parse()
            .map_err(|_| CoreError::MalformedThreadSpec(raw.to_string()))?;
        if count == 0 {
            return Err(CoreError::MalformedThreadSpec(raw.to_string()));
        }
        counts.push(count);
    }
    Ok(counts)
}
