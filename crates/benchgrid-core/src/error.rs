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

//! Structured error types for Benchgrid core operations.
//!
//! All validation and aggregation entry points return
//! `Result<T, CoreError>`. The display strings double as the one-line
//! diagnostics the CLI prints before exiting with status 1.

use thiserror::Error;

/// Errors produced while validating run parameters or assembling results.
///
/// Implements `Clone` so callers can report an error and still hold on to it
/// for exit-code mapping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// One or more `--mode` values fall outside the mode catalog.
    #[error("Invalid mode values: {values:?}. Valid modes are {valid_range}.")]
    InvalidModes {
        /// The offending mode ids, in the order supplied
        values: Vec<u32>,
        /// Human-readable description of the valid id range
        valid_range: String,
    },

    /// The `--mode` string is not `0` or a comma-separated integer list.
    #[error("Invalid mode format: {0}. Expected '0' or comma-separated integers (e.g., '1,3,5').")]
    MalformedModeSpec(String),

    /// The `--threads` string is not a comma-separated positive integer list.
    #[error("Invalid thread format: {0}. Expected comma-separated positive integers.")]
    MalformedThreadSpec(String),

    /// The `--threads` list parsed to nothing.
    #[error("At least one thread count must be specified")]
    EmptyThreadSpec,

    /// Neither discovery nor the fallback produced any modes.
    #[error("Could not determine available modes from benchmark")]
    EmptyModeTable,

    /// The run loop finished without recording a single (mode, threads) entry.
    #[error("No benchmark results were found. Check the output files.")]
    NoResults,

    /// Runs completed but no measurement line parsed anywhere.
    #[error("No benchmark names found.")]
    NoBenchmarkNames,

    /// CSV emission failed.
    #[error("CSV write error: {0}")]
    Csv(String),
}

impl CoreError {
    /// Create an invalid-modes error from the offending ids and the highest
    /// valid mode id.
    pub fn invalid_modes(values: Vec<u32>, max_mode: u32) -> Self {
        let valid_range = if max_mode > 1 {
            format!("1-{}", max_mode)
        } else {
            "1".to_string()
        };
        Self::InvalidModes {
            values,
            valid_range,
        }
    }
}

impl From<csv::Error> for CoreError {
    fn from(source: csv::Error) -> Self {
        Self::Csv(source.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(source: std::io::Error) -> Self {
        Self::Csv(source.to_string())
    }
}
