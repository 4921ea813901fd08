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

//! Structured error types for the Benchgrid CLI.
//!
//! All fatal conditions funnel into [`CliError`]; `main` prints the display
//! string prefixed with `Error:` and exits with status 1. Recoverable
//! conditions (discovery fallback, per-run failures) never reach this type -
//! they are warnings on stderr.

use benchgrid_core::CoreError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Benchgrid CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// The `--path` project directory does not exist.
    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// I/O operation failed (directory creation, transcript or report write).
    #[error("I/O error for '{}': {message}", .path.display())]
    Io {
        /// The path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// A validation or aggregation error from the core crate; its display
    /// string is already the user-facing diagnostic.
    #[error(transparent)]
    Spec(#[from] CoreError),
}

impl CliError {
    /// Create an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }
}
