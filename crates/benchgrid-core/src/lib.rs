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

//! Core library for Benchgrid: parse Criterion harness output and aggregate
//! timings into a grid keyed by thread count.
//!
//! This crate is pure data handling. It knows nothing about processes,
//! terminals, or the filesystem; the `benchgrid` binary supplies those. The
//! pieces are:
//!
//! - [`parse`]: extract `name → microseconds` measurements from raw harness
//!   output, tolerating ANSI color codes and both the single-line and
//!   two-line layouts Criterion uses for `time: [low mid high]` estimates.
//! - [`modes`]: the catalog of workload modes, either discovered from the
//!   benchmark's self-description output or taken from the built-in fallback
//!   table.
//! - [`spec`]: parsing and validation of the user-supplied `--mode` and
//!   `--threads` selections.
//! - [`table`]: the `mode → threads → benchmark → time` result table and its
//!   projections to a console grid and CSV rows.
//!
//! # Examples
//!
//! ```
//! use benchgrid_core::parse_measurements;
//!
//! let out = "sleep_task_bench   time:   [1.00 ms 2.50 ms 4.00 ms]\n";
//! let measurements = parse_measurements(out);
//! assert_eq!(measurements["sleep_task_bench"], 2500.0);
//! ```

pub mod error;
pub mod modes;
pub mod parse;
pub mod spec;
pub mod table;

pub use error::CoreError;
pub use modes::{parse_mode_listing, CatalogSource, ModeCatalog};
pub use parse::{parse_measurements, strip_ansi};
pub use spec::{parse_thread_spec, ModeSpec};
pub use table::{DisplayTable, ResultTable};
