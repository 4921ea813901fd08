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

//! Benchgrid CLI library: argument parsing, benchmark invocation, and the
//! run session that drives the mode × threads cross-product.
//!
//! The binary in `main.rs` is a thin shell around [`session::run`]. Pure
//! parsing and aggregation live in `benchgrid-core`; this crate owns
//! everything with side effects: spawning `cargo bench`, the per-run
//! transcripts, the run directory, and the console/report/CSV emission.

pub mod args;
pub mod error;
pub mod runner;
pub mod session;

pub use error::CliError;
