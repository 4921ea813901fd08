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

//! The aggregated result table and its display projections.
//!
//! Results accumulate as `mode → thread count → benchmark name → time (µs)`
//! while the run loop executes, then get projected once into a flat
//! [`DisplayTable`]: one row per thread count, one column per benchmark name.
//! The same rows feed the console grid, the text report, and the CSV file,
//! so the three outputs can never disagree.

use crate::error::CoreError;
use std::collections::{BTreeMap, BTreeSet};
use std::io;

/// Cell text used when a (mode, threads, benchmark) triple has no
/// measurement.
pub const NOT_AVAILABLE: &str = "N/A";

/// Three-level result mapping, owned by the run session and built
/// incrementally. Read-only once the run loop finishes.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    results: BTreeMap<u32, BTreeMap<u32, BTreeMap<String, f64>>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the parsed measurements for one (mode, threads) run.
    ///
    /// An empty map is a valid entry: it keeps the invariant that every
    /// requested pair appears exactly once, and renders as `N/A` cells.
    pub fn insert(&mut self, mode: u32, threads: u32, measurements: BTreeMap<String, f64>) {
        self.results
            .entry(mode)
            .or_default()
            .insert(threads, measurements);
    }

    /// True when no (mode, threads) pair was recorded at all.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, mode: u32, threads: u32, benchmark: &str) -> Option<f64> {
        self.results.get(&mode)?.get(&threads)?.get(benchmark).copied()
    }

    /// Sorted union of benchmark names across all modes and thread counts.
    pub fn benchmark_names(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for per_mode in self.results.values() {
            for per_threads in per_mode.values() {
                names.extend(per_threads.keys().cloned());
            }
        }
        names.into_iter().collect()
    }

    /// Attribute each benchmark name to the first mode (ascending id) that
    /// produced it.
    ///
    /// Needed when several modes run together: different modes emit disjoint
    /// benchmark sets, but the report still renders one flat column set. If
    /// two modes ever emitted the same name, the lower mode id would own the
    /// column and the other mode's timings would not be shown; the suite's
    /// modes use disjoint names, so this does not occur in practice.
    pub fn attribute_modes(&self) -> BTreeMap<String, u32> {
        let mut owners = BTreeMap::new();
        for (&mode, per_mode) in &self.results {
            for per_threads in per_mode.values() {
                for name in per_threads.keys() {
                    owners.entry(name.clone()).or_insert(mode);
                }
            }
        }
        owners
    }

    /// Project into display rows: one per distinct thread count (ascending),
    /// columns `Threads` plus each benchmark name (sorted). Missing cells
    /// render as [`NOT_AVAILABLE`], present cells as `{:.2} μs`.
    pub fn to_display(&self, thread_counts: &[u32]) -> DisplayTable {
        let names = self.benchmark_names();
        let owners = self.attribute_modes();

        let mut headers = Vec::with_capacity(names.len() + 1);
        headers.push("Threads".to_string());
        headers.extend(names.iter().cloned());

        let distinct: BTreeSet<u32> = thread_counts.iter().copied().collect();
        let mut rows = Vec::with_capacity(distinct.len());
        for &threads in &distinct {
            let mut row = Vec::with_capacity(names.len() + 1);
            row.push(threads.to_string());
            for name in &names {
                let cell = owners
                    .get(name)
                    .and_then(|&mode| self.get(mode, threads, name))
                    .map(|time_us| format!("{:.2} μs", time_us))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                row.push(cell);
            }
            rows.push(row);
        }

        DisplayTable { headers, rows }
    }
}

/// Flat, fully formatted rows ready for console, text, and CSV emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DisplayTable {
    /// Render as a bordered grid:
    ///
    /// ```text
    /// +-----------+------------------+
    /// | Threads   | sleep_task_bench |
    /// +===========+==================+
    /// | 1         | 1100.00 μs       |
    /// +-----------+------------------+
    /// ```
    pub fn render_grid(&self) -> String {
        let widths = self.column_widths();
        let border = Self::rule(&widths, '-');
        let header_rule = Self::rule(&widths, '=');

        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        out.push_str(&Self::format_row(&self.headers, &widths));
        out.push('\n');
        out.push_str(&header_rule);
        for row in &self.rows {
            out.push('\n');
            out.push_str(&Self::format_row(row, &widths));
            out.push('\n');
            out.push_str(&border);
        }
        out
    }

    /// Write the header row plus data rows as CSV.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), CoreError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn column_widths(&self) -> Vec<usize> {
        // Widths in characters, not bytes; cells contain "μs".
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }
        widths
    }

    fn rule(widths: &[usize], fill: char) -> String {
        let mut line = String::from("+");
        for &w in widths {
            line.extend(std::iter::repeat(fill).take(w + 2));
            line.push('+');
        }
        line
    }

    fn format_row(cells: &[String], widths: &[usize]) -> String {
        let mut line = String::from("|");
        for (i, &w) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let pad = w.saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.extend(std::iter::repeat(' ').take(pad));
            line.push_str(" |");
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries
            .iter()
            .map(|(name, v)| (name.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_insert_and_get() {
        let mut table = ResultTable::new();
        table.insert(1, 4, measurements(&[("sleep_task_bench", 1100.0)]));
        assert_eq!(table.get(1, 4, "sleep_task_bench"), Some(1100.0));
        assert_eq!(table.get(1, 4, "missing"), None);
        assert_eq!(table.get(2, 4, "sleep_task_bench"), None);
    }

    #[test]
    fn test_empty_entry_counts_as_present() {
        let mut table = ResultTable::new();
        table.insert(1, 1, BTreeMap::new());
        assert!(!table.is_empty());
        assert!(table.benchmark_names().is_empty());
    }

    #[test]
    fn test_benchmark_names_union_sorted() {
        let mut table = ResultTable::new();
        table.insert(2, 1, measurements(&[("cpu_task_bench", 1.0)]));
        table.insert(1, 1, measurements(&[("sleep_task_bench", 2.0)]));
        table.insert(1, 2, measurements(&[("sleep_task_bench", 3.0)]));
        assert_eq!(
            table.benchmark_names(),
            vec!["cpu_task_bench".to_string(), "sleep_task_bench".to_string()]
        );
    }

    #[test]
    fn test_attribution_first_mode_wins() {
        let mut table = ResultTable::new();
        table.insert(3, 1, measurements(&[("shared", 30.0)]));
        table.insert(1, 1, measurements(&[("shared", 10.0)]));
        let owners = table.attribute_modes();
        assert_eq!(owners["shared"], 1);
    }

    #[test]
    fn test_display_one_row_per_distinct_thread_count() {
        let mut table = ResultTable::new();
        table.insert(1, 1, measurements(&[("b", 100.0)]));
        table.insert(1, 2, measurements(&[("b", 200.0)]));
        let display = table.to_display(&[2, 1, 2]);
        assert_eq!(display.rows.len(), 2);
        assert_eq!(display.rows[0][0], "1");
        assert_eq!(display.rows[1][0], "2");
    }

    #[test]
    fn test_display_cells_formatted_in_microseconds() {
        let mut table = ResultTable::new();
        table.insert(1, 1, measurements(&[("b", 2500.0)]));
        let display = table.to_display(&[1]);
        assert_eq!(display.headers, vec!["Threads", "b"]);
        assert_eq!(display.rows[0], vec!["1", "2500.00 μs"]);
    }

    #[test]
    fn test_display_missing_cell_is_not_available() {
        let mut table = ResultTable::new();
        table.insert(1, 1, measurements(&[("b", 100.0)]));
        table.insert(1, 2, BTreeMap::new());
        let display = table.to_display(&[1, 2]);
        assert_eq!(display.rows[1][1], NOT_AVAILABLE);
    }

    #[test]
    fn test_multi_mode_flat_columns_without_gaps() {
        // Two modes, each owning one benchmark, both succeeding for both
        // thread counts: 2 rows, 2 benchmark columns, no N/A cells.
        let mut table = ResultTable::new();
        for &threads in &[1, 2] {
            table.insert(1, threads, measurements(&[("sleep_task_bench", 1000.0)]));
            table.insert(2, threads, measurements(&[("cpu_task_bench", 2000.0)]));
        }
        let display = table.to_display(&[1, 2]);
        assert_eq!(display.rows.len(), 2);
        assert_eq!(display.headers.len(), 3);
        for row in &display.rows {
            assert!(!row.contains(&NOT_AVAILABLE.to_string()));
        }
    }

    #[test]
    fn test_render_grid_layout() {
        let display = DisplayTable {
            headers: vec!["Threads".to_string(), "b".to_string()],
            rows: vec![vec!["1".to_string(), "2500.00 μs".to_string()]],
        };
        let grid = display.render_grid();
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "+---------+------------+");
        assert_eq!(lines[1], "| Threads | b          |");
        assert_eq!(lines[2], "+=========+============+");
        assert_eq!(lines[3], "| 1       | 2500.00 μs |");
        assert_eq!(lines[4], "+---------+------------+");
    }

    #[test]
    fn test_csv_round_trips_display_rows() {
        let mut table = ResultTable::new();
        table.insert(1, 1, measurements(&[("b", 100.0), ("c", 200.0)]));
        table.insert(1, 2, measurements(&[("b", 150.0)]));
        let display = table.to_display(&[1, 2]);

        let mut buf = Vec::new();
        display.write_csv(&mut buf).unwrap();

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(buf.as_slice());
        let headers: Vec<String> = rdr
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, display.headers);

        let rows: Vec<Vec<String>> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(rows, display.rows);
    }
}
