// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text/JSON output selection and a minimal fixed-width table renderer
//! for list views.

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a serializable record as pretty JSON, regardless of `format` —
/// callers in `Text` mode use this only when there's no bespoke text
/// rendering worth writing (e.g. the rejection-feedback blob).
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A column in a [`Table`]: header text plus a right-align flag.
pub struct Column {
    pub header: &'static str,
    pub right_align: bool,
}

impl Column {
    pub fn left(header: &'static str) -> Self {
        Self { header, right_align: false }
    }

    pub fn right(header: &'static str) -> Self {
        Self { header, right_align: true }
    }
}

/// A minimal fixed-width table, column widths derived from the widest
/// cell (including the header) in each column.
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn print(&self) {
        let mut stdout = std::io::stdout();
        self.render(&mut stdout);
    }

    /// Write the table to an arbitrary sink; split out from [`Table::print`]
    /// so rendering can be checked against an in-memory buffer in tests.
    pub fn render(&self, out: &mut impl std::io::Write) {
        if self.rows.is_empty() {
            let _ = writeln!(out, "(none)");
            return;
        }

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows.iter().map(|r| r[i].len()).chain(std::iter::once(col.header.len())).max().unwrap_or(0)
            })
            .collect();

        let header: Vec<String> =
            self.columns.iter().zip(&widths).map(|(col, w)| format!("{:<width$}", col.header, width = w)).collect();
        let _ = writeln!(out, "{}", header.join("  "));

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&self.columns)
                .zip(&widths)
                .map(|((cell, col), w)| {
                    if col.right_align {
                        format!("{cell:>w$}")
                    } else {
                        format!("{cell:<w$}")
                    }
                })
                .collect();
            let _ = writeln!(out, "{}", cells.join("  "));
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
