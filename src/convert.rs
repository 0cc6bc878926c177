use std::io::Read;
use std::path::Path;

use crate::amount::{format_amount, parse_amount, split_amount};
use crate::error::Result;
use crate::input::{RawTable, load_table, read_table};
use crate::output::OutputRow;

/// Column used when no column looks like an amount column. Most exports put
/// date, payee, amount first, but nothing guarantees it.
const FALLBACK_AMOUNT_COLUMN: usize = 2;

/// Find the column holding the amounts.
///
/// Scans right to left and picks the first column where some cell has a digit
/// and no cell has a letter. Exports tend to put the amount near the end with a
/// varying number of metadata columns in front.
pub fn detect_amount_column(table: &RawTable) -> usize {
    let width = table.width();
    for col in (0..width).rev() {
        if is_amount_column(table.column(col)) {
            log::debug!("amount column detected at index {col}");
            return col;
        }
    }

    let fallback = if width > FALLBACK_AMOUNT_COLUMN {
        FALLBACK_AMOUNT_COLUMN
    } else {
        width.saturating_sub(1)
    };
    if width > 0 {
        log::warn!("no column looks like an amount column, using index {fallback}");
    }
    fallback
}

fn is_amount_column<'a>(cells: impl Iterator<Item = &'a str>) -> bool {
    let mut has_digit = false;
    for cell in cells {
        let cell = cell.trim();
        if cell.chars().any(|c| c.is_ascii_alphabetic()) {
            return false;
        }
        has_digit |= cell.chars().any(|c| c.is_ascii_digit());
    }
    has_digit
}

impl OutputRow {
    /// Build the output row for `row` of `table`, reading the amount from
    /// `amount_col`. Missing cells read as empty.
    pub fn from_row(table: &RawTable, row: usize, amount_col: usize) -> Self {
        let (outflow, inflow) = split_amount(parse_amount(table.cell(row, amount_col)));
        OutputRow {
            date: table.cell(row, 0).trim().to_string(),
            payee: table.cell(row, 1).trim().to_string(),
            memo: String::new(),
            outflow: format_amount(outflow),
            inflow: format_amount(inflow),
        }
    }

    /// Rows without a date or payee are headers, totals or blank filler
    pub fn is_transaction(&self) -> bool {
        !self.date.is_empty() && !self.payee.is_empty()
    }
}

/// Convert a whole table, keeping input order and dropping non-transaction rows
pub fn convert(table: &RawTable) -> Vec<OutputRow> {
    let amount_col = detect_amount_column(table);

    let rows: Vec<OutputRow> = (0..table.len())
        .map(|row| OutputRow::from_row(table, row, amount_col))
        .filter(OutputRow::is_transaction)
        .collect();

    log::debug!(
        "kept {} of {} rows using amount column {amount_col}",
        rows.len(),
        table.len()
    );
    rows
}

pub fn convert_reader<R: Read>(source: R) -> Result<Vec<OutputRow>> {
    Ok(convert(&read_table(source)?))
}

/// Load and convert the export at `path`
pub fn convert_path(path: &Path) -> Result<Vec<OutputRow>> {
    Ok(convert(&load_table(path)?))
}
