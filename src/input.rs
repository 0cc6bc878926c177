use std::fs;
use std::io::Read;
use std::path::Path;

use csv::Reader;

use crate::error::{ConvertError, Result};

const BOM: &[u8] = b"\xEF\xBB\xBF";
const BULLET: char = '\u{2022}';

/// Untyped table as exported by the bank: no header, positional columns and
/// every value kept as text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from already split rows, cleaning every cell the same way
    /// the file loader does
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| clean_cell(c.as_ref())).collect())
            .collect();
        RawTable { rows }
    }

    /// Number of rows in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns, which is the length of the longest row since
    /// exports are allowed to be ragged
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at the given position, rows shorter than `col` read as empty
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Every cell of one column, top to bottom, padded with empty strings
    pub fn column(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, col))
    }
}

/// Strip the decoration bullets some banks put in front of text cells
fn clean_cell(cell: &str) -> String {
    cell.replace(BULLET, "")
}

fn create_table_reader<R: Read>(source: R) -> Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(source)
}

/// Read a whole semicolon separated export into a [`RawTable`]
pub fn read_table<R: Read>(mut source: R) -> Result<RawTable> {
    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes).map_err(csv::Error::from)?;
    let body = bytes.strip_prefix(BOM).unwrap_or(&bytes[..]);

    let mut rdr = create_table_reader(body);
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(clean_cell).collect());
    }

    log::debug!("read {} raw rows", rows.len());
    Ok(RawTable { rows })
}

/// Read the file at `path` with [`read_table`]
pub fn load_table(path: &Path) -> Result<RawTable> {
    let bytes = fs::read(path).map_err(|e| ConvertError::io(path, e))?;
    read_table(&bytes[..])
}
