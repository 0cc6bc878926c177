use std::fs;
use std::io::{self, Write};
use std::path::Path;

use csv::{QuoteStyle, Terminator, Writer};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{ConvertError, Result};

/// One line of the import file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputRow {
    pub date: String,
    pub payee: String,
    /// never filled from the export, kept for the import layout
    pub memo: String,
    pub outflow: String,
    pub inflow: String,
}

impl OutputRow {
    pub const HEADERS: [&'static str; 5] = ["Date", "Payee", "Memo", "Outflow", "Inflow"];
}

fn create_output_serializer<W: Write>(sink: W) -> Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(sink)
}

/// Write the header and every row, all fields quoted.
///
/// The header is written even when there are no rows so an empty export still
/// produces a valid import file.
pub fn write_rows<W: Write>(sink: W, rows: &[OutputRow]) -> Result<()> {
    let mut wtr = create_output_serializer(sink);
    wtr.write_record(OutputRow::HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write rows to `path`. Nothing appears at `path` unless the whole table was
/// written.
pub fn write_to_path(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut staged = create_staged_file(dir, path).map_err(|e| ConvertError::io(dir, e))?;
    write_rows(&mut staged, rows)?;
    staged
        .persist(path)
        .map_err(|e| ConvertError::io(path, e.error))?;
    log::debug!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Temp file next to `path` that ends up with the permissions a plain create
/// would give, or the permissions of the file being replaced
fn create_staged_file(dir: &Path, path: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // still masked by the process umask
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let staged = builder.tempfile_in(dir)?;
    if let Ok(existing) = fs::metadata(path) {
        staged.as_file().set_permissions(existing.permissions())?;
    }
    Ok(staged)
}
