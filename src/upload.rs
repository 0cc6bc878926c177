//! Transport independent half of the upload form: the web layer hands over the
//! uploaded name and bytes and gets back a ready attachment or an error to show
//! the user.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::convert::convert_path;
use crate::error::{ConvertError, Result};
use crate::output::write_rows;

const ALLOWED_EXTENSION: &str = "csv";
const DOWNLOAD_SUFFIX: &str = "_ynab.csv";
const FALLBACK_STEM: &str = "upload";

/// A converted upload ready to be sent back as an attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedUpload {
    pub filename: String,
    pub body: Vec<u8>,
}

/// Only `.csv` uploads are converted, in any letter case
pub fn is_csv_filename(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(ALLOWED_EXTENSION))
}

/// Reduce a client supplied name to something safe to echo back in a header.
///
/// Path separators become spaces, whitespace runs become `_`, anything outside
/// `[A-Za-z0-9_.-]` is dropped and leading or trailing `.` and `_` are trimmed,
/// so `../../etc/passwd` cannot climb out of anything.
pub fn secure_filename(filename: &str) -> String {
    let spaced: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// `statement.csv` is offered back as `statement_ynab.csv`
pub fn download_filename(original: &str) -> String {
    let safe = secure_filename(original);
    let stem = match safe.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => safe.as_str(),
    };
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    format!("{stem}{DOWNLOAD_SUFFIX}")
}

/// Convert an uploaded export.
///
/// The upload is staged in a temporary file which is removed whether or not
/// the conversion succeeds. Nothing is returned unless the whole file
/// converted.
pub fn convert_upload(filename: &str, contents: &[u8]) -> Result<ConvertedUpload> {
    if filename.is_empty() {
        return Err(ConvertError::EmptyUpload);
    }
    if !is_csv_filename(filename) {
        return Err(ConvertError::UnsupportedUpload(filename.to_string()));
    }

    let mut staged = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .map_err(|e| ConvertError::io(std::env::temp_dir(), e))?;
    stage(&mut staged, contents)?;

    let rows = convert_path(staged.path())?;
    let mut body = Vec::new();
    write_rows(&mut body, &rows)?;

    let filename = download_filename(filename);
    log::info!("converted upload into {filename} with {} rows", rows.len());
    Ok(ConvertedUpload { filename, body })
}

fn stage(staged: &mut NamedTempFile, contents: &[u8]) -> Result<()> {
    let path = staged.path().to_path_buf();
    staged
        .write_all(contents)
        .map_err(|e| ConvertError::io(&path, e))?;
    staged.flush().map_err(|e| ConvertError::io(&path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Extension check is case insensitive and needs an actual extension
    fn csv_extension_check() {
        assert!(is_csv_filename("eksport.csv"));
        assert!(is_csv_filename("EKSPORT.CSV"));
        assert!(is_csv_filename("a.b.csv"));
        assert!(!is_csv_filename("csv"));
        assert!(!is_csv_filename("eksport.xlsx"));
        assert!(!is_csv_filename("eksport.csv.exe"));
    }

    #[test]
    /// Hostile or messy names are cleaned up before being reused
    fn filenames_are_sanitised() {
        assert_eq!("My_export_2024.csv", secure_filename("My export 2024.csv"));
        assert_eq!("etc_passwd", secure_filename("../../etc/passwd"));
        assert_eq!("Udfrt.csv", secure_filename("Udført.csv"));
        assert_eq!("", secure_filename("../.."));
    }

    #[test]
    /// The download keeps the original stem and gets the `_ynab` suffix
    fn download_name_from_original() {
        assert_eq!("eksport_ynab.csv", download_filename("eksport.csv"));
        assert_eq!("bank.2024_ynab.csv", download_filename("bank.2024.csv"));
        assert_eq!("My_file_ynab.csv", download_filename("My file.CSV"));
        assert_eq!("upload_ynab.csv", download_filename("..."));
    }

    #[test]
    /// A csv upload converts into an attachment with the converted table
    fn upload_converts() {
        let data = "2024-01-15;Grocery Store;;-1.234,56\n2024-01-16;Salary;;2500,00\n";
        let converted = convert_upload("statement.csv", data.as_bytes()).unwrap();

        assert_eq!("statement_ynab.csv", converted.filename);
        let text = String::from_utf8(converted.body).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(3, lines.len());
        assert_eq!("\"2024-01-15\",\"Grocery Store\",\"\",\"1,234.56\",\"\"", lines[1]);
        assert_eq!("\"2024-01-16\",\"Salary\",\"\",\"\",\"2,500.00\"", lines[2]);
    }

    #[test]
    /// Non csv uploads are refused before anything is converted
    fn non_csv_upload_is_rejected() {
        let err = convert_upload("statement.pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedUpload(name) if name == "statement.pdf"));

        let err = convert_upload("", b"").unwrap_err();
        assert!(matches!(err, ConvertError::EmptyUpload));
    }

    #[test]
    /// A broken upload surfaces as one error and yields no attachment
    fn broken_upload_is_an_error() {
        let err = convert_upload("statement.csv", b"2024-01-15;Caf\xe9;;-1,00\n").unwrap_err();

        assert!(matches!(err, ConvertError::Csv(_)));
    }
}
