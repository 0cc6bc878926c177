use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input or output file could not be opened, read or written
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The input was not readable as semicolon separated UTF-8 text
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// An uploaded file did not carry the `.csv` extension
    #[error("unsupported file type: {0}")]
    UnsupportedUpload(String),
    /// An upload arrived without a file name
    #[error("no file selected")]
    EmptyUpload,
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
