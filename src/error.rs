use thiserror::Error;

/// Failures of the key-value persistence capability. The engine treats every
/// variant as recoverable and falls back to its in-memory state.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Error, Debug)]
pub enum PhraseError {
    #[error("cannot read phrase list: {0}")]
    Io(#[from] std::io::Error),

    #[error("phrase list is not a JSON array of strings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("phrase list contains no usable phrases")]
    Empty,

    #[error("cannot fetch phrase list: {0}")]
    Network(String),
}
