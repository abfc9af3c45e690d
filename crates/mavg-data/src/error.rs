use std::path::PathBuf;

use chrono::NaiveDateTime;

/// Errors raised while reading events, writing records or loading config.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A file could not be opened.
    #[error("cannot open {file}: {source}")]
    Open {
        file: PathBuf,
        source: std::io::Error,
    },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A line or file failed to deserialize.
    #[error("parse error in {file} at line {line}: {detail}")]
    Parse {
        file: PathBuf,
        line: usize,
        detail: String,
    },

    /// An event's timestamp is earlier than the event before it.
    #[error("{file} line {line}: timestamp {timestamp} is earlier than the previous event ({previous})")]
    OutOfOrder {
        file: PathBuf,
        line: usize,
        timestamp: NaiveDateTime,
        previous: NaiveDateTime,
    },

    /// A config file is malformed or sets an out-of-range value.
    #[error("invalid config in {file}: {detail}")]
    InvalidConfig { file: PathBuf, detail: String },

    /// A record could not be encoded.
    #[error("encode error: {detail}")]
    Encode { detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
