//! JSON-lines output sink.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use mavg_core::{OutputRecord, OutputSink};
use tracing::debug;

use crate::error::DataLoadError;

/// Writes one JSON object per record, newline terminated.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Records written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Open `path` for appending, creating it if missing.
    ///
    /// An existing file is never truncated.
    pub fn append(path: &Path) -> Result<Self, DataLoadError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| DataLoadError::Open {
                file: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), "opened output sink");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> OutputSink for JsonLinesSink<W> {
    type Error = DataLoadError;

    fn write(&mut self, record: &OutputRecord) -> Result<(), DataLoadError> {
        serde_json::to_writer(&mut self.writer, record).map_err(|e| DataLoadError::Encode {
            detail: e.to_string(),
        })?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DataLoadError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Output path for an input file: `_output` goes before the extension.
///
/// `data/events.json` becomes `data/events_output.json`; a file without an
/// extension just gets the suffix.
pub fn output_path_for(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.file_stem().unwrap_or_default());
    name.push("_output");
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

// ===========================================================================
// Tests
// ===========================================================================
