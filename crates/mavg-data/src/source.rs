//! JSON-lines event source.
//!
//! Each non-blank line holds one event object:
//!
//! ```text
//! {"timestamp": "2018-12-26 18:11:08.509654", "translation_id": "5aa5b2f39f7254a75aa5",
//!  "source_language": "en", "target_language": "fr", "client_name": "airliberty",
//!  "event_name": "translation_delivered", "nr_words": 30, "duration": 20}
//! ```
//!
//! Events are read lazily, one line at a time. The first malformed line, or
//! the first timestamp earlier than its predecessor, ends the stream with an
//! error carrying the line number.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use mavg_core::TranslationEvent;
use tracing::debug;

use crate::error::DataLoadError;

/// Lazily parsed stream of events from a line-oriented reader.
#[derive(Debug)]
pub struct JsonLinesSource<R> {
    reader: R,
    /// Name used in error messages.
    file: PathBuf,
    /// 1-based number of the last line read.
    line: usize,
    previous: Option<NaiveDateTime>,
    buf: String,
    done: bool,
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Wrap a reader. `file` only labels error messages.
    pub fn new(reader: R, file: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            file: file.into(),
            line: 0,
            previous: None,
            buf: String::new(),
            done: false,
        }
    }

    /// Number of lines consumed so far, blank lines included.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    fn next_event(&mut self) -> Option<Result<TranslationEvent, DataLoadError>> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    self.line += 1;
                    return Some(Err(DataLoadError::Parse {
                        file: self.file.clone(),
                        line: self.line,
                        detail: e.to_string(),
                    }));
                }
                Err(e) => return Some(Err(DataLoadError::Io(e))),
            }

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            let event = match parse_line(text, &self.file, self.line) {
                Ok(event) => event,
                Err(e) => return Some(Err(e)),
            };
            if let Err(e) = self.check_order(&event) {
                return Some(Err(e));
            }
            self.previous = Some(event.timestamp);
            return Some(Ok(event));
        }
    }

    fn check_order(&self, event: &TranslationEvent) -> Result<(), DataLoadError> {
        match self.previous {
            Some(previous) if event.timestamp < previous => Err(DataLoadError::OutOfOrder {
                file: self.file.clone(),
                line: self.line,
                timestamp: event.timestamp,
                previous,
            }),
            _ => Ok(()),
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = Result<TranslationEvent, DataLoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_event();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

impl<R: BufRead> FusedIterator for JsonLinesSource<R> {}

fn parse_line(text: &str, file: &Path, line: usize) -> Result<TranslationEvent, DataLoadError> {
    serde_json::from_str(text).map_err(|e| DataLoadError::Parse {
        file: file.to_path_buf(),
        line,
        detail: e.to_string(),
    })
}

/// Open an events file for buffered, lazy reading.
pub fn open_events(path: &Path) -> Result<JsonLinesSource<BufReader<File>>, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Open {
        file: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "opened event source");
    Ok(JsonLinesSource::new(BufReader::new(file), path))
}

// ===========================================================================
// Tests
// ===========================================================================
