//! File collaborators for the mavg engine.
//!
//! - [`source`] -- reads translation events from a JSON-lines file.
//! - [`sink`] -- appends output records to a JSON-lines file.
//! - [`config`] -- run configuration from RON, TOML or JSON.

pub mod config;
pub mod error;
pub mod sink;
pub mod source;

pub use config::{DEFAULT_WINDOW_SIZE, Format, RunConfig, detect_format, load_config};
pub use error::DataLoadError;
pub use sink::{JsonLinesSink, output_path_for};
pub use source::{JsonLinesSource, open_events};
