//! Run configuration.
//!
//! A run needs a window size and, optionally, an output path. Both can come
//! from a config file in RON, TOML or JSON (detected from the extension);
//! command-line flags override whatever the file sets.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DataLoadError;

/// Window size used when neither a flag nor a config file sets one.
pub const DEFAULT_WINDOW_SIZE: u32 = 10;

/// Settings for one moving-average run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Look-back window in minutes (must be positive).
    pub window_size: u32,
    /// Output file; derived from the input file name when absent.
    pub output: Option<PathBuf>,
}

impl RunConfig {
    /// Reject settings the engine cannot run with. `file` labels the error.
    pub fn validate(&self, file: &Path) -> Result<(), DataLoadError> {
        if self.window_size == 0 {
            return Err(DataLoadError::InvalidConfig {
                file: file.to_path_buf(),
                detail: "window_size must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            output: None,
        }
    }
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Loading
// ===========================================================================

/// Read and validate a run config file.
///
/// Missing keys fall back to [`RunConfig::default`]. Syntax errors, unknown
/// keys and a non-positive window size are all reported as
/// [`DataLoadError::InvalidConfig`].
pub fn load_config(path: &Path) -> Result<RunConfig, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| DataLoadError::Open {
        file: path.to_path_buf(),
        source,
    })?;

    let parse_error = |detail: String| DataLoadError::InvalidConfig {
        file: path.to_path_buf(),
        detail,
    };
    let config: RunConfig = match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
    };

    config.validate(path)?;

    debug!(path = %path.display(), ?format, window_size = config.window_size, "loaded run config");
    Ok(config)
}

// ===========================================================================
// Tests
// ===========================================================================
