//! Translation delivery events.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::minute::{Minute, timestamp_micros};

/// One delivered translation.
///
/// Only `timestamp` and `duration` feed the moving average. The remaining
/// fields are carried so that a parsed record is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEvent {
    /// When the translation was delivered (microsecond precision).
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub translation_id: String,
    pub source_language: String,
    pub target_language: String,
    pub client_name: String,
    pub event_name: String,
    pub nr_words: u64,
    /// Delivery time, the quantity being averaged.
    pub duration: u64,
}

impl TranslationEvent {
    /// Microseconds since the Unix epoch.
    pub fn timestamp_micros(&self) -> i64 {
        timestamp_micros(&self.timestamp)
    }

    /// The minute this event is counted under.
    ///
    /// Timestamps past a boundary round up to the next minute; an event
    /// exactly on a boundary belongs to that minute.
    pub fn minute(&self) -> Minute {
        Minute::ceil_of(&self.timestamp)
    }
}

impl fmt::Display for TranslationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translation event {} {}", self.client_name, self.timestamp)
    }
}

/// Serde adapter for the `YYYY-MM-DD HH:MM:SS.ffffff` timestamp format.
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

    pub fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, FORMAT)
    }

    pub fn serialize<S: Serializer>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&at.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}
