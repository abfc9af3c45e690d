//! Shared event builders for unit tests, property tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use chrono::NaiveDateTime;

use crate::engine::process_all;
use crate::event::{TranslationEvent, timestamp_format};
use crate::record::OutputRecord;

/// Calendar day used by the time-of-day helpers.
pub const DAY: &str = "2018-12-26";

/// Parse a full `YYYY-MM-DD HH:MM:SS.ffffff` timestamp.
pub fn timestamp(raw: &str) -> NaiveDateTime {
    timestamp_format::parse(raw).unwrap_or_else(|e| panic!("bad test timestamp '{raw}': {e}"))
}

/// An event at a full timestamp with the given duration.
pub fn event_at(raw: &str, duration: u64) -> TranslationEvent {
    TranslationEvent {
        timestamp: timestamp(raw),
        translation_id: "5aa5b2f39f7254a75aa5".to_string(),
        source_language: "en".to_string(),
        target_language: "fr".to_string(),
        client_name: "airliberty".to_string(),
        event_name: "translation_delivered".to_string(),
        nr_words: 30,
        duration,
    }
}

/// An event on [`DAY`] at `HH:MM:SS.ffffff`.
pub fn event(time: &str, duration: u64) -> TranslationEvent {
    event_at(&format!("{DAY} {time}"), duration)
}

/// An event `micros` microseconds after the Unix epoch.
pub fn event_at_micros(micros: i64, duration: u64) -> TranslationEvent {
    let timestamp = chrono::DateTime::from_timestamp_micros(micros)
        .unwrap_or_else(|| panic!("timestamp out of range: {micros}"))
        .naive_utc();
    TranslationEvent {
        timestamp,
        ..event_at("1970-01-01 00:00:00.000000", duration)
    }
}

/// Run `(time, duration)` pairs on [`DAY`] through a fresh engine.
pub fn run(window_size: u32, events: &[(&str, u64)]) -> Vec<OutputRecord> {
    let mut records = Vec::new();
    process_all(
        events.iter().map(|(time, duration)| event(time, *duration)),
        window_size,
        &mut records,
    )
    .unwrap_or_else(|e| panic!("engine failed: {e}"));
    records
}
