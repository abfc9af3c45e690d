//! mavg core: a one-pass trailing moving average over minute boundaries.
//!
//! Consumes an ordered stream of [`event::TranslationEvent`]s and, for every
//! minute boundary the stream passes, emits the mean `duration` of the events
//! inside the trailing window of `window_size` minutes ending at that
//! boundary. Minutes without events still get a record (average `0` when the
//! window is empty).
//!
//! # Algorithm
//!
//! The [`engine::WindowEngine`] holds a window `(lower, upper]` of whole
//! minutes. For each event:
//!
//! 1. **Advance** -- while the event lies past `upper`, emit the record for
//!    `upper`, slide the window by one minute and evict the bucket that left
//!    it.
//! 2. **Fold** -- add the event's duration to the bucket for its minute
//!    (timestamps round up; exact boundaries keep their minute) and to the
//!    running aggregate.
//!
//! When the stream ends, the current `upper` is emitted once more. Memory is
//! bounded by `window_size` buckets regardless of stream length, and each
//! event costs O(1) plus one step per crossed boundary.
//!
//! # Key Types
//!
//! - [`engine::WindowEngine`] -- incremental state machine (`push`/`finish`).
//! - [`engine::process_all`] / [`engine::try_process_all`] -- whole-stream
//!   entry points.
//! - [`buckets::MinuteBuckets`] -- bounded ordered per-minute aggregates.
//! - [`sink::OutputSink`] -- where records go.
//! - [`minute::Minute`] -- minute-aligned instants.

pub mod buckets;
pub mod engine;
pub mod error;
pub mod event;
pub mod minute;
pub mod record;
pub mod sink;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use engine::{ProcessSummary, Window, WindowEngine, process_all, try_process_all};
pub use error::{BoxError, EngineError};
pub use event::TranslationEvent;
pub use minute::Minute;
pub use record::OutputRecord;
pub use sink::OutputSink;
