//! The trailing moving-average window engine.
//!
//! The engine walks an ordered event stream once. It keeps a window of
//! `window_size` minutes ending at a minute boundary, and every time an event
//! lands past that boundary it closes the boundary (emitting the average),
//! slides the window by one minute, and evicts the bucket that fell out of
//! the window. Gaps longer than one minute are walked minute by minute so
//! every boundary gets a record, including ones with no events.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut records: Vec<OutputRecord> = Vec::new();
//! let summary = process_all(events, 10, &mut records)?;
//! ```

use std::convert::Infallible;

use tracing::{debug, trace};

use crate::buckets::MinuteBuckets;
use crate::error::EngineError;
use crate::event::TranslationEvent;
use crate::minute::Minute;
use crate::record::OutputRecord;
use crate::sink::OutputSink;

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// The trailing span `(lower, upper]` currently tracked.
///
/// `upper - lower` is always the configured window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    lower: Minute,
    upper: Minute,
}

impl Window {
    fn ending_at(upper: Minute, window_size: u32) -> Self {
        Self {
            lower: upper.minus(window_size),
            upper,
        }
    }

    pub fn lower(&self) -> Minute {
        self.lower
    }

    pub fn upper(&self) -> Minute {
        self.upper
    }

    /// Whether an instant (in microseconds) lies no further than the window
    /// size past the lower edge, i.e. at or before the upper edge.
    pub fn contains(&self, micros: i64) -> bool {
        micros <= self.upper.start_micros()
    }

    fn slide(self) -> Self {
        Self {
            lower: self.lower.next(),
            upper: self.upper.next(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Counters for one pass over an event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessSummary {
    /// Events folded into the window.
    pub events: u64,
    /// Records written to the sink.
    pub records: u64,
}

// ---------------------------------------------------------------------------
// WindowEngine
// ---------------------------------------------------------------------------

/// Incremental moving-average state machine.
///
/// Feed events with [`push`](Self::push) in non-decreasing timestamp order,
/// then call [`finish`](Self::finish) to emit the last boundary. Ordering is
/// the caller's contract: out-of-order events produce meaningless output and
/// are only caught by a debug assertion.
#[derive(Debug, Clone)]
pub struct WindowEngine {
    window_size: u32,
    window: Option<Window>,
    buckets: MinuteBuckets,
    last_micros: Option<i64>,
    summary: ProcessSummary,
}

impl WindowEngine {
    /// Create an engine averaging over the trailing `window_size` minutes.
    pub fn new(window_size: u32) -> Result<Self, EngineError> {
        if window_size == 0 {
            return Err(EngineError::InvalidWindowSize(window_size));
        }
        Ok(Self {
            window_size,
            window: None,
            buckets: MinuteBuckets::new(window_size as usize),
            last_micros: None,
            summary: ProcessSummary::default(),
        })
    }

    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    /// The current window, or `None` before the first event.
    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Buckets currently retained for the window.
    pub fn buckets(&self) -> &MinuteBuckets {
        &self.buckets
    }

    pub fn summary(&self) -> ProcessSummary {
        self.summary
    }

    /// Process one event, emitting a record for every boundary it crosses.
    pub fn push<S: OutputSink + ?Sized>(
        &mut self,
        event: &TranslationEvent,
        sink: &mut S,
    ) -> Result<(), S::Error> {
        let micros = event.timestamp_micros();
        debug_assert!(
            self.last_micros.is_none_or(|last| last <= micros),
            "events must arrive in non-decreasing timestamp order"
        );

        let mut window = match self.window {
            Some(window) => window,
            None => self.open(micros, sink)?,
        };

        while !window.contains(micros) {
            self.emit(window.upper, sink)?;
            window = window.slide();
            self.window = Some(window);
            self.buckets.evict_through(window.lower);
        }

        self.buckets.record(Minute::ceil_micros(micros), event.duration);
        self.last_micros = Some(micros);
        self.summary.events += 1;
        Ok(())
    }

    /// Emit the boundary the last event belongs to and return the summary.
    ///
    /// Emits nothing if no event was pushed.
    pub fn finish<S: OutputSink + ?Sized>(mut self, sink: &mut S) -> Result<ProcessSummary, S::Error> {
        if let Some(window) = self.window {
            self.emit(window.upper, sink)?;
        }
        debug!(
            events = self.summary.events,
            records = self.summary.records,
            "window engine finished"
        );
        Ok(self.summary)
    }

    /// Initialize the window around the first event.
    ///
    /// An event past a boundary has already crossed the boundary before it,
    /// which closes over an empty window.
    fn open<S: OutputSink + ?Sized>(&mut self, micros: i64, sink: &mut S) -> Result<Window, S::Error> {
        let upper = Minute::ceil_micros(micros);
        let window = Window::ending_at(upper, self.window_size);
        self.window = Some(window);
        debug!(
            lower = %window.lower,
            upper = %window.upper,
            window_size = self.window_size,
            "window opened"
        );

        if !Minute::is_aligned(micros) {
            self.emit(upper.prev(), sink)?;
            self.buckets.evict_through(window.lower);
        }
        Ok(window)
    }

    fn emit<S: OutputSink + ?Sized>(&mut self, minute: Minute, sink: &mut S) -> Result<(), S::Error> {
        let record = OutputRecord::new(minute, self.buckets.aggregate());
        trace!(
            minute = %minute,
            average = record.average,
            retained = self.buckets.len(),
            "boundary closed"
        );
        sink.write(&record)?;
        self.summary.records += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Whole-stream entry points
// ---------------------------------------------------------------------------

/// Run the engine over an entire event stream.
///
/// Rejects a zero window size before touching the stream. Emits nothing for
/// an empty stream; otherwise one record per crossed boundary plus the final
/// boundary, then flushes the sink.
pub fn process_all<I, S>(
    events: I,
    window_size: u32,
    sink: &mut S,
) -> Result<ProcessSummary, EngineError>
where
    I: IntoIterator<Item = TranslationEvent>,
    S: OutputSink + ?Sized,
{
    try_process_all(
        events.into_iter().map(Ok::<_, Infallible>),
        window_size,
        sink,
    )
}

/// Like [`process_all`], for sources that can fail mid-stream.
///
/// The first source error stops the pass. Records already written stay in
/// the sink; the final boundary is not emitted.
pub fn try_process_all<I, E, S>(
    events: I,
    window_size: u32,
    sink: &mut S,
) -> Result<ProcessSummary, EngineError>
where
    I: IntoIterator<Item = Result<TranslationEvent, E>>,
    E: std::error::Error + Send + Sync + 'static,
    S: OutputSink + ?Sized,
{
    let mut engine = WindowEngine::new(window_size)?;
    for event in events {
        let event = event.map_err(EngineError::from_source)?;
        engine.push(&event, sink).map_err(EngineError::from_sink)?;
    }
    let summary = engine.finish(sink).map_err(EngineError::from_sink)?;
    sink.flush().map_err(EngineError::from_sink)?;
    Ok(summary)
}

// ===========================================================================
// Tests
// ===========================================================================
