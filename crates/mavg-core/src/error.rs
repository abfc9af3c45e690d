/// Boxed error from an event source or output sink.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can stop a moving-average pass.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The window must span at least one minute.
    #[error("window size must be a positive integer, got {0}")]
    InvalidWindowSize(u32),

    /// The event source failed before yielding the next event.
    #[error("event source failed: {0}")]
    Source(#[source] BoxError),

    /// The output sink rejected a record.
    #[error("output sink failed: {0}")]
    Sink(#[source] BoxError),
}

impl EngineError {
    pub(crate) fn from_source<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Source(Box::new(err))
    }

    pub(crate) fn from_sink<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Sink(Box::new(err))
    }
}
