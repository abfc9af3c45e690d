//! Destination for emitted moving-average records.

use std::convert::Infallible;

use crate::record::OutputRecord;

/// Receives output records in the order the engine produces them.
pub trait OutputSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append one record.
    fn write(&mut self, record: &OutputRecord) -> Result<(), Self::Error>;

    /// Flush buffered records. Called once after the final record.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Collects records in memory.
impl OutputSink for Vec<OutputRecord> {
    type Error = Infallible;

    fn write(&mut self, record: &OutputRecord) -> Result<(), Self::Error> {
        self.push(*record);
        Ok(())
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    type Error = S::Error;

    fn write(&mut self, record: &OutputRecord) -> Result<(), Self::Error> {
        (**self).write(record)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}
