use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::buckets::RunningAggregate;
use crate::minute::Minute;

/// The moving average at one minute boundary.
///
/// Serializes as `{"date": "YYYY-MM-DD HH:MM:SS", "average_delivery_time": n}`.
/// An empty window writes the integer `0`; otherwise `n` is the float mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputRecord {
    pub minute: Minute,
    pub average: f64,
    /// Events inside the window when the boundary closed.
    pub window_events: u64,
}

impl OutputRecord {
    /// Close `minute` over the window's current totals.
    pub fn new(minute: Minute, aggregate: RunningAggregate) -> Self {
        Self {
            minute,
            average: aggregate.average(),
            window_events: aggregate.count,
        }
    }

    /// The minute rendered as `YYYY-MM-DD HH:MM:SS`.
    pub fn label(&self) -> String {
        self.minute.to_string()
    }
}

impl Serialize for OutputRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OutputRecord", 2)?;
        state.serialize_field("date", &self.minute.to_string())?;
        if self.window_events == 0 {
            state.serialize_field("average_delivery_time", &0u64)?;
        } else {
            state.serialize_field("average_delivery_time", &self.average)?;
        }
        state.end()
    }
}
