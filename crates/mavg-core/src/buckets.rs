//! Per-minute duration buckets retained for the trailing window.
//!
//! [`MinuteBuckets`] keeps one [`MinuteBucket`] per minute that received at
//! least one event, oldest first, and a [`RunningAggregate`] equal to the sum
//! of every retained bucket. Recording an event and evicting a bucket both
//! update the aggregate in O(1), so the average is never recomputed by
//! walking the buckets.

use std::collections::VecDeque;

use tracing::trace;

use crate::minute::Minute;

/// Buckets preallocated up front; larger windows grow on demand.
const PREALLOCATE_LIMIT: usize = 1024;

// ---------------------------------------------------------------------------
// Running aggregate
// ---------------------------------------------------------------------------

/// Sum and count of every event in the retained buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunningAggregate {
    /// Sum of durations. Wider than a single duration so sums never wrap.
    pub total: u128,
    /// Number of events.
    pub count: u64,
}

impl RunningAggregate {
    fn add(&mut self, duration: u64) {
        self.total += u128::from(duration);
        self.count += 1;
    }

    fn subtract(&mut self, bucket: &MinuteBucket) {
        self.total -= bucket.total_duration;
        self.count -= bucket.event_count;
    }

    /// Mean duration, or zero when no events are retained.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total as f64 / self.count as f64
    }
}

// ---------------------------------------------------------------------------
// Minute bucket
// ---------------------------------------------------------------------------

/// Aggregate of the events counted under one minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteBucket {
    pub minute: Minute,
    pub total_duration: u128,
    pub event_count: u64,
}

impl MinuteBucket {
    fn new(minute: Minute, duration: u64) -> Self {
        Self {
            minute,
            total_duration: u128::from(duration),
            event_count: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// MinuteBuckets
// ---------------------------------------------------------------------------

/// Bounded, chronologically ordered buckets with an incrementally maintained
/// aggregate.
///
/// New minutes are appended at the back and old minutes evicted from the
/// front, so the deque never needs reordering. The caller keeps the retained
/// minutes inside one window, which bounds the length by `capacity`.
#[derive(Debug, Clone)]
pub struct MinuteBuckets {
    buckets: VecDeque<MinuteBucket>,
    capacity: usize,
    aggregate: RunningAggregate,
}

impl MinuteBuckets {
    /// Create an empty collection holding at most `capacity` minutes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "MinuteBuckets capacity must be > 0");
        Self {
            buckets: VecDeque::with_capacity(capacity.min(PREALLOCATE_LIMIT)),
            capacity,
            aggregate: RunningAggregate::default(),
        }
    }

    /// Fold one event's duration into the bucket for `minute`.
    ///
    /// `minute` must not precede the newest retained bucket.
    pub fn record(&mut self, minute: Minute, duration: u64) {
        match self.buckets.back_mut() {
            Some(newest) if newest.minute == minute => {
                newest.total_duration += u128::from(duration);
                newest.event_count += 1;
            }
            newest => {
                debug_assert!(
                    newest.is_none_or(|b| b.minute < minute),
                    "bucket minutes must be appended in chronological order"
                );
                debug_assert!(
                    self.buckets.len() < self.capacity,
                    "MinuteBuckets over capacity"
                );
                self.buckets.push_back(MinuteBucket::new(minute, duration));
            }
        }
        self.aggregate.add(duration);
    }

    /// Evict every bucket whose minute is at or before `lower`.
    ///
    /// Returns the number of buckets removed.
    pub fn evict_through(&mut self, lower: Minute) -> usize {
        let mut evicted = 0;
        while let Some(oldest) = self.buckets.front() {
            if oldest.minute > lower {
                break;
            }
            if let Some(bucket) = self.buckets.pop_front() {
                self.aggregate.subtract(&bucket);
                trace!(
                    minute = %bucket.minute,
                    total = bucket.total_duration,
                    count = bucket.event_count,
                    "evicted bucket"
                );
                evicted += 1;
            }
        }
        evicted
    }

    /// Sum and count across the retained buckets.
    pub fn aggregate(&self) -> RunningAggregate {
        self.aggregate
    }

    /// Mean duration across the retained buckets.
    pub fn average(&self) -> f64 {
        self.aggregate.average()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Maximum number of retained minutes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn oldest(&self) -> Option<&MinuteBucket> {
        self.buckets.front()
    }

    pub fn newest(&self) -> Option<&MinuteBucket> {
        self.buckets.back()
    }

    /// Iterate buckets from oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &MinuteBucket> + '_ {
        self.buckets.iter()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
