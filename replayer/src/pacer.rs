//! Real-time pacing of replayed records.

use std::time::Duration;

/// Gaps at or above this are treated as discontinuities, not waits.
const MAX_GAP_MILLIS: i64 = 1000;

/// Reproduces the recorded wall-clock gaps between elapse records.
#[derive(Debug, Default)]
pub struct Pacer {
    last_elapsed: Option<i32>,
}

impl Pacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently observed elapsed time, in milliseconds.
    pub fn last_elapsed(&self) -> Option<i32> {
        self.last_elapsed
    }

    /// Records `elapsed` and returns how long to wait before continuing.
    ///
    /// Only gaps strictly between 0 and 1000 ms produce a wait. Backward
    /// clocks, repeated timestamps and long jumps are accepted silently.
    pub fn next_gap(&mut self, elapsed: i32) -> Option<Duration> {
        let gap = self.last_elapsed.and_then(|last| {
            let delta = i64::from(elapsed) - i64::from(last);
            (delta > 0 && delta < MAX_GAP_MILLIS).then(|| Duration::from_millis(delta as u64))
        });
        self.last_elapsed = Some(elapsed);
        gap
    }

    /// Waits out the gap since the previous elapse record, if any.
    ///
    /// Returns the time spent waiting.
    pub async fn on_timing_record(&mut self, elapsed: i32) -> Duration {
        match self.next_gap(elapsed) {
            Some(gap) => {
                log::trace!(elapsed = elapsed, gap_ms = gap.as_millis() as u64; "pacing");
                tokio::time::sleep(gap).await;
                gap
            }
            None => Duration::ZERO,
        }
    }
}
