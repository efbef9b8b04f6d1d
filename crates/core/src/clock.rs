//! Drop clock - the fixed-delta accumulator behind automatic descent
//!
//! Elapsed time accumulates every frame. Once the accumulator is strictly past
//! the current interval, the clock reports that one drop is due. A slow frame
//! never produces a backlog: at most one drop per frame, and the drop itself
//! zeroes the accumulator.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropClock {
    counter_ms: u32,
    last_frame_ms: Option<u64>,
}

impl DropClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds accumulated since the last drop.
    pub fn counter_ms(&self) -> u32 {
        self.counter_ms
    }

    /// Accumulate `elapsed_ms` and report whether a drop is due.
    pub fn advance(&mut self, elapsed_ms: u32, interval_ms: u32) -> bool {
        self.counter_ms = self.counter_ms.saturating_add(elapsed_ms);
        self.counter_ms > interval_ms
    }

    /// Elapsed time since the previous frame timestamp.
    ///
    /// The first frame after a reset has no predecessor and counts as zero.
    pub fn frame_delta(&mut self, now_ms: u64) -> u32 {
        let delta = match self.last_frame_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => 0,
        };
        self.last_frame_ms = Some(now_ms);
        u32::try_from(delta).unwrap_or(u32::MAX)
    }

    /// Called whenever a piece drops one row, by timer or by hand.
    pub fn reset_counter(&mut self) {
        self.counter_ms = 0;
    }

    /// Forget everything, including the last frame timestamp.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
