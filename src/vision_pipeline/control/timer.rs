use std::time::{Duration, Instant};

/// Monotonic millisecond time base driving the capture cadence.
pub trait Clock {
    fn now_ms(&self) -> u64;

    /// Called by the run loop between polls that had nothing to do.
    fn idle(&self) {
        std::hint::spin_loop();
    }
}

/// Wall-clock implementation anchored at construction time.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
    idle_pause: Duration,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            idle_pause: Duration::from_millis(1),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn idle(&self) {
        std::thread::sleep(self.idle_pause);
    }
}

/// Remembers when a capture was last attempted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimer {
    last_capture_ms: Option<u64>,
}

impl FrameTimer {
    pub fn is_due(&self, now_ms: u64, interval_ms: u64) -> bool {
        self.last_capture_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= interval_ms)
    }

    pub fn mark(&mut self, now_ms: u64) {
        self.last_capture_ms = Some(now_ms);
    }
}
