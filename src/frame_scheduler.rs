//! Frame pacing for the orchestrator loop.
//!
//! Provides portable frame pacing without async/await or platform-specific
//! timers. The caller is responsible for sleeping between frames.

use embassy_time::{Duration, Instant};

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Frame period of a loop running at `rate_hz`
pub fn period_for_rate(rate_hz: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(rate_hz.max(1)))
}

/// Fixed-period deadline tracker with drift correction.
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(period_for_rate(60));
///
/// loop {
///     render_and_transmit();
///     let result = scheduler.tick(Instant::now());
///     sleep(result.sleep_duration);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    next_frame: Option<Instant>,
    frame_duration: Duration,
}

impl FrameScheduler {
    pub fn new(frame_duration: Duration) -> Self {
        Self {
            next_frame: None,
            frame_duration,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Advance the deadline by one frame and return how long to wait.
    ///
    /// If we've fallen more than two frames behind, the schedule restarts
    /// from `now` instead of bursting to catch up.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let max_drift = self.frame_duration * 2;
        let deadline = match self.next_frame {
            Some(deadline) if now <= deadline + max_drift => deadline,
            _ => now,
        };

        let next = deadline + self.frame_duration;
        self.next_frame = Some(next);

        let sleep_duration = if next > now {
            next - now
        } else {
            Duration::from_ticks(0)
        };

        FrameResult {
            next_deadline: next,
            sleep_duration,
        }
    }
}
