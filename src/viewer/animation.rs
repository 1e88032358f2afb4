//! Frame clock for the viewport's single shared animation.

use super::container::{AnimationOptions, FrameTiming};

/// Duration of one frame at 60 Hz, in ms.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Tracks one animation at a time: fades, kinetic wheel scrolling.
///
/// Feed it the display-frame timestamps with [`AnimationClock::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationClock {
    running: bool,
    started_at: Option<f64>,
    last_frame_at: Option<f64>,
    frame_count: i64,
    duration: Option<f64>,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating. Fails while another animation is running.
    pub fn start(&mut self, options: AnimationOptions) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.duration = options.duration;
        self.restart();
        true
    }

    /// Restart the running animation; its duration is kept.
    pub fn reset(&mut self) {
        if self.running {
            self.restart();
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.duration = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance to the frame at `now`; `None` when idle.
    pub fn tick(&mut self, now: f64) -> Option<FrameTiming> {
        if !self.running {
            return None;
        }
        let started_at = *self.started_at.get_or_insert(now);
        let elapsed = (now - started_at).max(0.0);
        let frame_time_ratio = self
            .last_frame_at
            .map_or(1.0, |last| ((now - last) / FRAME_MS).max(0.0));
        self.last_frame_at = Some(now);

        let finished = self.duration.is_some_and(|d| elapsed >= d);
        let timing = FrameTiming {
            frame_count: self.frame_count,
            elapsed,
            frame_time_ratio,
            finished,
        };
        self.frame_count = self.frame_count.saturating_add(1);
        if finished {
            self.stop();
        }
        Some(timing)
    }

    fn restart(&mut self) {
        self.started_at = None;
        self.last_frame_at = None;
        self.frame_count = 0;
    }
}
