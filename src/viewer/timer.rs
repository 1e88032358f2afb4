//! Cancellable one-shot and repeating tasks.
//!
//! A `TimerTask` holds at most one scheduled deadline. Starting it again
//! replaces the previous deadline and stopping is idempotent, so a stale
//! quick-scroll or auto-scroll callback can never outlive the state that
//! armed it. Time is passed in explicitly as milliseconds; the host decides
//! where the clock comes from.

/// A single cancellable timeout or interval.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerTask {
    name: &'static str,
    due: Option<f64>,
    period: Option<f64>,
}

impl TimerTask {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            due: None,
            period: None,
        }
    }

    /// Fire once, `delay` ms after `now`.
    pub fn start_timeout(&mut self, now: f64, delay: f64) {
        if self.is_active() {
            tracing::trace!(timer = self.name, "replacing timer");
        }
        self.due = Some(now + delay.max(0.0));
        self.period = None;
    }

    /// Fire every `period` ms, starting `period` ms after `now`.
    pub fn start_interval(&mut self, now: f64, period: f64) {
        if self.is_active() {
            tracing::trace!(timer = self.name, "replacing timer");
        }
        let period = period.max(1.0);
        self.due = Some(now + period);
        self.period = Some(period);
    }

    /// Cancel the task. Returns whether it was active.
    pub fn stop(&mut self) -> bool {
        let was_active = self.due.take().is_some();
        self.period = None;
        if was_active {
            tracing::trace!(timer = self.name, "timer stopped");
        }
        was_active
    }

    pub fn is_active(&self) -> bool {
        self.due.is_some()
    }

    pub fn due(&self) -> Option<f64> {
        self.due
    }

    /// Returns true when the task fired at `now`.
    ///
    /// An interval that fell behind fires once and re-arms a full period
    /// after `now`; missed ticks are dropped.
    pub fn poll(&mut self, now: f64) -> bool {
        let Some(due) = self.due else {
            return false;
        };
        if now < due {
            return false;
        }
        self.due = match self.period {
            Some(period) => {
                let next = due + period;
                Some(if next <= now { now + period } else { next })
            }
            None => None,
        };
        true
    }
}

/// Earliest deadline among `timers`.
pub fn next_due<'a, I>(timers: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a TimerTask>,
{
    timers
        .into_iter()
        .filter_map(TimerTask::due)
        .fold(None, |acc: Option<f64>, due| Some(acc.map_or(due, |a| a.min(due))))
}
