// MediAdmin - core/timer.rs
//
// Recurring refresh timer driven by the UI frame loop.
//
// The timer holds no thread: the owner polls it with the current instant
// each frame and asks it how long to sleep before the next repaint. A
// cancelled timer never fires again.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RefreshTimer {
    /// Create and arm a timer whose first tick is due one interval after `now`.
    pub fn start(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: Some(now + interval),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Disarm the timer.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Returns true if a tick is due at `now` and schedules the next one.
    ///
    /// Missed ticks are not replayed: after a long stall the timer fires once
    /// and the next tick is one full interval after `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, or None if disarmed.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let t0 = Instant::now();
        let interval = Duration::from_secs(100);
        let mut timer = RefreshTimer::start(interval, t0);

        assert!(!timer.poll(t0));
        assert!(!timer.poll(t0 + Duration::from_secs(99)));
        assert!(timer.poll(t0 + interval));
        assert!(!timer.poll(t0 + interval));
        assert!(timer.poll(t0 + interval * 2));
    }

    #[test]
    fn stalled_timer_does_not_burst() {
        let t0 = Instant::now();
        let interval = Duration::from_secs(10);
        let mut timer = RefreshTimer::start(interval, t0);

        let late = t0 + Duration::from_secs(55);
        assert!(timer.poll(late));
        assert!(!timer.poll(late + Duration::from_secs(1)));
        assert_eq!(timer.time_until_due(late), Some(interval));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let t0 = Instant::now();
        let mut timer = RefreshTimer::start(Duration::from_secs(1), t0);
        timer.cancel();
        assert!(!timer.is_armed());
        assert!(!timer.poll(t0 + Duration::from_secs(3600)));
        assert_eq!(timer.time_until_due(t0), None);
    }
}
