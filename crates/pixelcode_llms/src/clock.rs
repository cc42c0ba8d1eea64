//! Time sources used to measure completion duration.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Monotonic time source. Readings are offsets from an arbitrary origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;

    /// Time elapsed since `start`, never negative.
    fn since(&self, start: Duration) -> Duration {
        self.now().saturating_sub(start)
    }
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that replays scripted readings, then keeps returning the last one.
#[derive(Debug, Default)]
pub struct ManualClock {
    readings: Mutex<VecDeque<Duration>>,
    last: Mutex<Duration>,
}

impl ManualClock {
    pub fn new(readings: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            readings: Mutex::new(readings.into_iter().collect()),
            last: Mutex::new(Duration::ZERO),
        }
    }

    /// Convenience constructor from seconds.
    pub fn from_secs_f64(readings: impl IntoIterator<Item = f64>) -> Self {
        Self::new(readings.into_iter().map(Duration::from_secs_f64))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let mut readings = self.readings.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = readings.pop_front() {
            *last = next;
        }
        *last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_replays_then_sticks() {
        let clock = ManualClock::from_secs_f64([100.0, 102.0]);
        assert_eq!(clock.now(), Duration::from_secs(100));
        assert_eq!(clock.now(), Duration::from_secs(102));
        assert_eq!(clock.now(), Duration::from_secs(102));
    }

    #[test]
    fn test_since_saturates() {
        let clock = ManualClock::from_secs_f64([5.0]);
        assert_eq!(clock.since(Duration::from_secs(10)), Duration::ZERO);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
