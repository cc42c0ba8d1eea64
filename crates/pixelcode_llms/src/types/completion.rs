//! Final completion result

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::clock::Clock;

/// Assembled response plus the wall-clock time it took.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    #[serde(serialize_with = "serialize_secs")]
    duration: Duration,
    text: String,
}

impl Completion {
    pub fn new(duration: Duration, text: impl Into<String>) -> Self {
        Self {
            duration,
            text: text.into(),
        }
    }

    /// Sample the end time on `clock` and build the result.
    pub fn measured(clock: &dyn Clock, started_at: Duration, text: impl Into<String>) -> Self {
        Self::new(clock.since(started_at), text)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_measured_uses_clock_difference() {
        let clock = ManualClock::from_secs_f64([11.5]);
        let completion = Completion::measured(&clock, Duration::from_secs(10), "O1 response");
        assert_eq!(completion.duration_secs(), 1.5);
        assert_eq!(completion.text(), "O1 response");
    }

    #[test]
    fn test_serializes_duration_as_seconds() {
        let completion = Completion::new(Duration::from_millis(2500), "<html></html>");
        let value = serde_json::to_value(&completion).unwrap();
        assert_eq!(value["duration"], 2.5);
        assert_eq!(value["text"], "<html></html>");
    }
}
