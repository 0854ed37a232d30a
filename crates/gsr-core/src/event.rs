//! Out-of-band control signals delimiting batches of readings

use serde::{Deserialize, Serialize};

/// Control signal dispatched by a data reader alongside sensor readings.
///
/// Signals carry no payload; they delimit and qualify batches of
/// `DataVector` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlSignal {
    /// A batch of readings is starting
    Start,
    /// The current batch is complete
    Stop,
    /// A line could not be classified; recoverable, never fatal
    Error,
    /// The transport was idle beyond its read timeout; expected between gestures
    Timeout,
}

impl std::fmt::Display for ControlSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlSignal::Start => write!(f, "START"),
            ControlSignal::Stop => write!(f, "STOP"),
            ControlSignal::Error => write!(f, "ERROR"),
            ControlSignal::Timeout => write!(f, "TIMEOUT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_display() {
        assert_eq!(ControlSignal::Start.to_string(), "START");
        assert_eq!(ControlSignal::Timeout.to_string(), "TIMEOUT");
    }

    #[test]
    fn test_signal_is_copy() {
        let signal = ControlSignal::Stop;
        let copy = signal;
        assert_eq!(signal, copy);
    }
}
