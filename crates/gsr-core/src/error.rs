//! Error handling for the GSR framework
//!
//! Transport misuse and configuration problems are surfaced as `GsrError`
//! values; protocol anomalies are not errors at all, they flow through the
//! event channel as `ControlSignal::Error`.

use std::fmt;

/// Result type alias for GSR framework operations
pub type GsrResult<T> = Result<T, GsrError>;

/// Error type for all GSR framework operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GsrError {
    /// The transport is already open
    AlreadyOpen,

    /// The transport is not open
    NotOpen,

    /// Transport-level fault (open failure, hard disconnect)
    Transport {
        /// Description of the transport fault
        reason: String,
    },

    /// Detach was requested for a subscriber that is not attached
    SubscriberNotFound,

    /// Reading length does not match the configured axis count
    AxisMismatch {
        /// Configured axis count
        expected: usize,
        /// Length of the offending reading
        actual: usize,
    },

    /// Unknown classifier kind requested
    UnknownClassifier {
        /// The requested kind
        name: String,
    },

    /// Dataset directory or file problem
    Dataset {
        /// Description of the dataset problem
        reason: String,
    },

    /// Sample or model (de)serialization failure
    Serialization {
        /// Description of the serialization problem
        reason: String,
    },
}

impl fmt::Display for GsrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GsrError::AlreadyOpen => {
                write!(f, "The transport is already open")
            }
            GsrError::NotOpen => {
                write!(f, "The transport is not open")
            }
            GsrError::Transport { reason } => {
                write!(f, "Transport error: {}", reason)
            }
            GsrError::SubscriberNotFound => {
                write!(f, "The subscriber is not attached")
            }
            GsrError::AxisMismatch { expected, actual } => {
                write!(f, "Axis mismatch: expected {} values, got {}",
                       expected, actual)
            }
            GsrError::UnknownClassifier { name } => {
                write!(f, "{} is not a valid classifier kind", name)
            }
            GsrError::Dataset { reason } => {
                write!(f, "Dataset error: {}", reason)
            }
            GsrError::Serialization { reason } => {
                write!(f, "Serialization error: {}", reason)
            }
        }
    }
}

impl std::error::Error for GsrError {}
