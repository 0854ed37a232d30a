//! Line classifier for the device wire protocol
//!
//! The device speaks a line-oriented text protocol:
//!
//! ```text
//! STARTING BATCH                 -> START
//! CLOSING BATCH                  -> STOP
//! START v1 v2 ... vN END         -> DATA(v1..vN), only if N == expected_axis
//! <empty line>                   -> TIMEOUT
//! <anything else>                -> ERROR
//! ```
//!
//! Classification never fails: a line that cannot be understood degrades to
//! `ControlSignal::Error` so a single noisy line cannot end an acquisition
//! session.

use gsr_core::{ControlSignal, DataVector};

/// Marker line opening a batch
pub const BATCH_START_MARKER: &str = "STARTING BATCH";

/// Marker line closing a batch
pub const BATCH_CLOSE_MARKER: &str = "CLOSING BATCH";

/// Prefix of a data line
pub const DATA_PREFIX: &str = "START";

/// Suffix of a data line
pub const DATA_SUFFIX: &str = "END";

/// Typed outcome of classifying one wire line
#[derive(Debug, Clone, PartialEq)]
pub enum LineEvent {
    /// The line carried a valid multi-axis reading
    Data(DataVector),
    /// The line carried (or degraded to) a control signal
    Signal(ControlSignal),
}

/// Classify one line, terminators already stripped.
///
/// Rules are applied in priority order; the batch markers win over the
/// data-line shape, and the empty line is only checked after the data shape
/// so that classification order matches the wire contract.
pub fn classify_line(line: &str, expected_axis: usize) -> LineEvent {
    if line == BATCH_START_MARKER {
        return LineEvent::Signal(ControlSignal::Start);
    }
    if line == BATCH_CLOSE_MARKER {
        return LineEvent::Signal(ControlSignal::Stop);
    }
    if line.starts_with(DATA_PREFIX) && line.ends_with(DATA_SUFFIX) {
        return classify_data_line(line, expected_axis);
    }
    if line.is_empty() {
        return LineEvent::Signal(ControlSignal::Timeout);
    }
    LineEvent::Signal(ControlSignal::Error)
}

/// Parse a `START v1 .. vN END` line into a reading.
///
/// A wrong token count or any token that fails strict float parsing
/// degrades the whole line to an ERROR signal; no partial reading is ever
/// produced.
fn classify_data_line(line: &str, expected_axis: usize) -> LineEvent {
    let tokens: Vec<&str> = line.split(' ').collect();
    if tokens.len() != expected_axis + 2 {
        return LineEvent::Signal(ControlSignal::Error);
    }

    let mut values = Vec::with_capacity(expected_axis);
    for token in &tokens[1..tokens.len() - 1] {
        match token.parse::<f64>() {
            Ok(value) => values.push(value),
            Err(_) => return LineEvent::Signal(ControlSignal::Error),
        }
    }

    match DataVector::new(values, expected_axis) {
        Ok(vector) => LineEvent::Data(vector),
        Err(_) => LineEvent::Signal(ControlSignal::Error),
    }
}
