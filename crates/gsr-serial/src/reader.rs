//! Data reader contract and the shared read-dispatch loop

use crate::cancel::CancelToken;
use crate::framing::{FramedLine, LineFramer};
use crate::protocol::{classify_line, LineEvent};
use gsr_core::{ControlSignal, GsrError, GsrResult, HandlerHandle, SampleHandler, Subscribers};
use std::io::Read;
use tracing::{debug, trace};

/// A source of sensor events.
///
/// Owns one transport exclusively, decodes its byte stream into data and
/// signal events and broadcasts them to attached handlers. Knows nothing
/// about sample semantics.
pub trait DataReader {
    /// Acquire the transport resource.
    ///
    /// Fails with `GsrError::AlreadyOpen` if already open.
    fn open(&mut self) -> GsrResult<()>;

    /// Release the transport resource.
    ///
    /// Fails with `GsrError::NotOpen` if not open. Afterwards the reader
    /// holds no transport handle.
    fn close(&mut self) -> GsrResult<()>;

    /// Attach a handler at the end of the dispatch order
    fn attach_manager(&mut self, manager: HandlerHandle);

    /// Detach a previously attached handler.
    ///
    /// Fails with `GsrError::SubscriberNotFound` if not attached.
    fn detach_manager(&mut self, manager: &HandlerHandle) -> GsrResult<()>;

    /// Block the calling thread, reading and dispatching events until the
    /// stream ends, a transport fault occurs, or the cancel token fires.
    ///
    /// Not reentrant; must not run concurrently with itself on one reader.
    fn run(&mut self) -> GsrResult<()>;

    /// Token that stops the running loop from another thread
    fn cancel_token(&self) -> CancelToken;
}

/// Drive the read-classify-dispatch cycle over a framed byte stream.
///
/// Shared by every reader variant. Each complete line produces exactly one
/// event; a read timeout produces a TIMEOUT signal. Dispatch is synchronous,
/// so the loop only advances once every handler has returned. The loop ends
/// on end-of-stream, cancellation, or a hard transport fault.
pub fn pump_lines<R: Read>(
    framer: &mut LineFramer<R>,
    managers: &Subscribers<dyn SampleHandler>,
    expected_axis: usize,
    cancel: &CancelToken,
) -> GsrResult<()> {
    while !cancel.is_cancelled() {
        match framer.next_line().map_err(|e| GsrError::Transport {
            reason: e.to_string(),
        })? {
            FramedLine::TimedOut => {
                managers.for_each(|m| m.receive_signal(ControlSignal::Timeout));
            }
            FramedLine::Eof => {
                debug!("transport stream ended");
                break;
            }
            FramedLine::Line(line) => {
                trace!(%line, "received line");
                match classify_line(&line, expected_axis) {
                    LineEvent::Data(vector) => {
                        managers.for_each(|m| m.receive_data(vector.clone()));
                    }
                    LineEvent::Signal(signal) => {
                        managers.for_each(|m| m.receive_signal(signal));
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsr_core::DataVector;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    /// Records every event it sees, in order
    pub(crate) struct EventLog {
        pub events: Vec<LoggedEvent>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum LoggedEvent {
        Data(Vec<f64>),
        Signal(ControlSignal),
    }

    impl SampleHandler for EventLog {
        fn receive_data(&mut self, data: DataVector) {
            self.events.push(LoggedEvent::Data(data.into_values()));
        }

        fn receive_signal(&mut self, signal: ControlSignal) {
            self.events.push(LoggedEvent::Signal(signal));
        }
    }

    fn framer_for(lines: &[&str]) -> LineFramer<Cursor<Vec<u8>>> {
        let mut joined = lines.join("\r\n");
        joined.push_str("\r\n");
        LineFramer::new(Cursor::new(joined.into_bytes()))
    }

    #[test]
    fn test_pump_dispatches_one_event_per_line() {
        let mut framer = framer_for(&[
            "STARTING BATCH",
            "START 1.0 2.0 3.0 4.0 5.0 6.0 END",
            "CLOSING BATCH",
        ]);
        let log = Arc::new(Mutex::new(EventLog { events: Vec::new() }));
        let mut managers: Subscribers<dyn SampleHandler> = Subscribers::new();
        managers.attach(log.clone());

        pump_lines(&mut framer, &managers, 6, &CancelToken::new()).unwrap();

        let events = &log.lock().unwrap().events;
        assert_eq!(
            *events,
            vec![
                LoggedEvent::Signal(ControlSignal::Start),
                LoggedEvent::Data(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
                LoggedEvent::Signal(ControlSignal::Stop),
            ]
        );
    }

    #[test]
    fn test_pump_degrades_noise_to_error_and_continues() {
        let mut framer = framer_for(&["garbage", ""]);
        let log = Arc::new(Mutex::new(EventLog { events: Vec::new() }));
        let mut managers: Subscribers<dyn SampleHandler> = Subscribers::new();
        managers.attach(log.clone());

        pump_lines(&mut framer, &managers, 6, &CancelToken::new()).unwrap();

        let events = &log.lock().unwrap().events;
        assert_eq!(
            *events,
            vec![
                LoggedEvent::Signal(ControlSignal::Error),
                LoggedEvent::Signal(ControlSignal::Timeout),
            ]
        );
    }

    #[test]
    fn test_pump_stops_when_cancelled() {
        let mut framer = framer_for(&["STARTING BATCH", "CLOSING BATCH"]);
        let log = Arc::new(Mutex::new(EventLog { events: Vec::new() }));
        let mut managers: Subscribers<dyn SampleHandler> = Subscribers::new();
        managers.attach(log.clone());

        let cancel = CancelToken::new();
        cancel.cancel();
        pump_lines(&mut framer, &managers, 6, &cancel).unwrap();

        assert!(log.lock().unwrap().events.is_empty());
    }

    #[test]
    fn test_pump_broadcasts_to_all_managers() {
        let mut framer = framer_for(&["STARTING BATCH"]);
        let first = Arc::new(Mutex::new(EventLog { events: Vec::new() }));
        let second = Arc::new(Mutex::new(EventLog { events: Vec::new() }));
        let mut managers: Subscribers<dyn SampleHandler> = Subscribers::new();
        managers.attach(first.clone());
        managers.attach(second.clone());

        pump_lines(&mut framer, &managers, 6, &CancelToken::new()).unwrap();

        for log in [&first, &second] {
            assert_eq!(
                log.lock().unwrap().events,
                vec![LoggedEvent::Signal(ControlSignal::Start)]
            );
        }
    }
}
