//! Data reader replaying an in-memory line script

use gsr_core::{GsrError, GsrResult, HandlerHandle, SampleHandler, Subscribers};
use gsr_serial::{pump_lines, CancelToken, DataReader, LineFramer};
use std::io::Cursor;

/// Data reader fed from a fixed list of wire lines.
///
/// Behaves exactly like the serial variant, including open/close
/// preconditions, but reads from memory. An empty script entry replays as a
/// blank wire line, which classifies as a TIMEOUT.
pub struct ScriptedDataReader {
    expected_axis: usize,
    script: Vec<String>,
    stream: Option<LineFramer<Cursor<Vec<u8>>>>,
    managers: Subscribers<dyn SampleHandler>,
    cancel: CancelToken,
}

impl ScriptedDataReader {
    /// Create a reader that will replay the given lines in order
    pub fn new(script: Vec<String>, expected_axis: usize) -> Self {
        ScriptedDataReader {
            expected_axis,
            script,
            stream: None,
            managers: Subscribers::new(),
            cancel: CancelToken::new(),
        }
    }

    /// Number of scripted lines
    pub fn script_len(&self) -> usize {
        self.script.len()
    }
}

impl DataReader for ScriptedDataReader {
    fn open(&mut self) -> GsrResult<()> {
        if self.stream.is_some() {
            return Err(GsrError::AlreadyOpen);
        }
        let mut wire = self.script.join("\r\n");
        wire.push_str("\r\n");
        self.stream = Some(LineFramer::new(Cursor::new(wire.into_bytes())));
        Ok(())
    }

    fn close(&mut self) -> GsrResult<()> {
        if self.stream.take().is_none() {
            return Err(GsrError::NotOpen);
        }
        Ok(())
    }

    fn attach_manager(&mut self, manager: HandlerHandle) {
        self.managers.attach(manager);
    }

    fn detach_manager(&mut self, manager: &HandlerHandle) -> GsrResult<()> {
        self.managers.detach(manager)
    }

    fn run(&mut self) -> GsrResult<()> {
        let expected_axis = self.expected_axis;
        let stream = self.stream.as_mut().ok_or(GsrError::NotOpen)?;
        pump_lines(stream, &self.managers, expected_axis, &self.cancel)
    }

    fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}
