//! Line framing over a timeout-capable byte stream
//!
//! Serial reads can time out mid-line; the framer keeps partial bytes
//! buffered across timeouts so a half-read line is never surfaced, and
//! reports the timeout itself as a distinct outcome.

use std::io::{ErrorKind, Read};

/// Outcome of one framed read
#[derive(Debug, Clone, PartialEq)]
pub enum FramedLine {
    /// One complete line, terminators stripped
    Line(String),
    /// The read timed out with no complete line available
    TimedOut,
    /// The stream ended
    Eof,
}

/// Accumulates bytes from a reader and yields complete lines.
pub struct LineFramer<R> {
    inner: R,
    pending: Vec<u8>,
}

impl<R: Read> LineFramer<R> {
    /// Wrap a byte stream
    pub fn new(inner: R) -> Self {
        LineFramer {
            inner,
            pending: Vec::new(),
        }
    }

    /// Access the underlying stream
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutable access to the underlying stream
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Read until one complete line is available, the read times out, or
    /// the stream ends.
    ///
    /// Trailing `\n` and `\r` are stripped. A timeout keeps any partial
    /// bytes buffered for the next call. At end of stream, buffered bytes
    /// without a terminator are flushed as a final line.
    pub fn next_line(&mut self) -> std::io::Result<FramedLine> {
        loop {
            if let Some(line) = self.take_buffered_line() {
                return Ok(FramedLine::Line(line));
            }

            let mut buf = [0u8; 256];
            match self.inner.read(&mut buf) {
                Ok(0) => {
                    if self.pending.is_empty() {
                        return Ok(FramedLine::Eof);
                    }
                    let rest = std::mem::take(&mut self.pending);
                    return Ok(FramedLine::Line(Self::decode(rest)));
                }
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::TimedOut
                    || e.kind() == ErrorKind::WouldBlock =>
                {
                    return Ok(FramedLine::TimedOut);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Pop one complete line off the pending buffer, if present
    fn take_buffered_line(&mut self) -> Option<String> {
        let pos = self.pending.iter().position(|&b| b == b'\n')?;
        let raw: Vec<u8> = self.pending.drain(..=pos).collect();
        Some(Self::decode(raw))
    }

    /// Decode raw line bytes, stripping trailing terminators
    fn decode(mut raw: Vec<u8>) -> String {
        if raw.last() == Some(&b'\n') {
            raw.pop();
        }
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        String::from_utf8_lossy(&raw).into_owned()
    }
}
