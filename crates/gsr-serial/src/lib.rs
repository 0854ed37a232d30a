//! GSR-Serial: Wire-protocol parsing and serial acquisition
//!
//! Decodes the line-oriented device protocol into typed events and drives
//! the blocking read-dispatch loop against a serial transport.

pub mod cancel;
pub mod framing;
pub mod ports;
pub mod protocol;
pub mod reader;
pub mod serial_reader;

pub use cancel::CancelToken;
pub use framing::{FramedLine, LineFramer};
pub use ports::available_ports;
pub use protocol::{classify_line, LineEvent};
pub use reader::{pump_lines, DataReader};
pub use serial_reader::{SerialConfig, SerialDataReader};
