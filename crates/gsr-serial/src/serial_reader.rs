//! Serial transport variant of the data reader

use crate::cancel::CancelToken;
use crate::framing::LineFramer;
use crate::reader::{pump_lines, DataReader};
use gsr_core::{GsrError, GsrResult, HandlerHandle, SampleHandler, Subscribers};
use serde::{Deserialize, Serialize};
use serialport::SerialPort;
use std::time::Duration;
use tracing::info;

/// Configuration for a serial acquisition session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial port name, e.g. `/dev/ttyUSB0` or `COM6`
    pub port_name: String,
    /// Baud rate of the device link
    pub baud_rate: u32,
    /// Read timeout in milliseconds; an elapsed timeout surfaces as a
    /// TIMEOUT signal, not an error
    pub timeout_ms: u64,
    /// Number of sensor axes every data line must carry
    pub expected_axis: usize,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: 38_400,
            timeout_ms: 1_000,
            expected_axis: 6,
        }
    }
}

/// Data reader over a serial connection.
///
/// Exclusively owns its port handle; the blocking loop reads one line at a
/// time and broadcasts exactly one event per line to attached handlers.
pub struct SerialDataReader {
    config: SerialConfig,
    port: Option<LineFramer<Box<dyn SerialPort>>>,
    managers: Subscribers<dyn SampleHandler>,
    cancel: CancelToken,
}

impl SerialDataReader {
    /// Create a reader for the given session configuration
    pub fn new(config: SerialConfig) -> Self {
        SerialDataReader {
            config,
            port: None,
            managers: Subscribers::new(),
            cancel: CancelToken::new(),
        }
    }

    /// Convenience constructor with default baud rate, timeout and axis count
    pub fn for_port(port_name: &str) -> Self {
        Self::new(SerialConfig {
            port_name: port_name.to_string(),
            ..SerialConfig::default()
        })
    }

    /// The session configuration
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// Check if the transport is currently open
    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

impl DataReader for SerialDataReader {
    fn open(&mut self) -> GsrResult<()> {
        if self.port.is_some() {
            return Err(GsrError::AlreadyOpen);
        }

        let port = serialport::new(&self.config.port_name, self.config.baud_rate)
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .open()
            .map_err(|e| GsrError::Transport {
                reason: e.to_string(),
            })?;

        info!(
            port = %self.config.port_name,
            baud = self.config.baud_rate,
            "serial transport opened"
        );
        self.port = Some(LineFramer::new(port));
        Ok(())
    }

    fn close(&mut self) -> GsrResult<()> {
        if self.port.take().is_none() {
            return Err(GsrError::NotOpen);
        }
        info!(port = %self.config.port_name, "serial transport closed");
        Ok(())
    }

    fn attach_manager(&mut self, manager: HandlerHandle) {
        self.managers.attach(manager);
    }

    fn detach_manager(&mut self, manager: &HandlerHandle) -> GsrResult<()> {
        self.managers.detach(manager)
    }

    fn run(&mut self) -> GsrResult<()> {
        let expected_axis = self.config.expected_axis;
        let framer = self.port.as_mut().ok_or(GsrError::NotOpen)?;
        pump_lines(framer, &self.managers, expected_axis, &self.cancel)
    }

    fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_requires_open_transport() {
        let mut reader = SerialDataReader::for_port("/dev/null");
        assert_eq!(reader.run().unwrap_err(), GsrError::NotOpen);
    }

    #[test]
    fn test_close_without_open_fails() {
        let mut reader = SerialDataReader::for_port("/dev/null");
        assert_eq!(reader.close().unwrap_err(), GsrError::NotOpen);
        assert!(!reader.is_open());
    }

    #[test]
    fn test_open_nonexistent_port_is_transport_error() {
        let mut reader = SerialDataReader::for_port("/definitely/not/a/port");
        match reader.open() {
            Err(GsrError::Transport { .. }) => {}
            other => panic!("expected a transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_matches_device_defaults() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 38_400);
        assert_eq!(config.timeout_ms, 1_000);
        assert_eq!(config.expected_axis, 6);
    }
}
