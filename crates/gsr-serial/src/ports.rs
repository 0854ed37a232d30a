//! Transport endpoint enumeration

use gsr_core::{GsrError, GsrResult};

/// List the names of the serial ports available on this machine,
/// for operator selection.
pub fn available_ports() -> GsrResult<Vec<String>> {
    let ports = serialport::available_ports().map_err(|e| GsrError::Transport {
        reason: e.to_string(),
    })?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
