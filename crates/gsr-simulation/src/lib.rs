//! GSR-Simulation: Synthetic gesture device
//!
//! Generates protocol-correct line streams for development and testing,
//! and a data reader that replays them without hardware.

pub mod device_sim;
pub mod scripted_reader;

pub use device_sim::{DeviceConfig, GestureDeviceSimulator};
pub use scripted_reader::ScriptedDataReader;
