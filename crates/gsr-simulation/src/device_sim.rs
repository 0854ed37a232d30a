//! Synthetic gesture device
//!
//! Emits the same line protocol as the real sensing device: batches of
//! multi-axis readings built from per-axis sinusoids with Gaussian noise.

use crate::scripted_reader::ScriptedDataReader;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Configuration for the simulated device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Number of sensor axes per reading
    pub axis: usize,
    /// Readings emitted per batch
    pub frames_per_batch: usize,
    /// Number of batches in the generated session
    pub batches: usize,
    /// Peak amplitude of the underlying waveform
    pub amplitude: f64,
    /// Standard deviation of the additive Gaussian noise
    pub noise_std: f64,
    /// Seed for reproducible sessions; random when `None`
    pub seed: Option<u64>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            axis: 6,
            frames_per_batch: 40,
            batches: 1,
            amplitude: 1.0,
            noise_std: 0.05,
            seed: None,
        }
    }
}

/// Generates wire-protocol line scripts for gesture batches
pub struct GestureDeviceSimulator {
    config: DeviceConfig,
    rng: StdRng,
}

impl GestureDeviceSimulator {
    /// Create a simulator for the given configuration
    pub fn new(config: DeviceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        GestureDeviceSimulator { config, rng }
    }

    /// The device configuration
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Generate the full line script for one session
    pub fn script(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        for _ in 0..self.config.batches {
            lines.push("STARTING BATCH".to_string());
            for frame in 0..self.config.frames_per_batch {
                lines.push(self.data_line(frame));
            }
            lines.push("CLOSING BATCH".to_string());
        }
        lines
    }

    /// Consume the simulator, producing a reader that replays one session
    pub fn into_reader(mut self) -> ScriptedDataReader {
        let script = self.script();
        ScriptedDataReader::new(script, self.config.axis)
    }

    /// One `START .. END` data line: per-axis sinusoids plus noise
    fn data_line(&mut self, frame: usize) -> String {
        let total = self.config.frames_per_batch.max(1) as f64;
        let mut tokens = Vec::with_capacity(self.config.axis + 2);
        tokens.push("START".to_string());
        for axis_index in 0..self.config.axis {
            let phase = (axis_index + 1) as f64 * frame as f64 / total;
            let jitter: f64 = self.rng.sample(StandardNormal);
            let value = self.config.amplitude * (2.0 * std::f64::consts::PI * phase).sin()
                + jitter * self.config.noise_std;
            tokens.push(format!("{:.4}", value));
        }
        tokens.push("END".to_string());
        tokens.join(" ")
    }
}
