//! Concrete sample receivers
//!
//! Receivers are terminal consumers; their own failures (disk full, missing
//! model) are logged, never propagated back into the dispatch path.

use crate::dataset::save_sample;
use crate::trainer::CentroidModel;
use gsr_core::{Sample, SampleReceiver};
use std::path::PathBuf;
use tracing::{error, info};

/// Writes every received sample as a JSON file under a dataset directory.
///
/// Files land at `<root>/<gesture>/<sample id>.json`; unlabeled samples go
/// under `unlabeled/`.
pub struct FileSampleReceiver {
    root: PathBuf,
}

impl FileSampleReceiver {
    /// Create a receiver persisting into the given dataset root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSampleReceiver { root: root.into() }
    }

    /// The dataset root this receiver writes to
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl SampleReceiver for FileSampleReceiver {
    fn receive_sample(&mut self, sample: &Sample) {
        match save_sample(sample, &self.root) {
            Ok(path) => info!(path = %path.display(), "sample saved"),
            Err(e) => error!(error = %e, "failed to save sample"),
        }
    }
}

/// Feeds every received sample to a classifier and logs the prediction.
pub struct ClassifierReceiver {
    model: CentroidModel,
    last_prediction: Option<String>,
}

impl ClassifierReceiver {
    /// Create a receiver predicting with the given model
    pub fn new(model: CentroidModel) -> Self {
        ClassifierReceiver {
            model,
            last_prediction: None,
        }
    }

    /// The most recent prediction, if any sample has been classified yet
    pub fn last_prediction(&self) -> Option<&str> {
        self.last_prediction.as_deref()
    }
}

impl SampleReceiver for ClassifierReceiver {
    fn receive_sample(&mut self, sample: &Sample) {
        match self.model.predict(sample) {
            Some((gesture, distance)) => {
                info!(gesture = %gesture, distance, "gesture recognized");
                self.last_prediction = Some(gesture.to_string());
            }
            None => {
                info!("sample could not be classified");
                self.last_prediction = None;
            }
        }
    }
}

/// Collects received samples in memory; useful for tests and demos.
#[derive(Default)]
pub struct MemorySampleReceiver {
    /// Every sample received, in arrival order
    pub samples: Vec<Sample>,
}

impl MemorySampleReceiver {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }
}

impl SampleReceiver for MemorySampleReceiver {
    fn receive_sample(&mut self, sample: &Sample) {
        self.samples.push(sample.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsr_core::DataVector;

    fn sample(gesture: Option<&str>) -> Sample {
        let frames = vec![DataVector::new(vec![1.0, 2.0], 2).unwrap()];
        Sample::new(frames, 2, gesture.map(str::to_string)).unwrap()
    }

    #[test]
    fn test_file_receiver_writes_under_gesture_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut receiver = FileSampleReceiver::new(dir.path());

        receiver.receive_sample(&sample(Some("wave")));

        let written: Vec<_> = std::fs::read_dir(dir.path().join("wave"))
            .unwrap()
            .collect();
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn test_file_receiver_uses_unlabeled_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut receiver = FileSampleReceiver::new(dir.path());

        receiver.receive_sample(&sample(None));

        assert!(dir.path().join("unlabeled").is_dir());
    }

    #[test]
    fn test_memory_receiver_collects_in_order() {
        let mut receiver = MemorySampleReceiver::new();
        let first = sample(Some("a"));
        let second = sample(Some("b"));

        receiver.receive_sample(&first);
        receiver.receive_sample(&second);

        assert_eq!(receiver.samples, vec![first, second]);
    }
}
