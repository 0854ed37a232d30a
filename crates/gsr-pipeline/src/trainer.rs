//! Model training: nearest-centroid gesture classifier
//!
//! Samples vary in length, so each one is resampled onto a fixed grid of
//! frames before training or prediction. The model stores one centroid
//! feature vector per gesture; prediction picks the nearest centroid by
//! Euclidean distance.

use crate::dataset::load_samples;
use gsr_core::{GsrError, GsrResult, Sample};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Number of frames every sample is resampled to before featurization
pub const FEATURE_FRAMES: usize = 32;

/// Supported classifier kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierKind {
    /// Nearest-centroid over resampled frames
    Centroid,
}

impl FromStr for ClassifierKind {
    type Err = GsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "centroid" => Ok(ClassifierKind::Centroid),
            other => Err(GsrError::UnknownClassifier {
                name: other.to_string(),
            }),
        }
    }
}

/// One trained gesture centroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureCentroid {
    /// Gesture label
    pub gesture: String,
    /// Mean feature vector, `FEATURE_FRAMES * axis` long
    pub features: Vec<f64>,
}

/// Persisted nearest-centroid classifier model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidModel {
    /// Axis count the model was trained for
    pub axis: usize,
    /// Resampling grid length used at train time
    pub frames: usize,
    /// One centroid per gesture, sorted by label
    pub centroids: Vec<GestureCentroid>,
}

impl CentroidModel {
    /// Train a model from labeled samples.
    ///
    /// Unlabeled or empty samples are skipped with a warning. Fails with a
    /// dataset error if nothing trainable remains.
    pub fn train(samples: &[Sample], axis: usize) -> GsrResult<Self> {
        let mut grouped: BTreeMap<String, Vec<Vec<f64>>> = BTreeMap::new();

        for sample in samples {
            let label = match sample.gesture.as_deref() {
                Some(label) => label,
                None => {
                    warn!("skipping unlabeled sample");
                    continue;
                }
            };
            if sample.is_empty() {
                warn!(gesture = label, "skipping empty sample");
                continue;
            }
            if sample.axis != axis {
                warn!(
                    gesture = label,
                    sample_axis = sample.axis,
                    "skipping sample with foreign axis count"
                );
                continue;
            }
            grouped
                .entry(label.to_string())
                .or_default()
                .push(resample_features(sample, FEATURE_FRAMES));
        }

        if grouped.is_empty() {
            return Err(GsrError::Dataset {
                reason: "no labeled, non-empty samples to train on".to_string(),
            });
        }

        let centroids = grouped
            .into_iter()
            .map(|(gesture, features)| GestureCentroid {
                gesture,
                features: mean_vector(&features),
            })
            .collect();

        Ok(CentroidModel {
            axis,
            frames: FEATURE_FRAMES,
            centroids,
        })
    }

    /// Predict the gesture of a sample, returning the label and distance.
    ///
    /// Returns `None` for empty samples or samples with a foreign axis
    /// count.
    pub fn predict(&self, sample: &Sample) -> Option<(&str, f64)> {
        if sample.is_empty() || sample.axis != self.axis {
            return None;
        }
        let features = resample_features(sample, self.frames);

        let mut best: Option<(&str, f64)> = None;
        for centroid in &self.centroids {
            let distance = euclidean(&features, &centroid.features);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((centroid.gesture.as_str(), distance)),
            }
        }
        best
    }

    /// Persist the model as JSON
    pub fn save(&self, path: &Path) -> GsrResult<()> {
        let file = File::create(path).map_err(|e| GsrError::Dataset {
            reason: format!("cannot create {}: {}", path.display(), e),
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            GsrError::Serialization {
                reason: e.to_string(),
            }
        })
    }

    /// Load a previously persisted model
    pub fn load(path: &Path) -> GsrResult<Self> {
        let file = File::open(path).map_err(|e| GsrError::Dataset {
            reason: format!("cannot open {}: {}", path.display(), e),
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| GsrError::Serialization {
            reason: e.to_string(),
        })
    }
}

/// Train from a dataset directory and persist the model.
pub fn train_model(
    dataset_dir: &Path,
    kind: ClassifierKind,
    axis: usize,
    output: &Path,
) -> GsrResult<CentroidModel> {
    let ClassifierKind::Centroid = kind;

    let samples = load_samples(dataset_dir)?;
    info!(samples = samples.len(), "dataset loaded");

    let model = CentroidModel::train(&samples, axis)?;
    model.save(output)?;
    info!(
        gestures = model.centroids.len(),
        output = %output.display(),
        "model trained"
    );
    Ok(model)
}

/// Resample a sample onto `frames` evenly spaced frames, flattened
/// row-major.
///
/// Linear interpolation per axis; a single-frame sample is replicated.
fn resample_features(sample: &Sample, frames: usize) -> Vec<f64> {
    let source = &sample.frames;
    let n = source.len();
    let mut features = Vec::with_capacity(frames * sample.axis);

    for target in 0..frames {
        let position = if frames > 1 {
            target as f64 * (n - 1) as f64 / (frames - 1) as f64
        } else {
            0.0
        };
        let lower = position.floor() as usize;
        let upper = position.ceil() as usize;
        let fraction = position - lower as f64;

        for axis_index in 0..sample.axis {
            let a = source[lower].values()[axis_index];
            let b = source[upper.min(n - 1)].values()[axis_index];
            features.push(a + (b - a) * fraction);
        }
    }

    features
}

/// Element-wise mean of equally long vectors
fn mean_vector(vectors: &[Vec<f64>]) -> Vec<f64> {
    let len = vectors.first().map(Vec::len).unwrap_or(0);
    let mut mean = vec![0.0; len];
    for vector in vectors {
        for (slot, value) in mean.iter_mut().zip(vector) {
            *slot += value;
        }
    }
    let count = vectors.len() as f64;
    for slot in &mut mean {
        *slot /= count;
    }
    mean
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
