//! DataVector and Sample: the units of gesture data

use crate::error::{GsrError, GsrResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One multi-axis sensor reading.
///
/// A `DataVector` can only be constructed with exactly the configured number
/// of axis values; a reading with the wrong length never becomes a
/// `DataVector` (the parser degrades it to `ControlSignal::Error` instead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataVector {
    values: Vec<f64>,
}

impl DataVector {
    /// Create a new reading, validating its length against the axis count
    pub fn new(values: Vec<f64>, expected_axis: usize) -> GsrResult<Self> {
        if values.len() != expected_axis {
            return Err(GsrError::AxisMismatch {
                expected: expected_axis,
                actual: values.len(),
            });
        }
        Ok(DataVector { values })
    }

    /// Number of axis values in this reading
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the reading is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw axis values, in wire order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consume the reading, yielding its values
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl AsRef<[f64]> for DataVector {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// A finished, ordered collection of readings belonging to one batch.
///
/// Immutable once constructed; the sample manager owns it exclusively until
/// hand-off, after which receivers only ever see it by shared reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unique identifier for this sample
    pub id: Uuid,
    /// Gesture label, if the sample was recorded under one
    pub gesture: Option<String>,
    /// Axis count every frame in this sample satisfies
    pub axis: usize,
    /// Ordered readings collected between START and STOP
    pub frames: Vec<DataVector>,
    /// Creation timestamp, milliseconds since the Unix epoch
    pub recorded_at: u64,
}

impl Sample {
    /// Create a new sample from buffered frames, validating every frame
    /// against the axis count
    pub fn new(
        frames: Vec<DataVector>,
        axis: usize,
        gesture: Option<String>,
    ) -> GsrResult<Self> {
        for frame in &frames {
            if frame.len() != axis {
                return Err(GsrError::AxisMismatch {
                    expected: axis,
                    actual: frame.len(),
                });
            }
        }

        Ok(Sample {
            id: Uuid::new_v4(),
            gesture,
            axis,
            frames,
            recorded_at: now_millis(),
        })
    }

    /// Number of frames in the sample
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Check if the sample holds no frames (an empty batch)
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get the time series of a single axis across all frames
    pub fn axis_series(&self, axis_index: usize) -> GsrResult<Vec<f64>> {
        if axis_index >= self.axis {
            return Err(GsrError::AxisMismatch {
                expected: self.axis,
                actual: axis_index,
            });
        }
        Ok(self.frames.iter().map(|f| f.values()[axis_index]).collect())
    }

    /// Flatten all frames into one row-major vector (frame 0 first)
    pub fn to_flat_vec(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.frames.len() * self.axis);
        for frame in &self.frames {
            flat.extend_from_slice(frame.values());
        }
        flat
    }

    /// Return a copy of this sample carrying a different gesture label
    pub fn relabel(&self, gesture: &str) -> Sample {
        Sample {
            gesture: Some(gesture.to_string()),
            ..self.clone()
        }
    }
}

/// Milliseconds since the Unix epoch
fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_vector_length_guard() {
        let ok = DataVector::new(vec![1.0, 2.0, 3.0], 3);
        assert!(ok.is_ok());

        let err = DataVector::new(vec![1.0, 2.0], 3);
        assert_eq!(
            err.unwrap_err(),
            GsrError::AxisMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_sample_creation() {
        let frames = vec![
            DataVector::new(vec![1.0, 2.0], 2).unwrap(),
            DataVector::new(vec![3.0, 4.0], 2).unwrap(),
        ];
        let sample = Sample::new(frames, 2, Some("wave".to_string())).unwrap();

        assert_eq!(sample.frame_count(), 2);
        assert_eq!(sample.axis, 2);
        assert_eq!(sample.gesture.as_deref(), Some("wave"));
        assert!(sample.recorded_at > 0);
    }

    #[test]
    fn test_sample_rejects_mismatched_frame() {
        let frames = vec![DataVector::new(vec![1.0, 2.0, 3.0], 3).unwrap()];
        let result = Sample::new(frames, 2, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_axis_series_and_flatten() {
        let frames = vec![
            DataVector::new(vec![1.0, 10.0], 2).unwrap(),
            DataVector::new(vec![2.0, 20.0], 2).unwrap(),
            DataVector::new(vec![3.0, 30.0], 2).unwrap(),
        ];
        let sample = Sample::new(frames, 2, None).unwrap();

        assert_eq!(sample.axis_series(0).unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(sample.axis_series(1).unwrap(), vec![10.0, 20.0, 30.0]);
        assert!(sample.axis_series(2).is_err());

        assert_eq!(
            sample.to_flat_vec(),
            vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0]
        );
    }

    #[test]
    fn test_relabel_preserves_frames() {
        let frames = vec![DataVector::new(vec![0.5], 1).unwrap()];
        let sample = Sample::new(frames, 1, None).unwrap();
        let relabeled = sample.relabel("circle");

        assert_eq!(relabeled.gesture.as_deref(), Some("circle"));
        assert_eq!(relabeled.frames, sample.frames);
        assert_eq!(relabeled.id, sample.id);
    }

    #[test]
    fn test_sample_json_round_trip() {
        let frames = vec![DataVector::new(vec![1.5, -2.5], 2).unwrap()];
        let sample = Sample::new(frames, 2, Some("swipe".to_string())).unwrap();

        let json = serde_json::to_string(&sample).unwrap();
        let back: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }
}
