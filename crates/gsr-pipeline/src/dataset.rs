//! Dataset persistence: one JSON file per sample
//!
//! Layout is `<root>/<gesture>/<sample id>.json`. On load, the directory
//! name is authoritative for the gesture label.

use gsr_core::{GsrError, GsrResult, Sample};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Directory used for samples that carry no gesture label
pub const UNLABELED_DIR: &str = "unlabeled";

/// Persist one sample under the dataset root, returning the file path
pub fn save_sample(sample: &Sample, root: &Path) -> GsrResult<PathBuf> {
    let label = sample.gesture.as_deref().unwrap_or(UNLABELED_DIR);
    let dir = root.join(label);
    fs::create_dir_all(&dir).map_err(|e| GsrError::Dataset {
        reason: format!("cannot create {}: {}", dir.display(), e),
    })?;

    let path = dir.join(format!("{}.json", sample.id));
    let file = File::create(&path).map_err(|e| GsrError::Dataset {
        reason: format!("cannot create {}: {}", path.display(), e),
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), sample).map_err(|e| {
        GsrError::Serialization {
            reason: e.to_string(),
        }
    })?;

    Ok(path)
}

/// Load every sample in the dataset, labeling each with the name of the
/// directory it was found in.
///
/// Files that fail to parse are skipped with a warning; a dataset with one
/// corrupt file is still usable.
pub fn load_samples(root: &Path) -> GsrResult<Vec<Sample>> {
    let entries = fs::read_dir(root).map_err(|e| GsrError::Dataset {
        reason: format!("cannot read {}: {}", root.display(), e),
    })?;

    let mut samples = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GsrError::Dataset {
            reason: e.to_string(),
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        let label = entry.file_name().to_string_lossy().into_owned();
        load_gesture_dir(&entry.path(), &label, &mut samples)?;
    }

    Ok(samples)
}

fn load_gesture_dir(dir: &Path, label: &str, samples: &mut Vec<Sample>) -> GsrResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| GsrError::Dataset {
        reason: format!("cannot read {}: {}", dir.display(), e),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| GsrError::Dataset {
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let file = File::open(&path).map_err(|e| GsrError::Dataset {
            reason: format!("cannot open {}: {}", path.display(), e),
        })?;
        match serde_json::from_reader::<_, Sample>(BufReader::new(file)) {
            Ok(sample) => samples.push(sample.relabel(label)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable sample");
            }
        }
    }

    Ok(())
}
