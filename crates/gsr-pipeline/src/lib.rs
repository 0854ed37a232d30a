//! GSR-Pipeline: Sample assembly and consumption
//!
//! Turns the raw event stream into finished samples and fans them out to
//! receivers: dataset writers, classifier feeders, in-memory collectors.

pub mod dataset;
pub mod manager;
pub mod receivers;
pub mod trainer;

pub use dataset::{load_samples, save_sample};
pub use manager::{BatchSampleManager, ManagerState};
pub use receivers::{ClassifierReceiver, FileSampleReceiver, MemorySampleReceiver};
pub use trainer::{train_model, CentroidModel, ClassifierKind, FEATURE_FRAMES};
