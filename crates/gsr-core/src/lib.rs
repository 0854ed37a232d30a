//! GSR-Core: Foundation types for gesture sample recording
//!
//! Data model and role traits shared by the acquisition and pipeline crates.

pub mod error;
pub mod event;
pub mod roles;
pub mod sample;

pub use error::{GsrError, GsrResult};
pub use event::ControlSignal;
pub use roles::{
    HandlerHandle, ReceiverHandle, SampleHandler, SampleReceiver, Subscribers,
};
pub use sample::{DataVector, Sample};
