//! Batch sample manager: the buffering state machine
//!
//! Converts the event stream into `Sample`s. One batch runs from START to
//! STOP; everything buffered in between becomes exactly one sample.
//!
//! Policy decisions, applied consistently and covered by tests:
//! - TIMEOUT never terminates a batch; transport idle is not a batch
//!   boundary, so the state and buffer are left untouched.
//! - A data vector arriving outside a batch (IDLE) is dropped with a
//!   diagnostic, never buffered speculatively.
//! - ERROR aborts the batch silently: buffer discarded, no sample emitted,
//!   back to IDLE. Operator visibility is the caller's concern.
//! - STOP always packages, even right after an error: the device closed a
//!   batch, so the batch exists with whatever survived. An errored batch
//!   therefore closes as a sample with zero readings.

use gsr_core::{
    ControlSignal, DataVector, GsrResult, ReceiverHandle, Sample, SampleHandler,
    SampleReceiver, Subscribers,
};
use tracing::{debug, info};

/// Buffering state of a sample manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    /// No batch in progress
    Idle,
    /// A batch is open and the buffer is accumulating readings
    Collecting,
}

/// Sample manager packaging one sample per START/STOP batch.
///
/// Partially buffered data is never visible outside the manager; receivers
/// only ever see completed, immutable samples.
pub struct BatchSampleManager {
    axis: usize,
    gesture: Option<String>,
    state: ManagerState,
    buffer: Vec<DataVector>,
    receivers: Subscribers<dyn SampleReceiver>,
}

impl BatchSampleManager {
    /// Create a manager for unlabeled samples
    pub fn new(axis: usize) -> Self {
        BatchSampleManager {
            axis,
            gesture: None,
            state: ManagerState::Idle,
            buffer: Vec::new(),
            receivers: Subscribers::new(),
        }
    }

    /// Create a manager that labels every packaged sample with a gesture
    pub fn with_gesture(axis: usize, gesture: &str) -> Self {
        BatchSampleManager {
            gesture: Some(gesture.to_string()),
            ..Self::new(axis)
        }
    }

    /// Change the gesture label applied to subsequently packaged samples
    pub fn set_gesture(&mut self, gesture: Option<String>) {
        self.gesture = gesture;
    }

    /// Current state of the batch state machine
    pub fn state(&self) -> ManagerState {
        self.state
    }

    /// Number of readings buffered for the batch in progress
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Attach a receiver at the end of the dispatch order
    pub fn attach_receiver(&mut self, receiver: ReceiverHandle) {
        self.receivers.attach(receiver);
    }

    /// Detach a previously attached receiver.
    ///
    /// Fails with `GsrError::SubscriberNotFound` if not attached.
    pub fn detach_receiver(&mut self, receiver: &ReceiverHandle) -> GsrResult<()> {
        self.receivers.detach(receiver)
    }

    /// Package the current buffer into a sample.
    ///
    /// Pure construction: the buffer is left untouched; only the STOP
    /// transition clears it.
    pub fn package_sample(&self) -> GsrResult<Sample> {
        Sample::new(self.buffer.clone(), self.axis, self.gesture.clone())
    }

    /// Package the buffer and hand the finished sample to every receiver
    fn close_batch(&mut self) {
        match self.package_sample() {
            Ok(sample) => {
                info!(
                    frames = sample.frame_count(),
                    gesture = sample.gesture.as_deref().unwrap_or("-"),
                    "batch packaged"
                );
                self.receivers.for_each(|r| r.receive_sample(&sample));
            }
            Err(e) => {
                // A frame with the wrong axis count can never reach the
                // buffer, so packaging only fails if that invariant broke.
                debug!(error = %e, "dropping unpackageable batch");
            }
        }
        self.buffer.clear();
        self.state = ManagerState::Idle;
    }
}

impl SampleHandler for BatchSampleManager {
    fn receive_data(&mut self, data: DataVector) {
        match self.state {
            ManagerState::Collecting => self.buffer.push(data),
            ManagerState::Idle => {
                debug!("data vector outside a batch, dropped");
            }
        }
    }

    fn receive_signal(&mut self, signal: ControlSignal) {
        match signal {
            ControlSignal::Start => {
                self.buffer.clear();
                self.state = ManagerState::Collecting;
            }
            ControlSignal::Stop => self.close_batch(),
            ControlSignal::Error => {
                if self.state == ManagerState::Collecting {
                    debug!(discarded = self.buffer.len(), "batch aborted by error");
                }
                self.buffer.clear();
                self.state = ManagerState::Idle;
            }
            ControlSignal::Timeout => {
                // Transport idle; not a batch boundary.
            }
        }
    }
}
