//! Role traits and subscriber plumbing
//!
//! The three roles of the pipeline are expressed as traits: a data reader
//! pushes events into `SampleHandler`s, a sample manager pushes finished
//! samples into `SampleReceiver`s. Publishers hold shared handles to their
//! subscribers; dispatch is synchronous and follows attachment order.

use crate::error::{GsrError, GsrResult};
use crate::event::ControlSignal;
use crate::sample::{DataVector, Sample};
use std::sync::{Arc, Mutex, PoisonError};

/// Consumer of the raw event stream produced by a data reader.
///
/// Implemented by sample managers. The two entry points are only ever
/// invoked through reader dispatch, never directly by application code.
pub trait SampleHandler: Send {
    /// A validated sensor reading arrived
    fn receive_data(&mut self, data: DataVector);

    /// An out-of-band control signal arrived
    fn receive_signal(&mut self, signal: ControlSignal);
}

/// Terminal consumer of finished samples.
///
/// A concrete receiver may fail internally (e.g. a file writer); that is its
/// own concern and must not propagate back into the dispatch path.
pub trait SampleReceiver: Send {
    /// A completed, immutable sample was packaged
    fn receive_sample(&mut self, sample: &Sample);
}

/// Shared handle to an attached sample handler
pub type HandlerHandle = Arc<Mutex<dyn SampleHandler>>;

/// Shared handle to an attached sample receiver
pub type ReceiverHandle = Arc<Mutex<dyn SampleReceiver>>;

/// Ordered list of subscriber handles.
///
/// Attachment order is dispatch order. Detaching compares handle identity
/// (`Arc::ptr_eq`), so the caller must detach with a clone of the handle it
/// attached.
pub struct Subscribers<T: ?Sized> {
    entries: Vec<Arc<Mutex<T>>>,
}

impl<T: ?Sized> Subscribers<T> {
    /// Create an empty subscriber list
    pub fn new() -> Self {
        Subscribers { entries: Vec::new() }
    }

    /// Attach a subscriber at the end of the dispatch order
    pub fn attach(&mut self, subscriber: Arc<Mutex<T>>) {
        self.entries.push(subscriber);
    }

    /// Detach a previously attached subscriber.
    ///
    /// Fails with `GsrError::SubscriberNotFound` if the handle is not
    /// currently attached.
    pub fn detach(&mut self, subscriber: &Arc<Mutex<T>>) -> GsrResult<()> {
        match self
            .entries
            .iter()
            .position(|entry| Arc::ptr_eq(entry, subscriber))
        {
            Some(index) => {
                self.entries.remove(index);
                Ok(())
            }
            None => Err(GsrError::SubscriberNotFound),
        }
    }

    /// Number of attached subscribers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no subscribers are attached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke `f` on every subscriber, in attachment order.
    ///
    /// Dispatch is synchronous: `for_each` returns only after every
    /// subscriber has returned. A subscriber whose lock was poisoned by a
    /// panicking peer is still dispatched to.
    pub fn for_each(&self, mut f: impl FnMut(&mut T)) {
        for entry in &self.entries {
            let mut guard = entry.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard);
        }
    }
}

impl<T: ?Sized> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingHandler {
        data_events: usize,
        signal_events: usize,
    }

    impl SampleHandler for CountingHandler {
        fn receive_data(&mut self, _data: DataVector) {
            self.data_events += 1;
        }

        fn receive_signal(&mut self, _signal: ControlSignal) {
            self.signal_events += 1;
        }
    }

    fn counting_handle() -> Arc<Mutex<CountingHandler>> {
        Arc::new(Mutex::new(CountingHandler {
            data_events: 0,
            signal_events: 0,
        }))
    }

    #[test]
    fn test_attach_and_dispatch() {
        let mut subscribers: Subscribers<dyn SampleHandler> = Subscribers::new();
        let first = counting_handle();
        let second = counting_handle();

        subscribers.attach(first.clone());
        subscribers.attach(second.clone());
        assert_eq!(subscribers.len(), 2);

        subscribers.for_each(|handler| handler.receive_signal(ControlSignal::Start));

        assert_eq!(first.lock().unwrap().signal_events, 1);
        assert_eq!(second.lock().unwrap().signal_events, 1);
    }

    #[test]
    fn test_detach_stops_dispatch() {
        let mut subscribers: Subscribers<dyn SampleHandler> = Subscribers::new();
        let first = counting_handle();
        let second = counting_handle();

        let first_handle: HandlerHandle = first.clone();
        let second_handle: HandlerHandle = second.clone();
        subscribers.attach(first_handle.clone());
        subscribers.attach(second_handle);

        subscribers.detach(&first_handle).unwrap();
        subscribers.for_each(|handler| handler.receive_signal(ControlSignal::Stop));

        assert_eq!(first.lock().unwrap().signal_events, 0);
        assert_eq!(second.lock().unwrap().signal_events, 1);
    }

    #[test]
    fn test_detach_unattached_fails() {
        let mut subscribers: Subscribers<dyn SampleHandler> = Subscribers::new();
        let stranger: HandlerHandle = counting_handle();

        assert_eq!(
            subscribers.detach(&stranger),
            Err(GsrError::SubscriberNotFound)
        );
    }

    #[test]
    fn test_dispatch_follows_attachment_order() {
        struct OrderedHandler {
            tag: u8,
            log: Arc<Mutex<Vec<u8>>>,
        }

        impl SampleHandler for OrderedHandler {
            fn receive_data(&mut self, _data: DataVector) {}

            fn receive_signal(&mut self, _signal: ControlSignal) {
                self.log.lock().unwrap().push(self.tag);
            }
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut subscribers: Subscribers<dyn SampleHandler> = Subscribers::new();
        for tag in [1u8, 2, 3] {
            subscribers.attach(Arc::new(Mutex::new(OrderedHandler {
                tag,
                log: log.clone(),
            })));
        }

        subscribers.for_each(|handler| handler.receive_signal(ControlSignal::Error));
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
    }
}
