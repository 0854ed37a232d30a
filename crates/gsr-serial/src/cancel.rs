//! Cooperative cancellation for acquisition loops

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag checked once per loop iteration.
///
/// Cancelling never tears the transport down; the loop exits between lines,
/// leaving the transport consistent so `close()` still works and no
/// partially-read line is dispatched.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        CancelToken {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation; all clones observe the request
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear the flag so the token can gate another run
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
