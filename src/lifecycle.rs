//! Disposal latch shared between a controller and its host.
//!
//! Once flipped, the controller performs no further storage access, bridge
//! mutation, or callback invocation. The flag is never cleared.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle onto a controller's disposal flag.
#[derive(Clone, Debug, Default)]
pub struct DisposeHandle {
    disposed: Arc<AtomicBool>,
}

impl DisposeHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the latch. Idempotent.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}
