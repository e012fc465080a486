//! Feedback guard for model-driven writes.
//!
//! A form and a model bound in both directions would ping-pong forever if a
//! write in one direction were allowed to trigger a write in the other. The
//! guard is a single flag: while it is active the proxy ignores writes and
//! swallows control change notifications.
//!
//! The guard is engaged by [`FormProxy::debounce`](crate::FormProxy::debounce)
//! and stays active until the [`Release`] token handed to the guarded action
//! is released. There is no nesting: engaging an active guard and releasing
//! either token clears it for both.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared reentrancy flag.
#[derive(Debug, Clone, Default)]
pub struct FeedbackGuard {
    active: Arc<AtomicBool>,
}

impl FeedbackGuard {
    /// Create an inactive guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the guard is currently active.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Activate the guard and return the token that clears it.
    pub fn engage(&self) -> Release {
        if self.active.swap(true, Ordering::SeqCst) {
            tracing::debug!(target: "horizon_forms::proxy", "feedback guard engaged while already active");
        }
        Release {
            active: self.active.clone(),
            released: false,
        }
    }
}

/// Completion token for a guarded action.
///
/// Call [`release`](Self::release) once the guarded work is done. Dropping
/// the token without releasing it leaves the guard active.
#[must_use = "the feedback guard stays active until the token is released"]
#[derive(Debug)]
pub struct Release {
    active: Arc<AtomicBool>,
    released: bool,
}

impl Release {
    /// Clear the guard.
    pub fn release(mut self) {
        self.active.store(false, Ordering::SeqCst);
        self.released = true;
    }
}

impl Drop for Release {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!(
                target: "horizon_forms::proxy",
                "guard release token dropped without release; the form stays guarded"
            );
        }
    }
}
