//! Native change events.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::control::ControlId;

/// A change notification raised by user interaction with a control.
///
/// The event is dispatched to the target control's change signal first and
/// then bubbles to each ancestor in turn. Any handler can end the bubbling
/// with [`stop_propagation`](Self::stop_propagation).
///
/// Clones share propagation state, so stopping propagation on a clone handed
/// to a slot stops it for the dispatcher as well.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    target: ControlId,
    target_name: String,
    propagation_stopped: Arc<AtomicBool>,
}

impl ChangeEvent {
    /// Create an event targeting a control.
    pub fn new(target: ControlId, target_name: impl Into<String>) -> Self {
        Self {
            target,
            target_name: target_name.into(),
            propagation_stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The control the user interacted with.
    pub fn target(&self) -> ControlId {
        self.target
    }

    /// The declared name of the target at dispatch time (empty if unnamed).
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Prevent the event from reaching any further ancestor.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.store(true, Ordering::SeqCst);
    }

    /// Whether a handler has stopped propagation.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.load(Ordering::SeqCst)
    }
}
