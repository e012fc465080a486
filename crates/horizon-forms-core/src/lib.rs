//! Core systems for Horizon Forms.
//!
//! This crate provides the foundational pieces the form binding layer is
//! built on:
//!
//! - **Signal/Slot System**: Type-safe, synchronous notification
//! - **Control Tree**: Arena-backed tree of form controls with names, values,
//!   checked state and per-control change signals
//! - **Change Events**: Native change notifications that bubble to ancestors
//!   and can be stopped
//! - **Logging**: `tracing` targets and control tree debug output
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use horizon_forms_core::{Element, SharedControlTree};
//!
//! let tree = SharedControlTree::new();
//! let form = tree.insert_root(Element::form());
//! let agree = tree.append(form, Element::checkbox("agree", "yes")).unwrap();
//!
//! let changes = Arc::new(AtomicUsize::new(0));
//! let counter = changes.clone();
//! tree.change_signal(form).unwrap().connect(move |_event| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! // Programmatic writes are silent
//! tree.set_checked(agree, true).unwrap();
//! assert_eq!(changes.load(Ordering::SeqCst), 0);
//!
//! // User interaction bubbles up to the form
//! tree.user_click(agree).unwrap();
//! assert_eq!(changes.load(Ordering::SeqCst), 1);
//! assert!(!tree.is_checked(agree).unwrap());
//! ```

pub mod control;
mod error;
mod event;
pub mod logging;
pub mod signal;

pub use control::{
    ControlId, ControlKind, ControlTree, Element, ElementKind, InputType, SharedControlTree,
};
pub use error::{ControlError, ControlResult};
pub use event::ChangeEvent;
pub use logging::{ControlTreeDebug, TreeFormatOptions};
pub use signal::{ConnectionId, Signal};
