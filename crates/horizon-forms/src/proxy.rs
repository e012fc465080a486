//! The form proxy: a name-indexed, kind-aware view over a form's controls.
//!
//! A [`FormProxy`] is created over a form element of a [`SharedControlTree`].
//! Construction indexes every named descendant (see [`ControlIndexer`]) and
//! hooks each one's change signal, so that native change events raised by
//! user interaction are re-emitted on the proxy's own `change` signal.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_forms::FormProxy;
//! use horizon_forms_core::{Element, SharedControlTree};
//! use serde_json::json;
//!
//! let tree = Arc::new(SharedControlTree::new());
//! let form = tree.insert_root(Element::form());
//! tree.append(form, Element::text("email")).unwrap();
//! for season in ["spring", "summer", "fall"] {
//!     tree.append(form, Element::checkbox("seasons", season)).unwrap();
//! }
//!
//! let proxy = FormProxy::new(tree.clone(), form).unwrap();
//! proxy.set("email", "ryan@example.com").unwrap();
//! proxy.set("seasons", json!(["fall", "spring"])).unwrap();
//!
//! assert_eq!(proxy.get("email").unwrap(), json!("ryan@example.com"));
//! assert_eq!(proxy.get("seasons").unwrap(), json!(["spring", "fall"]));
//! ```

use std::sync::Arc;

use horizon_forms_core::{ChangeEvent, ConnectionId, ControlId, SharedControlTree, Signal};
use parking_lot::Mutex;
use serde_json::Value;

use crate::accessor;
use crate::error::{FormError, FormResult};
use crate::guard::{FeedbackGuard, Release};
use crate::index::{ControlIndexer, FieldEntry, FieldIndex};
use crate::path;

/// A change-signal connection made on an indexed control.
type Hook = (Arc<Signal<ChangeEvent>>, ConnectionId);

/// Two-way accessor over the named controls of one form.
///
/// The index is a snapshot taken at construction. Controls appended to the
/// form afterwards are neither readable through the proxy nor forwarded on
/// its `change` signal.
pub struct FormProxy {
    tree: Arc<SharedControlTree>,
    root: ControlId,
    index: FieldIndex,
    guard: FeedbackGuard,
    change: Arc<Signal<ChangeEvent>>,
    hooks: Mutex<Vec<Hook>>,
}

impl FormProxy {
    /// Bind a proxy to the form element `root`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAForm`] if `root` is not a form element, or
    /// [`FormError::Control`] if `root` is not in the tree.
    pub fn new(tree: Arc<SharedControlTree>, root: ControlId) -> FormResult<Self> {
        let guard = FeedbackGuard::new();
        let change: Arc<Signal<ChangeEvent>> = Arc::new(Signal::new());
        let mut hooks = Vec::new();

        let index = tree.with_read(|controls| -> FormResult<FieldIndex> {
            let kind = controls.element_kind(root)?;
            if !kind.is_form() {
                return Err(FormError::NotAForm {
                    found: kind.describe(),
                });
            }

            let index = ControlIndexer::new(controls).build(root, |_, signal| {
                let change = change.clone();
                let guard = guard.clone();
                let connection = signal.connect(move |event: &ChangeEvent| {
                    forward(&change, &guard, event);
                });
                hooks.push((signal.clone(), connection));
            })?;
            Ok(index)
        })?;

        tracing::debug!(
            target: "horizon_forms::proxy",
            root = ?root,
            fields = index.len(),
            hooks = hooks.len(),
            "form proxy created"
        );

        Ok(Self {
            tree,
            root,
            index,
            guard,
            change,
            hooks: Mutex::new(hooks),
        })
    }

    /// Read the current value of a field.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if no control is indexed under
    /// `key`.
    pub fn get(&self, key: &str) -> FormResult<Value> {
        let entry = self.entry(key)?;
        Ok(self.tree.with_read(|tree| accessor::read(tree, entry))?)
    }

    /// Write a value into a field.
    ///
    /// Does nothing while the feedback guard is active, whether or not `key`
    /// is indexed.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if no control is indexed under
    /// `key`.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> FormResult<()> {
        if self.guard.is_active() {
            tracing::trace!(target: "horizon_forms::proxy", field = key, "guarded, write skipped");
            return Ok(());
        }

        let entry = self.entry(key)?;
        let value = value.into();
        self.tree
            .with_write(|tree| accessor::write(tree, entry, &value))?;
        tracing::trace!(target: "horizon_forms::proxy", field = key, value = %value, "field written");
        Ok(())
    }

    /// Write every indexed field that `data` has a value for.
    ///
    /// Each index key is resolved as a dot-delimited path into `data`. Keys
    /// that do not resolve are left untouched, and members of `data` that
    /// match no indexed key are never visited. Fields are written in index
    /// order. Does nothing while the feedback guard is active.
    #[tracing::instrument(skip_all, target = "horizon_forms::proxy", level = "trace")]
    pub fn set_all(&self, data: &Value) {
        if self.guard.is_active() {
            tracing::trace!(target: "horizon_forms::proxy", "guarded, bulk write skipped");
            return;
        }

        let applied = self.tree.with_write(|tree| {
            let mut applied = 0usize;
            for (key, entry) in self.index.iter() {
                let Some(value) = path::resolve(data, key) else {
                    continue;
                };
                match accessor::write(tree, entry, value) {
                    Ok(()) => applied += 1,
                    Err(error) => {
                        tracing::error!(target: "horizon_forms::proxy", field = key, %error, "bulk write failed");
                    }
                }
            }
            applied
        });
        tracing::trace!(
            target: "horizon_forms::proxy",
            applied,
            fields = self.index.len(),
            "bulk write applied"
        );
    }

    /// Run `action` with the feedback guard engaged.
    ///
    /// `action` receives the [`Release`] token and must call
    /// [`Release::release`] once its guarded work is done. Until then every
    /// write through the proxy is skipped and native change events are not
    /// re-emitted on the proxy's `change` signal.
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use horizon_forms::FormProxy;
    /// use horizon_forms_core::{Element, SharedControlTree};
    /// use serde_json::json;
    ///
    /// let tree = Arc::new(SharedControlTree::new());
    /// let form = tree.insert_root(Element::form());
    /// tree.append(form, Element::text("name")).unwrap();
    /// let proxy = FormProxy::new(tree, form).unwrap();
    ///
    /// proxy.debounce(|done| {
    ///     proxy.set("name", "ignored").unwrap();
    ///     done.release();
    /// });
    /// assert_eq!(proxy.get("name").unwrap(), json!(""));
    /// ```
    pub fn debounce<R>(&self, action: impl FnOnce(Release) -> R) -> R {
        tracing::trace!(target: "horizon_forms::proxy", "engaging feedback guard");
        action(self.guard.engage())
    }

    /// Whether the feedback guard is currently active.
    pub fn is_guarded(&self) -> bool {
        self.guard.is_active()
    }

    /// Connect a handler to the proxy's `change` signal.
    pub fn on_change<F>(&self, handler: F) -> ConnectionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.change.connect(handler)
    }

    /// The proxy's `change` signal.
    pub fn change_signal(&self) -> &Arc<Signal<ChangeEvent>> {
        &self.change
    }

    /// The field index built at construction.
    pub fn index(&self) -> &FieldIndex {
        &self.index
    }

    /// Indexed field names in first-encounter order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys()
    }

    /// Returns `true` if a control is indexed under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains(key)
    }

    /// The control tree the proxy is bound to.
    pub fn tree(&self) -> &Arc<SharedControlTree> {
        &self.tree
    }

    /// The bound form element.
    pub fn root(&self) -> ControlId {
        self.root
    }

    /// Disconnect the proxy from its controls' change signals.
    ///
    /// Afterwards native change events are no longer forwarded. Reads and
    /// writes keep working. Calling this more than once is harmless.
    pub fn detach(&self) {
        let hooks = std::mem::take(&mut *self.hooks.lock());
        if hooks.is_empty() {
            return;
        }
        for (signal, connection) in &hooks {
            signal.disconnect(*connection);
        }
        tracing::debug!(target: "horizon_forms::proxy", hooks = hooks.len(), "form proxy detached");
    }

    fn entry(&self, key: &str) -> FormResult<&FieldEntry> {
        self.index
            .get(key)
            .ok_or_else(|| FormError::unknown_field(key))
    }
}

impl Drop for FormProxy {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for FormProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormProxy")
            .field("root", &self.root)
            .field("fields", &self.index.len())
            .field("guarded", &self.guard.is_active())
            .finish()
    }
}

static_assertions::assert_impl_all!(FormProxy: Send, Sync);

/// Emission path for native change events arriving from indexed controls.
fn forward(change: &Signal<ChangeEvent>, guard: &FeedbackGuard, event: &ChangeEvent) {
    if guard.is_active() {
        tracing::trace!(
            target: "horizon_forms::proxy",
            field = event.target_name(),
            "guarded, change not forwarded"
        );
        return;
    }
    change.emit(event.clone());
}
