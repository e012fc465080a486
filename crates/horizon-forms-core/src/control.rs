//! Control tree for Horizon Forms.
//!
//! Provides the in-memory model of a rendered form:
//! - Unique control identifiers via arena-based storage
//! - Parent-child relationships in document order
//! - Declared names, values and checked state per control
//! - A change signal per control, fired only by user interaction
//!
//! # Key Types
//!
//! - [`ControlId`] - Stable, non-owning handle to a control
//! - [`Element`] - Builder describing a control before insertion
//! - [`ElementKind`] / [`InputType`] - What the element is
//! - [`ControlKind`] - How a binding layer should read and write it
//! - [`ControlTree`] - Single-owner tree storage
//! - [`SharedControlTree`] - Lock-protected tree shared between the UI and bindings
//!
//! # Programmatic vs. user changes
//!
//! Writes made through [`ControlTree::set_value`] and
//! [`ControlTree::set_checked`] never raise change events. Only the
//! user-interaction entry points on [`SharedControlTree`]
//! ([`user_input`](SharedControlTree::user_input) and
//! [`user_click`](SharedControlTree::user_click)) do, mirroring how native
//! form controls behave.
//!
//! # Example
//!
//! ```
//! use horizon_forms_core::{Element, SharedControlTree};
//!
//! let tree = SharedControlTree::new();
//! let form = tree.insert_root(Element::form());
//! let email = tree.append(form, Element::text("email")).unwrap();
//!
//! tree.set_value(email, "ada@example.com").unwrap();
//! assert_eq!(tree.value(email).unwrap().as_deref(), Some("ada@example.com"));
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use slotmap::{SlotMap, new_key_type};

use crate::error::{ControlError, ControlResult};
use crate::event::ChangeEvent;
use crate::signal::Signal;

new_key_type! {
    /// A unique identifier for a control in a [`ControlTree`].
    ///
    /// `ControlId`s are stable handles that remain valid for the lifetime of
    /// the tree. Binding layers store them instead of references, so they
    /// never own the controls they point at.
    pub struct ControlId;
}

/// The `type` of an `<input>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    /// Single-line text.
    Text,
    /// Masked single-line text.
    Password,
    /// Email address.
    Email,
    /// Numeric entry.
    Number,
    /// Hidden value carried with the form.
    Hidden,
    /// Independent on/off toggle.
    Checkbox,
    /// Member of a mutually exclusive group.
    Radio,
    /// File picker.
    File,
    /// Submit button.
    Submit,
}

/// What an element in the tree is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// A form container. Binding roots must be of this kind.
    Form,
    /// A grouping container inside a form.
    Fieldset,
    /// A generic block container.
    Container,
    /// An `<input>` of the given type.
    Input(InputType),
    /// A single-choice selection list.
    Select {
        /// The option values, in display order.
        options: Vec<String>,
    },
    /// Multi-line text.
    TextArea,
    /// A push button.
    Button,
    /// A text label.
    Label,
}

impl ElementKind {
    /// A short human-readable tag for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Fieldset => "fieldset",
            Self::Container => "div",
            Self::Input(input) => match input {
                InputType::Text => "input[type=text]",
                InputType::Password => "input[type=password]",
                InputType::Email => "input[type=email]",
                InputType::Number => "input[type=number]",
                InputType::Hidden => "input[type=hidden]",
                InputType::Checkbox => "input[type=checkbox]",
                InputType::Radio => "input[type=radio]",
                InputType::File => "input[type=file]",
                InputType::Submit => "input[type=submit]",
            },
            Self::Select { .. } => "select",
            Self::TextArea => "textarea",
            Self::Button => "button",
            Self::Label => "label",
        }
    }

    /// Returns `true` for form containers.
    pub fn is_form(&self) -> bool {
        matches!(self, Self::Form)
    }

    /// Returns `true` if the element carries a value at all.
    ///
    /// Containers and labels do not; reading their value yields nothing.
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            Self::Input(_) | Self::Select { .. } | Self::TextArea | Self::Button
        )
    }

    /// Classify the element for value access.
    pub fn control_kind(&self) -> ControlKind {
        match self {
            Self::Input(InputType::Checkbox) => ControlKind::Checkbox,
            Self::Input(InputType::Radio) => ControlKind::Radio,
            Self::Input(InputType::File) => ControlKind::File,
            Self::Input(InputType::Submit) => ControlKind::Other,
            Self::Input(_) | Self::Select { .. } | Self::TextArea => ControlKind::TextLike,
            Self::Form | Self::Fieldset | Self::Container | Self::Button | Self::Label => {
                ControlKind::Other
            }
        }
    }
}

/// How a control's value is read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// The value is free text (text inputs, text areas, selects).
    TextLike,
    /// The checked flag is the state; the value is the submitted token.
    Checkbox,
    /// Single-choice group member; checking one unchecks its siblings.
    Radio,
    /// File picker; its value cannot be written programmatically.
    File,
    /// Anything else (buttons, containers, labels).
    Other,
}

impl ControlKind {
    /// Returns `true` for kinds whose state is the checked flag.
    pub fn is_checkable(self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

/// Description of an element to be inserted into a [`ControlTree`].
///
/// # Example
///
/// ```
/// use horizon_forms_core::Element;
///
/// let spring = Element::checkbox("seasons", "spring").with_checked(true);
/// assert_eq!(spring.name(), Some("seasons"));
/// ```
#[derive(Debug, Clone)]
pub struct Element {
    kind: ElementKind,
    name: Option<String>,
    value: String,
    checked: bool,
}

impl Element {
    /// Create an unnamed element of the given kind with its default value.
    pub fn new(kind: ElementKind) -> Self {
        let value = match &kind {
            ElementKind::Input(InputType::Checkbox | InputType::Radio) => "on".to_string(),
            ElementKind::Select { options } => options.first().cloned().unwrap_or_default(),
            _ => String::new(),
        };
        Self {
            kind,
            name: None,
            value,
            checked: false,
        }
    }

    /// A form container.
    pub fn form() -> Self {
        Self::new(ElementKind::Form)
    }

    /// A fieldset container.
    pub fn fieldset() -> Self {
        Self::new(ElementKind::Fieldset)
    }

    /// A generic block container.
    pub fn container() -> Self {
        Self::new(ElementKind::Container)
    }

    /// A text label.
    pub fn label() -> Self {
        Self::new(ElementKind::Label)
    }

    /// An `<input>` of the given type, unnamed.
    pub fn input(input_type: InputType) -> Self {
        Self::new(ElementKind::Input(input_type))
    }

    /// A named single-line text input.
    pub fn text(name: impl Into<String>) -> Self {
        Self::input(InputType::Text).named(name)
    }

    /// A named multi-line text area.
    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(ElementKind::TextArea).named(name)
    }

    /// A named checkbox submitting `value` when checked.
    pub fn checkbox(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::input(InputType::Checkbox).named(name).with_value(value)
    }

    /// A named radio button submitting `value` when checked.
    pub fn radio(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::input(InputType::Radio).named(name).with_value(value)
    }

    /// A named selection list. The first option starts selected.
    pub fn select<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = options.into_iter().map(Into::into).collect();
        Self::new(ElementKind::Select { options }).named(name)
    }

    /// A named file picker.
    pub fn file(name: impl Into<String>) -> Self {
        Self::input(InputType::File).named(name)
    }

    /// Set the declared name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the initial value.
    ///
    /// For selection lists a value that is not one of the options leaves the
    /// list with no selection (an empty value).
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = normalize_value(&self.kind, value.into());
        self
    }

    /// Set the initial checked state.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// The element kind.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// The declared name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

fn normalize_value(kind: &ElementKind, value: String) -> String {
    match kind {
        ElementKind::Select { options } if !options.contains(&value) => String::new(),
        _ => value,
    }
}

/// Internal data stored in the tree for each control.
struct ControlData {
    kind: ElementKind,
    name: Option<String>,
    value: String,
    checked: bool,
    parent: Option<ControlId>,
    children: Vec<ControlId>,
    changed: Arc<Signal<ChangeEvent>>,
}

impl ControlData {
    fn from_element(element: Element, parent: Option<ControlId>) -> Self {
        Self {
            kind: element.kind,
            name: element.name.filter(|name| !name.is_empty()),
            value: element.value,
            checked: element.checked,
            parent,
            children: Vec::new(),
            changed: Arc::new(Signal::new()),
        }
    }
}

/// Arena-backed storage for a tree of controls.
///
/// Children are kept in insertion order, which is document order for every
/// traversal the tree offers.
pub struct ControlTree {
    controls: SlotMap<ControlId, ControlData>,
}

impl ControlTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            controls: SlotMap::with_key(),
        }
    }

    /// Insert an element with no parent.
    pub fn insert_root(&mut self, element: Element) -> ControlId {
        let id = self.controls.insert(ControlData::from_element(element, None));
        tracing::trace!(target: "horizon_forms_core::control", ?id, "inserted root control");
        id
    }

    /// Insert an element as the last child of `parent`.
    pub fn append(&mut self, parent: ControlId, element: Element) -> ControlResult<ControlId> {
        if !self.controls.contains_key(parent) {
            return Err(ControlError::InvalidControlId);
        }
        let id = self
            .controls
            .insert(ControlData::from_element(element, Some(parent)));
        self.data_mut(parent)?.children.push(id);
        tracing::trace!(target: "horizon_forms_core::control", ?id, ?parent, "appended control");
        Ok(id)
    }

    fn data(&self, id: ControlId) -> ControlResult<&ControlData> {
        self.controls.get(id).ok_or(ControlError::InvalidControlId)
    }

    fn data_mut(&mut self, id: ControlId) -> ControlResult<&mut ControlData> {
        self.controls.get_mut(id).ok_or(ControlError::InvalidControlId)
    }

    /// Check if a control exists in the tree.
    pub fn contains(&self, id: ControlId) -> bool {
        self.controls.contains_key(id)
    }

    /// Get the number of controls in the tree.
    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    /// Get the parent of a control.
    pub fn parent(&self, id: ControlId) -> ControlResult<Option<ControlId>> {
        self.data(id).map(|d| d.parent)
    }

    /// Get the children of a control.
    pub fn children(&self, id: ControlId) -> ControlResult<&[ControlId]> {
        self.data(id).map(|d| d.children.as_slice())
    }

    /// Get the declared name of a control. Empty names are stored as `None`.
    pub fn name(&self, id: ControlId) -> ControlResult<Option<&str>> {
        self.data(id).map(|d| d.name.as_deref())
    }

    /// Get the element kind of a control.
    pub fn element_kind(&self, id: ControlId) -> ControlResult<&ElementKind> {
        self.data(id).map(|d| &d.kind)
    }

    /// Get the access classification of a control.
    pub fn control_kind(&self, id: ControlId) -> ControlResult<ControlKind> {
        self.data(id).map(|d| d.kind.control_kind())
    }

    /// Get the current value, or `None` for elements that carry no value.
    pub fn value(&self, id: ControlId) -> ControlResult<Option<&str>> {
        let data = self.data(id)?;
        Ok(data.kind.has_value().then_some(data.value.as_str()))
    }

    /// Assign a value without raising a change event.
    ///
    /// Assigning to an element without a value has no effect. File pickers
    /// may only be cleared; any other value is rejected.
    pub fn set_value(&mut self, id: ControlId, value: &str) -> ControlResult<()> {
        let data = self.data_mut(id)?;
        if !data.kind.has_value() {
            return Ok(());
        }
        if data.kind.control_kind() == ControlKind::File && !value.is_empty() {
            return Err(ControlError::ValueNotWritable {
                kind: data.kind.describe(),
            });
        }
        data.value = normalize_value(&data.kind, value.to_string());
        Ok(())
    }

    /// Get the checked flag.
    pub fn is_checked(&self, id: ControlId) -> ControlResult<bool> {
        self.data(id).map(|d| d.checked)
    }

    /// Set the checked flag without raising a change event.
    ///
    /// Like a native radio button's `checked` property, this does not touch
    /// other members of the group.
    pub fn set_checked(&mut self, id: ControlId, checked: bool) -> ControlResult<()> {
        self.data_mut(id)?.checked = checked;
        Ok(())
    }

    /// Get the change signal of a control.
    ///
    /// The signal is shared, so it can be emitted without holding the tree.
    pub fn change_signal(&self, id: ControlId) -> ControlResult<Arc<Signal<ChangeEvent>>> {
        self.data(id).map(|d| d.changed.clone())
    }

    // =========================================================================
    // Tree Traversal
    // =========================================================================

    /// Get all ancestors of a control from immediate parent to root.
    pub fn ancestors(&self, id: ControlId) -> ControlResult<Vec<ControlId>> {
        let mut result = Vec::new();
        let mut current = self.data(id)?.parent;

        while let Some(current_id) = current {
            result.push(current_id);
            current = self.controls.get(current_id).and_then(|d| d.parent);
        }

        Ok(result)
    }

    /// Perform a depth-first pre-order traversal starting from a control.
    ///
    /// Visits the node first, then its children recursively.
    pub fn depth_first_preorder(&self, id: ControlId) -> ControlResult<Vec<ControlId>> {
        let mut result = Vec::new();
        self.depth_first_preorder_recursive(id, &mut result)?;
        Ok(result)
    }

    fn depth_first_preorder_recursive(
        &self,
        id: ControlId,
        result: &mut Vec<ControlId>,
    ) -> ControlResult<()> {
        let data = self.data(id)?;
        result.push(id);
        for &child_id in &data.children {
            self.depth_first_preorder_recursive(child_id, result)?;
        }
        Ok(())
    }

    /// The nearest enclosing form, or the topmost ancestor if there is none.
    fn radio_scope(&self, id: ControlId) -> ControlResult<ControlId> {
        let ancestors = self.ancestors(id)?;
        let form = ancestors.iter().copied().find(|&ancestor| {
            self.controls
                .get(ancestor)
                .is_some_and(|d| d.kind.is_form())
        });
        Ok(form.or_else(|| ancestors.last().copied()).unwrap_or(id))
    }

    // =========================================================================
    // User Interaction
    // =========================================================================

    /// Apply typed or picked input to a control's state.
    fn apply_input(&mut self, id: ControlId, text: &str) -> ControlResult<()> {
        let data = self.data_mut(id)?;
        match data.kind.control_kind() {
            ControlKind::TextLike | ControlKind::File => {
                data.value = normalize_value(&data.kind, text.to_string());
                Ok(())
            }
            _ => Err(ControlError::NotInteractive {
                kind: data.kind.describe(),
            }),
        }
    }

    /// Apply a click to a checkable control's state.
    fn apply_click(&mut self, id: ControlId) -> ControlResult<()> {
        let kind = self.data(id)?.kind.control_kind();
        match kind {
            ControlKind::Checkbox => {
                let data = self.data_mut(id)?;
                data.checked = !data.checked;
                Ok(())
            }
            ControlKind::Radio => {
                let name = self.data(id)?.name.clone();
                if let Some(name) = name {
                    let scope = self.radio_scope(id)?;
                    for member in self.depth_first_preorder(scope)? {
                        if member == id {
                            continue;
                        }
                        if let Some(data) = self.controls.get_mut(member) {
                            if data.kind.control_kind() == ControlKind::Radio
                                && data.name.as_deref() == Some(name.as_str())
                            {
                                data.checked = false;
                            }
                        }
                    }
                }
                self.data_mut(id)?.checked = true;
                Ok(())
            }
            _ => Err(ControlError::NotInteractive {
                kind: self.data(id)?.kind.describe(),
            }),
        }
    }

    /// Build the event for a control and the signals it bubbles through.
    fn dispatch_route(
        &self,
        id: ControlId,
    ) -> ControlResult<(ChangeEvent, Vec<Arc<Signal<ChangeEvent>>>)> {
        let data = self.data(id)?;
        let event = ChangeEvent::new(id, data.name.clone().unwrap_or_default());

        let mut route = vec![data.changed.clone()];
        for ancestor in self.ancestors(id)? {
            route.push(self.data(ancestor)?.changed.clone());
        }
        Ok((event, route))
    }
}

impl Default for ControlTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe wrapper around [`ControlTree`].
///
/// This is the form the UI layer hands to binding code. Read access is
/// shared; writes are exclusive. User-interaction entry points release the
/// lock before dispatching change events, so handlers may freely read and
/// write the tree.
pub struct SharedControlTree {
    inner: RwLock<ControlTree>,
}

impl SharedControlTree {
    /// Create a new, empty shared tree.
    pub fn new() -> Self {
        Self::from_tree(ControlTree::new())
    }

    /// Wrap an existing tree.
    pub fn from_tree(tree: ControlTree) -> Self {
        Self {
            inner: RwLock::new(tree),
        }
    }

    /// Run a closure with shared access to the tree.
    pub fn with_read<R>(&self, f: impl FnOnce(&ControlTree) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run a closure with exclusive access to the tree.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut ControlTree) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Insert an element with no parent.
    pub fn insert_root(&self, element: Element) -> ControlId {
        self.inner.write().insert_root(element)
    }

    /// Insert an element as the last child of `parent`.
    pub fn append(&self, parent: ControlId, element: Element) -> ControlResult<ControlId> {
        self.inner.write().append(parent, element)
    }

    /// Check if a control exists.
    pub fn contains(&self, id: ControlId) -> bool {
        self.inner.read().contains(id)
    }

    /// Get the number of controls.
    pub fn control_count(&self) -> usize {
        self.inner.read().control_count()
    }

    /// Get the parent of a control.
    pub fn parent(&self, id: ControlId) -> ControlResult<Option<ControlId>> {
        self.inner.read().parent(id)
    }

    /// Get the children of a control (returns owned Vec for thread safety).
    pub fn children(&self, id: ControlId) -> ControlResult<Vec<ControlId>> {
        self.inner.read().children(id).map(|c| c.to_vec())
    }

    /// Get the declared name of a control.
    pub fn name(&self, id: ControlId) -> ControlResult<Option<String>> {
        self.inner.read().name(id).map(|n| n.map(str::to_string))
    }

    /// Get the element kind of a control.
    pub fn element_kind(&self, id: ControlId) -> ControlResult<ElementKind> {
        self.inner.read().element_kind(id).cloned()
    }

    /// Get the access classification of a control.
    pub fn control_kind(&self, id: ControlId) -> ControlResult<ControlKind> {
        self.inner.read().control_kind(id)
    }

    /// Get the current value, or `None` for elements that carry no value.
    pub fn value(&self, id: ControlId) -> ControlResult<Option<String>> {
        self.inner.read().value(id).map(|v| v.map(str::to_string))
    }

    /// Assign a value without raising a change event.
    pub fn set_value(&self, id: ControlId, value: &str) -> ControlResult<()> {
        self.inner.write().set_value(id, value)
    }

    /// Get the checked flag.
    pub fn is_checked(&self, id: ControlId) -> ControlResult<bool> {
        self.inner.read().is_checked(id)
    }

    /// Set the checked flag without raising a change event.
    pub fn set_checked(&self, id: ControlId, checked: bool) -> ControlResult<()> {
        self.inner.write().set_checked(id, checked)
    }

    /// Get the change signal of a control.
    pub fn change_signal(&self, id: ControlId) -> ControlResult<Arc<Signal<ChangeEvent>>> {
        self.inner.read().change_signal(id)
    }

    /// Perform a depth-first pre-order traversal starting from a control.
    pub fn depth_first_preorder(&self, id: ControlId) -> ControlResult<Vec<ControlId>> {
        self.inner.read().depth_first_preorder(id)
    }

    /// Simulate the user typing into or picking a value for a control.
    ///
    /// Updates the value, then raises a change event on the control that
    /// bubbles to its ancestors.
    pub fn user_input(&self, id: ControlId, text: &str) -> ControlResult<()> {
        let route = {
            let mut tree = self.inner.write();
            tree.apply_input(id, text)?;
            tree.dispatch_route(id)?
        };
        Self::dispatch(route);
        Ok(())
    }

    /// Simulate the user clicking a checkbox or radio button.
    ///
    /// Checkboxes toggle. Radio buttons become checked and uncheck every
    /// same-named radio button in the enclosing form. A change event is then
    /// raised on the clicked control and bubbles to its ancestors.
    pub fn user_click(&self, id: ControlId) -> ControlResult<()> {
        let route = {
            let mut tree = self.inner.write();
            tree.apply_click(id)?;
            tree.dispatch_route(id)?
        };
        Self::dispatch(route);
        Ok(())
    }

    #[tracing::instrument(skip_all, target = "horizon_forms_core::control", level = "trace")]
    fn dispatch(route: (ChangeEvent, Vec<Arc<Signal<ChangeEvent>>>)) {
        let (event, route) = route;
        tracing::trace!(
            target: "horizon_forms_core::control",
            target_id = ?event.target(),
            control_name = event.target_name(),
            depth = route.len(),
            "dispatching change event"
        );
        for signal in route {
            signal.emit(event.clone());
            if event.is_propagation_stopped() {
                tracing::trace!(target: "horizon_forms_core::control", "propagation stopped");
                break;
            }
        }
    }
}

impl Default for SharedControlTree {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(SharedControlTree: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder(
        tree: &SharedControlTree,
        id: ControlId,
        label: &'static str,
        log: &Arc<Mutex<Vec<(&'static str, String)>>>,
    ) {
        let log = log.clone();
        tree.change_signal(id).unwrap().connect(move |event| {
            log.lock().push((label, event.target_name().to_string()));
        });
    }

    #[test]
    fn test_append_and_traverse_in_document_order() {
        let mut tree = ControlTree::new();
        let form = tree.insert_root(Element::form());
        let set = tree.append(form, Element::fieldset()).unwrap();
        let first = tree.append(set, Element::text("first")).unwrap();
        let last = tree.append(set, Element::text("last")).unwrap();
        let notes = tree.append(form, Element::textarea("notes")).unwrap();

        assert_eq!(
            tree.depth_first_preorder(form).unwrap(),
            vec![form, set, first, last, notes]
        );
        assert_eq!(tree.ancestors(first).unwrap(), vec![set, form]);
        assert_eq!(tree.parent(form).unwrap(), None);
        assert_eq!(tree.control_count(), 5);
    }

    #[test]
    fn test_append_to_unknown_parent_fails() {
        let mut tree = ControlTree::new();
        let form = tree.insert_root(Element::form());
        let mut other = ControlTree::new();
        other.insert_root(Element::form());
        let stranger = other.insert_root(Element::form());

        assert!(tree.contains(form));
        assert_eq!(
            tree.append(stranger, Element::text("x")).unwrap_err(),
            ControlError::InvalidControlId
        );
    }

    #[test]
    fn test_default_values() {
        let mut tree = ControlTree::new();
        let form = tree.insert_root(Element::form());
        let checkbox = tree
            .append(form, Element::input(InputType::Checkbox).named("agree"))
            .unwrap();
        let select = tree
            .append(form, Element::select("size", ["s", "m", "l"]))
            .unwrap();
        let text = tree.append(form, Element::text("name")).unwrap();

        assert_eq!(tree.value(checkbox).unwrap(), Some("on"));
        assert_eq!(tree.value(select).unwrap(), Some("s"));
        assert_eq!(tree.value(text).unwrap(), Some(""));
        assert_eq!(tree.value(form).unwrap(), None);
    }

    #[test]
    fn test_empty_name_is_unnamed() {
        let mut tree = ControlTree::new();
        let form = tree.insert_root(Element::form());
        let input = tree.append(form, Element::text("")).unwrap();
        assert_eq!(tree.name(input).unwrap(), None);
    }

    #[test]
    fn test_select_rejects_unknown_option() {
        let mut tree = ControlTree::new();
        let form = tree.insert_root(Element::form());
        let select = tree
            .append(form, Element::select("size", ["s", "m", "l"]))
            .unwrap();

        tree.set_value(select, "l").unwrap();
        assert_eq!(tree.value(select).unwrap(), Some("l"));

        tree.set_value(select, "xxl").unwrap();
        assert_eq!(tree.value(select).unwrap(), Some(""));
    }

    #[test]
    fn test_file_value_can_only_be_cleared() {
        let mut tree = ControlTree::new();
        let form = tree.insert_root(Element::form());
        let file = tree.append(form, Element::file("avatar")).unwrap();

        assert_eq!(
            tree.set_value(file, "evil.png").unwrap_err(),
            ControlError::ValueNotWritable {
                kind: "input[type=file]"
            }
        );
        assert!(tree.set_value(file, "").is_ok());
    }

    #[test]
    fn test_control_kind_classification() {
        assert_eq!(
            ElementKind::Input(InputType::Email).control_kind(),
            ControlKind::TextLike
        );
        assert_eq!(ElementKind::TextArea.control_kind(), ControlKind::TextLike);
        assert_eq!(
            ElementKind::Input(InputType::Radio).control_kind(),
            ControlKind::Radio
        );
        assert_eq!(
            ElementKind::Input(InputType::File).control_kind(),
            ControlKind::File
        );
        assert_eq!(ElementKind::Fieldset.control_kind(), ControlKind::Other);
        assert!(ControlKind::Checkbox.is_checkable());
        assert!(!ControlKind::TextLike.is_checkable());
    }

    #[test]
    fn test_programmatic_writes_do_not_emit() {
        let tree = SharedControlTree::new();
        let form = tree.insert_root(Element::form());
        let name = tree.append(form, Element::text("name")).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&tree, name, "name", &log);

        tree.set_value(name, "Ryan").unwrap();
        tree.set_checked(name, true).unwrap();

        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_user_input_bubbles_to_ancestors() {
        let tree = SharedControlTree::new();
        let form = tree.insert_root(Element::form());
        let set = tree.append(form, Element::fieldset()).unwrap();
        let name = tree.append(set, Element::text("name")).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&tree, name, "input", &log);
        recorder(&tree, set, "fieldset", &log);
        recorder(&tree, form, "form", &log);

        tree.user_input(name, "Ryan").unwrap();

        assert_eq!(tree.value(name).unwrap().as_deref(), Some("Ryan"));
        assert_eq!(
            *log.lock(),
            vec![
                ("input", "name".to_string()),
                ("fieldset", "name".to_string()),
                ("form", "name".to_string()),
            ]
        );
    }

    #[test]
    fn test_stop_propagation_ends_bubbling() {
        let tree = SharedControlTree::new();
        let form = tree.insert_root(Element::form());
        let name = tree.append(form, Element::text("name")).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));

        tree.change_signal(name)
            .unwrap()
            .connect(|event| event.stop_propagation());
        recorder(&tree, name, "input", &log);
        recorder(&tree, form, "form", &log);

        tree.user_input(name, "x").unwrap();

        // Other handlers on the target still run
        assert_eq!(*log.lock(), vec![("input", "name".to_string())]);
    }

    #[test]
    fn test_checkbox_click_toggles() {
        let tree = SharedControlTree::new();
        let form = tree.insert_root(Element::form());
        let spring = tree
            .append(form, Element::checkbox("seasons", "spring"))
            .unwrap();

        tree.user_click(spring).unwrap();
        assert!(tree.is_checked(spring).unwrap());
        tree.user_click(spring).unwrap();
        assert!(!tree.is_checked(spring).unwrap());
    }

    #[test]
    fn test_radio_click_is_exclusive_within_form() {
        let tree = SharedControlTree::new();
        let form = tree.insert_root(Element::form());
        let a = tree
            .append(form, Element::radio("size", "s").with_checked(true))
            .unwrap();
        let b = tree.append(form, Element::radio("size", "m")).unwrap();
        let other = tree
            .append(form, Element::radio("color", "red").with_checked(true))
            .unwrap();

        let elsewhere = tree.insert_root(Element::form());
        let foreign = tree
            .append(elsewhere, Element::radio("size", "l").with_checked(true))
            .unwrap();

        tree.user_click(b).unwrap();

        assert!(!tree.is_checked(a).unwrap());
        assert!(tree.is_checked(b).unwrap());
        assert!(tree.is_checked(other).unwrap());
        assert!(tree.is_checked(foreign).unwrap());
    }

    #[test]
    fn test_handlers_may_access_tree_during_dispatch() {
        let tree = Arc::new(SharedControlTree::new());
        let form = tree.insert_root(Element::form());
        let name = tree.append(form, Element::text("name")).unwrap();
        let seen = Arc::new(Mutex::new(None));

        let tree_clone = tree.clone();
        let seen_clone = seen.clone();
        tree.change_signal(name).unwrap().connect(move |event| {
            let value = tree_clone.value(event.target()).unwrap();
            tree_clone.set_value(event.target(), "rewritten").unwrap();
            *seen_clone.lock() = value;
        });

        tree.user_input(name, "typed").unwrap();

        assert_eq!(seen.lock().as_deref(), Some("typed"));
        assert_eq!(tree.value(name).unwrap().as_deref(), Some("rewritten"));
    }

    #[test]
    fn test_interaction_on_wrong_kind_is_rejected() {
        let tree = SharedControlTree::new();
        let form = tree.insert_root(Element::form());
        let text = tree.append(form, Element::text("name")).unwrap();
        let checkbox = tree.append(form, Element::checkbox("agree", "yes")).unwrap();

        assert_eq!(
            tree.user_click(text).unwrap_err(),
            ControlError::NotInteractive {
                kind: "input[type=text]"
            }
        );
        assert_eq!(
            tree.user_input(checkbox, "x").unwrap_err(),
            ControlError::NotInteractive {
                kind: "input[type=checkbox]"
            }
        );
        assert_eq!(
            tree.user_click(form).unwrap_err(),
            ControlError::NotInteractive { kind: "form" }
        );
    }
}
