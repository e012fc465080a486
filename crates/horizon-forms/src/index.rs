//! Name-indexed view over a form's controls.
//!
//! The index is built once, when a [`FormProxy`](crate::FormProxy) is
//! created, by walking every descendant of the form in document order. It is
//! a snapshot: controls added to or removed from the tree afterwards are not
//! reflected.

use std::sync::Arc;

use horizon_forms_core::{ChangeEvent, ControlId, ControlResult, ControlTree, Signal};
use indexmap::IndexMap;

/// The control(s) registered under one declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEntry {
    /// Exactly one control carries the name.
    Single(ControlId),
    /// Several controls share the name, in document order.
    Group(Vec<ControlId>),
}

impl FieldEntry {
    /// Add another control under the same name.
    ///
    /// A single entry becomes a group holding the prior control followed by
    /// the new one.
    fn push(&mut self, id: ControlId) {
        match self {
            Self::Single(first) => {
                let first = *first;
                *self = Self::Group(vec![first, id]);
            }
            Self::Group(members) => members.push(id),
        }
    }

    /// Returns `true` for group entries.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// All controls in the entry, in document order.
    pub fn controls(&self) -> &[ControlId] {
        match self {
            Self::Single(id) => std::slice::from_ref(id),
            Self::Group(members) => members,
        }
    }
}

/// Mapping from declared control name to its [`FieldEntry`].
///
/// Keys enumerate in first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    entries: IndexMap<String, FieldEntry>,
}

impl FieldIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control under `name`.
    pub fn insert(&mut self, name: &str, id: ControlId) {
        self.entries
            .entry(name.to_string())
            .and_modify(|entry| entry.push(id))
            .or_insert(FieldEntry::Single(id));
    }

    /// Look up the entry for a name.
    pub fn get(&self, key: &str) -> Option<&FieldEntry> {
        self.entries.get(key)
    }

    /// Returns `true` if the name is indexed.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Indexed names in first-encounter order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no named control was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walks a control tree and builds a [`FieldIndex`].
pub struct ControlIndexer<'a> {
    tree: &'a ControlTree,
}

impl<'a> ControlIndexer<'a> {
    /// Create an indexer over a tree.
    pub fn new(tree: &'a ControlTree) -> Self {
        Self { tree }
    }

    /// Index every named descendant of `root`.
    ///
    /// `attach` is called once per named control, in the same order the
    /// controls enter the index, with the control's change signal so the
    /// caller can hook it. Children of named controls are still visited.
    pub fn build<F>(&self, root: ControlId, mut attach: F) -> ControlResult<FieldIndex>
    where
        F: FnMut(ControlId, &Arc<Signal<ChangeEvent>>),
    {
        let mut index = FieldIndex::new();
        self.visit_children(root, &mut index, &mut attach)?;
        tracing::debug!(target: "horizon_forms::index", fields = index.len(), "built field index");
        Ok(index)
    }

    fn visit_children<F>(
        &self,
        element: ControlId,
        index: &mut FieldIndex,
        attach: &mut F,
    ) -> ControlResult<()>
    where
        F: FnMut(ControlId, &Arc<Signal<ChangeEvent>>),
    {
        for &child in self.tree.children(element)? {
            if let Some(name) = self.tree.name(child)? {
                tracing::trace!(target: "horizon_forms::index", field = name, id = ?child, "indexing control");
                index.insert(name, child);
                attach(child, &self.tree.change_signal(child)?);
            }
            self.visit_children(child, index, attach)?;
        }
        Ok(())
    }
}
