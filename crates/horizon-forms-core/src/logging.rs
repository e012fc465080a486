//! Logging and debugging facilities for Horizon Forms.
//!
//! This module provides:
//! - Target names for filtering the `tracing` output of each subsystem
//! - Debug visualization for control trees
//!
//! # Tracing Integration
//!
//! Horizon Forms uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_forms=debug,horizon_forms_core=trace")
//!         .init();
//! }
//! ```
//!
//! # Debug Visualization
//!
//! ```
//! use horizon_forms_core::{ControlTreeDebug, Element, SharedControlTree};
//!
//! let tree = SharedControlTree::new();
//! let form = tree.insert_root(Element::form());
//! tree.append(form, Element::text("email")).unwrap();
//!
//! let dump = ControlTreeDebug::new().format_subtree(&tree, form).unwrap();
//! assert!(dump.contains("email"));
//! ```

use std::fmt::Write as FmtWrite;

use crate::control::{ControlId, ControlTree, SharedControlTree};
use crate::error::ControlResult;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_forms_core::signal";
    /// Control tree target.
    pub const CONTROL: &str = "horizon_forms_core::control";
    /// Form proxy target.
    pub const PROXY: &str = "horizon_forms::proxy";
    /// Control indexing target.
    pub const INDEX: &str = "horizon_forms::index";
    /// Controller wiring target.
    pub const CONTROLLER: &str = "horizon_forms::controller";
    /// Model target.
    pub const MODEL: &str = "horizon_forms::model";
}

/// Configuration for control tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// Whether to show control IDs.
    pub show_ids: bool,
    /// Whether to show element kinds.
    pub show_kinds: bool,
    /// Whether to show values and checked state.
    pub show_values: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            show_ids: false,
            show_kinds: true,
            show_values: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output (names only).
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_kinds: false,
            show_values: false,
            ..Default::default()
        }
    }

    /// Limit the traversal depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Debug utility for visualizing control trees.
#[derive(Debug, Clone, Default)]
pub struct ControlTreeDebug {
    options: TreeFormatOptions,
}

impl ControlTreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format a subtree starting from a specific control.
    pub fn format_subtree(&self, tree: &SharedControlTree, root: ControlId) -> ControlResult<String> {
        tree.with_read(|tree| {
            let mut output = String::new();
            self.format_into(tree, root, 0, &mut output)?;
            Ok(output)
        })
    }

    fn format_into(
        &self,
        tree: &ControlTree,
        id: ControlId,
        depth: usize,
        output: &mut String,
    ) -> ControlResult<()> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        let indent = " ".repeat(depth * self.options.indent_size);
        let kind = tree.element_kind(id)?;
        let name = tree.name(id)?.unwrap_or("(unnamed)");

        let mut line = format!("{indent}{name}");
        if self.options.show_kinds {
            let _ = write!(line, " <{}>", kind.describe());
        }
        if self.options.show_values {
            if let Some(value) = tree.value(id)? {
                let _ = write!(line, " value={value:?}");
            }
            if tree.control_kind(id)?.is_checkable() {
                let _ = write!(line, " checked={}", tree.is_checked(id)?);
            }
        }
        if self.options.show_ids {
            let _ = write!(line, " [{id:?}]");
        }
        output.push_str(&line);
        output.push('\n');

        for &child in tree.children(id)? {
            self.format_into(tree, child, depth + 1, output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Element;

    fn sample() -> (SharedControlTree, ControlId) {
        let tree = SharedControlTree::new();
        let form = tree.insert_root(Element::form());
        let set = tree.append(form, Element::fieldset()).unwrap();
        tree.append(set, Element::text("first").with_value("Ryan"))
            .unwrap();
        tree.append(form, Element::checkbox("agree", "yes").with_checked(true))
            .unwrap();
        (tree, form)
    }

    #[test]
    fn test_format_subtree_default() {
        let (tree, form) = sample();
        let dump = ControlTreeDebug::new().format_subtree(&tree, form).unwrap();

        assert_eq!(
            dump,
            "(unnamed) <form>\n\
             \x20 (unnamed) <fieldset>\n\
             \x20   first <input[type=text]> value=\"Ryan\"\n\
             \x20 agree <input[type=checkbox]> value=\"yes\" checked=true\n"
        );
    }

    #[test]
    fn test_format_subtree_minimal_with_depth_limit() {
        let (tree, form) = sample();
        let options = TreeFormatOptions::minimal().with_max_depth(1);
        let dump = ControlTreeDebug::with_options(options)
            .format_subtree(&tree, form)
            .unwrap();

        assert_eq!(dump, "(unnamed)\n  (unnamed)\n  agree\n");
    }
}
