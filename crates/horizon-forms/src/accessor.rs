//! Kind-aware reads and writes of indexed fields.

use horizon_forms_core::{ControlKind, ControlResult, ControlTree};
use serde_json::Value;

use crate::index::FieldEntry;
use crate::value::{accepted_values, display_value, is_truthy};

/// Read the current value of a field.
///
/// - Group: the values of the checked checkboxes in document order. A checked
///   radio button short-circuits and its value alone is returned. With no
///   checked radio the (possibly empty) checkbox list is returned, even for
///   a pure radio group.
/// - Single control: its value as a string, or `null` for elements that
///   carry no value.
pub fn read(tree: &ControlTree, entry: &FieldEntry) -> ControlResult<Value> {
    match entry {
        FieldEntry::Group(members) => {
            let mut checked_values = Vec::new();
            for &member in members {
                let kind = tree.control_kind(member)?;
                if !kind.is_checkable() || !tree.is_checked(member)? {
                    continue;
                }
                let value = tree.value(member)?.unwrap_or_default().to_string();
                match kind {
                    ControlKind::Checkbox => checked_values.push(Value::String(value)),
                    _ => return Ok(Value::String(value)),
                }
            }
            Ok(Value::Array(checked_values))
        }
        FieldEntry::Single(id) => Ok(tree
            .value(*id)?
            .map_or(Value::Null, |v| Value::String(v.to_string()))),
    }
}

/// Write a value into a field.
///
/// - Group: every member whose value is in the accepted set is checked and
///   every other member unchecked. A scalar is a one-element set. Only
///   string values are ever members; see [`accepted_values`].
/// - Single checkbox: checked from the value's truthiness.
/// - Single file picker: ignored.
/// - Anything else: the value's text is assigned.
pub fn write(tree: &mut ControlTree, entry: &FieldEntry, value: &Value) -> ControlResult<()> {
    match entry {
        FieldEntry::Group(members) => {
            let accepted = accepted_values(value);
            for &member in members {
                let checked = tree
                    .value(member)?
                    .is_some_and(|own| accepted.contains(&own));
                tree.set_checked(member, checked)?;
            }
            Ok(())
        }
        FieldEntry::Single(id) => match tree.control_kind(*id)? {
            ControlKind::Checkbox => tree.set_checked(*id, is_truthy(value)),
            ControlKind::File => {
                tracing::trace!(target: "horizon_forms::proxy", id = ?id, "ignoring write to file control");
                Ok(())
            }
            _ => tree.set_value(*id, &display_value(value)),
        },
    }
}
