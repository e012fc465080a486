//! Models that forms bind to.
//!
//! The controller only needs three things from a model: a snapshot of its
//! data, a way to write one field, and a notification when something changed.
//! That contract is the [`Model`] trait. [`FormModel`] is an in-memory
//! implementation backed by a JSON tree.

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use horizon_forms_core::Signal;

use crate::error::FormResult;
use crate::path;

/// A path-addressable data holder with change notification.
pub trait Model: Send + Sync + 'static {
    /// A snapshot of the full data tree.
    fn data(&self) -> Value;

    /// Write `value` at the dot-delimited path `key`.
    fn set(&self, key: &str, value: Value);

    /// Signal emitted after every write. The argument is the written key.
    fn changed(&self) -> &Signal<String>;
}

/// In-memory model backed by a JSON object tree.
///
/// # Example
///
/// ```
/// use horizon_forms::FormModel;
/// use serde_json::json;
///
/// let model = FormModel::new();
/// model.set("name.first", "Ryan");
/// model.set("age", 30);
///
/// assert_eq!(model.get("name.first"), Some(json!("Ryan")));
/// assert_eq!(model.get_deserialized::<u32>("age"), Some(30));
/// assert!(!model.contains("name.last"));
/// ```
pub struct FormModel {
    /// The root data store. Always an object after the first write.
    data: RwLock<Value>,
    /// Signal emitted when a value changes. The argument is the key path.
    changed: Signal<String>,
}

impl Default for FormModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FormModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }

    /// Creates a model holding `data`.
    pub fn from_value(data: Value) -> Self {
        Self {
            data: RwLock::new(data),
            changed: Signal::new(),
        }
    }

    /// Creates a model from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Serialization`](crate::FormError::Serialization)
    /// if `value` cannot be represented as JSON.
    pub fn from_serializable<T: Serialize>(value: &T) -> FormResult<Self> {
        Ok(Self::from_value(serde_json::to_value(value)?))
    }

    /// Returns a reference to the changed signal.
    pub fn changed(&self) -> &Signal<String> {
        &self.changed
    }

    /// A snapshot of the full data tree.
    pub fn data(&self) -> Value {
        self.data.read().clone()
    }

    /// Gets the value at a dot-delimited path.
    pub fn get(&self, key: &str) -> Option<Value> {
        path::resolve(&self.data.read(), key).cloned()
    }

    /// Gets the value at a path using serde deserialization.
    ///
    /// Returns `None` if the path is absent or the value does not
    /// deserialize into `T`.
    pub fn get_deserialized<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        serde_json::from_value(value).ok()
    }

    /// Returns true if a value exists at the path.
    pub fn contains(&self, key: &str) -> bool {
        path::resolve(&self.data.read(), key).is_some()
    }

    /// Sets a value at a dot-delimited path.
    ///
    /// Intermediate objects are created as needed, replacing any non-object
    /// value in the way. Emits [`changed`](Self::changed) once the write is
    /// done.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        let parts = parse_path(key);
        if parts.is_empty() {
            return;
        }

        let value = value.into();
        tracing::trace!(target: "horizon_forms::model", key, value = %value, "model write");
        {
            let mut data = self.data.write();
            set_nested(&mut data, &parts, value);
        }

        self.changed.emit(key.to_string());
    }

    /// Sets a value at a path using serde serialization.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Serialization`](crate::FormError::Serialization)
    /// if `value` cannot be represented as JSON.
    pub fn set_serialized<T: Serialize>(&self, key: &str, value: &T) -> FormResult<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, value);
        Ok(())
    }

    /// Removes the value at a path, returning it if it existed.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let parts = parse_path(key);
        if parts.is_empty() {
            return None;
        }

        let removed = {
            let mut data = self.data.write();
            remove_nested(&mut data, &parts)
        };

        if removed.is_some() {
            tracing::trace!(target: "horizon_forms::model", key, "model remove");
            self.changed.emit(key.to_string());
        }
        removed
    }
}

impl Model for FormModel {
    fn data(&self) -> Value {
        FormModel::data(self)
    }

    fn set(&self, key: &str, value: Value) {
        FormModel::set(self, key, value);
    }

    fn changed(&self) -> &Signal<String> {
        &self.changed
    }
}

impl std::fmt::Debug for FormModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormModel")
            .field("data", &*self.data.read())
            .field("listeners", &self.changed.connection_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(FormModel: Send, Sync);

fn parse_path(key: &str) -> Vec<&str> {
    key.split('.').filter(|s| !s.is_empty()).collect()
}

/// Sets a nested value, creating intermediate objects.
fn set_nested(data: &mut Value, parts: &[&str], value: Value) {
    let Some((first, rest)) = parts.split_first() else {
        *data = value;
        return;
    };

    if !data.is_object() {
        *data = Value::Object(Map::new());
    }
    if let Value::Object(map) = data {
        let entry = map.entry(*first).or_insert(Value::Null);
        set_nested(entry, rest, value);
    }
}

fn remove_nested(data: &mut Value, parts: &[&str]) -> Option<Value> {
    let (last, parents) = parts.split_last()?;
    let mut current = data;
    for part in parents {
        current = current.as_object_mut()?.get_mut(*part)?;
    }
    current.as_object_mut()?.remove(*last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_set_creates_intermediate_objects() {
        let model = FormModel::new();
        model.set("name.first", "Ryan");
        model.set("name.last", "Dahl");

        assert_eq!(model.data(), json!({ "name": { "first": "Ryan", "last": "Dahl" } }));
    }

    #[test]
    fn test_set_replaces_non_object_intermediate() {
        let model = FormModel::from_value(json!({ "name": "Ryan" }));
        model.set("name.first", "Ryan");
        assert_eq!(model.get("name"), Some(json!({ "first": "Ryan" })));
    }

    #[test]
    fn test_non_object_root_is_replaced() {
        let model = FormModel::from_value(json!([1, 2]));
        model.set("a", 1);
        assert_eq!(model.data(), json!({ "a": 1 }));
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let model = FormModel::new();
        let hits = Arc::new(Mutex::new(0));
        let counter = hits.clone();
        model.changed().connect(move |_| *counter.lock() += 1);

        model.set("", "x");
        model.set("..", "x");

        assert_eq!(model.data(), json!({}));
        assert_eq!(*hits.lock(), 0);
    }

    #[test]
    fn test_changed_reports_key() {
        let model = FormModel::new();
        let keys = Arc::new(Mutex::new(Vec::new()));
        let sink = keys.clone();
        model.changed().connect(move |key: &String| sink.lock().push(key.clone()));

        model.set("seasons", json!(["spring"]));
        model.remove("seasons");
        model.remove("seasons");

        assert_eq!(*keys.lock(), vec!["seasons", "seasons"]);
    }

    #[test]
    fn test_get_and_contains() {
        let model = FormModel::from_value(json!({ "tags": ["a", "b"], "flag": null }));

        assert_eq!(model.get("tags.1"), Some(json!("b")));
        assert_eq!(model.get("flag"), Some(Value::Null));
        assert!(model.contains("flag"));
        assert!(!model.contains("tags.2"));
        assert_eq!(model.get("missing.deeper"), None);
    }

    #[test]
    fn test_remove_nested() {
        let model = FormModel::from_value(json!({ "name": { "first": "Ryan", "last": "Dahl" } }));

        assert_eq!(model.remove("name.first"), Some(json!("Ryan")));
        assert_eq!(model.remove("name.middle"), None);
        assert_eq!(model.remove("name.last.deeper"), None);
        assert_eq!(model.data(), json!({ "name": { "last": "Dahl" } }));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        email: String,
        seasons: Vec<String>,
    }

    #[test]
    fn test_serde_roundtrip() {
        let profile = Profile {
            email: "ryan@example.com".into(),
            seasons: vec!["fall".into()],
        };
        let model = FormModel::from_serializable(&profile).unwrap();
        assert_eq!(model.get("email"), Some(json!("ryan@example.com")));

        model.set_serialized("seasons", &["spring", "fall"]).unwrap();
        let loaded: Profile = serde_json::from_value(model.data()).unwrap();
        assert_eq!(loaded.seasons, vec!["spring", "fall"]);
        assert_eq!(model.get_deserialized::<u32>("email"), None);
    }

    #[test]
    fn test_model_trait_object() {
        let model: Arc<dyn Model> = Arc::new(FormModel::new());
        model.set("a.b", json!(true));
        assert_eq!(model.data(), json!({ "a": { "b": true } }));
    }
}
