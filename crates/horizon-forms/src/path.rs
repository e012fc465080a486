//! Dot-delimited path resolution against nested data.

use serde_json::Value;

/// Resolve a dot-delimited key such as `"name.first"` against nested data.
///
/// Each segment is a member access: an object key, or an element index when
/// the current value is an array. Returns `None` as soon as a segment is
/// absent. A present `null` is a resolved value, not an absence.
///
/// # Example
///
/// ```
/// use horizon_forms::path::resolve;
/// use serde_json::json;
///
/// let data = json!({ "name": { "first": "Ryan" }, "seasons": ["spring"] });
/// assert_eq!(resolve(&data, "name.first"), Some(&json!("Ryan")));
/// assert_eq!(resolve(&data, "seasons.0"), Some(&json!("spring")));
/// assert_eq!(resolve(&data, "name.middle"), None);
/// ```
pub fn resolve<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_top_level_and_nested() {
        let data = json!({ "a": 1, "name": { "first": "Ryan", "last": "VanGundy" } });
        assert_eq!(resolve(&data, "a"), Some(&json!(1)));
        assert_eq!(resolve(&data, "name"), Some(&json!({ "first": "Ryan", "last": "VanGundy" })));
        assert_eq!(resolve(&data, "name.last"), Some(&json!("VanGundy")));
    }

    #[test]
    fn test_missing_segments_are_absent() {
        let data = json!({ "name": { "first": "Ryan" }, "age": 30 });
        assert_eq!(resolve(&data, "unknown"), None);
        assert_eq!(resolve(&data, "unknown.deeper"), None);
        assert_eq!(resolve(&data, "age.years"), None);
        assert_eq!(resolve(&json!("scalar"), "a"), None);
    }

    #[test]
    fn test_null_is_resolved() {
        let data = json!({ "nickname": null });
        assert_eq!(resolve(&data, "nickname"), Some(&Value::Null));
    }

    #[test]
    fn test_array_segments() {
        let data = json!({ "seasons": ["spring", "summer"] });
        assert_eq!(resolve(&data, "seasons.1"), Some(&json!("summer")));
        assert_eq!(resolve(&data, "seasons.2"), None);
        assert_eq!(resolve(&data, "seasons.first"), None);
    }
}
