//! Recursive JSON merge for partial event edits.

use serde_json::Value;

/// Merge `patch` into `base`. Objects merge key by key, recursively;
/// every other value in `patch` replaces the value in `base`.
pub fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                deep_merge(base.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (base, patch) => {
            *base = patch.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_key_by_key() {
        let mut base = json!({
            "Name": "Climbing night",
            "Details": { "DescriptionHtml": "<p>old</p>", "TimeZone": "Pacific" }
        });
        deep_merge(&mut base, &json!({ "Details": { "DescriptionHtml": "<p>new</p>" } }));

        assert_eq!(
            base,
            json!({
                "Name": "Climbing night",
                "Details": { "DescriptionHtml": "<p>new</p>", "TimeZone": "Pacific" }
            })
        );
    }

    #[test]
    fn scalars_and_arrays_are_replaced_wholesale() {
        let mut base = json!({ "Tags": ["a", "b"], "Limit": 10 });
        deep_merge(&mut base, &json!({ "Tags": ["c"], "Limit": 20 }));
        assert_eq!(base, json!({ "Tags": ["c"], "Limit": 20 }));
    }

    #[test]
    fn new_keys_are_added() {
        let mut base = json!({ "Name": "x" });
        deep_merge(&mut base, &json!({ "Location": "Gym" }));
        assert_eq!(base, json!({ "Name": "x", "Location": "Gym" }));
    }
}
