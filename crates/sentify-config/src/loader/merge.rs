//! Recursive merge of config layers.

use serde_json::Value;

/// Apply `layer` on top of `base`: objects merge per key, any other value replaces.
pub(super) fn overlay(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::overlay;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_and_scalars_replace() {
        let mut base = json!({ "store": { "path": "a.db", "busy_timeout_ms": 10 } });
        overlay(&mut base, json!({ "store": { "path": "b.db" }, "server": { "port": 9 } }));
        assert_eq!(
            base,
            json!({
                "store": { "path": "b.db", "busy_timeout_ms": 10 },
                "server": { "port": 9 }
            })
        );
    }

    #[test]
    fn null_clears_an_inherited_limit() {
        let mut base = json!({ "ingestion": { "max_comment_chars": 500 } });
        overlay(&mut base, json!({ "ingestion": { "max_comment_chars": null } }));
        assert_eq!(base, json!({ "ingestion": { "max_comment_chars": null } }));
    }

    #[test]
    fn object_replaces_scalar() {
        let mut base = json!({ "classifier": 1 });
        overlay(&mut base, json!({ "classifier": { "extra_words": {} } }));
        assert_eq!(base, json!({ "classifier": { "extra_words": {} } }));
    }
}
