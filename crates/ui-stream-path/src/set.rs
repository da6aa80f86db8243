use serde_json::{Map, Value};

use crate::util::{is_valid_index, split_path};

/// Largest run of `null` padding `set` will insert to reach an array index.
/// Indices further out are treated as object keys.
pub const MAX_ARRAY_GAP: usize = 1024;

/// Writes `value` at `path` (dotted or pointer-style), mutating `obj` in place.
///
/// Missing intermediate containers are created as empty mappings, and
/// intermediates that cannot be traversed are replaced by one. Callers that
/// need the original untouched must clone first.
pub fn set_by_path(obj: &mut Value, path: &str, value: Value) {
    set_in(obj, &split_path(path), value);
}

/// Writes `value` at pre-split `segments`. No segments replaces `obj`.
pub fn set_in(obj: &mut Value, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        *obj = value;
        return;
    };
    let mut current = obj;
    for segment in parents {
        current = child_slot(current, segment);
    }
    *child_slot(current, last) = value;
}

fn array_index(len: usize, segment: &str) -> Option<usize> {
    if segment == "-" {
        return Some(len);
    }
    if !is_valid_index(segment) {
        return None;
    }
    let idx = segment.parse::<usize>().ok()?;
    (idx <= len.saturating_add(MAX_ARRAY_GAP)).then_some(idx)
}

fn child_slot<'a>(current: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = match &*current {
        Value::Array(arr) => array_index(arr.len(), segment),
        _ => None,
    };
    if index.is_none() && !current.is_object() {
        *current = Value::Object(Map::new());
    }
    match current {
        Value::Array(arr) => {
            let idx = index.unwrap_or(arr.len());
            if idx >= arr.len() {
                arr.resize(idx + 1, Value::Null);
            }
            &mut arr[idx]
        }
        Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::get::get_by_path;
    use serde_json::json;

    #[test]
    fn creates_intermediates() {
        let mut doc = json!({});
        set_by_path(&mut doc, "a.b.c", json!(1));
        assert_eq!(doc, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn preserves_siblings() {
        let mut doc = json!({"a": {"x": true}});
        set_by_path(&mut doc, "a.y", json!(false));
        assert_eq!(doc, json!({"a": {"x": true, "y": false}}));
    }

    #[test]
    fn pointer_style_into_element() {
        let mut el = json!({"key": "k", "type": "Text", "props": {"content": "a"}});
        set_by_path(&mut el, "/props/content", json!("b"));
        assert_eq!(el["props"]["content"], json!("b"));
        assert_eq!(el["key"], json!("k"));
    }

    #[test]
    fn replaces_scalar_intermediate() {
        let mut doc = json!({"a": 5});
        set_by_path(&mut doc, "a.b", json!("x"));
        assert_eq!(doc, json!({"a": {"b": "x"}}));
    }

    #[test]
    fn replaces_scalar_root() {
        let mut doc = json!("text");
        set_by_path(&mut doc, "a", json!(1));
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn array_index_replace_and_append() {
        let mut doc = json!({"children": ["a", "b"]});
        set_by_path(&mut doc, "/children/1", json!("z"));
        set_by_path(&mut doc, "/children/2", json!("c"));
        set_by_path(&mut doc, "/children/-", json!("d"));
        assert_eq!(doc, json!({"children": ["a", "z", "c", "d"]}));
    }

    #[test]
    fn dash_append_reads_back() {
        let mut doc = json!({"a": [1]});
        set_by_path(&mut doc, "a.-", json!("v"));
        assert_eq!(doc, json!({"a": [1, "v"]}));
        assert_eq!(get_by_path(&doc, "a.-"), Some(&json!("v")));

        set_by_path(&mut doc, "a.-.b", json!(true));
        assert_eq!(get_by_path(&doc, "a.-.b"), Some(&json!(true)));
        assert_eq!(doc, json!({"a": [1, "v", {"b": true}]}));
    }

    #[test]
    fn array_index_pads_with_null() {
        let mut doc = json!([]);
        set_by_path(&mut doc, "2", json!(true));
        assert_eq!(doc, json!([null, null, true]));
    }

    #[test]
    fn far_index_becomes_key() {
        let mut doc = json!([1]);
        set_by_path(&mut doc, "100000", json!(true));
        assert_eq!(doc, json!({"100000": true}));
        assert_eq!(get_by_path(&doc, "100000"), Some(&json!(true)));
    }

    #[test]
    fn non_index_on_array_becomes_key() {
        let mut doc = json!({"list": [1, 2]});
        set_by_path(&mut doc, "list.name", json!("n"));
        assert_eq!(doc, json!({"list": {"name": "n"}}));
    }

    #[test]
    fn empty_path_replaces_value() {
        let mut doc = json!({"a": 1});
        set_by_path(&mut doc, "", json!([1]));
        assert_eq!(doc, json!([1]));
    }
}
