use serde_json::Value;

use crate::util::{is_valid_index, split_path};

/// Reads the value at `path` (dotted or pointer-style).
///
/// Returns `None` as soon as a segment is missing or the current value
/// cannot be traversed. The empty path yields `obj` itself.
pub fn get_by_path<'a>(obj: &'a Value, path: &str) -> Option<&'a Value> {
    get_in(obj, &split_path(path))
}

/// Reads the value at pre-split `segments`.
pub fn get_in<'a>(obj: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = obj;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            // `-` names the slot `set` appends to, which is the last item afterwards.
            Value::Array(arr) if segment == "-" => arr.last()?,
            Value::Array(arr) => {
                if !is_valid_index(segment) {
                    return None;
                }
                arr.get(segment.parse::<usize>().ok()?)?
            }
            _ => return None,
        };
    }
    Some(current)
}
