//! JSON codec for patches.
//!
//! Wire shape: `{"op": "add"|"set"|"replace"|"remove", "path": "<pointer>", "value"?: any}`.
//! Unknown extra fields are ignored.

use serde_json::{Map, Value};

use crate::patch::types::{Patch, PatchError, PatchOp};

/// Decode a patch from a JSON value.
pub fn from_json(v: &Value) -> Result<Patch, PatchError> {
    let map = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidPatch("patch must be an object".into()))?;
    let op = map
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::InvalidOp("op must be a string".into()))?;
    let op = PatchOp::from_str(op)?;
    let path = map
        .get("path")
        .and_then(Value::as_str)
        .ok_or(PatchError::InvalidPath)?;
    Ok(Patch {
        op,
        path: path.to_string(),
        value: map.get("value").cloned(),
    })
}

/// Decode a patch from one line of text.
pub fn from_json_str(line: &str) -> Result<Patch, PatchError> {
    let v: Value =
        serde_json::from_str(line).map_err(|e| PatchError::InvalidPatch(e.to_string()))?;
    from_json(&v)
}

/// Encode a patch as a JSON value.
pub fn to_json(patch: &Patch) -> Value {
    let mut m = Map::new();
    m.insert("op".into(), Value::String(patch.op.as_str().into()));
    m.insert("path".into(), Value::String(patch.path.clone()));
    if let Some(value) = &patch.value {
        m.insert("value".into(), value.clone());
    }
    Value::Object(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_each_op() {
        let p = from_json(&json!({"op": "add", "path": "/elements/a", "value": {"key": "a"}})).unwrap();
        assert_eq!(p, Patch::add("/elements/a", json!({"key": "a"})));
        let p = from_json(&json!({"op": "remove", "path": "/elements/a"})).unwrap();
        assert_eq!(p, Patch::remove("/elements/a"));
        let p = from_json(&json!({"op": "set", "path": "/root", "value": "a"})).unwrap();
        assert_eq!(p.op, PatchOp::Set);
        let p = from_json(&json!({"op": "replace", "path": "/root", "value": "b", "extra": 1})).unwrap();
        assert_eq!(p.op, PatchOp::Replace);
    }

    #[test]
    fn keeps_missing_value_absent() {
        let p = from_json(&json!({"op": "add", "path": "/elements/a"})).unwrap();
        assert_eq!(p.value, None);
        let p = from_json(&json!({"op": "set", "path": "/root", "value": null})).unwrap();
        assert_eq!(p.value, Some(Value::Null));
    }

    #[test]
    fn rejects_non_patches() {
        assert!(from_json(&json!(42)).is_err());
        assert!(from_json(&json!({"path": "/root"})).is_err());
        assert!(from_json(&json!({"op": "copy", "path": "/root"})).is_err());
        assert_eq!(from_json(&json!({"op": "add", "path": 1})), Err(PatchError::InvalidPath));
        assert!(from_json_str("{\"op\":").is_err());
    }

    #[test]
    fn encodes() {
        assert_eq!(
            to_json(&Patch::set("/root", json!("x"))),
            json!({"op": "set", "path": "/root", "value": "x"})
        );
        assert_eq!(to_json(&Patch::remove("/elements/x")), json!({"op": "remove", "path": "/elements/x"}));
    }
}
