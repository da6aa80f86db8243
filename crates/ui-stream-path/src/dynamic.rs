//! Literal-or-reference values and `${path}` string interpolation.

use serde_json::{Map, Value};

use crate::get::get_by_path;

/// A value that is either a literal or a reference into a data model.
///
/// On the wire a reference is any mapping with a string `path` field;
/// everything else is a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    Literal(Value),
    Path(String),
}

impl DynamicValue {
    pub fn path(path: impl Into<String>) -> Self {
        DynamicValue::Path(path.into())
    }

    pub fn from_json(value: &Value) -> Self {
        match path_reference(value) {
            Some(path) => DynamicValue::Path(path.to_string()),
            None => DynamicValue::Literal(value.clone()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            DynamicValue::Literal(v) => v.clone(),
            DynamicValue::Path(path) => {
                let mut m = Map::new();
                m.insert("path".into(), Value::String(path.clone()));
                Value::Object(m)
            }
        }
    }

    /// Resolves against `data`. `None` means the referenced path is absent.
    pub fn resolve(&self, data: &Value) -> Option<Value> {
        match self {
            DynamicValue::Literal(v) => Some(v.clone()),
            DynamicValue::Path(path) => get_by_path(data, path).cloned(),
        }
    }
}

impl From<Value> for DynamicValue {
    fn from(value: Value) -> Self {
        DynamicValue::from_json(&value)
    }
}

fn path_reference(value: &Value) -> Option<&str> {
    value.as_object()?.get("path")?.as_str()
}

/// Resolves a raw JSON dynamic value against `data`.
///
/// Anything that is not a `{ "path": "..." }` mapping is returned unchanged
/// (scalars, arrays and other mappings alike).
pub fn resolve_dynamic_value(value: &Value, data: &Value) -> Option<Value> {
    match path_reference(value) {
        Some(path) => get_by_path(data, path).cloned(),
        None => Some(value.clone()),
    }
}

/// Replaces every `${path}` placeholder in `template` with the string form
/// of the value found at `path`. Missing and `null` values become empty
/// strings. An unterminated `${` is kept verbatim.
pub fn interpolate_string(template: &str, data: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let path = &after[..end];
        if path.is_empty() {
            out.push_str("${}");
        } else if let Some(v) = get_by_path(data, path) {
            out.push_str(&to_display_string(v));
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Script-style string coercion of a JSON value.
///
/// `null` is the empty string here; interpolation treats it as absent.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => format_float(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(to_display_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Integral floats below `1e21` print in full; larger magnitudes keep the
/// exponent form with an explicit sign (`1e+21`).
fn format_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if f.fract() == 0.0 && f.abs() < 1e21 {
        return format!("{f:.0}");
    }
    let s = serde_json::Number::from_f64(f).map_or_else(|| f.to_string(), |n| n.to_string());
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}
