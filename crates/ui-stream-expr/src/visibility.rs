//! Visibility conditions.
//!
//! Wire forms:
//!
//! - `true` / `false`
//! - `{ "path": "a.b" }`: truthiness of the data at the path
//! - `{ "auth": "signedIn" | "signedOut" }`
//! - `{ "and": [..] }`, `{ "or": [..] }`, `{ "not": cond }`
//! - `{ "eq" | "neq" | "gt" | "gte" | "lt" | "lte": [lhs, rhs] }` with dynamic operands
//!
//! When a mapping carries several logic keys the first one in the order
//! above wins; the others are ignored.

use serde_json::{Map, Value};
use ui_stream_path::{get_by_path, DynamicValue};

use crate::error::ExprError;
use crate::util::{as_number, is_truthy, loose_equal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthCondition {
    SignedIn,
    SignedOut,
}

impl AuthCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthCondition::SignedIn => "signedIn",
            AuthCondition::SignedOut => "signedOut",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogicExpression {
    And(Vec<VisibilityCondition>),
    Or(Vec<VisibilityCondition>),
    Not(Box<VisibilityCondition>),
    Eq(DynamicValue, DynamicValue),
    Neq(DynamicValue, DynamicValue),
    Gt(DynamicValue, DynamicValue),
    Gte(DynamicValue, DynamicValue),
    Lt(DynamicValue, DynamicValue),
    Lte(DynamicValue, DynamicValue),
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisibilityCondition {
    Bool(bool),
    Path(String),
    Auth(AuthCondition),
    Logic(LogicExpression),
}

/// Authentication facts supplied by the host application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_signed_in: bool,
}

impl AuthState {
    pub fn signed_in() -> Self {
        AuthState { is_signed_in: true }
    }

    pub fn signed_out() -> Self {
        AuthState::default()
    }
}

/// Inputs for evaluating a condition.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityContext<'a> {
    pub auth: &'a AuthState,
    pub data: &'a Value,
}

impl<'a> VisibilityContext<'a> {
    pub fn new(auth: &'a AuthState, data: &'a Value) -> Self {
        VisibilityContext { auth, data }
    }
}

const COMPARISONS: [&str; 6] = ["eq", "neq", "gt", "gte", "lt", "lte"];

impl VisibilityCondition {
    pub fn always() -> Self {
        VisibilityCondition::Bool(true)
    }

    pub fn never() -> Self {
        VisibilityCondition::Bool(false)
    }

    pub fn when(path: impl Into<String>) -> Self {
        VisibilityCondition::Path(path.into())
    }

    pub fn signed_in() -> Self {
        VisibilityCondition::Auth(AuthCondition::SignedIn)
    }

    pub fn signed_out() -> Self {
        VisibilityCondition::Auth(AuthCondition::SignedOut)
    }

    pub fn and(conditions: Vec<VisibilityCondition>) -> Self {
        VisibilityCondition::Logic(LogicExpression::And(conditions))
    }

    pub fn or(conditions: Vec<VisibilityCondition>) -> Self {
        VisibilityCondition::Logic(LogicExpression::Or(conditions))
    }

    pub fn not(condition: VisibilityCondition) -> Self {
        VisibilityCondition::Logic(LogicExpression::Not(Box::new(condition)))
    }

    /// Decodes a condition. A mapping with none of the known keys decodes
    /// to `Bool(false)`.
    pub fn from_json(value: &Value) -> Result<Self, ExprError> {
        match value {
            Value::Bool(b) => Ok(VisibilityCondition::Bool(*b)),
            Value::Object(map) => decode_mapping(map),
            other => Err(ExprError::InvalidCondition(format!(
                "expected boolean or object, got {other}"
            ))),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            VisibilityCondition::Bool(b) => Value::Bool(*b),
            VisibilityCondition::Path(path) => single("path", Value::String(path.clone())),
            VisibilityCondition::Auth(auth) => single("auth", Value::String(auth.as_str().into())),
            VisibilityCondition::Logic(expr) => match expr {
                LogicExpression::And(items) => single("and", encode_list(items)),
                LogicExpression::Or(items) => single("or", encode_list(items)),
                LogicExpression::Not(inner) => single("not", inner.to_json()),
                LogicExpression::Eq(l, r) => single("eq", pair(l, r)),
                LogicExpression::Neq(l, r) => single("neq", pair(l, r)),
                LogicExpression::Gt(l, r) => single("gt", pair(l, r)),
                LogicExpression::Gte(l, r) => single("gte", pair(l, r)),
                LogicExpression::Lt(l, r) => single("lt", pair(l, r)),
                LogicExpression::Lte(l, r) => single("lte", pair(l, r)),
            },
        }
    }
}

fn single(key: &str, value: Value) -> Value {
    let mut m = Map::new();
    m.insert(key.into(), value);
    Value::Object(m)
}

fn encode_list(items: &[VisibilityCondition]) -> Value {
    Value::Array(items.iter().map(VisibilityCondition::to_json).collect())
}

fn pair(l: &DynamicValue, r: &DynamicValue) -> Value {
    Value::Array(vec![l.to_json(), r.to_json()])
}

fn decode_list(key: &str, value: &Value) -> Result<Vec<VisibilityCondition>, ExprError> {
    value
        .as_array()
        .ok_or_else(|| ExprError::InvalidCondition(format!("{key} must be an array")))?
        .iter()
        .map(VisibilityCondition::from_json)
        .collect()
}

fn decode_pair(key: &str, value: &Value) -> Result<(DynamicValue, DynamicValue), ExprError> {
    match value.as_array().map(Vec::as_slice) {
        Some([l, r]) => Ok((DynamicValue::from_json(l), DynamicValue::from_json(r))),
        _ => Err(ExprError::InvalidCondition(format!(
            "{key} must be a two-element array"
        ))),
    }
}

fn decode_mapping(map: &Map<String, Value>) -> Result<VisibilityCondition, ExprError> {
    if let Some(Value::String(path)) = map.get("path") {
        return Ok(VisibilityCondition::Path(path.clone()));
    }
    if let Some(auth) = map.get("auth") {
        return match auth.as_str() {
            Some("signedIn") => Ok(VisibilityCondition::signed_in()),
            Some("signedOut") => Ok(VisibilityCondition::signed_out()),
            _ => Err(ExprError::InvalidCondition(format!("unknown auth state: {auth}"))),
        };
    }
    if let Some(items) = map.get("and") {
        return Ok(VisibilityCondition::and(decode_list("and", items)?));
    }
    if let Some(items) = map.get("or") {
        return Ok(VisibilityCondition::or(decode_list("or", items)?));
    }
    if let Some(inner) = map.get("not") {
        return Ok(VisibilityCondition::not(VisibilityCondition::from_json(inner)?));
    }
    for key in COMPARISONS {
        let Some(operands) = map.get(key) else {
            continue;
        };
        let (l, r) = decode_pair(key, operands)?;
        let expr = match key {
            "eq" => LogicExpression::Eq(l, r),
            "neq" => LogicExpression::Neq(l, r),
            "gt" => LogicExpression::Gt(l, r),
            "gte" => LogicExpression::Gte(l, r),
            "lt" => LogicExpression::Lt(l, r),
            _ => LogicExpression::Lte(l, r),
        };
        return Ok(VisibilityCondition::Logic(expr));
    }
    Ok(VisibilityCondition::Bool(false))
}

/// Evaluates `condition` against the auth state and data model in `ctx`.
pub fn evaluate_visibility(condition: &VisibilityCondition, ctx: &VisibilityContext<'_>) -> bool {
    match condition {
        VisibilityCondition::Bool(b) => *b,
        VisibilityCondition::Path(path) => is_truthy(get_by_path(ctx.data, path)),
        VisibilityCondition::Auth(AuthCondition::SignedIn) => ctx.auth.is_signed_in,
        VisibilityCondition::Auth(AuthCondition::SignedOut) => !ctx.auth.is_signed_in,
        VisibilityCondition::Logic(expr) => evaluate_logic(expr, ctx),
    }
}

fn evaluate_logic(expr: &LogicExpression, ctx: &VisibilityContext<'_>) -> bool {
    match expr {
        LogicExpression::And(items) => items.iter().all(|c| evaluate_visibility(c, ctx)),
        LogicExpression::Or(items) => items.iter().any(|c| evaluate_visibility(c, ctx)),
        LogicExpression::Not(inner) => !evaluate_visibility(inner, ctx),
        LogicExpression::Eq(l, r) => operands_equal(l, r, ctx.data),
        LogicExpression::Neq(l, r) => !operands_equal(l, r, ctx.data),
        LogicExpression::Gt(l, r) => compare(l, r, ctx.data, |a, b| a > b),
        LogicExpression::Gte(l, r) => compare(l, r, ctx.data, |a, b| a >= b),
        LogicExpression::Lt(l, r) => compare(l, r, ctx.data, |a, b| a < b),
        LogicExpression::Lte(l, r) => compare(l, r, ctx.data, |a, b| a <= b),
    }
}

fn operands_equal(l: &DynamicValue, r: &DynamicValue, data: &Value) -> bool {
    match (l.resolve(data), r.resolve(data)) {
        (None, None) => true,
        (Some(a), Some(b)) => loose_equal(&a, &b),
        _ => false,
    }
}

fn compare(l: &DynamicValue, r: &DynamicValue, data: &Value, op: fn(f64, f64) -> bool) -> bool {
    let a = as_number(l.resolve(data).as_ref());
    let b = as_number(r.resolve(data).as_ref());
    match (a, b) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

/// Visibility of an element given its raw `visible` field.
///
/// An absent or malformed condition counts as visible, so a condition that
/// is still streaming in never hides content.
pub fn is_visible(condition: Option<&Value>, ctx: &VisibilityContext<'_>) -> bool {
    let Some(raw) = condition else {
        return true;
    };
    match VisibilityCondition::from_json(raw) {
        Ok(cond) => evaluate_visibility(&cond, ctx),
        Err(err) => {
            tracing::trace!(error = %err, "ignoring malformed visibility condition");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(cond: Value, signed_in: bool, data: Value) -> bool {
        let auth = AuthState {
            is_signed_in: signed_in,
        };
        let cond = VisibilityCondition::from_json(&cond).unwrap();
        evaluate_visibility(&cond, &VisibilityContext::new(&auth, &data))
    }

    #[test]
    fn auth_state_constructors() {
        assert!(AuthState::signed_in().is_signed_in);
        assert_eq!(AuthState::signed_out(), AuthState::default());
        assert!(!AuthState::signed_out().is_signed_in);
    }

    #[test]
    fn booleans() {
        assert!(eval(json!(true), false, json!({})));
        assert!(!eval(json!(false), true, json!({})));
    }

    #[test]
    fn path_truthiness() {
        let data = json!({"show": 1, "hide": "", "flag": {"on": true}});
        assert!(eval(json!({"path": "show"}), false, data.clone()));
        assert!(!eval(json!({"path": "hide"}), false, data.clone()));
        assert!(eval(json!({"path": "flag.on"}), false, data.clone()));
        assert!(!eval(json!({"path": "missing"}), false, data));
    }

    #[test]
    fn auth_states() {
        assert!(eval(json!({"auth": "signedIn"}), true, json!({})));
        assert!(!eval(json!({"auth": "signedIn"}), false, json!({})));
        assert!(eval(json!({"auth": "signedOut"}), false, json!({})));
        assert!(!eval(json!({"auth": "signedOut"}), true, json!({})));
    }

    #[test]
    fn empty_and_or() {
        assert!(eval(json!({"and": []}), false, json!({})));
        assert!(!eval(json!({"or": []}), false, json!({})));
    }

    #[test]
    fn and_wins_over_or_and_not() {
        let cond = json!({"and": [true], "or": [false], "not": true});
        assert!(eval(cond, false, json!({})));
        let cond = json!({"or": [false], "not": false});
        assert!(!eval(cond, false, json!({})));
    }

    #[test]
    fn comparisons() {
        let data = json!({"count": 5, "name": "x"});
        assert!(eval(json!({"eq": [{"path": "name"}, "x"]}), false, data.clone()));
        assert!(eval(json!({"neq": [{"path": "name"}, "y"]}), false, data.clone()));
        assert!(eval(json!({"gt": [{"path": "count"}, 3]}), false, data.clone()));
        assert!(eval(json!({"gte": [{"path": "count"}, 5.0]}), false, data.clone()));
        assert!(!eval(json!({"lt": [{"path": "count"}, 5]}), false, data.clone()));
        assert!(eval(json!({"lte": [{"path": "count"}, 5]}), false, data.clone()));
        assert!(!eval(json!({"gt": [{"path": "name"}, 1]}), false, data.clone()));
        assert!(eval(json!({"eq": [{"path": "a"}, {"path": "b"}]}), false, data));
    }

    #[test]
    fn unknown_mapping_is_false() {
        assert!(!eval(json!({}), true, json!({})));
        assert!(!eval(json!({"xor": [true]}), true, json!({})));
    }

    #[test]
    fn malformed_conditions() {
        assert!(VisibilityCondition::from_json(&json!("yes")).is_err());
        assert!(VisibilityCondition::from_json(&json!({"and": true})).is_err());
        assert!(VisibilityCondition::from_json(&json!({"auth": "maybe"})).is_err());
        assert!(VisibilityCondition::from_json(&json!({"eq": [1]})).is_err());
    }

    #[test]
    fn is_visible_defaults_to_true() {
        let auth = AuthState::signed_out();
        let data = json!({});
        let ctx = VisibilityContext::new(&auth, &data);
        assert!(is_visible(None, &ctx));
        assert!(is_visible(Some(&json!("garbage")), &ctx));
        assert!(!is_visible(Some(&json!({"auth": "signedIn"})), &ctx));
    }

    #[test]
    fn encode_decode() {
        let cond = VisibilityCondition::and(vec![
            VisibilityCondition::when("a.b"),
            VisibilityCondition::not(VisibilityCondition::signed_out()),
            VisibilityCondition::Logic(LogicExpression::Gt(
                DynamicValue::path("n"),
                DynamicValue::Literal(json!(2)),
            )),
        ]);
        let encoded = cond.to_json();
        assert_eq!(
            encoded,
            json!({"and": [{"path": "a.b"}, {"not": {"auth": "signedOut"}}, {"gt": [{"path": "n"}, 2]}]})
        );
        assert_eq!(VisibilityCondition::from_json(&encoded).unwrap(), cond);
    }
}
