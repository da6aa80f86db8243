//! Action descriptors and their resolution against a data model.

use serde_json::{Map, Value};
use ui_stream_path::{interpolate_string, resolve_dynamic_value};

use crate::error::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmVariant {
    #[default]
    Default,
    Danger,
}

impl ConfirmVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmVariant::Default => "default",
            ConfirmVariant::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionConfirm {
    pub title: String,
    pub message: String,
    pub confirm_label: Option<String>,
    pub cancel_label: Option<String>,
    pub variant: Option<ConfirmVariant>,
}

/// Follow-up after the action's side effect succeeds.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOnSuccess {
    Navigate(String),
    Set(Map<String, Value>),
    Action(String),
}

/// Follow-up after the action's side effect fails.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOnError {
    Set(Map<String, Value>),
    Action(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    /// Raw dynamic values, resolved by [`resolve_action`].
    pub params: Map<String, Value>,
    pub confirm: Option<ActionConfirm>,
    pub on_success: Option<ActionOnSuccess>,
    pub on_error: Option<ActionOnError>,
}

/// An action with its parameters bound to concrete values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAction {
    pub name: String,
    pub params: Map<String, Value>,
    pub confirm: Option<ActionConfirm>,
    pub on_success: Option<ActionOnSuccess>,
    pub on_error: Option<ActionOnError>,
}

impl ResolvedAction {
    pub fn requires_confirmation(&self) -> bool {
        self.confirm.is_some()
    }

    pub fn to_json(&self) -> Value {
        let mut m = Map::new();
        m.insert("name".into(), Value::String(self.name.clone()));
        m.insert("params".into(), Value::Object(self.params.clone()));
        if let Some(confirm) = &self.confirm {
            m.insert("confirm".into(), confirm.to_json());
        }
        if let Some(on_success) = &self.on_success {
            m.insert("onSuccess".into(), on_success.to_json());
        }
        if let Some(on_error) = &self.on_error {
            m.insert("onError".into(), on_error.to_json());
        }
        Value::Object(m)
    }
}

fn invalid(msg: impl Into<String>) -> ExprError {
    ExprError::InvalidAction(msg.into())
}

fn opt_string(map: &Map<String, Value>, key: &str) -> Result<Option<String>, ExprError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(format!("{key} must be a string"))),
    }
}

fn req_string(map: &Map<String, Value>, key: &str) -> Result<String, ExprError> {
    opt_string(map, key)?.ok_or_else(|| invalid(format!("missing {key}")))
}

fn set_map(value: &Value) -> Result<Map<String, Value>, ExprError> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| invalid("set must be an object"))
}

impl ActionConfirm {
    pub fn from_json(value: &Value) -> Result<Self, ExprError> {
        let map = value
            .as_object()
            .ok_or_else(|| invalid("confirm must be an object"))?;
        let variant = match opt_string(map, "variant")?.as_deref() {
            None => None,
            Some("default") => Some(ConfirmVariant::Default),
            Some("danger") => Some(ConfirmVariant::Danger),
            Some(other) => return Err(invalid(format!("unknown confirm variant: {other}"))),
        };
        Ok(ActionConfirm {
            title: req_string(map, "title")?,
            message: req_string(map, "message")?,
            confirm_label: opt_string(map, "confirmLabel")?,
            cancel_label: opt_string(map, "cancelLabel")?,
            variant,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut m = Map::new();
        m.insert("title".into(), Value::String(self.title.clone()));
        m.insert("message".into(), Value::String(self.message.clone()));
        if let Some(label) = &self.confirm_label {
            m.insert("confirmLabel".into(), Value::String(label.clone()));
        }
        if let Some(label) = &self.cancel_label {
            m.insert("cancelLabel".into(), Value::String(label.clone()));
        }
        if let Some(variant) = self.variant {
            m.insert("variant".into(), Value::String(variant.as_str().into()));
        }
        Value::Object(m)
    }
}

impl ActionOnSuccess {
    pub fn from_json(value: &Value) -> Result<Self, ExprError> {
        let map = value
            .as_object()
            .ok_or_else(|| invalid("onSuccess must be an object"))?;
        if let Some(target) = map.get("navigate") {
            let target = target.as_str().ok_or_else(|| invalid("navigate must be a string"))?;
            return Ok(ActionOnSuccess::Navigate(target.to_string()));
        }
        if let Some(values) = map.get("set") {
            return Ok(ActionOnSuccess::Set(set_map(values)?));
        }
        if let Some(name) = map.get("action") {
            let name = name.as_str().ok_or_else(|| invalid("action must be a string"))?;
            return Ok(ActionOnSuccess::Action(name.to_string()));
        }
        Err(invalid("onSuccess needs navigate, set or action"))
    }

    pub fn to_json(&self) -> Value {
        let mut m = Map::new();
        match self {
            ActionOnSuccess::Navigate(target) => m.insert("navigate".into(), Value::String(target.clone())),
            ActionOnSuccess::Set(values) => m.insert("set".into(), Value::Object(values.clone())),
            ActionOnSuccess::Action(name) => m.insert("action".into(), Value::String(name.clone())),
        };
        Value::Object(m)
    }
}

impl ActionOnError {
    pub fn from_json(value: &Value) -> Result<Self, ExprError> {
        let map = value
            .as_object()
            .ok_or_else(|| invalid("onError must be an object"))?;
        if let Some(values) = map.get("set") {
            return Ok(ActionOnError::Set(set_map(values)?));
        }
        if let Some(name) = map.get("action") {
            let name = name.as_str().ok_or_else(|| invalid("action must be a string"))?;
            return Ok(ActionOnError::Action(name.to_string()));
        }
        Err(invalid("onError needs set or action"))
    }

    pub fn to_json(&self) -> Value {
        let mut m = Map::new();
        match self {
            ActionOnError::Set(values) => m.insert("set".into(), Value::Object(values.clone())),
            ActionOnError::Action(name) => m.insert("action".into(), Value::String(name.clone())),
        };
        Value::Object(m)
    }
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Action {
            name: name.into(),
            params: Map::new(),
            confirm: None,
            on_success: None,
            on_error: None,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    pub fn from_json(value: &Value) -> Result<Self, ExprError> {
        let map = value
            .as_object()
            .ok_or_else(|| invalid("action must be an object"))?;
        let params = match map.get("params") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(params)) => params.clone(),
            Some(_) => return Err(invalid("params must be an object")),
        };
        Ok(Action {
            name: req_string(map, "name")?,
            params,
            confirm: map.get("confirm").map(ActionConfirm::from_json).transpose()?,
            on_success: map.get("onSuccess").map(ActionOnSuccess::from_json).transpose()?,
            on_error: map.get("onError").map(ActionOnError::from_json).transpose()?,
        })
    }
}

/// Binds every parameter of `action` against `data` and interpolates the
/// confirmation text. Parameters whose path is absent are left out.
/// Follow-up descriptors are carried over untouched.
pub fn resolve_action(action: &Action, data: &Value) -> ResolvedAction {
    let params = action
        .params
        .iter()
        .filter_map(|(k, v)| resolve_dynamic_value(v, data).map(|v| (k.clone(), v)))
        .collect();
    let confirm = action.confirm.as_ref().map(|c| ActionConfirm {
        title: interpolate_string(&c.title, data),
        message: interpolate_string(&c.message, data),
        ..c.clone()
    });
    ResolvedAction {
        name: action.name.clone(),
        params,
        confirm,
        on_success: action.on_success.clone(),
        on_error: action.on_error.clone(),
    }
}
