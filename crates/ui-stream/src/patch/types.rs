//! Patch operations and their addressing.

use serde_json::Value;
use thiserror::Error;
use ui_stream_path::{parse_pointer, Path};

#[derive(Debug, Error, PartialEq)]
pub enum PatchError {
    #[error("INVALID_PATCH: {0}")]
    InvalidPatch(String),
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
    #[error("INVALID_PATH")]
    InvalidPath,
}

/// `add`, `set` and `replace` all establish a value; only `remove` differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOp {
    Add,
    Set,
    Replace,
    Remove,
}

impl PatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOp::Add => "add",
            PatchOp::Set => "set",
            PatchOp::Replace => "replace",
            PatchOp::Remove => "remove",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, PatchError> {
        match s {
            "add" => Ok(PatchOp::Add),
            "set" => Ok(PatchOp::Set),
            "replace" => Ok(PatchOp::Replace),
            "remove" => Ok(PatchOp::Remove),
            other => Err(PatchError::InvalidOp(other.to_string())),
        }
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, PatchOp::Remove)
    }
}

/// One edit against a [`Tree`](crate::tree::Tree).
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub op: PatchOp,
    pub path: String,
    pub value: Option<Value>,
}

/// Where a patch lands, decoded from its pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchTarget {
    /// `/root`
    Root,
    /// `/elements/{key}`
    Element(String),
    /// `/elements/{key}/{rest..}`
    ElementField(String, Path),
    /// Any other pointer.
    Other,
}

impl Patch {
    pub fn new(op: PatchOp, path: impl Into<String>, value: Option<Value>) -> Self {
        Patch {
            op,
            path: path.into(),
            value,
        }
    }

    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Patch::new(PatchOp::Add, path, Some(value))
    }

    pub fn set(path: impl Into<String>, value: Value) -> Self {
        Patch::new(PatchOp::Set, path, Some(value))
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Patch::new(PatchOp::Replace, path, Some(value))
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Patch::new(PatchOp::Remove, path, None)
    }

    pub fn target(&self) -> PatchTarget {
        if !self.path.starts_with('/') {
            return PatchTarget::Other;
        }
        let mut steps = parse_pointer(&self.path);
        match steps.first().map(String::as_str) {
            Some("root") if steps.len() == 1 => PatchTarget::Root,
            Some("elements") if steps.len() == 2 => PatchTarget::Element(steps.swap_remove(1)),
            Some("elements") if steps.len() > 2 => {
                let rest = steps.split_off(2);
                PatchTarget::ElementField(steps.swap_remove(1), rest)
            }
            _ => PatchTarget::Other,
        }
    }
}
