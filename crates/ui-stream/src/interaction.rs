//! Interaction state for rendered elements, scoped to one tree.
//!
//! Overlay-style controls (dropdowns, popovers, dialogs) share a single
//! "open" slot: opening one closes whichever was open before. Per-element
//! values hold transient input such as a text field's draft. The state is an
//! ordinary value owned by whoever renders the tree; there is no shared
//! instance between sessions.

use std::collections::HashMap;

use serde_json::Value;

use crate::tree::Tree;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    open: Option<String>,
    values: HashMap<String, Value>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `key`, closing any other open element.
    pub fn open(&mut self, key: impl Into<String>) {
        self.open = Some(key.into());
    }

    /// Close `key` if it is the open element.
    pub fn close(&mut self, key: &str) {
        if self.is_open(key) {
            self.open = None;
        }
    }

    /// Returns whether `key` is open afterwards.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.is_open(key) {
            self.open = None;
            false
        } else {
            self.open = Some(key.to_string());
            true
        }
    }

    pub fn is_open(&self, key: &str) -> bool {
        self.open.as_deref() == Some(key)
    }

    pub fn open_key(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Forget state for elements that are no longer in `tree`.
    pub fn prune(&mut self, tree: &Tree) {
        if self.open.as_deref().is_some_and(|key| tree.get(key).is_none()) {
            self.open = None;
        }
        self.values.retain(|key, _| tree.get(key).is_some());
    }
}
