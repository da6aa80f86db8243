//! The UI tree: a root key plus a flat map of keyed elements.
//!
//! Elements keep the JSON they were streamed as, so half-formed elements
//! (a missing `type`, a `props` that is not yet an object) survive until a
//! later patch completes them. Typed accessors return `None` for fields that
//! are absent or of the wrong shape.
//!
//! Each element sits behind an `Arc`. Cloning a [`Tree`] clones the map of
//! pointers, so elements a patch does not touch are shared between the old
//! and new snapshot.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;
use ui_stream_expr::{ExprError, VisibilityCondition};

#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("INVALID_TREE: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    raw: Value,
}

impl Element {
    pub fn new(key: impl Into<String>, element_type: impl Into<String>, props: Map<String, Value>) -> Self {
        let mut m = Map::new();
        m.insert("key".into(), Value::String(key.into()));
        m.insert("type".into(), Value::String(element_type.into()));
        m.insert("props".into(), Value::Object(props));
        Element { raw: Value::Object(m) }
    }

    pub fn from_json(raw: Value) -> Self {
        Element { raw }
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let children = children.into_iter().map(|c| Value::String(c.into())).collect();
        if let Value::Object(m) = &mut self.raw {
            m.insert("children".into(), Value::Array(children));
        }
        self
    }

    pub fn as_json(&self) -> &Value {
        &self.raw
    }

    pub fn into_json(self) -> Value {
        self.raw
    }

    fn field_str(&self, name: &str) -> Option<&str> {
        self.raw.get(name)?.as_str()
    }

    pub fn key(&self) -> Option<&str> {
        self.field_str("key")
    }

    pub fn element_type(&self) -> Option<&str> {
        self.field_str("type")
    }

    pub fn parent_key(&self) -> Option<&str> {
        self.field_str("parentKey")
    }

    pub fn props(&self) -> Option<&Map<String, Value>> {
        self.raw.get("props")?.as_object()
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props()?.get(name)
    }

    /// Child keys in render order. Non-string entries are skipped; keys may
    /// name elements that are not (yet) in the tree.
    pub fn children(&self) -> Vec<&str> {
        match self.raw.get("children") {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// The element's visibility condition, if it declares one.
    pub fn visible(&self) -> Option<Result<VisibilityCondition, ExprError>> {
        self.raw.get("visible").map(VisibilityCondition::from_json)
    }
}

pub type ElementMap = IndexMap<String, Arc<Element>>;

/// A tree snapshot. An empty `root` means the root is not set yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    pub root: String,
    pub elements: ElementMap,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// The baseline for an iterative run on top of `previous`.
    ///
    /// A previous tree with a root is carried over with a fresh element map
    /// holding the same element values; anything else starts from empty.
    pub fn seeded_from(previous: &Tree) -> Tree {
        if previous.root.is_empty() {
            return Tree::new();
        }
        Tree {
            root: previous.root.clone(),
            elements: previous.elements.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.elements.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Element> {
        self.elements.get(key).map(Arc::as_ref)
    }

    /// The root element, if the root is set and has arrived.
    pub fn root_element(&self) -> Option<&Element> {
        if self.root.is_empty() {
            return None;
        }
        self.get(&self.root)
    }

    pub fn insert(&mut self, key: impl Into<String>, element: Element) {
        self.elements.insert(key.into(), Arc::new(element));
    }

    pub fn from_json(value: &Value) -> Result<Tree, TreeError> {
        let map = value
            .as_object()
            .ok_or_else(|| TreeError::Invalid("tree must be an object".into()))?;
        let root = match map.get("root") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(TreeError::Invalid("root must be a string".into())),
        };
        let elements = match map.get("elements") {
            None | Some(Value::Null) => ElementMap::new(),
            Some(Value::Object(items)) => items
                .iter()
                .map(|(k, v)| (k.clone(), Arc::new(Element::from_json(v.clone()))))
                .collect(),
            Some(_) => return Err(TreeError::Invalid("elements must be an object".into())),
        };
        Ok(Tree { root, elements })
    }

    pub fn to_json(&self) -> Value {
        let elements = self
            .elements
            .iter()
            .map(|(k, el)| (k.clone(), el.as_json().clone()))
            .collect::<Map<_, _>>();
        let mut m = Map::new();
        m.insert("root".into(), Value::String(self.root.clone()));
        m.insert("elements".into(), Value::Object(elements));
        Value::Object(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card_tree() -> Tree {
        Tree::from_json(&json!({
            "root": "a",
            "elements": {
                "a": {"key": "a", "type": "Card", "props": {"title": "T"}, "children": ["b", 3, "ghost"]},
                "b": {"key": "b", "type": "Text", "props": {}, "parentKey": "a", "visible": {"path": "x"}}
            }
        }))
        .unwrap()
    }

    #[test]
    fn accessors() {
        let tree = card_tree();
        let a = tree.root_element().unwrap();
        assert_eq!(a.key(), Some("a"));
        assert_eq!(a.element_type(), Some("Card"));
        assert_eq!(a.prop("title"), Some(&json!("T")));
        assert_eq!(a.children(), vec!["b", "ghost"]);
        assert!(a.visible().is_none());

        let b = tree.get("b").unwrap();
        assert_eq!(b.parent_key(), Some("a"));
        assert_eq!(b.visible(), Some(Ok(VisibilityCondition::when("x"))));
    }

    #[test]
    fn tolerates_partial_elements() {
        let el = Element::from_json(json!({"key": "k", "props": 5}));
        assert_eq!(el.element_type(), None);
        assert_eq!(el.props(), None);
        assert!(el.children().is_empty());
    }

    #[test]
    fn dangling_root() {
        let tree = Tree::from_json(&json!({"root": "later", "elements": {}})).unwrap();
        assert!(tree.root_element().is_none());
        assert!(!tree.is_empty());
    }

    #[test]
    fn json_round_trip() {
        let tree = card_tree();
        assert_eq!(Tree::from_json(&tree.to_json()).unwrap(), tree);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(Tree::from_json(&json!([])).is_err());
        assert!(Tree::from_json(&json!({"root": 1})).is_err());
        assert!(Tree::from_json(&json!({"elements": []})).is_err());
        assert_eq!(Tree::from_json(&json!({})).unwrap(), Tree::new());
    }

    #[test]
    fn seeding_shares_elements() {
        let previous = card_tree();
        let seeded = Tree::seeded_from(&previous);
        assert_eq!(seeded, previous);
        assert!(Arc::ptr_eq(&seeded.elements["a"], &previous.elements["a"]));

        let unrooted = Tree {
            root: String::new(),
            elements: previous.elements.clone(),
        };
        assert!(Tree::seeded_from(&unrooted).is_empty());
    }

    #[test]
    fn builder() {
        let el = Element::new("k", "Stack", Map::new()).with_children(["x", "y"]);
        assert_eq!(el.children(), vec!["x", "y"]);
        assert_eq!(el.into_json(), json!({"key": "k", "type": "Stack", "props": {}, "children": ["x", "y"]}));
    }
}
