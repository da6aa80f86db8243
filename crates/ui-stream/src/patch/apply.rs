//! Patch application.
//!
//! Application is total: a patch whose target is missing or whose shape is
//! unsupported leaves the tree as it was. Patches may race ahead of the
//! elements they touch, and dropping such an edit keeps the stream moving.
//!
//! Supported forms:
//!
//! | path                       | add / set / replace         | remove          |
//! |----------------------------|-----------------------------|-----------------|
//! | `/root`                    | root = value (strings only) | no-op           |
//! | `/elements/{key}`          | element = value, wholesale  | delete element  |
//! | `/elements/{key}/{rest..}` | write into existing element | no-op           |
//! | anything else              | no-op                       | no-op           |

use std::sync::Arc;

use serde_json::Value;
use ui_stream_path::set_in;

use super::types::{Patch, PatchTarget};
use crate::tree::{Element, Tree};

/// Apply `patch` to `tree` in place. Returns `false` when it was a no-op.
pub fn apply_op(tree: &mut Tree, patch: &Patch) -> bool {
    let value = || patch.value.clone().unwrap_or(Value::Null);
    match (patch.target(), patch.op.is_remove()) {
        (PatchTarget::Root, false) => match &patch.value {
            Some(Value::String(root)) => {
                tree.root = root.clone();
                true
            }
            _ => false,
        },
        (PatchTarget::Element(key), false) => {
            tree.elements.insert(key, Arc::new(Element::from_json(value())));
            true
        }
        (PatchTarget::Element(key), true) => tree.elements.shift_remove(&key).is_some(),
        (PatchTarget::ElementField(key, rest), false) => {
            let Some(slot) = tree.elements.get_mut(&key) else {
                return false;
            };
            let mut raw = slot.as_json().clone();
            set_in(&mut raw, &rest, value());
            *slot = Arc::new(Element::from_json(raw));
            true
        }
        (PatchTarget::Root, true) | (PatchTarget::ElementField(..), true) | (PatchTarget::Other, _) => false,
    }
}

/// Returns the tree that results from applying `patch` to `tree`.
///
/// `tree` itself is never modified, and every element the patch does not
/// touch is shared with the result.
pub fn apply_patch(tree: &Tree, patch: &Patch) -> Tree {
    let mut next = tree.clone();
    if !apply_op(&mut next, patch) {
        tracing::trace!(op = patch.op.as_str(), path = %patch.path, "patch was a no-op");
    }
    next
}

/// Apply `patches` in order.
pub fn apply_patches<'a, I>(tree: &Tree, patches: I) -> Tree
where
    I: IntoIterator<Item = &'a Patch>,
{
    let mut next = tree.clone();
    for patch in patches {
        apply_op(&mut next, patch);
    }
    next
}
