//! Tree patches: the edit operations a generator streams to describe a UI.
//!
//! # Operations
//!
//! `add`, `set` and `replace` establish a value at a pointer; `remove`
//! deletes a whole element. Pointers address `/root`, `/elements/{key}` or
//! a location inside an element, `/elements/{key}/{path..}`.

pub mod apply;
pub mod codec;
pub mod types;

pub use apply::{apply_op, apply_patch, apply_patches};
pub use codec::json::{from_json, from_json_str, to_json};
pub use codec::jsonl::{decode_all, DecoderOptions, PatchDecoder};
pub use types::{Patch, PatchError, PatchOp, PatchTarget};
