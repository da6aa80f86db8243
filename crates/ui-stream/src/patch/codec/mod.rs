//! Patch codecs: single JSON values and JSON Lines streams.

pub mod json;
pub mod jsonl;
