//! Path utilities for UI data models.
//!
//! Two path spellings are accepted everywhere:
//!
//! - dotted paths such as `user.profile.name`, used by data bindings, and
//! - pointer-style paths such as `/props/title`, used when addressing the
//!   inside of a tree element (RFC 6901 `~0`/`~1` escapes apply).
//!
//! # Example
//!
//! ```
//! use ui_stream_path::{get_by_path, set_by_path, resolve_dynamic_value, interpolate_string};
//! use serde_json::json;
//!
//! let mut data = json!({});
//! set_by_path(&mut data, "user.name", json!("Ada"));
//! assert_eq!(get_by_path(&data, "user.name"), Some(&json!("Ada")));
//!
//! let bound = json!({"path": "user.name"});
//! assert_eq!(resolve_dynamic_value(&bound, &data), Some(json!("Ada")));
//!
//! assert_eq!(interpolate_string("Hi ${user.name}${missing}!", &data), "Hi Ada!");
//! ```

pub mod dynamic;
pub mod get;
pub mod set;
pub mod types;
pub mod util;

pub use dynamic::{interpolate_string, resolve_dynamic_value, to_display_string, DynamicValue};
pub use get::{get_by_path, get_in};
pub use set::{set_by_path, set_in};
pub use types::{Path, PathStep};
pub use util::{
    escape_segment, format_pointer, is_valid_index, parse_pointer, split_path, unescape_segment,
};
