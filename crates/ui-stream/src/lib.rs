//! Incremental patch-based UI tree synchronization.
//!
//! A generator describes a user interface as a stream of JSON Lines
//! patches. This crate decodes that stream, applies each patch to produce a
//! new immutable [`Tree`] snapshot, and runs generation sessions with
//! supersession and cancellation.
//!
//! ```
//! use ui_stream::patch::{apply_patches, decode_all};
//! use ui_stream::Tree;
//!
//! let stream = br#"{"op":"set","path":"/root","value":"x"}
//! {"op":"add","path":"/elements/x","value":{"key":"x","type":"Text","props":{"content":"hello"}}}
//! not json
//! {"op":"remove","path":"/elements/x"}
//! "#;
//! let patches = decode_all(stream);
//! let tree = apply_patches(&Tree::new(), &patches);
//! assert_eq!(tree.root, "x");
//! assert!(tree.elements.is_empty());
//! ```
//!
//! Path helpers live in `ui_stream_path`; visibility and action resolution
//! in `ui_stream_expr`. Both are re-exported here.

pub mod cli;
pub mod interaction;
pub mod patch;
pub mod session;
pub mod tree;

pub use interaction::InteractionState;
pub use patch::{apply_patch, Patch, PatchDecoder, PatchOp};
pub use session::{
    ControllerOptions, FragmentStream, GenerateRequest, SendOptions, SessionController, SessionHandle,
    SessionId, SessionStatus, Snapshot, Transport, TransportError,
};
pub use tree::{Element, ElementMap, Tree, TreeError};

pub use ui_stream_expr as expr;
pub use ui_stream_path as path;
