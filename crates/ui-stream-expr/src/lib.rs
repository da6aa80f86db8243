//! Conditional visibility and action resolution for streamed UI trees.
//!
//! Both evaluators read the same data model as the element bindings and are
//! pure functions of their inputs.
//!
//! # Example
//!
//! ```
//! use ui_stream_expr::{evaluate_visibility, AuthState, VisibilityCondition, VisibilityContext};
//! use serde_json::json;
//!
//! let cond = VisibilityCondition::from_json(&json!({"not": {"auth": "signedOut"}})).unwrap();
//! let auth = AuthState::signed_in();
//! let data = json!({});
//! let ctx = VisibilityContext::new(&auth, &data);
//!
//! assert!(evaluate_visibility(&cond, &ctx));
//! ```

pub mod action;
pub mod error;
pub mod registry;
pub mod util;
pub mod visibility;

pub use action::{
    resolve_action, Action, ActionConfirm, ActionOnError, ActionOnSuccess, ConfirmVariant,
    ResolvedAction,
};
pub use error::{ActionError, ExprError};
pub use registry::{ActionHandler, ActionOutcome, ActionRegistry, FollowUp};
pub use visibility::{
    evaluate_visibility, is_visible, AuthCondition, AuthState, LogicExpression,
    VisibilityCondition, VisibilityContext,
};
