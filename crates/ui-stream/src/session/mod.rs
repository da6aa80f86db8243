//! Generation sessions: one decode/apply loop at a time per controller.
//!
//! A [`SessionController`] starts a session on [`send`](SessionController::send),
//! streams fragments from its [`Transport`], decodes them into patches and
//! publishes a new tree snapshot after every applied patch. Starting another
//! session supersedes the running one; the superseded loop stops publishing
//! even if it has not unwound yet.

pub mod controller;
pub mod transport;
pub mod types;

pub use controller::{SessionController, SessionHandle};
pub use transport::{FragmentStream, GenerateRequest, Transport, TransportError};
pub use types::{ControllerOptions, SendOptions, SessionId, SessionStatus, Snapshot};
