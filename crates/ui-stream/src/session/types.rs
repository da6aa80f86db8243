use std::sync::Arc;

use serde_json::Value;

use super::transport::TransportError;
use crate::patch::DecoderOptions;
use crate::tree::Tree;

/// Identifies one session. `0` is the controller before its first send.
pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Sending,
    Streaming,
    Completed,
    Errored,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Sending => "sending",
            SessionStatus::Streaming => "streaming",
            SessionStatus::Completed => "completed",
            SessionStatus::Errored => "errored",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    /// A loop is running.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Sending | SessionStatus::Streaming)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Completed | SessionStatus::Errored | SessionStatus::Cancelled
        )
    }
}

/// What a renderer sees.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub session: SessionId,
    pub status: SessionStatus,
    /// `None` before the first send and after `clear`.
    pub tree: Option<Arc<Tree>>,
    pub error: Option<TransportError>,
}

impl Snapshot {
    pub fn idle() -> Self {
        Snapshot {
            session: 0,
            status: SessionStatus::Idle,
            tree: None,
            error: None,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.status.is_active()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Iterate on this tree instead of starting empty. Ignored when its root is unset.
    pub previous_tree: Option<Tree>,
    /// Opaque context forwarded to the transport.
    pub context: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    pub decoder: DecoderOptions,
}
