//! The byte-stream source a session reads from.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::tree::Tree;

/// A transport-level fault. Cloneable so it can sit in published snapshots.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("stream failed: {0}")]
    Stream(String),
}

/// Raw fragments in arrival order. Boundaries carry no meaning.
pub type FragmentStream = BoxStream<'static, Result<Vec<u8>, TransportError>>;

/// Everything the transport needs to start one generation.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub context: Option<Value>,
    /// The baseline the session starts from, when iterating on a prior result.
    pub current_tree: Option<Tree>,
    /// Cancelled when the session is superseded or cancelled. Transports
    /// should abort the underlying request when it fires.
    pub cancel: CancellationToken,
}

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn open(&self, request: GenerateRequest) -> Result<FragmentStream, TransportError>;
}
