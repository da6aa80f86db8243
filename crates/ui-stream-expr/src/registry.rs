//! Seam to the host's side-effect handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::action::{ActionOnError, ActionOnSuccess, ResolvedAction};
use crate::error::ActionError;

/// Performs the side effect behind a named action.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, params: &Map<String, Value>) -> Result<Value, ActionError>;
}

/// What the caller should do next after a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowUp {
    Success(ActionOnSuccess),
    Error(ActionOnError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub result: Result<Value, ActionError>,
    pub follow_up: Option<FollowUp>,
}

/// Name → handler table. Follow-ups are returned, never executed here.
#[derive(Default, Clone)]
pub struct ActionRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub async fn dispatch(&self, action: &ResolvedAction) -> ActionOutcome {
        let result = match self.handlers.get(&action.name) {
            Some(handler) => handler.handle(&action.params).await,
            None => Err(ActionError::UnknownAction(action.name.clone())),
        };
        let follow_up = match &result {
            Ok(_) => action.on_success.clone().map(FollowUp::Success),
            Err(err) => {
                tracing::debug!(action = %action.name, error = %err, "action failed");
                action.on_error.clone().map(FollowUp::Error)
            }
        };
        ActionOutcome { result, follow_up }
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("ActionRegistry").field("handlers", &names).finish()
    }
}
