use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("INVALID_CONDITION: {0}")]
    InvalidCondition(String),

    #[error("INVALID_ACTION: {0}")]
    InvalidAction(String),
}

/// Failure reported by an action handler or the registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("{0}")]
    Failed(String),
}
