//! Error types for the engine.
//!
//! Every fallible engine operation returns [`Result`]. The action processor
//! turns these into failed `ActionResult`s; nothing escapes `execute` as a
//! panic or an `Err`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Out-of-range counts, malformed payloads, bad configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced card is not in the expected collection.
    #[error("not found: {0}")]
    NotFound(String),

    /// No handler is registered under this action name.
    #[error("unknown action type: {0}")]
    UnknownAction(String),

    /// The game is in a state that forbids the operation (e.g. terminal).
    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl GameError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_action_message_names_action() {
        let err = GameError::UnknownAction("fly_away".to_string());
        assert_eq!(err.to_string(), "unknown action type: fly_away");
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            GameError::validation("bad"),
            GameError::Validation("bad".to_string())
        );
        assert!(GameError::not_found("card").to_string().contains("card"));
        assert!(GameError::illegal_state("over").to_string().starts_with("illegal state"));
    }
}
