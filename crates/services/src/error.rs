//! Shared error types for the services crate.

use thiserror::Error;

use mathcards_core::model::Question;
use mathcards_core::{GenerateError, SequenceError};

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is not initialized")]
    NotInitialized,
    #[error("no questions available for session")]
    Empty,
    #[error("no question is in play")]
    NothingInPlay,
    #[error("question {0:?} is not a valid flashcard")]
    InvalidQuestion(Question),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error("failed to write options: {0}")]
    Io(#[from] std::io::Error),
}
