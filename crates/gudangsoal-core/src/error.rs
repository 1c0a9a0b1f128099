//! Error types for question validation, attempts, and content stores.
//!
//! All of these are local, recoverable conditions. `StoreError` lives here
//! rather than in `gudangsoal-store` so the question view can tell a missing
//! question apart from an unreachable store without string matching.

use thiserror::Error;

use crate::model::QuestionType;

/// A question record that cannot be graded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuestionError {
    /// The declared type is outside the supported set.
    #[error("unsupported question type: {0}")]
    UnsupportedQuestionType(String),

    /// The answer key is absent, empty, or does not fit the question type.
    #[error("malformed answer key for question {id}: {reason}")]
    MalformedAnswerKey { id: String, reason: String },

    /// An option-based question has no options.
    #[error("question {0} has no options")]
    MissingOptions(String),

    /// An option key is blank.
    #[error("question {0} has an option with a blank key")]
    BlankOptionKey(String),

    /// Two options share a key.
    #[error("question {id} has duplicate option key: {key}")]
    DuplicateOptionKey { id: String, key: String },
}

/// A rejected transition on an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// Check requested with nothing submitted.
    #[error("no answer has been entered")]
    EmptyAnswer,

    /// Mutation or re-check after the attempt was checked.
    #[error("attempt is already checked and locked")]
    AttemptLocked,

    /// The submitted key is not one of the question's options.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// `set_answer` on a multi-select question, or `toggle_option` on any other.
    #[error("operation does not apply to {question_type} questions")]
    WrongInputMode { question_type: QuestionType },
}

/// Errors raised by a content store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No question with this id.
    #[error("question not found: {0}")]
    NotFound(String),

    /// The store could not be reached.
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with an error status.
    #[error("store error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The store answered with something that is not a question record.
    #[error("failed to decode store response: {0}")]
    Decode(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),
}

impl StoreError {
    /// Returns `true` if retrying the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::Decode(_))
    }
}
