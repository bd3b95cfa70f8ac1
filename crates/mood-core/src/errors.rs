//! Cross-cutting error types for moodtask.
//!
//! Transport and device errors live in their own crates (`mood-client`,
//! `mood-capture`). Errors here are raised while building or checking the
//! shared data model.

use thiserror::Error;

/// Errors raised by the shared data model.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A label outside the fixed emotion set was supplied.
    #[error("Unknown emotion label: {0}")]
    UnknownEmotion(String),

    /// Data failed validation (missing fields, broken invariants).
    #[error("Validation error: {0}")]
    Validation(String),
}
