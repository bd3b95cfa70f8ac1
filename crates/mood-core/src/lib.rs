//! # mood-core
//!
//! Core types and error types for moodtask.
//!
//! This crate provides the types shared by every other moodtask crate:
//! - The fixed emotion label set ([`Emotion`])
//! - Emotion analysis results returned by the analysis service
//! - Task records, task creation requests, and task suggestions
//! - Cross-cutting validation errors

pub mod analysis;
pub mod emotion;
pub mod errors;
pub mod task;

pub use analysis::EmotionAnalysis;
pub use emotion::Emotion;
pub use errors::CoreError;
pub use task::{NewTask, SUGGESTION_FALLBACK_MESSAGE, Task, TaskSuggestion};
