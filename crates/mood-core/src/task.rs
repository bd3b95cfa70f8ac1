//! Task records, creation requests, and suggestion outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::emotion::Emotion;
use crate::errors::CoreError;

/// Message carried by a suggestion that could not be fetched.
pub const SUGGESTION_FALLBACK_MESSAGE: &str = "Could not fetch task suggestion.";

/// A task stored by the task service.
///
/// The service stores free-form labels. Those naming a known [`Emotion`]
/// land in `associated_emotions`; the rest are kept lower-cased in
/// `other_labels` and written back on serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: String,
    pub description: String,
    pub associated_emotions: BTreeSet<Emotion>,
    pub other_labels: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    #[must_use]
    pub fn is_associated_with(&self, emotion: Emotion) -> bool {
        self.associated_emotions.contains(&emotion)
    }
}

/// Wire form of [`Task`].
#[derive(Serialize, Deserialize)]
struct TaskRecord {
    id: String,
    description: String,
    associated_emotions: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        let mut associated_emotions = BTreeSet::new();
        let mut other_labels = BTreeSet::new();
        for label in record.associated_emotions {
            if let Ok(emotion) = label.parse::<Emotion>() {
                associated_emotions.insert(emotion);
                continue;
            }
            let label = label.trim().to_ascii_lowercase();
            if !label.is_empty() {
                other_labels.insert(label);
            }
        }
        Self {
            id: record.id,
            description: record.description,
            associated_emotions,
            other_labels,
            created_at: record.created_at,
        }
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        let associated_emotions = task
            .associated_emotions
            .iter()
            .map(|emotion| emotion.as_str().to_string())
            .chain(task.other_labels)
            .collect();
        Self {
            id: task.id,
            description: task.description,
            associated_emotions,
            created_at: task.created_at,
        }
    }
}

/// A validated request to create a task.
///
/// Construction is the only validation point: a `NewTask` always has a
/// non-blank description and at least one emotion, so no request is ever
/// built for an invalid form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    description: String,
    associated_emotions: BTreeSet<Emotion>,
}

impl NewTask {
    /// Validate a task form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the description is blank or no
    /// emotion is selected.
    pub fn new(
        description: &str,
        emotions: impl IntoIterator<Item = Emotion>,
    ) -> Result<Self, CoreError> {
        let description = description.trim();
        let associated_emotions: BTreeSet<Emotion> = emotions.into_iter().collect();
        if description.is_empty() || associated_emotions.is_empty() {
            return Err(CoreError::Validation(
                "Task description and at least one associated emotion are required.".to_string(),
            ));
        }
        Ok(Self {
            description: description.to_string(),
            associated_emotions,
        })
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn associated_emotions(&self) -> &BTreeSet<Emotion> {
        &self.associated_emotions
    }
}

/// Outcome of one suggestion lookup.
///
/// An absent task is a valid outcome: `message` then explains why (no task
/// matches, or the lookup itself failed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSuggestion {
    #[serde(default)]
    pub suggested_task: Option<Task>,
    pub message: String,
}

impl TaskSuggestion {
    /// The neutral result used whenever a lookup fails.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            suggested_task: None,
            message: SUGGESTION_FALLBACK_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub const fn task(&self) -> Option<&Task> {
        self.suggested_task.as_ref()
    }

    /// Text to show the user: the task description when present, else the message.
    #[must_use]
    pub fn headline(&self) -> &str {
        self.suggested_task
            .as_ref()
            .map_or(self.message.as_str(), |task| task.description.as_str())
    }
}
