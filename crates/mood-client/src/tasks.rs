//! Task creation and listing.

use mood_core::{Emotion, NewTask, Task};

use crate::ApiClient;
use crate::error::ApiError;
use crate::http::{check_response, parse_json};

pub const TASKS_PATH: &str = "/tasks";

const CREATE_FALLBACK: &str = "Failed to create task.";
const LIST_FALLBACK: &str = "Failed to list tasks.";

impl ApiClient {
    /// Store a validated task.
    ///
    /// The service echoes the stored record; it is returned when it parses,
    /// but a success status alone counts as success.
    ///
    /// # Errors
    ///
    /// [`ApiError::Network`] or [`ApiError::RequestFailed`] (with the
    /// service's `detail` or `"Failed to create task."`).
    pub async fn create_task(&self, task: &NewTask) -> Result<Option<Task>, ApiError> {
        let resp = self.http.post(self.url(TASKS_PATH)).json(task).send().await?;
        let resp = check_response(resp, CREATE_FALLBACK).await?;
        let created = parse_json::<Task>(resp).await.ok();
        tracing::info!(
            id = created.as_ref().map(|t| t.id.as_str()),
            emotions = task.associated_emotions().len(),
            "task created"
        );
        Ok(created)
    }

    /// Validate raw form input, then create the task.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] before any request when the description is
    /// blank or `emotions` is empty; otherwise as [`Self::create_task`].
    pub async fn create_task_from_form(
        &self,
        description: &str,
        emotions: &[Emotion],
    ) -> Result<Option<Task>, ApiError> {
        let task = NewTask::new(description, emotions.iter().copied())?;
        self.create_task(&task).await
    }

    /// Every stored task.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses, and unparseable bodies.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let resp = self.http.get(self.url(TASKS_PATH)).send().await?;
        let resp = check_response(resp, LIST_FALLBACK).await?;
        parse_json(resp).await
    }
}
