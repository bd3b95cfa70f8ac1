//! Task suggestion lookup.
//!
//! Suggestions are advisory. [`ApiClient::suggest_task`] never fails: any
//! problem degrades to [`TaskSuggestion::unavailable`].

use mood_core::{Emotion, TaskSuggestion};

use crate::ApiClient;
use crate::error::ApiError;
use crate::http::{check_response, parse_json};

pub const SUGGESTION_PATH: &str = "/tasks/suggestion";

impl ApiClient {
    /// Ask the task service for a task matching `emotion`.
    ///
    /// A response with no task is a success and passes its message through.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses, unparseable bodies, and a
    /// suggested task that is not associated with `emotion`.
    pub async fn try_suggest_task(&self, emotion: Emotion) -> Result<TaskSuggestion, ApiError> {
        let url = format!(
            "{}?emotion={}",
            self.url(SUGGESTION_PATH),
            urlencoding::encode(emotion.as_str())
        );
        let resp = self.http.get(&url).send().await?;
        let resp = check_response(resp, mood_core::SUGGESTION_FALLBACK_MESSAGE).await?;
        let suggestion: TaskSuggestion = parse_json(resp).await?;

        if let Some(task) = suggestion.task().filter(|t| !t.is_associated_with(emotion)) {
            return Err(ApiError::MalformedResponse(format!(
                "suggested task {} is not associated with {emotion}",
                task.id
            )));
        }
        Ok(suggestion)
    }

    /// Like [`Self::try_suggest_task`], but failures become the neutral
    /// "could not fetch" suggestion.
    pub async fn suggest_task(&self, emotion: Emotion) -> TaskSuggestion {
        match self.try_suggest_task(emotion).await {
            Ok(suggestion) => {
                tracing::debug!(
                    %emotion,
                    found = suggestion.task().is_some(),
                    "task suggestion received"
                );
                suggestion
            }
            Err(error) => {
                tracing::warn!(%emotion, %error, "task suggestion unavailable");
                TaskSuggestion::unavailable()
            }
        }
    }
}
