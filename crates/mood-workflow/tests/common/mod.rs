#![allow(dead_code)]

use mood_capture::{StreamRequest, TestPatternCamera};
use mood_client::ApiClient;
use mood_client::mock::{MockResponse, MockServer};
use mood_workflow::{Phase, WorkflowController};
use serde_json::json;
use std::time::Duration;

pub const ANALYZE: &str = "/analyze_face_emotion";
pub const SUGGEST: &str = "/tasks/suggestion";

pub fn controller(
    camera: TestPatternCamera,
    server: &MockServer,
    http_timeout: Duration,
) -> WorkflowController<TestPatternCamera> {
    let api = ApiClient::new(server.base_url(), http_timeout, "moodtask-test").unwrap();
    WorkflowController::new(camera, StreamRequest::default(), api, Duration::from_secs(2))
}

pub fn happy_analysis() -> MockResponse {
    MockResponse::json(
        200,
        &json!({
            "dominant_emotion": "happy",
            "emotions": {
                "angry": 0.2, "disgust": 0.1, "fear": 0.3, "happy": 92.3,
                "sad": 1.0, "surprise": 1.0, "neutral": 5.1
            }
        }),
    )
}

pub fn brainstorming_suggestion() -> MockResponse {
    MockResponse::json(
        200,
        &json!({
            "suggested_task": {
                "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                "description": "Organize a team brainstorming session",
                "associated_emotions": ["happy", "surprise"],
                "created_at": "2025-05-01T09:30:00Z"
            },
            "message": "ok"
        }),
    )
}

pub async fn wait_for_phase(workflow: &WorkflowController<TestPatternCamera>, phase: Phase) {
    for _ in 0..300 {
        if workflow.snapshot().phase == phase {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("workflow never reached {phase}");
}
