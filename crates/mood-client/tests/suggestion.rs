use mood_client::mock::{MockResponse, MockServer};
use mood_client::ApiClient;
use mood_core::{Emotion, SUGGESTION_FALLBACK_MESSAGE, TaskSuggestion};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::time::Duration;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(server.base_url(), Duration::from_secs(5), "moodtask-test").unwrap()
}

fn task_json(emotions: &[&str]) -> serde_json::Value {
    json!({
        "suggested_task": {
            "id": "3f2a9c1e-0b7d-4e55-a1c2-5d8e9f0a1b2c",
            "description": "Organize a team brainstorming session",
            "associated_emotions": emotions,
            "created_at": "2025-05-01T09:30:00Z"
        },
        "message": "Task suggested successfully."
    })
}

#[tokio::test]
async fn queries_lowercase_emotion() {
    let server = MockServer::builder()
        .route("GET", "/tasks/suggestion", MockResponse::json(200, &task_json(&["happy"])))
        .start()
        .unwrap();

    let suggestion = client(&server).suggest_task(Emotion::Happy).await;
    assert_eq!(
        suggestion.headline(),
        "Organize a team brainstorming session"
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].query(), Some("emotion=happy"));
}

#[tokio::test]
async fn no_matching_task_passes_message_through() {
    let server = MockServer::builder()
        .route(
            "GET",
            "/tasks/suggestion",
            MockResponse::json(
                200,
                &json!({ "suggested_task": null, "message": "No task found for this emotion." }),
            ),
        )
        .start()
        .unwrap();

    let suggestion = client(&server).suggest_task(Emotion::Sad).await;
    assert!(suggestion.task().is_none());
    assert_eq!(suggestion.message, "No task found for this emotion.");
}

#[rstest]
#[case::server_error(MockResponse::text(500, "oops"))]
#[case::not_found(MockResponse::json(404, &json!({ "detail": "missing" })))]
#[case::garbage(MockResponse::text(200, "not json"))]
#[case::wrong_emotion(MockResponse::json(200, &task_json(&["sad"])))]
#[tokio::test]
async fn failures_degrade_to_unavailable(#[case] response: MockResponse) {
    let server = MockServer::builder()
        .route("GET", "/tasks/suggestion", response)
        .start()
        .unwrap();

    let suggestion = client(&server).suggest_task(Emotion::Happy).await;
    assert_eq!(suggestion, TaskSuggestion::unavailable());
    assert_eq!(suggestion.headline(), SUGGESTION_FALLBACK_MESSAGE);
}

#[tokio::test]
async fn try_variant_reports_the_failure() {
    let server = MockServer::builder()
        .route("GET", "/tasks/suggestion", MockResponse::json(200, &task_json(&["fear"])))
        .start()
        .unwrap();

    let err = client(&server)
        .try_suggest_task(Emotion::Happy)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not associated with happy"));
}

#[tokio::test]
async fn foreign_labels_do_not_discard_the_task() {
    let server = MockServer::builder()
        .route(
            "GET",
            "/tasks/suggestion",
            MockResponse::json(200, &task_json(&["happy", "energetic"])),
        )
        .start()
        .unwrap();

    let suggestion = client(&server).suggest_task(Emotion::Happy).await;
    let task = suggestion.task().expect("task kept");
    assert_eq!(task.description, "Organize a team brainstorming session");
    assert!(task.other_labels.contains("energetic"));
}

#[tokio::test]
async fn foreign_labels_alone_are_not_associated() {
    let server = MockServer::builder()
        .route(
            "GET",
            "/tasks/suggestion",
            MockResponse::json(200, &task_json(&["energetic"])),
        )
        .start()
        .unwrap();

    let suggestion = client(&server).suggest_task(Emotion::Happy).await;
    assert_eq!(suggestion, TaskSuggestion::unavailable());
}
