use mood_client::mock::{MockResponse, MockServer};
use mood_client::{ApiClient, ApiError};
use mood_core::{Emotion, NewTask};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(server.base_url(), Duration::from_secs(5), "moodtask-test").unwrap()
}

fn stored(description: &str, emotions: &[&str]) -> serde_json::Value {
    json!({
        "id": "a1b2c3d4-0000-4000-8000-000000000001",
        "description": description,
        "associated_emotions": emotions,
        "created_at": "2025-05-02T10:00:00Z"
    })
}

#[tokio::test]
async fn create_posts_json_body() {
    let server = MockServer::builder()
        .route(
            "POST",
            "/tasks",
            MockResponse::json(201, &stored("Take a walk", &["sad", "angry"])),
        )
        .start()
        .unwrap();

    let task = NewTask::new("  Take a walk ", [Emotion::Sad, Emotion::Angry]).unwrap();
    let created = client(&server).create_task(&task).await.unwrap();
    assert_eq!(created.map(|t| t.description), Some("Take a walk".to_string()));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({ "description": "Take a walk", "associated_emotions": ["angry", "sad"] })
    );
}

#[tokio::test]
async fn create_accepts_unparseable_success_body() {
    let server = MockServer::builder()
        .route("POST", "/tasks", MockResponse::text(200, "ok"))
        .start()
        .unwrap();

    let task = NewTask::new("Stretch", [Emotion::Neutral]).unwrap();
    assert_eq!(client(&server).create_task(&task).await.unwrap(), None);
}

#[tokio::test]
async fn invalid_form_sends_nothing() {
    let server = MockServer::builder()
        .route("POST", "/tasks", MockResponse::json(201, &stored("x", &["happy"])))
        .start()
        .unwrap();
    let client = client(&server);

    let blank = client.create_task_from_form("   ", &[Emotion::Happy]).await;
    let no_emotions = client.create_task_from_form("Read a book", &[]).await;

    for result in [blank, no_emotions] {
        let err = result.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err
            .to_string()
            .contains("Task description and at least one associated emotion are required."));
    }
    assert_eq!(server.hits("/tasks"), 0);
}

#[tokio::test]
async fn create_failure_uses_detail_or_fallback() {
    let server = MockServer::builder()
        .route(
            "POST",
            "/tasks",
            MockResponse::json(422, &json!({ "detail": "Invalid emotion" })),
        )
        .route("POST", "/tasks", MockResponse::text(500, ""))
        .start()
        .unwrap();
    let client = client(&server);
    let task = NewTask::new("Journal", [Emotion::Fear]).unwrap();

    let first = client.create_task(&task).await.unwrap_err();
    assert_eq!(first.to_string(), "Invalid emotion");
    let second = client.create_task(&task).await.unwrap_err();
    assert_eq!(second.to_string(), "Failed to create task.");
}

#[tokio::test]
async fn list_returns_stored_tasks() {
    let server = MockServer::builder()
        .route(
            "GET",
            "/tasks",
            MockResponse::json(
                200,
                &json!([stored("Take a walk", &["sad"]), stored("Call a friend", &["happy"])]),
            ),
        )
        .start()
        .unwrap();

    let tasks = client(&server).list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(tasks[1].is_associated_with(Emotion::Happy));
}

#[tokio::test]
async fn list_tolerates_labels_outside_the_set() {
    let server = MockServer::builder()
        .route(
            "GET",
            "/tasks",
            MockResponse::json(
                200,
                &json!([
                    stored("Go for a run", &["happy", "energetic"]),
                    stored("Water the plants", &["calm"]),
                ]),
            ),
        )
        .start()
        .unwrap();

    let tasks = client(&server).list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(tasks[0].is_associated_with(Emotion::Happy));
    assert!(tasks[0].other_labels.contains("energetic"));
    assert!(tasks[1].associated_emotions.is_empty());
    assert!(tasks[1].other_labels.contains("calm"));
}
