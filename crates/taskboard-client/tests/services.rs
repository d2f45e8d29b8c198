use mockito::{Matcher, Server};
use rstest::rstest;
use serde_json::json;

use taskboard_client::{ApiClient, ApiError, TaskService, ThemeApi, ThemeService};
use taskboard_core::{Priority, TaskDraft, TaskMove, TaskStatus, ThemeConfiguration, ThemePatch};

fn client(server: &Server) -> ApiClient {
    ApiClient::new(format!("{}/api", server.url())).unwrap()
}

const TASK_JSON: &str = r#"{
    "id": 7,
    "title": "Write release notes",
    "description": "",
    "status": "CURRENT",
    "status_display": "Current",
    "priority": "HIGH",
    "priority_display": "High",
    "order": 2,
    "completed": false,
    "created_at": "2024-03-01T09:30:00Z",
    "updated_at": "2024-03-02T10:00:00Z"
}"#;

#[tokio::test]
async fn test_get_tasks() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/tasks/")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!("[{}]", TASK_JSON))
        .create_async()
        .await;

    let tasks = TaskService::new(client(&server)).get_tasks().await.unwrap();

    mock.assert_async().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, 7);
    assert_eq!(tasks[0].status, TaskStatus::Current);
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[0].status_display.as_deref(), Some("Current"));
}

#[tokio::test]
async fn test_create_task_posts_draft() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tasks/")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "title": "Write release notes",
            "description": "",
            "status": "CURRENT",
            "priority": "HIGH",
            "completed": false
        })))
        .with_status(201)
        .with_body(TASK_JSON)
        .create_async()
        .await;

    let mut draft = TaskDraft::new("Write release notes");
    draft.status = TaskStatus::Current;
    draft.priority = Priority::High;
    let created = TaskService::new(client(&server))
        .create_task(&draft)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(created.order, 2);
}

#[tokio::test]
async fn test_update_and_move_task() {
    let mut server = Server::new_async().await;
    let put = server
        .mock("PUT", "/api/tasks/7/")
        .match_body(Matcher::PartialJson(json!({"title": "Renamed", "order": 2})))
        .with_status(200)
        .with_body(TASK_JSON)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/api/tasks/7/")
        .match_body(Matcher::Json(json!({"status": "COMPLETED", "order": 0})))
        .with_status(200)
        .with_body(TASK_JSON)
        .create_async()
        .await;

    let service = TaskService::new(client(&server));
    let mut draft = TaskDraft::new("Renamed");
    draft.order = Some(2);
    service.update_task(7, &draft).await.unwrap();
    service
        .move_task(
            7,
            &TaskMove {
                status: TaskStatus::Completed,
                order: Some(0),
            },
        )
        .await
        .unwrap();

    put.assert_async().await;
    patch.assert_async().await;
}

#[tokio::test]
async fn test_delete_task_accepts_empty_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/tasks/7/")
        .with_status(204)
        .create_async()
        .await;

    TaskService::new(client(&server))
        .delete_task(7)
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_task_is_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/tasks/99/")
        .with_status(404)
        .with_body(r#"{"detail": "Not found."}"#)
        .create_async()
        .await;

    let err = TaskService::new(client(&server))
        .get_task(99)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[rstest]
#[case(400, "title: This field is required.")]
#[case(500, "database unavailable")]
#[case(503, "")]
#[tokio::test]
async fn test_error_status_keeps_body(#[case] code: usize, #[case] text: &str) {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/tasks/")
        .with_status(code)
        .with_body(text)
        .create_async()
        .await;

    let err = TaskService::new(client(&server))
        .get_tasks()
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, body, .. } => {
            assert_eq!(status.as_u16() as usize, code);
            assert_eq!(body, text);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/tasks/1/")
        .with_status(200)
        .with_body("<html>")
        .create_async()
        .await;

    let err = TaskService::new(client(&server))
        .get_task(1)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn test_get_theme_missing_is_none() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/theme/")
        .with_status(404)
        .create_async()
        .await;

    let theme = ThemeService::new(client(&server))
        .get_current_theme()
        .await
        .unwrap();
    assert_eq!(theme, None);
}

#[tokio::test]
async fn test_get_theme_returns_partial() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/theme/")
        .with_status(200)
        .with_body(r##"{"boardBackground": "#000", "cardOpacity": {"CURRENT": 0.4}}"##)
        .create_async()
        .await;

    let patch = ThemeService::new(client(&server))
        .get_current_theme()
        .await
        .unwrap()
        .unwrap();
    let theme = patch.normalize();
    assert_eq!(theme.board_background, "#000");
    assert_eq!(theme.card_opacity.current, 0.4);
    assert_eq!(theme.card_opacity.upcoming, 0.95);
}

#[tokio::test]
async fn test_update_theme_sends_complete_theme() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/api/theme/")
        .match_body(Matcher::PartialJson(json!({
            "boardImageFit": "cover",
            "columnOpacity": {"ON_HOLD": 0.1, "CURRENT": 0.5, "UPCOMING": 0.1, "COMPLETED": 0.1}
        })))
        .with_status(200)
        .with_body(r#"{"columnOpacity": {"CURRENT": 0.5}}"#)
        .create_async()
        .await;

    let mut theme = ThemeConfiguration::default();
    theme.column_opacity.current = 0.5;
    let saved = ThemeService::new(client(&server))
        .update_theme(&theme)
        .await
        .unwrap();

    mock.assert_async().await;
    let mut expected = ThemePatch::default();
    ThemePatch::set(&mut expected.column_opacity, TaskStatus::Current, 0.5);
    assert_eq!(saved, expected);
}

#[tokio::test]
async fn test_reset_theme_deletes() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/theme/")
        .with_status(204)
        .create_async()
        .await;

    ThemeService::new(client(&server))
        .reset_theme()
        .await
        .unwrap();
    mock.assert_async().await;
}
