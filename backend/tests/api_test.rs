use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use backend::store::{MemorySessionRepository, MemoryTaskRepository};
use backend::{router, AppState};
use chrono::Utc;
use serde_json::{json, Value};
use shared::{Task, TaskStatus};
use std::sync::Arc;
use tower::ServiceExt;

fn test_state() -> AppState {
    AppState {
        tasks: Arc::new(MemoryTaskRepository::new()),
        sessions: Arc::new(MemorySessionRepository::new(3600)),
        session_ttl_secs: 3600,
    }
}

fn test_app() -> Router {
    router(test_state())
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn sign_in(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/session")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "email": "ada@example.com" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn new_task(name: &str, description: &str, deadline: &str) -> Value {
    json!({
        "name": name,
        "description": description,
        "deadline": deadline,
        "created_at": Utc::now(),
    })
}

#[tokio::test]
async fn task_routes_require_a_session() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/api/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not signed in");

    let (status, _) = send(
        &app,
        "GET",
        "/api/tasks",
        Some("session=00000000-0000-0000-0000-000000000000"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_lifecycle() {
    let app = test_app();
    let cookie = sign_in(&app).await;

    let (status, body) = send(&app, "GET", "/api/session", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ada@example.com");

    let (status, _) = send(&app, "DELETE", "/api/session", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/api/session", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sign_in_requires_email() {
    let app = test_app();
    let (status, _) = send(&app, "POST", "/api/session", None, Some(json!({ "email": " " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_rejects_empty_fields() {
    let app = test_app();
    let cookie = sign_in(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(&cookie),
        Some(new_task("Ship report", "", "2024-12-01")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid input: description is required");

    let (_, body) = send(&app, "GET", "/api/tasks", Some(&cookie), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn ship_report_scenario() {
    let app = test_app();
    let cookie = sign_in(&app).await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(&cookie),
        Some(new_task("Ship report", "Q3 summary", "2024-12-01")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Task = serde_json::from_value(created).unwrap();
    assert_eq!(created.status, TaskStatus::Pending);

    let (_, list) = send(&app, "GET", "/api/tasks", Some(&cookie), None).await;
    let list: Vec<Task> = serde_json::from_value(list).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].status, TaskStatus::Pending);

    let uri = format!("/api/tasks/{}", created.id);
    let (status, toggled) = send(
        &app,
        "PUT",
        &uri,
        Some(&cookie),
        Some(json!({ "status": "Completed", "updated_at": Utc::now() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["status"], "Completed");

    let (status, edited) = send(
        &app,
        "PUT",
        &uri,
        Some(&cookie),
        Some(json!({
            "name": "Ship report",
            "description": "Q3 summary final",
            "deadline": "2024-12-01",
            "updated_at": Utc::now(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let edited: Task = serde_json::from_value(edited).unwrap();
    assert_eq!(edited.id, created.id);
    assert_eq!(edited.created_at, created.created_at);
    assert_eq!(edited.description, "Q3 summary final");
    assert_eq!(edited.deadline, "2024-12-01");
    assert_eq!(edited.status, TaskStatus::Completed);

    let (status, _) = send(&app, "DELETE", &uri, Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send(&app, "GET", "/api/tasks", Some(&cookie), None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn missing_task_is_not_found() {
    let app = test_app();
    let cookie = sign_in(&app).await;
    let uri = format!("/api/tasks/{}", uuid::Uuid::new_v4());

    let (status, _) = send(&app, "GET", &uri, Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&cookie),
        Some(json!({ "status": "Completed", "updated_at": Utc::now() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_api_path_is_a_json_404() {
    let app = backend::routes::app(test_state(), "no-such-static-dir");
    let cookie = sign_in(&app).await;

    let (status, body) = send(&app, "GET", "/api/nope", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No such endpoint: /api/nope");

    let (status, body) = send(&app, "GET", "/api/tasks", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

