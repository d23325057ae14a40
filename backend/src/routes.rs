use crate::error::{ApiError, Result};
use crate::session::{expired_cookie, session_cookie, session_token, CurrentSession};
use crate::store::{SessionRepository, TaskRepository};
use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{CreateTaskRequest, Session, SignInRequest, Task, UpdateTaskRequest};
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub session_ttl_secs: u64,
}

/// The JSON API under `/api`. Unknown API paths answer with a JSON 404.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route(
            "/session",
            get(current_session).post(sign_in).delete(sign_out),
        )
        .fallback(no_route);

    Router::new().nest("/api", api).with_state(state)
}

/// The API plus the built frontend. Unknown paths get `index.html` so page
/// routes like `/login` load the app.
pub fn app(state: AppState, static_dir: &str) -> Router {
    let index = FsPath::new(static_dir).join("index.html");
    router(state)
        .fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn no_route(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NoRoute(uri.path().to_string())
}

async fn list_tasks(
    _user: CurrentSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Task>>> {
    Ok(Json(state.tasks.list().await?))
}

async fn get_task(
    _user: CurrentSession,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Task>> {
    state
        .tasks
        .get(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

async fn create_task(
    user: CurrentSession,
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>)> {
    payload.validate()?;
    let task = state.tasks.create(payload).await?;
    info!("{} created task {}", user.session.email, task.id);
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    user: CurrentSession,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>> {
    payload.validate()?;
    let task = state
        .tasks
        .update(id, payload)
        .await?
        .ok_or(ApiError::NotFound(id))?;
    info!("{} updated task {} ({})", user.session.email, id, task.status);
    Ok(Json(task))
}

async fn delete_task(
    user: CurrentSession,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    if state.tasks.delete(id).await? {
        info!("{} deleted task {}", user.session.email, id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}

async fn current_session(user: CurrentSession) -> Json<Session> {
    Json(user.session)
}

async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = Session {
        email: payload.email.trim().to_string(),
    };
    let token = state.sessions.create(session.clone()).await?;
    info!("{} signed in", session.email);
    Ok((
        [(header::SET_COOKIE, session_cookie(token, state.session_ttl_secs))],
        Json(session),
    ))
}

/// Always clears the cookie, signed in or not.
async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    if let Some(token) = session_token(&headers) {
        state.sessions.delete(token).await?;
    }
    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, expired_cookie())],
    ))
}
