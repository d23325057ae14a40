//! Task and session persistence.

pub mod memory;
pub mod redis;

use crate::error::Result;
use async_trait::async_trait;
use shared::{CreateTaskRequest, Session, Task, UpdateTaskRequest};
use uuid::Uuid;

pub use self::memory::{MemorySessionRepository, MemoryTaskRepository};
pub use self::redis::{RedisSessionRepository, RedisTaskRepository};

/// CRUD over the task collection.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All tasks, oldest first.
    async fn list(&self) -> Result<Vec<Task>>;

    async fn get(&self, id: Uuid) -> Result<Option<Task>>;

    async fn create(&self, request: CreateTaskRequest) -> Result<Task>;

    /// Returns `None` when no task has this id.
    async fn update(&self, id: Uuid, request: UpdateTaskRequest) -> Result<Option<Task>>;

    /// Returns whether a task was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Signed-in sessions keyed by an opaque token.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: Session) -> Result<Uuid>;

    async fn get(&self, token: Uuid) -> Result<Option<Session>>;

    async fn delete(&self, token: Uuid) -> Result<()>;
}

pub(crate) fn sort_by_creation(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}
