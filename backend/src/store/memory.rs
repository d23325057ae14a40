use super::{sort_by_creation, SessionRepository, TaskRepository};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use shared::{CreateTaskRequest, Session, Task, UpdateTaskRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Tasks held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn list(&self) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self.tasks.read().await.values().cloned().collect();
        sort_by_creation(&mut tasks);
        Ok(tasks)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn create(&self, request: CreateTaskRequest) -> Result<Task> {
        let task = Task::new(request);
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, id: Uuid, request: UpdateTaskRequest) -> Result<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.get_mut(&id).map(|task| {
            task.apply(request);
            task.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }
}

/// Longer lifetimes are clamped to this.
const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
struct StoredSession {
    session: Session,
    expires_at: DateTime<Utc>,
}

impl StoredSession {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Sessions held in process memory, dropped `ttl_secs` after sign-in.
#[derive(Debug, Clone)]
pub struct MemorySessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
    ttl_secs: u64,
}

impl MemorySessionRepository {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::default(),
            ttl_secs,
        }
    }

    fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_secs.min(MAX_TTL_SECS) as i64)
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn create(&self, session: Session) -> Result<Uuid> {
        let token = Uuid::new_v4();
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl()).unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, stored| !stored.is_expired(now));
        sessions.insert(
            token,
            StoredSession {
                session,
                expires_at,
            },
        );
        Ok(token)
    }

    async fn get(&self, token: Uuid) -> Result<Option<Session>> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get(&token) {
            Some(stored) if stored.is_expired(now) => {
                debug!("Session {} expired", token);
                sessions.remove(&token);
                Ok(None)
            }
            Some(stored) => Ok(Some(stored.session.clone())),
            None => Ok(None),
        }
    }

    async fn delete(&self, token: Uuid) -> Result<()> {
        self.sessions.write().await.remove(&token);
        Ok(())
    }
}
