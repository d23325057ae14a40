use super::{sort_by_creation, SessionRepository, TaskRepository};
use crate::error::Result;
use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use shared::{CreateTaskRequest, Session, Task, UpdateTaskRequest};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

fn task_key(id: Uuid) -> String {
    format!("task:{}", id)
}

fn session_key(token: Uuid) -> String {
    format!("session:{}", token)
}

/// Tasks stored as JSON strings under `task:<id>`.
#[derive(Clone)]
pub struct RedisTaskRepository {
    client: Arc<Client>,
}

impl RedisTaskRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    async fn save(&self, task: &Task) -> Result<()> {
        let task_json = serde_json::to_string(task)?;
        let mut conn = self.client.get_async_connection().await?;
        let _: () = conn.set(task_key(task.id), task_json).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for RedisTaskRepository {
    async fn list(&self) -> Result<Vec<Task>> {
        let mut conn = self.client.get_async_connection().await?;
        let keys: Vec<String> = conn.keys("task:*").await?;

        let mut tasks = Vec::with_capacity(keys.len());
        for key in keys {
            // Deleted between KEYS and GET.
            let Some(task_json): Option<String> = conn.get(&key).await? else {
                continue;
            };
            match serde_json::from_str::<Task>(&task_json) {
                Ok(task) => tasks.push(task),
                Err(e) => warn!("Skipping unreadable record {}: {}", key, e),
            }
        }

        sort_by_creation(&mut tasks);
        Ok(tasks)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        let mut conn = self.client.get_async_connection().await?;
        let task_json: Option<String> = conn.get(task_key(id)).await?;
        match task_json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, request: CreateTaskRequest) -> Result<Task> {
        let task = Task::new(request);
        self.save(&task).await?;
        Ok(task)
    }

    async fn update(&self, id: Uuid, request: UpdateTaskRequest) -> Result<Option<Task>> {
        let Some(mut task) = self.get(id).await? else {
            return Ok(None);
        };
        task.apply(request);
        self.save(&task).await?;
        Ok(Some(task))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut conn = self.client.get_async_connection().await?;
        let deleted: usize = conn.del(task_key(id)).await?;
        Ok(deleted > 0)
    }
}

/// Sessions stored under `session:<token>` with an expiry.
#[derive(Clone)]
pub struct RedisSessionRepository {
    client: Arc<Client>,
    ttl_secs: u64,
}

impl RedisSessionRepository {
    pub fn new(client: Arc<Client>, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }
}

#[async_trait]
impl SessionRepository for RedisSessionRepository {
    async fn create(&self, session: Session) -> Result<Uuid> {
        let token = Uuid::new_v4();
        let session_json = serde_json::to_string(&session)?;
        let mut conn = self.client.get_async_connection().await?;
        let _: () = redis::cmd("SET")
            .arg(session_key(token))
            .arg(session_json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async(&mut conn)
            .await?;
        Ok(token)
    }

    async fn get(&self, token: Uuid) -> Result<Option<Session>> {
        let mut conn = self.client.get_async_connection().await?;
        let session_json: Option<String> = conn.get(session_key(token)).await?;
        match session_json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, token: Uuid) -> Result<()> {
        let mut conn = self.client.get_async_connection().await?;
        let _: usize = conn.del(session_key(token)).await?;
        Ok(())
    }
}
