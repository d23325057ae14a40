use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    EmptyField(&'static str),
}

/// The user-editable part of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    pub name: String,
    pub description: String,
    pub deadline: String,
}

impl TaskFields {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            deadline: deadline.into(),
        }
    }

    /// Every field must hold something other than whitespace.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("description", &self.description)?;
        require("deadline", &self.deadline)
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.description.is_empty() && self.deadline.is_empty()
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub deadline: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(request: CreateTaskRequest) -> Self {
        let CreateTaskRequest { fields, created_at } = request;
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            description: fields.description,
            deadline: fields.deadline,
            status: TaskStatus::Pending,
            created_at,
            updated_at: None,
        }
    }

    pub fn fields(&self) -> TaskFields {
        TaskFields::new(&self.name, &self.description, &self.deadline)
    }

    /// Applies a partial update. `id` and `created_at` never change.
    pub fn apply(&mut self, update: UpdateTaskRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(deadline) = update.deadline {
            self.deadline = deadline;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Some(update.updated_at);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(flatten)]
    pub fields: TaskFields,
    pub created_at: DateTime<Utc>,
}

impl CreateTaskRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.fields.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    pub updated_at: DateTime<Utc>,
}

impl UpdateTaskRequest {
    /// Rewrites the editable fields, leaving status alone.
    pub fn edit(fields: TaskFields, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: Some(fields.name),
            description: Some(fields.description),
            deadline: Some(fields.deadline),
            status: None,
            updated_at,
        }
    }

    pub fn status(status: TaskStatus, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: None,
            description: None,
            deadline: None,
            status: Some(status),
            updated_at,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("deadline", &self.deadline),
        ] {
            if let Some(value) = value {
                require(field, value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
}

impl SignInRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("email", &self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            fields: TaskFields::new(name, "Q3 summary", "2024-12-01"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn new_tasks_start_pending() {
        let task = Task::new(create("Ship report"));
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.updated_at.is_none());
    }

    #[test]
    fn toggling_twice_restores_status() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Pending.toggled().toggled(), TaskStatus::Pending);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let fields = TaskFields::new("Ship report", "   ", "2024-12-01");
        assert_eq!(
            fields.validate(),
            Err(ValidationError::EmptyField("description"))
        );
        assert!(TaskFields::default().validate().is_err());
        assert!(TaskFields::default().is_blank());
    }

    #[test]
    fn edit_keeps_identity_and_creation_time() {
        let mut task = Task::new(create("Ship report"));
        let (id, created_at) = (task.id, task.created_at);
        let fields = TaskFields::new("Ship report", "Q3 summary final", "2024-12-01");

        task.apply(UpdateTaskRequest::edit(fields, Utc::now()));

        assert_eq!(task.id, id);
        assert_eq!(task.created_at, created_at);
        assert_eq!(task.description, "Q3 summary final");
        assert_eq!(task.deadline, "2024-12-01");
        assert!(task.updated_at.is_some());
    }

    #[test]
    fn status_update_touches_only_status() {
        let mut task = Task::new(create("Ship report"));
        task.apply(UpdateTaskRequest::status(TaskStatus::Completed, Utc::now()));
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.name, "Ship report");
    }

    #[test]
    fn partial_update_validates_only_present_fields() {
        let update = UpdateTaskRequest::status(TaskStatus::Completed, Utc::now());
        assert!(update.validate().is_ok());

        let mut update = update;
        update.name = Some(String::new());
        assert_eq!(update.validate(), Err(ValidationError::EmptyField("name")));
    }

    #[test]
    fn status_serializes_as_label() {
        let json = serde_json::to_string(&TaskStatus::Completed).unwrap();
        assert_eq!(json, "\"Completed\"");
    }

    #[test]
    fn create_request_is_flat_on_the_wire() {
        let value = serde_json::to_value(create("Ship report")).unwrap();
        assert_eq!(value["name"], "Ship report");
        assert!(value.get("fields").is_none());
    }
}
