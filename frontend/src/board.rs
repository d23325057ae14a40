//! Task board state and the store round trips that drive it.
//!
//! Every operation that talks to the store is split in two: a `begin`
//! half that updates local state and hands back a [`Ticket`], and a
//! `finish` half that takes the ticket and the async result. The async part
//! in between is [`run`] (one write, then a full refetch) or [`load`].
//!
//! Refetched lists are stamped by a [`RefetchClock`] at the moment the read
//! is sent. A list is shown only if it was sent after the one on screen, so
//! the freshest read wins no matter which operation asked for it.

use crate::log;
use crate::store::TaskStore;
use chrono::Utc;
use shared::{CreateTaskRequest, Session, Task, TaskFields, TaskStatus, UpdateTaskRequest};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;
use uuid::Uuid;

/// User-facing failures. Each maps to one fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Failed to fetch tasks")]
    FetchFailure,
    #[error("Failed to add task")]
    CreateFailure,
    #[error("Failed to update task")]
    UpdateFailure,
    #[error("Failed to delete task")]
    DeleteFailure,
    #[error("Failed to update task status")]
    StatusToggleFailure,
    #[error("Failed to logout")]
    LogoutFailure,
    #[error("Failed to sign in")]
    SignInFailure,
    #[error("Name, description and deadline are required")]
    MissingFields,
}

/// Visibility and mode of the create/edit form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Closed,
    Creating,
    Editing(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    Deadline,
}

/// A single write against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create(TaskFields),
    Update { id: Uuid, fields: TaskFields },
    Delete(Uuid),
    SetStatus { id: Uuid, status: TaskStatus },
}

impl Action {
    fn failure(&self) -> BoardError {
        match self {
            Action::Create(_) => BoardError::CreateFailure,
            Action::Update { .. } => BoardError::UpdateFailure,
            Action::Delete(_) => BoardError::DeleteFailure,
            Action::SetStatus { .. } => BoardError::StatusToggleFailure,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The write failed; nothing was refetched.
    Rejected(BoardError),
    /// The write went through. Holds the refetched list, or why it failed.
    Applied(Result<Snapshot, BoardError>),
}

/// Counts refetches in the order they are sent. Clones share the count.
#[derive(Debug, Clone, Default)]
pub struct RefetchClock(Rc<Cell<u64>>);

impl RefetchClock {
    fn now(&self) -> u64 {
        self.0.get()
    }

    fn tick(&self) -> u64 {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }
}

/// A full task list and the clock reading taken when it was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    sent: u64,
    tasks: Vec<Task>,
}

impl Snapshot {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Load,
    Submit,
    Write,
    Logout,
}

/// Handed out when an operation starts; pass it back when it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    op: Op,
}

#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    session: Option<Session>,
    form: TaskFields,
    panel: Panel,
    error: Option<BoardError>,
    tasks: Vec<Task>,
    /// Operations started but not yet finished.
    in_flight: usize,
    clock: RefetchClock,
    /// Clock reading of the list currently in `tasks`.
    shown_at: u64,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn form(&self) -> &TaskFields {
        &self.form
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn editing(&self) -> Option<Uuid> {
        match self.panel {
            Panel::Editing(id) => Some(id),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<BoardError> {
        self.error
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Feeds a session change in. Returns the load to start when signed in.
    pub fn set_session(&mut self, session: Option<Session>) -> Option<Ticket> {
        match session {
            Some(session) => {
                self.session = Some(session);
                Some(self.begin_load())
            }
            None => {
                self.clear_session();
                None
            }
        }
    }

    fn clear_session(&mut self) {
        self.session = None;
        self.tasks.clear();
        self.form = TaskFields::default();
        self.panel = Panel::Closed;
        self.error = None;
        // Lists still in flight belong to the old session.
        self.shown_at = self.clock.now();
    }

    /// Shared with [`load`] and [`run`] so refetches are stamped when sent.
    pub fn clock(&self) -> RefetchClock {
        self.clock.clone()
    }

    fn begin(&mut self, op: Op) -> Ticket {
        self.in_flight += 1;
        Ticket { op }
    }

    fn release(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn show(&mut self, result: Result<Snapshot, BoardError>) {
        match result {
            Ok(snapshot) => {
                if self.session.is_some() && snapshot.sent > self.shown_at {
                    self.tasks = snapshot.tasks;
                    self.shown_at = snapshot.sent;
                } else {
                    log::debug(&format!("Dropping stale task list (sent at {})", snapshot.sent));
                }
            }
            Err(err) => self.error = Some(err),
        }
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.begin(Op::Load)
    }

    pub fn finish_load(&mut self, _ticket: Ticket, result: Result<Snapshot, BoardError>) {
        self.release();
        self.show(result);
    }

    pub fn set_field(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.form.name = value,
            Field::Description => self.form.description = value,
            Field::Deadline => self.form.deadline = value,
        }
    }

    /// The "Add Task" / "Close Form" button. Closing discards an edit.
    pub fn toggle_panel(&mut self) {
        match self.panel {
            Panel::Closed => self.panel = Panel::Creating,
            Panel::Creating => self.panel = Panel::Closed,
            Panel::Editing(_) => self.cancel_edit(),
        }
    }

    pub fn open_panel(&mut self) {
        if self.panel == Panel::Closed {
            self.panel = Panel::Creating;
        }
    }

    /// Validates the form and turns it into a create or an update.
    pub fn submit(&mut self) -> Option<(Ticket, Action)> {
        self.error = None;
        if self.form.validate().is_err() {
            self.error = Some(BoardError::MissingFields);
            return None;
        }

        let fields = self.form.clone();
        let action = match self.panel {
            Panel::Editing(id) => Action::Update { id, fields },
            Panel::Closed | Panel::Creating => Action::Create(fields),
        };
        Some((self.begin(Op::Submit), action))
    }

    pub fn begin_edit(&mut self, task: &Task) {
        self.error = None;
        self.form = task.fields();
        self.panel = Panel::Editing(task.id);
    }

    pub fn cancel_edit(&mut self) {
        self.form = TaskFields::default();
        self.error = None;
        self.panel = Panel::Closed;
    }

    /// Nothing happens unless the user confirmed.
    pub fn remove(&mut self, id: Uuid, confirmed: bool) -> Option<(Ticket, Action)> {
        if !confirmed {
            return None;
        }
        self.error = None;
        Some((self.begin(Op::Write), Action::Delete(id)))
    }

    pub fn toggle_status(&mut self, task: &Task) -> (Ticket, Action) {
        self.error = None;
        let action = Action::SetStatus {
            id: task.id,
            status: task.status.toggled(),
        };
        (self.begin(Op::Write), action)
    }

    pub fn finish(&mut self, ticket: Ticket, outcome: Outcome) {
        self.release();
        match outcome {
            Outcome::Rejected(err) => self.error = Some(err),
            Outcome::Applied(result) => {
                if ticket.op == Op::Submit {
                    self.form = TaskFields::default();
                    self.panel = Panel::Closed;
                }
                self.show(result);
            }
        }
    }

    pub fn begin_logout(&mut self) -> Ticket {
        self.error = None;
        self.begin(Op::Logout)
    }

    pub fn finish_logout(&mut self, _ticket: Ticket, result: Result<(), BoardError>) {
        self.release();
        match result {
            Ok(()) => self.clear_session(),
            Err(err) => self.error = Some(err),
        }
    }
}

/// Fetches the whole collection, stamped with the clock at send time.
pub async fn load<S: TaskStore + ?Sized>(
    store: &S,
    clock: &RefetchClock,
) -> Result<Snapshot, BoardError> {
    let sent = clock.tick();
    match store.list_all().await {
        Ok(tasks) => Ok(Snapshot { sent, tasks }),
        Err(e) => {
            log::error(&format!("Listing tasks failed: {}", e));
            Err(BoardError::FetchFailure)
        }
    }
}

/// Performs one write, then refetches the whole collection.
pub async fn run<S: TaskStore + ?Sized>(
    store: &S,
    clock: &RefetchClock,
    action: Action,
) -> Outcome {
    let failure = action.failure();
    let now = Utc::now();
    let written = match action {
        Action::Create(fields) => store
            .create(CreateTaskRequest {
                fields,
                created_at: now,
            })
            .await
            .map(|id| log::debug(&format!("Created task {}", id))),
        Action::Update { id, fields } => store.update(id, UpdateTaskRequest::edit(fields, now)).await,
        Action::Delete(id) => store.delete(id).await,
        Action::SetStatus { id, status } => {
            store.update(id, UpdateTaskRequest::status(status, now)).await
        }
    };

    match written {
        Ok(()) => Outcome::Applied(load(store, clock).await),
        Err(e) => {
            log::error(&format!("{}: {}", failure, e));
            Outcome::Rejected(failure)
        }
    }
}
