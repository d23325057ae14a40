use sauron::prelude::*;
use shared::Session;
use uuid::Uuid;
use web_sys::window;

pub mod auth;
pub mod board;
mod log;
pub mod store;
mod view;

use auth::{AuthService, HttpAuth};
use board::{Action, BoardError, Field, Outcome, Snapshot, TaskBoard, Ticket};
use store::HttpStore;

const TASK_COLLECTION: &str = "tasks";
const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Board,
    Login,
}

impl Page {
    fn to_path(self) -> &'static str {
        match self {
            Page::Board => "/",
            Page::Login => "/login",
        }
    }

    fn from_path(path: &str) -> Self {
        match path {
            "/login" => Page::Login,
            _ => Page::Board,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    // Session
    SessionChanged(Option<Session>),
    SetLoginEmail(String),
    SignIn,
    SignedIn(Result<Session, BoardError>),
    Logout,
    LoggedOut(Ticket, Result<(), BoardError>),

    // Tasks
    TasksLoaded(Ticket, Result<Snapshot, BoardError>),
    SetField(Field, String),
    Submit,
    TogglePanel,
    OpenPanel,
    EditTask(Uuid),
    CancelEdit,
    DeleteTask(Uuid),
    ToggleStatus(Uuid),
    Synced(Ticket, Outcome),
}

pub struct App {
    page: Page,
    /// False until the first session lookup answers.
    session_checked: bool,
    board: TaskBoard,
    login_email: String,
    signing_in: bool,
    login_error: Option<BoardError>,
    store: HttpStore,
    auth: HttpAuth,
}

impl Default for App {
    fn default() -> Self {
        Self {
            page: Page::Board,
            session_checked: false,
            board: TaskBoard::new(),
            login_email: String::new(),
            signing_in: false,
            login_error: None,
            store: HttpStore::new(TASK_COLLECTION),
            auth: HttpAuth,
        }
    }
}

impl Application for App {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        if let Some(pathname) = window().and_then(|w| w.location().pathname().ok()) {
            self.page = Page::from_path(&pathname);
        }

        let auth = self.auth.clone();
        Cmd::new(async move {
            match auth.current_session().await {
                Ok(session) => Msg::SessionChanged(session),
                Err(e) => {
                    log::error(&format!("Session lookup failed: {}", e));
                    Msg::SessionChanged(None)
                }
            }
        })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::SessionChanged(session) => {
                self.session_checked = true;
                match self.board.set_session(session) {
                    Some(ticket) => {
                        self.navigate(Page::Board);
                        self.load(ticket)
                    }
                    None => {
                        self.navigate(Page::Login);
                        Cmd::none()
                    }
                }
            }
            Msg::SetLoginEmail(email) => {
                self.login_email = email;
                Cmd::none()
            }
            Msg::SignIn => {
                let email = self.login_email.trim().to_string();
                if email.is_empty() || self.signing_in {
                    return Cmd::none();
                }
                self.signing_in = true;
                self.login_error = None;

                let auth = self.auth.clone();
                Cmd::new(async move {
                    Msg::SignedIn(auth.sign_in(email).await.map_err(|e| {
                        log::error(&format!("Sign-in failed: {}", e));
                        BoardError::SignInFailure
                    }))
                })
            }
            Msg::SignedIn(result) => {
                self.signing_in = false;
                match result {
                    Ok(session) => {
                        self.login_email.clear();
                        self.update(Msg::SessionChanged(Some(session)))
                    }
                    Err(err) => {
                        self.login_error = Some(err);
                        Cmd::none()
                    }
                }
            }
            Msg::Logout => {
                let ticket = self.board.begin_logout();
                let auth = self.auth.clone();
                Cmd::new(async move {
                    let result = auth.sign_out().await.map_err(|e| {
                        log::error(&format!("Sign-out failed: {}", e));
                        BoardError::LogoutFailure
                    });
                    Msg::LoggedOut(ticket, result)
                })
            }
            Msg::LoggedOut(ticket, result) => {
                self.board.finish_logout(ticket, result);
                if self.board.session().is_none() {
                    self.navigate(Page::Login);
                }
                Cmd::none()
            }
            Msg::TasksLoaded(ticket, result) => {
                if let Ok(snapshot) = &result {
                    log::debug(&format!("TasksLoaded - {} tasks received", snapshot.tasks().len()));
                }
                self.board.finish_load(ticket, result);
                Cmd::none()
            }
            Msg::SetField(field, value) => {
                self.board.set_field(field, value);
                Cmd::none()
            }
            Msg::Submit => match self.board.submit() {
                Some((ticket, action)) => self.sync(ticket, action),
                None => Cmd::none(),
            },
            Msg::TogglePanel => {
                self.board.toggle_panel();
                Cmd::none()
            }
            Msg::OpenPanel => {
                self.board.open_panel();
                Cmd::none()
            }
            Msg::EditTask(id) => {
                if let Some(task) = self.board.task(id).cloned() {
                    self.board.begin_edit(&task);
                }
                Cmd::none()
            }
            Msg::CancelEdit => {
                self.board.cancel_edit();
                Cmd::none()
            }
            Msg::DeleteTask(id) => {
                let confirmed = window()
                    .and_then(|w| w.confirm_with_message(DELETE_PROMPT).ok())
                    .unwrap_or(false);
                match self.board.remove(id, confirmed) {
                    Some((ticket, action)) => self.sync(ticket, action),
                    None => Cmd::none(),
                }
            }
            Msg::ToggleStatus(id) => match self.board.task(id).cloned() {
                Some(task) => {
                    let (ticket, action) = self.board.toggle_status(&task);
                    self.sync(ticket, action)
                }
                None => {
                    log::debug(&format!("Task with ID {} not found in local state", id));
                    Cmd::none()
                }
            },
            Msg::Synced(ticket, outcome) => {
                self.board.finish(ticket, outcome);
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        self.view_root()
    }
}

impl App {
    fn load(&self, ticket: Ticket) -> Cmd<Msg> {
        let store = self.store.clone();
        let clock = self.board.clock();
        Cmd::new(async move { Msg::TasksLoaded(ticket, board::load(&store, &clock).await) })
    }

    fn sync(&self, ticket: Ticket, action: Action) -> Cmd<Msg> {
        let store = self.store.clone();
        let clock = self.board.clock();
        Cmd::new(async move { Msg::Synced(ticket, board::run(&store, &clock, action).await) })
    }

    /// Switches page and updates the address bar without a reload.
    fn navigate(&mut self, page: Page) {
        if self.page == page {
            return;
        }
        self.page = page;
        if let Some(history) = window().and_then(|w| w.history().ok()) {
            let _ = history.push_state_with_url(
                &wasm_bindgen::JsValue::NULL,
                "",
                Some(page.to_path()),
            );
        }
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(App::default());
}
