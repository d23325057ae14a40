use crate::board::{Field, Panel};
use crate::{App, Msg, Page};
use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{Task, TaskStatus};

const INPUT_CLASS: &str = "w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent";

/// What the root view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Checking,
    Login,
    Board,
}

impl App {
    pub(crate) fn screen(&self) -> Screen {
        if !self.session_checked {
            return Screen::Checking;
        }
        match (self.page, self.board.session()) {
            (Page::Board, Some(_)) => Screen::Board,
            // Without a session the task list is never rendered.
            _ => Screen::Login,
        }
    }

    pub(crate) fn view_root(&self) -> Node<Msg> {
        let content = match self.screen() {
            Screen::Checking => self.view_spinner("Loading..."),
            Screen::Login => self.view_login(),
            Screen::Board => self.view_board(),
        };
        div([class("min-h-screen bg-ctp-base text-ctp-text")], [content])
    }

    fn view_spinner(&self, message: &str) -> Node<Msg> {
        div([class("flex flex-col items-center py-12 text-ctp-subtext0")], [
            span([class("animate-spin text-ctp-blue text-3xl")], [text("◐")]),
            p([class("mt-4")], [text(message)]),
        ])
    }

    fn view_login(&self) -> Node<Msg> {
        div([class("max-w-md mx-auto mt-24 p-8 bg-ctp-surface0 rounded-lg shadow-lg border border-ctp-surface1")], [
            h1([class("text-2xl font-bold text-ctp-text mb-6")], [text("Task Manager")]),
            match self.login_error {
                Some(err) => div([class("mb-4 text-ctp-red")], [text(err.to_string())]),
                None => span([], []),
            },
            div([class("space-y-4")], [
                input([
                    r#type("email"),
                    placeholder("Email"),
                    value(self.login_email.clone()),
                    on_input(|event| Msg::SetLoginEmail(event.value())),
                    disabled(self.signing_in),
                    class(INPUT_CLASS),
                ], []),
                button([
                    r#type("button"),
                    on_click(|_| Msg::SignIn),
                    disabled(self.signing_in || self.login_email.trim().is_empty()),
                    class("w-full bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-2 rounded-md transition-colors duration-200"),
                ], [text(if self.signing_in { "Signing In..." } else { "Sign In" })]),
            ]),
        ])
    }

    fn view_board(&self) -> Node<Msg> {
        div([], [
            self.view_header(),
            div([class("max-w-6xl mx-auto px-6 py-8 flex gap-8")], [
                self.view_task_list(),
                self.view_form(),
            ]),
            self.view_controls(),
        ])
    }

    fn view_header(&self) -> Node<Msg> {
        let loading = self.board.is_loading();
        let email = self
            .board
            .session()
            .map(|s| s.email.clone())
            .unwrap_or_default();

        header([class("bg-ctp-mantle shadow-lg border-b border-ctp-surface0")], [
            div([class("max-w-6xl mx-auto px-6 py-4 flex items-center justify-between")], [
                h1([class("text-2xl font-bold text-ctp-text")], [text("Task Manager")]),
                div([class("flex items-center space-x-4")], [
                    span([class("text-ctp-subtext1")], [text(email)]),
                    button([
                        on_click(|_| Msg::Logout),
                        disabled(loading),
                        class("bg-ctp-surface1 hover:bg-ctp-surface2 text-ctp-text px-4 py-2 rounded-md transition-colors duration-200"),
                    ], [text(if loading { "Logging Out..." } else { "Logout" })]),
                ]),
            ]),
        ])
    }

    fn view_task_list(&self) -> Node<Msg> {
        let tasks = self.board.tasks();

        let body = if self.board.is_loading() && tasks.is_empty() {
            self.view_spinner("Loading Tasks...")
        } else if tasks.is_empty() {
            div([class("text-center py-12")], [
                p([class("text-ctp-subtext0 mb-4")], [text("No tasks found")]),
                button([
                    on_click(|_| Msg::OpenPanel),
                    class("bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-2 rounded-md"),
                ], [text("Add Your First Task")]),
            ])
        } else {
            table([class("w-full text-left")], [
                thead([], [
                    tr([class("border-b border-ctp-surface2")], [
                        th([class("py-2")], [text("Name")]),
                        th([class("py-2")], [text("Description")]),
                        th([class("py-2")], [text("Deadline")]),
                        th([class("py-2")], [text("Status")]),
                        th([class("py-2")], [text("Actions")]),
                    ]),
                ]),
                tbody([], tasks.iter().map(|task| self.view_row(task)).collect::<Vec<_>>()),
            ])
        };

        div([class("flex-1 bg-ctp-surface0 rounded-lg shadow-lg p-6 border border-ctp-surface1")], [
            h2([class("text-xl font-semibold text-ctp-text mb-4")], [text("Task Records")]),
            body,
        ])
    }

    fn view_row(&self, task: &Task) -> Node<Msg> {
        let loading = self.board.is_loading();
        let task_id = task.id;
        let completed = task.status == TaskStatus::Completed;

        tr([key(task.id.to_string()), class("border-b border-ctp-surface1")], [
            td([class("py-2")], [text(&task.name)]),
            td([class("py-2 text-ctp-subtext1")], [text(&task.description)]),
            td([class("py-2")], [text(&task.deadline)]),
            td([class(if completed { "py-2 text-ctp-green" } else { "py-2 text-ctp-yellow" })], [
                text(task.status.as_str()),
            ]),
            td([class("py-2 flex gap-2")], [
                button([
                    on_click(move |_| Msg::ToggleStatus(task_id)),
                    disabled(loading),
                    class(if completed {
                        "w-8 h-8 rounded-lg bg-ctp-green text-ctp-base"
                    } else {
                        "w-8 h-8 rounded-lg border-2 border-ctp-surface2 hover:border-ctp-green"
                    }),
                ], [text("✓")]),
                button([
                    on_click(move |_| Msg::EditTask(task_id)),
                    disabled(loading),
                    class("w-8 h-8 rounded-lg bg-ctp-blue/20 text-ctp-blue hover:bg-ctp-blue/30"),
                ], [text("✏️")]),
                button([
                    on_click(move |_| Msg::DeleteTask(task_id)),
                    disabled(loading),
                    class("w-8 h-8 rounded-lg bg-ctp-red/20 text-ctp-red hover:bg-ctp-red/30"),
                ], [text("🗑️")]),
            ]),
        ])
    }

    fn view_form(&self) -> Node<Msg> {
        let editing = match self.board.panel() {
            Panel::Closed => return span([], []),
            Panel::Creating => false,
            Panel::Editing(_) => true,
        };
        let loading = self.board.is_loading();
        let form = self.board.form();

        let submit_label = if loading {
            "Processing..."
        } else if editing {
            "Update Task"
        } else {
            "Add Task"
        };

        div([class("w-96 p-6 bg-ctp-surface1 rounded-lg border border-ctp-surface2")], [
            h2([class("text-xl font-semibold text-ctp-text mb-4 pb-2 border-b border-ctp-surface2")], [
                text(if editing { "Edit Task" } else { "Add New Task" }),
            ]),
            match self.board.error() {
                Some(err) => div([class("mb-4 p-2 rounded bg-ctp-red/20 text-ctp-red")], [text(err.to_string())]),
                None => span([], []),
            },
            div([class("space-y-4")], [
                self.form_input("Name:", Field::Name, &form.name, loading),
                self.form_input("Description:", Field::Description, &form.description, loading),
                self.form_input("Deadline:", Field::Deadline, &form.deadline, loading),
                div([class("flex gap-2")], [
                    button([
                        r#type("button"),
                        on_click(|_| Msg::Submit),
                        disabled(loading),
                        class("bg-ctp-green hover:bg-ctp-teal text-ctp-base font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                    ], [text(submit_label)]),
                    if editing {
                        button([
                            r#type("button"),
                            on_click(|_| Msg::CancelEdit),
                            disabled(loading),
                            class("bg-ctp-overlay0 hover:bg-ctp-overlay1 text-ctp-text font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                        ], [text("Cancel")])
                    } else {
                        span([], [])
                    },
                ]),
            ]),
        ])
    }

    fn form_input(&self, caption: &str, field: Field, current: &str, loading: bool) -> Node<Msg> {
        div([class("flex flex-col gap-1")], [
            label([class("text-sm text-ctp-subtext0")], [text(caption)]),
            input([
                r#type("text"),
                value(current.to_string()),
                on_input(move |event| Msg::SetField(field, event.value())),
                disabled(loading),
                class(INPUT_CLASS),
            ], []),
        ])
    }

    fn view_controls(&self) -> Node<Msg> {
        let open = self.board.panel() != Panel::Closed;
        div([class("fixed bottom-6 right-6")], [
            button([
                on_click(|_| Msg::TogglePanel),
                class(if open {
                    "bg-ctp-overlay0 text-ctp-text font-medium px-6 py-3 rounded-full shadow-lg"
                } else {
                    "bg-ctp-blue text-ctp-base font-medium px-6 py-3 rounded-full shadow-lg"
                }),
            ], [text(if open { "Close Form" } else { "Add Task" })]),
        ])
    }
}
