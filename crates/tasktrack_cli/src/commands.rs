use crate::cli::{AddArgs, Command, DarkModeArg, EditArgs, ListArgs};
use crate::render::{render_task, render_view};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use tasktrack_core::{AppContext, NewTask, SessionError, TaskId, TaskPatch, ViewSnapshot};

#[derive(Debug)]
pub enum CliError {
    Session(SessionError),
    BlankUsername,
    UnknownTask(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Session(err) => write!(f, "{err}; run `tasktrack login <name>` first"),
            Self::BlankUsername => write!(f, "username cannot be blank"),
            Self::UnknownTask(id) => write!(f, "no task matches `{id}`"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Session(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::BlankUsername | Self::UnknownTask(_) => None,
        }
    }
}

impl From<SessionError> for CliError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Applies one command to `app` and writes the resulting view to `out`.
pub fn execute(
    app: &mut AppContext,
    command: Command,
    json: bool,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Login { username } => {
            if !app.login(&username) {
                return Err(CliError::BlankUsername);
            }
            info!("event=cli_command module=cli command=login status=ok");
            writeln!(out, "Welcome back, {}!", app.user().unwrap_or_default())?;
        }
        Command::Logout => {
            app.logout();
            writeln!(out, "Logged out.")?;
        }
        Command::Whoami => match app.user() {
            Some(user) => writeln!(out, "{user}")?,
            None => writeln!(out, "not logged in")?,
        },
        Command::Add(args) => {
            let outcome = app.create_task(new_task(args))?;
            if json {
                write_view(app, &outcome.view, json, today, out)?;
                return Ok(());
            }
            let store = app.store()?;
            match outcome.created.and_then(|id| store.get(id)) {
                Some(task) => {
                    let short_id = store.short_id(task.id);
                    writeln!(out, "Added {}", render_task(task, &short_id, today))?;
                }
                None => writeln!(out, "Added.")?,
            }
        }
        Command::Edit(args) => {
            let id = resolve(app, &args.id)?;
            let view = app.update_task(id, patch(args))?.view;
            write_view(app, &view, json, today, out)?;
        }
        Command::Toggle { id } => {
            let id = resolve(app, &id)?;
            let view = app.toggle_task(id)?.view;
            write_view(app, &view, json, today, out)?;
        }
        Command::Rm { id } => {
            let id = resolve(app, &id)?;
            let view = app.delete_task(id)?.view;
            if json {
                write_view(app, &view, json, today, out)?;
            } else {
                writeln!(out, "Deleted.")?;
            }
        }
        Command::List(ListArgs { filter, search }) => {
            app.set_filter(filter)?;
            let view = app.set_search(search)?;
            write_view(app, &view, json, today, out)?;
        }
        Command::DarkMode { state } => {
            let enabled = match state {
                Some(DarkModeArg::On) => {
                    app.set_dark_mode(true);
                    true
                }
                Some(DarkModeArg::Off) => {
                    app.set_dark_mode(false);
                    false
                }
                Some(DarkModeArg::Toggle) => app.toggle_dark_mode(),
                None => app.dark_mode(),
            };
            writeln!(out, "dark mode: {}", if enabled { "on" } else { "off" })?;
        }
    }
    Ok(())
}

fn resolve(app: &AppContext, text: &str) -> Result<TaskId, CliError> {
    app.store()?
        .resolve_prefix(text)
        .ok_or_else(|| CliError::UnknownTask(text.to_string()))
}

fn new_task(args: AddArgs) -> NewTask {
    NewTask {
        title: args.title,
        description: args.description,
        priority: args.priority,
        due_date: args.due,
    }
}

fn patch(args: EditArgs) -> TaskPatch {
    let due_date = if args.no_due {
        Some(None)
    } else {
        args.due.map(Some)
    };
    TaskPatch {
        title: args.title,
        description: args.description,
        priority: args.priority,
        due_date,
        completed: args.completed,
    }
}

fn write_view(
    app: &AppContext,
    view: &ViewSnapshot,
    json: bool,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if json {
        serde_json::to_writer_pretty(&mut *out, view)?;
        writeln!(out)?;
    } else {
        let store = app.store()?;
        write!(out, "{}", render_view(view, |id| store.short_id(id), today))?;
    }
    Ok(())
}
