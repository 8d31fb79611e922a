use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tasktrack_core::{Priority, TaskFilter};

#[derive(Parser)]
#[command(name = "tasktrack", about = "Personal task tracker", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Database file (overrides TASKTRACK_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print views as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Identify yourself by display name
    Login { username: String },
    /// Forget the current user (tasks stay on disk)
    Logout,
    /// Show the current user
    Whoami,
    /// Add a task at the end of the list
    Add(AddArgs),
    /// Change fields of a task
    Edit(EditArgs),
    /// Flip a task between pending and completed
    Toggle { id: String },
    /// Delete a task
    Rm { id: String },
    /// List tasks
    List(ListArgs),
    /// Show or change the dark-mode preference
    DarkMode { state: Option<DarkModeArg> },
}

#[derive(Args)]
pub struct AddArgs {
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub description: String,
    #[arg(short, long, default_value = "medium")]
    pub priority: Priority,
    /// Deadline as YYYY-MM-DD
    #[arg(long)]
    pub due: Option<NaiveDate>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task id or unique id prefix
    pub id: String,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long)]
    pub priority: Option<Priority>,
    /// Deadline as YYYY-MM-DD
    #[arg(long, conflicts_with = "no_due")]
    pub due: Option<NaiveDate>,
    /// Remove the deadline
    #[arg(long)]
    pub no_due: bool,
    /// Set completion explicitly (true|false)
    #[arg(long, action = clap::ArgAction::Set)]
    pub completed: Option<bool>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long, default_value = "all")]
    pub filter: TaskFilter,
    /// Case-insensitive text to look for in title or description
    #[arg(short, long, default_value = "")]
    pub search: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DarkModeArg {
    On,
    Off,
    Toggle,
}
