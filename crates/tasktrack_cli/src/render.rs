use chrono::NaiveDate;
use std::fmt::Write;
use tasktrack_core::{Task, TaskFilter, TaskId, ViewSnapshot};

/// One task as a single line: checkbox, short id, title, priority, deadline.
pub fn render_task(task: &Task, short_id: &str, today: NaiveDate) -> String {
    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    let mut line = format!("{checkbox} {short_id}  {}  ({})", task.title, task.priority);
    if let Some(due) = task.due_date {
        let _ = write!(line, "  due {due}");
        if task.is_overdue(today) {
            line.push_str("  OVERDUE");
        }
    }
    line
}

/// Full listing: header, filter counts, tasks or the empty-state message.
pub fn render_view(
    view: &ViewSnapshot,
    short_id: impl Fn(TaskId) -> String,
    today: NaiveDate,
) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{} | filter: {}", view.user, view.query.filter);
    let counts = [TaskFilter::All, TaskFilter::Pending, TaskFilter::Completed]
        .iter()
        .map(|filter| format!("{filter}: {}", view.counts.for_filter(*filter)))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(text, "{counts}");

    match view.empty_state {
        Some(state) => {
            let _ = writeln!(text, "{}", state.message());
        }
        None => {
            for task in &view.tasks {
                let _ = writeln!(text, "{}", render_task(task, &short_id(task.id), today));
                if !task.description.is_empty() {
                    let _ = writeln!(text, "      {}", task.description);
                }
            }
        }
    }
    text
}
