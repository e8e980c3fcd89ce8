//! Task listing and inspection commands

use anyhow::Result;
use serde::Serialize;

use super::output::Output;
use crate::domain::{Task, Taskfile};

/// A task together with its name, for display
#[derive(Serialize)]
struct TaskView<'a> {
    task: &'a str,
    #[serde(flatten)]
    definition: &'a Task,
}

/// Lists described tasks, or every task with `all`
pub fn list(output: &Output, taskfile: &Taskfile, all: bool) {
    let tasks: Vec<(&String, &Task)> = if all {
        taskfile.tasks.iter().collect()
    } else {
        taskfile.described_tasks().collect()
    };

    if output.is_json() {
        let items: Vec<_> = tasks
            .iter()
            .map(|(name, task)| {
                serde_json::json!({
                    "name": name,
                    "desc": task.desc,
                    "dir": task.dir,
                })
            })
            .collect();
        output.data(&items);
        return;
    }

    if tasks.is_empty() {
        output.line("No tasks with description available");
        return;
    }

    let width = tasks.iter().map(|(name, _)| name.len() + 1).max().unwrap_or(0);
    output.line("Available tasks for this project:");
    for (name, task) in tasks {
        let label = format!("{}:", name);
        output.line(&format!(
            "* {:<width$} {}",
            label,
            task.short_desc().unwrap_or(""),
            width = width
        ));
    }
}

/// Shows a single resolved task
pub fn show(output: &Output, taskfile: &Taskfile, name: &str) -> Result<()> {
    let task = taskfile
        .task(name)
        .ok_or_else(|| anyhow::anyhow!("Task \"{}\" not found", name))?;

    output.data(&TaskView {
        task: &task.task,
        definition: task,
    });
    Ok(())
}
