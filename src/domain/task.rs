//! Task domain model
//!
//! A task is a named unit of automation: commands to run, tasks it depends
//! on, and the directory it runs in. The loader only moves tasks around; it
//! never runs them, so most fields are carried through untouched.

use serde::{Deserialize, Serialize};

use super::vars::Vars;

/// A single entry of a task's `cmds` list
///
/// Accepts the short form (`- echo hi`), the long form
/// (`- cmd: echo hi` with `silent`/`ignore_error`), and calls to other
/// tasks (`- task: build`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawCmd")]
pub enum Cmd {
    /// A shell command
    Command {
        cmd: String,
        #[serde(default, skip_serializing_if = "is_false")]
        silent: bool,
        #[serde(default, skip_serializing_if = "is_false")]
        ignore_error: bool,
    },
    /// A call to another task
    Task {
        task: String,
        #[serde(default, skip_serializing_if = "Vars::is_empty")]
        vars: Vars,
    },
}

impl Cmd {
    /// Creates a plain shell command
    pub fn command(cmd: impl Into<String>) -> Self {
        Cmd::Command {
            cmd: cmd.into(),
            silent: false,
            ignore_error: false,
        }
    }

    /// Creates a call to another task
    pub fn task(task: impl Into<String>) -> Self {
        Cmd::Task {
            task: task.into(),
            vars: Vars::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCmd {
    Short(String),
    Call {
        task: String,
        #[serde(default)]
        vars: Vars,
    },
    Long {
        cmd: String,
        #[serde(default)]
        silent: bool,
        #[serde(default)]
        ignore_error: bool,
    },
}

impl From<RawCmd> for Cmd {
    fn from(raw: RawCmd) -> Self {
        match raw {
            RawCmd::Short(cmd) => Cmd::command(cmd),
            RawCmd::Call { task, vars } => Cmd::Task { task, vars },
            RawCmd::Long {
                cmd,
                silent,
                ignore_error,
            } => Cmd::Command {
                cmd,
                silent,
                ignore_error,
            },
        }
    }
}

/// A dependency on another task (`- build` or `- task: build`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDep")]
pub struct Dep {
    pub task: String,
    #[serde(default, skip_serializing_if = "Vars::is_empty")]
    pub vars: Vars,
}

impl Dep {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            vars: Vars::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDep {
    Short(String),
    Long {
        task: String,
        #[serde(default)]
        vars: Vars,
    },
}

impl From<RawDep> for Dep {
    fn from(raw: RawDep) -> Self {
        match raw {
            RawDep::Short(task) => Dep::new(task),
            RawDep::Long { task, vars } => Dep { task, vars },
        }
    }
}

/// A task definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    /// The task's own identifier
    ///
    /// Not part of the document; stamped with the task's map key once all
    /// merging is done.
    #[serde(skip)]
    pub task: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cmds: Vec<Cmd>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<Dep>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub generates: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,

    /// Working directory, relative to the root Taskfile's directory
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dir: String,

    #[serde(skip_serializing_if = "Vars::is_empty")]
    pub vars: Vars,

    #[serde(skip_serializing_if = "Vars::is_empty")]
    pub env: Vars,

    #[serde(skip_serializing_if = "is_false")]
    pub silent: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub ignore_error: bool,
}

impl Task {
    /// Creates an empty task that runs the given commands
    pub fn with_cmds<I, S>(cmds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cmds: cmds.into_iter().map(Cmd::command).collect(),
            ..Self::default()
        }
    }

    /// Returns the description's first line, for listings
    pub fn short_desc(&self) -> Option<&str> {
        self.desc
            .as_deref()
            .and_then(|d| d.lines().next())
            .map(str::trim)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}
