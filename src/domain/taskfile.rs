//! Taskfile domain model
//!
//! A [`Taskfile`] is the decoded form of one definition file. The root
//! Taskfile may declare `includes`; after loading, the root absorbs every
//! included and overlaid Taskfile and is the only tree handed back.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use super::task::Task;
use super::vars::{scalar_to_string, Vars};

/// How task output is printed when tasks run concurrently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    Interleaved,
    Group,
    Prefixed,
}

/// An entry of the root Taskfile's `includes` map
///
/// Either a bare path (`docs: ./docs`) or a mapping with `taskfile` and
/// `dir`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawInclude")]
pub struct IncludedTaskfile {
    /// File or directory to include, relative to the root Taskfile
    pub taskfile: String,

    /// Directory prefix applied to every included task's `dir`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dir: String,
}

impl IncludedTaskfile {
    pub fn new(taskfile: impl Into<String>) -> Self {
        Self {
            taskfile: taskfile.into(),
            dir: String::new(),
        }
    }

    /// Sets the directory prefix
    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = dir.into();
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInclude {
    Short(String),
    Long {
        taskfile: String,
        #[serde(default)]
        dir: String,
    },
}

impl From<RawInclude> for IncludedTaskfile {
    fn from(raw: RawInclude) -> Self {
        match raw {
            RawInclude::Short(taskfile) => IncludedTaskfile::new(taskfile),
            RawInclude::Long { taskfile, dir } => IncludedTaskfile { taskfile, dir },
        }
    }
}

/// A decoded definition file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taskfile {
    /// Schema version, kept verbatim (`2`, `'2'` and `2.6` are all accepted)
    #[serde(deserialize_with = "deserialize_version", skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansions: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputStyle>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub includes: IndexMap<String, IncludedTaskfile>,

    #[serde(skip_serializing_if = "Vars::is_empty")]
    pub vars: Vars,

    #[serde(skip_serializing_if = "Vars::is_empty")]
    pub env: Vars,

    pub tasks: BTreeMap<String, Task>,
}

impl Taskfile {
    /// Returns a task by its identifier
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// Returns true if this Taskfile declares any includes
    pub fn has_includes(&self) -> bool {
        !self.includes.is_empty()
    }

    /// Tasks that carry a description, in name order
    pub fn described_tasks(&self) -> impl Iterator<Item = (&String, &Task)> {
        self.tasks.iter().filter(|(_, t)| t.desc.is_some())
    }
}

fn deserialize_version<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(&value).map_err(serde::de::Error::custom)
}
