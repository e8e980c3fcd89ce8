//! Structural merge of Taskfiles
//!
//! Two merge modes exist:
//!
//! - **Overlay** (no namespace): a platform-specific file layered on top of
//!   its base. Tasks, `vars`, `env`, `output` and `expansions` from the
//!   overlay replace the base's entries.
//! - **Include** (with a namespace): tasks of an included file are added
//!   under `namespace:task`. `output` and `expansions` are root-only and
//!   never taken from an include. The included file's global `vars` and
//!   `env` are folded into each of its tasks, so they never leak into the
//!   root's globals.
//!
//! A duplicate key is never an error: the merged-in entry wins.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::taskfile::Taskfile;
use super::vars::Vars;

/// Separator between a namespace and a task name (`docs:serve`)
pub const NAMESPACE_SEPARATOR: &str = ":";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("Taskfiles versions should match. First is \"{first}\" but second is \"{second}\"")]
    VersionMismatch { first: String, second: String },

    #[error("Invalid include namespace '{0}': must be non-empty without whitespace or '{sep}'", sep = NAMESPACE_SEPARATOR)]
    InvalidNamespace(String),

    #[error("Merged Taskfiles can't declare includes")]
    SourceHasIncludes,
}

/// How a source Taskfile is merged into a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode<'a> {
    /// Platform overlay, entries replace the destination's
    Overlay,
    /// Included file, tasks are qualified with the namespace
    Include(&'a str),
}

/// Merges `src` into `dst`, consuming `src`
pub fn merge(dst: &mut Taskfile, src: Taskfile, mode: MergeMode<'_>) -> Result<(), MergeError> {
    if dst.version != src.version {
        return Err(MergeError::VersionMismatch {
            first: dst.version.clone(),
            second: src.version,
        });
    }
    if src.has_includes() {
        return Err(MergeError::SourceHasIncludes);
    }

    match mode {
        MergeMode::Overlay => merge_overlay(dst, src),
        MergeMode::Include(namespace) => merge_include(dst, src, namespace)?,
    }

    Ok(())
}

fn merge_overlay(dst: &mut Taskfile, src: Taskfile) {
    debug!(tasks = src.tasks.len(), "merge: applying overlay");

    if src.expansions.is_some() {
        dst.expansions = src.expansions;
    }
    if src.output.is_some() {
        dst.output = src.output;
    }
    dst.vars.extend(src.vars);
    dst.env.extend(src.env);
    dst.tasks.extend(src.tasks);
}

fn merge_include(dst: &mut Taskfile, src: Taskfile, namespace: &str) -> Result<(), MergeError> {
    validate_namespace(namespace)?;
    debug!(namespace, tasks = src.tasks.len(), "merge: adding included tasks");

    if src.expansions.is_some() || src.output.is_some() {
        debug!(namespace, "merge: ignoring root-only settings of included Taskfile");
    }

    let Taskfile {
        vars, env, tasks, ..
    } = src;

    for (name, mut task) in tasks {
        task.vars = fold_globals(&vars, task.vars);
        task.env = fold_globals(&env, task.env);

        let key = qualify_name(namespace, &name);
        if dst.tasks.insert(key.clone(), task).is_some() {
            warn!(task = %key, "included task replaces an existing task with the same name");
        }
    }

    Ok(())
}

/// File-level values first, the task's own values override them
fn fold_globals(globals: &Vars, own: Vars) -> Vars {
    if globals.is_empty() {
        return own;
    }
    let mut folded = globals.clone();
    folded.extend(own);
    folded
}

fn validate_namespace(namespace: &str) -> Result<(), MergeError> {
    if namespace.is_empty()
        || namespace.contains(NAMESPACE_SEPARATOR)
        || namespace.chars().any(char::is_whitespace)
    {
        return Err(MergeError::InvalidNamespace(namespace.to_string()));
    }
    Ok(())
}

/// Builds the merged identifier of an included task
pub fn qualify_name(namespace: &str, task: &str) -> String {
    format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, task)
}

/// Stamps every task with its own map key
pub fn finalize(taskfile: &mut Taskfile) {
    for (name, task) in taskfile.tasks.iter_mut() {
        task.task.clone_from(name);
    }
}

/// Joins an include's `dir` with a task's `dir`
///
/// Empty parts are skipped and `.`/`..` are collapsed lexically, so
/// `("sub", "x")` gives `sub/x` and `("", "")` stays empty. A leading root
/// only counts in the first non-empty part: `("vendor", "/opt")` gives
/// `vendor/opt`, while `("", "/opt")` stays `/opt`.
pub fn compose_dir(base: &str, dir: &str) -> String {
    let mut out = PathBuf::new();
    let mut leading = true;

    for part in [base, dir] {
        if part.is_empty() {
            continue;
        }
        for component in Path::new(part).components() {
            match component {
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) if !leading => {}
                Component::ParentDir => match out.components().next_back() {
                    Some(Component::Normal(_)) => {
                        out.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => out.push(".."),
                },
                other => out.push(other.as_os_str()),
            }
        }
        leading = false;
    }

    out.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OutputStyle, Task, Var};
    use proptest::prelude::*;

    fn taskfile_with(tasks: &[(&str, Task)]) -> Taskfile {
        let mut tf = Taskfile {
            version: "2".to_string(),
            ..Taskfile::default()
        };
        for (name, task) in tasks {
            tf.tasks.insert(name.to_string(), task.clone());
        }
        tf
    }

    #[test]
    fn include_qualifies_names() {
        let mut root = taskfile_with(&[("build", Task::with_cmds(["make"]))]);
        let a = taskfile_with(&[("build", Task::with_cmds(["make a"]))]);
        let b = taskfile_with(&[("build", Task::with_cmds(["make b"]))]);

        merge(&mut root, a, MergeMode::Include("A")).unwrap();
        merge(&mut root, b, MergeMode::Include("B")).unwrap();

        let keys: Vec<_> = root.tasks.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A:build", "B:build", "build"]);
        assert_eq!(root.tasks["A:build"], Task::with_cmds(["make a"]));
        assert_eq!(root.tasks["B:build"], Task::with_cmds(["make b"]));
    }

    #[test]
    fn overlay_replaces_tasks() {
        let mut base = taskfile_with(&[
            ("build", Task::with_cmds(["make"])),
            ("test", Task::with_cmds(["make test"])),
        ]);
        let overlay = taskfile_with(&[("build", Task::with_cmds(["make.bat"]))]);

        merge(&mut base, overlay, MergeMode::Overlay).unwrap();

        assert_eq!(base.tasks["build"], Task::with_cmds(["make.bat"]));
        assert_eq!(base.tasks["test"], Task::with_cmds(["make test"]));
    }

    #[test]
    fn overlay_replaces_settings() {
        let mut base = taskfile_with(&[]);
        base.vars.insert("A".to_string(), Var::new("base"));
        base.vars.insert("B".to_string(), Var::new("base"));

        let mut overlay = taskfile_with(&[]);
        overlay.output = Some(OutputStyle::Group);
        overlay.expansions = Some(3);
        overlay.vars.insert("B".to_string(), Var::new("overlay"));
        overlay.env.insert("PATH".to_string(), Var::new("/bin"));

        merge(&mut base, overlay, MergeMode::Overlay).unwrap();

        assert_eq!(base.output, Some(OutputStyle::Group));
        assert_eq!(base.expansions, Some(3));
        assert_eq!(base.vars["A"], Var::new("base"));
        assert_eq!(base.vars["B"], Var::new("overlay"));
        assert_eq!(base.env["PATH"], Var::new("/bin"));
    }

    #[test]
    fn include_keeps_root_only_settings() {
        let mut root = taskfile_with(&[]);
        root.output = Some(OutputStyle::Interleaved);

        let mut included = taskfile_with(&[("fmt", Task::default())]);
        included.output = Some(OutputStyle::Prefixed);
        included.expansions = Some(5);

        merge(&mut root, included, MergeMode::Include("tools")).unwrap();

        assert_eq!(root.output, Some(OutputStyle::Interleaved));
        assert_eq!(root.expansions, None);
    }

    #[test]
    fn include_folds_globals_into_tasks() {
        let mut root = taskfile_with(&[]);
        root.vars.insert("ROOT".to_string(), Var::new("r"));

        let mut task = Task::default();
        task.vars.insert("MODE".to_string(), Var::new("task"));

        let mut included = taskfile_with(&[("fmt", task)]);
        included.vars.insert("MODE".to_string(), Var::new("file"));
        included.vars.insert("TOOL".to_string(), Var::new("gofmt"));
        included.env.insert("GOFLAGS".to_string(), Var::new("-mod=vendor"));

        merge(&mut root, included, MergeMode::Include("tools")).unwrap();

        let fmt = &root.tasks["tools:fmt"];
        assert_eq!(fmt.vars["MODE"], Var::new("task"));
        assert_eq!(fmt.vars["TOOL"], Var::new("gofmt"));
        assert_eq!(fmt.env["GOFLAGS"], Var::new("-mod=vendor"));

        assert_eq!(root.vars.len(), 1);
        assert!(root.env.is_empty());
    }

    #[test]
    fn include_overwrites_colliding_key() {
        let mut root = taskfile_with(&[("ns:x", Task::with_cmds(["root"]))]);
        let included = taskfile_with(&[("x", Task::with_cmds(["included"]))]);

        merge(&mut root, included, MergeMode::Include("ns")).unwrap();

        assert_eq!(root.tasks.len(), 1);
        assert_eq!(root.tasks["ns:x"], Task::with_cmds(["included"]));
    }

    #[test]
    fn version_mismatch_fails() {
        let mut root = taskfile_with(&[]);
        let mut other = taskfile_with(&[]);
        other.version = "3".to_string();

        let err = merge(&mut root, other, MergeMode::Overlay).unwrap_err();
        assert_eq!(
            err,
            MergeError::VersionMismatch {
                first: "2".to_string(),
                second: "3".to_string(),
            }
        );
    }

    #[test]
    fn invalid_namespaces_fail() {
        for ns in ["", "a:b", "with space"] {
            let mut root = taskfile_with(&[]);
            let err = merge(&mut root, taskfile_with(&[]), MergeMode::Include(ns)).unwrap_err();
            assert_eq!(err, MergeError::InvalidNamespace(ns.to_string()));
        }
    }

    #[test]
    fn source_with_includes_fails() {
        let mut root = taskfile_with(&[]);
        let mut overlay = taskfile_with(&[]);
        overlay
            .includes
            .insert("x".to_string(), crate::domain::IncludedTaskfile::new("x.yml"));

        let err = merge(&mut root, overlay, MergeMode::Overlay).unwrap_err();
        assert_eq!(err, MergeError::SourceHasIncludes);
    }

    #[test]
    fn compose_dir_joins_parts() {
        assert_eq!(compose_dir("sub", "x"), Path::new("sub").join("x").to_string_lossy());
        assert_eq!(compose_dir("sub", ""), "sub");
        assert_eq!(compose_dir("", "x"), "x");
        assert_eq!(compose_dir("", ""), "");
        assert_eq!(compose_dir("./vendor", "./tools"), Path::new("vendor").join("tools").to_string_lossy());
        assert_eq!(compose_dir("vendor", "../tools"), "tools");
        assert_eq!(compose_dir("", "../up"), Path::new("..").join("up").to_string_lossy());
    }

    #[cfg(unix)]
    #[test]
    fn compose_dir_nests_absolute_task_dir() {
        assert_eq!(compose_dir("vendor", "/opt/tools"), "vendor/opt/tools");
        assert_eq!(compose_dir("/srv", "/opt"), "/srv/opt");
        assert_eq!(compose_dir("", "/opt/tools"), "/opt/tools");
        assert_eq!(compose_dir("vendor", "/../tools"), "tools");
    }

    #[test]
    fn finalize_stamps_keys() {
        let mut tf = taskfile_with(&[("lint", Task::default()), ("docs:serve", Task::default())]);
        finalize(&mut tf);

        assert_eq!(tf.tasks["lint"].task, "lint");
        assert_eq!(tf.tasks["docs:serve"].task, "docs:serve");
    }

    proptest! {
        #[test]
        fn finalize_is_idempotent(names in prop::collection::btree_set("[a-z][a-z0-9_-]{0,8}", 0..8)) {
            let mut tf = Taskfile::default();
            for name in &names {
                tf.tasks.insert(name.clone(), Task::default());
            }

            finalize(&mut tf);
            let once = tf.clone();
            finalize(&mut tf);

            prop_assert_eq!(&tf, &once);
            for (key, task) in &tf.tasks {
                prop_assert_eq!(key, &task.task);
            }
        }

        #[test]
        fn namespaces_never_collide(
            names in prop::collection::btree_set("[a-z][a-z0-9_-]{0,8}", 1..6),
            a in "[a-z]{1,6}",
            b in "[A-Z]{1,6}",
        ) {
            let mut root = Taskfile::default();
            let mut first = Taskfile::default();
            let mut second = Taskfile::default();
            for name in &names {
                first.tasks.insert(name.clone(), Task::with_cmds(["first"]));
                second.tasks.insert(name.clone(), Task::with_cmds(["second"]));
            }

            merge(&mut root, first, MergeMode::Include(&a)).unwrap();
            merge(&mut root, second, MergeMode::Include(&b)).unwrap();

            prop_assert_eq!(root.tasks.len(), names.len() * 2);
            for name in &names {
                prop_assert_eq!(&root.tasks[&qualify_name(&a, name)], &Task::with_cmds(["first"]));
                prop_assert_eq!(&root.tasks[&qualify_name(&b, name)], &Task::with_cmds(["second"]));
            }
        }
    }
}
