//! Taskfile - resolves task-definition files into one task set
//!
//! A root `Taskfile.yml` may include other Taskfiles under a namespace, and
//! any Taskfile may have a platform overlay (`Taskfile_linux.yml`) next to
//! it. [`load_taskfile`] merges all of them into a single [`Taskfile`] whose
//! tasks are ready for a runner.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use taskfile::{load_taskfile, Platform};
//!
//! let tf = load_taskfile(Path::new("."), "Taskfile.yml", &Platform::current())?;
//! for (name, task) in &tf.tasks {
//!     println!("{} runs in '{}'", name, task.dir);
//! }
//! # Ok::<(), taskfile::ReadError>(())
//! ```

pub mod domain;
pub mod loader;
pub mod cli;

pub use domain::{IncludedTaskfile, Platform, Task, Taskfile};
pub use loader::{load_taskfile, Loader, ReadError};
