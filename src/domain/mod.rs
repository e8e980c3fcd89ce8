//! Domain models for Taskfiles
//!
//! Contains the Taskfile model and the merge rules, without any I/O concerns.

mod vars;
mod task;
mod taskfile;
mod platform;
pub mod merge;

pub use vars::{Var, Vars};
pub use task::{Cmd, Dep, Task};
pub use taskfile::{IncludedTaskfile, OutputStyle, Taskfile};
pub use platform::Platform;
pub use merge::{compose_dir, finalize, merge, MergeError, MergeMode, NAMESPACE_SEPARATOR};
