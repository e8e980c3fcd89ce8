//! # Command-Line Interface
//!
//! A thin inspection tool over the loader. It never runs tasks.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Write a starter `Taskfile.yml` |
//! | `list` | List described tasks (`--all` for every task) |
//! | `show <task>` | Print one resolved task |
//! | `dump` | Print the whole resolved Taskfile |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output, YAML for definitions
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logs of each load step:
//! ```bash
//! taskfile --verbose list
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod init;
mod list;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
