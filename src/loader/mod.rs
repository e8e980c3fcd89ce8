//! # Loader
//!
//! Turns a root Taskfile on disk into one resolved [`Taskfile`].
//!
//! ## File Layout
//!
//! | File | Role |
//! |------|------|
//! | `Taskfile.yml` | Entrypoint (configurable) |
//! | `Taskfile_<platform>.yml` | Root overlay, merged last |
//! | `<include>` or `<include>/Taskfile.yml` | Included file, merged under its namespace |
//! | `<include stem>_<platform>.<ext>` | Overlay of an included file |
//!
//! Only the root may declare includes. An included file with its own
//! `includes` is rejected with [`ReadError::NestedIncludes`].
//!
//! ## Key Types
//!
//! - [`Loader`] - Include resolution, overlays and finalization
//! - [`load_taskfile`] - One-shot load for a platform
//! - [`read_taskfile`] - Decodes a single file
//! - [`Config`] - User configuration
//!
//! [`Taskfile`]: crate::domain::Taskfile

mod reader;
mod resolver;
mod config;

pub use reader::{read_taskfile, ReadError};
pub use resolver::{load_taskfile, Loader, DEFAULT_TASKFILE};
pub use config::{Config, ConfigError, OutputFormat};
