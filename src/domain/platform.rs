//! Host platform identifier
//!
//! Only used to build overlay file names such as `Taskfile_linux.yml`.
//! Names follow the Taskfile convention (`darwin`, not Rust's `macos`).

use std::fmt;

/// A platform identifier (`linux`, `darwin`, `windows`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform(String);

impl Platform {
    /// Creates a platform from an arbitrary identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The platform this binary was built for
    pub fn current() -> Self {
        Self::new(overlay_name(std::env::consts::OS))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Maps a Rust OS name to the name used in overlay files
fn overlay_name(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
