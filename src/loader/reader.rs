//! Taskfile decoding
//!
//! Reads one file from disk and decodes it as YAML. Every loader step goes
//! through [`read_taskfile`], so root, included and overlay files fail the
//! same way.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::{MergeError, Taskfile};

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("No Taskfile found on \"{}\". Use \"taskfile init\" to create a new one", path.display())]
    NotFound { path: PathBuf },

    #[error(
        "Included Taskfiles can't have includes. Please, move the include to the main Taskfile \
         (include '{namespace}' at {})",
        path.display()
    )]
    NestedIncludes { namespace: String, path: PathBuf },

    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to merge {}", path.display())]
    Merge {
        path: PathBuf,
        #[source]
        source: MergeError,
    },
}

impl ReadError {
    /// The file the error refers to
    pub fn path(&self) -> &Path {
        match self {
            ReadError::NotFound { path }
            | ReadError::NestedIncludes { path, .. }
            | ReadError::Io { path, .. }
            | ReadError::Decode { path, .. }
            | ReadError::Merge { path, .. } => path,
        }
    }
}

/// Decodes the Taskfile at `path`
pub fn read_taskfile(path: &Path) -> Result<Taskfile, ReadError> {
    debug!(path = %path.display(), "reading Taskfile");

    let content = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(Taskfile::default());
    }

    serde_yaml::from_str(&content).map_err(|source| ReadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
