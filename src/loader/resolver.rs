//! Include resolution and platform overlays
//!
//! Loading a root Taskfile runs these steps:
//!
//! 1. Decode the entrypoint
//! 2. For each include, in declaration order: decode the target, reject it if
//!    it declares includes itself, apply its platform overlay, prefix its
//!    tasks' `dir`, and merge it in under its namespace
//! 3. Apply the root's platform overlay, always `Taskfile_<platform>.yml`
//!    whatever the entrypoint (after includes, so it can override included
//!    tasks too)
//! 4. Stamp every task with its name
//!
//! Any error aborts the whole load; the half-merged tree is dropped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::reader::{read_taskfile, ReadError};
use crate::domain::{compose_dir, finalize, merge, IncludedTaskfile, MergeMode, Platform, Taskfile};

/// File name used for the entrypoint and for directory includes
pub const DEFAULT_TASKFILE: &str = "Taskfile.yml";

/// Loads and resolves Taskfiles for one platform
#[derive(Debug, Clone)]
pub struct Loader {
    platform: Platform,
    default_file: String,
}

impl Loader {
    /// Creates a loader that applies overlays for `platform`
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            default_file: DEFAULT_TASKFILE.to_string(),
        }
    }

    /// Sets the file name looked up when an include points at a directory
    pub fn with_default_file(mut self, name: impl Into<String>) -> Self {
        self.default_file = name.into();
        self
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Loads `<dir>/<entrypoint>` with its includes and overlays merged in
    pub fn load(&self, dir: &Path, entrypoint: &str) -> Result<Taskfile, ReadError> {
        let path = dir.join(entrypoint);
        match fs::metadata(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ReadError::NotFound { path });
            }
            Err(source) => return Err(ReadError::Io { path, source }),
        }

        let mut taskfile = read_taskfile(&path)?;
        self.resolve_includes(dir, &mut taskfile)?;
        self.merge_overlay_file(self.root_overlay_path(dir), &mut taskfile)?;
        finalize(&mut taskfile);

        debug!(
            path = %path.display(),
            tasks = taskfile.tasks.len(),
            "Taskfile loaded"
        );
        Ok(taskfile)
    }

    /// Merges every include of `root` into it
    ///
    /// `dir` is the directory include paths are relative to. The include
    /// map itself is left on `root`.
    pub fn resolve_includes(&self, dir: &Path, root: &mut Taskfile) -> Result<(), ReadError> {
        let includes = std::mem::take(&mut root.includes);

        for (namespace, include) in &includes {
            let (path, included) = self.load_included(dir, namespace, include)?;
            merge(root, included, MergeMode::Include(namespace))
                .map_err(|source| ReadError::Merge { path, source })?;
        }

        root.includes = includes;
        Ok(())
    }

    fn load_included(
        &self,
        dir: &Path,
        namespace: &str,
        include: &IncludedTaskfile,
    ) -> Result<(PathBuf, Taskfile), ReadError> {
        let mut path = dir.join(&include.taskfile);
        let metadata = fs::metadata(&path).map_err(|source| ReadError::Io {
            path: path.clone(),
            source,
        })?;
        if metadata.is_dir() {
            path = path.join(&self.default_file);
        }
        debug!(namespace, path = %path.display(), "resolving include");

        let mut included = read_taskfile(&path)?;
        if included.has_includes() {
            return Err(ReadError::NestedIncludes {
                namespace: namespace.to_string(),
                path,
            });
        }

        self.apply_overlay(&path, &mut included)?;

        for task in included.tasks.values_mut() {
            task.dir = compose_dir(&include.dir, &task.dir);
        }

        Ok((path, included))
    }

    /// Merges the platform overlay of the file at `base_path` into `base`
    ///
    /// A missing overlay file is not an error.
    pub fn apply_overlay(&self, base_path: &Path, base: &mut Taskfile) -> Result<(), ReadError> {
        self.merge_overlay_file(self.overlay_path(base_path), base)
    }

    fn merge_overlay_file(&self, path: PathBuf, base: &mut Taskfile) -> Result<(), ReadError> {
        match fs::metadata(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => return Err(ReadError::Io { path, source }),
        }
        debug!(path = %path.display(), platform = %self.platform, "applying platform overlay");

        let overlay = read_taskfile(&path)?;
        merge(base, overlay, MergeMode::Overlay).map_err(|source| ReadError::Merge { path, source })
    }

    /// `<dir>/Taskfile_<platform>.yml`, the root overlay
    pub fn root_overlay_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("Taskfile_{}.yml", self.platform))
    }

    /// `<dir>/<stem>_<platform>.<ext>` next to an included file
    pub fn overlay_path(&self, base_path: &Path) -> PathBuf {
        let dir = base_path.parent().unwrap_or_else(|| Path::new(""));
        let stem = base_path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();

        let mut name = format!("{}_{}", stem, self.platform);
        if let Some(ext) = base_path.extension() {
            name.push('.');
            name.push_str(&ext.to_string_lossy());
        }

        dir.join(name)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

/// Loads `<dir>/<entrypoint>` for `platform` with the default settings
pub fn load_taskfile(dir: &Path, entrypoint: &str, platform: &Platform) -> Result<Taskfile, ReadError> {
    Loader::new(platform.clone()).load(dir, entrypoint)
}
