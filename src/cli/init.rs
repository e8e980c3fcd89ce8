//! `taskfile init`

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::output::Output;

const DEFAULT_TASKFILE_CONTENT: &str = r#"# https://taskfile.dev

version: '2'

vars:
  GREETING: Hello, World!

tasks:
  default:
    desc: Print a greeting
    cmds:
      - echo "{{.GREETING}}"
    silent: true
"#;

/// Writes a starter Taskfile, refusing to overwrite an existing one
pub fn run(output: &Output, dir: &Path, entrypoint: &str) -> Result<()> {
    let path = dir.join(entrypoint);
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    fs::write(&path, DEFAULT_TASKFILE_CONTENT)
        .with_context(|| format!("Failed to write Taskfile: {}", path.display()))?;

    output.success(&format!("Created {}", path.display()));
    Ok(())
}
