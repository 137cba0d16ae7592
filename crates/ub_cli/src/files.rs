//! Input discovery.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::trace;

use crate::config::Config;

/// Expand `inputs` into a sorted list of files.
///
/// Files named explicitly are always taken; directories are walked for the
/// configured extensions, skipping `skip_dirs`.
pub fn collect_files(inputs: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            walk(input, config, &mut files)?;
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            bail!("no such file or directory: {}", input.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk(dir: &Path, config: &Config, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| config.skip_dirs.iter().any(|s| s == name));
            if skipped {
                trace!(dir = %path.display(), "skipping directory");
                continue;
            }
            walk(&path, config, files)?;
        } else if config.wants_extension(&path) {
            files.push(path);
        }
    }
    Ok(())
}
