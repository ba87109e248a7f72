//! Output directory staging: destructive reset plus a filtered
//! recursive copy of the project's top-level entries.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Directory names that are never staged, independent of the
/// exclusion tokens.
const VCS_DIRS: &[&str] = &[".git"];

/// Remove `path` recursively if it exists, then recreate it empty.
pub fn reset_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path).with_context(|| {
            format!("failed to remove old output directory {}", path.display())
        })?;
    }

    fs::create_dir_all(path)
        .with_context(|| format!("failed to create output directory {}", path.display()))?;

    Ok(())
}

/// Whether the top-level entry `name` survives the filter.
///
/// Exclusion tokens match as substrings: the token `dist` skips both
/// `dist` and `distribution`. Version-control directories are skipped
/// by exact name.
pub fn keep_entry(name: &str, excludes: &[String]) -> bool {
    if VCS_DIRS.contains(&name) {
        return false;
    }

    !excludes.iter().any(|token| name.contains(token.as_str()))
}

/// Copy the immediate entries of `source` into `output`, skipping
/// excluded names. Content nested below a kept entry is copied
/// unconditionally. Returns the number of top-level entries staged.
pub fn copy_tree(source: &Path, output: &Path, excludes: &[String]) -> Result<usize> {
    let entries =
        fs::read_dir(source).with_context(|| format!("failed to list {}", source.display()))?;

    let mut staged = 0;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if !keep_entry(&name, excludes) {
            log::debug!("skipping {}", name);
            continue;
        }

        copy_entry(&entry.path(), &output.join(name.as_ref()))?;
        staged += 1;
    }

    Ok(staged)
}

fn copy_entry(src: &Path, dest: &Path) -> Result<()> {
    let file_type = fs::symlink_metadata(src)
        .with_context(|| format!("failed to stat {}", src.display()))?
        .file_type();

    if !file_type.is_dir() {
        fs::copy(src, dest).with_context(|| {
            format!("failed to copy {} to {}", src.display(), dest.display())
        })?;
        return Ok(());
    }

    for entry in WalkDir::new(src) {
        let entry = entry?;
        let target = dest.join(entry.path().strip_prefix(src)?);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("failed to create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }

    Ok(())
}
