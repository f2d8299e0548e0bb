//! Recursive directory copy with a name-based ignore list.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

/// Entry names skipped while copying a tree.
///
/// Matching is exact and applies at every directory level, so an ignored
/// name is skipped wherever the walk meets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    ignored: BTreeSet<String>,
}

impl EntryFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ignored: names.into_iter().map(|n| n.as_ref().to_string()).collect(),
        }
    }

    pub fn is_ignored(&self, name: &OsStr) -> bool {
        name.to_str()
            .map(|name| self.ignored.contains(name))
            .unwrap_or(false)
    }
}

/// What a single [`copy_tree`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeCopy {
    pub files: usize,
    pub directories: usize,
    /// Source paths skipped by the filter.
    pub ignored: Vec<PathBuf>,
}

/// Copy every entry of `src` into `dst`, skipping ignored names.
///
/// `dst` and any nested directories are created when missing. Symlinks are
/// followed. Regular files keep their permissions and access/modification
/// times.
///
/// # Errors
///
/// Fails when `src` (or any nested directory) cannot be listed, or when a
/// file cannot be copied. Nothing is rolled back.
pub fn copy_tree(src: &Path, dst: &Path, filter: &EntryFilter) -> Result<TreeCopy> {
    let mut copy = TreeCopy::default();
    copy_tree_into(src, dst, filter, &mut copy)?;
    Ok(copy)
}

fn copy_tree_into(
    src: &Path,
    dst: &Path,
    filter: &EntryFilter,
    copy: &mut TreeCopy,
) -> Result<()> {
    if !dst.exists() {
        fs::create_dir_all(dst)
            .with_context(|| format!("Failed to create directory: {}", dst.display()))?;
        copy.directories += 1;
    }

    let mut entries = fs::read_dir(src)
        .with_context(|| format!("Failed to read directory: {}", src.display()))?
        .collect::<io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read directory entry in {}", src.display()))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name();
        let src_path = entry.path();

        if filter.is_ignored(&name) {
            tracing::info!("Ignoring {}", src_path.display());
            copy.ignored.push(src_path);
            continue;
        }

        let dst_path = dst.join(&name);
        tracing::debug!("{}", src_path.display());

        let metadata = fs::metadata(&src_path)
            .with_context(|| format!("Failed to stat {}", src_path.display()))?;
        if metadata.is_dir() {
            copy_tree_into(&src_path, &dst_path, filter, copy)?;
        } else {
            copy_file_preserving(&src_path, &dst_path)?;
            copy.files += 1;
        }
    }

    Ok(())
}

/// Copy file contents, then times, then permissions.
pub fn copy_file_preserving(src: &Path, dst: &Path) -> Result<()> {
    let metadata =
        fs::metadata(src).with_context(|| format!("Failed to stat {}", src.display()))?;

    let mut reader =
        File::open(src).with_context(|| format!("Failed to open {}", src.display()))?;
    let mut writer =
        File::create(dst).with_context(|| format!("Failed to create {}", dst.display()))?;
    io::copy(&mut reader, &mut writer).with_context(|| {
        format!("Failed to copy {} to {}", src.display(), dst.display())
    })?;

    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    writer
        .set_times(times)
        .with_context(|| format!("Failed to set file times on {}", dst.display()))?;
    drop(writer);

    fs::set_permissions(dst, metadata.permissions())
        .with_context(|| format!("Failed to set permissions on {}", dst.display()))?;
    Ok(())
}
