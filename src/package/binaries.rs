//! Flat copy of built binaries selected by extension.
//!
//! The whole library tree is walked but every match lands directly in the
//! destination directory. Two files with the same name in different
//! subdirectories collide: the one walked last wins. Each directory's files
//! are visited before its subdirectories, both sorted by name, so a nested
//! copy overwrites a shallower one and the winner does not depend on the
//! filesystem.

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryFilter {
    /// Lowercased suffixes including the dot, e.g. `.dll`.
    suffixes: Vec<String>,
    denied: BTreeSet<String>,
}

impl BinaryFilter {
    pub fn new<E, D, S, T>(extensions: E, denied: D) -> Self
    where
        E: IntoIterator<Item = S>,
        D: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let suffixes = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref().trim().trim_start_matches('.');
                format!(".{}", ext.to_ascii_lowercase())
            })
            .collect();
        let denied = denied
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        Self { suffixes, denied }
    }

    /// Case-insensitive extension match, exact-name deny-list.
    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.suffixes.iter().any(|suffix| lower.ends_with(suffix.as_str()))
            && !self.denied.contains(file_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryCopy {
    /// Destination paths, one per copy, in walk order.
    pub copied: Vec<PathBuf>,
    /// Names written more than once.
    pub overwritten: Vec<String>,
}

impl BinaryCopy {
    /// Distinct files present in the destination after the copy.
    pub fn unique(&self) -> usize {
        self.copied.iter().collect::<HashSet<_>>().len()
    }
}

/// Copy every matching file under `src` into the flat directory `dst`.
pub fn copy_binaries(src: &Path, dst: &Path, filter: &BinaryFilter) -> Result<BinaryCopy> {
    fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory: {}", dst.display()))?;

    let mut copy = BinaryCopy::default();
    let mut seen = HashSet::new();

    let walk = WalkDir::new(src).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });

    for entry in walk {
        let entry =
            entry.with_context(|| format!("Failed to walk binaries in {}", src.display()))?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !filter.matches(&name) {
            continue;
        }

        let dst_path = dst.join(entry.file_name());
        fs::copy(entry.path(), &dst_path).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                entry.path().display(),
                dst_path.display()
            )
        })?;

        if !seen.insert(entry.file_name().to_os_string()) {
            tracing::debug!("{} overwritten by {}", name, entry.path().display());
            copy.overwritten.push(name.to_string());
        }
        copy.copied.push(dst_path);
    }

    Ok(copy)
}
