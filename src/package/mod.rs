//! Editor packaging: assemble `Builds/Banshee3D/` from built artifacts.
//!
//! This module provides:
//! - [`tree`] - recursive copy with a name-based ignore list
//! - [`binaries`] - flat, extension-filtered copy of built binaries
//!
//! The editor build is expected to exist already; nothing here invokes
//! MSBuild.

pub mod binaries;
pub mod tree;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PackageSettings;
use crate::layout::PackageLayout;

use self::binaries::{copy_binaries, BinaryFilter};
use self::tree::{copy_tree, EntryFilter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageReport {
    pub output_root: PathBuf,
    /// Whether a previous package was removed first.
    pub cleaned: bool,
    pub files_copied: usize,
    pub directories_created: usize,
    pub ignored: Vec<PathBuf>,
    pub binaries: Vec<PathBuf>,
    pub overwritten: Vec<String>,
}

impl PackageReport {
    pub fn summary(&self) -> String {
        format!(
            "packaged {} files and {} binaries into {} ({} ignored, {} overwritten)",
            self.files_copied,
            self.binaries.len(),
            self.output_root.display(),
            self.ignored.len(),
            self.overwritten.len()
        )
    }
}

/// Package the editor described by `layout`.
///
/// Any existing package at the output root is deleted first so nothing from
/// an earlier run (or another configuration) survives.
pub fn package_editor(layout: &PackageLayout, settings: &PackageSettings) -> Result<PackageReport> {
    let mut report = PackageReport {
        output_root: layout.output_root.clone(),
        cleaned: clean_output(&layout.output_root)?,
        ..PackageReport::default()
    };

    let data_filter = EntryFilter::new(&settings.data_ignore);
    for pair in layout.trees() {
        tracing::info!(
            "[package] {}: '{}' -> '{}'",
            pair.role,
            pair.input.display(),
            pair.output.display()
        );
        let copy = copy_tree(&pair.input, &pair.output, &data_filter)
            .with_context(|| format!("copying {} from '{}'", pair.role, pair.input.display()))?;
        report.files_copied += copy.files;
        report.directories_created += copy.directories;
        report.ignored.extend(copy.ignored);
    }

    let libraries = layout.libraries();
    tracing::info!(
        "[package] {} ({}): '{}' -> '{}'",
        libraries.role,
        layout.configuration,
        libraries.input.display(),
        libraries.output.display()
    );
    let binary_filter = BinaryFilter::new(&settings.binary_extensions, &settings.bin_ignore);
    let copy = copy_binaries(&libraries.input, &libraries.output, &binary_filter).with_context(
        || {
            format!(
                "copying {} from '{}'",
                libraries.role,
                libraries.input.display()
            )
        },
    )?;
    tracing::debug!(
        "[package] {} binary copies, {} distinct files",
        copy.copied.len(),
        copy.unique()
    );

    let mut binaries = copy.copied;
    binaries.sort();
    binaries.dedup();
    report.binaries = binaries;
    report.overwritten = copy.overwritten;

    tracing::info!("[package] {}", report.summary());
    Ok(report)
}

/// Remove a previous package. Returns whether anything was removed.
pub fn clean_output(output_root: &Path) -> Result<bool> {
    if !output_root.exists() {
        return Ok(false);
    }
    tracing::info!("[package] removing previous package '{}'", output_root.display());
    fs::remove_dir_all(output_root).with_context(|| {
        format!(
            "removing existing package directory '{}'",
            output_root.display()
        )
    })?;
    Ok(true)
}
