//! Fixed mapping from logical folder roles to input and output paths.
//!
//! All inputs live next to the scripts directory (`..`), the package root
//! defaults to `../Builds/Banshee3D`.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{Configuration, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderRole {
    EditorData,
    EngineData,
    Assemblies,
    Mono,
    NativeLibraries,
}

impl FolderRole {
    pub fn as_str(self) -> &'static str {
        match self {
            FolderRole::EditorData => "editor data",
            FolderRole::EngineData => "engine data",
            FolderRole::Assemblies => "assemblies",
            FolderRole::Mono => "mono runtime",
            FolderRole::NativeLibraries => "native libraries",
        }
    }
}

impl fmt::Display for FolderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPair {
    pub role: FolderRole,
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    pub configuration: Configuration,
    pub output_root: PathBuf,
    trees: Vec<FolderPair>,
    libraries: FolderPair,
}

impl PackageLayout {
    pub fn new(
        scripts_dir: &Path,
        configuration: Configuration,
        platform: &str,
        output_dir: &Path,
    ) -> Self {
        let repo = scripts_dir.join("..");
        let input_bin = repo.join("bin");
        let output_root = resolve_path(scripts_dir, output_dir);
        let output_bin = output_root.join("bin");

        let trees = vec![
            FolderPair {
                role: FolderRole::EditorData,
                input: repo.join("Data"),
                output: output_root.join("EditorData"),
            },
            FolderPair {
                role: FolderRole::EngineData,
                input: repo.join("Source").join("bsf").join("Data"),
                output: output_root.join("Data"),
            },
            FolderPair {
                role: FolderRole::Assemblies,
                input: input_bin.join("Assemblies"),
                output: output_bin.join("Assemblies"),
            },
            FolderPair {
                role: FolderRole::Mono,
                input: input_bin.join("Mono"),
                output: output_bin.join("Mono"),
            },
        ];

        let libraries = FolderPair {
            role: FolderRole::NativeLibraries,
            input: input_bin.join(platform).join(configuration.as_str()),
            output: output_root.clone(),
        };

        Self {
            configuration,
            output_root,
            trees,
            libraries,
        }
    }

    pub fn from_settings(
        scripts_dir: &Path,
        configuration: Configuration,
        settings: &Settings,
    ) -> Self {
        Self::new(
            scripts_dir,
            configuration,
            &settings.msbuild.platform,
            &settings.package.output_dir,
        )
    }

    /// Directory trees copied with the data ignore list, in copy order.
    pub fn trees(&self) -> &[FolderPair] {
        &self.trees
    }

    /// Native library folder, flattened into the package root.
    pub fn libraries(&self) -> &FolderPair {
        &self.libraries
    }
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
