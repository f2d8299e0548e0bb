//! Build configuration selection and the optional `editor-build.toml` settings file.
//!
//! Every table and field in the settings file is optional. Missing values fall
//! back to the defaults below, which describe the stock Windows x64 editor
//! build.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::msbuild::BuildTarget;

/// Settings file looked up in the scripts directory when `--config` is not given.
pub const SETTINGS_FILENAME: &str = "editor-build.toml";

pub const DEFAULT_MSBUILD_DIR: &str = r"C:\Program Files (x86)\MSBuild\14.0\Bin\amd64";
pub const DEFAULT_MSBUILD_PROGRAM: &str = "msbuild";
pub const DEFAULT_SOLUTION: &str = "../build/Banshee.sln";
pub const DEFAULT_PLATFORM: &str = "x64";
pub const DEFAULT_OUTPUT_DIR: &str = "../Builds/Banshee3D";

pub const DEFAULT_DATA_IGNORE: &[&str] = &["Raw", "Settings.asset"];
pub const DEFAULT_BIN_IGNORE: &[&str] = &["Game.exe", "Game.pdb"];
pub const DEFAULT_BINARY_EXTENSIONS: &[&str] = &["dll", "exe", "pdb", "so", "dylib"];

/// Named build variant. Selects compiler flags on the MSBuild side and the
/// `bin/<platform>/<Configuration>` folder native libraries are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Configuration {
    Debug,
    OptimizedDebug,
    Release,
}

impl Configuration {
    pub const ALL: [Configuration; 3] = [
        Configuration::Debug,
        Configuration::OptimizedDebug,
        Configuration::Release,
    ];

    /// Canonical name, as MSBuild and the output folders spell it.
    pub fn as_str(self) -> &'static str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::OptimizedDebug => "OptimizedDebug",
            Configuration::Release => "Release",
        }
    }

    /// Parse a configuration name, ignoring ASCII case.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Configuration::Debug),
            "optimizeddebug" | "optimized-debug" => Ok(Configuration::OptimizedDebug),
            "release" => Ok(Configuration::Release),
            _ => bail!(
                "unsupported configuration '{}'; expected one of: {}",
                value.trim(),
                Self::ALL.map(Configuration::as_str).join(", ")
            ),
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub msbuild: MsBuildSettings,
    pub package: PackageSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MsBuildSettings {
    /// MSBuild installation directory; must exist before anything is built.
    pub install_dir: PathBuf,
    /// Executable name looked up on the search path.
    pub program: String,
    /// Solution path, relative to the scripts directory unless absolute.
    pub solution: PathBuf,
    pub platform: String,
    /// Pass `/m` so MSBuild builds projects in parallel.
    pub parallel: bool,
    pub targets: Vec<BuildTarget>,
    /// Abort before packaging when a target fails to build.
    pub fail_on_error: bool,
}

impl Default for MsBuildSettings {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from(DEFAULT_MSBUILD_DIR),
            program: DEFAULT_MSBUILD_PROGRAM.to_string(),
            solution: PathBuf::from(DEFAULT_SOLUTION),
            platform: DEFAULT_PLATFORM.to_string(),
            parallel: true,
            targets: BuildTarget::defaults(),
            fail_on_error: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSettings {
    /// Entry names skipped at every level while copying data trees.
    pub data_ignore: Vec<String>,
    /// File names never copied out of the native library folder.
    pub bin_ignore: Vec<String>,
    /// Extensions (without the dot) picked up from the native library folder.
    pub binary_extensions: Vec<String>,
    /// Package root, relative to the scripts directory unless absolute.
    pub output_dir: PathBuf,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            data_ignore: to_strings(DEFAULT_DATA_IGNORE),
            bin_ignore: to_strings(DEFAULT_BIN_IGNORE),
            binary_extensions: to_strings(DEFAULT_BINARY_EXTENSIONS),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Settings {
    /// Load settings for a run.
    ///
    /// An explicit path must exist. Otherwise `editor-build.toml` in the
    /// scripts directory is used when present, and the defaults when it is not.
    pub fn load(scripts_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    bail!("settings file not found: '{}'", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let candidate = scripts_dir.join(SETTINGS_FILENAME);
                if !candidate.is_file() {
                    tracing::debug!(
                        "no {} in '{}'; using defaults",
                        SETTINGS_FILENAME,
                        scripts_dir.display()
                    );
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading settings file '{}'", path.display()))?;
        let settings = Self::parse(&text)
            .with_context(|| format!("parsing settings file '{}'", path.display()))?;
        tracing::debug!("loaded settings from '{}'", path.display());
        Ok(settings)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.msbuild.program.trim().is_empty() {
            bail!("msbuild.program must not be empty");
        }
        if self.msbuild.platform.trim().is_empty() {
            bail!("msbuild.platform must not be empty");
        }
        if self.msbuild.targets.is_empty() {
            bail!("msbuild.targets must name at least one target");
        }
        if self.package.binary_extensions.is_empty() {
            bail!("package.binary_extensions must not be empty");
        }
        Ok(())
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
