//! Preflight checks run before the editor is built.
//!
//! Validates that the MSBuild installation exists and that the build tool
//! can be found once its binary directory is on the search path. The search
//! path is handed to the build tool's child process only; the environment of
//! the running process is left untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use editor_builder::preflight::{ensure_install_dir, locate_tool, search_path};
//! use std::path::Path;
//!
//! let install_dir = Path::new(r"C:\Program Files (x86)\MSBuild\14.0\Bin\amd64");
//! ensure_install_dir(install_dir)?;
//! let path = search_path(install_dir)?;
//! let msbuild = locate_tool("msbuild", &path)?;
//! ```

use anyhow::{bail, Context, Result};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Fail unless the build tool installation directory exists.
pub fn ensure_install_dir(install_dir: &Path) -> Result<()> {
    if !install_dir.is_dir() {
        bail!(
            "MSBuild path is not valid. Used path: '{}'\n\
             Set [msbuild].install_dir in editor-build.toml or pass --msbuild-dir.",
            install_dir.display()
        );
    }
    Ok(())
}

/// Current `PATH` with `install_dir` appended.
pub fn search_path(install_dir: &Path) -> Result<OsString> {
    let mut paths: Vec<PathBuf> = env::var_os("PATH")
        .map(|value| env::split_paths(&value).collect())
        .unwrap_or_default();
    paths.push(install_dir.to_path_buf());

    env::join_paths(paths)
        .with_context(|| format!("adding '{}' to the search path", install_dir.display()))
}

/// Resolve `program` against an explicit search path.
pub fn locate_tool(program: &str, search_path: &OsString) -> Result<PathBuf> {
    let cwd = env::current_dir().context("resolving current directory")?;
    which::which_in(program, Some(search_path), cwd).map_err(|err| {
        anyhow::anyhow!(
            "could not find '{}' on the search path ({}): {}",
            program,
            search_path.to_string_lossy(),
            err
        )
    })
}
