//! Build and packaging tooling for the Banshee3D editor.
//!
//! Two binaries sit on top of this crate:
//!
//! - **`build-editor`** - checks the MSBuild installation, builds the
//!   editor solution for one configuration, then runs the packager
//! - **`package-editor`** - assembles `Builds/Banshee3D/` from the data
//!   folders and previously built binaries
//!
//! # Layout
//!
//! ```text
//! <repo>/
//!     ├── Scripts/              (scripts dir, default working directory)
//!     ├── Data/                 -> Builds/Banshee3D/EditorData
//!     ├── Source/bsf/Data/      -> Builds/Banshee3D/Data
//!     ├── bin/Assemblies/       -> Builds/Banshee3D/bin/Assemblies
//!     ├── bin/Mono/             -> Builds/Banshee3D/bin/Mono
//!     └── bin/x64/<Config>/     -> Builds/Banshee3D/ (flat, binaries only)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use editor_builder::{package_editor, Configuration, PackageLayout, Settings};
//! use std::path::Path;
//!
//! let scripts = Path::new("Scripts");
//! let settings = Settings::load(scripts, None)?;
//! let layout = PackageLayout::from_settings(scripts, Configuration::Release, &settings);
//! let report = package_editor(&layout, &settings.package)?;
//! println!("{}", report.summary());
//! ```

pub mod config;
pub mod driver;
pub mod layout;
pub mod logging;
pub mod msbuild;
pub mod package;
pub mod preflight;

#[cfg(all(test, unix))]
mod test_support;

pub use config::{Configuration, MsBuildSettings, PackageSettings, Settings};
pub use driver::{DriverOptions, DriverReport};
pub use layout::{FolderRole, PackageLayout};
pub use msbuild::{BuildOutcome, BuildTarget, MsBuildInvocation};
pub use package::{package_editor, PackageReport};
