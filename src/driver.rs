//! The `build-editor` flow.
//!
//! ```text
//! settings -> MSBuild dir check -> search path -> targets -> package-editor
//! ```
//!
//! Preflight failures stop the run before any child process starts. The
//! packager only runs once every target has been handled.

use anyhow::{bail, Context, Result};
use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{Configuration, Settings};
use crate::layout::resolve_path;
use crate::msbuild::{build_targets, BuildOutcome};
use crate::preflight;

/// Name of the packaging binary shipped next to `build-editor`.
pub const PACKAGER_BIN: &str = "package-editor";

/// What the driver was asked to do, after command-line parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverOptions {
    pub configuration: Configuration,
    pub scripts_dir: PathBuf,
    /// Settings file forwarded to the packager as well.
    pub config: Option<PathBuf>,
    pub msbuild_dir: Option<PathBuf>,
    pub solution: Option<PathBuf>,
    pub keep_going: bool,
    pub skip_package: bool,
}

impl DriverOptions {
    pub fn new(configuration: Configuration, scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            configuration,
            scripts_dir: scripts_dir.into(),
            config: None,
            msbuild_dir: None,
            solution: None,
            keep_going: false,
            skip_package: false,
        }
    }
}

#[derive(Debug)]
pub struct DriverReport {
    pub builds: Vec<BuildOutcome>,
    pub packaged: bool,
}

impl DriverReport {
    pub fn failed(&self) -> usize {
        self.builds.iter().filter(|outcome| !outcome.success()).count()
    }
}

/// Build every target, then run `packager` for the same configuration.
pub fn run(options: &DriverOptions, packager: &Path) -> Result<DriverReport> {
    let configuration = options.configuration;
    let mut settings = Settings::load(&options.scripts_dir, options.config.as_deref())?;
    if let Some(dir) = &options.msbuild_dir {
        settings.msbuild.install_dir = dir.clone();
    }
    if let Some(solution) = &options.solution {
        settings.msbuild.solution = solution.clone();
    }

    let install_dir = resolve_path(&options.scripts_dir, &settings.msbuild.install_dir);
    preflight::ensure_install_dir(&install_dir)?;
    let search_path = preflight::search_path(&install_dir)?;
    let program = preflight::locate_tool(&settings.msbuild.program, &search_path)?;
    if !options.skip_package {
        ensure_packager(packager)?;
    }

    let fail_on_error = settings.msbuild.fail_on_error && !options.keep_going;
    let builds = build_targets(
        &program,
        &search_path,
        &options.scripts_dir,
        configuration,
        &settings.msbuild,
        fail_on_error,
    )?;
    let mut report = DriverReport {
        builds,
        packaged: false,
    };

    let failed = report.failed();
    if failed > 0 {
        tracing::warn!(
            "[build:{configuration}] {} of {} targets failed; packaging anyway",
            failed,
            report.builds.len()
        );
    }

    if options.skip_package {
        tracing::info!("[build:{configuration}] packaging skipped");
        return Ok(report);
    }

    run_packager(
        packager,
        configuration,
        &options.scripts_dir,
        options.config.as_deref(),
    )?;
    report.packaged = true;
    Ok(report)
}

/// Run the packaging binary as a child process and check its exit status.
pub fn run_packager(
    packager: &Path,
    configuration: Configuration,
    scripts_dir: &Path,
    config: Option<&Path>,
) -> Result<()> {
    ensure_packager(packager)?;

    let mut cmd = Command::new(packager);
    cmd.arg(configuration.as_str())
        .arg("--scripts-dir")
        .arg(scripts_dir);
    if let Some(config) = config {
        cmd.arg("--config").arg(config);
    }

    tracing::info!("[build:{configuration}] running {}", packager.display());
    let status = cmd
        .status()
        .with_context(|| format!("running packager '{}'", packager.display()))?;

    if !status.success() {
        bail!("packaging failed for '{configuration}' with status {status}");
    }
    Ok(())
}

fn ensure_packager(packager: &Path) -> Result<()> {
    if !packager.is_file() {
        bail!("packager not found: '{}'", packager.display());
    }
    Ok(())
}

pub fn packager_file_name() -> String {
    format!("{PACKAGER_BIN}{EXE_SUFFIX}")
}

/// Where the packager lives: the directory of the running executable.
pub fn packager_path() -> Result<PathBuf> {
    let current = std::env::current_exe().context("resolving build-editor executable path")?;
    let dir = current
        .parent()
        .ok_or_else(|| anyhow::anyhow!("'{}' has no parent directory", current.display()))?;
    Ok(dir.join(packager_file_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packager_sits_next_to_current_exe() {
        let packager = packager_path().unwrap();
        let current = std::env::current_exe().unwrap();

        assert_eq!(packager.parent(), current.parent());
        assert_eq!(
            packager.file_name().unwrap().to_string_lossy(),
            packager_file_name()
        );
        assert!(packager_file_name().starts_with(PACKAGER_BIN));
        assert!(packager_file_name().ends_with(EXE_SUFFIX));
    }

    #[test]
    fn test_run_packager_missing_binary() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = run_packager(
            &temp.path().join(packager_file_name()),
            Configuration::Release,
            temp.path(),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("packager not found"));
    }

    #[cfg(unix)]
    mod fake_tools {
        use super::*;
        use crate::test_support::{logged_calls, write_fake_msbuild, write_fake_packager};
        use std::fs;
        use tempfile::TempDir;

        struct Checkout {
            _temp: TempDir,
            scripts: PathBuf,
            log: PathBuf,
            packager: PathBuf,
        }

        impl Checkout {
            fn options(&self) -> DriverOptions {
                DriverOptions {
                    msbuild_dir: Some(self.scripts.join("../MSBuild")),
                    ..DriverOptions::new(Configuration::Release, &self.scripts)
                }
            }

            fn msbuild_call(&self, flags: &str) -> String {
                format!(
                    "msbuild {}/../build/Banshee.sln /p:Configuration=Release;Platform=x64{flags}",
                    self.scripts.display()
                )
            }

            fn packager_call(&self) -> String {
                format!("package-editor Release --scripts-dir {}", self.scripts.display())
            }
        }

        /// Scripts dir, an MSBuild dir next to it, and a packager in `dist/`,
        /// all logging into one file.
        fn checkout(msbuild_code: i32, packager_code: i32) -> Checkout {
            let temp = TempDir::new().unwrap();
            let scripts = temp.path().join("Scripts");
            fs::create_dir_all(&scripts).unwrap();
            let log = temp.path().join("calls.log");
            write_fake_msbuild(&temp.path().join("MSBuild"), &log, msbuild_code);
            let packager = write_fake_packager(
                &temp.path().join("dist").join(packager_file_name()),
                &log,
                packager_code,
            );
            Checkout {
                _temp: temp,
                scripts,
                log,
                packager,
            }
        }

        #[test]
        fn test_run_builds_targets_then_packages() {
            let checkout = checkout(0, 0);

            let report = run(&checkout.options(), &checkout.packager).unwrap();

            assert!(report.packaged);
            assert_eq!(report.builds.len(), 2);
            assert_eq!(report.failed(), 0);
            assert_eq!(
                logged_calls(&checkout.log),
                vec![
                    checkout.msbuild_call(" /m"),
                    checkout.msbuild_call(" /m"),
                    checkout.packager_call(),
                ]
            );
        }

        #[test]
        fn test_run_missing_install_dir_spawns_nothing() {
            let checkout = checkout(0, 0);
            let options = DriverOptions {
                msbuild_dir: Some(checkout.scripts.join("../NoMSBuild")),
                ..checkout.options()
            };

            let err = run(&options, &checkout.packager).unwrap_err();

            assert!(err.to_string().contains("MSBuild path is not valid"));
            assert!(logged_calls(&checkout.log).is_empty());
        }

        #[test]
        fn test_run_resolves_relative_install_dir() {
            let checkout = checkout(0, 0);
            let options = DriverOptions {
                msbuild_dir: Some(PathBuf::from("../MSBuild")),
                ..checkout.options()
            };

            let report = run(&options, &checkout.packager).unwrap();

            assert!(report.packaged);
            assert_eq!(logged_calls(&checkout.log).len(), 3);
        }

        #[test]
        fn test_run_forwards_settings_file() {
            let checkout = checkout(0, 0);
            let config = checkout.scripts.join("ci.toml");
            fs::write(&config, "[msbuild]\nparallel = false\n").unwrap();
            let options = DriverOptions {
                config: Some(config.clone()),
                ..checkout.options()
            };

            run(&options, &checkout.packager).unwrap();

            let calls = logged_calls(&checkout.log);
            assert_eq!(calls[0], checkout.msbuild_call(""));
            assert_eq!(
                calls[2],
                format!("{} --config {}", checkout.packager_call(), config.display())
            );
        }

        #[test]
        fn test_run_failed_target_skips_packaging() {
            let checkout = checkout(1, 0);

            let err = run(&checkout.options(), &checkout.packager).unwrap_err();

            assert!(err.to_string().contains("target 'engine'"));
            assert_eq!(
                logged_calls(&checkout.log),
                vec![checkout.msbuild_call(" /m")]
            );
        }

        #[test]
        fn test_run_keep_going_still_packages() {
            let checkout = checkout(1, 0);
            let options = DriverOptions {
                keep_going: true,
                ..checkout.options()
            };

            let report = run(&options, &checkout.packager).unwrap();

            assert!(report.packaged);
            assert_eq!(report.failed(), 2);
            let calls = logged_calls(&checkout.log);
            assert_eq!(calls.len(), 3);
            assert_eq!(calls[2], checkout.packager_call());
        }

        #[test]
        fn test_run_packager_failure_is_an_error() {
            let checkout = checkout(0, 2);

            let err = run(&checkout.options(), &checkout.packager).unwrap_err();

            assert!(err.to_string().contains("packaging failed for 'Release'"));
            assert_eq!(logged_calls(&checkout.log).len(), 3);
        }

        #[test]
        fn test_run_skip_package() {
            let checkout = checkout(0, 0);
            let options = DriverOptions {
                skip_package: true,
                ..checkout.options()
            };
            let missing = checkout.scripts.join("no-packager");

            let report = run(&options, &missing).unwrap();

            assert!(!report.packaged);
            assert_eq!(logged_calls(&checkout.log).len(), 2);
        }

        #[test]
        fn test_run_missing_packager_builds_nothing() {
            let checkout = checkout(0, 0);
            let missing = checkout.scripts.join("no-packager");

            let err = run(&checkout.options(), &missing).unwrap_err();

            assert!(err.to_string().contains("packager not found"));
            assert!(logged_calls(&checkout.log).is_empty());
        }
    }
}
