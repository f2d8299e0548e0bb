use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use editor_builder::{driver, logging, Configuration, DriverOptions};

/// Build the editor with MSBuild, then package it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Build configuration: Debug, OptimizedDebug or Release
    #[arg(value_parser = Configuration::parse)]
    configuration: Configuration,

    /// Directory the repository-relative paths are resolved from
    #[arg(long, default_value = ".")]
    scripts_dir: PathBuf,

    /// Settings file (defaults to <scripts-dir>/editor-build.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// MSBuild installation directory, relative to the scripts directory unless absolute
    #[arg(long)]
    msbuild_dir: Option<PathBuf>,

    /// Solution to build, relative to the scripts directory unless absolute
    #[arg(long)]
    solution: Option<PathBuf>,

    /// Keep building and package even when a target fails
    #[arg(long)]
    keep_going: bool,

    /// Stop after building; do not run the packager
    #[arg(long)]
    skip_package: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let options = DriverOptions {
        configuration: cli.configuration,
        scripts_dir: cli.scripts_dir,
        config: cli.config,
        msbuild_dir: cli.msbuild_dir,
        solution: cli.solution,
        keep_going: cli.keep_going,
        skip_package: cli.skip_package,
    };
    let report = driver::run(&options, &driver::packager_path()?)?;

    if report.packaged {
        println!("[build:{}] build and package finished", options.configuration);
    } else {
        println!("[build:{}] done; packaging skipped", options.configuration);
    }
    Ok(())
}
