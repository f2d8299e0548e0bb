use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use editor_builder::{logging, package_editor, Configuration, PackageLayout, Settings};

/// Copy the built editor and its data into Builds/Banshee3D.
///
/// The editor must already be built for the chosen configuration.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Build configuration to package: Debug, OptimizedDebug or Release
    #[arg(value_parser = Configuration::parse)]
    configuration: Configuration,

    /// Directory the repository-relative paths are resolved from
    #[arg(long, default_value = ".")]
    scripts_dir: PathBuf,

    /// Settings file (defaults to <scripts-dir>/editor-build.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Package root, relative to the scripts directory unless absolute
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let mut settings = Settings::load(&cli.scripts_dir, cli.config.as_deref())?;
    if let Some(output) = cli.output {
        settings.package.output_dir = output;
    }

    let layout = PackageLayout::from_settings(&cli.scripts_dir, cli.configuration, &settings);
    let report = package_editor(&layout, &settings.package)?;

    println!("[package:{}] {}", cli.configuration, report.summary());
    Ok(())
}
