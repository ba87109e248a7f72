//! distpack CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser, ValueHint};

use distpack_core::manifest;
use distpack_core::packager::{package, PackageOptions, PackageReport};
use distpack_core::registry::NpmRegistry;

/// CLI entrypoint for distpack.
#[derive(Debug, Parser)]
#[command(
    name = "distpack",
    about = "Stage a project into a dist directory and stamp its manifest with the latest registry version"
)]
pub struct Cli {
    /// Project directory to package
    #[arg(value_hint = ValueHint::DirPath, default_value = ".")]
    dir: PathBuf,

    /// Output directory (relative paths resolve inside DIR)
    #[arg(short = 'o', long = "out", default_value = "dist", value_hint = ValueHint::DirPath)]
    out: PathBuf,

    /// Manifest file name inside DIR
    #[arg(short = 'm', long = "manifest", default_value = "package.json")]
    manifest: String,

    /// Registry package to query; defaults to the manifest's "name" field
    #[arg(short = 'p', long = "package")]
    package: Option<String>,

    /// Additional substrings excluded from the top-level copy
    #[arg(short = 'x', long = "exclude", value_hint = ValueHint::Other)]
    exclude: Vec<String>,

    /// Registry CLI program to invoke
    #[arg(long = "npm-bin", default_value = "npm")]
    npm_bin: String,

    /// Emit the run report as pretty JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

/// Parse CLI args and run one packaging sequence.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let report = execute(&cli)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if cli.json {
        let json = serde_json::to_string_pretty(&report)?;
        writeln!(handle, "{json}")?;
    } else {
        writeln!(handle, "version {}", report.version)?;
    }

    Ok(())
}

fn execute(cli: &Cli) -> Result<PackageReport> {
    let opts = PackageOptions {
        source_dir: cli.dir.clone(),
        output_dir: cli.out.clone(),
        manifest_name: cli.manifest.clone(),
        package: resolve_package_name(cli)?,
        exclude: cli.exclude.clone(),
    };

    package(&opts, &NpmRegistry::new(cli.npm_bin.clone()))
}

/// `--package` wins; otherwise the manifest's own name, so the tool
/// runs with no arguments at all from a project root.
fn resolve_package_name(cli: &Cli) -> Result<String> {
    if let Some(name) = &cli.package {
        return Ok(name.clone());
    }

    let manifest_path = cli.dir.join(&cli.manifest);
    let text = manifest::read_manifest(&manifest_path)?;
    manifest::extract_name(&text)?.ok_or_else(|| {
        anyhow!(
            "{} has no \"name\" field; pass --package",
            manifest_path.display()
        )
    })
}
