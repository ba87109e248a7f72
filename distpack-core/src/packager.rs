//! The packaging sequence: reset, copy, fetch, rewrite, write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::manifest;
use crate::registry::RegistryLookup;
use crate::stage;

/// Inputs for one packaging run.
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// Project directory to stage.
    pub source_dir: PathBuf,
    /// Output directory; a relative path resolves inside `source_dir`.
    pub output_dir: PathBuf,
    /// Manifest file name inside `source_dir`.
    pub manifest_name: String,
    /// Registry package whose latest version stamps the manifest.
    pub package: String,
    /// Extra exclusion substrings for the top-level copy. The output
    /// directory's own name is always added.
    pub exclude: Vec<String>,
}

/// What a completed run did, serializable for `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub version: String,
    pub staged_entries: usize,
    /// False when the manifest had no version field and the staged
    /// copy was left unchanged.
    pub manifest_rewritten: bool,
}

/// Run the full sequence. The copy runs before the manifest write so
/// the rewrite overwrites the copy already staged. Any failure aborts
/// immediately; a partially populated output directory may remain.
pub fn package(opts: &PackageOptions, registry: &impl RegistryLookup) -> Result<PackageReport> {
    let output_dir = resolve_output_dir(opts);

    stage::reset_output_dir(&output_dir)?;

    let excludes = exclusion_tokens(opts, &output_dir);
    let staged_entries = stage::copy_tree(&opts.source_dir, &output_dir, &excludes)?;
    log::info!(
        "staged {} entries into {}",
        staged_entries,
        output_dir.display()
    );

    let version = registry
        .latest_version(&opts.package)
        .with_context(|| format!("latest-version lookup failed for '{}'", opts.package))?;
    log::info!("latest published version of {}: {}", opts.package, version);

    let source_manifest = opts.source_dir.join(&opts.manifest_name);
    let text = manifest::read_manifest(&source_manifest)?;
    let rewrite = manifest::rewrite_version(&text, &version)?;
    if !rewrite.matched {
        log::warn!(
            "{} has no \"version\" field; staged copy left unchanged",
            source_manifest.display()
        );
    }
    manifest::write_manifest(&output_dir.join(&opts.manifest_name), &rewrite.text)?;

    Ok(PackageReport {
        version,
        staged_entries,
        manifest_rewritten: rewrite.matched,
    })
}

fn resolve_output_dir(opts: &PackageOptions) -> PathBuf {
    if opts.output_dir.is_absolute() {
        opts.output_dir.clone()
    } else {
        opts.source_dir.join(&opts.output_dir)
    }
}

/// The configured tokens plus the output directory's own name, so a
/// stage rooted inside the source tree never copies into itself.
fn exclusion_tokens(opts: &PackageOptions, output_dir: &Path) -> Vec<String> {
    let mut tokens = opts.exclude.clone();

    if let Some(name) = output_dir.file_name().and_then(|n| n.to_str()) {
        if !tokens.iter().any(|t| t == name) {
            tokens.push(name.to_string());
        }
    }

    tokens
}
