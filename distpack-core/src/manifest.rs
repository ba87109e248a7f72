//! Textual manifest handling.
//!
//! The manifest is never parsed as structured JSON. Both the version
//! rewrite and the name lookup are first-match pattern operations over
//! raw text, depending on the `"field": "value"` quoting and spacing
//! that published manifests use. Everything outside the matched span
//! passes through byte-for-byte.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::{NoExpand, Regex};

const VERSION_FIELD: &str = r#""version": "[^"]*""#;
const NAME_FIELD: &str = r#""name": "([^"]*)""#;

/// Outcome of a version rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// False when the manifest had no version field and the text was
    /// returned unchanged.
    pub matched: bool,
}

/// Replace the first `"version": "..."` occurrence with `version`.
/// A manifest without a version field passes through unchanged.
pub fn rewrite_version(text: &str, version: &str) -> Result<Rewrite> {
    let pattern = Regex::new(VERSION_FIELD).context("version field pattern")?;

    if !pattern.is_match(text) {
        return Ok(Rewrite {
            text: text.to_string(),
            matched: false,
        });
    }

    let replacement = format!(r#""version": "{version}""#);
    Ok(Rewrite {
        // NoExpand keeps a `$` in the version literal
        text: pattern.replace(text, NoExpand(&replacement)).into_owned(),
        matched: true,
    })
}

/// First `"name": "..."` value in the manifest, if any.
pub fn extract_name(text: &str) -> Result<Option<String>> {
    let pattern = Regex::new(NAME_FIELD).context("name field pattern")?;

    Ok(pattern
        .captures(text)
        .map(|caps| caps[1].to_string()))
}

pub fn read_manifest(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))
}

pub fn write_manifest(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text)
        .with_context(|| format!("failed to write manifest {}", path.display()))
}
