//! distpack-core: stage a project tree and stamp its manifest with the
//! latest registry-published version.
//!
//! A packaging run is a strict sequence with no branching states:
//!
//! 1. Reset the output directory (destroy and recreate).
//! 2. Copy the top-level entries of the project into it, skipping any
//!    entry whose name contains an exclusion token and skipping
//!    version-control directories.
//! 3. Ask a package registry CLI for the latest published version of
//!    the package.
//! 4. Rewrite the `"version"` field of the staged manifest to that
//!    version, treating the manifest as raw text.
//!
//! The first failure aborts the run; nothing is retried and no partial
//! output is rolled back.
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use distpack_core::packager::{package, PackageOptions};
//! use distpack_core::registry::NpmRegistry;
//!
//! let opts = PackageOptions {
//!     source_dir: PathBuf::from("."),
//!     output_dir: PathBuf::from("dist"),
//!     manifest_name: "package.json".to_string(),
//!     package: "tianjian-cicd".to_string(),
//!     exclude: Vec::new(),
//! };
//!
//! let report = package(&opts, &NpmRegistry::default())?;
//! println!("version {}", report.version);
//! #
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod manifest;
pub mod packager;
pub mod registry;
pub mod stage;
