//! Latest-version lookup against a package registry CLI.

use std::process::{Command, ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("`{command}` produced non-UTF-8 output")]
    OutputNotUtf8 { command: String },

    #[error("registry returned no version for package '{package}'")]
    EmptyVersion { package: String },
}

/// Anything that can answer "what is the latest published version of
/// this package?". The packaging sequence only sees this trait, so
/// tests can run against a canned answer instead of a live registry.
pub trait RegistryLookup {
    fn latest_version(&self, package: &str) -> Result<String, RegistryError>;
}

/// Blocking `npm view <package> version` invocation.
#[derive(Debug, Clone)]
pub struct NpmRegistry {
    program: String,
}

impl NpmRegistry {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn describe(&self, package: &str) -> String {
        format!("{} view {} version", self.program, package)
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new("npm")
    }
}

impl RegistryLookup for NpmRegistry {
    fn latest_version(&self, package: &str) -> Result<String, RegistryError> {
        log::info!("querying registry: {}", self.describe(package));

        let output = Command::new(&self.program)
            .arg("view")
            .arg(package)
            .arg("version")
            .output()
            .map_err(|source| RegistryError::Spawn {
                command: self.describe(package),
                source,
            })?;

        if !output.status.success() {
            return Err(RegistryError::CommandFailed {
                command: self.describe(package),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| RegistryError::OutputNotUtf8 {
            command: self.describe(package),
        })?;

        // npm terminates the value with a newline
        let version: String = stdout.chars().filter(|c| !c.is_whitespace()).collect();
        if version.is_empty() {
            return Err(RegistryError::EmptyVersion {
                package: package.to_string(),
            });
        }

        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = RegistryError::EmptyVersion {
            package: "tianjian-cicd".to_string(),
        };
        assert!(err.to_string().contains("tianjian-cicd"));
        assert!(err.to_string().contains("no version"));

        let err = RegistryError::OutputNotUtf8 {
            command: "npm view x version".to_string(),
        };
        assert!(err.to_string().contains("npm view x version"));
        assert!(err.to_string().contains("non-UTF-8"));
    }

    #[test]
    fn spawn_failure_is_distinguished_from_command_failure() {
        let registry = NpmRegistry::new("distpack-test-no-such-program");
        let err = registry
            .latest_version("anything")
            .expect_err("program does not exist");

        assert!(matches!(err, RegistryError::Spawn { .. }));
    }

    #[cfg(unix)]
    mod stub {
        use crate::registry::{NpmRegistry, RegistryError, RegistryLookup};
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::{Path, PathBuf};
        use tempfile::tempdir;

        fn write_stub(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("npm-stub");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write stub");
            let mut perms = fs::metadata(&path).expect("stat").permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).expect("chmod");
            path
        }

        #[test]
        fn strips_all_whitespace_from_stdout() {
            let tmp = tempdir().expect("tempdir");
            let stub = write_stub(tmp.path(), "printf '  2.3.4\\n'");

            let registry = NpmRegistry::new(stub.display().to_string());
            let version = registry.latest_version("pkg").expect("version");

            assert_eq!(version, "2.3.4");
        }

        #[test]
        fn nonzero_exit_carries_status_and_stderr() {
            let tmp = tempdir().expect("tempdir");
            let stub = write_stub(tmp.path(), "echo 'E404 not found' >&2; exit 1");

            let registry = NpmRegistry::new(stub.display().to_string());
            let err = registry.latest_version("pkg").expect_err("exit 1");

            match err {
                RegistryError::CommandFailed { status, stderr, .. } => {
                    assert_eq!(status.code(), Some(1));
                    assert!(stderr.contains("E404"));
                }
                other => panic!("expected CommandFailed, got {other:?}"),
            }
        }

        #[test]
        fn blank_stdout_is_an_empty_version() {
            let tmp = tempdir().expect("tempdir");
            let stub = write_stub(tmp.path(), "printf '\\n'");

            let registry = NpmRegistry::new(stub.display().to_string());
            let err = registry.latest_version("pkg").expect_err("blank output");

            assert!(matches!(err, RegistryError::EmptyVersion { .. }));
        }

        #[test]
        fn stub_receives_view_package_version_arguments() {
            let tmp = tempdir().expect("tempdir");
            let stub = write_stub(tmp.path(), "printf '%s-%s-%s' \"$1\" \"$2\" \"$3\"");

            let registry = NpmRegistry::new(stub.display().to_string());
            let version = registry.latest_version("left-pad").expect("version");

            assert_eq!(version, "view-left-pad-version");
        }
    }
}
