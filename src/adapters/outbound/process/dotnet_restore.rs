use crate::ports::outbound::RestoreRunner;
use crate::shared::error::SbomError;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Lines of restore output kept in the error message
const MAX_OUTPUT_LINES: usize = 20;

/// DotnetRestoreRunner adapter that shells out to the .NET SDK
///
/// Runs `dotnet restore <path> --use-lock-file` so the lockfiles exist
/// before they are read. The child is killed when the timeout expires.
pub struct DotnetRestoreRunner {
    program: PathBuf,
}

impl DotnetRestoreRunner {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("dotnet"),
        }
    }

    /// Uses another executable in place of `dotnet` (e.g. a pinned SDK path)
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn failure(path: &Path, details: impl Into<String>) -> anyhow::Error {
        SbomError::DotnetRestoreFailed {
            path: path.to_path_buf(),
            details: details.into(),
        }
        .into()
    }
}

impl Default for DotnetRestoreRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RestoreRunner for DotnetRestoreRunner {
    async fn restore(&self, project_path: &Path, timeout: Duration) -> Result<()> {
        let child = Command::new(&self.program)
            .arg("restore")
            .arg(project_path)
            .arg("--use-lock-file")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Self::failure(
                    project_path,
                    format!("could not start {}: {}", self.program.display(), e),
                )
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output.map_err(|e| Self::failure(project_path, e.to_string()))?,
            Err(_) => {
                return Err(Self::failure(
                    project_path,
                    format!("timed out after {} seconds", timeout.as_secs()),
                ))
            }
        };

        if output.status.success() {
            return Ok(());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: Vec<&str> = stdout
            .lines()
            .chain(stderr.lines())
            .filter(|line| !line.trim().is_empty())
            .collect();
        let tail = &tail[tail.len().saturating_sub(MAX_OUTPUT_LINES)..];

        Err(Self::failure(
            project_path,
            format!("{}\n{}", output.status, tail.join("\n")),
        ))
    }
}
