use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// RestoreRunner port for running the package restore before a scan
#[async_trait]
pub trait RestoreRunner: Send + Sync {
    /// Restores packages for `project_path`, giving up after `timeout`
    ///
    /// # Errors
    /// Returns `SbomError::DotnetRestoreFailed` when the restore exits with
    /// a failure status, cannot be started, or runs past the timeout.
    async fn restore(&self, project_path: &Path, timeout: Duration) -> Result<()>;
}
