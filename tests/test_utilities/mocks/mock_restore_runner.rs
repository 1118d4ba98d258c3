use async_trait::async_trait;
use dotnet_sbom::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Mock RestoreRunner that records invocations instead of running `dotnet`
///
/// Clones share the invocation counter.
#[derive(Default, Clone)]
pub struct MockRestoreRunner {
    pub should_fail: bool,
    pub invocations: Arc<AtomicUsize>,
}

impl MockRestoreRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RestoreRunner for MockRestoreRunner {
    async fn restore(&self, project_path: &Path, _timeout: Duration) -> Result<()> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(SbomError::DotnetRestoreFailed {
                path: project_path.to_path_buf(),
                details: "exit status: 1".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
