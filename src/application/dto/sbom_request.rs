use crate::sbom_generation::policies::ComponentFields;
use std::path::PathBuf;
use std::time::Duration;

/// Default time allowed for `dotnet restore`
pub const DEFAULT_RESTORE_TIMEOUT: Duration = Duration::from_secs(300);

/// SbomRequest - Internal request DTO for SBOM generation use case
///
/// Carries the option surface of a scan. Built by the CLI after merging
/// command-line flags with the config file.
#[derive(Debug, Clone)]
pub struct SbomRequest {
    /// Project directory or `packages.lock.json` to scan
    pub project_path: PathBuf,
    /// Remove dev dependencies instead of marking them excluded
    pub exclude_dev: bool,
    /// Drop test projects entirely instead of marking them excluded
    pub exclude_test_projects: bool,
    /// Keep project references as components
    pub include_project_references: bool,
    /// Comma-separated `name` / `name@version` entries to remove
    pub dependency_exclude_filter: Option<String>,
    /// `setName` / `setVersion` / `setType`
    pub overrides: ComponentFields,
    /// CycloneDX JSON file whose metadata component is imported
    pub import_metadata: Option<PathBuf>,
    /// Run `dotnet restore` before scanning
    pub restore: bool,
    pub restore_timeout: Duration,
}

impl SbomRequest {
    pub fn new(project_path: PathBuf) -> Self {
        Self {
            project_path,
            exclude_dev: false,
            exclude_test_projects: false,
            include_project_references: false,
            dependency_exclude_filter: None,
            overrides: ComponentFields::default(),
            import_metadata: None,
            restore: false,
            restore_timeout: DEFAULT_RESTORE_TIMEOUT,
        }
    }

    pub fn with_exclude_dev(mut self, exclude_dev: bool) -> Self {
        self.exclude_dev = exclude_dev;
        self
    }

    pub fn with_exclude_test_projects(mut self, exclude_test_projects: bool) -> Self {
        self.exclude_test_projects = exclude_test_projects;
        self
    }

    pub fn with_include_project_references(mut self, include: bool) -> Self {
        self.include_project_references = include;
        self
    }

    pub fn with_dependency_exclude_filter(mut self, filter: Option<String>) -> Self {
        self.dependency_exclude_filter = filter;
        self
    }

    pub fn with_overrides(mut self, overrides: ComponentFields) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_import_metadata(mut self, path: Option<PathBuf>) -> Self {
        self.import_metadata = path;
        self
    }

    pub fn with_restore(mut self, restore: bool, timeout: Duration) -> Self {
        self.restore = restore;
        self.restore_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = SbomRequest::new(PathBuf::from("."));
        assert!(!request.exclude_dev);
        assert!(!request.include_project_references);
        assert!(request.dependency_exclude_filter.is_none());
        assert!(request.overrides.is_empty());
        assert_eq!(request.restore_timeout, DEFAULT_RESTORE_TIMEOUT);
    }

    #[test]
    fn test_request_builders() {
        let request = SbomRequest::new(PathBuf::from("app"))
            .with_exclude_dev(true)
            .with_dependency_exclude_filter(Some("NLog".to_string()))
            .with_restore(true, Duration::from_secs(5));

        assert!(request.exclude_dev);
        assert_eq!(request.dependency_exclude_filter.as_deref(), Some("NLog"));
        assert!(request.restore);
        assert_eq!(request.restore_timeout, Duration::from_secs(5));
    }
}
