/// Mock implementations for testing
mod mock_metadata_repository;
mod mock_package_source;
mod mock_progress_reporter;
mod mock_restore_runner;

pub use mock_metadata_repository::MockMetadataRepository;
pub use mock_package_source::MockPackageSource;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_restore_runner::MockRestoreRunner;
