/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, network, processes, console).
pub mod formatter;
pub mod metadata_repository;
pub mod metadata_template_reader;
pub mod output_presenter;
pub mod package_source;
pub mod progress_reporter;
pub mod restore_runner;

pub use formatter::SbomFormatter;
pub use metadata_repository::MetadataRepository;
pub use metadata_template_reader::MetadataTemplateReader;
pub use output_presenter::OutputPresenter;
pub use package_source::{PackageSource, SourceScan};
pub use progress_reporter::ProgressReporter;
pub use restore_runner::RestoreRunner;
