/// Filesystem adapters: lockfile discovery and parsing, metadata templates, BOM output
mod file_reader;
mod file_writer;
mod metadata_template;
mod npm_lockfile;
mod nuget_lockfile;

pub use file_reader::{FileSystemReader, DEFAULT_TEST_PROJECT_PATTERNS};
pub use file_writer::{FileSystemWriter, StdoutPresenter};
