/// Crate-wide result type.
///
/// Typed failures are `SbomError` values carried inside `anyhow::Error`, so
/// `ExitCode::for_error` can still find them under added context.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
