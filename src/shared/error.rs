use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The BOM was generated and written
    Ok = 0,
    /// Invalid command-line arguments or a malformed exclude filter
    InvalidOptions = 1,
    /// `dotnet restore` failed or timed out
    DotnetRestoreFailed = 2,
    /// A dependency edge could not be mapped to a component bom-ref
    UnableToLocateDependencyBomRef = 3,
    /// The GitHub API rejected the supplied credentials
    InvalidGitHubApiCredentials = 4,
    /// The GitHub API rate limit is exhausted
    GitHubApiRateLimitExceeded = 5,
    /// Any other failure while resolving a license through GitHub
    GitHubLicenseResolutionFailed = 6,
    /// Application error (network error, file I/O error, etc.)
    ApplicationError = 7,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Picks the exit code for an error by looking for an `SbomError` in its chain
    pub fn for_error(error: &anyhow::Error) -> Self {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<SbomError>())
            .map(SbomError::exit_code)
            .unwrap_or(ExitCode::ApplicationError)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Ok => write!(f, "OK (0)"),
            ExitCode::InvalidOptions => write!(f, "Invalid Options (1)"),
            ExitCode::DotnetRestoreFailed => write!(f, "Dotnet Restore Failed (2)"),
            ExitCode::UnableToLocateDependencyBomRef => {
                write!(f, "Unable To Locate Dependency BomRef (3)")
            }
            ExitCode::InvalidGitHubApiCredentials => {
                write!(f, "Invalid GitHub API Credentials (4)")
            }
            ExitCode::GitHubApiRateLimitExceeded => {
                write!(f, "GitHub API Rate Limit Exceeded (5)")
            }
            ExitCode::GitHubLicenseResolutionFailed => {
                write!(f, "GitHub License Resolution Failed (6)")
            }
            ExitCode::ApplicationError => write!(f, "Application Error (7)"),
        }
    }
}

/// Application-specific errors for SBOM generation.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("Invalid options: {message}\n\n💡 Hint: {hint}")]
    InvalidOptions { message: String, hint: String },

    #[error("dotnet restore failed for {path}\nDetails: {details}\n\n💡 Hint: Run `dotnet restore` manually to see the full output")]
    DotnetRestoreFailed { path: PathBuf, details: String },

    #[error("Unable to locate a bom-ref for dependency {dependency} of {parent}\nDetails: {details}")]
    UnableToLocateDependencyBomRef {
        parent: String,
        dependency: String,
        details: String,
    },

    #[error("GitHub API rejected the supplied credentials\n\n💡 Hint: Check the token passed with --github-token")]
    InvalidGitHubApiCredentials,

    #[error("GitHub API rate limit exceeded\n\n💡 Hint: Pass --github-token to raise the limit, or retry later")]
    GitHubApiRateLimitExceeded,

    #[error("Failed to resolve license from GitHub for {url}\nDetails: {details}")]
    GitHubLicenseResolutionFailed { url: String, details: String },

    #[error("Failed to fetch metadata for {package}\nDetails: {details}")]
    MetadataFetchFailed { package: String, details: String },

    #[error("Lockfile not found: {path}\n\n💡 Hint: {suggestion}")]
    LockfileNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse lockfile: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the packages.lock.json file is in the correct format")]
    LockfileParseError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a valid project directory or packages.lock.json file")]
    InvalidProjectPath { path: PathBuf, reason: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },
}

impl SbomError {
    pub fn invalid_options(message: impl Into<String>, hint: impl Into<String>) -> Self {
        SbomError::InvalidOptions {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            SbomError::InvalidOptions { .. } => ExitCode::InvalidOptions,
            SbomError::DotnetRestoreFailed { .. } => ExitCode::DotnetRestoreFailed,
            SbomError::UnableToLocateDependencyBomRef { .. } => {
                ExitCode::UnableToLocateDependencyBomRef
            }
            SbomError::InvalidGitHubApiCredentials => ExitCode::InvalidGitHubApiCredentials,
            SbomError::GitHubApiRateLimitExceeded => ExitCode::GitHubApiRateLimitExceeded,
            SbomError::GitHubLicenseResolutionFailed { .. } => {
                ExitCode::GitHubLicenseResolutionFailed
            }
            SbomError::MetadataFetchFailed { .. }
            | SbomError::LockfileNotFound { .. }
            | SbomError::LockfileParseError { .. }
            | SbomError::FileWriteError { .. }
            | SbomError::InvalidProjectPath { .. }
            | SbomError::FileReadError { .. } => ExitCode::ApplicationError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Ok.as_i32(), 0);
        assert_eq!(ExitCode::InvalidOptions.as_i32(), 1);
        assert_eq!(ExitCode::DotnetRestoreFailed.as_i32(), 2);
        assert_eq!(ExitCode::UnableToLocateDependencyBomRef.as_i32(), 3);
        assert_eq!(ExitCode::InvalidGitHubApiCredentials.as_i32(), 4);
        assert_eq!(ExitCode::GitHubApiRateLimitExceeded.as_i32(), 5);
        assert_eq!(ExitCode::GitHubLicenseResolutionFailed.as_i32(), 6);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 7);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Ok), "OK (0)");
        assert_eq!(
            format!("{}", ExitCode::InvalidOptions),
            "Invalid Options (1)"
        );
    }

    #[test]
    fn test_exit_code_for_plain_error_is_application_error() {
        let error = anyhow::anyhow!("something broke");
        assert_eq!(ExitCode::for_error(&error), ExitCode::ApplicationError);
    }

    #[test]
    fn test_exit_code_found_through_context_chain() {
        let result: std::result::Result<(), SbomError> =
            Err(SbomError::invalid_options("empty token", "remove the extra comma"));
        let error = result.context("while parsing filters").unwrap_err();
        assert_eq!(ExitCode::for_error(&error), ExitCode::InvalidOptions);
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            SbomError::GitHubApiRateLimitExceeded.exit_code(),
            ExitCode::GitHubApiRateLimitExceeded
        );
        assert_eq!(
            SbomError::UnableToLocateDependencyBomRef {
                parent: "a".to_string(),
                dependency: "b".to_string(),
                details: "c".to_string(),
            }
            .exit_code(),
            ExitCode::UnableToLocateDependencyBomRef
        );
        assert_eq!(
            SbomError::DotnetRestoreFailed {
                path: PathBuf::from("/p"),
                details: "timeout".to_string(),
            }
            .exit_code(),
            ExitCode::DotnetRestoreFailed
        );
    }

    #[test]
    fn test_invalid_options_display() {
        let error = SbomError::invalid_options("Empty token", "Remove empty entries");
        let display = format!("{}", error);
        assert!(display.contains("Invalid options: Empty token"));
        assert!(display.contains("💡 Hint: Remove empty entries"));
    }

    #[test]
    fn test_lockfile_not_found_display() {
        let error = SbomError::LockfileNotFound {
            path: PathBuf::from("/test/path/packages.lock.json"),
            suggestion: "Test suggestion".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Lockfile not found"));
        assert!(display.contains("/test/path/packages.lock.json"));
        assert!(display.contains("Test suggestion"));
    }

    #[test]
    fn test_file_write_error_display() {
        let error = SbomError::FileWriteError {
            path: PathBuf::from("/test/output.json"),
            details: "Permission denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to write to file"));
        assert!(display.contains("Permission denied"));
    }
}
