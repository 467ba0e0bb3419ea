//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - artifact written (possibly with zero records)
//! - `1`: General error - unspecified failure
//! - `3-125`: Specific errors a script can react to
//! - `126-255`: Reserved by shell

use crate::error::GenError;

/// Standard exit codes for CLI operations.
///
/// These codes follow Unix conventions where 0 indicates success,
/// and non-zero values indicate various error conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Artifact written (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Input header or directory does not exist (code 3)
    InputNotFound = 3,

    /// Header could not be parsed or the front-end failed to start (code 4)
    ParseError = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Convert a `GenError` to the appropriate exit code.
    pub fn from_error(error: &GenError) -> Self {
        match error {
            GenError::InputNotFound { .. } => ExitCode::InputNotFound,
            GenError::Parse { .. } | GenError::FrontendInit { .. } => ExitCode::ParseError,
            GenError::FileRead { .. } | GenError::FileWrite { .. } => ExitCode::IoError,
            GenError::ConfigError { .. } => ExitCode::ConfigError,
            GenError::General(_) => ExitCode::GeneralError,
        }
    }

    /// Check if this exit code indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success as u8, 0);
        assert_eq!(ExitCode::GeneralError as u8, 1);
        assert_eq!(ExitCode::InputNotFound as u8, 3);
        assert_eq!(i32::from(ExitCode::ConfigError), 6);
    }

    #[test]
    fn test_from_error() {
        let missing = GenError::InputNotFound {
            path: PathBuf::from("nope.h"),
        };
        assert_eq!(ExitCode::from_error(&missing), ExitCode::InputNotFound);

        let init = GenError::FrontendInit {
            source: ParseError::InvalidUtf8,
        };
        assert_eq!(ExitCode::from_error(&init), ExitCode::ParseError);

        let write = GenError::FileWrite {
            path: PathBuf::from("out.cpp"),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(ExitCode::from_error(&write), ExitCode::IoError);
    }

    #[test]
    fn test_is_success() {
        assert!(ExitCode::Success.is_success());
        assert!(!ExitCode::InputNotFound.is_success());
        assert!(!ExitCode::GeneralError.is_success());
    }
}
