//! Error types for the registration generator
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.

use crate::frontend::CursorId;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for a generation run
#[derive(Error, Debug)]
pub enum GenError {
    /// File system errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Input '{path}' does not exist")]
    InputNotFound { path: PathBuf },

    /// Parsing errors
    #[error("Failed to parse {language} file '{path}': {source}")]
    Parse {
        path: PathBuf,
        language: String,
        source: ParseError,
    },

    #[error("Failed to initialize the parsing front-end: {source}")]
    FrontendInit { source: ParseError },

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    /// General errors for cases where we need to preserve existing behavior
    #[error("{0}")]
    General(String),
}

impl GenError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::FileWrite { .. } => "FILE_WRITE_ERROR",
            Self::InputNotFound { .. } => "INPUT_NOT_FOUND",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::FrontendInit { .. } => "FRONTEND_INIT_ERROR",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::General(_) => "GENERAL_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Ensure the file is not locked by another process",
            ],
            Self::FileWrite { .. } => vec![
                "Check that the output directory is writable",
                "Nothing was written, the previous artifact is untouched",
            ],
            Self::InputNotFound { .. } => vec![
                "Pass a header file or a directory containing headers",
                "A leading '~' is expanded to your home directory",
            ],
            Self::Parse { .. } => vec![
                "Check the header for unbalanced braces or stray tokens",
                "Set frontend.fail_on_syntax_errors = false to scan anyway",
            ],
            Self::FrontendInit { .. } => vec![
                "Check frontend.library_path in your autoreg.toml",
                "Remove frontend.library_path to use the bundled grammars",
            ],
            Self::ConfigError { .. } => vec![
                "Run 'autoreg --print-config' to inspect the merged settings",
            ],
            Self::General(_) => vec![],
        }
    }
}

/// Errors specific to parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to initialize {language} parser: {reason}")]
    ParserInit { language: String, reason: String },

    #[error("Failed to parse code at line {line}, column {column}: {reason}")]
    SyntaxError {
        line: u32,
        column: u32,
        reason: String,
    },

    #[error("Invalid UTF-8 in source file")]
    InvalidUtf8,
}

/// Errors raised while turning a single marker occurrence into a record.
///
/// These never abort a scan; the scanner logs them and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Cursor {0:?} is not part of this translation unit")]
    DanglingCursor(CursorId),

    #[error("Scope chain above cursor {cursor:?} exceeds {limit} levels")]
    ScopeChainTooDeep { cursor: CursorId, limit: usize },

    #[error("Marked {kind} declaration at byte {offset} has no name")]
    UnnamedDeclaration { kind: &'static str, offset: usize },
}

/// Result type alias for generation runs
pub type GenResult<T> = Result<T, GenError>;

/// Result type alias for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T, GenError>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: &str) -> Result<T, GenError> {
        self.map_err(|e| GenError::General(format!("{msg}: {e}")))
    }
}
