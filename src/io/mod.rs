//! Input/Output handling for the CLI.
//!
//! This module provides:
//! - Exit codes mapped from generation errors
//! - Path expansion and relative include paths

pub mod exit_code;
pub mod paths;

pub use exit_code::ExitCode;
pub use paths::{absolutize, expand_user, normalize, relative_to};
