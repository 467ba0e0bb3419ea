//! Reflection registration generator for C and C++ headers.
//!
//! Scans headers for marker identifiers on classes, members and enums and
//! emits a source file registering them with the RTTR runtime.

pub mod config;
pub mod emit;
pub mod error;
pub mod frontend;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod reflect;

// Explicit exports for better API clarity
pub use config::{FrontendConfig, LanguageStandard, OutputConfig, Settings};
pub use emit::RegistrationEmitter;
pub use error::{ErrorContext, GenError, GenResult, ParseError, ParseResult, ScanError};
pub use frontend::{CursorId, CursorKind, HeaderParser, SourceUnit, Token, TokenKind, TranslationUnit};
pub use pipeline::{GenerationReport, Generator};
pub use reflect::{
    ClassRecord, EnumRecord, MarkerSet, QualifiedPath, ScanDiagnostic, ScanResult, Scanner,
};
